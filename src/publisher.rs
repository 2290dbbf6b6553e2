//! The send loop.
//!
//! A run is strictly sequential: connect, then for each of `count`
//! iterations generate a payload, send it, and pause `1 / rate` seconds
//! (except after the last one), then disconnect. The first failure ends the
//! loop; disconnect is still attempted unless the connection never opened.
//! Shutdown is observed both during a send and during the pause.

use crate::broker::Broker;
use crate::config::SendConfig;
use crate::error::PublishError;
use crate::rate::{Pause, RateLimiter};
use message_generator::PayloadGenerator;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishReport {
    /// Number of messages requested.
    pub requested: u64,
    /// Number of messages sent.
    pub sent: u64,
    /// Total body bytes sent.
    pub bytes_sent: u64,
    /// Time from the first send attempt to the end of the loop.
    pub elapsed: Duration,
}

impl PublishReport {
    fn new(requested: u64) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    /// Calculate achieved messages per second.
    pub fn messages_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.sent as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Publishes a configured stream of generated messages through a broker.
pub struct Publisher<B> {
    config: SendConfig,
    broker: B,
    limiter: RateLimiter,
}

impl<B: Broker> Publisher<B> {
    pub fn new(config: SendConfig, broker: B) -> Result<Self, PublishError> {
        config.validate()?;
        let limiter = RateLimiter::new(config.send_interval());
        Ok(Self {
            config,
            broker,
            limiter,
        })
    }

    /// Execute the run.
    ///
    /// `shutdown` is raced against every send and every inter-send pause;
    /// when it completes the loop stops with [`PublishError::Interrupted`].
    pub async fn run<S>(&mut self, shutdown: S) -> Result<PublishReport, PublishError>
    where
        S: Future<Output = ()>,
    {
        let endpoint = self.broker.endpoint();
        self.broker
            .connect()
            .await
            .map_err(|source| PublishError::Connect {
                addr: endpoint.clone(),
                source,
            })?;
        println!("✓ Connected to {endpoint}");

        tokio::pin!(shutdown);
        let mut report = PublishReport::new(self.config.count);
        let start = Instant::now();
        let outcome = self.send_all(&mut report, &mut shutdown).await;
        report.elapsed = start.elapsed();

        match self.broker.disconnect().await {
            Ok(()) => println!("✓ Disconnected from {endpoint}"),
            Err(e) => {
                warn!("Error during disconnect: {e:#}");
                eprintln!("Warning: error during disconnect: {e:#}");
            }
        }

        outcome.map(|()| report)
    }

    async fn send_all<S>(
        &mut self,
        report: &mut PublishReport,
        shutdown: &mut S,
    ) -> Result<(), PublishError>
    where
        S: Future<Output = ()> + Unpin,
    {
        let count = self.config.count;
        let destination = self.config.destination();
        let content_type = self.config.format.content_type();
        let mut generator = PayloadGenerator::new(self.config.format, self.config.size);

        info!(
            "Publishing {} {} messages of ~{} bytes to '{}' every {:?}",
            count,
            self.config.format,
            self.config.size,
            destination,
            self.limiter.interval()
        );

        for (index, payload) in (1..=count).zip(generator.payloads(count)) {
            let payload = payload.map_err(|source| PublishError::Generate {
                index,
                count,
                sent: report.sent,
                source,
            })?;

            // A send that completes on the same poll as shutdown still counts.
            let outcome = tokio::select! {
                biased;
                result = self.broker.send(&destination, &payload.body, content_type) => result,
                () = &mut *shutdown => {
                    debug!("Shutdown requested while sending message {}", index);
                    return Err(PublishError::Interrupted {
                        sent: report.sent,
                        count,
                    });
                }
            };
            outcome.map_err(|source| PublishError::Send {
                index,
                count,
                sent: report.sent,
                source,
            })?;

            report.sent += 1;
            report.bytes_sent += payload.len() as u64;
            println!(
                "[{index}/{count}] Sent message {} ({} bytes)",
                payload.message_id,
                payload.len()
            );

            if index < count && self.limiter.pause(shutdown).await == Pause::Interrupted {
                debug!("Shutdown requested after message {}", index);
                return Err(PublishError::Interrupted {
                    sent: report.sent,
                    count,
                });
            }
        }

        Ok(())
    }
}
