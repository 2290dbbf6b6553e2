//! Broker abstraction used by the publisher.
//!
//! The publisher is generic over [`Broker`], so the CLI picks a concrete
//! implementation once (STOMP or dry run) and everything after that is
//! statically dispatched. Tests plug in recording mocks through the same
//! trait.

use crate::config::SendConfig;
use anyhow::{anyhow, Result};
use stomp_client::{ConnectOptions, StompConnection};
use tracing::{debug, info};

/// Characters of the first body shown by a dry run.
const PREVIEW_CHARS: usize = 150;

/// A message sink with an explicit connection lifecycle.
#[async_trait::async_trait]
pub trait Broker: Send {
    /// Human-readable endpoint, used in progress output and errors.
    fn endpoint(&self) -> String;

    /// Open the single connection used for the whole run.
    async fn connect(&mut self) -> Result<()>;

    /// Publish one message body to `destination`.
    async fn send(&mut self, destination: &str, body: &str, content_type: &str) -> Result<()>;

    /// Close the connection opened by [`connect`](Self::connect).
    async fn disconnect(&mut self) -> Result<()>;
}

/// Publishes over a single STOMP connection.
pub struct StompBroker {
    options: ConnectOptions,
    connection: Option<StompConnection>,
}

impl StompBroker {
    pub fn new(options: ConnectOptions) -> Self {
        Self {
            options,
            connection: None,
        }
    }

    pub fn from_config(config: &SendConfig) -> Self {
        Self::new(
            ConnectOptions::new(config.host.clone(), config.port)
                .with_credentials(config.username.clone(), config.password.clone()),
        )
    }
}

#[async_trait::async_trait]
impl Broker for StompBroker {
    fn endpoint(&self) -> String {
        self.options.addr()
    }

    async fn connect(&mut self) -> Result<()> {
        let connection = StompConnection::connect(&self.options).await?;
        info!(
            "Connected to {} (STOMP {}, session {})",
            self.options.addr(),
            connection.version(),
            connection.session().unwrap_or("-")
        );
        self.connection = Some(connection);
        Ok(())
    }

    async fn send(&mut self, destination: &str, body: &str, content_type: &str) -> Result<()> {
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| anyhow!("Not connected"))?;

        connection
            .send(
                destination,
                body.to_owned(),
                &[("content-type", content_type), ("persistent", "true")],
            )
            .await?;

        debug!("Sent {} bytes to {}", body.len(), destination);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            connection.disconnect().await?;
            info!("Disconnected from {}", self.options.addr());
        }
        Ok(())
    }
}

/// Accepts every message without any network I/O and previews the first.
#[derive(Debug, Default)]
pub struct DryRunBroker {
    previewed: bool,
}

impl DryRunBroker {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Broker for DryRunBroker {
    fn endpoint(&self) -> String {
        "dry run (no broker)".to_string()
    }

    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn send(&mut self, destination: &str, body: &str, content_type: &str) -> Result<()> {
        if !self.previewed {
            self.previewed = true;
            println!("  Destination: {destination} ({content_type})");
            println!("  Preview: {}", preview(body, PREVIEW_CHARS));
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

/// First `max_chars` characters of `body`, with an ellipsis when cut.
pub fn preview(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
