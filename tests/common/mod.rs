//! Shared test doubles: a recording mock broker and a TCP fake STOMP broker.

#![allow(dead_code)]

use activemq_producer::Broker;
use anyhow::{anyhow, Result};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex};
use stomp_client::{Command, Frame, StompCodec};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::codec::Framed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Send {
        destination: String,
        content_type: String,
    },
    Disconnect,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub call: Call,
    pub at: Instant,
    pub body: Option<String>,
}

/// Call log shared between a test and the broker it hands to the publisher.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Recorded>>>);

impl CallLog {
    fn record(&self, call: Call, body: Option<String>) {
        self.0.lock().unwrap().push(Recorded {
            call,
            at: Instant::now(),
            body,
        });
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorded().into_iter().map(|r| r.call).collect()
    }

    pub fn send_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Send { .. }))
            .count()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.recorded().into_iter().filter_map(|r| r.body).collect()
    }
}

/// Broker that records every call and fails on demand.
#[derive(Debug, Default)]
pub struct MockBroker {
    pub log: CallLog,
    pub fail_connect: bool,
    /// 1-based send attempt that fails
    pub fail_send_on: Option<usize>,
    /// 1-based send attempt that never completes
    pub stall_send_on: Option<usize>,
    pub fail_disconnect: bool,
    pub attempts: usize,
}

impl MockBroker {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl Broker for MockBroker {
    fn endpoint(&self) -> String {
        "mock:61613".to_string()
    }

    async fn connect(&mut self) -> Result<()> {
        self.log.record(Call::Connect, None);
        if self.fail_connect {
            return Err(anyhow!("Connection refused"));
        }
        Ok(())
    }

    async fn send(&mut self, destination: &str, body: &str, content_type: &str) -> Result<()> {
        self.attempts += 1;
        self.log.record(
            Call::Send {
                destination: destination.to_string(),
                content_type: content_type.to_string(),
            },
            Some(body.to_string()),
        );
        if self.stall_send_on == Some(self.attempts) {
            std::future::pending::<()>().await;
        }
        if self.fail_send_on == Some(self.attempts) {
            return Err(anyhow!("Broken pipe"));
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.log.record(Call::Disconnect, None);
        if self.fail_disconnect {
            return Err(anyhow!("Socket already closed"));
        }
        Ok(())
    }
}

/// How the TCP fake broker answers CONNECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Accept,
    RejectLogin,
}

/// A single-connection STOMP broker on 127.0.0.1 that records every frame.
pub struct FakeBroker {
    pub port: u16,
    handle: JoinHandle<Vec<Frame>>,
}

impl FakeBroker {
    pub async fn spawn(behaviour: Behaviour) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let handle = tokio::spawn(async move {
            let mut frames = Vec::new();
            let Ok((stream, _)) = listener.accept().await else {
                return frames;
            };
            let mut framed = Framed::new(stream, StompCodec::new());

            while let Some(Ok(frame)) = framed.next().await {
                let reply = match frame.command {
                    Command::Connect if behaviour == Behaviour::RejectLogin => Some(
                        Frame::new(Command::Error)
                            .header("message", "Authentication failed"),
                    ),
                    Command::Connect => Some(
                        Frame::new(Command::Connected)
                            .header("version", "1.2")
                            .header("session", "ID:fake-1"),
                    ),
                    Command::Disconnect => frame
                        .get_header("receipt")
                        .map(|r| Frame::new(Command::Receipt).header("receipt-id", r)),
                    _ => None,
                };
                let reject = frame.command == Command::Connect
                    && behaviour == Behaviour::RejectLogin;
                frames.push(frame);

                if let Some(reply) = reply {
                    if framed.send(reply).await.is_err() {
                        break;
                    }
                }
                if reject {
                    break;
                }
            }
            frames
        });

        Ok(Self { port, handle })
    }

    /// Wait for the client to hang up and return what it sent.
    pub async fn frames(self) -> Vec<Frame> {
        self.handle.await.unwrap_or_default()
    }
}
