//! Error types for a producer run.

use message_generator::GeneratorError;
use thiserror::Error;

/// Configuration values that violate the run invariants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Queue name must not be empty")]
    EmptyQueue,

    #[error("Rate must be a positive number of messages per second, got {0}")]
    InvalidRate(f64),
}

/// Errors that end a run early.
///
/// The underlying cause is kept as the error source, so `{:#}` formatting
/// prints the whole chain.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to broker at {addr}")]
    Connect {
        addr: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to generate message {index} of {count} ({sent} sent before failure)")]
    Generate {
        index: u64,
        count: u64,
        sent: u64,
        #[source]
        source: GeneratorError,
    },

    #[error("Failed to send message {index} of {count} ({sent} sent before failure)")]
    Send {
        index: u64,
        count: u64,
        sent: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("Interrupted after sending {sent} of {count} messages")]
    Interrupted { sent: u64, count: u64 },
}

impl PublishError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::Interrupted { .. } => 130,
            _ => 1,
        }
    }

    /// Messages delivered before the run stopped.
    pub fn messages_sent(&self) -> u64 {
        match self {
            PublishError::Generate { sent, .. }
            | PublishError::Send { sent, .. }
            | PublishError::Interrupted { sent, .. } => *sent,
            PublishError::Config(_) | PublishError::Connect { .. } => 0,
        }
    }
}
