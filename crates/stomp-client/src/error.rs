//! Error types for the STOMP client.

use thiserror::Error;

/// Errors raised by the codec and the connection.
#[derive(Error, Debug)]
pub enum StompError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Broker rejected connection: {message}")]
    Rejected { message: String, details: String },

    #[error("Broker error: {message}")]
    Broker { message: String, details: String },

    #[error("Unexpected {0} frame")]
    UnexpectedFrame(String),

    #[error("Connection closed by broker")]
    ConnectionClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timed out waiting for receipt '{0}'")]
    ReceiptTimeout(String),
}
