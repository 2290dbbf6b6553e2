//! Minimal STOMP 1.2 producer client.
//!
//! This crate implements the subset of STOMP a publisher needs: CONNECT,
//! SEND and DISCONNECT, plus the broker frames that answer them (CONNECTED,
//! RECEIPT, ERROR). Subscriptions, acknowledgements and transactions are not
//! supported.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stomp_client::{ConnectOptions, StompConnection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), stomp_client::StompError> {
//!     let options = ConnectOptions::new("localhost", 61613)
//!         .with_credentials(Some("admin".to_string()), Some("admin".to_string()));
//!
//!     let mut connection = StompConnection::connect(&options).await?;
//!     connection
//!         .send("/queue/orders", "{\"id\":1}", &[("content-type", "application/json")])
//!         .await?;
//!     connection.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod error;
pub mod frame;

pub use codec::{StompCodec, DEFAULT_MAX_FRAME_SIZE};
pub use connection::{ConnectOptions, StompConnection, DEFAULT_RECEIPT_TIMEOUT};
pub use error::StompError;
pub use frame::{Command, Frame};
