//! Synthetic message bodies for queue load testing.
//!
//! Every message carries a timestamp, a numeric message id, the fixed type
//! tag `test_message`, and random alphanumeric filler sized so the encoded
//! body reaches the requested byte length.
//!
//! ```text
//! JSON                                   XML
//! {                                      <message>
//!   "timestamp": "...",                    <timestamp>...</timestamp>
//!   "message_id": "000001",                <message_id>000001</message_id>
//!   "type": "test_message",                <type>test_message</type>
//!   "data": "q8ZrT..."                     <data>q8ZrT...</data>
//! }                                      </message>
//! ```
//!
//! # Example
//!
//! ```rust
//! use message_generator::{MessageFormat, PayloadGenerator};
//!
//! let mut generator = PayloadGenerator::new(MessageFormat::Json, 256);
//! let payload = generator.next_payload().unwrap();
//! assert_eq!(payload.len(), 256);
//! ```

pub mod error;
pub mod filler;
pub mod format;
pub mod generator;
pub mod message;

pub use error::GeneratorError;
pub use format::MessageFormat;
pub use generator::{format_message_id, GeneratedPayload, PayloadGenerator, Payloads};
pub use message::{Message, MESSAGE_TYPE};
