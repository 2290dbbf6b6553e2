//! Error type for message generation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML serialization error: {0}")]
    Xml(String),

    #[error("Generated body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
