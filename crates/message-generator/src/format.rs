//! Message body encodings.

use std::fmt;

/// Encoding of a generated message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// Pretty-printed JSON object
    #[default]
    Json,
    /// Compact XML document
    Xml,
}

impl MessageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::Json => "json",
            MessageFormat::Xml => "xml",
        }
    }

    /// MIME type sent in the `content-type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            MessageFormat::Json => "application/json",
            MessageFormat::Xml => "application/xml",
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
