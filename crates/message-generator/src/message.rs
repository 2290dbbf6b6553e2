//! The synthetic message record and its serialized forms.

use crate::error::GeneratorError;
use crate::format::MessageFormat;
use chrono::{SecondsFormat, Utc};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

/// Value of the `type` field on every generated message.
pub const MESSAGE_TYPE: &str = "test_message";

/// Root element of the XML encoding.
pub const XML_ROOT: &str = "message";

/// One message as sent to the broker.
///
/// Field order is the serialized order for both encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub timestamp: String,
    pub message_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
}

impl Message {
    /// Create a message stamped with the current UTC time.
    pub fn new(message_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            message_id: message_id.into(),
            kind: MESSAGE_TYPE.to_string(),
            data: data.into(),
        }
    }

    pub fn render(&self, format: MessageFormat) -> Result<String, GeneratorError> {
        match format {
            MessageFormat::Json => self.to_json(),
            MessageFormat::Xml => self.to_xml(),
        }
    }

    pub fn to_json(&self) -> Result<String, GeneratorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_xml(&self) -> Result<String, GeneratorError> {
        let mut writer = Writer::new(Vec::new());
        write_event(&mut writer, Event::Start(BytesStart::new(XML_ROOT)))?;

        let children = [
            ("timestamp", &self.timestamp),
            ("message_id", &self.message_id),
            ("type", &self.kind),
            ("data", &self.data),
        ];
        for (name, value) in children {
            write_event(&mut writer, Event::Start(BytesStart::new(name)))?;
            write_event(&mut writer, Event::Text(BytesText::new(value)))?;
            write_event(&mut writer, Event::End(BytesEnd::new(name)))?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new(XML_ROOT)))?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), GeneratorError> {
    writer
        .write_event(event)
        .map_err(|e| GeneratorError::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_message(data: &str) -> Message {
        Message {
            timestamp: "2024-01-02T03:04:05.000006Z".to_string(),
            message_id: "000001".to_string(),
            kind: MESSAGE_TYPE.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_json_layout() {
        let json = fixed_message("abc").to_json().unwrap();

        assert_eq!(
            json,
            "{\n  \"timestamp\": \"2024-01-02T03:04:05.000006Z\",\n  \"message_id\": \"000001\",\n  \"type\": \"test_message\",\n  \"data\": \"abc\"\n}"
        );
    }

    #[test]
    fn test_xml_layout() {
        let xml = fixed_message("abc").to_xml().unwrap();

        assert_eq!(
            xml,
            "<message><timestamp>2024-01-02T03:04:05.000006Z</timestamp><message_id>000001</message_id><type>test_message</type><data>abc</data></message>"
        );
    }

    #[test]
    fn test_empty_data_keeps_element_pair() {
        let xml = fixed_message("").to_xml().unwrap();
        assert!(xml.ends_with("<data></data></message>"));
    }

    #[test]
    fn test_xml_escapes_markup() {
        let xml = fixed_message("a<b&c").to_xml().unwrap();
        assert!(xml.contains("<data>a&lt;b&amp;c</data>"));
    }

    #[test]
    fn test_timestamp_has_microsecond_precision() {
        let message = Message::new("1", "");

        let parsed = chrono::DateTime::parse_from_rfc3339(&message.timestamp);
        assert!(parsed.is_ok(), "timestamp should be RFC 3339: {}", message.timestamp);

        let fraction = message
            .timestamp
            .split('.')
            .nth(1)
            .expect("timestamp should have a fractional part");
        assert_eq!(fraction.len(), "123456Z".len());
        assert!(fraction.ends_with('Z'));
    }
}
