//! STOMP frame model.

use bytes::Bytes;
use std::fmt;

/// STOMP frame commands understood by the producer client.
///
/// Consumer-side commands (SUBSCRIBE, MESSAGE, ACK, transactions) are not
/// modelled; a broker never sends them to a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Send,
    Disconnect,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Send => "SEND",
            Command::Disconnect => "DISCONNECT",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    /// Parse a command line. Matching is exact, as the protocol requires.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONNECT" => Some(Command::Connect),
            "CONNECTED" => Some(Command::Connected),
            "SEND" => Some(Command::Send),
            "DISCONNECT" => Some(Command::Disconnect),
            "RECEIPT" => Some(Command::Receipt),
            "ERROR" => Some(Command::Error),
            _ => None,
        }
    }

    /// CONNECT and CONNECTED frames carry their headers unescaped.
    pub fn escapes_headers(&self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single STOMP frame.
///
/// Headers keep their wire order. When a header name repeats, the first
/// occurrence is the one that counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Look up a header value by name.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Build a CONNECT frame for the given virtual host.
    ///
    /// Credentials are only attached when both login and passcode are present.
    pub fn connect(host: &str, login: Option<&str>, passcode: Option<&str>) -> Self {
        let mut frame = Frame::new(Command::Connect)
            .header("accept-version", "1.0,1.1,1.2")
            .header("host", host)
            .header("heart-beat", "0,0");
        if let (Some(login), Some(passcode)) = (login, passcode) {
            frame = frame.header("login", login).header("passcode", passcode);
        }
        frame
    }

    pub fn send(destination: &str, body: impl Into<Bytes>) -> Self {
        Frame::new(Command::Send)
            .header("destination", destination)
            .with_body(body)
    }

    pub fn disconnect(receipt: &str) -> Self {
        Frame::new(Command::Disconnect).header("receipt", receipt)
    }

    /// The `message` header of an ERROR frame, falling back to the body.
    pub fn error_message(&self) -> String {
        match self.get_header("message") {
            Some(message) => message.to_string(),
            None => String::from_utf8_lossy(&self.body).trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_without_credentials() {
        let frame = Frame::connect("localhost", None, None);

        assert_eq!(frame.command, Command::Connect);
        assert_eq!(frame.get_header("accept-version"), Some("1.0,1.1,1.2"));
        assert_eq!(frame.get_header("host"), Some("localhost"));
        assert_eq!(frame.get_header("login"), None);
        assert_eq!(frame.get_header("passcode"), None);
    }

    #[test]
    fn test_connect_requires_both_credentials() {
        let frame = Frame::connect("broker", Some("admin"), None);
        assert_eq!(frame.get_header("login"), None);

        let frame = Frame::connect("broker", Some("admin"), Some("secret"));
        assert_eq!(frame.get_header("login"), Some("admin"));
        assert_eq!(frame.get_header("passcode"), Some("secret"));
    }

    #[test]
    fn test_first_header_wins() {
        let frame = Frame::new(Command::Receipt)
            .header("foo", "first")
            .header("foo", "second");

        assert_eq!(frame.get_header("foo"), Some("first"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let frame = Frame::new(Command::Error).with_body("bad things\n");
        assert_eq!(frame.error_message(), "bad things");

        let frame = frame.header("message", "short");
        assert_eq!(frame.error_message(), "short");
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("CONNECTED"), Some(Command::Connected));
        assert_eq!(Command::parse("connected"), None);
        assert!(!Command::Connect.escapes_headers());
        assert!(Command::Send.escapes_headers());
    }
}
