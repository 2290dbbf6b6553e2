//! Resolved run configuration.

use crate::error::ConfigError;
use message_generator::MessageFormat;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 61613;
pub const DEFAULT_COUNT: u64 = 10;
pub const DEFAULT_SIZE: usize = 1024;
pub const DEFAULT_RATE: f64 = 1.0;

/// Everything a run needs, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SendConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub queue: String,
    /// Number of messages to send
    pub count: u64,
    /// Approximate body size in bytes
    pub size: usize,
    /// Messages per second
    pub rate: f64,
    pub format: MessageFormat,
    /// Generate messages without contacting a broker
    pub dry_run: bool,
}

impl SendConfig {
    /// A configuration with every optional setting at its default.
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            queue: queue.into(),
            count: DEFAULT_COUNT,
            size: DEFAULT_SIZE,
            rate: DEFAULT_RATE,
            format: MessageFormat::default(),
            dry_run: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.is_empty() {
            return Err(ConfigError::EmptyQueue);
        }
        validate_rate(self.rate)?;
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// STOMP destination for the configured queue.
    pub fn destination(&self) -> String {
        format!("/queue/{}", self.queue)
    }

    /// Pause between consecutive sends.
    pub fn send_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.rate).unwrap_or(Duration::MAX)
    }

    /// Login and passcode, only when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// True when exactly one of username/password was given.
    pub fn has_partial_credentials(&self) -> bool {
        self.username.is_some() != self.password.is_some()
    }
}

pub(crate) fn validate_rate(rate: f64) -> Result<f64, ConfigError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidRate(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SendConfig::new("orders");

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 61613);
        assert_eq!(config.count, 10);
        assert_eq!(config.size, 1024);
        assert_eq!(config.rate, 1.0);
        assert_eq!(config.format, MessageFormat::Json);
        assert!(config.username.is_none());
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_rate_and_queue() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SendConfig {
                rate,
                ..SendConfig::new("orders")
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidRate(_))));
        }

        let config = SendConfig::new("");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyQueue)));
    }

    #[test]
    fn test_send_interval() {
        let config = SendConfig {
            rate: 10.0,
            ..SendConfig::new("orders")
        };
        assert_eq!(config.send_interval(), Duration::from_millis(100));

        let config = SendConfig {
            rate: 0.5,
            ..SendConfig::new("orders")
        };
        assert_eq!(config.send_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_destination_and_addr() {
        let config = SendConfig {
            host: "mq.internal".to_string(),
            port: 61614,
            ..SendConfig::new("orders.in")
        };

        assert_eq!(config.destination(), "/queue/orders.in");
        assert_eq!(config.addr(), "mq.internal:61614");
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let mut config = SendConfig::new("orders");
        assert_eq!(config.credentials(), None);
        assert!(!config.has_partial_credentials());

        config.username = Some("admin".to_string());
        assert_eq!(config.credentials(), None);
        assert!(config.has_partial_credentials());

        config.password = Some("admin".to_string());
        assert_eq!(config.credentials(), Some(("admin", "admin")));
        assert!(!config.has_partial_credentials());
    }
}
