//! CLI argument definitions.

use crate::config::{validate_rate, SendConfig};
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, ValueEnum};
use message_generator::MessageFormat;

#[derive(Parser, Clone, Debug)]
#[command(name = "activemq-producer")]
#[command(version, about = "Send synthetic test messages to an ActiveMQ queue over STOMP")]
#[command(long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub message: MessageArgs,

    /// Generate and print messages without connecting to the broker
    #[arg(long)]
    pub dry_run: bool,
}

/// Broker connection arguments.
#[derive(Args, Clone, Debug)]
pub struct ConnectionArgs {
    /// Broker host
    #[arg(long, env = "STOMP_HOST", default_value = "localhost")]
    pub host: String,

    /// Broker STOMP port
    #[arg(long, env = "STOMP_PORT", default_value = "61613")]
    pub port: u16,

    /// Broker username (sent only together with --password)
    #[arg(long, env = "STOMP_USERNAME")]
    pub username: Option<String>,

    /// Broker password (sent only together with --username)
    #[arg(long, env = "STOMP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Message stream arguments.
#[derive(Args, Clone, Debug)]
pub struct MessageArgs {
    /// Queue name to send messages to
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub queue: String,

    /// Number of messages to send
    #[arg(long, default_value = "10")]
    pub count: u64,

    /// Approximate size of each message in bytes
    #[arg(long, default_value = "1024")]
    pub size: usize,

    /// Message send rate (messages per second)
    #[arg(long, default_value = "1.0", value_parser = parse_rate)]
    pub rate: f64,

    /// Message format
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

/// Accepted `--format` values. Matching is case-sensitive.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Xml,
}

impl From<FormatArg> for MessageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => MessageFormat::Json,
            FormatArg::Xml => MessageFormat::Xml,
        }
    }
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    validate_rate(rate).map_err(|e| e.to_string())
}

impl From<Cli> for SendConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.connection.host,
            port: cli.connection.port,
            username: cli.connection.username,
            password: cli.connection.password,
            queue: cli.message.queue,
            count: cli.message.count,
            size: cli.message.size,
            rate: cli.message.rate,
            format: cli.message.format.into(),
            dry_run: cli.dry_run,
        }
    }
}

/// Parse command-line arguments into a [`SendConfig`].
///
/// `--help` and `--version` come back as errors too; `clap::Error::exit`
/// prints them and uses the right status.
pub fn parse_config<I, T>(args: I) -> Result<SendConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map(SendConfig::from)
}
