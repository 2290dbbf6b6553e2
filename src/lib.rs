//! ActiveMQ message producer.
//!
//! Publishes a stream of synthetic JSON or XML messages to a queue over
//! STOMP at a fixed rate, for exercising brokers and their consumers.
//!
//! ```text
//! argv ──► SendConfig ──► Publisher<B: Broker>
//!                            │ connect
//!                            │ repeat count times:
//!                            │   PayloadGenerator ─► send ─► pause 1/rate
//!                            │ disconnect
//!                            ▼
//!                      PublishReport
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # 100 JSON messages of ~2 KiB at 5 msg/sec
//! activemq-producer --queue orders --count 100 --size 2048 --rate 5
//!
//! # XML messages to a secured broker
//! activemq-producer --host mq.internal --username admin --password admin \
//!   --queue invoices --format xml
//!
//! # Preview the generated messages without a broker
//! activemq-producer --queue orders --count 3 --dry-run
//! ```

pub mod args;
pub mod broker;
pub mod config;
pub mod console;
pub mod error;
pub mod publisher;
pub mod rate;

use std::future::Future;
use tracing::warn;

pub use args::{parse_config, Cli};
pub use broker::{Broker, DryRunBroker, StompBroker};
pub use config::SendConfig;
pub use error::{ConfigError, PublishError};
pub use message_generator::MessageFormat;
pub use publisher::{PublishReport, Publisher};

/// Run a full producer session: banner, publish loop, summary.
pub async fn execute<B, S>(
    config: SendConfig,
    broker: B,
    shutdown: S,
) -> Result<PublishReport, PublishError>
where
    B: Broker,
    S: Future<Output = ()>,
{
    console::print_banner(&config);
    if config.has_partial_credentials() {
        warn!("Only one of username/password was given; connecting without credentials");
        eprintln!(
            "Warning: both --username and --password are required for authentication; connecting without credentials"
        );
    }

    let mut publisher = Publisher::new(config, broker)?;
    let report = publisher.run(shutdown).await?;
    console::print_summary(&report);
    Ok(report)
}
