//! Command-line interface for activemq-producer
//!
//! ```bash
//! activemq-producer --queue orders --count 10 --size 1024 --rate 1 --format json
//! ```
//!
//! Exit status: 0 when every message was sent, 2 for usage errors, 1 for
//! connection/send failures, 130 when interrupted.

use activemq_producer::{
    execute, parse_config, DryRunBroker, PublishError, SendConfig, StompBroker,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match parse_config(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(config).await {
        eprintln!("Error: {e:#}");
        let code = e
            .downcast_ref::<PublishError>()
            .map_or(1, PublishError::exit_code);
        std::process::exit(code);
    }
}

async fn run(config: SendConfig) -> anyhow::Result<()> {
    // Branch once on the broker type; the run itself is monomorphized.
    if config.dry_run {
        execute(config, DryRunBroker::new(), shutdown_signal()).await?;
    } else {
        let broker = StompBroker::from_config(&config);
        execute(config, broker, shutdown_signal()).await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: never interrupt.
        std::future::pending::<()>().await;
    }
}
