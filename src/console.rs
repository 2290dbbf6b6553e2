//! Console banner and summary.

use crate::config::SendConfig;
use crate::publisher::PublishReport;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_banner(config: &SendConfig) {
    println!("{}", rule());
    println!("ActiveMQ Message Producer");
    println!("{}", rule());
    for line in banner_lines(config) {
        println!("{line}");
    }
    println!("{}", rule());
}

pub fn print_summary(report: &PublishReport) {
    println!("{}", rule());
    for line in summary_lines(report) {
        println!("{line}");
    }
    println!("{}", rule());
}

fn banner_lines(config: &SendConfig) -> Vec<String> {
    let mut lines = vec![
        "Configuration:".to_string(),
        format!("  Host:     {}", config.addr()),
        format!("  Queue:    {}", config.queue),
        format!("  Count:    {} messages", config.count),
        format!("  Size:     {} bytes", config.size),
        format!("  Rate:     {} msg/sec", config.rate),
        format!("  Format:   {}", config.format.as_str().to_uppercase()),
    ];
    if config.credentials().is_some() {
        lines.push(format!(
            "  Login:    {}",
            config.username.as_deref().unwrap_or_default()
        ));
    }
    if config.dry_run {
        lines.push("  Mode:     dry run (no broker connection)".to_string());
    }
    lines
}

fn summary_lines(report: &PublishReport) -> Vec<String> {
    vec![
        "Summary:".to_string(),
        format!("  Messages sent:     {}/{}", report.sent, report.requested),
        format!("  Bytes sent:        {}", report.bytes_sent),
        format!("  Total time:        {:.2} seconds", report.elapsed.as_secs_f64()),
        format!("  Actual rate:       {:.2} msg/sec", report.messages_per_second()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_generator::MessageFormat;
    use std::time::Duration;

    #[test]
    fn test_banner_lines() {
        let config = SendConfig {
            username: Some("admin".to_string()),
            password: Some("hunter2".to_string()),
            format: MessageFormat::Xml,
            ..SendConfig::new("orders")
        };
        let lines = banner_lines(&config);

        assert!(lines.contains(&"  Host:     localhost:61613".to_string()));
        assert!(lines.contains(&"  Format:   XML".to_string()));
        assert!(lines.contains(&"  Login:    admin".to_string()));
        assert!(!lines.iter().any(|l| l.contains("hunter2")));
    }

    #[test]
    fn test_summary_lines() {
        let report = PublishReport {
            requested: 10,
            sent: 10,
            bytes_sent: 10_240,
            elapsed: Duration::from_secs(5),
        };
        let lines = summary_lines(&report);

        assert!(lines.contains(&"  Messages sent:     10/10".to_string()));
        assert!(lines.contains(&"  Total time:        5.00 seconds".to_string()));
        assert!(lines.contains(&"  Actual rate:       2.00 msg/sec".to_string()));
    }
}
