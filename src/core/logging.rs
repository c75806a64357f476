//! Logging backend setup on top of flexi_logger
//!
//! All modules log through the `log` facade; this module installs the
//! backend once at startup with one of the supported line formats.

use std::sync::{Mutex, OnceLock};

// Keeps the flexi_logger handle alive for the lifetime of the process
static LOGGER_HANDLE: OnceLock<Mutex<flexi_logger::LoggerHandle>> = OnceLock::new();

/// Initialise logging
///
/// * `log_level` - flexi_logger spec string, defaults to `info`
/// * `log_format` - `text` (default), `ext` or `json`
/// * `log_file` - optional file path; console output is used otherwise
/// * `color_enabled` - colour the level and timestamp in text formats
pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let level_str = log_level.unwrap_or("info");
    let format_type = log_format.unwrap_or("text");

    let mut logger = Logger::try_with_str(level_str)?;

    logger = match (format_type, color_enabled) {
        ("json", _) => logger.format(json_format),
        ("ext", true) => logger.format(extended_color_format),
        ("ext", false) => logger.format(extended_format),
        (_, true) => logger.format(simple_color_format),
        (_, false) => logger.format(simple_format),
    };

    if let Some(file_path) = log_file {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    } else {
        // Keep stdout for the periodic statistics display
        logger = logger.log_to_stderr();
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));

    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::*;

    let level_colored = match record.level() {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    };

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored,
        record.args()
    )
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message (sender/sender.rs:42)"
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let target_formatted = format_target_as_path(record.target(), record.line());

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        target_formatted
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::*;

    let level_colored = match record.level() {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    };

    let target_formatted = format_target_as_path(record.target(), record.line());

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored,
        record.args(),
        target_formatted.dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use serde_json::{json, to_string};

    let json_obj = json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line())
    });

    match to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// sendsim::sender::sender -> sender/sender.rs:<line>
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = if let Some(without_prefix) = target.strip_prefix("sendsim::") {
        without_prefix.replace("::", "/") + ".rs"
    } else {
        target.replace("::", "/")
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexi_logger::DeferredNow;

    fn render(
        formatter: fn(
            &mut dyn std::io::Write,
            &mut DeferredNow,
            &log::Record,
        ) -> Result<(), std::io::Error>,
        target: &str,
    ) -> String {
        let mut buffer = Vec::new();
        let mut now = DeferredNow::new();
        let record = log::Record::builder()
            .level(log::Level::Info)
            .target(target)
            .line(Some(42))
            .args(format_args!("Sender 1 registered"))
            .build();

        formatter(&mut buffer, &mut now, &record).expect("format should succeed");
        String::from_utf8(buffer).expect("Output should be valid UTF-8")
    }

    #[test]
    fn test_format_target_as_path() {
        assert_eq!(
            format_target_as_path("sendsim::sender::sender", Some(42)),
            "sender/sender.rs:42"
        );
        assert_eq!(
            format_target_as_path("tokio::runtime", None),
            "tokio/runtime"
        );
    }

    #[test]
    fn test_simple_format_omits_target() {
        let output = render(simple_format, "sendsim::sender::sender");

        assert!(output.contains("INF Sender 1 registered"), "got: {}", output);
        assert!(!output.contains("sender.rs"));
    }

    #[test]
    fn test_extended_format_includes_target() {
        let output = render(extended_format, "sendsim::monitor::monitor");

        assert!(output.contains("INF Sender 1 registered"), "got: {}", output);
        assert!(output.ends_with("(monitor/monitor.rs:42)"), "got: {}", output);
    }

    #[test]
    fn test_json_format_is_valid_json() {
        let output = render(json_format, "sendsim::producer::producer");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(value["level"], "INF");
        assert_eq!(value["message"], "Sender 1 registered");
        assert_eq!(value["target"], "producer/producer.rs:42");
    }

    #[test]
    fn test_logger_spec_accepts_supported_levels() {
        for level in ["trace", "debug", "info", "warn", "error", "off"] {
            assert!(flexi_logger::Logger::try_with_str(level).is_ok());
        }
    }
}
