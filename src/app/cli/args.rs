//! Command line arguments
//!
//! Every option can also be set from the TOML configuration file; see
//! [`super::config`] for how the two sources are merged.

use crate::core::validation::{
    parse_sender_spec, validate_message_count, validate_min_seconds, validate_positive_int,
    validate_run_duration, MIN_PERIOD_SECS,
};
use crate::monitor::AverageWaitModel;
use crate::pipeline::PipelineConfig;
use crate::sender::SenderConfig;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "sendsim")]
#[command(about = "Bounded-queue message sending simulator")]
#[command(version)]
#[command(after_help = " * can be specified multiple times")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Number of messages the producer generates (minimum: 2)
    #[arg(short = 'm', long = "messages", value_name = "COUNT", value_parser = parse_message_count)]
    pub messages: Option<usize>,

    /// Queue capacity (default: the message count)
    #[arg(short = 'q', long = "capacity", value_name = "SIZE", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Seconds between statistics refreshes (minimum: 1.0)
    #[arg(short = 'u', long = "update-period", value_name = "SECONDS", value_parser = parse_update_period)]
    pub update_period: Option<f64>,

    /// Sender with its failure rate and mean wait in seconds*
    #[arg(
        short = 's',
        long = "sender",
        value_name = "FAILURE_RATE:MEAN_WAIT",
        action = ArgAction::Append,
        value_parser = parse_sender
    )]
    pub senders: Vec<SenderConfig>,

    /// How the average wait is computed
    #[arg(long = "avg-wait-model", value_name = "MODEL", value_parser = parse_avg_wait_model)]
    pub avg_wait_model: Option<AverageWaitModel>,

    /// Stop after this many seconds instead of waiting for a signal
    #[arg(short = 'd', long = "duration", value_name = "SECONDS", value_parser = parse_duration)]
    pub duration: Option<f64>,

    /// Seed for reproducible message generation and sender behaviour
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Write statistics to this file instead of standard output
    #[arg(long = "stats-file", value_name = "FILE")]
    pub stats_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to log to standard error)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_message_count(value: &str) -> Result<usize, String> {
    let count = value
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid message count", value))?;
    validate_message_count(count)
}

fn parse_update_period(value: &str) -> Result<f64, String> {
    let secs = value
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    validate_min_seconds("update period", secs, MIN_PERIOD_SECS)
}

fn parse_duration(value: &str) -> Result<f64, String> {
    let secs = value
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    validate_run_duration(secs)
}

fn parse_sender(value: &str) -> Result<SenderConfig, String> {
    let (failure_rate, mean_wait_secs) = parse_sender_spec(value)?;
    Ok(SenderConfig {
        failure_rate,
        mean_wait_secs,
    })
}

fn parse_avg_wait_model(value: &str) -> Result<AverageWaitModel, String> {
    value.parse()
}

impl Args {
    /// Resolve the color flags: `Some` when forced either way, `None` for auto
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Color enabled when forced on, or when stderr is a terminal
    pub fn color_enabled(&self) -> bool {
        self.color_choice()
            .unwrap_or_else(|| std::io::IsTerminal::is_terminal(&std::io::stderr()))
    }

    /// Log file path, with the 'none' and '-' values meaning no file
    pub fn log_file_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref().filter(|path| {
            let text = path.to_string_lossy();
            !(text.eq_ignore_ascii_case("none") || text == "-")
        })
    }

    /// Run duration, `None` when the run waits for a signal
    ///
    /// Values are range-checked by the parsers; one that still does not fit
    /// a `Duration` is ignored rather than trusted.
    pub fn run_duration(&self) -> Option<Duration> {
        self.duration
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Overlay every option set on `cli` onto these (file-derived) values
    pub fn merge_from(&mut self, cli: Args) {
        if cli.config_file.is_some() {
            self.config_file = cli.config_file;
        }
        if cli.messages.is_some() {
            self.messages = cli.messages;
        }
        if cli.capacity.is_some() {
            self.capacity = cli.capacity;
        }
        if cli.update_period.is_some() {
            self.update_period = cli.update_period;
        }
        if !cli.senders.is_empty() {
            self.senders = cli.senders;
        }
        if cli.avg_wait_model.is_some() {
            self.avg_wait_model = cli.avg_wait_model;
        }
        if cli.duration.is_some() {
            self.duration = cli.duration;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.stats_file.is_some() {
            self.stats_file = cli.stats_file;
        }
        if cli.color || cli.no_color {
            self.color = cli.color;
            self.no_color = cli.no_color;
        }
        if cli.log_level.is_some() {
            self.log_level = cli.log_level;
        }
        if cli.log_format.is_some() {
            self.log_format = cli.log_format;
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file;
        }
    }

    /// Build the pipeline configuration, falling back to the default topology
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();

        if let Some(messages) = self.messages {
            config.producer.msg_count = messages;
        }
        config.producer.capacity = self.capacity;
        if let Some(period) = self.update_period {
            config.monitor.update_period_secs = period;
        }
        if let Some(model) = self.avg_wait_model {
            config.monitor.avg_wait_model = model;
        }
        if !self.senders.is_empty() {
            config.senders = self.senders.clone();
        }
        config.seed = self.seed;

        config
    }
}
