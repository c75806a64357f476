//! Tests for CLI argument parsing and pipeline configuration mapping

use crate::app::cli::args::*;
use crate::monitor::AverageWaitModel;
use crate::sender::SenderConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

static COMMAND_NAME: &str = "sendsim";

fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
    let mut argv = vec![COMMAND_NAME];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv)
}

#[test]
fn test_no_arguments_gives_default_topology() {
    let args = parse(&[]).unwrap();
    let config = args.pipeline_config();

    assert_eq!(args, Args::default());
    assert_eq!(config.producer.msg_count, 1000);
    assert_eq!(config.monitor.update_period_secs, 5.0);
    assert_eq!(config.senders.len(), 3);
    assert_eq!(args.run_duration(), None);
}

#[test]
fn test_repeated_senders_replace_defaults() {
    let args = parse(&["--sender", "0.1:2", "-s", "0:1.5"]).unwrap();

    assert_eq!(
        args.senders,
        vec![
            SenderConfig {
                failure_rate: 0.1,
                mean_wait_secs: 2.0,
            },
            SenderConfig {
                failure_rate: 0.0,
                mean_wait_secs: 1.5,
            },
        ]
    );
    assert_eq!(args.pipeline_config().senders.len(), 2);
}

#[test]
fn test_out_of_range_values_rejected_at_parse_time() {
    assert!(parse(&["--messages", "1"]).is_err());
    assert!(parse(&["--update-period", "0.5"]).is_err());
    assert!(parse(&["--sender", "1.5:1.0"]).is_err());
    assert!(parse(&["--sender", "0.5:0.5"]).is_err());
    assert!(parse(&["--sender", "0.5"]).is_err());
    assert!(parse(&["--capacity", "0"]).is_err());
    assert!(parse(&["--duration", "-3"]).is_err());
    assert!(parse(&["--avg-wait-model", "median"]).is_err());
}

#[test]
fn test_oversized_seconds_rejected_at_parse_time() {
    assert!(parse(&["--duration", "1e30"]).is_err());
    assert!(parse(&["--duration", "inf"]).is_err());
    assert!(parse(&["--update-period", "1e20"]).is_err());
    assert!(parse(&["--sender", "0.25:1e20"]).is_err());
}

#[test]
fn test_run_duration_ignores_unrepresentable_value() {
    let args = Args {
        duration: Some(1e30),
        ..Args::default()
    };

    assert_eq!(args.run_duration(), None);
}

#[test]
fn test_pipeline_config_mapping() {
    let args = parse(&[
        "--messages",
        "40",
        "--capacity",
        "8",
        "--update-period",
        "2.5",
        "--avg-wait-model",
        "running-mean",
        "--seed",
        "11",
        "--duration",
        "90",
    ])
    .unwrap();
    let config = args.pipeline_config();

    assert_eq!(config.producer.msg_count, 40);
    assert_eq!(config.producer.queue_capacity(), 8);
    assert_eq!(config.monitor.update_period_secs, 2.5);
    assert_eq!(config.monitor.avg_wait_model, AverageWaitModel::RunningMean);
    assert_eq!(config.seed, Some(11));
    assert_eq!(args.run_duration(), Some(Duration::from_secs(90)));
}

#[test]
fn test_color_flags() {
    assert_eq!(parse(&["--color"]).unwrap().color_choice(), Some(true));
    assert_eq!(parse(&["--no-color"]).unwrap().color_choice(), Some(false));
    assert_eq!(parse(&[]).unwrap().color_choice(), None);
    assert!(parse(&["--color", "--no-color"]).is_err());
    assert!(!parse(&["--no-color"]).unwrap().color_enabled());
}

#[test]
fn test_log_file_none_disables_file() {
    let args = parse(&["--log-file", "none"]).unwrap();
    assert_eq!(args.log_file_path(), None);

    let args = parse(&["--log-file", "run.log"]).unwrap();
    assert_eq!(args.log_file_path(), Some(&PathBuf::from("run.log")));
}

#[test]
fn test_merge_prefers_command_line() {
    let mut file_args = Args {
        messages: Some(200),
        update_period: Some(3.0),
        senders: vec![SenderConfig::default()],
        log_level: Some("debug".to_string()),
        no_color: true,
        ..Args::default()
    };
    let cli = parse(&["--messages", "20", "--color"]).unwrap();

    file_args.merge_from(cli);

    assert_eq!(file_args.messages, Some(20));
    assert_eq!(file_args.update_period, Some(3.0));
    assert_eq!(file_args.senders.len(), 1);
    assert_eq!(file_args.log_level.as_deref(), Some("debug"));
    assert_eq!(file_args.color_choice(), Some(true));
}
