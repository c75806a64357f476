//! CLI argument parsing tests
//!
//! Exercised through the public API the binary uses.

use clap::Parser;
use sendsim::app::cli::Args;
use sendsim::monitor::AverageWaitModel;
use sendsim::pipeline::Topology;

static COMMAND_NAME: &str = "sendsim";

#[test]
fn test_full_command_line() {
    let args = Args::try_parse_from([
        COMMAND_NAME,
        "-m",
        "25",
        "-q",
        "5",
        "-u",
        "1",
        "-s",
        "0.25:1.0",
        "-s",
        "0:3",
        "--avg-wait-model",
        "recurrence",
        "--seed",
        "4",
        "--log-level",
        "debug",
        "--log-format",
        "ext",
    ])
    .unwrap();

    let config = args.pipeline_config();
    assert_eq!(config.producer.msg_count, 25);
    assert_eq!(config.producer.queue_capacity(), 5);
    assert_eq!(config.monitor.update_period_secs, 1.0);
    assert_eq!(config.monitor.avg_wait_model, AverageWaitModel::Recurrence);
    assert_eq!(config.senders.len(), 2);
    assert_eq!(config.senders[1].mean_wait_secs, 3.0);

    let topology = Topology::build(&config);
    assert!(topology.errors().is_empty());
    assert_eq!(topology.sender_count(), 2);
}

#[test]
fn test_invalid_values_name_the_option() {
    let err = Args::try_parse_from([COMMAND_NAME, "--update-period", "0.5"]).unwrap_err();
    let rendered = err.to_string();

    assert!(rendered.contains("--update-period"));
    assert!(rendered.contains("at least 1.0 seconds"));
}

#[test]
fn test_unknown_log_format_rejected() {
    assert!(Args::try_parse_from([COMMAND_NAME, "--log-format", "xml"]).is_err());
}

#[test]
fn test_help_and_version_are_available() {
    let help = Args::try_parse_from([COMMAND_NAME, "--help"]).unwrap_err();
    assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    assert!(help.to_string().contains("FAILURE_RATE:MEAN_WAIT"));

    let version = Args::try_parse_from([COMMAND_NAME, "--version"]).unwrap_err();
    assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
}
