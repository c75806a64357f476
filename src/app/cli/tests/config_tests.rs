//! Tests for TOML configuration loading and merging

use crate::app::cli::config::*;
use crate::app::cli::Args;
use crate::core::error_handling::ContextualError;
use crate::monitor::AverageWaitModel;
use clap::Parser;
use std::io::Write;

fn table(text: &str) -> toml::Table {
    toml::from_str(text).unwrap()
}

#[test]
fn test_apply_all_supported_keys() {
    let config = table(
        r#"
        messages = 300
        capacity = 50
        update-period = 2
        duration = 12.5
        seed = 99
        avg-wait-model = "running-mean"
        stats-file = "stats.txt"
        log-level = "debug"
        log-format = "json"
        no-color = true

        [[sender]]
        failure-rate = 0.5
        mean-wait = 2.0

        [[sender]]
        mean-wait = 4
        "#,
    );
    let mut args = Args::default();

    apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.messages, Some(300));
    assert_eq!(args.capacity, Some(50));
    assert_eq!(args.update_period, Some(2.0));
    assert_eq!(args.duration, Some(12.5));
    assert_eq!(args.seed, Some(99));
    assert_eq!(args.avg_wait_model, Some(AverageWaitModel::RunningMean));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.color_choice(), Some(false));
    assert_eq!(args.senders.len(), 2);
    assert_eq!(args.senders[0].failure_rate, 0.5);
    // Missing failure-rate falls back to the default sender's
    assert_eq!(args.senders[1].failure_rate, 0.25);
    assert_eq!(args.senders[1].mean_wait_secs, 4.0);
}

#[test]
fn test_range_checks_are_left_to_components() {
    let config = table(
        r#"
        messages = 1
        update-period = 0.5

        [[sender]]
        failure-rate = 1.5
        mean-wait = 1.0
        "#,
    );
    let mut args = Args::default();

    apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.messages, Some(1));
    assert_eq!(args.senders[0].failure_rate, 1.5);
}

#[test]
fn test_wrong_types_rejected() {
    let cases = [
        "messages = \"many\"",
        "messages = -4",
        "update-period = \"soon\"",
        "seed = 1.5",
        "avg-wait-model = \"median\"",
        "sender = 3",
        "duration = 0",
        "duration = inf",
        "duration = 1e30",
        "[[sender]]\nfailure-rate = \"high\"",
    ];

    for case in cases {
        let mut args = Args::default();
        let err = apply_toml_values(&mut args, &table(case)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "case: {}", case);
        assert!(err.is_user_actionable());
        assert!(err.to_string().starts_with("Invalid value for"), "case: {}", case);
    }
}

#[test]
fn test_resolve_args_command_line_wins() {
    let config = table("messages = 300\nupdate-period = 4.0\n");
    let cli = Args::try_parse_from(["sendsim", "--messages", "30"]).unwrap();

    let args = resolve_args(cli, Some(&config)).unwrap();

    assert_eq!(args.messages, Some(30));
    assert_eq!(args.update_period, Some(4.0));
}

#[tokio::test]
async fn test_load_explicit_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "messages = 12").unwrap();

    let (path, table) = load_config_file(Some(file.path())).await.unwrap().unwrap();

    assert_eq!(path, file.path());
    assert_eq!(table.get("messages").and_then(|v| v.as_integer()), Some(12));
}

#[tokio::test]
async fn test_missing_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    match load_config_file(Some(&missing)).await {
        Err(err @ ConfigError::NotFound { .. }) => {
            assert!(err.is_user_actionable());
            assert!(err.user_message().unwrap().contains("does not exist"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "messages = [unclosed").unwrap();

    let result = load_config_file(Some(file.path())).await;
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_default_config_path_location() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("Sendsim/sendsim.toml"));
    }
}
