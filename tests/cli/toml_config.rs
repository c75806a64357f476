//! CLI TOML configuration tests
//!
//! Configuration files on disk, merged with command line overrides.

use clap::Parser;
use sendsim::app::cli::{load_config_file, resolve_args, Args, ConfigError};
use sendsim::pipeline::{PipelineError, Topology};
use std::io::Write;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_config_file_drives_topology() {
    let file = write_config(
        r#"
messages = 60
update-period = 1.5

[[sender]]
failure-rate = 0.1
mean-wait = 1.0
"#,
    );
    let cli = Args::try_parse_from(["sendsim", "--config-file", file.path().to_str().unwrap()]).unwrap();

    let (_, table) = load_config_file(cli.config_file.as_deref()).await.unwrap().unwrap();
    let args = resolve_args(cli, Some(&table)).unwrap();
    let config = args.pipeline_config();

    assert_eq!(config.producer.msg_count, 60);
    assert_eq!(config.monitor.update_period_secs, 1.5);
    assert_eq!(config.senders.len(), 1);
    assert_eq!(Topology::build(&config).sender_count(), 1);
}

#[tokio::test]
async fn test_command_line_overrides_file() {
    let file = write_config("messages = 60\nseed = 5\n[[sender]]\nmean-wait = 2.0\n");
    let cli = Args::try_parse_from([
        "sendsim",
        "-c",
        file.path().to_str().unwrap(),
        "--messages",
        "9",
        "--sender",
        "0:1",
        "--sender",
        "0:1",
    ])
    .unwrap();

    let (_, table) = load_config_file(cli.config_file.as_deref()).await.unwrap().unwrap();
    let args = resolve_args(cli, Some(&table)).unwrap();

    assert_eq!(args.messages, Some(9));
    assert_eq!(args.seed, Some(5));
    assert_eq!(args.senders.len(), 2);
}

#[tokio::test]
async fn test_invalid_sender_in_file_only_skips_that_sender() {
    let file = write_config(
        r#"
[[sender]]
failure-rate = 1.5
mean-wait = 1.0

[[sender]]
failure-rate = 0.0
mean-wait = 2.0
"#,
    );

    let (_, table) = load_config_file(Some(file.path())).await.unwrap().unwrap();
    let args = resolve_args(Args::default(), Some(&table)).unwrap();
    let topology = Topology::build(&args.pipeline_config());

    assert_eq!(topology.sender_count(), 1);
    assert_eq!(topology.errors().len(), 1);
    assert!(matches!(
        &topology.errors()[0],
        PipelineError::Configuration { component, .. } if component == "sender-1"
    ));
}

#[tokio::test]
async fn test_bad_types_in_file_reported() {
    let file = write_config("update-period = \"fast\"\n");

    let (_, table) = load_config_file(Some(file.path())).await.unwrap().unwrap();
    let result = resolve_args(Args::default(), Some(&table));

    assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "update-period"));
}
