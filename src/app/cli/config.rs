//! TOML configuration file loading
//!
//! Keys mirror the long command line options. Senders are given as an
//! array of tables:
//!
//! ```toml
//! messages = 500
//! update-period = 2.0
//!
//! [[sender]]
//! failure-rate = 0.25
//! mean-wait = 1.0
//! ```
//!
//! Values are only type-checked here; range checks happen when each
//! pipeline component is built, so one bad sender does not stop the others.
//! The run duration belongs to no component and is range-checked on load.

use super::args::Args;
use crate::core::error_handling::ContextualError;
use crate::core::validation::validate_run_duration;
use crate::sender::SenderConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{message}")]
    NotFound { path: PathBuf, message: String },

    #[error("Error reading configuration file {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Error parsing configuration file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, detail: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: format!("Invalid value for '{}' in configuration file: {}", key, detail),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ConfigError::NotFound { .. } => true,
            ConfigError::Parse { .. } => true,
            ConfigError::InvalidValue { .. } => true,
            ConfigError::Read { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { message, .. } => Some(message),
            ConfigError::Parse { message, .. } => Some(message),
            ConfigError::InvalidValue { message, .. } => Some(message),
            ConfigError::Read { .. } => None,
        }
    }
}

/// `<config dir>/Sendsim/sendsim.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Sendsim").join("sendsim.toml"))
}

/// Load the configuration table
///
/// An explicitly named file must exist. Without one the default location is
/// tried and silently skipped when absent.
pub async fn load_config_file(
    config_file: Option<&Path>,
) -> Result<Option<(PathBuf, toml::Table)>, ConfigError> {
    let path = match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                    message: format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    ),
                });
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;

    Ok(Some((path, table)))
}

/// Combine file values with command line values; the command line wins
pub fn resolve_args(cli: Args, file: Option<&toml::Table>) -> Result<Args, ConfigError> {
    let mut args = Args::default();
    if let Some(table) = file {
        apply_toml_values(&mut args, table)?;
    }
    args.merge_from(cli);
    Ok(args)
}

/// Apply TOML configuration values to Args
pub fn apply_toml_values(args: &mut Args, config: &toml::Table) -> Result<(), ConfigError> {
    if let Some(messages) = get_count(config, "messages")? {
        args.messages = Some(messages);
    }
    if let Some(capacity) = get_count(config, "capacity")? {
        args.capacity = Some(capacity);
    }
    if let Some(period) = get_seconds(config, "update-period")? {
        args.update_period = Some(period);
    }
    if let Some(duration) = get_seconds(config, "duration")? {
        let duration = validate_run_duration(duration)
            .map_err(|message| ConfigError::invalid("duration", message))?;
        args.duration = Some(duration);
    }
    if let Some(seed) = config.get("seed") {
        let seed = seed
            .as_integer()
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| ConfigError::invalid("seed", "expected a non-negative integer"))?;
        args.seed = Some(seed);
    }
    if let Some(model) = get_str(config, "avg-wait-model")? {
        let model = model
            .parse()
            .map_err(|message: String| ConfigError::invalid("avg-wait-model", message))?;
        args.avg_wait_model = Some(model);
    }
    if let Some(senders) = config.get("sender") {
        args.senders = parse_senders(senders)?;
    }
    if let Some(stats_file) = get_str(config, "stats-file")? {
        args.stats_file = Some(PathBuf::from(stats_file));
    }

    if let Some(color) = config.get("color").and_then(|v| v.as_bool()) {
        args.color = color;
        args.no_color = !color;
    }
    if let Some(no_color) = config.get("no-color").and_then(|v| v.as_bool()) {
        args.no_color = no_color;
        args.color = args.color && !no_color;
    }
    if let Some(log_level) = get_str(config, "log-level")? {
        args.log_level = Some(log_level.to_string());
    }
    if let Some(log_format) = get_str(config, "log-format")? {
        args.log_format = Some(log_format.to_string());
    }
    if let Some(log_file) = get_str(config, "log-file")? {
        args.log_file = Some(PathBuf::from(log_file));
    }

    Ok(())
}

fn get_str<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, "expected a string")),
    }
}

fn get_count(config: &toml::Table, key: &str) -> Result<Option<usize>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, "expected a non-negative integer")),
    }
}

/// Seconds may be written as a float or an integer
fn number(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|n| n as f64))
}

fn get_seconds(config: &toml::Table, key: &str) -> Result<Option<f64>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => number(value)
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, "expected a number of seconds")),
    }
}

fn parse_senders(value: &toml::Value) -> Result<Vec<SenderConfig>, ConfigError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ConfigError::invalid("sender", "expected an array of [[sender]] tables"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let key = format!("sender[{}]", index);
            let table = entry
                .as_table()
                .ok_or_else(|| ConfigError::invalid(&key, "expected a table"))?;
            let defaults = SenderConfig::default();

            let failure_rate = match table.get("failure-rate") {
                Some(v) => number(v)
                    .ok_or_else(|| ConfigError::invalid(&key, "failure-rate must be a number"))?,
                None => defaults.failure_rate,
            };
            let mean_wait_secs = match table.get("mean-wait") {
                Some(v) => number(v)
                    .ok_or_else(|| ConfigError::invalid(&key, "mean-wait must be a number"))?,
                None => defaults.mean_wait_secs,
            };

            Ok(SenderConfig {
                failure_rate,
                mean_wait_secs,
            })
        })
        .collect()
}
