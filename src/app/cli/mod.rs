//! Command line and configuration file handling

pub mod args;
pub mod config;

pub use args::Args;
pub use config::{apply_toml_values, default_config_path, load_config_file, resolve_args, ConfigError};

#[cfg(test)]
mod tests;
