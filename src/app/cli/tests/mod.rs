//! Tests for the CLI module
//!
//! Argument parsing and the TOML merge rules, kept apart from the
//! implementation files.

pub mod args_tests;
pub mod config_tests;
