//! Test modules for topology assembly and end-to-end pipeline runs
//!
//! Scenarios run on Tokio's paused clock, so minutes of simulated waiting
//! finish instantly and deterministically.
