//! Pipeline Assembly
//!
//! Wires one producer, one bounded queue, one monitor and any number of
//! senders into a running topology.
//!
//! # Lifecycle
//!
//! ```text
//!   PipelineConfig
//!        │ Topology::build      (invalid components logged and skipped)
//!        ▼
//!   Topology ── spawn(coordinator, sink) ──▶ RunningTopology
//!                                                 │ shutdown broadcast
//!                                                 ▼
//!                                     join() ──▶ RunSummary
//! ```
//!
//! Every topology owns a freshly built queue and monitor, so two topologies
//! in one process never share counters.

pub mod config;
pub mod error;
mod topology;

pub use config::{default_senders, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use topology::{RunSummary, RunningTopology, Topology};

#[cfg(test)]
mod tests;
