//! Monitor Component
//!
//! Aggregates success, failure and wait statistics reported by the senders
//! and displays them on a fixed period.
//!
//! # Locking protocol
//!
//! ```text
//!   Sender 1 ──┐ register (unbounded wait, once)
//!   Sender 2 ──┼──────────────────────────────▶ ┌──────────────────────┐
//!   Sender 3 ──┘ flush (bounded by period)      │ Mutex<MonitorStats>  │
//!                                               └──────────┬───────────┘
//!                                    display tick (period) │ snapshot
//!                                                          ▼
//!                                                    DisplaySink
//! ```
//!
//! A sender whose flush times out keeps its tally and retries after its
//! next message, so contributions are delayed but never dropped.

mod display;
#[allow(clippy::module_inception)]
mod monitor;
mod stats;

#[cfg(test)]
pub(crate) use display::SnapshotRecorder;
pub use display::{ConsoleSink, DisplaySink, WriterSink};
pub use monitor::{Monitor, MonitorConfig, Registration, DEFAULT_UPDATE_PERIOD_SECS};
pub use stats::{AverageWaitModel, MonitorSnapshot, MonitorStats, StatsDelta};
