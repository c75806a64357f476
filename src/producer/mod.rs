//! Producer Component
//!
//! Generates a fixed number of random messages and pushes them into the
//! bounded queue at a throttled rate. A full queue is not an error: the
//! producer waits one throttle interval and tries again.

#[allow(clippy::module_inception)]
mod producer;

pub use producer::{Producer, ProducerConfig, ProducerSummary, DEFAULT_MESSAGE_COUNT, DEFAULT_THROTTLE};
