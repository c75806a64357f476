//! Sender Component
//!
//! Competing consumers of the message queue. Each sender simulates a
//! transmission per message and reports its outcomes to the monitor.
//!
//! # Per-message cycle
//!
//! ```text
//!   pop ──▶ sleep(Normal(mean, mean/3) > 0) ──▶ draw outcome ──▶ tally
//!    ▲                                                            │
//!    │          try_lock_for(flush timeout)                       ▼
//!    └─────────── ok: apply tally, reset ◀──────────────── flush attempt
//!                 timeout: keep tally for next time
//! ```

#[allow(clippy::module_inception)]
mod sender;
mod simulation;

pub use sender::{Sender, SenderConfig, SenderSummary};
pub use simulation::{draw_outcome, Outcome, SenderTally, WaitModel};
