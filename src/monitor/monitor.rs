//! Monitor - central aggregation point for sender statistics
//!
//! Senders register once (unbounded lock wait) and then flush their tallies
//! with a bounded lock wait. The display task prints a snapshot every
//! `update_period` while holding the same lock.

use crate::core::validation::{seconds_to_duration, validate_min_seconds, MIN_PERIOD_SECS};
use crate::monitor::display::DisplaySink;
use crate::monitor::stats::{AverageWaitModel, MonitorSnapshot, MonitorStats};
use crate::pipeline::error::{PipelineError, PipelineResult};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tokio::time::{interval, timeout, MissedTickBehavior};

/// Default seconds between display refreshes
pub const DEFAULT_UPDATE_PERIOD_SECS: f64 = 5.0;

/// Monitor construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Seconds between display refreshes; also each sender's flush timeout
    pub update_period_secs: f64,
    pub avg_wait_model: AverageWaitModel,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_period_secs: DEFAULT_UPDATE_PERIOD_SECS,
            avg_wait_model: AverageWaitModel::default(),
        }
    }
}

/// Result of a sender's one-time registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Sender count after this registration
    pub sender_number: usize,
    /// Budget for each bounded flush attempt
    pub flush_timeout: Duration,
}

/// Shared statistics under a single lock plus the display schedule
#[derive(Debug)]
pub struct Monitor {
    update_period: Duration,
    stats: Mutex<MonitorStats>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> PipelineResult<Self> {
        let update_period =
            validate_min_seconds("update period", config.update_period_secs, MIN_PERIOD_SECS)
                .and_then(|period| seconds_to_duration("update period", period))
                .map_err(|message| PipelineError::configuration("monitor", message))?;

        Ok(Self {
            update_period,
            stats: Mutex::new(MonitorStats::new(config.avg_wait_model)),
        })
    }

    pub fn update_period(&self) -> Duration {
        self.update_period
    }

    /// Acquire the monitor lock, waiting as long as it takes
    pub async fn lock(&self) -> MutexGuard<'_, MonitorStats> {
        self.stats.lock().await
    }

    /// Acquire the monitor lock or give up after `limit`
    pub async fn try_lock_for(&self, limit: Duration) -> Option<MutexGuard<'_, MonitorStats>> {
        timeout(limit, self.stats.lock()).await.ok()
    }

    /// Record a new sender and hand back its flush timeout
    pub async fn register(&self) -> Registration {
        let mut stats = self.lock().await;
        stats.increment_sender_count(1);
        Registration {
            sender_number: stats.sender_count(),
            flush_timeout: self.update_period,
        }
    }

    pub async fn snapshot(&self) -> MonitorSnapshot {
        self.lock().await.snapshot()
    }

    /// Emit a snapshot every period until shutdown; returns the tick count
    ///
    /// The first snapshot is emitted immediately. A failing sink is logged
    /// and the schedule continues.
    pub async fn run_display<S: DisplaySink>(
        &self,
        mut sink: S,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> usize {
        log::info!(
            "Monitor display started (period {:.1}s)",
            self.update_period.as_secs_f64()
        );

        let mut ticker = interval(self.update_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    break;
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    let stats = self.lock().await;
                    if let Err(e) = sink.emit(&stats.snapshot()) {
                        log::warn!("Monitor display failed on tick {}: {}", ticks, e);
                    }
                }
            }
        }

        log::info!("Monitor display stopped after {} refreshes", ticks);
        ticks
    }
}
