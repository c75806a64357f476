//! Aggregate statistics guarded by the monitor lock
//!
//! `MonitorStats` is only reachable through the monitor's mutex guard, so
//! every mutation below happens while the lock is held.

use std::fmt;
use std::str::FromStr;

/// How `average_wait` is recomputed from a new wait sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AverageWaitModel {
    /// `mean += (mean * sender_count + sample) / sender_count`
    ///
    /// Keyed off the current sender count rather than the number of samples,
    /// so this is not a true running mean. Kept as the default for
    /// behavioural compatibility.
    #[default]
    Recurrence,
    /// True cumulative mean over every applied sample
    RunningMean,
}

impl AverageWaitModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AverageWaitModel::Recurrence => "recurrence",
            AverageWaitModel::RunningMean => "running-mean",
        }
    }
}

impl FromStr for AverageWaitModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recurrence" => Ok(AverageWaitModel::Recurrence),
            "running-mean" => Ok(AverageWaitModel::RunningMean),
            other => Err(format!(
                "unknown average wait model '{}' (expected 'recurrence' or 'running-mean')",
                other
            )),
        }
    }
}

/// One sender's contribution, applied as a single unit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsDelta {
    pub successes: u64,
    pub failures: u64,
    /// Latest simulated wait in seconds, if one has not been reported yet
    pub wait_sample: Option<f64>,
}

/// Shared counters owned by the monitor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorStats {
    sender_count: usize,
    success_count: u64,
    fail_count: u64,
    average_wait: f64,
    wait_samples: u64,
    model: AverageWaitModel,
}

impl MonitorStats {
    pub fn new(model: AverageWaitModel) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    pub fn sender_count(&self) -> usize {
        self.sender_count
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn fail_count(&self) -> u64 {
        self.fail_count
    }

    pub fn average_wait(&self) -> f64 {
        self.average_wait
    }

    pub fn model(&self) -> AverageWaitModel {
        self.model
    }

    pub fn increment_sender_count(&mut self, n: usize) {
        self.sender_count += n;
    }

    pub fn update_success(&mut self, n: u64) {
        self.success_count += n;
    }

    pub fn update_failures(&mut self, n: u64) {
        self.fail_count += n;
    }

    /// Fold one wait sample (seconds) into `average_wait`
    ///
    /// With no registered senders the recurrence is undefined and the mean
    /// is left unchanged.
    pub fn update_avg_wait(&mut self, sample: f64) {
        self.wait_samples += 1;
        match self.model {
            AverageWaitModel::Recurrence => {
                if self.sender_count == 0 {
                    log::debug!("Ignoring wait sample {:.3}s: no senders registered", sample);
                    return;
                }
                let senders = self.sender_count as f64;
                let cumulative_wait = self.average_wait * senders + sample;
                self.average_wait += cumulative_wait / senders;
            }
            AverageWaitModel::RunningMean => {
                self.average_wait += (sample - self.average_wait) / self.wait_samples as f64;
            }
        }
    }

    /// Apply a sender's whole contribution under the one guard
    pub fn apply(&mut self, delta: &StatsDelta) {
        self.update_success(delta.successes);
        self.update_failures(delta.failures);
        if let Some(sample) = delta.wait_sample {
            self.update_avg_wait(sample);
        }
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            sender_count: self.sender_count,
            success_count: self.success_count,
            fail_count: self.fail_count,
            average_wait: self.average_wait,
        }
    }
}

/// Point-in-time copy of the monitor counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonitorSnapshot {
    pub sender_count: usize,
    pub success_count: u64,
    pub fail_count: u64,
    pub average_wait: f64,
}

impl fmt::Display for MonitorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of messages sent: {}", self.success_count)?;
        writeln!(f, "Number of messages failed: {}", self.fail_count)?;
        write!(
            f,
            "Average wait time between messages: {:.2} seconds",
            self.average_wait
        )
    }
}
