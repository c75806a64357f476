//! Randomised transmission model: wait times, outcomes and local tallies

use crate::core::validation::MAX_SECONDS;
use crate::monitor::StatsDelta;
use crate::pipeline::error::{PipelineError, PipelineResult};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::time::Duration;

/// Result of one simulated transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Failed,
}

/// Failure occurs when a uniform draw in [0, 1) falls below `failure_rate`
pub fn draw_outcome<R: Rng + ?Sized>(rng: &mut R, failure_rate: f64) -> Outcome {
    if rng.gen::<f64>() < failure_rate {
        Outcome::Failed
    } else {
        Outcome::Delivered
    }
}

/// Normal(mean, mean / 3) wait distribution restricted to positive draws
#[derive(Debug, Clone, Copy)]
pub struct WaitModel {
    mean_secs: f64,
    normal: Normal<f64>,
}

impl WaitModel {
    pub fn new(mean_secs: f64) -> PipelineResult<Self> {
        if !(mean_secs > 0.0 && mean_secs <= MAX_SECONDS) {
            return Err(PipelineError::configuration(
                "wait model",
                format!("mean wait must be within (0, {}] seconds, got {}", MAX_SECONDS, mean_secs),
            ));
        }
        let normal = Normal::new(mean_secs, mean_secs / 3.0).map_err(|e| {
            PipelineError::configuration("wait model", format!("invalid mean wait {}: {}", mean_secs, e))
        })?;
        Ok(Self { mean_secs, normal })
    }

    pub fn mean_secs(&self) -> f64 {
        self.mean_secs
    }

    /// Draw a wait, redrawing (not clamping) until it is strictly positive
    /// and fits in a `Duration`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        loop {
            let secs = self.normal.sample(rng);
            if secs > 0.0 {
                if let Ok(wait) = Duration::try_from_secs_f64(secs) {
                    return wait;
                }
            }
        }
    }
}

/// Outcomes recorded since the last successful flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderTally {
    pub successes: u64,
    pub failures: u64,
}

impl SenderTally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Delivered => self.successes += 1,
            Outcome::Failed => self.failures += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_delta(&self, wait_sample: Option<f64>) -> StatsDelta {
        StatsDelta {
            successes: self.successes,
            failures: self.failures,
            wait_sample,
        }
    }
}
