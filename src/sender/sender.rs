//! Sender worker: consume, simulate, flush
//!
//! Each sender registers with the monitor once, then loops: pop a message,
//! sleep for a random wait, draw an outcome, and try to flush its local tally
//! into the monitor within the flush timeout. A timed-out flush keeps the
//! tally so it is reported as a lump sum on the next successful attempt.

use crate::core::validation::{validate_min_seconds, validate_probability, MIN_PERIOD_SECS};
use crate::monitor::Monitor;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::queue::{BoundedQueue, Message};
use crate::sender::simulation::{draw_outcome, SenderTally, WaitModel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Per-sender simulation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenderConfig {
    /// Probability in [0, 1] that a transmission fails
    pub failure_rate: f64,
    /// Mean simulated wait in seconds (at least 1.0)
    pub mean_wait_secs: f64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.25,
            mean_wait_secs: 1.0,
        }
    }
}

/// What a sender did before it stopped
#[derive(Debug, Clone, PartialEq)]
pub struct SenderSummary {
    pub name: String,
    /// Messages fully processed (wait elapsed and outcome drawn)
    pub processed: u64,
    pub successes: u64,
    pub failures: u64,
    /// Successful flushes into the monitor
    pub flushes: u64,
    /// Flush attempts that timed out waiting for the monitor lock
    pub deferred_flushes: u64,
    /// Messages popped but not finished when shutdown arrived
    pub abandoned: u64,
    /// Tally still unreported at exit
    pub unflushed: SenderTally,
}

/// One competing consumer of the message queue
pub struct Sender {
    name: String,
    failure_rate: f64,
    wait_model: WaitModel,
    queue: Arc<BoundedQueue<Message>>,
    monitor: Arc<Monitor>,
    rng: StdRng,
    tally: SenderTally,
    // Latest wait sample not yet folded into the monitor average
    pending_wait: Option<f64>,
    summary: SenderSummary,
}

impl Sender {
    pub fn new(
        name: impl Into<String>,
        config: SenderConfig,
        queue: Arc<BoundedQueue<Message>>,
        monitor: Arc<Monitor>,
    ) -> PipelineResult<Self> {
        let name = name.into();
        let failure_rate = validate_probability("failure rate", config.failure_rate)
            .map_err(|message| PipelineError::configuration(name.as_str(), message))?;
        let mean_wait = validate_min_seconds("mean wait", config.mean_wait_secs, MIN_PERIOD_SECS)
            .map_err(|message| PipelineError::configuration(name.as_str(), message))?;

        Ok(Self {
            failure_rate,
            wait_model: WaitModel::new(mean_wait)?,
            queue,
            monitor,
            rng: StdRng::from_entropy(),
            tally: SenderTally::default(),
            pending_wait: None,
            summary: SenderSummary {
                name: name.clone(),
                processed: 0,
                successes: 0,
                failures: 0,
                flushes: 0,
                deferred_flushes: 0,
                abandoned: 0,
                unflushed: SenderTally::default(),
            },
            name,
        })
    }

    /// Use a deterministic random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run until shutdown is signalled
    pub async fn run(
        mut self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> PipelineResult<SenderSummary> {
        let registration = tokio::select! {
            registration = self.monitor.register() => registration,
            _ = shutdown_rx.recv() => return Ok(self.finish()),
        };
        let flush_timeout = registration.flush_timeout;
        log::info!(
            "{} registered as sender #{} (failure rate {:.2}, mean wait {:.1}s, flush timeout {:.1}s)",
            self.name,
            registration.sender_number,
            self.failure_rate,
            self.wait_model.mean_secs(),
            flush_timeout.as_secs_f64()
        );

        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                popped = self.queue.pop() => popped?,
            };

            let wait = self.wait_model.sample(&mut self.rng);
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    log::debug!(
                        "{} abandoning message to {} after shutdown",
                        self.name,
                        message.recipient()
                    );
                    self.summary.abandoned += 1;
                    break;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            let outcome = draw_outcome(&mut self.rng, self.failure_rate);
            log::trace!(
                "{} sent {} chars to {} after {:.3}s: {:?}",
                self.name,
                message.body().chars().count(),
                message.recipient(),
                wait.as_secs_f64(),
                outcome
            );
            self.tally.record(outcome);
            self.pending_wait = Some(wait.as_secs_f64());
            self.summary.processed += 1;

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = self.try_flush(flush_timeout) => {}
            }
        }

        // One last bounded attempt so buffered outcomes reach the monitor
        if !self.tally.is_empty() {
            self.try_flush(flush_timeout).await;
        }

        Ok(self.finish())
    }

    /// Push the local tally into the monitor if the lock frees up in time
    async fn try_flush(&mut self, limit: Duration) -> bool {
        match self.monitor.try_lock_for(limit).await {
            Some(mut stats) => {
                stats.apply(&self.tally.to_delta(self.pending_wait.take()));
                self.summary.successes += self.tally.successes;
                self.summary.failures += self.tally.failures;
                self.summary.flushes += 1;
                self.tally.reset();
                true
            }
            None => {
                self.summary.deferred_flushes += 1;
                log::trace!(
                    "{} could not reach the monitor within {:.1}s; carrying {} outcomes",
                    self.name,
                    limit.as_secs_f64(),
                    self.tally.total()
                );
                false
            }
        }
    }

    fn finish(mut self) -> SenderSummary {
        self.summary.successes += self.tally.successes;
        self.summary.failures += self.tally.failures;
        self.summary.unflushed = self.tally;
        log::info!(
            "{} stopped after {} messages ({} flushes, {} deferred)",
            self.name,
            self.summary.processed,
            self.summary.flushes,
            self.summary.deferred_flushes
        );
        self.summary
    }
}
