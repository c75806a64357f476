//! Producer task: generate a fixed number of messages into the queue

use crate::core::validation::validate_message_count;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::queue::{BoundedQueue, Message, QueueError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Default number of messages to generate
pub const DEFAULT_MESSAGE_COUNT: usize = 1000;

/// Default pause between pushes
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq)]
pub struct ProducerConfig {
    /// Target number of messages
    pub msg_count: usize,
    /// Queue capacity; the message count when unset
    pub capacity: Option<usize>,
    /// Pause after each push, and between retries while the queue is full
    pub throttle: Duration,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            msg_count: DEFAULT_MESSAGE_COUNT,
            capacity: None,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl ProducerConfig {
    pub fn queue_capacity(&self) -> usize {
        self.capacity.unwrap_or(self.msg_count)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerSummary {
    pub generated: usize,
    /// Iterations that found the queue full
    pub full_retries: u64,
    pub completed: bool,
}

pub struct Producer {
    msg_count: usize,
    throttle: Duration,
    queue: Arc<BoundedQueue<Message>>,
    rng: StdRng,
}

impl Producer {
    pub fn new(config: &ProducerConfig, queue: Arc<BoundedQueue<Message>>) -> PipelineResult<Self> {
        let msg_count = validate_message_count(config.msg_count)
            .map_err(|message| PipelineError::configuration("producer", message))?;

        Ok(Self {
            msg_count,
            throttle: config.throttle,
            queue,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn msg_count(&self) -> usize {
        self.msg_count
    }

    /// Push messages until the target is reached or shutdown is signalled
    pub async fn run(
        mut self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> PipelineResult<ProducerSummary> {
        log::info!(
            "Producer started: {} messages into a queue of {}",
            self.msg_count,
            self.queue.capacity()
        );
        let mut summary = ProducerSummary::default();

        while summary.generated < self.msg_count {
            let queued = self.queue.try_len().map_err(|e| {
                log::error!("Producer stopping after {} messages: {}", summary.generated, e);
                PipelineError::from(e)
            })?;
            if queued >= self.queue.capacity() {
                summary.full_retries += 1;
                log::trace!("Queue full at {} messages; producer waiting", summary.generated);
            } else {
                match self.queue.push(Message::generate(&mut self.rng)) {
                    Ok(()) => summary.generated += 1,
                    Err(QueueError::QueueFull { max_size }) => {
                        // Lost a race with another pusher; regenerate next time
                        summary.full_retries += 1;
                        log::trace!("Push rejected at capacity {}", max_size);
                    }
                    Err(e) => {
                        log::error!("Producer stopping after {} messages: {}", summary.generated, e);
                        return Err(e.into());
                    }
                }
            }

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    log::info!(
                        "Producer interrupted after {} of {} messages",
                        summary.generated,
                        self.msg_count
                    );
                    return Ok(summary);
                }
                _ = tokio::time::sleep(self.throttle) => {}
            }
        }

        summary.completed = true;
        log::info!("Producer has generated all {} messages", summary.generated);
        Ok(summary)
    }
}
