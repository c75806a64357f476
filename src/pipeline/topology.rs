//! Topology construction and task supervision
//!
//! `Topology::build` validates every component independently: a component
//! with bad configuration is logged and left out, the rest still run.
//! `Topology::spawn` starts one task per component and `RunningTopology::join`
//! collects their summaries after shutdown.

use crate::core::error_handling::log_component_error;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::validation::validate_capacity;
use crate::monitor::{DisplaySink, Monitor, MonitorSnapshot};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::producer::{Producer, ProducerSummary};
use crate::queue::{BoundedQueue, Message};
use crate::sender::{Sender, SenderSummary};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Validated components, ready to be spawned
pub struct Topology {
    queue: Option<Arc<BoundedQueue<Message>>>,
    producer: Option<Producer>,
    monitor: Option<Arc<Monitor>>,
    senders: Vec<Sender>,
    errors: Vec<PipelineError>,
}

impl Topology {
    /// Build every component, keeping the ones whose configuration is valid
    pub fn build(config: &PipelineConfig) -> Self {
        let mut errors = Vec::new();

        let queue = validate_capacity(config.producer.queue_capacity())
            .map_err(|message| PipelineError::configuration("queue", message))
            .and_then(|capacity| BoundedQueue::<Message>::new(capacity).map_err(PipelineError::from))
            .map(Arc::new);
        let queue = keep_valid(queue, "queue", &mut errors);

        let producer = match &queue {
            Some(queue) => Producer::new(&config.producer, Arc::clone(queue))
                .map(|producer| match config.seed {
                    Some(seed) => producer.with_seed(seed),
                    None => producer,
                }),
            None => Err(PipelineError::configuration(
                "producer",
                "producer has no queue to fill",
            )),
        };
        let producer = keep_valid(producer, "producer", &mut errors);

        let monitor = Monitor::new(config.monitor.clone()).map(Arc::new);
        let monitor = keep_valid(monitor, "monitor", &mut errors);

        let mut senders = Vec::with_capacity(config.senders.len());
        for (index, sender_config) in config.senders.iter().enumerate() {
            let name = format!("sender-{}", index + 1);
            let sender = match (&queue, &monitor) {
                (Some(queue), Some(monitor)) => {
                    Sender::new(name.as_str(), *sender_config, Arc::clone(queue), Arc::clone(monitor))
                        .map(|sender| match config.seed {
                            Some(seed) => sender.with_seed(seed.wrapping_add(index as u64 + 1)),
                            None => sender,
                        })
                }
                (None, _) => Err(PipelineError::configuration(
                    name.as_str(),
                    "sender has no queue to read from",
                )),
                (_, None) => Err(PipelineError::configuration(
                    name.as_str(),
                    "sender needs a monitor to report to",
                )),
            };
            if let Some(sender) = keep_valid(sender, &name, &mut errors) {
                senders.push(sender);
            }
        }

        Self {
            queue,
            producer,
            monitor,
            senders,
            errors,
        }
    }

    /// Configuration errors for the components that were left out
    pub fn errors(&self) -> &[PipelineError] {
        &self.errors
    }

    pub fn queue(&self) -> Option<&Arc<BoundedQueue<Message>>> {
        self.queue.as_ref()
    }

    pub fn monitor(&self) -> Option<&Arc<Monitor>> {
        self.monitor.as_ref()
    }

    pub fn sender_count(&self) -> usize {
        self.senders.len()
    }

    pub fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    pub fn has_runnable_components(&self) -> bool {
        self.producer.is_some() || self.monitor.is_some() || !self.senders.is_empty()
    }

    /// Start one task per valid component
    pub fn spawn<S>(self, coordinator: &ShutdownCoordinator, sink: S) -> PipelineResult<RunningTopology>
    where
        S: DisplaySink + 'static,
    {
        if !self.has_runnable_components() {
            return Err(PipelineError::NothingToRun);
        }

        let mut tasks = JoinSet::new();

        if let Some(monitor) = &self.monitor {
            let monitor = Arc::clone(monitor);
            let shutdown_rx = coordinator.subscribe();
            tasks.spawn(async move { TaskOutcome::Display(monitor.run_display(sink, shutdown_rx).await) });
        }

        if let Some(producer) = self.producer {
            let shutdown_rx = coordinator.subscribe();
            tasks.spawn(async move { TaskOutcome::Producer(producer.run(shutdown_rx).await) });
        }

        let sender_count = self.senders.len();
        for (index, sender) in self.senders.into_iter().enumerate() {
            let shutdown_rx = coordinator.subscribe();
            tasks.spawn(async move { TaskOutcome::Sender(index, sender.run(shutdown_rx).await) });
        }

        log::info!(
            "Pipeline started: {} task(s), {} sender(s), {} component(s) skipped",
            tasks.len(),
            sender_count,
            self.errors.len()
        );

        Ok(RunningTopology {
            tasks,
            queue: self.queue,
            monitor: self.monitor,
            config_errors: self.errors,
        })
    }
}

fn keep_valid<T>(result: PipelineResult<T>, name: &str, errors: &mut Vec<PipelineError>) -> Option<T> {
    match result {
        Ok(component) => Some(component),
        Err(e) => {
            log_component_error(&e, e.component().unwrap_or(name));
            errors.push(e);
            None
        }
    }
}

enum TaskOutcome {
    Producer(PipelineResult<ProducerSummary>),
    /// Spawn position, so summaries can be put back in sender order
    Sender(usize, PipelineResult<SenderSummary>),
    Display(usize),
}

/// Spawned pipeline; join after shutdown has been triggered
pub struct RunningTopology {
    tasks: JoinSet<TaskOutcome>,
    queue: Option<Arc<BoundedQueue<Message>>>,
    monitor: Option<Arc<Monitor>>,
    config_errors: Vec<PipelineError>,
}

impl RunningTopology {
    pub fn monitor(&self) -> Option<&Arc<Monitor>> {
        self.monitor.as_ref()
    }

    pub fn queue(&self) -> Option<&Arc<BoundedQueue<Message>>> {
        self.queue.as_ref()
    }

    /// Wait for every task to finish and gather what they did
    pub async fn join(mut self) -> RunSummary {
        let mut summary = RunSummary {
            config_errors: std::mem::take(&mut self.config_errors),
            ..RunSummary::default()
        };
        let mut senders = Vec::new();

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Producer(Ok(producer))) => summary.producer = Some(producer),
                Ok(TaskOutcome::Sender(index, Ok(sender))) => senders.push((index, sender)),
                Ok(TaskOutcome::Display(ticks)) => summary.display_ticks = ticks,
                Ok(TaskOutcome::Producer(Err(e))) | Ok(TaskOutcome::Sender(_, Err(e))) => {
                    log::error!("Pipeline task stopped with an error: {}", e);
                    summary.failures.push(e);
                }
                Err(join_error) => {
                    let e = PipelineError::Task {
                        message: join_error.to_string(),
                    };
                    log::error!("Pipeline task panicked or was cancelled: {}", e);
                    summary.failures.push(e);
                }
            }
        }

        senders.sort_by_key(|(index, _)| *index);
        summary.senders = senders.into_iter().map(|(_, sender)| sender).collect();
        if let Some(monitor) = &self.monitor {
            summary.final_stats = Some(monitor.snapshot().await);
        }
        summary.queue_len = self.queue.as_ref().map_or(0, |queue| queue.len());
        summary
    }
}

/// What a finished run did
#[derive(Debug, Default)]
pub struct RunSummary {
    pub producer: Option<ProducerSummary>,
    /// In configuration order
    pub senders: Vec<SenderSummary>,
    pub display_ticks: usize,
    pub final_stats: Option<MonitorSnapshot>,
    /// Messages still queued at exit
    pub queue_len: usize,
    pub config_errors: Vec<PipelineError>,
    /// Tasks that stopped on an internal error
    pub failures: Vec<PipelineError>,
}

impl RunSummary {
    pub fn processed(&self) -> u64 {
        self.senders.iter().map(|s| s.processed).sum()
    }

    pub fn abandoned(&self) -> u64 {
        self.senders.iter().map(|s| s.abandoned).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn log(&self) {
        if let Some(producer) = &self.producer {
            log::info!(
                "Producer: {} generated{} ({} full-queue retries)",
                producer.generated,
                if producer.completed { "" } else { " (interrupted)" },
                producer.full_retries
            );
        }
        for sender in &self.senders {
            log::info!(
                "{}: {} processed, {} sent, {} failed, {} abandoned, {} unreported",
                sender.name,
                sender.processed,
                sender.successes,
                sender.failures,
                sender.abandoned,
                sender.unflushed.total()
            );
        }
        if let Some(stats) = &self.final_stats {
            log::info!(
                "Monitor: {} sent, {} failed, average wait {:.2}s over {} refreshes",
                stats.success_count,
                stats.fail_count,
                stats.average_wait,
                self.display_ticks
            );
        }
        log::info!("Queue: {} message(s) left undelivered", self.queue_len);
        if !self.config_errors.is_empty() {
            log::warn!("{} component(s) were not started", self.config_errors.len());
        }
    }
}
