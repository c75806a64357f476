//! Shutdown Coordination
//!
//! One broadcast channel carries the stop request to the producer, every
//! sender and the monitor display. Each task holds its own receiver and
//! selects on it at every suspension point, so a single send stops the whole
//! pipeline. Signals feed the same channel; a second signal exits at once.

use tokio::sync::broadcast;

/// Broadcasts the stop request to every pipeline task
pub struct ShutdownCoordinator {
    stop_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    /// Create a coordinator and the first receiver
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (stop_tx, stop_rx) = broadcast::channel(8);
        (Self { stop_tx }, stop_rx)
    }

    /// Receiver for one more task
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.stop_tx.subscribe()
    }

    /// Sender half, for stopping the pipeline after the coordinator moved away
    pub fn stop_handle(&self) -> broadcast::Sender<()> {
        self.stop_tx.clone()
    }

    /// Ask every subscribed task to stop
    pub fn trigger_shutdown(&self) {
        // No receivers left means every task already finished
        let _ = self.stop_tx.send(());
    }

    /// Install signal handlers, then run `future_fn` with the coordinator and
    /// a receiver
    pub async fn guard_with_coordinator<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(Self, broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, stop_rx) = Self::new();
        forward_signals(coordinator.stop_handle());
        future_fn(coordinator, stop_rx).await
    }
}

/// Turn termination signals into stop requests
#[cfg(unix)]
fn forward_signals(stop_tx: broadcast::Sender<()>) {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::signal::unix::{signal, SignalKind};

    // Restore the default so writing to a closed pipe ends the process quietly
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    let received = Arc::new(AtomicUsize::new(0));

    for kind in [
        SignalKind::interrupt(),
        SignalKind::terminate(),
        SignalKind::hangup(),
        SignalKind::quit(),
    ] {
        let stop_tx = stop_tx.clone();
        let received = Arc::clone(&received);

        tokio::spawn(async move {
            let Ok(mut stream) = signal(kind) else {
                log::warn!("Cannot listen for signal {:?}", kind);
                return;
            };
            while stream.recv().await.is_some() {
                if received.fetch_add(1, Ordering::AcqRel) > 0 {
                    log::warn!("Second signal received; exiting immediately");
                    std::process::exit(130);
                }
                log::info!("Signal received; shutting down pipeline");
                let _ = stop_tx.send(());
            }
        });
    }
}

#[cfg(not(unix))]
fn forward_signals(stop_tx: broadcast::Sender<()>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received; shutting down pipeline");
            let _ = stop_tx.send(());
        }
    });
}
