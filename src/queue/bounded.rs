//! Fixed-capacity FIFO shared between the producer and the senders
//!
//! Pushes never wait: a push into a full queue is rejected and the caller
//! retries on its own schedule. Pops suspend the calling task until an item
//! arrives. The item buffer is guarded by one mutex, and waiting consumers
//! are woken through a `Notify`.

use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// Upper bound on the buffer allocated up front; the rest grows on demand
const INITIAL_ALLOCATION: usize = 1024;

/// Bounded multi-producer, multi-consumer FIFO queue
///
/// # Example
///
/// ```rust
/// use sendsim::queue::{BoundedQueue, QueueError};
///
/// # async fn example() -> Result<(), QueueError> {
/// let queue = BoundedQueue::new(2)?;
/// queue.push("a")?;
/// queue.push("b")?;
/// assert!(matches!(queue.push("c"), Err(QueueError::QueueFull { max_size: 2 })));
///
/// assert_eq!(queue.pop().await?, "a");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Notify,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue holding at most `capacity` items
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity { capacity });
        }

        Ok(Self {
            items: Mutex::new(VecDeque::with_capacity(capacity.min(INITIAL_ALLOCATION))),
            available: Notify::new(),
            capacity,
        })
    }

    fn lock_items(&self) -> QueueResult<MutexGuard<'_, VecDeque<T>>> {
        handle_mutex_poison(self.items.lock(), |message| QueueError::OperationFailed {
            message,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of queued items, failing if the buffer lock is poisoned
    pub fn try_len(&self) -> QueueResult<usize> {
        self.lock_items().map(|items| items.len())
    }

    /// Current number of queued items (advisory; may be stale immediately)
    ///
    /// A poisoned queue is logged and reported as full.
    pub fn len(&self) -> usize {
        match self.try_len() {
            Ok(len) => len,
            Err(e) => {
                log::warn!("Queue length unavailable: {}", e);
                self.capacity
            }
        }
    }

    /// Advisory emptiness check
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advisory fullness check
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Append an item if there is room at the moment of the call
    pub fn push(&self, item: T) -> QueueResult<()> {
        {
            let mut items = self.lock_items()?;
            if items.len() >= self.capacity {
                return Err(QueueError::QueueFull {
                    max_size: self.capacity,
                });
            }
            items.push_back(item);
        }

        self.available.notify_one();
        Ok(())
    }

    /// Remove the oldest item without waiting
    pub fn try_pop(&self) -> QueueResult<Option<T>> {
        let (item, remaining) = {
            let mut items = self.lock_items()?;
            let item = items.pop_front();
            (item, items.len())
        };

        // Pass the wakeup along so a second waiter sees the remaining items
        if item.is_some() && remaining > 0 {
            self.available.notify_one();
        }

        Ok(item)
    }

    /// Remove the oldest item, suspending until one is available
    ///
    /// Cancel-safe: dropping the future before it resolves never loses an item.
    pub async fn pop(&self) -> QueueResult<T> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register as a waiter before checking, so a push between the
            // check and the await still wakes us.
            notified.as_mut().enable();

            if let Some(item) = self.try_pop()? {
                return Ok(item);
            }

            notified.await;
        }
    }

    /// Poison the buffer lock by panicking while holding it
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _items = self.items.lock();
            panic!("panic while holding the queue lock");
        }));
    }
}
