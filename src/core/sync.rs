//! Synchronization utilities for robust mutex handling
//!
//! Converts poisoned-lock results into domain errors so a panicking task
//! cannot take down every other task that shares the same structure.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// # Arguments
/// * `result` - The result from a mutex lock operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use sendsim::core::sync::handle_mutex_poison;
/// use sendsim::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::OperationFailed { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(
            format!(
                "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
                poison_err
            )
        )
    })
}
