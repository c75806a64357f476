//! Generic error handling utilities
//!
//! Provides unified error logging that works across the domain error types
//! (queue, pipeline) while keeping configuration mistakes readable. Startup
//! failures are logged as fatal; a component that cannot be built is logged
//! without the prefix since the rest of the pipeline keeps running.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; when it returns `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    /// directly, such as an out-of-range configuration value.
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors are logged with their own message; system errors
/// are logged with the operation context and the details go to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use sendsim::core::error_handling::log_error_with_context;
/// # use sendsim::pipeline::PipelineError;
/// let err = PipelineError::configuration("sender-1", "failure rate must be within [0, 1], got 1.5");
/// log_error_with_context(&err, "Starting sender-1");
/// // Logs: "FATAL: failure rate must be within [0, 1], got 1.5"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("FATAL: {}", user_msg);
        }
        _ => {
            log::error!("FATAL: {}", operation_context);
        }
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Log an error that keeps one component from starting
///
/// The run goes on without the component, so nothing is marked fatal.
pub fn log_component_error<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    component: &str,
) {
    log::error!("{}", component_error_message(error, component));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

fn component_error_message<E: ContextualError>(error: &E, component: &str) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            format!("{} not started: {}", component, user_msg)
        }
        _ => format!("{} not started", component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct TestUserError {
        message: String,
    }

    impl fmt::Display for TestUserError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for TestUserError {}

    impl ContextualError for TestUserError {
        fn is_user_actionable(&self) -> bool {
            true
        }

        fn user_message(&self) -> Option<&str> {
            Some(&self.message)
        }
    }

    #[derive(Debug)]
    struct TestSystemError {
        internal_details: String,
    }

    impl fmt::Display for TestSystemError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "System error: {}", self.internal_details)
        }
    }

    impl std::error::Error for TestSystemError {}

    impl ContextualError for TestSystemError {
        fn is_user_actionable(&self) -> bool {
            false
        }

        fn user_message(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_user_actionable_error_shows_specific_message() {
        let error = TestUserError {
            message: "mean wait must be at least 1.0 seconds".to_string(),
        };

        assert!(error.is_user_actionable());
        assert_eq!(
            error.user_message(),
            Some("mean wait must be at least 1.0 seconds")
        );
        log_error_with_context(&error, "Starting sender");
    }

    #[test]
    fn test_system_error_uses_generic_context() {
        let error = TestSystemError {
            internal_details: "mutex poisoned".to_string(),
        };

        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        log_error_with_context(&error, "Popping from queue");
    }

    #[test]
    fn test_component_error_message_is_not_fatal() {
        let error = TestUserError {
            message: "update period must be at least 1.0 seconds, got 0.5".to_string(),
        };

        let message = component_error_message(&error, "monitor");

        assert_eq!(
            message,
            "monitor not started: update period must be at least 1.0 seconds, got 0.5"
        );
        assert!(!message.contains("FATAL"));
        log_component_error(&error, "monitor");
    }

    #[test]
    fn test_component_system_error_hides_details() {
        let error = TestSystemError {
            internal_details: "mutex poisoned".to_string(),
        };

        assert_eq!(component_error_message(&error, "queue"), "queue not started");
    }
}
