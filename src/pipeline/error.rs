//! Pipeline Error Types

use crate::queue::QueueError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// A component was given values it cannot run with
    #[error("Configuration error in {component}: {message}")]
    Configuration { component: String, message: String },

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// A spawned task panicked or was aborted
    #[error("Task failed: {message}")]
    Task { message: String },

    #[error("No pipeline component could be started")]
    NothingToRun,
}

impl PipelineError {
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Name of the component a configuration error belongs to
    pub fn component(&self) -> Option<&str> {
        match self {
            PipelineError::Configuration { component, .. } => Some(component),
            _ => None,
        }
    }
}

impl crate::core::error_handling::ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        match self {
            PipelineError::Configuration { .. } => true,
            PipelineError::NothingToRun => true,
            PipelineError::Queue(_) => false,
            PipelineError::Task { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::Configuration { message, .. } => Some(message),
            PipelineError::NothingToRun => {
                Some("No pipeline component could be started; check the configuration")
            }
            _ => None,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_handling::ContextualError;

    #[test]
    fn test_configuration_error_is_user_actionable() {
        let err = PipelineError::configuration("monitor", "update period must be at least 1.0 seconds, got 0.5");

        assert!(err.is_user_actionable());
        assert_eq!(
            err.user_message(),
            Some("update period must be at least 1.0 seconds, got 0.5")
        );
        assert_eq!(err.component(), Some("monitor"));
        assert!(err.to_string().contains("Configuration error in monitor"));
    }

    #[test]
    fn test_queue_error_is_system_error() {
        let err: PipelineError = QueueError::OperationFailed {
            message: "mutex poisoned".to_string(),
        }
        .into();

        assert!(!err.is_user_actionable());
        assert_eq!(err.user_message(), None);
        assert_eq!(err.component(), None);
    }
}
