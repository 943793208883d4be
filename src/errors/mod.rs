use thiserror::Error;

use crate::domain::{ItemId, UserId};

/// Errors raised by the experiment engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Requested {requested} members but only {available} are available")]
    CapacityExceeded { requested: usize, available: usize },

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("User {0} not found in dataset")]
    UserNotFound(UserId),

    #[error("Item {0} not found in dataset")]
    ItemNotFound(ItemId),

    #[error("Algorithm '{0}' is not registered")]
    UnknownAlgorithm(String),

    #[error("Failed to build model: {0}")]
    ModelBuild(String),

    #[error("Task {task_id} of job '{job}' panicked: {message}")]
    TaskPanicked {
        job: String,
        task_id: usize,
        message: String,
    },

    #[error("Task {task_id} of job '{job}' failed: {source}")]
    TaskFailed {
        job: String,
        task_id: usize,
        source: Box<EngineError>,
    },

    #[error("Worker thread of job '{0}' terminated unexpectedly")]
    WorkerPanicked(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Errors detected before any work was scheduled
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            EngineError::CapacityExceeded { .. }
                | EngineError::InvalidParameter { .. }
                | EngineError::UnknownAlgorithm(_)
        )
    }
}

/// Add context to dataset loading errors
pub fn load_context(path: &str) -> String {
    format!("Failed to load ratings from: {}", path)
}

/// Add context to result store errors
pub fn store_context(operation: &str, key: &str) -> String {
    format!("Failed to {} stored result for key: {}", operation, key)
}

/// Add context to config errors
pub fn config_context(path: &str) -> String {
    format!("Failed to read configuration from: {}", path)
}
