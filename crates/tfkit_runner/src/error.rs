//! Error types for the runner module.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that can occur while executing a shell command.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Exit value was {code}!\n{stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Command timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Command was interrupted: {0}")]
    Interrupted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Captured standard error, when the process got far enough to produce it.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
