//! Error types for terraform operations.

use thiserror::Error;

/// Result type alias for terraform operations.
pub type TerraformResult<T> = Result<T, TerraformError>;

/// Errors that can occur during terraform operations.
#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("Terraform execution failed: {0}")]
    Execution(#[from] tfkit_runner::RunnerError),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    Configuration {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Filesystem(String),

    #[error("Failed to load properties from {path}: {reason}")]
    PropertyFile { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerraformError {
    pub(crate) fn configuration(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Configuration {
            key: key.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
