//! Executable trait and process output types.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::RunnerResult;

/// Output of a completed shell process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code from the process (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// Execution start time
    pub started_at: DateTime<Utc>,
    /// Execution end time
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ProcessOutput {
    /// Check if execution was successful (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Something that can run a command string and hand back its stdout.
///
/// Implementors decide where and how the command runs; callers only see the
/// captured output or an error. The single-argument form uses whatever default
/// timeout the implementor was configured with.
pub trait Executable: Send + Sync {
    /// Run `command` with the default timeout.
    fn execute(&self, command: &str) -> RunnerResult<String>;

    /// Run `command`, giving up after `timeout`.
    fn execute_with_timeout(&self, command: &str, timeout: Duration) -> RunnerResult<String>;
}

impl<E: Executable + ?Sized> Executable for &E {
    fn execute(&self, command: &str) -> RunnerResult<String> {
        (**self).execute(command)
    }

    fn execute_with_timeout(&self, command: &str, timeout: Duration) -> RunnerResult<String> {
        (**self).execute_with_timeout(command, timeout)
    }
}

impl<E: Executable + ?Sized> Executable for Box<E> {
    fn execute(&self, command: &str) -> RunnerResult<String> {
        (**self).execute(command)
    }

    fn execute_with_timeout(&self, command: &str, timeout: Duration) -> RunnerResult<String> {
        (**self).execute_with_timeout(command, timeout)
    }
}
