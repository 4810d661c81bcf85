//! Mock executable for testing.
//!
//! Provides a configurable implementation of the [`Executable`] trait for use
//! in unit tests without spawning real processes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::{RunnerError, RunnerResult};
use crate::runner::Executable;

/// Predefined mock response for an execution.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    /// The command string exactly as received
    pub command: String,
    /// `Some` for `execute_with_timeout`, `None` for `execute`
    pub timeout: Option<Duration>,
}

/// Mock executable for testing.
///
/// Clones share state, so a test can keep one handle for verification while
/// the code under test owns another.
#[derive(Clone, Default)]
pub struct MockExecutable {
    /// Predefined responses, returned in order and cycled.
    responses: Arc<RwLock<Vec<MockResponse>>>,
    /// Index of next response to return.
    response_index: Arc<AtomicUsize>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Simulated failure to return (as a string message for ExecutionFailed).
    simulate_failure: Arc<RwLock<Option<String>>>,
}

impl MockExecutable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock response for the next call.
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    /// Set multiple responses.
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        *self.responses.write() = responses;
        self
    }

    /// Set a failure to simulate.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<CapturedCall> {
        self.captured_calls.read().last().cloned()
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    fn next_response(&self) -> MockResponse {
        let responses = self.responses.read();
        if responses.is_empty() {
            return MockResponse::success("");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses
            .get(index % responses.len())
            .cloned()
            .unwrap_or_else(|| MockResponse::success(""))
    }

    fn respond(&self, command: &str, timeout: Option<Duration>) -> RunnerResult<String> {
        self.captured_calls.write().push(CapturedCall {
            command: command.to_string(),
            timeout,
        });

        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(RunnerError::ExecutionFailed(msg));
        }

        let response = self.next_response();
        if response.exit_code == 0 {
            Ok(response.stdout)
        } else {
            Err(RunnerError::NonZeroExit {
                code: response.exit_code,
                stderr: response.stderr,
            })
        }
    }
}

impl Executable for MockExecutable {
    fn execute(&self, command: &str) -> RunnerResult<String> {
        self.respond(command, None)
    }

    fn execute_with_timeout(&self, command: &str, timeout: Duration) -> RunnerResult<String> {
        self.respond(command, Some(timeout))
    }
}
