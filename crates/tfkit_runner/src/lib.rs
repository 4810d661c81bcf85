//! # tfkit_runner
//!
//! Shell command execution for tfkit.
//!
//! This crate runs arbitrary command strings through the platform shell
//! (`cmd /c` on Windows, `bash -c` elsewhere) in a fixed working directory,
//! enforcing a timeout and turning non-zero exits into typed errors.
//!
//! # Features
//!
//! - **Concurrent draining**: stdout and stderr are read on separate threads
//! - **Timeouts**: a timed-out child is killed and reported as [`RunnerError::Timeout`]
//! - **Dry-Run Mode**: log commands without spawning anything
//! - **Mock Executable**: call capture and scripted responses for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tfkit_runner::{CommandLine, Executable};
//!
//! let shell = CommandLine::new("/tmp");
//! let listing = shell.execute("ls -la")?;
//! let slow = shell.execute_with_timeout("sleep 1 && echo done", Duration::from_secs(5))?;
//! println!("{listing}{slow}");
//! # Ok::<(), tfkit_runner::RunnerError>(())
//! ```

pub mod command_line;
pub mod config;
pub mod error;
pub mod mock;
pub mod runner;

pub use command_line::CommandLine;
pub use config::{CommandLineOptions, Shell, DEFAULT_TIMEOUT};
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockExecutable, MockResponse};
pub use runner::{Executable, ProcessOutput};
