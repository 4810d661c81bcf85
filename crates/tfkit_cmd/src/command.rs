//! Terraform subcommands and the prefixing command line.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tfkit_runner::{CommandLine, CommandLineOptions, Executable, RunnerResult};

use crate::error::TerraformResult;
use crate::paths;

/// Binary invoked when no other is configured.
pub const DEFAULT_BINARY: &str = "terraform";

/// Terraform subcommands tfkit knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerraformCommand {
    Init,
    Plan,
    Apply,
    Destroy,
    Output,
}

impl TerraformCommand {
    /// Subcommand name as passed to the binary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Plan => "plan",
            Self::Apply => "apply",
            Self::Destroy => "destroy",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for TerraformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An executor that prefixes every command with `<binary> <subcommand>`.
///
/// Callers pass only the flags; this forwards `"<binary> <subcommand> <flags>"`
/// to the wrapped executor unchanged otherwise.
#[derive(Debug, Clone)]
pub struct TerraformCommandLine<E = CommandLine> {
    command: TerraformCommand,
    binary: String,
    inner: E,
}

impl TerraformCommandLine<CommandLine> {
    /// Run `command` in `directory` through the platform shell.
    pub fn new(command: TerraformCommand, directory: impl Into<PathBuf>) -> Self {
        Self::with_options(command, directory, CommandLineOptions::default())
    }

    pub fn with_options(
        command: TerraformCommand,
        directory: impl Into<PathBuf>,
        options: CommandLineOptions,
    ) -> Self {
        Self::with_executable(command, CommandLine::with_options(directory, options))
    }

    /// Bind to a root module under `base/src/main/tf`: the named one, or the
    /// first one found when `name` is `None`.
    pub fn for_root_module(
        command: TerraformCommand,
        base: &Path,
        name: Option<&str>,
        options: CommandLineOptions,
    ) -> TerraformResult<Self> {
        let directory = paths::resolve_root_module_dir(base, name)?;
        Ok(Self::with_options(command, directory, options))
    }

    /// Working directory of the underlying command line.
    pub fn directory(&self) -> &Path {
        self.inner.directory()
    }
}

impl<E: Executable> TerraformCommandLine<E> {
    pub fn with_executable(command: TerraformCommand, inner: E) -> Self {
        Self {
            command,
            binary: DEFAULT_BINARY.to_string(),
            inner,
        }
    }

    /// Use a different binary, e.g. a pinned path or a compatible fork.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn command(&self) -> TerraformCommand {
        self.command
    }

    /// `"<binary> <subcommand>"`
    pub fn prefix(&self) -> String {
        format!("{} {}", self.binary, self.command)
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn prefixed(&self, options: &str) -> String {
        format!("{} {}", self.prefix(), options)
    }
}

impl<E: Executable> Executable for TerraformCommandLine<E> {
    fn execute(&self, command: &str) -> RunnerResult<String> {
        self.inner.execute(&self.prefixed(command))
    }

    fn execute_with_timeout(&self, command: &str, timeout: Duration) -> RunnerResult<String> {
        self.inner.execute_with_timeout(&self.prefixed(command), timeout)
    }
}
