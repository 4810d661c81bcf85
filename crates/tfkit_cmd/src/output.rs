//! `terraform output`.

use std::path::{Path, PathBuf};

use tfkit_runner::{CommandLineOptions, Executable};
use tracing::info;

use crate::command::{TerraformCommand, TerraformCommandLine};
use crate::config::Configuration;
use crate::error::TerraformResult;
use crate::operation::TerraformOperation;
use crate::params::{CommandInvocation, ParamSpec, TIMEOUT_KEY};

const OUTPUT_NAME_KEY: &str = "outputName";

/// Recognized properties, in rendering order.
///
/// - `tfState`: state file to read
/// - `noColor`: strip color codes from output
/// - `json`: machine-readable output
/// - `raw`: print a single string output without quoting
/// - `outputName`: a single output to print, passed last
/// - `timeout`: milliseconds the command may run
pub const OUTPUT_PARAMS: &[ParamSpec] = &[
    ParamSpec::assign("tfState", "state"),
    ParamSpec::bare("noColor", "no-color"),
    ParamSpec::bare("json", "json"),
    ParamSpec::bare("raw", "raw"),
    ParamSpec::excluded(OUTPUT_NAME_KEY),
    ParamSpec::excluded(TIMEOUT_KEY),
];

pub struct TerraformOutput<E = TerraformCommandLine> {
    terraform: E,
}

impl TerraformOutput<TerraformCommandLine> {
    pub fn in_directory(directory: impl Into<PathBuf>, options: CommandLineOptions) -> Self {
        Self::new(TerraformCommandLine::with_options(
            TerraformCommand::Output,
            directory,
            options,
        ))
    }

    pub fn for_root_module(
        base: &Path,
        name: Option<&str>,
        options: CommandLineOptions,
    ) -> TerraformResult<Self> {
        TerraformCommandLine::for_root_module(TerraformCommand::Output, base, name, options)
            .map(Self::new)
    }
}

impl<E: Executable> TerraformOutput<E> {
    pub fn new(terraform: E) -> Self {
        Self { terraform }
    }
}

impl<E: Executable> TerraformOperation for TerraformOutput<E> {
    type Output = String;

    fn execute(&self, properties: &Configuration) -> TerraformResult<String> {
        info!("Running terraform output");

        let mut invocation = CommandInvocation::render(OUTPUT_PARAMS, properties)?;
        if let Some(name) = properties.get(OUTPUT_NAME_KEY) {
            invocation.push_positional(name);
        }
        invocation.execute(&self.terraform)
    }
}
