//! `terraform apply`, always with `-auto-approve`.

use std::path::{Path, PathBuf};

use tfkit_runner::{CommandLineOptions, Executable};
use tracing::info;

use crate::command::{TerraformCommand, TerraformCommandLine};
use crate::config::Configuration;
use crate::error::TerraformResult;
use crate::operation::TerraformOperation;
use crate::params::{CommandInvocation, ParamSpec, TIMEOUT_KEY};

const PLAN_KEY: &str = "plan";

/// Recognized properties, in rendering order.
///
/// - `tfVars`: comma-delimited `name=value` variables
/// - `varFiles`: comma-delimited variable files
/// - `lockTimeout`: state lock timeout
/// - `target`: resource target
/// - `plan`: saved plan file, passed last as a positional argument
/// - `noColor`: strip color codes from output
/// - `timeout`: milliseconds the command may run
pub const APPLY_PARAMS: &[ParamSpec] = &[
    ParamSpec::repeat_quoted("tfVars", "var"),
    ParamSpec::repeat("varFiles", "var_file"),
    ParamSpec::assign("lockTimeout", "lock-timeout"),
    ParamSpec::assign("target", "target"),
    ParamSpec::excluded(PLAN_KEY),
    ParamSpec::bare("noColor", "no-color"),
    ParamSpec::excluded(TIMEOUT_KEY),
];

pub struct TerraformApply<E = TerraformCommandLine> {
    terraform: E,
}

impl TerraformApply<TerraformCommandLine> {
    pub fn in_directory(directory: impl Into<PathBuf>, options: CommandLineOptions) -> Self {
        Self::new(TerraformCommandLine::with_options(
            TerraformCommand::Apply,
            directory,
            options,
        ))
    }

    pub fn for_root_module(
        base: &Path,
        name: Option<&str>,
        options: CommandLineOptions,
    ) -> TerraformResult<Self> {
        TerraformCommandLine::for_root_module(TerraformCommand::Apply, base, name, options).map(Self::new)
    }
}

impl<E: Executable> TerraformApply<E> {
    pub fn new(terraform: E) -> Self {
        Self { terraform }
    }
}

impl<E: Executable> TerraformOperation for TerraformApply<E> {
    type Output = String;

    fn execute(&self, properties: &Configuration) -> TerraformResult<String> {
        info!("Running terraform apply");

        let mut invocation = CommandInvocation::render(APPLY_PARAMS, properties)?;
        invocation.push_flag("auto-approve");
        if let Some(plan) = properties.get(PLAN_KEY) {
            invocation.push_positional(plan);
        }
        invocation.execute(&self.terraform)
    }
}
