//! `terraform plan`.

use std::path::{Path, PathBuf};

use tfkit_runner::{CommandLineOptions, Executable};
use tracing::info;

use crate::command::{TerraformCommand, TerraformCommandLine};
use crate::config::Configuration;
use crate::error::TerraformResult;
use crate::operation::TerraformOperation;
use crate::params::{CommandInvocation, ParamSpec, TIMEOUT_KEY};

const PLAN_INPUT_KEY: &str = "planInput";

/// Recognized properties, in rendering order.
///
/// - `tfVars`: comma-delimited `name=value` variables
/// - `varFiles`: comma-delimited variable files
/// - `lockTimeout`: state lock timeout
/// - `target`: resource target
/// - `planOutputFile`: where to save the plan
/// - `planInput`: ask for input; `-input=false` is passed when unset
/// - `refreshState`: refresh state before planning
/// - `tfState`: state file path
/// - `noColor`: strip color codes from output
/// - `destroyPlan`: plan a destroy
/// - `timeout`: milliseconds the command may run
pub const PLAN_PARAMS: &[ParamSpec] = &[
    ParamSpec::repeat_quoted("tfVars", "var"),
    ParamSpec::repeat("varFiles", "var_file"),
    ParamSpec::assign("lockTimeout", "lock-timeout"),
    ParamSpec::assign("target", "target"),
    ParamSpec::assign("planOutputFile", "out"),
    ParamSpec::assign(PLAN_INPUT_KEY, "input"),
    ParamSpec::assign("refreshState", "refresh"),
    ParamSpec::assign("tfState", "state"),
    ParamSpec::bare("noColor", "no-color"),
    ParamSpec::bare("destroyPlan", "destroy"),
    ParamSpec::excluded(TIMEOUT_KEY),
];

pub struct TerraformPlan<E = TerraformCommandLine> {
    terraform: E,
}

impl TerraformPlan<TerraformCommandLine> {
    pub fn in_directory(directory: impl Into<PathBuf>, options: CommandLineOptions) -> Self {
        Self::new(TerraformCommandLine::with_options(
            TerraformCommand::Plan,
            directory,
            options,
        ))
    }

    pub fn for_root_module(
        base: &Path,
        name: Option<&str>,
        options: CommandLineOptions,
    ) -> TerraformResult<Self> {
        TerraformCommandLine::for_root_module(TerraformCommand::Plan, base, name, options).map(Self::new)
    }
}

impl<E: Executable> TerraformPlan<E> {
    pub fn new(terraform: E) -> Self {
        Self { terraform }
    }
}

impl<E: Executable> TerraformOperation for TerraformPlan<E> {
    type Output = String;

    fn execute(&self, properties: &Configuration) -> TerraformResult<String> {
        info!("Running terraform plan");

        let mut invocation = CommandInvocation::render(PLAN_PARAMS, properties)?;
        if !properties.contains(PLAN_INPUT_KEY) {
            invocation.push_flag("input=false");
        }
        invocation.execute(&self.terraform)
    }
}
