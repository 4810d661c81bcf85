//! `terraform init`.
//!
//! See <https://developer.hashicorp.com/terraform/cli/commands/init>.

use std::path::{Path, PathBuf};

use tfkit_runner::{CommandLineOptions, Executable};
use tracing::info;

use crate::command::{TerraformCommand, TerraformCommandLine};
use crate::config::Configuration;
use crate::error::TerraformResult;
use crate::operation::TerraformOperation;
use crate::params::{CommandInvocation, ParamSpec, TIMEOUT_KEY};

/// Recognized properties, in rendering order.
///
/// - `pluginDir`: load plugins only from this directory
/// - `verifyPlugins`: `false` skips release signature validation
/// - `getPlugins`: `false` skips plugin installation
/// - `backendConfig`: comma-delimited backend configuration files or `key=value` pairs
/// - `timeout`: milliseconds the command may run
pub const INIT_PARAMS: &[ParamSpec] = &[
    ParamSpec::assign("pluginDir", "plugin-dir"),
    ParamSpec::assign("verifyPlugins", "verify-plugins"),
    ParamSpec::assign("getPlugins", "get-plugins"),
    ParamSpec::repeat_double_quoted("backendConfig", "backend-config"),
    ParamSpec::excluded(TIMEOUT_KEY),
];

pub struct TerraformInit<E = TerraformCommandLine> {
    terraform: E,
}

impl TerraformInit<TerraformCommandLine> {
    pub fn in_directory(directory: impl Into<PathBuf>, options: CommandLineOptions) -> Self {
        Self::new(TerraformCommandLine::with_options(
            TerraformCommand::Init,
            directory,
            options,
        ))
    }

    pub fn for_root_module(
        base: &Path,
        name: Option<&str>,
        options: CommandLineOptions,
    ) -> TerraformResult<Self> {
        TerraformCommandLine::for_root_module(TerraformCommand::Init, base, name, options).map(Self::new)
    }
}

impl<E: Executable> TerraformInit<E> {
    pub fn new(terraform: E) -> Self {
        Self { terraform }
    }
}

impl<E: Executable> TerraformOperation for TerraformInit<E> {
    type Output = String;

    fn execute(&self, properties: &Configuration) -> TerraformResult<String> {
        info!("Running terraform init");

        let mut invocation = CommandInvocation::render(INIT_PARAMS, properties)?;
        invocation.push_flag("no-color");
        invocation.execute(&self.terraform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerraformError;
    use std::time::Duration;
    use tfkit_runner::{MockExecutable, MockResponse};

    fn init_with(mock: &MockExecutable) -> TerraformInit<TerraformCommandLine<MockExecutable>> {
        TerraformInit::new(TerraformCommandLine::with_executable(
            TerraformCommand::Init,
            mock.clone(),
        ))
    }

    #[test]
    fn test_init_with_no_properties() {
        let mock = MockExecutable::new().add_response(MockResponse::success("Success!"));

        let output = init_with(&mock).execute(&Configuration::new()).unwrap();

        assert_eq!(output, "Success!");
        let call = mock.last_call().unwrap();
        assert_eq!(call.command, "terraform init -no-color ");
        assert_eq!(call.timeout, None);
    }

    #[test]
    fn test_init_with_all_properties() {
        let mock = MockExecutable::new();
        let properties = Configuration::new()
            .with("backendConfig", "backend.hcl, bucket=tfstate")
            .with("getPlugins", "false")
            .with("verifyPlugins", "true")
            .with("pluginDir", "/opt/plugins")
            .with("timeout", "30000");

        init_with(&mock).execute(&properties).unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(
            call.command,
            "terraform init -plugin-dir=/opt/plugins -verify-plugins=true -get-plugins=false \
             -backend-config=\"backend.hcl\" -backend-config=\"bucket=tfstate\" -no-color "
        );
        assert_eq!(call.timeout, Some(Duration::from_millis(30000)));
    }

    #[test]
    fn test_init_wraps_failures() {
        let mock = MockExecutable::new().add_response(MockResponse::failure(1, "Error: Failed to get existing workspaces"));

        let err = init_with(&mock).execute(&Configuration::new()).unwrap_err();

        assert!(matches!(err, TerraformError::Execution(_)));
        assert!(err.to_string().contains("Failed to get existing workspaces"));
    }
}
