//! `terraform destroy`, always with `-auto-approve`.

use std::path::{Path, PathBuf};

use tfkit_runner::{CommandLineOptions, Executable};
use tracing::info;

use crate::command::{TerraformCommand, TerraformCommandLine};
use crate::config::Configuration;
use crate::error::TerraformResult;
use crate::operation::TerraformOperation;
use crate::params::{CommandInvocation, ParamSpec, TIMEOUT_KEY};

/// Recognized properties, in rendering order. Same meaning as for apply, plus
/// `tfState` for the state file path.
pub const DESTROY_PARAMS: &[ParamSpec] = &[
    ParamSpec::repeat_quoted("tfVars", "var"),
    ParamSpec::repeat("varFiles", "var_file"),
    ParamSpec::assign("lockTimeout", "lock-timeout"),
    ParamSpec::assign("target", "target"),
    ParamSpec::assign("tfState", "state"),
    ParamSpec::bare("noColor", "no-color"),
    ParamSpec::excluded(TIMEOUT_KEY),
];

pub struct TerraformDestroy<E = TerraformCommandLine> {
    terraform: E,
}

impl TerraformDestroy<TerraformCommandLine> {
    pub fn in_directory(directory: impl Into<PathBuf>, options: CommandLineOptions) -> Self {
        Self::new(TerraformCommandLine::with_options(
            TerraformCommand::Destroy,
            directory,
            options,
        ))
    }

    pub fn for_root_module(
        base: &Path,
        name: Option<&str>,
        options: CommandLineOptions,
    ) -> TerraformResult<Self> {
        TerraformCommandLine::for_root_module(TerraformCommand::Destroy, base, name, options)
            .map(Self::new)
    }
}

impl<E: Executable> TerraformDestroy<E> {
    pub fn new(terraform: E) -> Self {
        Self { terraform }
    }
}

impl<E: Executable> TerraformOperation for TerraformDestroy<E> {
    type Output = String;

    fn execute(&self, properties: &Configuration) -> TerraformResult<String> {
        info!("Running terraform destroy");

        let mut invocation = CommandInvocation::render(DESTROY_PARAMS, properties)?;
        invocation.push_flag("auto-approve");
        invocation.execute(&self.terraform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tfkit_runner::MockExecutable;

    fn destroy_with(mock: &MockExecutable) -> TerraformDestroy<TerraformCommandLine<MockExecutable>> {
        TerraformDestroy::new(TerraformCommandLine::with_executable(
            TerraformCommand::Destroy,
            mock.clone(),
        ))
    }

    #[test]
    fn test_destroy_with_no_properties() {
        let mock = MockExecutable::new();

        destroy_with(&mock).execute(&Configuration::new()).unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(call.command, "terraform destroy -auto-approve ");
        assert_eq!(call.timeout, None);
    }

    #[test]
    fn test_destroy_with_all_properties() {
        let mock = MockExecutable::new();
        let properties = Configuration::new()
            .with("tfVars", "env=dev")
            .with("varFiles", "dev.tfvars")
            .with("lockTimeout", "30s")
            .with("target", "aws_s3_bucket.logs")
            .with("tfState", "dev.tfstate")
            .with("noColor", "true")
            .with("timeout", "60000");

        destroy_with(&mock).execute(&properties).unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(
            call.command,
            "terraform destroy -var 'env=dev' -var_file=dev.tfvars -lock-timeout=30s \
             -target=aws_s3_bucket.logs -state=dev.tfstate -no-color -auto-approve "
        );
        assert_eq!(call.timeout, Some(Duration::from_secs(60)));
    }
}
