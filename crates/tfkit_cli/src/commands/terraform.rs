//! Terraform goals - render properties and run the matching subcommand.

use anyhow::{Context, Result};
use tracing::info;

use tfkit_cmd::{
    Configuration, TerraformApply, TerraformCommand, TerraformCommandLine, TerraformDestroy,
    TerraformInit, TerraformOperation, TerraformOutput, TerraformPlan,
};
use tfkit_runner::CommandLineOptions;

use super::PropertyArgs;

pub fn execute(
    command: TerraformCommand,
    args: PropertyArgs,
    options: CommandLineOptions,
    binary: &str,
) -> Result<String> {
    let properties = args.configuration()?;
    let base = std::env::current_dir()?;

    let terraform =
        TerraformCommandLine::for_root_module(command, &base, args.tf_root_dir.as_deref(), options)
            .context("Unable to locate terraform root module")?
            .with_binary(binary);

    info!(
        "Running {} in {:?} with {} properties",
        terraform.prefix(),
        terraform.directory(),
        properties.len()
    );

    run(command, terraform, &properties)
        .with_context(|| format!("terraform {} failed", command))
}

fn run(
    command: TerraformCommand,
    terraform: TerraformCommandLine,
    properties: &Configuration,
) -> tfkit_cmd::TerraformResult<String> {
    match command {
        TerraformCommand::Init => TerraformInit::new(terraform).execute(properties),
        TerraformCommand::Plan => TerraformPlan::new(terraform).execute(properties),
        TerraformCommand::Apply => TerraformApply::new(terraform).execute(properties),
        TerraformCommand::Destroy => TerraformDestroy::new(terraform).execute(properties),
        TerraformCommand::Output => TerraformOutput::new(terraform).execute(properties),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/main/tf/app")).unwrap();
        dir
    }

    fn dry_run_in(base: &Path, command: TerraformCommand, properties: &Configuration) -> String {
        let terraform = TerraformCommandLine::for_root_module(
            command,
            base,
            None,
            CommandLineOptions::new().dry_run(),
        )
        .unwrap();
        run(command, terraform, properties).unwrap()
    }

    #[test]
    fn test_each_goal_dispatches_to_its_operation() {
        let dir = project();
        let empty = Configuration::new();

        assert_eq!(
            dry_run_in(dir.path(), TerraformCommand::Init, &empty),
            "[DRY-RUN] terraform init -no-color "
        );
        assert_eq!(
            dry_run_in(dir.path(), TerraformCommand::Plan, &empty),
            "[DRY-RUN] terraform plan -input=false "
        );
        assert_eq!(
            dry_run_in(dir.path(), TerraformCommand::Apply, &empty),
            "[DRY-RUN] terraform apply -auto-approve "
        );
        assert_eq!(
            dry_run_in(dir.path(), TerraformCommand::Destroy, &empty),
            "[DRY-RUN] terraform destroy -auto-approve "
        );
        assert_eq!(
            dry_run_in(dir.path(), TerraformCommand::Output, &empty),
            "[DRY-RUN] terraform output "
        );
    }

    #[test]
    fn test_bad_timeout_is_reported() {
        let dir = project();
        let terraform = TerraformCommandLine::for_root_module(
            TerraformCommand::Apply,
            dir.path(),
            Some("app"),
            CommandLineOptions::new().dry_run(),
        )
        .unwrap();

        let err = run(
            TerraformCommand::Apply,
            terraform,
            &Configuration::new().with("timeout", "abc"),
        )
        .unwrap_err();
        assert!(matches!(err, tfkit_cmd::TerraformError::Configuration { .. }));
    }
}
