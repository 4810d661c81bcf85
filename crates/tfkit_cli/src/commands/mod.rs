//! CLI command definitions.
//!
//! Each terraform subcommand is exposed as a goal taking `-D key=value`
//! properties; `clean` removes cached modules and local state.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tfkit_cmd::{Configuration, DEFAULT_BINARY};
use tfkit_runner::CommandLineOptions;

pub mod clean;
pub mod terraform;

/// tfkit - drive terraform from property bags
#[derive(Parser, Debug)]
#[command(name = "tfkit")]
#[command(version, about = "tfkit - drive terraform from property bags")]
#[command(long_about = r#"
tfkit renders named properties into terraform command lines and runs them
inside a root module (src/main/tf/<module>).

GOALS:
  init     → terraform init
  plan     → terraform plan
  apply    → terraform apply -auto-approve
  destroy  → terraform destroy -auto-approve
  output   → terraform output
  clean    → delete src/main/.tfmodules and local .terraform/.tfstate files

EXAMPLE:
  tfkit plan --tf-root-dir network -D tfVars="region=eu-west-1, env=dev" -D timeout=300000

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or properties
  5 - Terraform error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Default timeout in milliseconds when no `timeout` property is given
    #[arg(long, global = true, env = "TFKIT_TIMEOUT_MS", default_value_t = 600_000)]
    pub timeout_ms: u64,

    /// Print commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Terraform binary to invoke
    #[arg(long, global = true, env = "TFKIT_BINARY", default_value = DEFAULT_BINARY)]
    pub binary: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn runner_options(&self) -> CommandLineOptions {
        let options = CommandLineOptions::new().default_timeout(Duration::from_millis(self.timeout_ms));
        if self.dry_run {
            options.dry_run()
        } else {
            options
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the root module
    Init(PropertyArgs),

    /// Create an execution plan
    Plan(PropertyArgs),

    /// Apply changes without prompting
    Apply(PropertyArgs),

    /// Destroy managed infrastructure without prompting
    Destroy(PropertyArgs),

    /// Print root module outputs
    Output(PropertyArgs),

    /// Delete cached modules and local terraform state
    Clean(clean::CleanArgs),
}

/// Arguments shared by every terraform goal.
#[derive(Args, Debug)]
pub struct PropertyArgs {
    /// Root module name under src/main/tf (defaults to the first one found)
    #[arg(long)]
    pub tf_root_dir: Option<String>,

    /// Property definition, e.g. -D noColor or -D tfVars="a=1, b=2"
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Property file (.toml, .yaml, .yml or .json) loaded before -D definitions
    #[arg(short, long)]
    pub properties: Option<PathBuf>,
}

impl PropertyArgs {
    /// Property file first, then `-D` definitions on top.
    pub fn configuration(&self) -> Result<Configuration> {
        let mut config = match &self.properties {
            Some(path) => Configuration::from_file(path)?,
            None => Configuration::new(),
        };
        config.merge(
            Configuration::from_pairs(&self.defines).context("Invalid property definition")?,
        );
        Ok(config)
    }
}
