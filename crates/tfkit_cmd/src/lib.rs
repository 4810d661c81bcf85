//! # tfkit_cmd
//!
//! Terraform command construction and execution for tfkit.
//!
//! Each operation turns a [`Configuration`] (a string property bag) into an
//! ordered, quoted flag string using its parameter table, prefixes it with
//! `terraform <subcommand>` and runs it through the shell.
//!
//! ## Features
//!
//! - init, plan, apply, destroy and output operations
//! - Declarative parameter tables with fixed flag ordering
//! - Per-invocation timeouts through the `timeout` property
//! - Clean-up of cached modules and local state files
//! - Property files in TOML, YAML or JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfkit_cmd::{Configuration, TerraformApply, TerraformOperation};
//! use tfkit_runner::CommandLineOptions;
//!
//! let apply = TerraformApply::in_directory("infra/network", CommandLineOptions::default());
//! let properties = Configuration::new()
//!     .with("tfVars", "region=eu-west-1, env=dev")
//!     .with("timeout", "1200000");
//!
//! // terraform apply -var 'region=eu-west-1' -var 'env=dev' -auto-approve
//! let output = apply.execute(&properties)?;
//! println!("{output}");
//! # Ok::<(), tfkit_cmd::TerraformError>(())
//! ```

pub mod apply;
pub mod clean;
pub mod command;
pub mod config;
pub mod destroy;
pub mod error;
pub mod init;
pub mod operation;
pub mod output;
pub mod params;
pub mod paths;
pub mod plan;

pub use apply::{TerraformApply, APPLY_PARAMS};
pub use clean::TerraformClean;
pub use command::{TerraformCommand, TerraformCommandLine, DEFAULT_BINARY};
pub use config::Configuration;
pub use destroy::{TerraformDestroy, DESTROY_PARAMS};
pub use error::{TerraformError, TerraformResult};
pub use init::{TerraformInit, INIT_PARAMS};
pub use operation::TerraformOperation;
pub use output::{TerraformOutput, OUTPUT_PARAMS};
pub use params::{CommandInvocation, ParamSpec, RenderKind, TIMEOUT_KEY};
pub use plan::{TerraformPlan, PLAN_PARAMS};
