//! tfkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or properties
//! - 5: Terraform error

use std::process::ExitCode;

use clap::Parser;
use tfkit_cmd::{TerraformCommand, TerraformError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const TERRAFORM_ERROR: u8 = 5;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tfkit={level},tfkit_cmd={level},tfkit_runner={level},warn"))
    });

    // Ignore the error if a subscriber was already installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let options = cli.runner_options();
    let binary = cli.binary.as_str();

    let result = match cli.command {
        Commands::Init(args) => commands::terraform::execute(TerraformCommand::Init, args, options, binary),
        Commands::Plan(args) => commands::terraform::execute(TerraformCommand::Plan, args, options, binary),
        Commands::Apply(args) => commands::terraform::execute(TerraformCommand::Apply, args, options, binary),
        Commands::Destroy(args) => {
            commands::terraform::execute(TerraformCommand::Destroy, args, options, binary)
        }
        Commands::Output(args) => {
            commands::terraform::execute(TerraformCommand::Output, args, options, binary)
        }
        Commands::Clean(args) => commands::clean::execute(args),
    };

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::from(ExitCodes::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Map the root terraform error, if any, to an exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.chain().find_map(|cause| cause.downcast_ref::<TerraformError>()) {
        Some(TerraformError::Execution(_)) => ExitCodes::TERRAFORM_ERROR,
        Some(TerraformError::Configuration { .. }) | Some(TerraformError::PropertyFile { .. }) => {
            ExitCodes::INVALID_ARGS
        }
        _ => ExitCodes::GENERAL_ERROR,
    }
}
