//! Clean goal - delete cached modules and local terraform state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use tfkit_cmd::{Configuration, TerraformClean, TerraformOperation};

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Module cache directory (defaults to src/main/.tfmodules)
    #[arg(long)]
    pub tf_modules: Option<PathBuf>,

    /// Root module name under src/main/tf (defaults to the first one found)
    #[arg(long)]
    pub tf_root_dir: Option<String>,
}

pub fn execute(args: CleanArgs) -> Result<String> {
    let base = std::env::current_dir()?;
    let clean = TerraformClean::for_project(
        &base,
        args.tf_modules.as_deref(),
        args.tf_root_dir.as_deref(),
    )
    .context("Unable to locate terraform root module")?;

    info!("Cleaning terraform files for {:?}", clean.root_module_dir());

    clean
        .execute(&Configuration::new())
        .context("terraform clean failed")
}
