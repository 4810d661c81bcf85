//! Conventional locations of root modules and the module cache.
//!
//! A project keeps its root modules under `src/main/tf/<name>` and a local
//! module cache under `src/main/.tfmodules`.

use std::path::{Path, PathBuf};

use crate::error::{TerraformError, TerraformResult};

/// Directory holding the root modules, relative to the project base.
pub const ROOT_MODULES_DIR: [&str; 3] = ["src", "main", "tf"];

/// Module cache directory, relative to the project base.
pub const MODULES_CACHE_DIR: [&str; 3] = ["src", "main", ".tfmodules"];

pub fn root_modules_dir(base: &Path) -> PathBuf {
    ROOT_MODULES_DIR.iter().fold(base.to_path_buf(), |p, c| p.join(c))
}

pub fn default_modules_dir(base: &Path) -> PathBuf {
    MODULES_CACHE_DIR.iter().fold(base.to_path_buf(), |p, c| p.join(c))
}

/// The named root module; it must exist.
pub fn root_module_dir(base: &Path, name: &str) -> TerraformResult<PathBuf> {
    let dir = root_modules_dir(base).join(name);
    if !dir.is_dir() {
        return Err(TerraformError::Filesystem(format!(
            "Terraform root module {} does not exist!",
            dir.display()
        )));
    }
    Ok(dir)
}

/// First root module in lexicographic order.
pub fn default_root_module_dir(base: &Path) -> TerraformResult<PathBuf> {
    let parent = root_modules_dir(base);
    let entries = std::fs::read_dir(&parent).map_err(|e| {
        TerraformError::Filesystem(format!("Unable to read {}: {}", parent.display(), e))
    })?;

    let mut modules = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            modules.push(path);
        }
    }
    modules.sort();

    modules.into_iter().next().ok_or_else(|| {
        TerraformError::Filesystem(format!("No terraform root module found in {}", parent.display()))
    })
}

/// `root_module_dir` when a name is given, `default_root_module_dir` otherwise.
pub fn resolve_root_module_dir(base: &Path, name: Option<&str>) -> TerraformResult<PathBuf> {
    match name.filter(|n| !n.trim().is_empty()) {
        Some(name) => root_module_dir(base, name),
        None => default_root_module_dir(base),
    }
}
