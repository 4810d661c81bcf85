//! Removal of cached modules and local terraform state.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::error::{TerraformError, TerraformResult};
use crate::operation::TerraformOperation;
use crate::paths;

/// File names containing any of these are removed.
const CLEAN_PATTERNS: [&str; 2] = [".terraform", ".tfstate"];

/// Deletes the module cache plus every `.terraform*` and `*.tfstate*` entry
/// found under the directory holding the root modules' directory
/// (`src/main` for `src/main/tf/<module>`).
pub struct TerraformClean {
    modules_dir: PathBuf,
    root_module_dir: PathBuf,
}

impl TerraformClean {
    pub fn new(modules_dir: impl Into<PathBuf>, root_module_dir: impl Into<PathBuf>) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            root_module_dir: root_module_dir.into(),
        }
    }

    /// Resolve both directories by convention when not given explicitly.
    pub fn for_project(
        base: &Path,
        modules_dir: Option<&Path>,
        root_module: Option<&str>,
    ) -> TerraformResult<Self> {
        let modules_dir = modules_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| paths::default_modules_dir(base));
        let root_module_dir = paths::resolve_root_module_dir(base, root_module)?;
        Ok(Self::new(modules_dir, root_module_dir))
    }

    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    pub fn root_module_dir(&self) -> &Path {
        &self.root_module_dir
    }

    /// Everything that would be deleted, outermost paths only.
    fn collect_targets(&self) -> TerraformResult<Vec<PathBuf>> {
        let mut targets = Vec::new();
        if self.modules_dir.exists() {
            targets.push(self.modules_dir.clone());
        }

        let search_root = self
            .root_module_dir
            .parent()
            .and_then(Path::parent)
            .unwrap_or(&self.root_module_dir);
        let mut walker = WalkDir::new(search_root).min_depth(1).into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| {
                TerraformError::Filesystem(format!("Unable to scan {}: {}", search_root.display(), e))
            })?;

            let covered = targets.iter().any(|t| entry.path().starts_with(t));
            let matched = {
                let name = entry.file_name().to_string_lossy();
                CLEAN_PATTERNS.iter().any(|p| name.contains(p))
            };

            if covered || matched {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                if !covered {
                    targets.push(entry.into_path());
                }
            }
        }

        Ok(targets)
    }
}

impl TerraformOperation for TerraformClean {
    type Output = String;

    /// Returns a log listing every deleted path, one per line.
    fn execute(&self, _properties: &Configuration) -> TerraformResult<String> {
        if !self.root_module_dir.exists() {
            return Err(TerraformError::Filesystem(format!(
                "{} does not exist!",
                self.root_module_dir.display()
            )));
        }

        info!("Cleaning terraform files around {:?}", self.root_module_dir);

        let targets = self.collect_targets()?;
        let mut log = String::from("Deleting...\n");
        for target in targets {
            debug!("Deleting {:?}", target);
            fs_extra::remove_items(&[&target]).map_err(|e| {
                TerraformError::Filesystem(format!("Failed to delete {}: {}", target.display(), e))
            })?;
            log.push_str(&target.display().to_string());
            log.push('\n');
        }

        Ok(log)
    }
}
