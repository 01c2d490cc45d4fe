//! The function being converted into an application
//!
//! A [`FunctionInfo`] describes the user's function: where its source lives,
//! which exported symbol to serve, and the import path of its package. It is
//! created once per build and never mutated; steps that learn more about the
//! function (its package name, a new location after relocation) produce a new
//! value.
//!
//! [`relocate_function_source`] performs the filesystem move that runs before
//! any strategy is chosen: the uploaded files are pushed down into
//! `serverless_function_source_code/` so that the generated application can be
//! assembled in the application root.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::constants::{FN_SOURCE_DIR, RESERVED_CONFIG_PREFIX};
use crate::utils::fs::{ensure_dir, move_path, remove_dir_all};

/// Source location, target symbol and package import path of a function.
///
/// The field names are the variables available to the entry point templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    /// Absolute directory containing the function's Go files
    pub source: PathBuf,
    /// Exported function to register with the framework
    pub target: String,
    /// Import path of the function package (empty until resolved)
    pub package: String,
}

impl FunctionInfo {
    /// Creates a function description whose package is not yet known.
    pub fn new(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            package: String::new(),
        }
    }

    /// Returns a copy with the package import path set.
    #[must_use]
    pub fn with_package(&self, package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..self.clone()
        }
    }

    /// Returns a copy whose source directory is `source`.
    #[must_use]
    pub fn relocated_to(&self, source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..self.clone()
        }
    }
}

/// Whether a top-level entry of the application root stays where it is.
fn is_reserved_entry(name: &str) -> bool {
    name == FN_SOURCE_DIR || name.starts_with(RESERVED_CONFIG_PREFIX)
}

/// Moves the application root's contents into the function source directory.
///
/// Any existing `serverless_function_source_code/` is removed first. Every
/// other top-level entry is moved into it, except names starting with
/// `.google` (build configuration owned by the platform). Returns the new
/// source directory.
///
/// Moves are renames; if one fails the entries moved so far are not put back.
///
/// # Errors
///
/// Returns an error if the application root cannot be read or an entry cannot
/// be moved.
pub fn relocate_function_source(app_root: &Path) -> Result<PathBuf> {
    let fn_source = app_root.join(FN_SOURCE_DIR);
    remove_dir_all(&fn_source)?;
    ensure_dir(&fn_source)?;

    // Listed up front; the loop below changes the directory being read.
    let entries = std::fs::read_dir(app_root)
        .and_then(|dir| dir.collect::<std::io::Result<Vec<_>>>())
        .with_context(|| format!("Failed to read application root: {}", app_root.display()))?;

    let mut moved = 0_usize;
    for entry in entries {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if is_reserved_entry(&name_str) {
            tracing::trace!("Leaving {} in the application root", name_str);
            continue;
        }

        move_path(&entry.path(), &fn_source.join(&name))?;
        moved += 1;
    }

    tracing::debug!("Moved {} entries into {}", moved, fn_source.display());
    Ok(fn_source)
}
