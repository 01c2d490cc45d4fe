//! Package name extraction
//!
//! The package name of the function is read by a small Go program shipped
//! with the buildpack (`converter/get_package`). It runs with the same
//! toolchain that builds the function, so the parser always accepts the
//! function's syntax.
//!
//! The helper runs in GOPATH mode with `GOPATH` set to its own directory and a
//! private `GOCACHE` that is removed after every call, successful or not.

use anyhow::{Context, Result};
use std::path::Path;

use crate::constants::PACKAGE_HELPER_DIR;
use crate::process::{Attribution, CommandRunner, ToolCommand};
use crate::utils::fs::ScratchDir;

/// Builds the helper invocation for `source`.
///
/// `helper_dir` doubles as working directory and `GOPATH`.
#[must_use]
pub fn package_helper_command(helper_dir: &Path, gocache: &Path, source: &Path) -> ToolCommand {
    ToolCommand::go_run("main", ["-dir".to_string(), source.display().to_string()])
        .current_dir(helper_dir)
        .env("GOPATH", helper_dir.display().to_string())
        .env("GOCACHE", gocache.display().to_string())
        .attribution(Attribution::User)
        .with_context("get_package")
}

/// Returns the Go package name declared in `source`.
///
/// # Arguments
///
/// * `runner` - executes the helper
/// * `buildpack_root` - directory containing `converter/get_package`
/// * `scratch_root` - parent of the call-local `GOCACHE`
/// * `source` - directory holding the function's Go files
///
/// # Errors
///
/// Fails if the scratch cache cannot be created or the helper exits non-zero
/// (for example when `source` has no Go files). The scratch cache is removed
/// in both cases.
pub async fn extract_package_name<R: CommandRunner>(
    runner: &R,
    buildpack_root: &Path,
    scratch_root: &Path,
    source: &Path,
) -> Result<String> {
    let helper_dir = buildpack_root.join(PACKAGE_HELPER_DIR);
    let cache = ScratchDir::new_in(scratch_root, "gocache")?;

    let command = package_helper_command(&helper_dir, cache.path(), source);
    let output = runner
        .run_checked(&command)
        .await
        .with_context(|| format!("Failed to extract package name from {}", source.display()))?;

    let package = output.stdout_trimmed().to_string();
    tracing::debug!("Function package name: {}", package);
    Ok(package)
}
