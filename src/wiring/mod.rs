//! Module-based wiring of the function into the application
//!
//! For a function with a `go.mod`, the application root becomes a new module
//! (`serverless_function_app`) that depends on the function's module through a
//! local `replace` directive:
//!
//! ```text
//! module serverless_function_app
//!
//! require example.com/fn v0.0.0
//! replace example.com/fn v0.0.0 => /workspace/serverless_function_source_code
//! ```
//!
//! The function's module path is validated before anything is written: Go
//! only accepts a `replace` for paths whose first element contains a dot.
//!
//! If the function does not require the functions framework itself, the
//! pinned default release is added to the application with `go get`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, ENTRYPOINT_FILE, FRAMEWORK_DEFAULT_VERSION, FRAMEWORK_MODULE};
use crate::core::GofnError;
use crate::function::FunctionInfo;
use crate::process::{Attribution, CommandRunner, ToolCommand};

/// `go list -m` stderr fragments meaning "the module is not required".
///
/// This is the only place the build looks at failure text. The wording comes
/// from the Go toolchain and is not a stable interface.
pub const UNKNOWN_DEPENDENCY_MARKERS: &[&str] = &["not a known dependency"];

/// What a wiring strategy prepared for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WiringOutcome {
    /// Where the entry point must be written
    pub entrypoint: PathBuf,
    /// Framework version the application builds against
    pub framework_version: String,
    /// The function with its final source and import path
    pub function: FunctionInfo,
}

/// Whether `stderr` of a failed `go list -m` says the module is not required.
#[must_use]
pub fn is_unknown_dependency(stderr: &str) -> bool {
    UNKNOWN_DEPENDENCY_MARKERS.iter().any(|marker| stderr.contains(marker))
}

/// Checks that the first path element of `module` contains a dot.
///
/// # Errors
///
/// [`GofnError::InvalidModulePath`] naming the module.
pub fn validate_module_path(module: &str) -> Result<(), GofnError> {
    let first = module.split('/').next().unwrap_or_default();
    if first.contains('.') {
        Ok(())
    } else {
        Err(GofnError::InvalidModulePath {
            module: module.to_string(),
        })
    }
}

/// Returns the framework version the function's module requires, if any.
///
/// An empty version counts as unspecified.
///
/// # Errors
///
/// Fails when `go list` fails for any reason other than the framework not
/// being a dependency.
pub async fn framework_specified_version<R: CommandRunner>(
    runner: &R,
    source: &Path,
) -> Result<Option<String>> {
    let command = ToolCommand::go_list_module_version(FRAMEWORK_MODULE)
        .current_dir(source)
        .with_context("framework version");
    let output = runner.run(&command).await?;

    if output.success() {
        let version = output.stdout_trimmed();
        if version.is_empty() {
            tracing::info!("Functions framework listed without a version, using default");
            return Ok(None);
        }
        tracing::info!("Found framework version {}", version);
        return Ok(Some(version.to_string()));
    }

    if is_unknown_dependency(&output.stderr) {
        tracing::info!("No framework version specified, using default");
        return Ok(None);
    }

    Err(anyhow::Error::from(command.failure(&output)))
}

/// Wires a module-based function into the application root.
///
/// `function.package` is the bare package name; the returned function carries
/// the full import path. The entry point goes to `<app_root>/main.go`.
///
/// # Errors
///
/// - [`GofnError::InvalidModulePath`] before any command modifies the
///   application root
/// - [`GofnError::CommandFailed`] for any failing `go` invocation
pub async fn wire_module<R: CommandRunner>(
    runner: &R,
    app_root: &Path,
    function: &FunctionInfo,
) -> Result<WiringOutcome> {
    let list = ToolCommand::go_list_module().current_dir(&function.source).with_context("wiring");
    let module = runner
        .run_checked(&list)
        .await
        .context("Failed to read the function's module path")?
        .stdout_trimmed()
        .to_string();

    validate_module_path(&module)?;

    // Import the package subdirectory if one with the package's name exists,
    // otherwise the package is the module root.
    let package_dir = app_root.join(&function.package);
    let import_path = if !function.package.is_empty() && package_dir.exists() {
        format!("{module}/{}", function.package)
    } else {
        module.clone()
    };
    tracing::debug!("Function module {} imported as {}", module, import_path);

    let edits = [
        ToolCommand::go_mod_init(APP_NAME),
        ToolCommand::go_mod_require_local(&module),
        ToolCommand::go_mod_replace_local(&module, &function.source),
    ];
    for edit in edits {
        runner.run_checked(&edit.current_dir(app_root).with_context("wiring")).await?;
    }

    let framework_version = match framework_specified_version(runner, &function.source)
        .await
        .context("checking for functions framework dependency in go.mod")?
    {
        Some(version) => version,
        None => {
            let target = format!("{FRAMEWORK_MODULE}@{FRAMEWORK_DEFAULT_VERSION}");
            let get = ToolCommand::go_get(&target)
                .current_dir(app_root)
                .attribution(Attribution::User)
                .with_context("wiring");
            runner.run_checked(&get).await?;
            FRAMEWORK_DEFAULT_VERSION.to_string()
        }
    };

    Ok(WiringOutcome {
        entrypoint: app_root.join(ENTRYPOINT_FILE),
        framework_version,
        function: function.with_package(import_path),
    })
}
