//! Build layer and launch metadata
//!
//! The build owns one layer, `functions-framework`, under the lifecycle's
//! layers directory. It serves as the `GOPATH` of the build and carries the
//! environment later build steps and the running function see:
//!
//! ```text
//! <layers>/
//! ├── functions-framework.toml        # [types] build / launch / cache
//! ├── functions-framework/
//! │   ├── env.build/GOPATH.override
//! │   ├── env.build/GOOGLE_BUILDABLE.override
//! │   └── env.launch/FUNCTION_TARGET.default
//! └── launch.toml                     # [[processes]] web
//! ```
//!
//! Nothing is written until [`Layer::persist`] and [`write_launch_toml`] are
//! called after a successful build.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::utils::fs::{ensure_dir, safe_write};

/// A lifecycle layer and the environment it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    path: PathBuf,
    types: LayerTypes,
    build_env: BTreeMap<String, String>,
    launch_env: BTreeMap<String, String>,
}

/// Phases a layer is made available to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerTypes {
    /// Visible to subsequent build steps
    pub build: bool,
    /// Present in the launch image
    pub launch: bool,
    /// Restored on the next build
    pub cache: bool,
}

#[derive(Serialize)]
struct LayerMetadata<'a> {
    types: &'a LayerTypes,
}

impl Layer {
    /// Creates the layer directory `<layers_dir>/<name>`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created.
    pub fn create(layers_dir: &Path, name: &str) -> Result<Self> {
        let path = layers_dir.join(name);
        ensure_dir(&path)?;
        tracing::debug!("Using layer {} at {}", name, path.display());

        Ok(Self {
            name: name.to_string(),
            path,
            types: LayerTypes::default(),
            build_env: BTreeMap::new(),
            launch_env: BTreeMap::new(),
        })
    }

    /// Layer directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current layer types.
    #[must_use]
    pub const fn types(&self) -> LayerTypes {
        self.types
    }

    /// Makes the layer visible to subsequent build steps.
    pub fn set_build(&mut self, build: bool) {
        self.types.build = build;
    }

    /// Includes the layer in the launch image.
    pub fn set_launch(&mut self, launch: bool) {
        self.types.launch = launch;
    }

    /// Overrides `key` for subsequent build steps.
    pub fn override_build_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.build_env.insert(key.into(), value.into());
    }

    /// Sets a default for `key` in the launch environment.
    pub fn default_launch_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.launch_env.insert(key.into(), value.into());
    }

    /// Build environment overrides.
    #[must_use]
    pub const fn build_env(&self) -> &BTreeMap<String, String> {
        &self.build_env
    }

    /// Path of the layer metadata file, a sibling of the layer directory.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.path.with_file_name(format!("{}.toml", self.name))
    }

    /// Writes the layer metadata and environment files.
    ///
    /// # Errors
    ///
    /// Fails if any file cannot be written.
    pub fn persist(&self) -> Result<()> {
        let metadata = toml::to_string(&LayerMetadata {
            types: &self.types,
        })
        .context("Failed to serialize layer metadata")?;
        safe_write(&self.metadata_path(), &metadata)?;

        write_env_dir(&self.path.join("env.build"), &self.build_env, "override")?;
        write_env_dir(&self.path.join("env.launch"), &self.launch_env, "default")?;

        tracing::debug!(
            "Persisted layer {} ({} build, {} launch variables)",
            self.name,
            self.build_env.len(),
            self.launch_env.len()
        );
        Ok(())
    }
}

fn write_env_dir(dir: &Path, vars: &BTreeMap<String, String>, action: &str) -> Result<()> {
    if vars.is_empty() {
        return Ok(());
    }
    ensure_dir(dir)?;
    for (key, value) in vars {
        let file = dir.join(format!("{key}.{action}"));
        safe_write(&file, value)
            .with_context(|| format!("Failed to write environment variable {key}"))?;
    }
    Ok(())
}

/// A process declared in `launch.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchProcess {
    /// Process type, e.g. `web`
    #[serde(rename = "type")]
    pub kind: String,
    /// Command and arguments
    pub command: Vec<String>,
    /// Whether this is the image's default process
    pub default: bool,
}

impl LaunchProcess {
    /// The default `web` process running `command`.
    #[must_use]
    pub fn web(command: &str) -> Self {
        Self {
            kind: "web".to_string(),
            command: vec![command.to_string()],
            default: true,
        }
    }
}

#[derive(Serialize)]
struct LaunchMetadata<'a> {
    processes: &'a [LaunchProcess],
}

/// Writes `<layers_dir>/launch.toml` declaring `processes`.
///
/// # Errors
///
/// Fails if the file cannot be serialized or written.
pub fn write_launch_toml(layers_dir: &Path, processes: &[LaunchProcess]) -> Result<()> {
    let content = toml::to_string(&LaunchMetadata {
        processes,
    })
    .context("Failed to serialize launch metadata")?;
    safe_write(&layers_dir.join("launch.toml"), &content)
}
