//! Build configuration
//!
//! Settings come from three places, later ones winning:
//!
//! 1. An optional TOML file (`--config` / `GOFN_CONFIG`)
//! 2. Environment variables the lifecycle sets (`FUNCTION_TARGET`,
//!    `CNB_LAYERS_DIR`, ...), read by clap
//! 3. Command line flags
//!
//! Sources 2 and 3 arrive together as a [`BuildConfig`] built by the CLI; the
//! two layers are combined with [`BuildConfig::merge`] and resolved into the
//! [`BuildSettings`] the pipeline runs with. Nothing below the CLI reads the
//! process environment.
//!
//! # File Format
//!
//! ```toml
//! function_target = "HelloWorld"
//! function_signature_type = "http"
//! app_root = "/workspace"
//! layers_dir = "/layers"
//! buildpack_dir = "/cnb/buildpacks/google.go.functions-framework/0.9.0"
//! scratch_dir = "/tmp"
//! # Skip the `go version` probe
//! go_version = "1.13"
//! web_command = "/layers/google.go.build/bin/main"
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::DEFAULT_WEB_COMMAND;
use crate::core::GofnError;

/// Partial configuration from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Exported function to serve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_target: Option<String>,

    /// Signature type exposed to the function at launch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_signature_type: Option<String>,

    /// Application root holding the uploaded function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_root: Option<PathBuf>,

    /// Lifecycle layers directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers_dir: Option<PathBuf>,

    /// Buildpack installation directory (contains `converter/get_package`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildpack_dir: Option<PathBuf>,

    /// Parent directory for temporary Go caches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// Go toolchain version, instead of probing `go version`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,

    /// Command of the `web` launch process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_command: Option<String>,
}

impl BuildConfig {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// [`GofnError::ConfigError`] if the file cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| GofnError::ConfigError {
            message: format!("Failed to read config from {}: {e}", path.display()),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| GofnError::ConfigError {
            message: format!("Failed to parse config from {}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns an empty configuration.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub async fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Combines two layers; values set in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            function_target: overrides.function_target.or(self.function_target),
            function_signature_type: overrides
                .function_signature_type
                .or(self.function_signature_type),
            app_root: overrides.app_root.or(self.app_root),
            layers_dir: overrides.layers_dir.or(self.layers_dir),
            buildpack_dir: overrides.buildpack_dir.or(self.buildpack_dir),
            scratch_dir: overrides.scratch_dir.or(self.scratch_dir),
            go_version: overrides.go_version.or(self.go_version),
            web_command: overrides.web_command.or(self.web_command),
        }
    }

    /// Whether a non-empty function target is configured.
    #[must_use]
    pub fn has_function_target(&self) -> bool {
        self.function_target.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Resolves the settings for a build.
    ///
    /// The application root defaults to the current directory and the scratch
    /// directory to the system temporary directory.
    ///
    /// # Errors
    ///
    /// - [`GofnError::MissingFunctionTarget`] without a function target
    /// - [`GofnError::ConfigError`] without a layers or buildpack directory
    pub fn into_settings(self) -> Result<BuildSettings> {
        if !self.has_function_target() {
            return Err(GofnError::MissingFunctionTarget.into());
        }
        let function_target = self.function_target.unwrap_or_default();

        let layers_dir = self.layers_dir.ok_or_else(|| GofnError::ConfigError {
            message: "layers directory is not set (--layers or CNB_LAYERS_DIR)".to_string(),
        })?;
        let buildpack_dir = self.buildpack_dir.ok_or_else(|| GofnError::ConfigError {
            message: "buildpack directory is not set (--buildpack-dir or CNB_BUILDPACK_DIR)"
                .to_string(),
        })?;

        let app_root = match self.app_root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let scratch_dir = self.scratch_dir.unwrap_or_else(std::env::temp_dir);

        Ok(BuildSettings {
            app_root,
            layers_dir,
            buildpack_dir,
            scratch_dir,
            function_target,
            function_signature_type: self.function_signature_type.filter(|s| !s.is_empty()),
            go_version: self.go_version,
            web_command: self.web_command.unwrap_or_else(|| DEFAULT_WEB_COMMAND.to_string()),
        })
    }
}

/// Fully resolved settings of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Application root
    pub app_root: PathBuf,
    /// Lifecycle layers directory
    pub layers_dir: PathBuf,
    /// Buildpack installation directory
    pub buildpack_dir: PathBuf,
    /// Parent of temporary caches
    pub scratch_dir: PathBuf,
    /// Exported function to serve
    pub function_target: String,
    /// Signature type for the launch environment
    pub function_signature_type: Option<String>,
    /// Toolchain version override
    pub go_version: Option<String>,
    /// `web` process command
    pub web_command: String,
}
