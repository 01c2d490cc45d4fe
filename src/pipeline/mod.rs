//! Build orchestration
//!
//! [`BuildPipeline::run`] turns the uploaded function in the application root
//! into an application with a generated entry point:
//!
//! 1. Create the `functions-framework` layer; every command gets
//!    `GOPATH=<layer>` and the launch environment gets `FUNCTION_TARGET`
//! 2. Move the uploaded files into `serverless_function_source_code/`
//! 3. Extract the function's package name
//! 4. Inspect `go.mod` and resolve the [`Strategy`], probing the toolchain only
//!    when there is no manifest
//! 5. Wire the function ([`wire_module`] or [`wire_vendored`])
//! 6. Render the entry point for the resolved framework version
//! 7. Persist the layer and `launch.toml`
//!
//! Steps run strictly in order and the first failure ends the build. Scratch
//! caches are always removed; moved sources are not restored.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{BuildConfig, BuildSettings};
use crate::constants::{ENV_FUNCTION_SIGNATURE_TYPE, ENV_FUNCTION_TARGET, LAYER_NAME};
use crate::extractor::extract_package_name;
use crate::function::{FunctionInfo, relocate_function_source};
use crate::layer::{LaunchProcess, Layer, write_launch_toml};
use crate::process::{Attribution, CommandRunner, EnvRunner};
use crate::strategy::{ManifestState, Strategy, inspect_manifest, resolve_strategy};
use crate::templating::render_entrypoint;
use crate::toolchain::{GoVersion, probe_go_version};
use crate::vendor::wire_vendored;
use crate::wiring::{WiringOutcome, wire_module};

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    /// Strategy the build used
    pub strategy: Strategy,
    /// Framework version the entry point was generated for
    pub framework_version: String,
    /// Name of the rendered template
    pub template: String,
    /// Path of the generated entry point
    pub entrypoint: PathBuf,
    /// The function as wired into the application
    pub function: FunctionInfo,
    /// Directory of the build layer
    pub layer: PathBuf,
}

/// Outcome of the detect phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The buildpack applies.
    Pass {
        /// Why
        reason: String,
    },
    /// The buildpack does not apply.
    OptOut {
        /// Why not
        reason: String,
    },
}

/// Decides whether this buildpack applies: only when a function target is set.
///
/// A target that is empty or only whitespace counts as unset, so
/// `FUNCTION_TARGET=""` opts out even though the variable exists. Functions
/// cannot have an empty name, and clap drops empty environment values before
/// they reach the config anyway.
#[must_use]
pub fn detect(config: &BuildConfig) -> Detection {
    if config.has_function_target() {
        Detection::Pass {
            reason: format!("{ENV_FUNCTION_TARGET} set"),
        }
    } else {
        Detection::OptOut {
            reason: format!("{ENV_FUNCTION_TARGET} not set"),
        }
    }
}

/// Runs one build with the given runner and settings.
#[derive(Debug)]
pub struct BuildPipeline<R> {
    runner: R,
    settings: BuildSettings,
}

impl<R: CommandRunner> BuildPipeline<R> {
    /// Creates a pipeline.
    pub const fn new(runner: R, settings: BuildSettings) -> Self {
        Self {
            runner,
            settings,
        }
    }

    /// The settings this pipeline runs with.
    pub const fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// The underlying command runner.
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the build.
    ///
    /// # Errors
    ///
    /// Any step's error, with context naming the step. User configuration
    /// problems surface as the corresponding
    /// [`GofnError`](crate::core::GofnError) variants.
    pub async fn run(&self) -> Result<BuildOutcome> {
        let settings = &self.settings;
        let app_root = settings.app_root.as_path();

        let mut layer = Layer::create(&settings.layers_dir, LAYER_NAME)?;
        let runner = EnvRunner::new(&self.runner, [("GOPATH", layer.path().display().to_string())]);
        self.set_function_env(&mut layer);

        let start = Instant::now();
        let fn_source = relocate_function_source(app_root)
            .context("Failed to move the function source into place")?;
        tracing::info!(
            attribution = %Attribution::UserTiming,
            "Function source moved to {} in {}ms",
            fn_source.display(),
            start.elapsed().as_millis()
        );

        let buildpack_dir = &settings.buildpack_dir;
        let package =
            extract_package_name(&runner, buildpack_dir, &settings.scratch_dir, &fn_source).await?;
        let function =
            FunctionInfo::new(fn_source, settings.function_target.clone()).with_package(package);

        let manifest = inspect_manifest(&function.source)?;
        let supports_manifest_free = match manifest {
            ManifestState::Absent => {
                self.toolchain_version(&runner).await?.supports_manifest_free()
            }
            _ => false,
        };
        let strategy = resolve_strategy(&manifest, supports_manifest_free)?;
        tracing::info!("Using {} build for function {}", strategy, function.target);

        let WiringOutcome {
            entrypoint,
            framework_version,
            function,
        } = match strategy {
            Strategy::ModuleBased => wire_module(&runner, app_root, &function).await?,
            Strategy::VendoredLegacy => {
                wire_vendored(&runner, &mut layer, app_root, &settings.scratch_dir, &function)
                    .await?
            }
        };

        let variant = render_entrypoint(&entrypoint, &function, &framework_version)?;
        tracing::info!("Generated {} for framework {}", entrypoint.display(), framework_version);

        layer.persist()?;
        write_launch_toml(&settings.layers_dir, &[LaunchProcess::web(&settings.web_command)])?;

        Ok(BuildOutcome {
            strategy,
            framework_version,
            template: variant.name().to_string(),
            entrypoint,
            function,
            layer: layer.path().to_path_buf(),
        })
    }

    fn set_function_env(&self, layer: &mut Layer) {
        layer.set_launch(true);
        layer.default_launch_env(ENV_FUNCTION_TARGET, self.settings.function_target.clone());
        if let Some(signature) = &self.settings.function_signature_type {
            layer.default_launch_env(ENV_FUNCTION_SIGNATURE_TYPE, signature.clone());
        }
    }

    async fn toolchain_version<C: CommandRunner>(&self, runner: &C) -> Result<GoVersion> {
        match &self.settings.go_version {
            Some(configured) => {
                tracing::debug!("Using configured Go version {}", configured);
                Ok(GoVersion::parse(configured)?)
            }
            None => probe_go_version(runner).await,
        }
    }
}
