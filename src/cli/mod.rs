//! Command-line interface for gofn.
//!
//! The binary implements the two phases of the buildpack lifecycle:
//!
//! - `detect` - passes when a function target is configured, otherwise exits
//!   with code 100 so the lifecycle skips this buildpack
//! - `build` - converts the function in the application root into an
//!   application with a generated entry point
//!
//! # Example
//!
//! ```bash
//! FUNCTION_TARGET=HelloWorld gofn detect
//!
//! FUNCTION_TARGET=HelloWorld \
//! CNB_LAYERS_DIR=/layers \
//! CNB_BUILDPACK_DIR=/cnb/buildpacks/functions-framework \
//!   gofn --verbose build --app-root /workspace --json
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - errors only
//! - `--config` - TOML file with defaults for any build setting (`GOFN_CONFIG`)
//!
//! `RUST_LOG` overrides both verbosity flags.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::BuildConfig;
use crate::constants::DETECT_FAIL_EXIT_CODE;
use crate::pipeline::{BuildPipeline, Detection, detect};
use crate::process::SystemRunner;

/// Build adapter turning a Go function into a functions-framework application.
#[derive(Parser, Debug)]
#[command(
    name = "gofn",
    about = "Build a Go function into a functions-framework application",
    version,
    long_about = "gofn detects Go function sources and wires them into a generated \
                  functions-framework entry point, using Go modules or vendored GOPATH sources."
)]
pub struct Cli {
    /// The phase to run.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output, including every external command.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file with defaults for the build settings.
    #[arg(long, global = true, env = "GOFN_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether this buildpack applies
    Detect(FunctionArgs),
    /// Generate the application for the function
    Build(BuildArgs),
}

/// Arguments shared by both phases.
#[derive(Args, Debug, Clone, Default)]
pub struct FunctionArgs {
    /// Exported function to serve.
    #[arg(long, env = "FUNCTION_TARGET", value_name = "NAME")]
    target: Option<String>,
}

/// Arguments of `gofn build`.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    function: FunctionArgs,

    /// Function signature type exposed at launch.
    #[arg(long, env = "FUNCTION_SIGNATURE_TYPE", value_name = "TYPE")]
    signature_type: Option<String>,

    /// Application root containing the function source [default: current directory].
    #[arg(long, value_name = "DIR")]
    app_root: Option<PathBuf>,

    /// Lifecycle layers directory.
    #[arg(long, env = "CNB_LAYERS_DIR", value_name = "DIR")]
    layers: Option<PathBuf>,

    /// Buildpack directory containing converter/get_package.
    #[arg(long, env = "CNB_BUILDPACK_DIR", value_name = "DIR")]
    buildpack_dir: Option<PathBuf>,

    /// Parent directory for temporary Go caches [default: system temp dir].
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Go toolchain version to assume instead of running `go version`.
    #[arg(long, value_name = "VERSION")]
    go_version: Option<String>,

    /// Command of the web process in launch.toml.
    #[arg(long, value_name = "PATH")]
    web_command: Option<String>,

    /// Print the build outcome as JSON.
    #[arg(long)]
    json: bool,
}

impl FunctionArgs {
    fn to_config(&self) -> BuildConfig {
        BuildConfig {
            function_target: self.target.clone(),
            ..BuildConfig::default()
        }
    }
}

impl BuildArgs {
    fn to_config(&self) -> BuildConfig {
        BuildConfig {
            function_signature_type: self.signature_type.clone(),
            app_root: self.app_root.clone(),
            layers_dir: self.layers.clone(),
            buildpack_dir: self.buildpack_dir.clone(),
            scratch_dir: self.scratch_dir.clone(),
            go_version: self.go_version.clone(),
            web_command: self.web_command.clone(),
            ..self.function.to_config()
        }
    }
}

impl Cli {
    /// Log filter implied by the verbosity flags.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Runs the selected phase and returns the process exit code.
    ///
    /// # Errors
    ///
    /// Configuration loading or build failures; a failed detect is not an
    /// error but exit code 100.
    pub async fn execute(self) -> Result<i32> {
        let file_config = BuildConfig::load_optional(self.config.as_deref()).await?;

        match self.command {
            Commands::Detect(args) => {
                let config = file_config.merge(args.to_config());
                match detect(&config) {
                    Detection::Pass {
                        reason,
                    } => {
                        tracing::info!("Opting in: {}", reason);
                        Ok(0)
                    }
                    Detection::OptOut {
                        reason,
                    } => {
                        tracing::info!("Opting out: {}", reason);
                        Ok(DETECT_FAIL_EXIT_CODE)
                    }
                }
            }
            Commands::Build(args) => {
                let settings = file_config.merge(args.to_config()).into_settings()?;
                let pipeline = BuildPipeline::new(SystemRunner::new(), settings);
                let outcome = pipeline.run().await?;

                if args.json {
                    let json = serde_json::to_string_pretty(&outcome)
                        .context("Failed to serialize build outcome")?;
                    println!("{json}");
                }
                Ok(0)
            }
        }
    }
}

/// Initialises the global tracing subscriber writing to stderr.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_logging(level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flags() {
        let cli = Cli::try_parse_from(["gofn", "--verbose", "detect"]).unwrap();
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["gofn", "detect", "--quiet"]).unwrap();
        assert_eq!(cli.log_level(), "error");

        let cli = Cli::try_parse_from(["gofn", "detect"]).unwrap();
        assert_eq!(cli.log_level(), "info");

        assert!(Cli::try_parse_from(["gofn", "-v", "-q", "detect"]).is_err());
    }

    #[test]
    fn test_build_args_to_config() {
        let cli = Cli::try_parse_from([
            "gofn",
            "build",
            "--target",
            "HelloWorld",
            "--layers",
            "/layers",
            "--buildpack-dir",
            "/cnb/bp",
            "--app-root",
            "/workspace",
            "--go-version",
            "1.13",
            "--json",
        ])
        .unwrap();

        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(args.json);

        let config = args.to_config();
        assert_eq!(config.function_target.as_deref(), Some("HelloWorld"));
        assert_eq!(config.layers_dir, Some(PathBuf::from("/layers")));
        assert_eq!(config.buildpack_dir, Some(PathBuf::from("/cnb/bp")));
        assert_eq!(config.app_root, Some(PathBuf::from("/workspace")));
        assert_eq!(config.go_version.as_deref(), Some("1.13"));
    }
}
