//! gofn - Go functions-framework build adapter
//!
//! Converts a directory containing a bare Go function into a deployable
//! application: it picks how the function's dependencies are resolved, wires
//! the function into a synthesized `main` package and generates that
//! package's entry point for the functions framework release in use.
//!
//! # Architecture Overview
//!
//! A build runs these steps in order (see [`pipeline`]):
//!
//! ```text
//! relocate source ─► extract package ─► resolve strategy ─┬─► wire module ──┬─► render main.go
//!                                                          └─► wire vendored ┘
//! ```
//!
//! - **Module-based** ([`wiring`]): the function has a `go.mod`. The application
//!   root becomes module `serverless_function_app` that requires the function
//!   module at `v0.0.0` and replaces it with the local source.
//! - **Vendored legacy** ([`vendor`]): no `go.mod` on a Go 1.11-1.13
//!   toolchain. The function is built in GOPATH mode from its `vendor/`.
//!
//! External tools (`go`, `git`) are only ever run through a
//! [`process::CommandRunner`], so the whole pipeline can be exercised with a
//! scripted runner.
//!
//! # Core Modules
//!
//! ## Build Steps
//! - [`pipeline`] - Orchestration of one build, and the detect decision
//! - [`function`] - The function description and source relocation
//! - [`extractor`] - Package name extraction via the bundled Go helper
//! - [`strategy`] - Module-based vs. vendored strategy selection
//! - [`wiring`] - Module-based wiring with `go mod edit`
//! - [`vendor`] - GOPATH layout for vendored functions
//! - [`templating`] - Version-gated entry point templates
//!
//! ## Supporting Modules
//! - [`cli`] - `detect` / `build` subcommands and logging setup
//! - [`config`] - TOML file and command line settings
//! - [`core`] - Error types and user-facing error reporting
//! - [`layer`] - Build layer, environment files and `launch.toml`
//! - [`process`] - Command builder and runners
//! - [`toolchain`] - Go toolchain version probing
//! - [`version`] - Tolerant framework version parsing
//! - [`utils`] - File system and platform helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use gofn::config::BuildConfig;
//! use gofn::pipeline::BuildPipeline;
//! use gofn::process::SystemRunner;
//! use std::path::PathBuf;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = BuildConfig {
//!     function_target: Some("HelloWorld".to_string()),
//!     app_root: Some(PathBuf::from("/workspace")),
//!     layers_dir: Some(PathBuf::from("/layers")),
//!     buildpack_dir: Some(PathBuf::from("/cnb/buildpacks/functions-framework")),
//!     ..BuildConfig::default()
//! }
//! .into_settings()?;
//!
//! let outcome = BuildPipeline::new(SystemRunner::new(), settings).run().await?;
//! println!("generated {}", outcome.entrypoint.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod extractor;
pub mod function;
pub mod layer;
pub mod pipeline;
pub mod process;
pub mod strategy;
pub mod templating;
pub mod toolchain;
pub mod utils;
pub mod vendor;
pub mod version;
pub mod wiring;

// test_utils is available for unit tests and the integration test target
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
