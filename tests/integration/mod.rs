//! Integration test suite for gofn
//!
//! End-to-end builds through the public API with a scripted command runner,
//! plus tests of the `gofn` binary itself. No Go toolchain is required.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **module_build**: builds of functions with a `go.mod`
//! - **vendored_build**: GOPATH builds of functions with `vendor/`
//! - **cleanup**: scratch cache removal on success and failure
//! - **cli**: `gofn detect` / `gofn build` exit codes and output

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cleanup;
mod cli;
mod module_build;
mod vendored_build;
