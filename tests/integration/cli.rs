//! Tests of the `gofn` binary.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::BuildWorkspace;

fn gofn() -> Command {
    let mut cmd = Command::cargo_bin("gofn").unwrap();
    cmd.env_remove("FUNCTION_TARGET")
        .env_remove("FUNCTION_SIGNATURE_TYPE")
        .env_remove("GOFN_CONFIG")
        .env_remove("CNB_LAYERS_DIR")
        .env_remove("CNB_BUILDPACK_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_detect_passes_with_target_env() {
    gofn().env("FUNCTION_TARGET", "HelloWorld").arg("detect").assert().success();
}

#[test]
fn test_detect_passes_with_target_flag() {
    gofn().args(["detect", "--target", "HelloWorld"]).assert().success();
}

#[test]
fn test_detect_opts_out_without_target() {
    gofn().arg("detect").assert().code(100);
}

#[test]
fn test_detect_opts_out_with_empty_target_env() {
    gofn().env("FUNCTION_TARGET", "").arg("detect").assert().code(100);
}

#[test]
fn test_detect_reads_config_file() {
    let ws = BuildWorkspace::new();
    let config = ws.root().join("gofn.toml");
    std::fs::write(&config, "function_target = \"HelloWorld\"\n").unwrap();

    gofn().arg("--config").arg(&config).arg("detect").assert().success();
}

#[test]
fn test_build_without_target_fails() {
    let ws = BuildWorkspace::new();

    gofn()
        .arg("build")
        .arg("--app-root")
        .arg(ws.app_root())
        .arg("--layers")
        .arg(ws.layers_dir())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("function target is not set"))
        .stderr(predicate::str::contains("FUNCTION_TARGET"));
}

#[test]
fn test_build_rejects_unknown_config_keys() {
    let ws = BuildWorkspace::new();
    let config = ws.root().join("gofn.toml");
    std::fs::write(&config, "target = \"HelloWorld\"\n").unwrap();

    gofn()
        .arg("--config")
        .arg(&config)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    gofn().args(["--verbose", "--quiet", "detect"]).assert().failure();
}
