//! Builds of functions that declare a Go module.

use anyhow::Result;
use gofn::core::{ErrorKind, GofnError, find_gofn_error};
use gofn::pipeline::BuildPipeline;
use gofn::process::CommandOutput;
use gofn::strategy::Strategy;
use gofn::test_utils::{FunctionFixture, RecordingRunner, init_test_logging};

use crate::common::BuildWorkspace;

fn module_runner(module: &str, framework: CommandOutput) -> RecordingRunner {
    RecordingRunner::new()
        .respond(&["run", "main"], CommandOutput::success_with("fn\n"))
        .respond(&["list", "-m", "-f"], framework)
        .respond(&["list", "-m"], CommandOutput::success_with(format!("{module}\n")))
}

fn unknown_framework() -> CommandOutput {
    CommandOutput::failure_with(
        "go: module github.com/GoogleCloudPlatform/functions-framework-go: not a known dependency",
    )
}

#[tokio::test]
async fn test_example_module_end_to_end() -> Result<()> {
    init_test_logging(None);
    let ws = BuildWorkspace::new();
    FunctionFixture::new("fn").with_module("example.com/fn").write_to(&ws.app_root())?;

    let runner = module_runner("example.com/fn", unknown_framework());
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let outcome = pipeline.run().await?;

    let source = ws.app_root().join("serverless_function_source_code");
    assert_eq!(outcome.strategy, Strategy::ModuleBased);
    assert_eq!(outcome.framework_version, "v1.1.0");
    assert_eq!(outcome.template, "main_v1_1.go");
    assert_eq!(outcome.function.source, source);
    assert_eq!(outcome.function.package, "example.com/fn");

    // Source moved, entry point generated at the root
    assert!(source.join("fn.go").is_file());
    assert!(source.join("go.mod").is_file());
    let main_go = std::fs::read_to_string(ws.app_root().join("main.go"))?;
    assert!(main_go.contains("userfunction \"example.com/fn\""));
    assert!(main_go.contains("userfunction.HelloWorld"));
    assert!(main_go.contains("RegisterHTTPFunctionContext"));

    // Module edits name exactly the function's module
    let runner = pipeline.runner();
    let requires = runner.calls_matching(&["mod", "edit", "-require"]);
    assert_eq!(requires.len(), 1);
    assert_eq!(requires[0].command_args()[3], "example.com/fn@v0.0.0");
    let replaces = runner.calls_matching(&["mod", "edit", "-replace"]);
    assert_eq!(replaces.len(), 1);
    assert_eq!(
        replaces[0].command_args()[3],
        format!("example.com/fn@v0.0.0={}", source.display())
    );

    let gets = runner.calls_matching(&["get"]);
    assert_eq!(gets.len(), 1);
    assert_eq!(
        gets[0].command_args()[1],
        "github.com/GoogleCloudPlatform/functions-framework-go@v1.1.0"
    );

    // Lifecycle metadata
    let layers = ws.layers_dir();
    assert!(layers.join("functions-framework.toml").is_file());
    assert!(layers.join("launch.toml").is_file());
    let target_env = layers.join("functions-framework/env.launch/FUNCTION_TARGET.default");
    assert_eq!(std::fs::read_to_string(target_env)?, "HelloWorld");
    Ok(())
}

#[tokio::test]
async fn test_pinned_old_framework_uses_v0_template() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("fn").with_module("example.com/fn").write_to(&ws.app_root())?;

    let runner = module_runner("example.com/fn", CommandOutput::success_with("v1.0.9\n"));
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let outcome = pipeline.run().await?;

    assert_eq!(outcome.framework_version, "v1.0.9");
    assert_eq!(outcome.template, "main_v0.go");
    assert_eq!(pipeline.runner().count_matching(&["get"]), 0);

    let main_go = std::fs::read_to_string(ws.app_root().join("main.go"))?;
    assert!(main_go.contains("funcframework.RegisterHTTPFunction(\"/\", httpFn)"));
    Ok(())
}

#[tokio::test]
async fn test_module_without_domain_is_rejected() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("fn").with_module("foo/bar").write_to(&ws.app_root())?;

    let runner = module_runner("foo/bar", unknown_framework());
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let err = pipeline.run().await.unwrap_err();

    let gofn_error = find_gofn_error(&err).unwrap();
    assert_eq!(gofn_error.kind(), ErrorKind::UserConfiguration);
    assert!(gofn_error.to_string().ends_with("found: foo/bar"));

    assert_eq!(pipeline.runner().count_matching(&["mod"]), 0);
    assert!(!ws.app_root().join("go.mod").exists());
    assert!(!ws.app_root().join("main.go").exists());
    assert!(!ws.layers_dir().join("launch.toml").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_read_only_manifest_is_rejected() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let ws = BuildWorkspace::new();
    FunctionFixture::new("fn").with_module("example.com/fn").write_to(&ws.app_root())?;
    std::fs::set_permissions(
        ws.app_root().join("go.mod"),
        std::fs::Permissions::from_mode(0o444),
    )?;

    let runner = module_runner("example.com/fn", unknown_framework());
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(find_gofn_error(&err), Some(GofnError::ManifestNotWritable { .. })));
    assert_eq!(pipeline.runner().count_matching(&["list"]), 0);
    Ok(())
}
