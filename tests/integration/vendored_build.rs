//! GOPATH builds of functions without a `go.mod`.

use anyhow::Result;
use gofn::constants::FRAMEWORK_PACKAGE;
use gofn::core::{GofnError, find_gofn_error};
use gofn::pipeline::BuildPipeline;
use gofn::process::CommandOutput;
use gofn::strategy::Strategy;
use gofn::test_utils::{FunctionFixture, RecordingRunner};

use crate::common::BuildWorkspace;

fn go_1_13_runner() -> RecordingRunner {
    RecordingRunner::new()
        .respond(&["run", "main"], CommandOutput::success_with("myfunc"))
        .respond(&["version"], CommandOutput::success_with("go version go1.13.15 linux/amd64"))
}

#[tokio::test]
async fn test_vendored_framework_needs_no_fetch() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("myfunc")
        .with_vendor(FRAMEWORK_PACKAGE)
        .with_vendor("golang.org/x/net/context")
        .write_to(&ws.app_root())?;

    let pipeline = BuildPipeline::new(go_1_13_runner(), ws.settings("HelloWorld"));
    let outcome = pipeline.run().await?;

    assert_eq!(outcome.strategy, Strategy::VendoredLegacy);
    assert_eq!(outcome.framework_version, "v0.0.0");
    assert_eq!(outcome.template, "main_v0.go");
    assert_eq!(pipeline.runner().count_matching(&["get"]), 0);
    assert_eq!(pipeline.runner().count_matching(&["checkout"]), 0);

    let app_path = ws.app_root().join("src/serverless_function_app/main");
    assert!(app_path.join("vendor/golang.org/x/net/context/doc.go").is_file());
    let main_go = std::fs::read_to_string(app_path.join("main.go"))?;
    assert!(main_go.contains("userfunction \"myfunc\""));

    let env_build = ws.layers_dir().join("functions-framework/env.build");
    assert_eq!(
        std::fs::read_to_string(env_build.join("GOPATH.override"))?,
        ws.app_root().display().to_string()
    );
    assert_eq!(
        std::fs::read_to_string(env_build.join("GOOGLE_BUILDABLE.override"))?,
        "serverless_function_app/main"
    );
    let metadata = std::fs::read_to_string(ws.layers_dir().join("functions-framework.toml"))?;
    assert!(metadata.contains("build = true"));
    Ok(())
}

#[tokio::test]
async fn test_missing_framework_is_fetched_once() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("myfunc").with_vendor("example.com/dep").write_to(&ws.app_root())?;

    let pipeline = BuildPipeline::new(go_1_13_runner(), ws.settings("HelloWorld"));
    let outcome = pipeline.run().await?;

    assert_eq!(outcome.framework_version, "v1.1.0");
    assert_eq!(outcome.template, "main_v1_1.go");

    let runner = pipeline.runner();
    assert_eq!(runner.count_matching(&["get", FRAMEWORK_PACKAGE]), 1);
    let checkouts = runner.calls_matching(&["checkout"]);
    assert_eq!(checkouts.len(), 1);
    assert_eq!(checkouts[0].command_args(), ["checkout", "v1.1.0"]);

    // The GOPATH fetch overrides the layer GOPATH
    let get = &runner.calls_matching(&["get"])[0];
    let app_root = ws.app_root().display().to_string();
    assert_eq!(get.env_value("GOPATH"), Some(app_root.as_str()));
    Ok(())
}

#[tokio::test]
async fn test_no_manifest_on_modern_toolchain() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("myfunc").write_to(&ws.app_root())?;

    let runner = RecordingRunner::new()
        .respond(&["run", "main"], CommandOutput::success_with("myfunc"))
        .respond(&["version"], CommandOutput::success_with("go version go1.14 linux/amd64"));
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let err = pipeline.run().await.unwrap_err();

    assert_eq!(find_gofn_error(&err), Some(&GofnError::ManifestRequired));
    assert!(!ws.app_root().join("src").exists());
    Ok(())
}
