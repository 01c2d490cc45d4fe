//! Scratch caches are removed whether a build succeeds or fails.

use anyhow::Result;
use gofn::pipeline::BuildPipeline;
use gofn::process::CommandOutput;
use gofn::test_utils::{FunctionFixture, RecordingRunner};

use crate::common::BuildWorkspace;

#[tokio::test]
async fn test_scratch_removed_after_successful_fetch() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("myfunc").write_to(&ws.app_root())?;

    let runner = RecordingRunner::new()
        .respond(&["run", "main"], CommandOutput::success_with("myfunc"))
        .respond(&["version"], CommandOutput::success_with("go version go1.12 linux/amd64"));
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    pipeline.run().await?;

    // Both the helper and the GOPATH fetch used a private cache
    let caches: Vec<String> = pipeline
        .runner()
        .calls()
        .iter()
        .filter_map(|c| c.env_value("GOCACHE").map(ToString::to_string))
        .collect();
    assert_eq!(caches.len(), 2);
    assert_ne!(caches[0], caches[1]);
    assert_eq!(ws.scratch_entries(), 0);
    Ok(())
}

#[tokio::test]
async fn test_scratch_removed_after_failed_checkout() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("myfunc").write_to(&ws.app_root())?;

    let runner = RecordingRunner::new()
        .respond(&["run", "main"], CommandOutput::success_with("myfunc"))
        .respond(&["version"], CommandOutput::success_with("go version go1.11.13 linux/amd64"))
        .respond(
            &["checkout"],
            CommandOutput::failure_with("error: pathspec 'v1.1.0' did not match"),
        );
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let err = pipeline.run().await.unwrap_err();

    assert!(format!("{err:#}").contains("pathspec"));
    assert_eq!(ws.scratch_entries(), 0);
    assert!(!ws.layers_dir().join("launch.toml").exists());
    Ok(())
}

#[tokio::test]
async fn test_scratch_removed_after_failed_extraction() -> Result<()> {
    let ws = BuildWorkspace::new();
    FunctionFixture::new("fn").with_module("example.com/fn").write_to(&ws.app_root())?;

    let runner = RecordingRunner::new()
        .respond(&["run", "main"], CommandOutput::failure_with("expected 'package', found 'EOF'"));
    let pipeline = BuildPipeline::new(runner, ws.settings("HelloWorld"));
    let err = pipeline.run().await.unwrap_err();

    assert!(format!("{err:#}").contains("expected 'package'"));
    assert_eq!(ws.scratch_entries(), 0);
    assert_eq!(pipeline.runner().calls().len(), 1);
    Ok(())
}
