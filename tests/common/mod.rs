//! Shared helpers for the integration tests.

use gofn::config::BuildSettings;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A lifecycle-like directory layout in a temporary directory.
///
/// ```text
/// <tmp>/workspace   application root
/// <tmp>/layers      layers directory
/// <tmp>/buildpack   buildpack directory
/// <tmp>/scratch     parent of temporary Go caches
/// ```
pub struct BuildWorkspace {
    temp: TempDir,
}

impl BuildWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        for dir in ["workspace", "layers", "buildpack", "scratch"] {
            std::fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        Self {
            temp,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn app_root(&self) -> PathBuf {
        self.root().join("workspace")
    }

    pub fn layers_dir(&self) -> PathBuf {
        self.root().join("layers")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root().join("scratch")
    }

    pub fn settings(&self, target: &str) -> BuildSettings {
        BuildSettings {
            app_root: self.app_root(),
            layers_dir: self.layers_dir(),
            buildpack_dir: self.root().join("buildpack"),
            scratch_dir: self.scratch_dir(),
            function_target: target.to_string(),
            function_signature_type: None,
            go_version: None,
            web_command: "/layers/google.go.build/bin/main".to_string(),
        }
    }

    /// Number of entries left in the scratch directory.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch_dir()).unwrap().count()
    }
}
