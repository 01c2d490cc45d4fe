//! Function source trees for tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for a function source directory.
///
/// The default tree is a single `fn.go` declaring `package <name>` with an
/// HTTP function `HelloWorld`.
#[derive(Clone, Debug)]
pub struct FunctionFixture {
    package: String,
    target: String,
    module: Option<String>,
    vendored: Vec<String>,
}

impl FunctionFixture {
    /// A function in package `package`.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            target: "HelloWorld".to_string(),
            module: None,
            vendored: Vec::new(),
        }
    }

    /// Sets the exported function name.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Adds a `go.mod` declaring `module`.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Adds a vendored package at `vendor/<import_path>`.
    #[must_use]
    pub fn with_vendor(mut self, import_path: impl Into<String>) -> Self {
        self.vendored.push(import_path.into());
        self
    }

    /// Writes the tree into `dir` (created if needed) and returns `dir`.
    ///
    /// # Errors
    ///
    /// Fails if any file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let fn_go = format!(
            "package {}\n\nimport \"net/http\"\n\n// {} responds to HTTP requests.\nfunc {}(w http.ResponseWriter, r *http.Request) {{\n\tw.Write([]byte(\"hello\"))\n}}\n",
            self.package, self.target, self.target
        );
        write_file(&dir.join("fn.go"), &fn_go)?;

        if let Some(module) = &self.module {
            write_file(&dir.join("go.mod"), &format!("module {module}\n\ngo 1.13\n"))?;
        }

        for import_path in &self.vendored {
            let name = import_path.rsplit('/').next().unwrap_or(import_path);
            write_file(
                &dir.join("vendor").join(import_path).join("doc.go"),
                &format!("package {name}\n"),
            )?;
        }

        Ok(dir.to_path_buf())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
