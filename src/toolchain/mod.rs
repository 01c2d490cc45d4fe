//! Go toolchain probing
//!
//! The only toolchain fact the build needs is whether the active Go version
//! can build a function without a `go.mod`. Go 1.14 made modules mandatory
//! for function builds; 1.11 to 1.13 still accepted vendored GOPATH sources.

use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;

use crate::core::GofnError;
use crate::process::{CommandRunner, ToolCommand};

/// Version of the Go toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoVersion {
    /// Major version (always 1 so far)
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version, 0 when absent
    pub patch: u32,
}

impl GoVersion {
    /// Parses `go version` output or a bare `1.13` / `go1.13.4` string.
    ///
    /// # Errors
    ///
    /// [`GofnError::ToolchainVersionUnknown`] when no version is found.
    pub fn parse(output: &str) -> Result<Self, GofnError> {
        let unknown = || GofnError::ToolchainVersionUnknown {
            output: output.trim().to_string(),
        };
        let trimmed = output.trim();
        let candidate = if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            format!("go{trimmed}")
        } else {
            trimmed.to_string()
        };

        // "go version go1.13.15 linux/amd64", "go1.21rc2", "go1.22.0"
        let re = Regex::new(r"go(\d+)\.(\d+)(?:\.(\d+))?").map_err(|_| unknown())?;
        let captures = re.captures(&candidate).ok_or_else(unknown)?;
        let number = |index: usize| -> Result<u32, GofnError> {
            captures.get(index).map_or(Ok(0), |m| m.as_str().parse().map_err(|_| unknown()))
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
        })
    }

    /// Whether this toolchain can build a function without `go.mod`.
    #[must_use]
    pub const fn supports_manifest_free(&self) -> bool {
        self.major == 1 && self.minor < 14
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Runs `go version` and parses the result.
///
/// # Errors
///
/// Fails if `go` is missing, exits non-zero, or prints something unexpected.
pub async fn probe_go_version<R: CommandRunner>(runner: &R) -> Result<GoVersion> {
    let output = runner
        .run_checked(&ToolCommand::go_version().with_context("toolchain"))
        .await
        .context("Failed to determine the Go toolchain version")?;
    let version = GoVersion::parse(&output.stdout)?;
    tracing::debug!("Detected Go toolchain {}", version);
    Ok(version)
}
