//! Dependency resolution strategy selection
//!
//! A function either declares a module (`go.mod`) and is wired into the
//! application as a local module dependency, or, on toolchains that still
//! allow it, is built GOPATH-style from its vendored dependencies.
//!
//! | `go.mod` | Toolchain supports manifest-free | Result |
//! |----------|----------------------------------|--------|
//! | absent | no | [`GofnError::ManifestRequired`] |
//! | absent | yes | [`Strategy::VendoredLegacy`] |
//! | read-only | any | [`GofnError::ManifestNotWritable`] |
//! | writable | any | [`Strategy::ModuleBased`] |

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::constants::MANIFEST_FILE;
use crate::core::GofnError;
use crate::utils::platform::is_owner_writable;

/// How the function's dependencies are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The function has a writable `go.mod`.
    ModuleBased,
    /// No `go.mod`; dependencies come from `vendor/` under a GOPATH layout.
    VendoredLegacy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleBased => f.write_str("module-based"),
            Self::VendoredLegacy => f.write_str("vendored-legacy"),
        }
    }
}

/// Observed state of the function's `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestState {
    /// No manifest file.
    Absent,
    /// The manifest exists but its owner write bit is clear.
    ReadOnly {
        /// Path of the manifest
        path: String,
    },
    /// The manifest exists and can be edited.
    Writable,
}

/// Inspects `<source>/go.mod`.
///
/// # Errors
///
/// Fails if the manifest exists but its metadata cannot be read.
pub fn inspect_manifest(source: &Path) -> Result<ManifestState> {
    let manifest = source.join(MANIFEST_FILE);
    if !manifest.exists() {
        return Ok(ManifestState::Absent);
    }

    let metadata = std::fs::metadata(&manifest)
        .with_context(|| format!("Failed to read metadata of {}", manifest.display()))?;
    if is_owner_writable(&metadata) {
        Ok(ManifestState::Writable)
    } else {
        Ok(ManifestState::ReadOnly {
            path: manifest.display().to_string(),
        })
    }
}

/// Chooses the build strategy.
///
/// # Errors
///
/// [`GofnError::ManifestRequired`] or [`GofnError::ManifestNotWritable`], both
/// user configuration errors.
pub fn resolve_strategy(
    manifest: &ManifestState,
    supports_manifest_free: bool,
) -> Result<Strategy, GofnError> {
    match manifest {
        ManifestState::Absent if supports_manifest_free => Ok(Strategy::VendoredLegacy),
        ManifestState::Absent => Err(GofnError::ManifestRequired),
        ManifestState::ReadOnly {
            path,
        } => Err(GofnError::ManifestNotWritable {
            path: path.clone(),
        }),
        ManifestState::Writable => Ok(Strategy::ModuleBased),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strategy_table() {
        assert_eq!(
            resolve_strategy(&ManifestState::Absent, false),
            Err(GofnError::ManifestRequired)
        );
        assert_eq!(resolve_strategy(&ManifestState::Absent, true), Ok(Strategy::VendoredLegacy));
        assert_eq!(resolve_strategy(&ManifestState::Writable, false), Ok(Strategy::ModuleBased));
        assert_eq!(resolve_strategy(&ManifestState::Writable, true), Ok(Strategy::ModuleBased));

        let read_only = ManifestState::ReadOnly {
            path: "/src/go.mod".to_string(),
        };
        for supported in [true, false] {
            assert_eq!(
                resolve_strategy(&read_only, supported),
                Err(GofnError::ManifestNotWritable {
                    path: "/src/go.mod".to_string()
                })
            );
        }
    }

    #[test]
    fn test_manifest_required_message() {
        let err = resolve_strategy(&ManifestState::Absent, false).unwrap_err();
        assert_eq!(err.to_string(), "function build requires a module manifest (go.mod)");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_inspect_manifest() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(inspect_manifest(temp.path()).unwrap(), ManifestState::Absent);

        let manifest = temp.path().join("go.mod");
        std::fs::write(&manifest, "module example.com/fn\n").unwrap();
        assert_eq!(inspect_manifest(temp.path()).unwrap(), ManifestState::Writable);

        let mut perms = std::fs::metadata(&manifest).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&manifest, perms).unwrap();
        assert!(matches!(
            inspect_manifest(temp.path()).unwrap(),
            ManifestState::ReadOnly { .. }
        ));
    }
}
