//! Scratch directory management with RAII cleanup.
//!
//! Build steps that need a private `GOCACHE` create a [`ScratchDir`]; the
//! directory is removed when the value is dropped, on success, on `?` early
//! returns and on panics alike.

use crate::utils::fs::dirs::{ensure_dir, remove_dir_all};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A scratch directory that is removed when dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use gofn::utils::fs::ScratchDir;
///
/// # fn example() -> anyhow::Result<()> {
/// let scratch_root = std::env::temp_dir();
/// {
///     let cache = ScratchDir::new_in(&scratch_root, "gocache")?;
///     std::fs::write(cache.path().join("entry"), "data")?;
///     assert!(cache.path().exists());
/// } // removed here
/// # Ok(())
/// # }
/// ```
///
/// Names are `gofn_{prefix}_{uuid}`, so concurrent builds sharing a scratch
/// root never collide. Removal errors in `Drop` are logged and otherwise
/// ignored.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Creates a new scratch directory with the given prefix under `parent`.
    pub fn new_in(parent: &Path, prefix: &str) -> Result<Self> {
        let unique_name = format!("gofn_{}_{}", prefix, uuid::Uuid::new_v4());
        let path = parent.join(unique_name);

        ensure_dir(&path)?;
        tracing::debug!("Created scratch directory {}", path.display());

        Ok(Self {
            path,
        })
    }

    /// Returns the path to the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_all(&self.path) {
            tracing::warn!("Failed to remove scratch directory {}: {e:#}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path(), "gocache").unwrap();
        let path = scratch.path().to_path_buf();

        assert!(path.is_dir());
        std::fs::create_dir_all(path.join("00")).unwrap();
        std::fs::write(path.join("00").join("entry"), "cached").unwrap();

        drop(scratch);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scratch_dir_unique_names() {
        let root = tempfile::tempdir().unwrap();
        let first = ScratchDir::new_in(root.path(), "gocache").unwrap();
        let second = ScratchDir::new_in(root.path(), "gocache").unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().file_name().unwrap().to_string_lossy().starts_with("gofn_gocache_"));
    }

    #[test]
    fn test_scratch_dir_removed_on_error_path() {
        fn failing_step(root: &Path) -> Result<PathBuf> {
            let scratch = ScratchDir::new_in(root, "fetch")?;
            let path = scratch.path().to_path_buf();
            anyhow::bail!("step failed with scratch at {}", path.display())
        }

        let root = tempfile::tempdir().unwrap();
        assert!(failing_step(root.path()).is_err());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
