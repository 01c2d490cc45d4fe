//! Directory operations for creating, copying, moving and removing directories.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use gofn::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("src/serverless_function_app/main"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Recursively copies a directory and all its contents to a new location.
///
/// `dst` is created if missing. Regular files are copied and overwrite existing
/// files. Symlinks are recreated pointing at the same target as the original;
/// relative targets are resolved against the source directory so the copy
/// does not depend on where it lands. Special files are skipped.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!("Failed to copy file from {} to {}", src_path.display(), dst_path.display())
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy symlink from {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        } else {
            tracing::debug!("Skipping special file {}", src_path.display());
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)?;
    let target = match src.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target,
    };
    if fs::symlink_metadata(dst).is_ok() {
        fs::remove_file(dst)?;
    }
    std::os::unix::fs::symlink(&target, dst)?;
    Ok(())
}

// Creating symlinks needs extra privileges on Windows; copy the target instead.
#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    if fs::metadata(src)?.is_dir() {
        copy_dir(src, dst)
    } else {
        fs::copy(src, dst)?;
        Ok(())
    }
}

/// Moves a file or directory, creating the destination's parent first.
///
/// This is a plain rename: the source must be on the same file system as the
/// destination, and nothing is restored if a later step fails.
pub fn move_path(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent_dir(dst)?;
    fs::rename(src, dst)
        .with_context(|| format!("Failed to move {} to {}", src.display(), dst.display()))
}

/// Recursively removes a directory and all its contents.
///
/// Missing directories are not an error.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir() {
        let temp = tempdir().unwrap();
        let test_dir = temp.path().join("a").join("b");

        assert!(!test_dir.exists());
        ensure_dir(&test_dir).unwrap();
        assert!(test_dir.is_dir());
        // Idempotent
        ensure_dir(&test_dir).unwrap();
    }

    #[test]
    fn test_ensure_dir_on_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("file.txt");
        std::fs::write(&file_path, "content").unwrap();

        let result = ensure_dir(&file_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_copy_dir_nested() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("vendor");
        std::fs::create_dir_all(src.join("example.com/lib")).unwrap();
        std::fs::write(src.join("modules.txt"), "# example.com/lib").unwrap();
        std::fs::write(src.join("example.com/lib/lib.go"), "package lib").unwrap();

        let dst = temp.path().join("out").join("vendor");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("modules.txt")).unwrap(), "# example.com/lib");
        assert!(dst.join("example.com/lib/lib.go").is_file());
        // Source untouched
        assert!(src.join("example.com/lib/lib.go").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_dir_keeps_symlinks() {
        let temp = tempdir().unwrap();
        let checkout = temp.path().join("checkout");
        std::fs::create_dir_all(&checkout).unwrap();
        std::fs::write(checkout.join("lib.go"), "package lib").unwrap();

        let src = temp.path().join("fn").join("vendor");
        std::fs::create_dir_all(src.join("example.com")).unwrap();
        std::os::unix::fs::symlink(&checkout, src.join("example.com/abs")).unwrap();
        std::os::unix::fs::symlink("../../../checkout", src.join("example.com/rel")).unwrap();
        std::os::unix::fs::symlink("../../../checkout/lib.go", src.join("example.com/lib.go"))
            .unwrap();

        let dst = temp.path().join("app").join("main").join("vendor");
        copy_dir(&src, &dst).unwrap();

        for name in ["abs", "rel"] {
            let link = dst.join("example.com").join(name);
            assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
            assert_eq!(std::fs::read_to_string(link.join("lib.go")).unwrap(), "package lib");
        }
        assert_eq!(
            std::fs::read_to_string(dst.join("example.com/lib.go")).unwrap(),
            "package lib"
        );
    }

    #[test]
    fn test_move_path_creates_parent() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("fn");
        std::fs::create_dir(&src).unwrap();
        std::fs::write(src.join("fn.go"), "package fn").unwrap();

        let dst = temp.path().join("src").join("fn");
        move_path(&src, &dst).unwrap();

        assert!(!src.exists());
        assert!(dst.join("fn.go").is_file());
    }

    #[test]
    fn test_remove_dir_all_missing_is_ok() {
        let temp = tempdir().unwrap();
        remove_dir_all(&temp.path().join("nope")).unwrap();
    }
}
