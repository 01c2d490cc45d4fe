//! Platform-specific helpers
//!
//! Executable lookup and the permission check used to decide whether
//! `go.mod` can be edited.

use std::fs::Metadata;
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the platform-appropriate executable name for `program`.
///
/// ```rust
/// use gofn::utils::platform::executable_name;
///
/// #[cfg(unix)]
/// assert_eq!(executable_name("go"), "go");
/// ```
#[must_use]
pub fn executable_name(program: &str) -> String {
    if is_windows() && !program.ends_with(".exe") {
        format!("{program}.exe")
    } else {
        program.to_string()
    }
}

/// Resolves `program` on PATH, or `None` when it is not installed.
#[must_use]
pub fn find_executable(program: &str) -> Option<PathBuf> {
    which::which(executable_name(program)).ok()
}

/// Checks whether a file's owner may write to it.
///
/// On unix this is the `0o200` permission bit, independent of who runs the
/// build. Elsewhere the read-only attribute is used.
#[must_use]
pub fn is_owner_writable(metadata: &Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o200 != 0
    }

    #[cfg(not(unix))]
    {
        !metadata.permissions().readonly()
    }
}
