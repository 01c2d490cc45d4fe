//! Cross-platform utilities and helpers
//!
//! - [`fs`] - File system operations with atomic writes and scratch directories
//! - [`platform`] - Executable lookup and permission checks

pub mod fs;
pub mod platform;

pub use fs::{ScratchDir, atomic_write, copy_dir, ensure_dir, move_path, safe_write};
pub use platform::{find_executable, is_owner_writable, is_windows};
