//! File system utilities used by the build pipeline
//!
//! - [`dirs`] - create, copy, move and remove directories
//! - [`atomic`] - write-then-rename file writes
//! - [`temp`] - RAII scratch directories for per-step caches

pub mod atomic;
pub mod dirs;
pub mod temp;

pub use atomic::{atomic_write, safe_write};
pub use dirs::{copy_dir, ensure_dir, ensure_parent_dir, move_path, remove_dir_all};
pub use temp::ScratchDir;
