//! Core types for gofn
//!
//! Currently this is the error system shared by every build step:
//! - [`GofnError`] - Enumerated failure modes, classified by [`ErrorKind`]
//! - [`ErrorContext`] - User-facing wrapper with suggestions and details
//! - [`user_friendly_error`] - Converts any `anyhow::Error` for display
//!
//! # Examples
//!
//! ```rust
//! use gofn::core::{GofnError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(GofnError::ManifestRequired.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, ErrorKind, GofnError, find_gofn_error, user_friendly_error};
