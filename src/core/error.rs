//! Error handling for gofn
//!
//! This module provides the error type shared by every build step and the
//! user-facing reporting used by the CLI. The error system follows two rules:
//! 1. **Strongly-typed errors** so callers and tests can match on the failure
//! 2. **User-friendly messages** with a suggestion where one exists
//!
//! # Error Kinds
//!
//! Every [`GofnError`] belongs to one [`ErrorKind`]:
//! - **UserConfiguration**: the function source or its configuration is wrong
//!   (missing `go.mod` on an old toolchain, read-only `go.mod`, module path
//!   without a domain, no function target). Reported verbatim.
//! - **ExternalToolFailure**: `go`, `git` or the package helper failed.
//! - **Parse**: a version string could not be parsed.
//! - **Internal**: file system, template or configuration file problems.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gofn::core::{ErrorKind, GofnError, user_friendly_error};
//!
//! let error = GofnError::InvalidModulePath {
//!     module: "foo/bar".to_string(),
//! };
//! assert_eq!(error.kind(), ErrorKind::UserConfiguration);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`GofnError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user's function source or configuration must change.
    UserConfiguration,
    /// An external tool invocation failed.
    ExternalToolFailure,
    /// A version string was malformed.
    Parse,
    /// Anything else: file system, rendering, configuration files.
    Internal,
}

/// The main error type for gofn operations.
///
/// Variants carry the values needed to print an actionable message. Functions
/// in the crate return `anyhow::Result` and wrap these with context; use
/// [`GofnError::kind`] or [`find_gofn_error`] to recover the classification
/// from an `anyhow::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GofnError {
    /// No `go.mod` and the active toolchain cannot build without one.
    #[error("function build requires a module manifest (go.mod)")]
    ManifestRequired,

    /// `go.mod` exists but the owner write bit is not set.
    ///
    /// `go list -m` would otherwise fail later with the obscure
    /// "updates to go.sum needed, disabled by -mod=readonly".
    #[error("go.mod exists but is not writable: {path}")]
    ManifestNotWritable {
        /// Path of the manifest
        path: String,
    },

    /// The function's module path has no dot in its first path element.
    #[error(
        "the module path in the function's go.mod must contain a dot in the first path element before a slash, e.g. example.com/module, found: {module}"
    )]
    InvalidModulePath {
        /// Module identity reported by the toolchain
        module: String,
    },

    /// No function target was configured.
    #[error("function target is not set")]
    MissingFunctionTarget,

    /// An external command exited unsuccessfully.
    #[error("{program} {operation} failed: {stderr}")]
    CommandFailed {
        /// Program that was run (`go`, `git`, ...)
        program: String,
        /// Subcommand or first argument, for the message
        operation: String,
        /// Exit code if the process exited normally
        exit_code: Option<i32>,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// The program could not be found on PATH.
    #[error("{program} is not installed or not found in PATH")]
    ToolNotFound {
        /// Program that was looked up
        program: String,
    },

    /// The toolchain version output could not be understood.
    #[error("unable to determine Go toolchain version from: {output}")]
    ToolchainVersionUnknown {
        /// Raw output of the version probe
        output: String,
    },

    /// A framework version string could not be parsed.
    #[error("unable to parse framework version string {version}: {reason}")]
    VersionParse {
        /// The offending literal
        version: String,
        /// Why parsing failed
        reason: String,
    },

    /// A build step failed without a more specific cause.
    ///
    /// The underlying error chain is carried in [`ErrorContext::details`].
    #[error("build failed")]
    BuildFailed,

    /// Rendering the entry point template failed.
    #[error("executing template {template}: {reason}")]
    TemplateError {
        /// Template name
        template: String,
        /// Tera's explanation
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },
}

impl GofnError {
    /// Returns the [`ErrorKind`] of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestRequired
            | Self::ManifestNotWritable {
                ..
            }
            | Self::InvalidModulePath {
                ..
            }
            | Self::MissingFunctionTarget => ErrorKind::UserConfiguration,
            Self::CommandFailed {
                ..
            }
            | Self::ToolNotFound {
                ..
            }
            | Self::ToolchainVersionUnknown {
                ..
            } => ErrorKind::ExternalToolFailure,
            Self::VersionParse {
                ..
            } => ErrorKind::Parse,
            Self::BuildFailed
            | Self::TemplateError {
                ..
            }
            | Self::ConfigError {
                ..
            } => ErrorKind::Internal,
        }
    }

    /// Whether the message should be shown to the user as-is.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::UserConfiguration)
    }
}

/// Finds the first [`GofnError`] in an `anyhow` error chain.
///
/// Context layers added with `.context(...)` sit on top of the typed error, so
/// a plain `downcast_ref` on the outer error is not enough.
#[must_use]
pub fn find_gofn_error(error: &anyhow::Error) -> Option<&GofnError> {
    error.chain().find_map(|cause| cause.downcast_ref::<GofnError>())
}

/// Error wrapper carrying a suggestion and details for the terminal.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GofnError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
    /// Context messages added on top of the typed error, outermost first
    pub trail: Vec<String>,
}

impl ErrorContext {
    /// Creates a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: GofnError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
            trail: Vec::new(),
        }
    }

    /// Adds a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn with_trail(mut self, trail: Vec<String>) -> Self {
        self.trail = trail;
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        for line in &self.trail {
            eprintln!("{}: {}", "error".red().bold(), line);
        }
        let label = if self.trail.is_empty() {
            "error"
        } else {
            "caused by"
        };
        eprintln!("{}: {}", label.red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.trail {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Converts any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// Typed [`GofnError`]s anywhere in the chain are preferred; the outer context
/// messages are kept as a trail so the user still sees which step failed.
/// Errors without a typed cause are reported as [`GofnError::BuildFailed`]
/// with the full chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let trail: Vec<String> = error
        .chain()
        .take_while(|cause| cause.downcast_ref::<GofnError>().is_none())
        .map(ToString::to_string)
        .collect();

    if let Some(gofn_error) = find_gofn_error(&error) {
        return create_error_context(gofn_error.clone()).with_trail(trail);
    }

    let context = ErrorContext::new(GofnError::BuildFailed).with_details(format!("{error:#}"));
    match error.downcast_ref::<std::io::Error>() {
        Some(io_error) if io_error.kind() == std::io::ErrorKind::PermissionDenied => context
            .with_suggestion("Check ownership and permissions of the application directory"),
        _ => context,
    }
}

fn create_error_context(error: GofnError) -> ErrorContext {
    match &error {
        GofnError::ManifestRequired => ErrorContext::new(error)
            .with_suggestion("Run 'go mod init <module>' in the function directory and deploy the go.mod file")
            .with_details("Go 1.14 and later only build functions that declare a module"),
        GofnError::ManifestNotWritable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Make go.mod writable by its owner (chmod u+w go.mod)"),
        GofnError::InvalidModulePath {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Rename the module in go.mod to a domain-style path such as example.com/myfunction",
        ),
        GofnError::MissingFunctionTarget => ErrorContext::new(error)
            .with_suggestion("Set FUNCTION_TARGET or pass --target with the exported function name"),
        GofnError::ToolNotFound {
            program,
        } => {
            let suggestion = format!("Install {program} and make sure it is on PATH");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        GofnError::CommandFailed {
            exit_code,
            ..
        } => {
            let details = match exit_code {
                Some(code) => format!("The command exited with status {code}"),
                None => "The command was terminated by a signal".to_string(),
            };
            ErrorContext::new(error).with_details(details)
        }
        GofnError::VersionParse {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Pin the functions framework to a semantic version tag such as v1.1.0 in go.mod",
        ),
        GofnError::ConfigError {
            ..
        } => ErrorContext::new(error).with_suggestion("Check the syntax of the configuration file"),
        _ => ErrorContext::new(error),
    }
}
