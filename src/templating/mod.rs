//! Entry point generation from version-gated templates
//!
//! The generated `main.go` imports the user's package and registers the
//! target function with the functions framework. The registration API changed
//! in framework `v1.1.0`, so two templates exist:
//!
//! | Framework version | Variant | Registration |
//! |-------------------|---------|--------------|
//! | `< 1.1.0` | [`TemplateVariant::V0`] | `RegisterHTTPFunction` / `RegisterEventFunction` |
//! | `>= 1.1.0` | [`TemplateVariant::V1_1`] | `Register*FunctionContext` with a context |
//!
//! Only the release core of the version takes part in the comparison, so a
//! pre-release such as `v1.1.0-rc1` selects [`TemplateVariant::V1_1`].
//!
//! # Template Variables
//!
//! - `source`: directory holding the function source
//! - `target`: exported function name
//! - `package`: import path of the function package
//! - `framework_version`: the version string the variant was chosen for
//!
//! Values are substituted verbatim; autoescaping is disabled.

pub mod renderer;


pub use renderer::EntrypointTemplates;

use anyhow::{Context, Result};
use std::path::Path;

use crate::constants::TEMPLATE_THRESHOLD_VERSION;
use crate::function::FunctionInfo;
use crate::utils::fs::safe_write;
use crate::version::Version;

/// Which entry point template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVariant {
    /// Frameworks older than `v1.1.0`
    V0,
    /// Frameworks at `v1.1.0` or newer
    V1_1,
}

impl TemplateVariant {
    /// Selects the variant for a parsed framework version.
    #[must_use]
    pub fn for_version(version: &Version) -> Self {
        if version.at_least(&TEMPLATE_THRESHOLD_VERSION) {
            Self::V1_1
        } else {
            Self::V0
        }
    }

    /// Template name registered with Tera.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::V0 => "main_v0.go",
            Self::V1_1 => "main_v1_1.go",
        }
    }

    pub(crate) const fn source(self) -> &'static str {
        match self {
            Self::V0 => include_str!("../../templates/main_v0.go.tera"),
            Self::V1_1 => include_str!("../../templates/main_v1_1.go.tera"),
        }
    }
}

/// Renders the entry point for `function` and writes it to `dest`.
///
/// `version` is the framework version the application will build against,
/// in any form [`Version::parse_tolerant`] accepts. Returns the variant that
/// was rendered.
///
/// # Errors
///
/// - [`GofnError::VersionParse`](crate::core::GofnError::VersionParse) if
///   `version` is malformed; nothing is written in that case
/// - [`GofnError::TemplateError`](crate::core::GofnError::TemplateError) if
///   rendering fails
/// - a file system error naming `dest` if the file cannot be written
pub fn render_entrypoint(
    dest: &Path,
    function: &FunctionInfo,
    version: &str,
) -> Result<TemplateVariant> {
    let parsed = Version::parse_tolerant(version)?;
    let variant = TemplateVariant::for_version(&parsed);
    tracing::debug!(
        "Rendering {} for framework {} ({})",
        variant.name(),
        version,
        function.package
    );

    let content = EntrypointTemplates::global()?
        .render(variant, function, version)
        .with_context(|| format!("Failed to render entry point {}", dest.display()))?;

    safe_write(dest, &content)
        .with_context(|| format!("Failed to write entry point {}", dest.display()))?;

    Ok(variant)
}
