//! Tera-backed entry point templates.
//!
//! Both templates are compiled once per process into [`EntrypointTemplates`]
//! and shared read-only afterwards.

use std::sync::LazyLock;
use tera::{Context as TeraContext, Tera};

use super::TemplateVariant;
use crate::core::GofnError;
use crate::function::FunctionInfo;

static TEMPLATES: LazyLock<Result<EntrypointTemplates, GofnError>> =
    LazyLock::new(EntrypointTemplates::compile);

/// The compiled entry point templates.
#[derive(Debug)]
pub struct EntrypointTemplates {
    tera: Tera,
}

impl EntrypointTemplates {
    fn compile() -> Result<Self, GofnError> {
        let mut tera = Tera::default();
        // Go source, not HTML.
        tera.autoescape_on(vec![]);

        let variants = [TemplateVariant::V0, TemplateVariant::V1_1];
        tera.add_raw_templates(variants.iter().map(|v| (v.name(), v.source()))).map_err(|e| {
            GofnError::TemplateError {
                template: "entrypoint".to_string(),
                reason: error_chain(&e),
            }
        })?;

        Ok(Self {
            tera,
        })
    }

    /// Returns the process-wide templates, compiling them on first use.
    ///
    /// # Errors
    ///
    /// [`GofnError::TemplateError`] if the embedded templates do not compile.
    pub fn global() -> Result<&'static Self, GofnError> {
        TEMPLATES.as_ref().map_err(Clone::clone)
    }

    /// Renders `variant` for `function`.
    ///
    /// # Errors
    ///
    /// [`GofnError::TemplateError`] naming the template when Tera fails.
    pub fn render(
        &self,
        variant: TemplateVariant,
        function: &FunctionInfo,
        framework_version: &str,
    ) -> Result<String, GofnError> {
        let template_error = |e: &tera::Error| GofnError::TemplateError {
            template: variant.name().to_string(),
            reason: error_chain(e),
        };

        let mut context = TeraContext::from_serialize(function).map_err(|e| template_error(&e))?;
        context.insert("framework_version", framework_version);

        self.tera.render(variant.name(), &context).map_err(|e| template_error(&e))
    }
}

/// Flattens Tera's nested error sources into one line.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
