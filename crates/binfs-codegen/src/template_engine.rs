//! Template engine for source generation using Handlebars.
//!
//! Templates emit Rust, so HTML escaping is disabled; every value that ends
//! up inside a string literal is escaped by the caller before rendering.
//!
//! # Examples
//!
//! ```
//! use binfs_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "fn {{name}}() {}").unwrap();
//! assert_eq!(engine.render("greeting", &json!({"name": "a<b"})).unwrap(), "fn a<b() {}");
//! ```

use crate::error::{CodegenError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Name of the built-in loader module template.
pub const MODULE_TEMPLATE: &str = "module";

/// Template engine for code generation.
///
/// Wraps Handlebars in strict mode, so a missing context field fails the
/// render instead of producing broken source.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates an engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        Self::register_builtin_templates(&mut handlebars)?;

        Ok(Self { handlebars })
    }

    fn register_builtin_templates(handlebars: &mut Handlebars<'a>) -> Result<()> {
        handlebars
            .register_template_string(MODULE_TEMPLATE, include_str!("../templates/module.rs.hbs"))
            .map_err(|e| CodegenError::Template {
                message: format!("Failed to register module template: {e}"),
            })
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown, the context cannot be
    /// serialized, or a referenced field is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| CodegenError::Template {
                message: format!("Template rendering failed: {e}"),
            })
    }

    /// Registers an additional template.
    ///
    /// Registering under [`MODULE_TEMPLATE`] replaces the built-in loader
    /// template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| CodegenError::Template {
                message: format!("Failed to register template '{name}': {e}"),
            })
    }

    /// Returns `true` if a template is registered under `name`.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
