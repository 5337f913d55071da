//! Template engine for documentation and example generation using Handlebars.
//!
//! Provides a wrapper around Handlebars with the built-in catalog, section,
//! and example-program templates pre-registered.
//!
//! # Examples
//!
//! ```
//! use raglib_codegen::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "Hello {{name}}").unwrap();
//! assert_eq!(engine.render("greeting", &json!({"name": "<RAG>"})).unwrap(), "Hello <RAG>");
//! ```

use handlebars::Handlebars;
use raglib_core::{Error, Result};
use serde::Serialize;

/// Name of the catalog template.
pub const CATALOG: &str = "catalog";
/// Name of the empty-registry catalog template.
pub const CATALOG_EMPTY: &str = "catalog_empty";
/// Name of the per-technique documentation list template.
pub const TECHNIQUE_LIST: &str = "sections/technique_list";
/// Name of the README bullet list template.
pub const README_LIST: &str = "sections/readme_list";
/// Name of the getting-started guide section template.
pub const GUIDE: &str = "sections/guide";
/// Name of the benchmark program template.
pub const BENCHMARK: &str = "scripts/benchmark";
/// Name of the showcase program template.
pub const SHOWCASE: &str = "scripts/showcase";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (CATALOG, include_str!("../templates/catalog.md.hbs")),
    (CATALOG_EMPTY, include_str!("../templates/catalog_empty.md.hbs")),
    (TECHNIQUE_LIST, include_str!("../templates/sections/technique_list.md.hbs")),
    (README_LIST, include_str!("../templates/sections/readme_list.md.hbs")),
    (GUIDE, include_str!("../templates/sections/guide.md.hbs")),
    (BENCHMARK, include_str!("../templates/scripts/benchmark.rs.hbs")),
    (SHOWCASE, include_str!("../templates/scripts/showcase.rs.hbs")),
];

/// Template engine for markdown and Rust generation.
///
/// Output is never HTML-escaped: markdown and Rust have their own escaping
/// rules, applied by the callers before values reach a template.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to
    /// compile.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, template) in BUILTIN_TEMPLATES {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| Error::TemplateError {
                    message: format!("Failed to register template '{name}': {e}"),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template is not registered,
    /// the context cannot be serialized, or a referenced variable is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                message: format!("Rendering '{template_name}' failed: {e}"),
            })
    }

    /// Registers a custom template, replacing any template of that name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                message: format!("Failed to register template '{name}': {e}"),
            })
    }

    /// Returns `true` if a template named `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
