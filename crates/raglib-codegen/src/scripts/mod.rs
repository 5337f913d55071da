//! Benchmark and showcase program generation.
//!
//! Both programs are plain Rust examples that build a registry with the
//! project's registration function and exercise every technique of one
//! category. Generated source is parsed with `syn` before it is returned,
//! so a template or escaping bug surfaces here instead of at compile time
//! in the user's project.
//!
//! Neither program embeds a timestamp: regenerating from an unchanged
//! registry yields identical bytes.

mod escape;
mod overrides;

pub use escape::{parse_path, string_literal, value_literal};
pub use overrides::select_override;

use crate::template_engine::{BENCHMARK, SHOWCASE, TemplateEngine};
use overrides::config_expression;
use raglib_core::config::{OverrideRule, ScriptsConfig};
use raglib_core::{Category, Error, Result};
use raglib_introspector::TechniqueInfo;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Canonical input every benchmark applies each technique to.
const BENCHMARK_TEXT: &str = "\
# Introduction

This is a test document with various structures. It contains multiple paragraphs,
different section headings, and various text patterns to test chunking strategies.

## Section 1

Here we have some content that spans multiple sentences. The goal is to see
how different chunking techniques handle document structure and boundaries.

### Subsection 1.1

More detailed content with technical information. This section contains
specific details that should ideally stay together for context preservation.

## Section 2

Different content with various formatting. Lists, code blocks, and other
structural elements challenge chunking algorithms differently.

- Item 1: First list item
- Item 2: Second list item
- Item 3: Third list item

## Conclusion

This concludes the test document. It should provide a good test case for
evaluating how well different techniques preserve meaning and structure.
";

/// Input the showcase applies each technique to.
const SHOWCASE_TEXT: &str = "\
# Machine Learning Fundamentals

## Introduction

Machine learning is a subset of artificial intelligence that focuses on
algorithms that can learn and improve from experience.

### Supervised Learning

In supervised learning, algorithms learn from labeled training data.
Common examples include classification, regression, and pattern recognition.

### Unsupervised Learning

Unsupervised learning finds hidden patterns in data without labels.
This includes clustering and dimensionality reduction techniques.

## Conclusion

Understanding these fundamentals provides a solid foundation for
exploring more advanced machine learning concepts.
";

/// Kind of generated example program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Times every technique on one canonical input and records results
    Benchmark,
    /// Runs every technique with tuned configuration and prints a summary
    Showcase,
}

impl ScriptKind {
    /// Returns the kind as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Benchmark => "benchmark",
            Self::Showcase => "showcase",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated, syntactically validated example program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// Category the program covers
    pub category: String,
    /// Benchmark or showcase
    pub kind: ScriptKind,
    /// Number of techniques the program exercises
    pub technique_count: usize,
    /// Rust source
    pub source: String,
}

#[derive(Serialize)]
struct TechniqueLiteral {
    literal: String,
    config_expr: String,
}

#[derive(Serialize)]
struct ScriptContext<'a> {
    category_title: String,
    category_literal: String,
    primary_output_literal: String,
    results_path_literal: String,
    sample_text_literal: String,
    registration_fn: &'a str,
    count: usize,
    techniques: Vec<TechniqueLiteral>,
}

/// Generates benchmark and showcase programs for a category.
///
/// # Examples
///
/// ```
/// use raglib_codegen::ExampleScriptGenerator;
/// use raglib_core::config::{ScriptsConfig, ShowcaseConfig};
///
/// let generator = ExampleScriptGenerator::new(
///     &ScriptsConfig::default(),
///     ShowcaseConfig::default().overrides,
/// ).unwrap();
///
/// let script = generator.benchmark("chunking", &[], "examples/results.json").unwrap();
/// assert_eq!(script.technique_count, 0);
/// assert!(script.source.contains("fn main()"));
/// ```
#[derive(Debug)]
pub struct ExampleScriptGenerator<'a> {
    engine: TemplateEngine<'a>,
    registration_fn: String,
    primary_output: String,
    overrides: Vec<OverrideRule>,
}

impl ExampleScriptGenerator<'_> {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configured registration
    /// function is not a plain Rust path, or a template error if the
    /// built-in templates fail to load.
    pub fn new(scripts: &ScriptsConfig, overrides: Vec<OverrideRule>) -> Result<Self> {
        let registration_fn =
            parse_path(&scripts.registration_fn).map_err(|e| Error::ConfigError {
                message: format!(
                    "scripts.registration_fn '{}' is not a Rust path: {e}",
                    scripts.registration_fn
                ),
            })?;

        Ok(Self {
            engine: TemplateEngine::new()?,
            registration_fn,
            primary_output: scripts.primary_output.clone(),
            overrides,
        })
    }

    /// Generates the benchmark program for `category`.
    ///
    /// `results_path` is where the program writes its results record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptGenerationError`] if rendering fails or the
    /// output does not parse as Rust.
    pub fn benchmark(
        &self,
        category: &str,
        techniques: &[TechniqueInfo],
        results_path: &str,
    ) -> Result<GeneratedScript> {
        let literals = techniques
            .iter()
            .map(|technique| TechniqueLiteral {
                literal: string_literal(&technique.name),
                config_expr: String::new(),
            })
            .collect();
        let context = self.context(category, literals, results_path, BENCHMARK_TEXT)?;
        self.finish(category, ScriptKind::Benchmark, BENCHMARK, &context)
    }

    /// Generates the showcase program for `category`.
    ///
    /// Each technique gets the values of the first matching override rule;
    /// techniques with no matching rule run with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptGenerationError`] if an override value has no
    /// Rust literal form, rendering fails, or the output does not parse.
    pub fn showcase(
        &self,
        category: &str,
        techniques: &[TechniqueInfo],
    ) -> Result<GeneratedScript> {
        let mut literals = Vec::with_capacity(techniques.len());
        for technique in techniques {
            let config_expr = match select_override(&self.overrides, category, &technique.name) {
                Some(rule) => config_expression(&rule.values).map_err(|key| {
                    Error::ScriptGenerationError {
                        category: category.to_string(),
                        message: format!(
                            "override '{key}' for '{}' has no literal form",
                            technique.name
                        ),
                        source: None,
                    }
                })?,
                None => "ComponentConfig::new()".to_string(),
            };
            literals.push(TechniqueLiteral {
                literal: string_literal(&technique.name),
                config_expr,
            });
        }

        let context = self.context(category, literals, "", SHOWCASE_TEXT)?;
        self.finish(category, ScriptKind::Showcase, SHOWCASE, &context)
    }

    fn context(
        &self,
        category: &str,
        techniques: Vec<TechniqueLiteral>,
        results_path: &str,
        sample_text: &str,
    ) -> Result<ScriptContext<'_>> {
        let category_title = Category::new(category)
            .map_err(|e| Error::ScriptGenerationError {
                category: category.to_string(),
                message: "invalid category".to_string(),
                source: Some(Box::new(e)),
            })?
            .display_name();

        Ok(ScriptContext {
            category_title,
            category_literal: string_literal(category),
            primary_output_literal: string_literal(&self.primary_output),
            results_path_literal: string_literal(results_path),
            sample_text_literal: string_literal(sample_text),
            registration_fn: &self.registration_fn,
            count: techniques.len(),
            techniques,
        })
    }

    fn finish(
        &self,
        category: &str,
        kind: ScriptKind,
        template: &str,
        context: &ScriptContext<'_>,
    ) -> Result<GeneratedScript> {
        let source = self
            .engine
            .render(template, context)
            .map_err(|e| Error::ScriptGenerationError {
                category: category.to_string(),
                message: format!("failed to render {kind} program"),
                source: Some(Box::new(e)),
            })?;

        syn::parse_file(&source).map_err(|e| Error::ScriptGenerationError {
            category: category.to_string(),
            message: format!("generated {kind} program is not valid Rust: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(
            "Generated {kind} program for '{category}' ({} techniques, {} bytes)",
            context.count,
            source.len()
        );

        Ok(GeneratedScript {
            category: category.to_string(),
            kind,
            technique_count: context.count,
            source,
        })
    }
}
