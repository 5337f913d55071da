//! Bodies for the generated sections of human-authored documents.

use crate::catalog::{single_line, table_safe};
use crate::scripts::string_literal;
use crate::template_engine::{GUIDE, README_LIST, TECHNIQUE_LIST, TemplateEngine};
use raglib_core::Result;
use raglib_introspector::TechniqueInfo;
use serde::Serialize;

/// README display names, checked in order against the lowercase name.
///
/// `parent` precedes `document` so that `parent_document_chunker` is not
/// listed as document-specific.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("fixed", "Fixed Size Chunking"),
    ("semantic", "Semantic Chunking"),
    ("sentence", "Sentence Window Chunking"),
    ("content", "Content-Aware Chunking"),
    ("parent", "Parent-Document Chunking"),
    ("document", "Document-Specific Chunking"),
    ("recursive", "Recursive Chunking"),
    ("propositional", "Propositional Chunking"),
];

/// Friendly README name for a technique.
fn display_name(info: &TechniqueInfo) -> String {
    let lowered = info.name.to_lowercase();
    DISPLAY_NAMES
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map_or_else(
            || info.identifier.replace("Chunker", " Chunking").trim().to_string(),
            |(_, display)| (*display).to_string(),
        )
}

fn sorted(techniques: &[TechniqueInfo]) -> Vec<&TechniqueInfo> {
    let mut sorted: Vec<&TechniqueInfo> = techniques.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

#[derive(Serialize)]
struct ListedTechnique<'a> {
    identifier: &'a str,
    description: String,
    category: &'a str,
    dependencies_plain: String,
    parameters_cell: String,
}

#[derive(Serialize)]
struct ReadmeEntry {
    display_name: String,
    description: String,
}

#[derive(Serialize)]
struct GuideEntry<'a> {
    literal: String,
    name: &'a str,
    identifier: &'a str,
    description: String,
}

#[derive(Serialize)]
struct GuideContext<'a> {
    heading: &'a str,
    count: usize,
    category: &'a str,
    registration_fn: &'a str,
    techniques: Vec<GuideEntry<'a>>,
}

/// Renders the generated bodies patched into existing documents.
///
/// Every body ends with a blank line so the heading that follows the
/// section keeps its spacing.
#[derive(Debug)]
pub struct SectionRenderer<'a> {
    engine: TemplateEngine<'a>,
}

impl SectionRenderer<'_> {
    /// Creates a renderer.
    ///
    /// # Errors
    ///
    /// Returns a template error if the built-in templates fail to load.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Per-technique documentation list, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`raglib_core::Error::TemplateError`] if rendering fails.
    pub fn technique_list(&self, techniques: &[TechniqueInfo]) -> Result<String> {
        let listed: Vec<ListedTechnique<'_>> = sorted(techniques)
            .into_iter()
            .map(|info| ListedTechnique {
                identifier: &info.identifier,
                description: single_line(&info.description),
                category: &info.category,
                dependencies_plain: if info.dependencies.is_empty() {
                    "None".to_string()
                } else {
                    info.dependencies.join(", ")
                },
                parameters_cell: info
                    .parameters
                    .iter()
                    .map(|param| format!("`{param}`"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();
        self.engine
            .render(TECHNIQUE_LIST, &serde_json::json!({ "techniques": listed }))
    }

    /// README bullet list with friendly display names, sorted by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_codegen::SectionRenderer;
    /// use raglib_introspector::TechniqueInfo;
    ///
    /// let info = TechniqueInfo {
    ///     name: "parent_document_chunker".to_string(),
    ///     category: "chunking".to_string(),
    ///     description: "Small chunks, large context".to_string(),
    ///     version: "1.0.0".to_string(),
    ///     dependencies: vec![],
    ///     identifier: "ParentDocumentChunker".to_string(),
    ///     module: "raglib::chunkers".to_string(),
    ///     parameters: vec![],
    ///     example: None,
    /// };
    /// let body = SectionRenderer::new().unwrap().readme_list(&[info]).unwrap();
    /// assert_eq!(body, "- **Parent-Document Chunking**: Small chunks, large context\n\n");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`raglib_core::Error::TemplateError`] if rendering fails.
    pub fn readme_list(&self, techniques: &[TechniqueInfo]) -> Result<String> {
        let entries: Vec<ReadmeEntry> = sorted(techniques)
            .into_iter()
            .map(|info| ReadmeEntry {
                display_name: display_name(info),
                description: single_line(&info.description),
            })
            .collect();
        let mut body = self
            .engine
            .render(README_LIST, &serde_json::json!({ "techniques": entries }))?;
        if !body.is_empty() {
            body.push('\n');
        }
        Ok(body)
    }

    /// Getting-started guide section for one category.
    ///
    /// `registration_fn` must already be a validated Rust path.
    ///
    /// # Errors
    ///
    /// Returns [`raglib_core::Error::TemplateError`] if rendering fails.
    pub fn guide(
        &self,
        heading: &str,
        category: &str,
        registration_fn: &str,
        techniques: &[TechniqueInfo],
    ) -> Result<String> {
        let entries: Vec<GuideEntry<'_>> = sorted(techniques)
            .into_iter()
            .map(|info| GuideEntry {
                literal: string_literal(&info.name),
                name: &info.name,
                identifier: &info.identifier,
                description: table_safe(&info.description),
            })
            .collect();
        let context = GuideContext {
            heading,
            count: entries.len(),
            category,
            registration_fn,
            techniques: entries,
        };
        self.engine.render(GUIDE, &context)
    }
}
