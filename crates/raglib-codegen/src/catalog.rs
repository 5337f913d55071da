//! Markdown catalog rendering.

use crate::template_engine::{CATALOG, CATALOG_EMPTY, TemplateEngine};
use raglib_core::Result;
use raglib_core::config::CatalogConfig;
use raglib_introspector::{CatalogSnapshot, TechniqueInfo};
use serde::Serialize;

#[derive(Serialize)]
struct EntryContext<'a> {
    name: &'a str,
    description: String,
    version: &'a str,
    identifier: &'a str,
    module: &'a str,
    dependencies_cell: String,
    example: Option<&'a str>,
    fence: String,
}

#[derive(Serialize)]
struct GroupContext<'a> {
    title: &'a str,
    techniques: Vec<EntryContext<'a>>,
}

#[derive(Serialize)]
struct CatalogContext<'a> {
    title: &'a str,
    language: &'a str,
    total_techniques: usize,
    total_categories: usize,
    groups: Vec<GroupContext<'a>>,
}

/// Backticked, comma-separated dependency list, or `None`.
pub(crate) fn dependencies_cell(dependencies: &[String]) -> String {
    if dependencies.is_empty() {
        return "None".to_string();
    }
    dependencies
        .iter()
        .map(|dep| format!("`{dep}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapses every whitespace run, line breaks included, into one space.
///
/// Descriptions are rendered inside bold spans and bullet lines, where a
/// blank line or a `#`-prefixed line would change the document structure.
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markdown table cells cannot contain raw pipes or line breaks.
pub(crate) fn table_safe(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}

/// A backtick fence longer than any backtick run inside `code`.
fn code_fence(code: &str) -> String {
    let longest = code
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

impl<'a> EntryContext<'a> {
    fn new(info: &'a TechniqueInfo) -> Self {
        Self {
            name: &info.name,
            description: single_line(&info.description),
            version: &info.version,
            identifier: &info.identifier,
            module: &info.module,
            dependencies_cell: table_safe(&dependencies_cell(&info.dependencies)),
            example: info.example.as_deref(),
            fence: code_fence(info.example.as_deref().unwrap_or_default()),
        }
    }
}

/// Renders the technique catalog.
///
/// Rendering is pure: the same snapshot always yields the same bytes.
/// Persisting the result is the caller's concern.
///
/// # Examples
///
/// ```
/// use raglib_codegen::CatalogGenerator;
/// use raglib_core::config::CatalogConfig;
/// use raglib_introspector::CatalogSnapshot;
///
/// let generator = CatalogGenerator::new(CatalogConfig::default()).unwrap();
/// let markdown = generator.render(&CatalogSnapshot::default()).unwrap();
///
/// assert!(markdown.starts_with("# Techniques Index\n"));
/// assert!(markdown.contains("**Total Techniques:** 0"));
/// ```
#[derive(Debug)]
pub struct CatalogGenerator<'a> {
    engine: TemplateEngine<'a>,
    config: CatalogConfig,
}

impl CatalogGenerator<'_> {
    /// Creates a catalog generator.
    ///
    /// # Errors
    ///
    /// Returns a template error if the built-in templates fail to load.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            config,
        })
    }

    /// Preferred category order used when capturing snapshots.
    #[must_use]
    pub fn category_order(&self) -> &[String] {
        &self.config.category_order
    }

    /// Renders `snapshot` as a complete markdown document.
    ///
    /// An empty snapshot renders a placeholder page.
    ///
    /// # Errors
    ///
    /// Returns [`raglib_core::Error::TemplateError`] if rendering fails.
    pub fn render(&self, snapshot: &CatalogSnapshot) -> Result<String> {
        if snapshot.is_empty() {
            return self.engine.render(
                CATALOG_EMPTY,
                &serde_json::json!({ "title": self.config.title }),
            );
        }

        let context = CatalogContext {
            title: &self.config.title,
            language: &self.config.example_language,
            total_techniques: snapshot.total_techniques,
            total_categories: snapshot.total_categories(),
            groups: snapshot
                .groups
                .iter()
                .map(|group| GroupContext {
                    title: &group.title,
                    techniques: group.techniques.iter().map(EntryContext::new).collect(),
                })
                .collect(),
        };
        self.engine.render(CATALOG, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(
        name: &str,
        category: &str,
        dependencies: &[&str],
        example: Option<&str>,
    ) -> TechniqueInfo {
        TechniqueInfo {
            name: name.to_string(),
            category: category.to_string(),
            description: format!("{name} description"),
            version: "1.0.0".to_string(),
            dependencies: dependencies.iter().map(ToString::to_string).collect(),
            identifier: "Impl".to_string(),
            module: "raglib::techniques::imp".to_string(),
            parameters: vec![],
            example: example.map(String::from),
        }
    }

    fn generator() -> CatalogGenerator<'static> {
        CatalogGenerator::new(CatalogConfig::default()).unwrap()
    }

    #[test]
    fn test_single_entry_exact_output() {
        let snapshot = CatalogSnapshot::from_infos(vec![info("bm25", "retrieval", &[], None)], &[]);
        let markdown = generator().render(&snapshot).unwrap();

        let expected_tail = "\
**Total Techniques:** 1
**Categories:** 1

---

## Retrieval

### bm25

**bm25 description**

| Property | Value |
|----------|-------|
| Version | `1.0.0` |
| Identifier | `Impl` |
| Module | `raglib::techniques::imp` |
| Dependencies | None |

---
";
        assert!(markdown.ends_with(expected_tail), "got:\n{markdown}");
    }

    #[test]
    fn test_example_block_and_dependencies() {
        let snapshot = CatalogSnapshot::from_infos(
            vec![info("dense", "retrieval", &["faiss", "numpy"], Some("Dense::new()"))],
            &[],
        );
        let markdown = generator().render(&snapshot).unwrap();

        assert!(markdown.contains("| Dependencies | `faiss`, `numpy` |"));
        assert!(markdown.contains("**Usage Example:**\n\n```rust\nDense::new()\n```\n\n---"));
    }

    #[test]
    fn test_render_is_byte_stable() {
        let snapshot = CatalogSnapshot::from_infos(
            vec![
                info("bm25", "retrieval", &[], None),
                info("fixed_size_chunker", "chunking", &["tiktoken"], Some("x")),
            ],
            &CatalogConfig::default().category_order,
        );
        let generator = generator();
        assert_eq!(generator.render(&snapshot).unwrap(), generator.render(&snapshot).unwrap());
    }

    #[test]
    fn test_empty_snapshot_placeholder() {
        let markdown = generator().render(&CatalogSnapshot::default()).unwrap();
        assert!(markdown.contains("No techniques are registered yet."));
    }

    #[test]
    fn test_fenced_example_gets_longer_fence() {
        let example = "```rust\nlet c = Fixed::new();\n```";
        let snapshot = CatalogSnapshot::from_infos(
            vec![info("fixed", "chunking", &[], Some(example))],
            &[],
        );
        let markdown = generator().render(&snapshot).unwrap();

        assert!(markdown.contains(
            "**Usage Example:**\n\n````rust\n\
             ```rust\nlet c = Fixed::new();\n```\n\
             ````\n\n---"
        ));
        assert!(markdown.ends_with("````\n\n---\n"));
    }

    #[test]
    fn test_code_fence_length() {
        assert_eq!(code_fence(""), "```");
        assert_eq!(code_fence("let s = `x`;"), "```");
        assert_eq!(code_fence("```\nx\n```"), "````");
        assert_eq!(code_fence("`````"), "``````");
    }

    #[test]
    fn test_multiline_description_stays_in_bold_span() {
        let mut entry = info("bm25", "retrieval", &[], None);
        entry.description = "Sparse retrieval.\n\n# Scoring\nUses term frequency.".to_string();
        let snapshot = CatalogSnapshot::from_infos(vec![entry], &[]);
        let markdown = generator().render(&snapshot).unwrap();

        assert!(markdown.contains("**Sparse retrieval. # Scoring Uses term frequency.**\n"));
        assert!(!markdown.contains("\n# Scoring"));
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        assert_eq!(table_safe("a|b\nc"), "a\\|b c");
        assert_eq!(single_line("  a\r\n\n\tb  "), "a b");
        assert_eq!(dependencies_cell(&[]), "None");
    }
}
