//! Project configuration loaded from `raglib-docs.toml`.
//!
//! Every field has a default matching the conventional RAGLib project
//! layout, so a missing file or a partial file is valid.
//!
//! # Examples
//!
//! ```
//! use raglib_core::DocsConfig;
//!
//! let config: DocsConfig = toml::from_str(r#"
//!     [catalog]
//!     category_order = ["retrieval", "chunking"]
//!
//!     [[techniques]]
//!     name = "bm25"
//!     category = "retrieval"
//!     description = "Sparse lexical retrieval"
//!     identifier = "BM25"
//!     module = "raglib::techniques::bm25"
//! "#).unwrap();
//!
//! assert_eq!(config.catalog.category_order, ["retrieval", "chunking"]);
//! assert_eq!(config.paths.docs_dir.to_str(), Some("docs"));
//! assert_eq!(config.techniques[0].version, "1.0.0");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "raglib-docs.toml";

/// Top-level project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Document and artifact locations
    pub paths: PathsConfig,
    /// Catalog rendering options
    pub catalog: CatalogConfig,
    /// Site builder options
    pub site: SiteConfig,
    /// Example program generation options
    pub scripts: ScriptsConfig,
    /// Anchored sections to keep synchronized
    #[serde(rename = "patch")]
    pub patches: Vec<PatchTarget>,
    /// Guide section inserted into the getting-started document
    pub guide: GuideConfig,
    /// Showcase configuration overrides
    pub showcase: ShowcaseConfig,
    /// Techniques declared in the manifest
    pub techniques: Vec<TechniqueSpec>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            catalog: CatalogConfig::default(),
            site: SiteConfig::default(),
            scripts: ScriptsConfig::default(),
            patches: default_patches(),
            guide: GuideConfig::default(),
            showcase: ShowcaseConfig::default(),
            techniques: Vec::new(),
        }
    }
}

impl DocsConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file exists but cannot be read
    /// or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigError {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;

        toml::from_str(&content).map_err(|e| Error::ConfigError {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }
}

/// Document and artifact locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Documentation directory
    pub docs_dir: PathBuf,
    /// Directory receiving generated example programs
    pub examples_dir: PathBuf,
    /// Generated catalog index
    pub catalog: PathBuf,
    /// Hand-written technique overview
    pub techniques_doc: PathBuf,
    /// Getting-started guide
    pub getting_started: PathBuf,
    /// Documentation landing page
    pub index: PathBuf,
    /// Project README
    pub readme: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            examples_dir: PathBuf::from("examples"),
            catalog: PathBuf::from("docs/techniques_generated.md"),
            techniques_doc: PathBuf::from("docs/techniques.md"),
            getting_started: PathBuf::from("docs/getting_started.md"),
            index: PathBuf::from("docs/index.md"),
            readme: PathBuf::from("README.md"),
        }
    }
}

impl PathsConfig {
    /// Generated benchmark program for `category`.
    #[must_use]
    pub fn benchmark_script(&self, category: &str) -> PathBuf {
        self.examples_dir
            .join(format!("{category}_benchmark_auto.rs"))
    }

    /// Generated showcase program for `category`.
    #[must_use]
    pub fn showcase_script(&self, category: &str) -> PathBuf {
        self.examples_dir.join(format!("{category}_showcase_auto.rs"))
    }

    /// Results record written by the benchmark program for `category`.
    #[must_use]
    pub fn benchmark_results(&self, category: &str) -> PathBuf {
        self.examples_dir
            .join(format!("{category}_benchmark_results_auto.json"))
    }
}

/// Catalog rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog title
    pub title: String,
    /// Preferred category order; unlisted categories follow alphabetically
    pub category_order: Vec<String>,
    /// Code fence language for usage examples
    pub example_language: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            title: "Techniques Index".to_string(),
            category_order: ["chunking", "retrieval", "reranking", "generation", "orchestration"]
                .map(String::from)
                .to_vec(),
            example_language: "rust".to_string(),
        }
    }
}

/// Site builder options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site builder binary
    pub command: String,
    /// Site builder config file, relative to the project root
    pub config_file: PathBuf,
    /// Build output directory, relative to the project root
    pub output_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            command: "mkdocs".to_string(),
            config_file: PathBuf::from("mkdocs.yml"),
            output_dir: PathBuf::from("site"),
        }
    }
}

/// Example program generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Categories to generate benchmark and showcase programs for
    pub categories: Vec<String>,
    /// Path of the function that registers every technique, called by the
    /// generated programs as `path(&registry)?`
    pub registration_fn: String,
    /// Payload key holding each technique's primary output
    pub primary_output: String,
    /// Command prefix used to run a generated program; the program name is
    /// appended
    pub runner: Vec<String>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            categories: vec!["chunking".to_string()],
            registration_fn: "raglib_techniques::register_all".to_string(),
            primary_output: "chunks".to_string(),
            runner: ["cargo", "run", "--quiet", "--example"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// How a patched section body is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// One sub-heading per technique with description, category,
    /// dependencies, and parameters
    TechniqueList,
    /// One bullet per technique with a friendly display name
    ReadmeList,
}

/// One anchored section kept synchronized with the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchTarget {
    /// Document to patch, relative to the project root
    pub document: PathBuf,
    /// Sentinel name: `<!-- raglib:begin NAME -->` / `<!-- raglib:end NAME -->`
    pub name: String,
    /// Fallback start-anchor pattern (regex, matched per line)
    #[serde(default)]
    pub start: Option<String>,
    /// Fallback stop-anchor pattern (regex, matched per line)
    #[serde(default)]
    pub stop: Option<String>,
    /// Category whose techniques fill the section
    pub category: String,
    /// Section body renderer
    pub kind: SectionKind,
}

/// Default synchronized sections.
fn default_patches() -> Vec<PatchTarget> {
    vec![
        PatchTarget {
            document: PathBuf::from("docs/techniques.md"),
            name: "chunking-techniques".to_string(),
            start: Some(r"^### Chunking Techniques\s*$".to_string()),
            stop: Some(r"^#+ ".to_string()),
            category: "chunking".to_string(),
            kind: SectionKind::TechniqueList,
        },
        PatchTarget {
            document: PathBuf::from("README.md"),
            name: "document-processing".to_string(),
            start: Some(r"^### 🔨 Document Processing\s*$".to_string()),
            stop: Some(r"^#+ ".to_string()),
            category: "chunking".to_string(),
            kind: SectionKind::ReadmeList,
        },
    ]
}

/// Guide section inserted into the getting-started document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Whether the insertion runs at all
    pub enabled: bool,
    /// Category whose techniques the guide demonstrates
    pub category: String,
    /// Heading of the inserted section; its presence means "already done"
    pub heading: String,
    /// The section is inserted before the first line matching this pattern
    pub insert_before: String,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            category: "chunking".to_string(),
            heading: "### 2. Advanced Chunking Techniques".to_string(),
            insert_before: r"^### 2\. Using the CLI".to_string(),
        }
    }
}

/// Showcase configuration overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Rules are tried in order; the first rule whose category matches and
    /// whose pattern occurs in the lowercase technique name wins
    pub overrides: Vec<OverrideRule>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        let rule = |category: &str, pattern: &str, values: &[(&str, i64)]| OverrideRule {
            category: category.to_string(),
            pattern: pattern.to_string(),
            values: values
                .iter()
                .map(|(key, value)| ((*key).to_string(), Value::from(*value)))
                .collect(),
        };

        Self {
            overrides: vec![
                rule(
                    "chunking",
                    "parent",
                    &[("child_chunk_size", 100), ("parent_chunk_size", 300)],
                ),
                rule("chunking", "content", &[("max_chunk_size", 200)]),
                rule("chunking", "semantic", &[("chunk_size", 200)]),
                rule("chunking", "sentence", &[("window_size", 3)]),
                rule("chunking", "", &[("chunk_size", 200)]),
                rule("retrieval", "", &[("top_k", 5)]),
                rule("reranking", "", &[("top_k", 3)]),
            ],
        }
    }
}

/// Name-pattern rule selecting showcase configuration overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Category the rule applies to
    pub category: String,
    /// Substring of the lowercase technique name; empty matches everything
    #[serde(default)]
    pub pattern: String,
    /// Configuration values applied when the rule matches
    pub values: BTreeMap<String, Value>,
}

impl OverrideRule {
    /// Returns `true` if the rule applies to `name` in `category`.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::config::ShowcaseConfig;
    ///
    /// let rules = ShowcaseConfig::default().overrides;
    /// let first = rules
    ///     .iter()
    ///     .find(|r| r.matches("chunking", "parent_document_chunker"))
    ///     .unwrap();
    /// assert!(first.values.contains_key("parent_chunk_size"));
    /// ```
    #[must_use]
    pub fn matches(&self, category: &str, name: &str) -> bool {
        self.category == category && name.to_lowercase().contains(&self.pattern.to_lowercase())
    }
}

/// A technique declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueSpec {
    /// Unique technique name
    pub name: String,
    /// Taxonomy category
    pub category: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Semantic version
    #[serde(default = "default_version")]
    pub version: String,
    /// Ordered dependency list
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Implementing type identifier
    pub identifier: String,
    /// Defining module path
    pub module: String,
    /// Constructor parameter names
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Usage documentation with an optional `Example:` block
    #[serde(default)]
    pub docs: Option<String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DocsConfig::load(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, DocsConfig::default());
        assert_eq!(config.patches.len(), 2);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[catalog\n").unwrap();

        let err = DocsConfig::load(&path).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_patch_tables_replace_defaults() {
        let config: DocsConfig = toml::from_str(
            r#"
            [[patch]]
            document = "docs/retrieval.md"
            name = "retrievers"
            category = "retrieval"
            kind = "technique_list"
            "#,
        )
        .unwrap();

        assert_eq!(config.patches.len(), 1);
        assert_eq!(config.patches[0].kind, SectionKind::TechniqueList);
        assert!(config.patches[0].start.is_none());
    }

    #[test]
    fn test_script_paths() {
        let paths = PathsConfig::default();
        assert_eq!(
            paths.benchmark_script("chunking"),
            PathBuf::from("examples/chunking_benchmark_auto.rs")
        );
        assert_eq!(
            paths.benchmark_results("chunking"),
            PathBuf::from("examples/chunking_benchmark_results_auto.json")
        );
    }

    #[test]
    fn test_catch_all_rule_matches_any_chunker() {
        let rules = ShowcaseConfig::default().overrides;
        let rule = rules
            .iter()
            .find(|r| r.matches("chunking", "fixed_size_chunker"))
            .unwrap();
        assert_eq!(rule.values["chunk_size"], Value::from(200));
    }
}
