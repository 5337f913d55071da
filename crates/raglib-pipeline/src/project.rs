//! Project-level operations outside the staged run: integrity checks,
//! cleaning generated artifacts, and running the generated benchmarks.

use crate::site::{ToolOutput, run_tool};
use raglib_core::config::DocsConfig;
use raglib_core::{BenchmarkReport, Error, Result};
use raglib_files::{DocumentStore, FilesError, RemoveStatus};
use raglib_registry::TechniqueRegistry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Counts `.html` files below `dir`. A missing directory counts as zero.
#[must_use]
pub fn count_html_pages(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "html"))
        .count()
}

/// Outcome of [`validate_project`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectValidation {
    /// Core files that were checked, with whether each exists
    pub files: Vec<(PathBuf, bool)>,
    /// Registered techniques
    pub technique_count: usize,
    /// Whether the site output directory exists
    pub site_built: bool,
    /// Every problem found
    pub issues: Vec<String>,
}

impl ProjectValidation {
    /// Returns `true` if no issue was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Checks that the core documents exist, the registry is populated, and
/// the site has been built.
#[must_use]
pub fn validate_project(
    config: &DocsConfig,
    store: &DocumentStore,
    registry: &TechniqueRegistry,
) -> ProjectValidation {
    let paths = &config.paths;
    let core = [
        &paths.index,
        &paths.techniques_doc,
        &paths.getting_started,
        &paths.catalog,
        &paths.readme,
        &config.site.config_file,
    ];

    let mut validation = ProjectValidation {
        technique_count: registry.len(),
        site_built: store.exists(&config.site.output_dir),
        ..ProjectValidation::default()
    };
    for path in core {
        let exists = store.exists(path);
        if !exists {
            validation
                .issues
                .push(format!("Missing file: {}", path.display()));
        }
        validation.files.push((path.clone(), exists));
    }
    if validation.technique_count == 0 {
        validation
            .issues
            .push("No techniques found in registry".to_string());
    }
    if !validation.site_built {
        validation
            .issues
            .push("Documentation site not built".to_string());
    }
    validation
}

/// Artifacts produced by the pipeline and removed by [`clean`].
#[must_use]
pub fn generated_artifacts(config: &DocsConfig) -> Vec<PathBuf> {
    let paths = &config.paths;
    let mut artifacts = vec![config.site.output_dir.clone(), paths.catalog.clone()];
    for category in &config.scripts.categories {
        artifacts.push(paths.benchmark_script(category));
        artifacts.push(paths.showcase_script(category));
        artifacts.push(paths.benchmark_results(category));
    }
    artifacts
}

/// Outcome of [`clean`].
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Artifacts that were removed or, in a dry run, would be
    pub removed: Vec<(PathBuf, RemoveStatus)>,
    /// Artifacts that could not be removed
    pub failures: Vec<FilesError>,
}

impl CleanReport {
    /// Returns `true` if every existing artifact was handled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Removes every generated artifact. Honors the store's dry-run flag.
#[must_use]
pub fn clean(config: &DocsConfig, store: &DocumentStore) -> CleanReport {
    let mut report = CleanReport::default();
    for artifact in generated_artifacts(config) {
        match store.remove(&artifact) {
            Ok(RemoveStatus::Absent) => debug!("{} not present", artifact.display()),
            Ok(status) => report.removed.push((artifact, status)),
            Err(e) => report.failures.push(e),
        }
    }
    info!("Cleaned {} generated artifacts", report.removed.len());
    report
}

/// One generated benchmark program run.
#[derive(Debug)]
pub struct BenchmarkRun {
    /// Category the program covers
    pub category: String,
    /// Tool output, or why the run failed
    pub outcome: Result<ToolOutput>,
    /// Results record the program wrote, if readable
    pub report: Option<BenchmarkReport>,
}

/// Runs the generated benchmark program of every configured category.
///
/// Each program is run with the configured runner prefix followed by the
/// program's file stem, e.g. `cargo run --quiet --example
/// chunking_benchmark_auto`.
#[must_use]
pub fn run_benchmarks(config: &DocsConfig, root: &Path) -> Vec<BenchmarkRun> {
    config
        .scripts
        .categories
        .iter()
        .map(|category| {
            let outcome = run_benchmark(config, root, category);
            let report = outcome
                .as_ref()
                .ok()
                .and_then(|_| read_results(&root.join(config.paths.benchmark_results(category))));
            BenchmarkRun {
                category: category.clone(),
                outcome,
                report,
            }
        })
        .collect()
}

fn run_benchmark(config: &DocsConfig, root: &Path, category: &str) -> Result<ToolOutput> {
    let script = config.paths.benchmark_script(category);
    if !root.join(&script).exists() {
        return Err(Error::ValidationFailed {
            issues: vec![format!(
                "{} has not been generated; run `update` first",
                script.display()
            )],
        });
    }

    let Some((program, prefix)) = config.scripts.runner.split_first() else {
        return Err(Error::ConfigError {
            message: "scripts.runner is empty".to_string(),
        });
    };
    let stem = script
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut args = prefix.to_vec();
    args.push(stem);

    info!("Running {category} benchmark");
    run_tool(program, &args, root)
}

fn read_results(path: &Path) -> Option<BenchmarkReport> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content)
        .inspect_err(|e| debug!("Unreadable results in {}: {e}", path.display()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_count_html_pages_recurses() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("site/techniques")).unwrap();
        fs::write(dir.path().join("site/index.html"), "").unwrap();
        fs::write(dir.path().join("site/techniques/index.html"), "").unwrap();
        fs::write(dir.path().join("site/style.css"), "").unwrap();

        assert_eq!(count_html_pages(&dir.path().join("site")), 2);
        assert_eq!(count_html_pages(&dir.path().join("missing")), 0);
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path(), false);
        let validation =
            validate_project(&DocsConfig::default(), &store, &TechniqueRegistry::new());

        assert!(!validation.is_valid());
        assert_eq!(validation.files.len(), 6);
        assert!(validation.issues.iter().any(|i| i == "Missing file: README.md"));
        assert!(validation.issues.iter().any(|i| i == "No techniques found in registry"));
        assert!(validation.issues.iter().any(|i| i == "Documentation site not built"));
    }

    #[test]
    fn test_clean_honors_dry_run() {
        let dir = TempDir::new().unwrap();
        let config = DocsConfig::default();
        fs::create_dir_all(dir.path().join("site")).unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/techniques_generated.md"), "# T\n").unwrap();

        let planned = clean(&config, &DocumentStore::new(dir.path(), true));
        assert_eq!(planned.removed.len(), 2);
        assert!(dir.path().join("site").exists());

        let done = clean(&config, &DocumentStore::new(dir.path(), false));
        assert!(done.is_success());
        assert!(done.removed.iter().all(|(_, status)| *status == RemoveStatus::Removed));
        assert!(!dir.path().join("docs/techniques_generated.md").exists());
    }

    #[test]
    fn test_benchmark_requires_generated_program() {
        let dir = TempDir::new().unwrap();
        let runs = run_benchmarks(&DocsConfig::default(), dir.path());

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].category, "chunking");
        assert!(runs[0].outcome.is_err());
        assert!(runs[0].report.is_none());
    }

    #[test]
    fn test_read_results_parses_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, BenchmarkReport::new(0).to_json_pretty().unwrap()).unwrap();

        assert_eq!(read_results(&path).unwrap().total_techniques, 0);
        assert!(read_results(&dir.path().join("missing.json")).is_none());
    }
}
