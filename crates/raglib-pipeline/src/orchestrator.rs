//! The staged documentation pipeline.

use crate::changelog::ChangeLog;
use crate::project::count_html_pages;
use crate::report::{RunReport, RunStatus, TechniqueSummary};
use crate::site::SiteBuilder;
use crate::stage::Stage;
use raglib_codegen::scripts::parse_path;
use raglib_codegen::{
    Anchor, CatalogGenerator, ExampleScriptGenerator, PatchOutcome, SectionPatcher,
    SectionRenderer, insert_section,
};
use raglib_core::config::{DocsConfig, PatchTarget, SectionKind};
use raglib_core::{Error, Result};
use raglib_files::DocumentStore;
use raglib_introspector::{CatalogSnapshot, TechniqueIntrospector};
use raglib_registry::TechniqueRegistry;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Run-wide switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Compute every mutation without performing it
    pub dry_run: bool,
    /// Log extra detail such as site-builder output
    pub verbose: bool,
}

/// Sequences the documentation stages against one registry.
///
/// Stages run strictly in [`Stage::ALL`] order. Only an empty registry at
/// [`Stage::Discover`] stops a run; every other failure is recorded in the
/// [`ChangeLog`] and the next stage runs. All writes go through one
/// [`DocumentStore`] whose dry-run flag is fixed at construction.
///
/// # Examples
///
/// ```
/// use raglib_core::DocsConfig;
/// use raglib_core::config::SiteConfig;
/// use raglib_pipeline::{MkDocs, PipelineOptions, PipelineOrchestrator, RunStatus, Stage};
/// use raglib_registry::TechniqueRegistry;
///
/// let registry = TechniqueRegistry::new();
/// let config = DocsConfig::default();
/// let dir = tempfile::TempDir::new().unwrap();
///
/// let pipeline = PipelineOrchestrator::new(
///     &registry,
///     &config,
///     dir.path(),
///     MkDocs::from_config(&SiteConfig::default()),
///     PipelineOptions::default(),
/// );
/// let report = pipeline.run();
///
/// assert!(matches!(report.status, RunStatus::Failed { stage: Stage::Discover, .. }));
/// assert_eq!(report.attempted, [Stage::Discover]);
/// ```
pub struct PipelineOrchestrator<'a, S> {
    registry: &'a TechniqueRegistry,
    config: &'a DocsConfig,
    store: DocumentStore,
    site: S,
    introspector: TechniqueIntrospector,
    options: PipelineOptions,
}

impl<S> fmt::Debug for PipelineOrchestrator<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("root", &self.store.root())
            .field("techniques", &self.registry.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, S: SiteBuilder> PipelineOrchestrator<'a, S> {
    /// Creates a pipeline for the project at `root`.
    pub fn new(
        registry: &'a TechniqueRegistry,
        config: &'a DocsConfig,
        root: impl Into<PathBuf>,
        site: S,
        options: PipelineOptions,
    ) -> Self {
        Self {
            registry,
            config,
            store: DocumentStore::new(root, options.dry_run),
            site,
            introspector: TechniqueIntrospector::new(),
            options,
        }
    }

    /// The write gate shared by every stage.
    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The site builder.
    #[must_use]
    pub const fn site(&self) -> &S {
        &self.site
    }

    /// Runs every stage.
    #[must_use]
    pub fn run(&self) -> RunReport {
        self.run_stages(&Stage::ALL)
    }

    /// Runs the selected stages in pipeline order.
    ///
    /// Without [`Stage::Discover`] an empty registry is not fatal and the
    /// catalog renders its placeholder. Without [`Stage::Validate`] the run
    /// fails at the first stage that recorded an error.
    #[must_use]
    pub fn run_stages(&self, stages: &[Stage]) -> RunReport {
        let snapshot = CatalogSnapshot::capture(
            self.registry,
            &self.introspector,
            &self.config.catalog.category_order,
        );
        let mut log = ChangeLog::new();
        let mut attempted = Vec::new();
        let mut techniques = None;
        let mut validation = None;

        for stage in Stage::ALL.into_iter().filter(|stage| stages.contains(stage)) {
            attempted.push(stage);
            debug!("Entering stage {stage}");
            match stage {
                Stage::Discover => {
                    if let Err(e) = Self::discover(&snapshot) {
                        return RunReport {
                            status: RunStatus::Failed {
                                stage,
                                reason: e.to_string(),
                            },
                            attempted,
                            log,
                            dry_run: self.options.dry_run,
                            techniques: None,
                        };
                    }
                    techniques = Some(TechniqueSummary::from_snapshot(&snapshot));
                }
                Stage::PatchDocs => self.patch_docs(&snapshot, &mut log),
                Stage::RegenerateCatalog => self.regenerate_catalog(&snapshot, &mut log),
                Stage::GenerateExamples => self.generate_examples(&snapshot, &mut log),
                Stage::BuildSite => {
                    let required = stages.iter().all(|selected| *selected == Stage::BuildSite);
                    self.build_site(required, &mut log);
                }
                Stage::Validate => validation = Some(self.validate(&snapshot, &log)),
            }
        }

        let status = match validation {
            Some(issues) if issues.is_empty() => RunStatus::Success,
            Some(issues) => RunStatus::Failed {
                stage: Stage::Validate,
                reason: issues.join("; "),
            },
            None => log
                .first_error()
                .map_or(RunStatus::Success, |warning| RunStatus::Failed {
                    stage: warning.stage,
                    reason: warning.message.clone(),
                }),
        };

        RunReport {
            status,
            attempted,
            log,
            dry_run: self.options.dry_run,
            techniques,
        }
    }

    fn discover(snapshot: &CatalogSnapshot) -> Result<()> {
        if snapshot.is_empty() {
            return Err(Error::FatalDiscovery {
                message: "No techniques found in registry".to_string(),
            });
        }
        info!(
            "Found {} techniques in {} categories",
            snapshot.total_techniques,
            snapshot.total_categories()
        );
        for group in &snapshot.groups {
            debug!("{}: {} techniques", group.category, group.techniques.len());
        }
        Ok(())
    }

    fn patch_docs(&self, snapshot: &CatalogSnapshot, log: &mut ChangeLog) {
        let renderer = match SectionRenderer::new() {
            Ok(renderer) => renderer,
            Err(e) => {
                log.error(Stage::PatchDocs, &e);
                return;
            }
        };

        for target in &self.config.patches {
            if let Err(e) = self.patch_target(target, snapshot, &renderer, log) {
                log.error(Stage::PatchDocs, &e);
            }
        }

        if self.config.guide.enabled
            && let Err(e) = self.insert_guide(snapshot, &renderer, log)
        {
            log.error(Stage::PatchDocs, &e);
        }
    }

    fn patch_target(
        &self,
        target: &PatchTarget,
        snapshot: &CatalogSnapshot,
        renderer: &SectionRenderer<'_>,
        log: &mut ChangeLog,
    ) -> Result<()> {
        let techniques = snapshot.category(&target.category);
        if techniques.is_empty() {
            debug!(
                "No '{}' techniques, leaving {} alone",
                target.category,
                target.document.display()
            );
            return Ok(());
        }
        let Some(document) = self.read_optional(&target.document, log)? else {
            return Ok(());
        };

        let body = match target.kind {
            SectionKind::TechniqueList => renderer.technique_list(techniques)?,
            SectionKind::ReadmeList => renderer.readme_list(techniques)?,
        };
        let patcher = section_patcher(target)?;

        match patcher.apply(&document, &body) {
            PatchOutcome::Replaced(patched) => self.write(
                Stage::PatchDocs,
                &target.document,
                &patched,
                format!(
                    "Updated section '{}' in {}",
                    target.name,
                    target.document.display()
                ),
                log,
            ),
            PatchOutcome::Unchanged => {
                debug!("Section '{}' already up to date", target.name);
            }
            PatchOutcome::Skipped(reason) => {
                debug!("{reason}");
                let anchors: Vec<String> =
                    patcher.anchors().iter().map(ToString::to_string).collect();
                let skipped = Error::PatchSkipped {
                    document: target.document.display().to_string(),
                    anchor: anchors.join(" or "),
                };
                log.skip(Stage::PatchDocs, skipped.to_string());
            }
        }
        Ok(())
    }

    fn insert_guide(
        &self,
        snapshot: &CatalogSnapshot,
        renderer: &SectionRenderer<'_>,
        log: &mut ChangeLog,
    ) -> Result<()> {
        let guide = &self.config.guide;
        let techniques = snapshot.category(&guide.category);
        if techniques.is_empty() {
            return Ok(());
        }
        let path = &self.config.paths.getting_started;
        let Some(document) = self.read_optional(path, log)? else {
            return Ok(());
        };

        let registration_fn = parse_path(&self.config.scripts.registration_fn).map_err(|e| {
            Error::ConfigError {
                message: format!("scripts.registration_fn is not a Rust path: {e}"),
            }
        })?;
        let before = Regex::new(&guide.insert_before).map_err(|e| Error::ConfigError {
            message: format!("Invalid guide.insert_before pattern: {e}"),
        })?;
        let section =
            renderer.guide(&guide.heading, &guide.category, &registration_fn, techniques)?;

        match insert_section(&document, &guide.heading, &before, &section) {
            PatchOutcome::Replaced(patched) => self.write(
                Stage::PatchDocs,
                path,
                &patched,
                format!("Added '{}' to {}", guide.heading, path.display()),
                log,
            ),
            PatchOutcome::Unchanged => debug!("Guide section already present"),
            PatchOutcome::Skipped(reason) => log.skip(
                Stage::PatchDocs,
                format!("Guide not inserted into {}: {reason}", path.display()),
            ),
        }
        Ok(())
    }

    fn regenerate_catalog(&self, snapshot: &CatalogSnapshot, log: &mut ChangeLog) {
        let path = &self.config.paths.catalog;
        let rendered = CatalogGenerator::new(self.config.catalog.clone())
            .and_then(|generator| generator.render(snapshot));
        match rendered {
            Ok(markdown) => self.write(
                Stage::RegenerateCatalog,
                path,
                &markdown,
                format!(
                    "Regenerated {} ({} techniques)",
                    path.display(),
                    snapshot.total_techniques
                ),
                log,
            ),
            Err(e) => log.error(Stage::RegenerateCatalog, &e),
        }
    }

    fn generate_examples(&self, snapshot: &CatalogSnapshot, log: &mut ChangeLog) {
        let generator = match ExampleScriptGenerator::new(
            &self.config.scripts,
            self.config.showcase.overrides.clone(),
        ) {
            Ok(generator) => generator,
            Err(e) => {
                log.error(Stage::GenerateExamples, &e);
                return;
            }
        };

        let paths = &self.config.paths;
        for category in &self.config.scripts.categories {
            let techniques = snapshot.category(category);
            if techniques.is_empty() {
                log.skip(
                    Stage::GenerateExamples,
                    format!("No '{category}' techniques registered, skipping example programs"),
                );
                continue;
            }

            let results = paths.benchmark_results(category).display().to_string();
            match generator.benchmark(category, techniques, &results) {
                Ok(script) => self.write(
                    Stage::GenerateExamples,
                    &paths.benchmark_script(category),
                    &script.source,
                    format!(
                        "Generated {category} benchmark ({} techniques)",
                        script.technique_count
                    ),
                    log,
                ),
                Err(e) => log.error(Stage::GenerateExamples, &e),
            }
            match generator.showcase(category, techniques) {
                Ok(script) => self.write(
                    Stage::GenerateExamples,
                    &paths.showcase_script(category),
                    &script.source,
                    format!(
                        "Generated {category} showcase ({} techniques)",
                        script.technique_count
                    ),
                    log,
                ),
                Err(e) => log.error(Stage::GenerateExamples, &e),
            }
        }
    }

    /// A missing site config is only a skip when other stages run alongside;
    /// a site build requested on its own fails.
    fn build_site(&self, required: bool, log: &mut ChangeLog) {
        let site = &self.config.site;
        if !self.store.exists(&site.config_file) {
            if required {
                log.error(
                    Stage::BuildSite,
                    &Error::ExternalToolError {
                        tool: site.command.clone(),
                        message: format!("{} not found", site.config_file.display()),
                    },
                );
            } else {
                log.skip(
                    Stage::BuildSite,
                    format!("{} not found, skipping site build", site.config_file.display()),
                );
            }
            return;
        }
        if self.options.dry_run {
            log.planned(
                Stage::BuildSite,
                "Build documentation site",
                Some(site.output_dir.clone()),
            );
            return;
        }

        match self.site.build(self.store.root()) {
            Ok(output) => {
                if self.options.verbose && !output.stdout.trim().is_empty() {
                    info!("{}", output.stdout.trim());
                }
                let pages = count_html_pages(&self.store.root().join(&site.output_dir));
                log.applied(
                    Stage::BuildSite,
                    format!("Built documentation site ({pages} HTML pages)"),
                    Some(site.output_dir.clone()),
                );
            }
            Err(e) => log.error(Stage::BuildSite, &e),
        }
    }

    /// Issues found after the run; empty means success.
    fn validate(&self, snapshot: &CatalogSnapshot, log: &ChangeLog) -> Vec<String> {
        let present = |path: &Path| self.store.exists(path) || log.is_planned(path);
        let mut issues = Vec::new();

        if self.registry.is_empty() {
            issues.push("No techniques found in registry".to_string());
        }

        let paths = &self.config.paths;
        let mut required = vec![paths.catalog.clone()];
        for category in &self.config.scripts.categories {
            if !snapshot.category(category).is_empty() {
                required.push(paths.benchmark_script(category));
                required.push(paths.showcase_script(category));
            }
        }
        if self.store.exists(&self.config.site.config_file) {
            required.push(self.config.site.output_dir.clone());
        }

        for path in required {
            if !present(&path) {
                issues.push(format!("Missing generated artifact: {}", path.display()));
            }
        }

        if issues.is_empty() {
            info!("All validations passed");
        }
        issues
    }

    fn read_optional(&self, path: &Path, log: &mut ChangeLog) -> Result<Option<String>> {
        match self.store.read(path) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.is_not_found() => {
                log.skip(
                    Stage::PatchDocs,
                    format!("{} not found, skipping", path.display()),
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(
        &self,
        stage: Stage,
        path: &Path,
        content: &str,
        description: String,
        log: &mut ChangeLog,
    ) {
        match self.store.write_if_changed(path, content) {
            Ok(status) => log.record_write(stage, path, status, description),
            Err(e) => {
                let error = Error::from(e);
                log.record_failure(stage, description, Some(path.to_path_buf()), &error);
            }
        }
    }
}

/// Sentinel anchor first, heading anchors as fallback.
fn section_patcher(target: &PatchTarget) -> Result<SectionPatcher> {
    let patcher = SectionPatcher::new(Anchor::sentinel(&target.name));
    match (&target.start, &target.stop) {
        (Some(start), Some(stop)) => Ok(patcher.with_fallback(Anchor::heading(start, stop)?)),
        (Some(start), None) => Ok(patcher.with_fallback(Anchor::heading(start, "^#+ ")?)),
        _ => Ok(patcher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::ChangeKind;
    use crate::site::{MockSiteBuilder, ToolOutput};
    use raglib_core::config::TechniqueSpec;
    use raglib_registry::register_manifest;
    use std::fs;
    use tempfile::TempDir;

    fn spec(name: &str, category: &str, identifier: &str) -> TechniqueSpec {
        TechniqueSpec {
            name: name.to_string(),
            category: category.to_string(),
            description: format!("{identifier} technique"),
            version: "1.0.0".to_string(),
            dependencies: vec![],
            identifier: identifier.to_string(),
            module: "raglib::techniques".to_string(),
            parameters: vec!["chunk_size".to_string()],
            docs: None,
        }
    }

    fn registry() -> TechniqueRegistry {
        let registry = TechniqueRegistry::new();
        register_manifest(
            &registry,
            &[
                spec("fixed_size_chunker", "chunking", "FixedSizeChunker"),
                spec("bm25", "retrieval", "Bm25"),
            ],
        )
        .unwrap();
        registry
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(
            dir.path().join("docs/techniques.md"),
            "# Techniques\n\n### Chunking Techniques\n\nstale\n\n### Retrieval Techniques\n",
        )
        .unwrap();
        fs::write(dir.path().join("mkdocs.yml"), "site_name: RAGLib\n").unwrap();
        dir
    }

    fn site_writing_pages(root: &Path) -> MockSiteBuilder {
        let site_dir = root.join("site");
        let mut site = MockSiteBuilder::new();
        site.expect_build().times(1).returning(move |_| {
            fs::create_dir_all(&site_dir).unwrap();
            fs::write(site_dir.join("index.html"), "<html>").unwrap();
            Ok(ToolOutput::default())
        });
        site
    }

    fn run(registry: &TechniqueRegistry, root: &Path, site: MockSiteBuilder) -> RunReport {
        let config = DocsConfig::default();
        PipelineOrchestrator::new(registry, &config, root, site, PipelineOptions::default()).run()
    }

    #[test]
    fn test_empty_registry_fails_at_discover() {
        let dir = project();
        let mut site = MockSiteBuilder::new();
        site.expect_build().never();

        let report = run(&TechniqueRegistry::new(), dir.path(), site);

        assert_eq!(report.attempted, [Stage::Discover]);
        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: Stage::Discover, ref reason }
                if reason.contains("No techniques found")
        ));
        assert!(report.log.changes().is_empty());
    }

    #[test]
    fn test_full_run_succeeds() {
        let dir = project();
        let report = run(&registry(), dir.path(), site_writing_pages(dir.path()));

        assert!(report.is_success(), "{:?}", report.status);
        assert_eq!(report.attempted, Stage::ALL);
        assert!(dir.path().join("docs/techniques_generated.md").exists());
        assert!(dir.path().join("examples/chunking_benchmark_auto.rs").exists());
        let techniques = fs::read_to_string(dir.path().join("docs/techniques.md")).unwrap();
        assert!(techniques.contains("#### FixedSizeChunker"));
        assert!(!techniques.contains("stale"));
        assert!(
            report
                .log
                .changes()
                .iter()
                .any(|c| c.description == "Built documentation site (1 HTML pages)")
        );
    }

    #[test]
    fn test_second_run_records_only_site_build() {
        let registry = registry();
        let dir = project();

        let first = run(&registry, dir.path(), site_writing_pages(dir.path()));
        assert!(first.is_success());

        let second = run(&registry, dir.path(), site_writing_pages(dir.path()));
        let stages: Vec<Stage> = second.log.changes().iter().map(|c| c.stage).collect();
        assert_eq!(stages, [Stage::BuildSite]);
    }

    #[test]
    fn test_dry_run_plans_without_writing() {
        let registry = registry();
        let config = DocsConfig::default();
        let dir = project();
        let before = fs::read_to_string(dir.path().join("docs/techniques.md")).unwrap();
        let mut site = MockSiteBuilder::new();
        site.expect_build().never();

        let options = PipelineOptions {
            dry_run: true,
            verbose: false,
        };
        let report = PipelineOrchestrator::new(&registry, &config, dir.path(), site, options).run();

        assert!(report.is_success(), "{:?}", report.status);
        assert!(report.dry_run);
        assert!(report.log.changes().iter().all(|c| c.kind == ChangeKind::Planned));
        assert!(!dir.path().join("docs/techniques_generated.md").exists());
        assert!(!dir.path().join("examples").exists());
        assert_eq!(fs::read_to_string(dir.path().join("docs/techniques.md")).unwrap(), before);
    }

    #[test]
    fn test_site_failure_is_recorded_and_fails_validation() {
        let dir = project();
        let mut site = MockSiteBuilder::new();
        site.expect_build().times(1).returning(|_| {
            Err(Error::ExternalToolError {
                tool: "mkdocs".to_string(),
                message: "exited with exit status: 1".to_string(),
            })
        });

        let report = run(&registry(), dir.path(), site);

        assert_eq!(report.attempted, Stage::ALL);
        assert!(report.log.warnings().iter().any(|w| w.stage == Stage::BuildSite));
        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: Stage::Validate, ref reason } if reason.contains("site")
        ));
        assert!(dir.path().join("docs/techniques_generated.md").exists());
    }

    #[test]
    fn test_site_build_alone_requires_site_config() {
        let registry = registry();
        let config = DocsConfig::default();
        let dir = project();
        fs::remove_file(dir.path().join("mkdocs.yml")).unwrap();
        let mut site = MockSiteBuilder::new();
        site.expect_build().never();

        let report = PipelineOrchestrator::new(
            &registry,
            &config,
            dir.path(),
            site,
            PipelineOptions::default(),
        )
        .run_stages(&[Stage::BuildSite]);

        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: Stage::BuildSite, ref reason }
                if reason.contains("mkdocs.yml not found")
        ));
    }

    #[test]
    fn test_full_run_skips_site_without_config() {
        let dir = project();
        fs::remove_file(dir.path().join("mkdocs.yml")).unwrap();
        let mut site = MockSiteBuilder::new();
        site.expect_build().never();

        let report = run(&registry(), dir.path(), site);

        assert!(report.is_success(), "{:?}", report.status);
        assert!(
            report
                .log
                .warnings()
                .iter()
                .any(|w| w.stage == Stage::BuildSite && w.message.contains("skipping site build"))
        );
    }

    #[test]
    fn test_missing_anchor_is_warning_only() {
        let dir = project();
        fs::write(dir.path().join("README.md"), "# RAGLib\n\nNo sections here.\n").unwrap();

        let report = run(&registry(), dir.path(), site_writing_pages(dir.path()));

        assert!(report.is_success());
        assert!(
            report
                .log
                .warnings()
                .iter()
                .any(|w| w.stage == Stage::PatchDocs && w.message.contains("README.md"))
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "# RAGLib\n\nNo sections here.\n"
        );
    }

    #[test]
    fn test_catalog_only_run_with_empty_registry() {
        let registry = TechniqueRegistry::new();
        let config = DocsConfig::default();
        let dir = project();

        let pipeline = PipelineOrchestrator::new(
            &registry,
            &config,
            dir.path(),
            MockSiteBuilder::new(),
            PipelineOptions::default(),
        );
        let report = pipeline.run_stages(&[Stage::RegenerateCatalog]);

        assert!(report.is_success());
        let catalog = fs::read_to_string(dir.path().join("docs/techniques_generated.md")).unwrap();
        assert!(catalog.contains("**Total Techniques:** 0"));
    }
}
