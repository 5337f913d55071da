//! Command implementations for the `raglib-docs` CLI.
//!
//! Every command loads the same [`Project`]: the configuration, the
//! registry populated from the technique manifest, and the run options.

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use raglib_core::DocsConfig;
use raglib_core::cli::{ExitCode, ServePort};
use raglib_files::DocumentStore;
use raglib_pipeline::{MkDocs, PipelineOptions, PipelineOrchestrator};
use raglib_registry::{TechniqueRegistry, register_manifest};
use std::path::PathBuf;
use tracing::{debug, info};

pub mod full;
pub mod pipeline;
pub mod maintenance;

/// Everything a command needs about the project being documented.
#[derive(Debug)]
pub struct Project {
    /// Project root
    pub root: PathBuf,
    /// Loaded configuration
    pub config: DocsConfig,
    /// Registry populated from `[[techniques]]`
    pub registry: TechniqueRegistry,
    /// Run-wide switches
    pub options: PipelineOptions,
    /// Port used by `serve`
    pub port: ServePort,
}

impl Project {
    /// Loads the project selected by the command-line flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed or a declared
    /// technique is invalid.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config_path();
        let config = DocsConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        Self::from_config(cli, config)
    }

    /// Builds a project from an already loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared technique is invalid.
    pub fn from_config(cli: &Cli, config: DocsConfig) -> Result<Self> {
        let registry = TechniqueRegistry::new();
        let added = register_manifest(&registry, &config.techniques)
            .context("Failed to register declared techniques")?;
        debug!("Registered {added} techniques from the manifest");

        Ok(Self {
            root: cli.root.clone(),
            config,
            registry,
            options: PipelineOptions {
                dry_run: cli.dry_run,
                verbose: cli.verbose,
            },
            port: cli.port,
        })
    }

    /// A pipeline over this project using `mkdocs` as the site builder.
    #[must_use]
    pub fn pipeline(&self) -> PipelineOrchestrator<'_, MkDocs> {
        PipelineOrchestrator::new(
            &self.registry,
            &self.config,
            self.root.clone(),
            MkDocs::from_config(&self.config.site),
            self.options,
        )
    }

    /// A document store rooted at the project, honoring `--dry-run`.
    #[must_use]
    pub fn store(&self) -> DocumentStore {
        DocumentStore::new(self.root.clone(), self.options.dry_run)
    }
}

/// Executes `command` against `project`.
///
/// # Errors
///
/// Returns an error only for failures outside the pipeline's own reporting,
/// such as a site server that cannot be started.
pub fn execute(command: Commands, project: &Project) -> Result<ExitCode> {
    info!("Running {command:?} in {}", project.root.display());
    match command {
        Commands::Update => Ok(pipeline::update(project)),
        Commands::Generate => Ok(pipeline::generate(project)),
        Commands::Build => Ok(pipeline::build(project)),
        Commands::Serve => pipeline::serve(project),
        Commands::Validate => Ok(maintenance::validate(project)),
        Commands::Clean => Ok(maintenance::clean(project)),
        Commands::Benchmark => Ok(maintenance::benchmark(project)),
        Commands::Full => Ok(full::run(project)),
    }
}
