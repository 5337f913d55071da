//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use raglib_core::cli::ServePort;
use raglib_core::config::CONFIG_FILE_NAME;
use std::path::PathBuf;

/// RAGLib documentation tooling.
///
/// Keeps the catalog, README, guides, example programs, and documentation
/// site in sync with the techniques registered in the project.
#[derive(Parser, Debug)]
#[command(name = "raglib-docs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show what would change without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Port used by `serve`
    #[arg(long, global = true, default_value = "8000", env = "RAGLIB_DOCS_PORT")]
    pub port: ServePort,

    /// Project root
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: <root>/raglib-docs.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolved configuration file path.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(CONFIG_FILE_NAME))
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the full documentation pipeline.
    ///
    /// Patches anchored sections, regenerates the catalog, writes the
    /// example programs, builds the site, and validates the result.
    Update,

    /// Regenerate the technique catalog only.
    Generate,

    /// Run the generated benchmark programs.
    Benchmark,

    /// Build the documentation site.
    Build,

    /// Build the documentation site and serve it locally.
    ///
    /// # Examples
    ///
    /// ```bash
    /// raglib-docs serve --port 9000
    /// ```
    Serve,

    /// Check that the project documentation is complete.
    Validate,

    /// Remove every generated artifact.
    Clean,

    /// Clean, update, generate, build, and validate, stopping at the first
    /// failing step.
    Full,
}
