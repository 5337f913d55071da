//! RAGLib documentation CLI.
//!
//! Keeps the technique catalog, README, guides, example programs, and the
//! documentation site in sync with the registered techniques.
//!
//! # Examples
//!
//! ```bash
//! # Run the whole pipeline
//! raglib-docs update
//!
//! # See what would change
//! raglib-docs update --dry-run
//!
//! # Preview the site
//! raglib-docs serve --port 9000
//! ```

use anyhow::Result;
use clap::Parser;
use raglib_cli::{Cli, Project, execute};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let project = Project::load(&cli)?;
    let exit_code = execute(cli.command, &project)?;

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr; stdout is reserved for the summary.
///
/// `--verbose` forces debug level, otherwise `RUST_LOG` or `info` applies.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
