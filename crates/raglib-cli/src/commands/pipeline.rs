//! Commands backed by the staged pipeline: `update`, `generate`, `build`,
//! and `serve`.

use super::Project;
use crate::formatters::run_summary;
use anyhow::{Context, Result};
use colored::Colorize;
use raglib_core::cli::ExitCode;
use raglib_pipeline::{RunReport, SiteBuilder, Stage};
use tracing::info;

fn finish(title: &str, project: &Project, report: &RunReport) -> ExitCode {
    println!("{}", run_summary(title, report, project.options.verbose));
    ExitCode::from_success(report.is_success())
}

/// Runs every pipeline stage.
#[must_use]
pub fn update(project: &Project) -> ExitCode {
    let report = project.pipeline().run();
    finish("Documentation Update", project, &report)
}

/// Regenerates the technique catalog only.
///
/// An empty registry is not an error here; the catalog renders a
/// placeholder explaining how to register techniques.
#[must_use]
pub fn generate(project: &Project) -> ExitCode {
    let report = project.pipeline().run_stages(&[Stage::RegenerateCatalog]);
    finish("Catalog Generation", project, &report)
}

/// Builds the documentation site.
#[must_use]
pub fn build(project: &Project) -> ExitCode {
    let report = project.pipeline().run_stages(&[Stage::BuildSite]);
    finish("Site Build", project, &report)
}

/// Builds the site, then serves it until interrupted.
///
/// # Errors
///
/// Returns an error if the site server cannot be started or exits with a
/// failure.
pub fn serve(project: &Project) -> Result<ExitCode> {
    let pipeline = project.pipeline();
    let report = pipeline.run_stages(&[Stage::BuildSite]);
    let code = finish("Site Build", project, &report);
    if !code.is_success() {
        return Ok(code);
    }

    let address = format!("http://{}", project.port.dev_addr());
    if project.options.dry_run {
        println!("{} Would serve the site at {address}", "○".yellow().bold());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} Serving the site at {address}", "→".cyan().bold());
    info!("Serving on port {}", project.port);
    pipeline
        .site()
        .serve(&project.root, project.port)
        .context("Documentation server stopped with an error")?;
    Ok(ExitCode::SUCCESS)
}
