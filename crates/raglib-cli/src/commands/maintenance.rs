//! Project housekeeping: `validate`, `clean`, and `benchmark`.

use super::Project;
use crate::formatters::{benchmark_summary, clean_summary, validation_summary};
use colored::Colorize;
use raglib_core::cli::ExitCode;
use raglib_pipeline::project::{clean as clean_artifacts, run_benchmarks, validate_project};

/// Checks that the core documents exist, the registry is populated, and the
/// site has been built.
#[must_use]
pub fn validate(project: &Project) -> ExitCode {
    let validation = validate_project(&project.config, &project.store(), &project.registry);
    println!("{}", validation_summary(&validation));
    ExitCode::from_success(validation.is_valid())
}

/// Removes every generated artifact.
#[must_use]
pub fn clean(project: &Project) -> ExitCode {
    let report = clean_artifacts(&project.config, &project.store());
    println!("{}", clean_summary(&report, project.options.dry_run));
    ExitCode::from_success(report.is_success())
}

/// Runs the generated benchmark programs. A dry run lists them instead.
#[must_use]
pub fn benchmark(project: &Project) -> ExitCode {
    if project.options.dry_run {
        for category in &project.config.scripts.categories {
            let script = project.config.paths.benchmark_script(category);
            println!("{} Would run {}", "○".yellow().bold(), script.display());
        }
        return ExitCode::SUCCESS;
    }

    let runs = run_benchmarks(&project.config, &project.root);
    println!("{}", benchmark_summary(&runs));
    ExitCode::from_success(runs.iter().all(|run| run.outcome.is_ok()))
}
