//! Human-readable summaries printed to stdout after each command.
//!
//! Every formatter returns a `String` so the output can be tested without a
//! terminal. Colors follow `colored`'s global override.

use colored::Colorize;
use raglib_files::RemoveStatus;
use raglib_pipeline::project::{BenchmarkRun, CleanReport, ProjectValidation};
use raglib_pipeline::{ChangeKind, RunReport, RunStatus, TechniqueSummary, WarningKind};

const RULE_WIDTH: usize = 50;

fn heading(title: &str) -> String {
    format!("{}\n{}\n", title.bold().cyan(), "─".repeat(RULE_WIDTH))
}

fn dry_run_marker() -> String {
    format!("\n{}\n", "Dry run: no files were modified".yellow())
}

/// Formats the outcome of a pipeline run.
///
/// # Examples
///
/// ```
/// use raglib_cli::formatters::run_summary;
/// use raglib_pipeline::{ChangeLog, RunReport, RunStatus};
///
/// colored::control::set_override(false);
/// let report = RunReport {
///     status: RunStatus::Success,
///     attempted: vec![],
///     log: ChangeLog::new(),
///     dry_run: true,
///     techniques: None,
/// };
///
/// let output = run_summary("Update", &report, false);
/// assert!(output.contains("No changes"));
/// assert!(output.contains("no files were modified"));
/// ```
#[must_use]
pub fn run_summary(title: &str, report: &RunReport, verbose: bool) -> String {
    let mut out = heading(title);

    if let Some(techniques) = &report.techniques {
        out.push_str(&technique_summary(techniques, verbose));
    }

    let changes = report.log.changes();
    if changes.is_empty() {
        out.push_str(&format!("{}\n", "No changes".dimmed()));
    } else {
        out.push_str(&format!("\n{}\n", "Changes:".bold()));
        for change in changes {
            let marker = match change.kind {
                ChangeKind::Applied => "✓".green().bold(),
                ChangeKind::Planned => "○".yellow().bold(),
                ChangeKind::Failed => "✗".red().bold(),
            };
            out.push_str(&format!(
                "  {marker} [{}] {}\n",
                change.stage,
                change.description
            ));
        }
    }

    let warnings = report.log.warnings();
    if !warnings.is_empty() {
        out.push_str(&format!("\n{}\n", "Warnings:".bold()));
        for warning in warnings {
            let marker = match warning.kind {
                WarningKind::Skipped => "!".yellow(),
                WarningKind::Error => "✗".red(),
            };
            out.push_str(&format!("  {marker} {warning}\n"));
        }
    }

    out.push('\n');
    match &report.status {
        RunStatus::Success => {
            out.push_str(&format!("{} {title} completed\n", "✓".green().bold()));
        }
        RunStatus::Failed { stage, reason } => {
            out.push_str(&format!(
                "{} {title} failed at {stage}: {reason}\n",
                "✗".red().bold()
            ));
        }
    }

    if report.dry_run {
        out.push_str(&dry_run_marker());
    }
    out
}

/// Formats technique totals, listing names per category when `verbose`.
#[must_use]
pub fn technique_summary(summary: &TechniqueSummary, verbose: bool) -> String {
    let mut out = format!(
        "{} {} in {} categories\n",
        "Techniques:".bold(),
        summary.total.to_string().green(),
        summary.categories.len()
    );
    for (category, names) in &summary.categories {
        out.push_str(&format!("  {category}: {}\n", names.len()));
        if verbose {
            for name in names {
                out.push_str(&format!("    {} {name}\n", "•".dimmed()));
            }
        }
    }
    out
}

/// Formats the result of `validate`.
#[must_use]
pub fn validation_summary(validation: &ProjectValidation) -> String {
    let mut out = heading("Project Validation");

    for (path, exists) in &validation.files {
        let marker = if *exists {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        out.push_str(&format!("  {marker} {}\n", path.display()));
    }
    out.push_str(&format!(
        "  {} techniques registered\n",
        validation.technique_count
    ));
    let site = if validation.site_built {
        "built".green()
    } else {
        "not built".red()
    };
    out.push_str(&format!("  site: {site}\n\n"));

    if validation.is_valid() {
        out.push_str(&format!("{} Project is valid\n", "✓".green().bold()));
    } else {
        out.push_str(&format!("{} Issues found:\n", "✗".red().bold()));
        for issue in &validation.issues {
            out.push_str(&format!("  {} {issue}\n", "•".red()));
        }
    }
    out
}

/// Formats the result of `clean`.
#[must_use]
pub fn clean_summary(report: &CleanReport, dry_run: bool) -> String {
    let mut out = heading("Clean");

    if report.removed.is_empty() && report.failures.is_empty() {
        out.push_str(&format!("{}\n", "Nothing to clean".dimmed()));
    }
    for (path, status) in &report.removed {
        let (marker, verb) = match status {
            RemoveStatus::WouldRemove => ("○".yellow().bold(), "would remove"),
            _ => ("✓".green().bold(), "removed"),
        };
        out.push_str(&format!("  {marker} {verb} {}\n", path.display()));
    }
    for failure in &report.failures {
        out.push_str(&format!("  {} {failure}\n", "✗".red().bold()));
    }

    if dry_run {
        out.push_str(&dry_run_marker());
    }
    out
}

/// Formats the results of `benchmark`.
#[must_use]
pub fn benchmark_summary(runs: &[BenchmarkRun]) -> String {
    let mut out = heading("Benchmarks");

    if runs.is_empty() {
        out.push_str(&format!("{}\n", "No benchmark categories configured".dimmed()));
    }
    for run in runs {
        match (&run.outcome, &run.report) {
            (Ok(_), Some(report)) => out.push_str(&format!(
                "  {} {}: {}/{} techniques succeeded, {:.1} chunks on average\n",
                "✓".green().bold(),
                run.category,
                report.successful(),
                report.total_techniques,
                report.average_chunk_count()
            )),
            (Ok(_), None) => out.push_str(&format!(
                "  {} {}: completed, no results recorded\n",
                "✓".green().bold(),
                run.category
            )),
            (Err(e), _) => out.push_str(&format!(
                "  {} {}: {e}\n",
                "✗".red().bold(),
                run.category
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use raglib_core::{BenchmarkReport, Error};
    use raglib_pipeline::{ChangeLog, Stage, ToolOutput};
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    fn report(status: RunStatus, log: ChangeLog, dry_run: bool) -> RunReport {
        RunReport {
            status,
            attempted: Stage::ALL.to_vec(),
            log,
            dry_run,
            techniques: Some(TechniqueSummary {
                total: 3,
                categories: vec![
                    (
                        "chunking".to_string(),
                        vec![
                            "fixed_size_chunker".to_string(),
                            "semantic_chunker".to_string(),
                        ],
                    ),
                    ("retrieval".to_string(), vec!["bm25".to_string()]),
                ],
            }),
        }
    }

    #[test]
    fn test_run_summary_lists_changes_and_warnings() {
        plain();
        let mut log = ChangeLog::new();
        log.applied(
            Stage::RegenerateCatalog,
            "Regenerated docs/techniques_generated.md",
            Some(PathBuf::from("docs/techniques_generated.md")),
        );
        log.skip(Stage::PatchDocs, "README.md: no anchor found");

        let output = run_summary("Update", &report(RunStatus::Success, log, false), false);

        assert!(output.contains("Techniques: 3 in 2 categories"));
        assert!(output.contains("  chunking: 2\n"));
        assert!(
            output.contains("✓ [regenerate-catalog] Regenerated docs/techniques_generated.md")
        );
        assert!(output.contains("! [patch-docs] README.md: no anchor found"));
        assert!(output.contains("✓ Update completed"));
        assert!(!output.contains("no files were modified"));
        assert!(!output.contains("semantic_chunker"));
    }

    #[test]
    fn test_run_summary_verbose_lists_names() {
        plain();
        let output = run_summary(
            "Update",
            &report(RunStatus::Success, ChangeLog::new(), false),
            true,
        );
        assert!(output.contains("    • semantic_chunker\n"));
        assert!(output.contains("    • bm25\n"));
    }

    #[test]
    fn test_run_summary_dry_run_and_failure() {
        plain();
        let mut log = ChangeLog::new();
        log.planned(Stage::BuildSite, "Build documentation site", Some(PathBuf::from("site")));
        let status = RunStatus::Failed {
            stage: Stage::Validate,
            reason: "Missing artifact: site".to_string(),
        };

        let output = run_summary("Update", &report(status, log, true), false);

        assert!(output.contains("○ [build-site] Build documentation site"));
        assert!(output.contains("✗ Update failed at validate: Missing artifact: site"));
        assert!(output.contains("Dry run: no files were modified"));
    }

    #[test]
    fn test_validation_summary() {
        plain();
        let validation = ProjectValidation {
            files: vec![
                (PathBuf::from("README.md"), true),
                (PathBuf::from("mkdocs.yml"), false),
            ],
            technique_count: 4,
            site_built: false,
            issues: vec!["Missing file: mkdocs.yml".to_string()],
        };

        let output = validation_summary(&validation);

        assert!(output.contains("✓ README.md"));
        assert!(output.contains("✗ mkdocs.yml"));
        assert!(output.contains("4 techniques registered"));
        assert!(output.contains("site: not built"));
        assert!(output.contains("• Missing file: mkdocs.yml"));
    }

    #[test]
    fn test_clean_summary() {
        plain();
        let report = CleanReport {
            removed: vec![(PathBuf::from("site"), RemoveStatus::WouldRemove)],
            failures: vec![],
        };
        let output = clean_summary(&report, true);
        assert!(output.contains("○ would remove site"));
        assert!(output.contains("no files were modified"));

        let output = clean_summary(&CleanReport::default(), false);
        assert!(output.contains("Nothing to clean"));
    }

    #[test]
    fn test_benchmark_summary() {
        plain();
        let runs = vec![
            BenchmarkRun {
                category: "chunking".to_string(),
                outcome: Ok(ToolOutput::default()),
                report: Some(BenchmarkReport::new(0)),
            },
            BenchmarkRun {
                category: "retrieval".to_string(),
                outcome: Err(Error::ExternalToolError {
                    tool: "cargo".to_string(),
                    message: "exited with 101".to_string(),
                }),
                report: None,
            },
        ];

        let output = benchmark_summary(&runs);

        assert!(output.contains("✓ chunking: 0/0 techniques succeeded"));
        assert!(output.contains("✗ retrieval:"));
        assert!(output.contains("exited with 101"));
    }
}
