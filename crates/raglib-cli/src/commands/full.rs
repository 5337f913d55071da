//! The `full` command: every step in sequence.

use super::{Project, maintenance, pipeline};
use colored::Colorize;
use raglib_core::cli::ExitCode;

type Step = fn(&Project) -> ExitCode;

/// Steps of a full rebuild, in order.
pub const STEPS: [(&str, Step); 5] = [
    ("clean", maintenance::clean),
    ("update", pipeline::update),
    ("generate", pipeline::generate),
    ("build", pipeline::build),
    ("validate", maintenance::validate),
];

/// Runs [`STEPS`], stopping at the first failing step.
#[must_use]
pub fn run(project: &Project) -> ExitCode {
    for (name, step) in STEPS {
        let code = step(project);
        if !code.is_success() {
            println!("{} Full rebuild stopped at {name}", "✗".red().bold());
            return code;
        }
    }
    println!("{} Full rebuild completed", "✓".green().bold());
    ExitCode::SUCCESS
}
