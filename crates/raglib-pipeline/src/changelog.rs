//! Cumulative record of what a run changed, planned, and skipped.

use crate::stage::Stage;
use raglib_files::{RemoveStatus, WriteStatus};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Whether a change committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The mutation committed
    Applied,
    /// Dry run: the mutation would have been made
    Planned,
    /// The mutation was attempted and failed
    Failed,
}

/// One human-readable change record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Stage that made the change
    pub stage: Stage,
    /// Outcome
    pub kind: ChangeKind,
    /// Description for the run summary
    pub description: String,
    /// Artifact the change targets, if it is a file or directory
    pub path: Option<PathBuf>,
}

/// Severity of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Work was skipped, e.g. a missing anchor or document
    Skipped,
    /// A stage operation failed and was degraded to a warning
    Error,
}

/// A non-fatal problem recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Stage that recorded the warning
    pub stage: Stage,
    /// Severity
    pub kind: WarningKind,
    /// Description for the run summary
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Ordered log of the changes and warnings of one run.
///
/// Created at run start and appended to by every stage. In a real run only
/// committed mutations appear as [`ChangeKind::Applied`]; in a dry run the
/// same mutations appear as [`ChangeKind::Planned`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeLog {
    changes: Vec<Change>,
    warnings: Vec<Warning>,
}

impl ChangeLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a document write. Unchanged documents are not
    /// recorded.
    pub fn record_write(
        &mut self,
        stage: Stage,
        path: &Path,
        status: WriteStatus,
        description: impl Into<String>,
    ) {
        let kind = match status {
            WriteStatus::Unchanged => {
                debug!("{} already up to date", path.display());
                return;
            }
            WriteStatus::Written => ChangeKind::Applied,
            WriteStatus::WouldWrite => ChangeKind::Planned,
        };
        self.push(stage, kind, description.into(), Some(path.to_path_buf()));
    }

    /// Records the outcome of removing a generated artifact.
    pub fn record_remove(&mut self, stage: Stage, path: &Path, status: RemoveStatus) {
        let kind = match status {
            RemoveStatus::Absent => return,
            RemoveStatus::Removed => ChangeKind::Applied,
            RemoveStatus::WouldRemove => ChangeKind::Planned,
        };
        self.push(
            stage,
            kind,
            format!("Removed {}", path.display()),
            Some(path.to_path_buf()),
        );
    }

    /// Records a committed change that is not a single document write.
    pub fn applied(&mut self, stage: Stage, description: impl Into<String>, path: Option<PathBuf>) {
        self.push(stage, ChangeKind::Applied, description.into(), path);
    }

    /// Records a change a dry run would have made.
    pub fn planned(&mut self, stage: Stage, description: impl Into<String>, path: Option<PathBuf>) {
        self.push(stage, ChangeKind::Planned, description.into(), path);
    }

    /// Records a failed mutation together with its error warning.
    pub fn record_failure(
        &mut self,
        stage: Stage,
        description: impl Into<String>,
        path: Option<PathBuf>,
        error: &dyn std::error::Error,
    ) {
        self.push(stage, ChangeKind::Failed, description.into(), path);
        self.error(stage, error);
    }

    /// Records skipped work.
    pub fn skip(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        warn!("[{stage}] {message}");
        self.warnings.push(Warning {
            stage,
            kind: WarningKind::Skipped,
            message,
        });
    }

    /// Records a stage error degraded to a warning.
    pub fn error(&mut self, stage: Stage, error: &dyn std::error::Error) {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        warn!("[{stage}] {message}");
        self.warnings.push(Warning {
            stage,
            kind: WarningKind::Error,
            message,
        });
    }

    fn push(&mut self, stage: Stage, kind: ChangeKind, description: String, path: Option<PathBuf>) {
        match kind {
            ChangeKind::Applied => info!("[{stage}] {description}"),
            ChangeKind::Planned => info!("[{stage}] Would: {description}"),
            ChangeKind::Failed => warn!("[{stage}] Failed: {description}"),
        }
        self.changes.push(Change {
            stage,
            kind,
            description,
            path,
        });
    }

    /// Every change in record order.
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Every warning in record order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Changes that committed or, in a dry run, would have committed.
    pub fn effective_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(|change| change.kind != ChangeKind::Failed)
    }

    /// Returns `true` if a planned change targets `path`.
    #[must_use]
    pub fn is_planned(&self, path: &Path) -> bool {
        self.changes
            .iter()
            .any(|change| {
                change.kind == ChangeKind::Planned && change.path.as_deref() == Some(path)
            })
    }

    /// First stage that recorded an error warning.
    #[must_use]
    pub fn first_error(&self) -> Option<&Warning> {
        self.warnings
            .iter()
            .find(|warning| warning.kind == WarningKind::Error)
    }

    /// Appends another log, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.changes.extend(other.changes);
        self.warnings.extend(other.warnings);
    }
}
