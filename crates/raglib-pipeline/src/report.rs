//! Run outcome.

use crate::changelog::ChangeLog;
use crate::stage::Stage;
use raglib_introspector::CatalogSnapshot;
use serde::Serialize;
use std::fmt;

/// Final status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// Every check passed
    Success,
    /// The run failed at `stage`
    Failed {
        /// Stage that decided the failure
        stage: Stage,
        /// Human-readable reason
        reason: String,
    },
}

impl RunStatus {
    /// Returns `true` for [`RunStatus::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failed { stage, reason } => write!(f, "failed at {stage}: {reason}"),
        }
    }
}

/// Technique counts discovered at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechniqueSummary {
    /// Total registered techniques
    pub total: usize,
    /// `(category, technique names)` in catalog order
    pub categories: Vec<(String, Vec<String>)>,
}

impl TechniqueSummary {
    /// Summarizes a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        Self {
            total: snapshot.total_techniques,
            categories: snapshot
                .groups
                .iter()
                .map(|group| {
                    (
                        group.category.clone(),
                        group.techniques.iter().map(|t| t.name.clone()).collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Everything a run did, for the final summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Final status
    pub status: RunStatus,
    /// Stages that were entered, in order
    pub attempted: Vec<Stage>,
    /// Changes and warnings
    pub log: ChangeLog,
    /// Whether the run only planned its mutations
    pub dry_run: bool,
    /// Techniques seen at discovery, if discovery ran
    pub techniques: Option<TechniqueSummary>,
}

impl RunReport {
    /// Returns `true` if the run succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
