//! Pipeline stages.

use serde::Serialize;
use std::fmt;

/// One step of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Snapshot the registry; an empty registry aborts the run
    Discover,
    /// Patch anchored sections of human-authored documents
    PatchDocs,
    /// Render the technique catalog
    RegenerateCatalog,
    /// Generate benchmark and showcase programs
    GenerateExamples,
    /// Invoke the external site builder
    BuildSite,
    /// Check generated artifacts and decide the final status
    Validate,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Self; 6] = [
        Self::Discover,
        Self::PatchDocs,
        Self::RegenerateCatalog,
        Self::GenerateExamples,
        Self::BuildSite,
        Self::Validate,
    ];

    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::PatchDocs => "patch-docs",
            Self::RegenerateCatalog => "regenerate-catalog",
            Self::GenerateExamples => "generate-examples",
            Self::BuildSite => "build-site",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_execution_order() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
        assert_eq!(Stage::BuildSite.to_string(), "build-site");
    }
}
