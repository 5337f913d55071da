//! Contract introspection.

use crate::extract_example;
use raglib_core::{Component, ComponentContract, TechniqueMetadata};
use raglib_registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placeholder for identifier and module when the component is unreachable.
const UNKNOWN: &str = "unknown";

/// Implicit receiver excluded from parameter lists by default.
const SELF_PARAMETER: &str = "self";

/// Everything the renderers need to know about one technique.
///
/// Optional fields are always serialized (as `null` when absent) so
/// templates can test for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueInfo {
    /// Unique technique name
    pub name: String,
    /// Taxonomy category
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// Semantic version
    pub version: String,
    /// Ordered dependency list
    pub dependencies: Vec<String>,
    /// Implementing type identifier
    pub identifier: String,
    /// Defining module path
    pub module: String,
    /// Constructor parameters, without the implicit receiver
    pub parameters: Vec<String>,
    /// Usage example extracted from the contract documentation
    pub example: Option<String>,
}

/// Best-effort reader of component contracts.
///
/// # Examples
///
/// ```
/// use raglib_core::TechniqueMetadata;
/// use raglib_introspector::TechniqueIntrospector;
///
/// // Unbound metadata has no component to inspect.
/// let meta = TechniqueMetadata::new("bm25", "retrieval", "Sparse retrieval").unwrap();
/// let info = TechniqueIntrospector::new().introspect_metadata(&meta);
///
/// assert_eq!(info.name, "bm25");
/// assert_eq!(info.identifier, "unknown");
/// assert!(info.parameters.is_empty());
/// assert!(info.example.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TechniqueIntrospector {
    receiver: String,
}

impl Default for TechniqueIntrospector {
    fn default() -> Self {
        Self {
            receiver: SELF_PARAMETER.to_string(),
        }
    }
}

impl TechniqueIntrospector {
    /// Creates an introspector that drops `self` from parameter lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the receiver name dropped from parameter lists.
    #[must_use]
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    /// Introspects one registry entry.
    #[must_use]
    pub fn introspect(&self, entry: &RegistryEntry) -> TechniqueInfo {
        self.introspect_metadata(entry.metadata())
    }

    /// Introspects metadata through its back-reference to the owning
    /// component.
    #[must_use]
    pub fn introspect_metadata(&self, metadata: &TechniqueMetadata) -> TechniqueInfo {
        let contract = metadata.owner().map(|component| component.contract());
        if contract.is_none() {
            debug!(
                "Component for '{}' is unavailable, introspection skipped",
                metadata.name()
            );
        }

        let (identifier, module) = contract.as_ref().map_or_else(
            || (UNKNOWN.to_string(), UNKNOWN.to_string()),
            |c| (c.identifier.clone(), c.module.clone()),
        );

        TechniqueInfo {
            name: metadata.name().to_string(),
            category: metadata.category().to_string(),
            description: metadata.description().to_string(),
            version: metadata.version().to_string(),
            dependencies: metadata.dependencies().to_vec(),
            identifier,
            module,
            parameters: contract
                .as_ref()
                .map(|c| self.parameters_of(c))
                .unwrap_or_default(),
            example: contract.as_ref().and_then(example_of),
        }
    }

    /// Constructor parameter names of `component`, excluding `self`.
    #[must_use]
    pub fn parameters(&self, component: &dyn Component) -> Vec<String> {
        self.parameters_of(&component.contract())
    }

    /// Usage example documented by `component`, if any.
    #[must_use]
    pub fn example(component: &dyn Component) -> Option<String> {
        example_of(&component.contract())
    }

    fn parameters_of(&self, contract: &ComponentContract) -> Vec<String> {
        contract
            .parameters
            .iter()
            .filter(|name| **name != self.receiver)
            .cloned()
            .collect()
    }
}

fn example_of(contract: &ComponentContract) -> Option<String> {
    contract.docs.as_deref().and_then(extract_example)
}
