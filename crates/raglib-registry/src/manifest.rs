//! Components declared in the project manifest.
//!
//! The documentation tooling runs outside the process that links the
//! technique implementations, so it learns about techniques from the
//! `[[techniques]]` tables in `raglib-docs.toml`. Each table becomes a
//! [`DeclaredComponent`]: a full contract with no in-process behavior.

use crate::{Registration, TechniqueRegistry};
use raglib_core::config::TechniqueSpec;
use raglib_core::{
    ApplyOutcome, Component, ComponentConfig, ComponentContract, Document, Result,
    TechniqueMetadata,
};
use std::sync::Arc;
use tracing::debug;

/// A technique known only from its manifest declaration.
///
/// [`Component::apply`] always reports failure.
///
/// # Examples
///
/// ```
/// use raglib_core::{Component, ComponentConfig, ComponentContract, Document};
/// use raglib_registry::DeclaredComponent;
///
/// let component = DeclaredComponent::new(ComponentContract::new("BM25", "raglib::techniques::bm25"));
/// let outcome = component.apply(&Document::new("d", "text"), &ComponentConfig::new());
/// assert!(!outcome.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredComponent {
    contract: ComponentContract,
}

impl DeclaredComponent {
    /// Wraps a declared contract.
    #[must_use]
    pub const fn new(contract: ComponentContract) -> Self {
        Self { contract }
    }
}

impl Component for DeclaredComponent {
    fn contract(&self) -> ComponentContract {
        self.contract.clone()
    }

    fn apply(&self, _input: &Document, _config: &ComponentConfig) -> ApplyOutcome {
        ApplyOutcome::failure(format!(
            "{}::{} has no in-process implementation",
            self.contract.module, self.contract.identifier
        ))
    }
}

fn metadata_for(spec: &TechniqueSpec) -> Result<TechniqueMetadata> {
    Ok(
        TechniqueMetadata::new(&spec.name, &spec.category, &spec.description)?
            .with_version(&spec.version)?
            .with_dependencies(spec.dependencies.iter().cloned()),
    )
}

fn contract_for(spec: &TechniqueSpec) -> ComponentContract {
    let contract = ComponentContract::new(&spec.identifier, &spec.module)
        .with_parameters(spec.parameters.iter().cloned());
    match &spec.docs {
        Some(docs) => contract.with_docs(docs),
        None => contract,
    }
}

/// Registers every manifest declaration, in order.
///
/// Returns the number of newly committed entries; declarations that are
/// already registered with the same contract are not counted.
///
/// # Errors
///
/// Stops at the first declaration that fails validation or collides with
/// a different component under the same name.
pub fn register_manifest(registry: &TechniqueRegistry, specs: &[TechniqueSpec]) -> Result<usize> {
    let mut added = 0;
    for spec in specs {
        let metadata = metadata_for(spec)?;
        let component: Arc<dyn Component> = Arc::new(DeclaredComponent::new(contract_for(spec)));
        if registry.register(&spec.name, metadata, component)? == Registration::Registered {
            added += 1;
        }
    }
    debug!("Manifest registered {} of {} techniques", added, specs.len());
    Ok(added)
}
