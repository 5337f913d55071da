//! Registration and lookup table.

use indexmap::IndexMap;
use raglib_core::{Component, Error, Result, TechniqueMetadata, TechniqueName};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// One committed registry entry.
///
/// Entries are immutable once committed. Cloning is cheap: the component
/// is shared behind `Arc`.
#[derive(Clone)]
pub struct RegistryEntry {
    metadata: TechniqueMetadata,
    component: Arc<dyn Component>,
}

impl RegistryEntry {
    /// Technique metadata, bound to the owning component.
    #[must_use]
    pub const fn metadata(&self) -> &TechniqueMetadata {
        &self.metadata
    }

    /// The registered component.
    #[must_use]
    pub const fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    /// Technique name.
    #[must_use]
    pub const fn name(&self) -> &TechniqueName {
        self.metadata.name()
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("metadata", &self.metadata)
            .field("component", &self.component)
            .finish()
    }
}

/// Outcome of a successful [`TechniqueRegistry::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new entry was committed.
    Registered,
    /// The identical (name, component) pair was already present; nothing
    /// changed.
    AlreadyRegistered,
}

/// Insertion-ordered registry of techniques.
///
/// # Thread Safety
///
/// All access goes through a single `Mutex` held for one insert or one
/// lookup, so concurrent first-time registration from several
/// initialization paths cannot corrupt the map.
///
/// # Examples
///
/// ```
/// use raglib_core::{
///     ApplyOutcome, Component, ComponentConfig, ComponentContract, Document, TechniqueMetadata,
/// };
/// use raglib_registry::{Registration, TechniqueRegistry};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Bm25;
///
/// impl Component for Bm25 {
///     fn contract(&self) -> ComponentContract {
///         ComponentContract::new("BM25", "raglib::techniques::bm25")
///     }
///     fn apply(&self, _: &Document, _: &ComponentConfig) -> ApplyOutcome {
///         ApplyOutcome::failure("not indexed")
///     }
/// }
///
/// let registry = TechniqueRegistry::new();
/// let component: Arc<dyn Component> = Arc::new(Bm25);
/// let meta = TechniqueMetadata::new("bm25", "retrieval", "Sparse retrieval").unwrap();
///
/// let first = registry.register("bm25", meta.clone(), Arc::clone(&component)).unwrap();
/// let again = registry.register("bm25", meta, component).unwrap();
///
/// assert_eq!(first, Registration::Registered);
/// assert_eq!(again, Registration::AlreadyRegistered);
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default)]
pub struct TechniqueRegistry {
    entries: Mutex<IndexMap<TechniqueName, RegistryEntry>>,
}

impl fmt::Debug for TechniqueRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TechniqueRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl TechniqueRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<TechniqueName, RegistryEntry>> {
        // Entries are only ever inserted whole, so a poisoned map is still
        // consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `component` under `name`.
    ///
    /// The component's contract is validated before anything is committed,
    /// and the stored metadata is bound to the component through a weak
    /// back-reference.
    ///
    /// # Errors
    ///
    /// - [`Error::ValidationError`] if `name` is invalid or differs from
    ///   `metadata.name()`
    /// - [`Error::InvalidContract`] if the component's contract is invalid
    /// - [`Error::DuplicateName`] if `name` is already registered to a
    ///   different component
    pub fn register(
        &self,
        name: impl Into<String>,
        metadata: TechniqueMetadata,
        component: Arc<dyn Component>,
    ) -> Result<Registration> {
        let name = TechniqueName::new(name)?;
        if metadata.name() != &name {
            return Err(Error::ValidationError {
                field: "technique_name".to_string(),
                reason: format!(
                    "registered as '{name}' but metadata names '{}'",
                    metadata.name()
                ),
            });
        }

        let contract = component.contract();
        contract.validate(name.as_str())?;

        let mut entries = self.lock();
        if let Some(existing) = entries.get(&name) {
            if is_same_component(&existing.component, &component) {
                debug!("Technique '{}' already registered, skipping", name);
                return Ok(Registration::AlreadyRegistered);
            }
            return Err(Error::DuplicateName {
                name: name.into(),
            });
        }

        let entry = RegistryEntry {
            metadata: metadata.bound_to(&component),
            component,
        };
        info!(
            "Registered technique '{}' ({}) as {}::{}",
            name,
            entry.metadata.category(),
            contract.module,
            contract.identifier
        );
        entries.insert(name, entry);
        Ok(Registration::Registered)
    }

    /// Returns the full insertion-ordered snapshot.
    #[must_use]
    pub fn list(&self) -> Vec<RegistryEntry> {
        self.lock().values().cloned().collect()
    }

    /// Returns the insertion-ordered entries in `category`.
    #[must_use]
    pub fn find_by_category(&self, category: &str) -> Vec<RegistryEntry> {
        self.lock()
            .values()
            .filter(|entry| entry.metadata.category().as_str() == category)
            .cloned()
            .collect()
    }

    /// Returns the entry registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no technique has that name.
    pub fn get(&self, name: &str) -> Result<RegistryEntry> {
        self.lock()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for entry in self.lock().values() {
            let category = entry.metadata.category().as_str();
            if !seen.iter().any(|c| c == category) {
                seen.push(category.to_string());
            }
        }
        seen
    }

    /// Number of registered techniques.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Same allocation, or a component declaring the same implementation.
fn is_same_component(existing: &Arc<dyn Component>, candidate: &Arc<dyn Component>) -> bool {
    if Arc::ptr_eq(existing, candidate) {
        return true;
    }
    let (a, b) = (existing.contract(), candidate.contract());
    a.identifier == b.identifier && a.module == b.module
}

#[cfg(test)]
mod tests {
    use super::*;
    use raglib_core::{ApplyOutcome, ComponentConfig, ComponentContract, Document};

    #[derive(Debug)]
    struct Fake {
        identifier: &'static str,
        parameters: &'static [&'static str],
    }

    impl Component for Fake {
        fn contract(&self) -> ComponentContract {
            ComponentContract::new(self.identifier, "raglib::techniques::fake")
                .with_parameters(self.parameters.iter().copied())
        }

        fn apply(&self, _input: &Document, _config: &ComponentConfig) -> ApplyOutcome {
            ApplyOutcome::failure("fake")
        }
    }

    fn component(identifier: &'static str) -> Arc<dyn Component> {
        Arc::new(Fake {
            identifier,
            parameters: &[],
        })
    }

    fn meta(name: &str, category: &str) -> TechniqueMetadata {
        TechniqueMetadata::new(name, category, "test technique").unwrap()
    }

    #[test]
    fn test_duplicate_name_different_component() {
        let registry = TechniqueRegistry::new();
        registry
            .register("bm25", meta("bm25", "retrieval"), component("Bm25"))
            .unwrap();

        let err = registry
            .register("bm25", meta("bm25", "retrieval"), component("Dense"))
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregister_same_contract_is_noop() {
        let registry = TechniqueRegistry::new();
        let first = registry
            .register("bm25", meta("bm25", "retrieval"), component("Bm25"))
            .unwrap();
        let second = registry
            .register("bm25", meta("bm25", "retrieval"), component("Bm25"))
            .unwrap();

        assert_eq!(first, Registration::Registered);
        assert_eq!(second, Registration::AlreadyRegistered);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_metadata_name_mismatch_rejected() {
        let registry = TechniqueRegistry::new();
        let err = registry
            .register("bm25", meta("dense", "retrieval"), component("Bm25"))
            .unwrap_err();
        assert!(err.is_validation_error());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_contract_rejected_before_commit() {
        let registry = TechniqueRegistry::new();
        let broken: Arc<dyn Component> = Arc::new(Fake {
            identifier: "Fixed Size",
            parameters: &[],
        });
        let err = registry
            .register("fixed", meta("fixed", "chunking"), broken)
            .unwrap_err();
        assert!(err.is_invalid_contract());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let registry = TechniqueRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let registry = TechniqueRegistry::new();
        for (name, identifier) in [("zeta", "Zeta"), ("alpha", "Alpha"), ("mid", "Mid")] {
            registry
                .register(name, meta(name, "chunking"), component(identifier))
                .unwrap();
        }
        let names: Vec<String> = registry
            .list()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_entry_metadata_is_bound() {
        let registry = TechniqueRegistry::new();
        registry
            .register("bm25", meta("bm25", "retrieval"), component("Bm25"))
            .unwrap();
        let entry = registry.get("bm25").unwrap();
        let owner = entry.metadata().owner().unwrap();
        assert_eq!(owner.contract().identifier, "Bm25");
    }

    #[test]
    fn test_categories_first_seen_order() {
        let registry = TechniqueRegistry::new();
        registry
            .register("bm25", meta("bm25", "retrieval"), component("Bm25"))
            .unwrap();
        registry
            .register("fixed", meta("fixed", "chunking"), component("Fixed"))
            .unwrap();
        registry
            .register("dense", meta("dense", "retrieval"), component("Dense"))
            .unwrap();
        assert_eq!(registry.categories(), ["retrieval", "chunking"]);
    }

    #[test]
    fn test_concurrent_first_time_registration() {
        let registry = TechniqueRegistry::new();
        let shared = component("Shared");

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let shared = Arc::clone(&shared);
                let registry = &registry;
                scope.spawn(move || {
                    registry
                        .register("shared", meta("shared", "chunking"), shared)
                        .unwrap();
                });
            }
        });

        assert_eq!(registry.len(), 1);
    }
}
