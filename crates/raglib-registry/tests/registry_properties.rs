//! Property tests for registry listing and category partitioning.

use proptest::prelude::*;
use raglib_core::{
    ApplyOutcome, Component, ComponentConfig, ComponentContract, Document, TechniqueMetadata,
};
use raglib_registry::{Registration, TechniqueRegistry};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug)]
struct Stub(String);

impl Component for Stub {
    fn contract(&self) -> ComponentContract {
        ComponentContract::new(self.0.clone(), "raglib::techniques::stub")
    }

    fn apply(&self, _input: &Document, _config: &ComponentConfig) -> ApplyOutcome {
        ApplyOutcome::success(BTreeMap::new())
    }
}

fn registrations() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(
        "[a-z][a-z0-9_]{0,12}",
        prop::sample::select(vec!["chunking", "retrieval", "reranking", "generation"])
            .prop_map(String::from),
        0..24,
    )
}

fn populate(registry: &TechniqueRegistry, techniques: &BTreeMap<String, String>) {
    for (name, category) in techniques {
        let meta = TechniqueMetadata::new(name.as_str(), category.as_str(), "generated").unwrap();
        let component: Arc<dyn Component> = Arc::new(Stub(format!("T{name}")));
        registry.register(name.as_str(), meta, component).unwrap();
    }
}

proptest! {
    #[test]
    fn list_returns_exactly_the_registered_set(techniques in registrations()) {
        let registry = TechniqueRegistry::new();
        populate(&registry, &techniques);

        let listed: BTreeSet<String> = registry.list().iter().map(|e| e.name().to_string()).collect();
        let expected: BTreeSet<String> = techniques.keys().cloned().collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn reregistering_identical_pairs_keeps_size(techniques in registrations()) {
        let registry = TechniqueRegistry::new();
        populate(&registry, &techniques);
        let before = registry.len();

        for entry in registry.list() {
            let outcome = registry
                .register(entry.name().as_str(), entry.metadata().clone(), Arc::clone(entry.component()))
                .unwrap();
            prop_assert_eq!(outcome, Registration::AlreadyRegistered);
        }
        prop_assert_eq!(registry.len(), before);
    }

    #[test]
    fn categories_partition_the_listing(techniques in registrations()) {
        let registry = TechniqueRegistry::new();
        populate(&registry, &techniques);

        let mut union = BTreeSet::new();
        for category in registry.categories() {
            for entry in registry.find_by_category(&category) {
                prop_assert_eq!(entry.metadata().category().as_str(), category.as_str());
                prop_assert!(union.insert(entry.name().to_string()), "category groups overlap");
            }
        }

        let listed: BTreeSet<String> = registry.list().iter().map(|e| e.name().to_string()).collect();
        prop_assert_eq!(union, listed);
    }
}

#[test]
fn find_by_category_keeps_insertion_order() {
    let registry = TechniqueRegistry::new();
    for name in ["sentence_window", "fixed_size", "semantic"] {
        let meta = TechniqueMetadata::new(name, "chunking", "").unwrap();
        registry
            .register(name, meta, Arc::new(Stub(format!("T{name}"))))
            .unwrap();
    }

    let names: Vec<String> = registry
        .find_by_category("chunking")
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, ["sentence_window", "fixed_size", "semantic"]);
    assert!(registry.find_by_category("retrieval").is_empty());
}
