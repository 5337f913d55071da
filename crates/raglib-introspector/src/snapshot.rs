//! Point-in-time catalog view grouped by category.

use crate::{TechniqueInfo, TechniqueIntrospector};
use raglib_core::Category;
use raglib_registry::{RegistryEntry, TechniqueRegistry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Techniques of one category, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    /// Category identifier, e.g. `query_expansion`
    pub category: String,
    /// Heading text, e.g. `Query Expansion`
    pub title: String,
    /// Techniques sorted lexicographically by name
    pub techniques: Vec<TechniqueInfo>,
}

/// Registry contents grouped for rendering.
///
/// Computed fresh for every generation pass and never stored.
///
/// # Examples
///
/// ```
/// use raglib_introspector::{CatalogSnapshot, TechniqueIntrospector};
/// use raglib_registry::TechniqueRegistry;
///
/// let registry = TechniqueRegistry::new();
/// let snapshot = CatalogSnapshot::capture(&registry, &TechniqueIntrospector::new(), &[]);
/// assert!(snapshot.is_empty());
/// assert_eq!(snapshot.total_categories(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    /// Category groups in display order
    pub groups: Vec<CategoryGroup>,
    /// Number of techniques across all groups
    pub total_techniques: usize,
}

impl CatalogSnapshot {
    /// Captures the current registry contents.
    ///
    /// `preferred_order` lists categories that come first, in that order;
    /// remaining categories follow lexicographically.
    #[must_use]
    pub fn capture(
        registry: &TechniqueRegistry,
        introspector: &TechniqueIntrospector,
        preferred_order: &[String],
    ) -> Self {
        Self::from_entries(&registry.list(), introspector, preferred_order)
    }

    /// Builds a snapshot from an explicit entry list.
    #[must_use]
    pub fn from_entries(
        entries: &[RegistryEntry],
        introspector: &TechniqueIntrospector,
        preferred_order: &[String],
    ) -> Self {
        let infos: Vec<TechniqueInfo> =
            entries.iter().map(|e| introspector.introspect(e)).collect();
        Self::from_infos(infos, preferred_order)
    }

    /// Groups already-introspected techniques.
    #[must_use]
    pub fn from_infos(infos: Vec<TechniqueInfo>, preferred_order: &[String]) -> Self {
        let total_techniques = infos.len();

        let mut by_category: BTreeMap<String, Vec<TechniqueInfo>> = BTreeMap::new();
        for info in infos {
            by_category.entry(info.category.clone()).or_default().push(info);
        }

        let mut ordered: Vec<String> = preferred_order
            .iter()
            .filter(|category| by_category.contains_key(*category))
            .cloned()
            .collect();
        // BTreeMap keys are already lexicographic.
        ordered.extend(
            by_category
                .keys()
                .filter(|category| !preferred_order.contains(category))
                .cloned(),
        );

        let groups = ordered
            .into_iter()
            .filter_map(|category| {
                let mut techniques = by_category.remove(&category)?;
                techniques.sort_by(|a, b| a.name.cmp(&b.name));
                Some(CategoryGroup {
                    title: title_for(&category),
                    category,
                    techniques,
                })
            })
            .collect();

        Self {
            groups,
            total_techniques,
        }
    }

    /// Number of non-empty categories.
    #[must_use]
    pub fn total_categories(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no technique is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_techniques == 0
    }

    /// Techniques of `category`, sorted by name.
    #[must_use]
    pub fn category(&self, category: &str) -> &[TechniqueInfo] {
        self.groups
            .iter()
            .find(|group| group.category == category)
            .map_or(&[], |group| group.techniques.as_slice())
    }
}

fn title_for(category: &str) -> String {
    Category::new(category).map_or_else(|_| category.to_string(), |c| c.display_name())
}
