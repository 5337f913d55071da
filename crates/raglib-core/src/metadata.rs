//! Immutable technique descriptor.

use crate::{Category, Component, Result, TechniqueName, Version};
use std::fmt;
use std::sync::{Arc, Weak};

/// Immutable descriptor of one registered technique.
///
/// The back-reference to the owning component is weak: metadata never
/// keeps a component alive, it only lets the introspector reach the
/// component's contract while the registry still holds it.
///
/// # Examples
///
/// ```
/// use raglib_core::TechniqueMetadata;
///
/// let meta = TechniqueMetadata::new("bm25", "retrieval", "Sparse lexical retrieval")
///     .unwrap()
///     .with_version("2.1.0")
///     .unwrap()
///     .with_dependencies(["rank_bm25"]);
///
/// assert_eq!(meta.name().as_str(), "bm25");
/// assert_eq!(meta.category().as_str(), "retrieval");
/// assert_eq!(meta.version().as_str(), "2.1.0");
/// assert!(meta.owner().is_none());
/// ```
#[derive(Clone)]
pub struct TechniqueMetadata {
    name: TechniqueName,
    category: Category,
    description: String,
    version: Version,
    dependencies: Vec<String>,
    owner: Option<Weak<dyn Component>>,
}

impl TechniqueMetadata {
    /// Creates a descriptor with version `1.0.0` and no dependencies.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name or category is invalid.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            name: TechniqueName::new(name)?,
            category: Category::new(category)?,
            description: description.into(),
            version: Version::default(),
            dependencies: Vec::new(),
            owner: None,
        })
    }

    /// Sets the semantic version.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `version` is not a semantic version.
    pub fn with_version(mut self, version: impl Into<String>) -> Result<Self> {
        self.version = Version::new(version)?;
        Ok(self)
    }

    /// Sets the ordered dependency list.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy bound to its owning component.
    ///
    /// Called by the registry when an entry is committed.
    #[must_use]
    pub fn bound_to(&self, component: &Arc<dyn Component>) -> Self {
        Self {
            owner: Some(Arc::downgrade(component)),
            ..self.clone()
        }
    }

    /// Technique name.
    #[must_use]
    pub const fn name(&self) -> &TechniqueName {
        &self.name
    }

    /// Taxonomy category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Semantic version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Ordered dependency list.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Upgrades the back-reference to the owning component.
    ///
    /// Returns `None` for unbound metadata or once the component is gone.
    #[must_use]
    pub fn owner(&self) -> Option<Arc<dyn Component>> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }
}

impl PartialEq for TechniqueMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.category == other.category
            && self.description == other.description
            && self.version == other.version
            && self.dependencies == other.dependencies
    }
}

impl Eq for TechniqueMetadata {}

impl fmt::Debug for TechniqueMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TechniqueMetadata")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("description", &self.description)
            .field("version", &self.version)
            .field("dependencies", &self.dependencies)
            .field("bound", &self.owner.is_some())
            .finish()
    }
}
