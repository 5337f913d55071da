//! Technique introspection for documentation generation.
//!
//! Reads each registered component's explicit contract and turns registry
//! entries into serializable [`TechniqueInfo`] records, grouped by category
//! in a [`CatalogSnapshot`] for the renderers.
//!
//! Introspection is best-effort: a component that cannot be reached yields
//! empty parameter and example fields, never an error.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod example;
mod introspector;
mod snapshot;

pub use example::extract_example;
pub use introspector::{TechniqueInfo, TechniqueIntrospector};
pub use snapshot::{CatalogSnapshot, CategoryGroup};
