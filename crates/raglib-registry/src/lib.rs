//! Technique registry for RAGLib components.
//!
//! The registry is an explicitly constructed value: callers create one,
//! register components into it, and pass it by reference to every stage
//! that needs a snapshot. There is no process-global instance.
//!
//! # Examples
//!
//! ```
//! use raglib_registry::{TechniqueRegistry, register_manifest};
//! use raglib_core::config::TechniqueSpec;
//!
//! let registry = TechniqueRegistry::new();
//! let spec = TechniqueSpec {
//!     name: "bm25".to_string(),
//!     category: "retrieval".to_string(),
//!     description: "Sparse lexical retrieval".to_string(),
//!     version: "1.0.0".to_string(),
//!     dependencies: vec![],
//!     identifier: "BM25".to_string(),
//!     module: "raglib::techniques::bm25".to_string(),
//!     parameters: vec!["k1".to_string(), "b".to_string()],
//!     docs: None,
//! };
//!
//! register_manifest(&registry, &[spec]).unwrap();
//! assert_eq!(registry.len(), 1);
//! assert!(registry.get("bm25").is_ok());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod manifest;
mod registry;

pub use manifest::{DeclaredComponent, register_manifest};
pub use registry::{Registration, RegistryEntry, TechniqueRegistry};
