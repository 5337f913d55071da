//! Documentation and example-program generation for RAGLib.
//!
//! Everything in this crate is pure text transformation: generators take a
//! snapshot or a technique list and return strings, and the patcher takes a
//! document and returns the patched document. Writing results to disk, and
//! deciding whether to write at all, belongs to the caller.
//!
//! # Examples
//!
//! ```
//! use raglib_codegen::{Anchor, CatalogGenerator, PatchOutcome, SectionPatcher};
//! use raglib_core::config::CatalogConfig;
//! use raglib_introspector::CatalogSnapshot;
//!
//! let catalog = CatalogGenerator::new(CatalogConfig::default())
//!     .unwrap()
//!     .render(&CatalogSnapshot::default())
//!     .unwrap();
//! assert!(catalog.starts_with("# Techniques Index"));
//!
//! let patcher = SectionPatcher::new(Anchor::sentinel("demo"));
//! let doc = "<!-- raglib:begin demo -->\n<!-- raglib:end demo -->\n";
//! assert!(matches!(patcher.apply(doc, "body"), PatchOutcome::Replaced(_)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod catalog;
mod patcher;
mod sections;

pub mod scripts;
pub mod template_engine;

pub use catalog::CatalogGenerator;
pub use patcher::{Anchor, PatchOutcome, SectionPatcher, insert_section};
pub use raglib_core::config::OverrideRule;
pub use scripts::{ExampleScriptGenerator, GeneratedScript, ScriptKind};
pub use sections::SectionRenderer;
pub use template_engine::TemplateEngine;
