//! Staged documentation pipeline for RAGLib.
//!
//! The [`PipelineOrchestrator`] keeps a project's documentation in step with
//! its [`TechniqueRegistry`](raglib_registry::TechniqueRegistry):
//!
//! ```text
//! Discover → PatchDocs → RegenerateCatalog → GenerateExamples → BuildSite → Validate
//! ```
//!
//! Each run produces a [`RunReport`] carrying the final [`RunStatus`], the
//! stages that were entered, and a [`ChangeLog`] of applied or planned
//! mutations and warnings. The [`project`] module holds the operations that
//! live outside a staged run: validation, cleaning, and benchmark runs.
//!
//! # Examples
//!
//! ```
//! use raglib_core::DocsConfig;
//! use raglib_core::config::TechniqueSpec;
//! use raglib_pipeline::{MkDocs, PipelineOptions, PipelineOrchestrator, Stage};
//! use raglib_registry::{TechniqueRegistry, register_manifest};
//!
//! let registry = TechniqueRegistry::new();
//! let config = DocsConfig::default();
//! register_manifest(&registry, &[TechniqueSpec {
//!     name: "bm25".to_string(),
//!     category: "retrieval".to_string(),
//!     description: "Sparse lexical retrieval".to_string(),
//!     version: "1.0.0".to_string(),
//!     dependencies: vec![],
//!     identifier: "Bm25".to_string(),
//!     module: "raglib::retrieval".to_string(),
//!     parameters: vec![],
//!     docs: None,
//! }]).unwrap();
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let options = PipelineOptions { dry_run: true, verbose: false };
//! let pipeline = PipelineOrchestrator::new(
//!     &registry,
//!     &config,
//!     dir.path(),
//!     MkDocs::from_config(&config.site),
//!     options,
//! );
//!
//! let report = pipeline.run_stages(&[Stage::Discover, Stage::RegenerateCatalog]);
//! assert!(report.is_success());
//! assert_eq!(report.log.changes().len(), 1);
//! assert!(!dir.path().join("docs").exists());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod changelog;
mod orchestrator;
mod report;
mod site;
mod stage;

pub mod project;

pub use changelog::{Change, ChangeKind, ChangeLog, Warning, WarningKind};
pub use orchestrator::{PipelineOptions, PipelineOrchestrator};
pub use report::{RunReport, RunStatus, TechniqueSummary};
pub use site::{MkDocs, SiteBuilder, ToolOutput, run_tool};
pub use stage::Stage;
