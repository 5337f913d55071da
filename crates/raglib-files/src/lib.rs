//! Document I/O for the RAGLib documentation pipeline.
//!
//! [`DocumentStore`] is the only component that touches the filesystem on
//! behalf of the generators. It resolves paths against the project root,
//! skips writes whose content is already current, and turns every mutation
//! into a planned one when constructed in dry-run mode.
//!
//! # Examples
//!
//! ```
//! use raglib_files::{DocumentStore, RemoveStatus};
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let store = DocumentStore::new(dir.path(), true);
//!
//! assert!(store.is_dry_run());
//! assert_eq!(store.remove("site").unwrap(), RemoveStatus::Absent);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod store;

pub use error::{FilesError, Result};
pub use store::{DocumentStore, RemoveStatus, WriteStatus};
