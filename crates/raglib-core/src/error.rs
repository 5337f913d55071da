//! Error types for the RAGLib documentation pipeline.
//!
//! A single error hierarchy is shared by all library crates. Only
//! [`Error::FatalDiscovery`] aborts a pipeline run; every other variant is
//! degraded to a recorded warning by the orchestrator.
//!
//! # Examples
//!
//! ```
//! use raglib_core::{Error, Result};
//!
//! fn lookup(name: &str) -> Result<()> {
//!     Err(Error::NotFound {
//!         name: name.to_string(),
//!     })
//! }
//!
//! let err = lookup("bm25").unwrap_err();
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

/// Main error type for the RAGLib documentation pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A technique name is already registered to a different component.
    #[error("Technique '{name}' is already registered to a different component")]
    DuplicateName {
        /// Name that collided
        name: String,
    },

    /// A technique lookup failed.
    #[error("Technique not found: {name}")]
    NotFound {
        /// Name that was looked up
        name: String,
    },

    /// Validation error for domain types.
    ///
    /// Raised when creating domain types like `TechniqueName` or `Version`
    /// that have specific format requirements.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// A component supplied an unusable metadata contract.
    ///
    /// Components are rejected at registration time rather than producing
    /// broken documentation later.
    #[error("Invalid component contract for '{name}': {reason}")]
    InvalidContract {
        /// Technique whose contract was rejected
        name: String,
        /// Why the contract was rejected
        reason: String,
    },

    /// The registry was empty at discovery.
    ///
    /// This signals a broken registration chain, not a valid empty state,
    /// and is the only error that aborts a pipeline run.
    #[error("Discovery failed: {message}")]
    FatalDiscovery {
        /// Description of the discovery failure
        message: String,
    },

    /// A document patch was skipped because its anchor was not found.
    #[error("Patch skipped for {document}: anchor '{anchor}' not found")]
    PatchSkipped {
        /// Document that was left unmodified
        document: String,
        /// Anchor that could not be located
        anchor: String,
    },

    /// Persisting a document failed.
    #[error("Failed to write {path}")]
    WriteError {
        /// Path that could not be written
        path: String,
        /// Underlying I/O cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An external tool exited with a nonzero status or was not found.
    #[error("External tool '{tool}' failed: {message}")]
    ExternalToolError {
        /// Binary that was invoked
        tool: String,
        /// Exit status and captured stderr, or the spawn failure
        message: String,
    },

    /// Post-run integrity checks failed.
    #[error("Validation failed: {}", issues.join("; "))]
    ValidationFailed {
        /// Every issue found by the validator
        issues: Vec<String>,
    },

    /// Template registration or rendering failed.
    #[error("Template error: {message}")]
    TemplateError {
        /// Description of the template failure
        message: String,
    },

    /// Generating an example program failed.
    #[error("Script generation failed for category '{category}': {message}")]
    ScriptGenerationError {
        /// Category the script was generated for
        category: String,
        /// Description of the generation failure
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Returns `true` if this is a duplicate registration error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }

    /// Returns `true` if this is a lookup failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::Error;
    ///
    /// let err = Error::NotFound {
    ///     name: "hyde".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a validation error for a domain type.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Returns `true` if a component contract was rejected.
    #[must_use]
    pub const fn is_invalid_contract(&self) -> bool {
        matches!(self, Self::InvalidContract { .. })
    }

    /// Returns `true` if this error must abort a pipeline run.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::Error;
    ///
    /// let err = Error::FatalDiscovery {
    ///     message: "No techniques found in registry".to_string(),
    /// };
    /// assert!(err.is_fatal_discovery());
    /// ```
    #[must_use]
    pub const fn is_fatal_discovery(&self) -> bool {
        matches!(self, Self::FatalDiscovery { .. })
    }

    /// Returns `true` if a patch was skipped.
    #[must_use]
    pub const fn is_patch_skipped(&self) -> bool {
        matches!(self, Self::PatchSkipped { .. })
    }

    /// Returns `true` if this is a write failure.
    #[must_use]
    pub const fn is_write_error(&self) -> bool {
        matches!(self, Self::WriteError { .. })
    }

    /// Returns `true` if an external tool failed.
    #[must_use]
    pub const fn is_external_tool_error(&self) -> bool {
        matches!(self, Self::ExternalToolError { .. })
    }

    /// Returns `true` if post-run validation failed.
    #[must_use]
    pub const fn is_validation_failed(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
