//! The component plugin contract.
//!
//! A component is one pluggable technique implementation. Instead of
//! reflecting over constructors and doc comments at run time, every
//! component hands the registry an explicit [`ComponentContract`] naming
//! its implementing identifier, defining module, parameters, and usage
//! documentation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Input document passed to [`Component::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub id: String,
    /// Full document text
    pub text: String,
    /// Free-form metadata
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Document {
    /// Creates a document without metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::Document;
    ///
    /// let doc = Document::new("test", "Some text.").with_meta("type", "test");
    /// assert_eq!(doc.meta["type"], "test");
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            meta: BTreeMap::new(),
        }
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Configuration passed to [`Component::apply`].
///
/// An empty configuration means "use the component's defaults".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentConfig(BTreeMap<String, Value>);

impl ComponentConfig {
    /// Creates an empty (default) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one configuration value.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::ComponentConfig;
    ///
    /// let config = ComponentConfig::new().with("chunk_size", 200).with("overlap", 20);
    /// assert_eq!(config.get_u64("chunk_size"), Some(200));
    /// assert_eq!(config.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns a raw configuration value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a configuration value as an unsigned integer.
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Returns the number of configured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no values are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates configured values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ComponentConfig {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of applying a component to a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// Whether the component completed successfully
    pub success: bool,
    /// Named outputs, e.g. `chunks` for chunkers or `hits` for retrievers
    #[serde(default)]
    pub payload: BTreeMap<String, Value>,
    /// Error message when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub const fn success(payload: BTreeMap<String, Value>) -> Self {
        Self {
            success: true,
            payload,
            error: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: BTreeMap::new(),
            error: Some(message.into()),
        }
    }

    /// Returns the items stored under `key`, or an empty slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::ApplyOutcome;
    /// use serde_json::json;
    ///
    /// let mut payload = std::collections::BTreeMap::new();
    /// payload.insert("chunks".to_string(), json!(["a", "b"]));
    /// let outcome = ApplyOutcome::success(payload);
    ///
    /// assert_eq!(outcome.items("chunks").len(), 2);
    /// assert!(outcome.items("hits").is_empty());
    /// ```
    #[must_use]
    pub fn items(&self, key: &str) -> &[Value] {
        self.payload
            .get(key)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

/// Explicit metadata contract supplied by every component.
///
/// Replaces run-time reflection: the registry validates the contract once
/// at registration and the introspector reads it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentContract {
    /// Implementing type identifier, e.g. `FixedSizeChunker`
    pub identifier: String,
    /// Defining module path, e.g. `raglib::techniques::fixed_size_chunker`
    pub module: String,
    /// Constructor parameter names in declaration order
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Usage documentation; may contain an `Example:` block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl ComponentContract {
    /// Creates a contract with no parameters and no documentation.
    #[must_use]
    pub fn new(identifier: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            module: module.into(),
            parameters: Vec::new(),
            docs: None,
        }
    }

    /// Sets the constructor parameter names.
    #[must_use]
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the usage documentation.
    #[must_use]
    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    /// Validates the contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContract`] if the identifier is not a Rust
    /// identifier, the module is not a `::`-separated path, or a parameter
    /// name is invalid or repeated.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::ComponentContract;
    ///
    /// let contract = ComponentContract::new("BM25", "raglib::techniques::bm25")
    ///     .with_parameters(["k1", "b"]);
    /// assert!(contract.validate("bm25").is_ok());
    ///
    /// let broken = ComponentContract::new("BM 25", "raglib::techniques::bm25");
    /// assert!(broken.validate("bm25").is_err());
    /// ```
    pub fn validate(&self, technique: &str) -> Result<()> {
        let reject = |reason: String| Error::InvalidContract {
            name: technique.to_string(),
            reason,
        };

        if !is_identifier(&self.identifier) {
            return Err(reject(format!(
                "identifier '{}' is not a valid identifier",
                self.identifier
            )));
        }
        if self.module.is_empty() || !self.module.split("::").all(is_identifier) {
            return Err(reject(format!(
                "module '{}' is not a valid module path",
                self.module
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for parameter in &self.parameters {
            if !is_identifier(parameter) {
                return Err(reject(format!("parameter '{parameter}' is not a valid name")));
            }
            if !seen.insert(parameter.as_str()) {
                return Err(reject(format!("parameter '{parameter}' is declared twice")));
            }
        }
        Ok(())
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// A registered technique implementation.
///
/// Implementations must be cheap to share: the registry stores them behind
/// `Arc` and hands out clones to every pipeline stage.
///
/// # Examples
///
/// ```
/// use raglib_core::{ApplyOutcome, Component, ComponentConfig, ComponentContract, Document};
/// use serde_json::json;
///
/// #[derive(Debug)]
/// struct WholeDocument;
///
/// impl Component for WholeDocument {
///     fn contract(&self) -> ComponentContract {
///         ComponentContract::new("WholeDocument", "demo::chunkers")
///     }
///
///     fn apply(&self, input: &Document, _config: &ComponentConfig) -> ApplyOutcome {
///         let mut payload = std::collections::BTreeMap::new();
///         payload.insert("chunks".to_string(), json!([input.text]));
///         ApplyOutcome::success(payload)
///     }
/// }
///
/// let outcome = WholeDocument.apply(&Document::new("d", "text"), &ComponentConfig::new());
/// assert!(outcome.success);
/// ```
pub trait Component: Send + Sync + fmt::Debug {
    /// Returns the component's explicit metadata contract.
    fn contract(&self) -> ComponentContract;

    /// Applies the component to one input document.
    fn apply(&self, input: &Document, config: &ComponentConfig) -> ApplyOutcome;
}
