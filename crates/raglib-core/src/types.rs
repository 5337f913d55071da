//! Strong domain types for technique descriptors.
//!
//! Newtypes validate at construction so that an invalid name, category,
//! or version never reaches the registry.
//!
//! # Examples
//!
//! ```
//! use raglib_core::{Category, TechniqueName, Version};
//!
//! let name = TechniqueName::new("fixed_size_chunker").unwrap();
//! let category = Category::new("chunking").unwrap();
//! let version = Version::new("1.2.0").unwrap();
//!
//! assert_eq!(name.as_str(), "fixed_size_chunker");
//! assert_eq!(category.display_name(), "Chunking");
//! assert_eq!(version.to_string(), "1.2.0");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if value != value.trim() {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "must not have leading or trailing whitespace".to_string(),
        });
    }
    if value.chars().any(char::is_control) {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }
    Ok(())
}

/// Unique technique name (newtype over String).
///
/// Names are free-form display strings such as `bm25` or
/// `BM25 (Best Matching 25)`, but must be non-empty, trimmed, and free of
/// control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TechniqueName(String);

impl TechniqueName {
    /// Creates a validated technique name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the name is empty, padded with
    /// whitespace, or contains control characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::TechniqueName;
    ///
    /// assert!(TechniqueName::new("bm25").is_ok());
    /// assert!(TechniqueName::new("").is_err());
    /// assert!(TechniqueName::new(" bm25").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_text("technique_name", &name)?;
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechniqueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TechniqueName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TechniqueName> for String {
    fn from(name: TechniqueName) -> Self {
        name.0
    }
}

impl Borrow<str> for TechniqueName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Taxonomy category of a technique (newtype over String).
///
/// Categories are lowercase `snake_case` identifiers such as `chunking`
/// or `query_expansion`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Creates a validated category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the category is empty or is not
    /// lowercase `snake_case`.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::Category;
    ///
    /// assert!(Category::new("retrieval").is_ok());
    /// assert!(Category::new("").is_err());
    /// assert!(Category::new("Re Ranking").is_err());
    /// ```
    pub fn new(category: impl Into<String>) -> Result<Self> {
        let category = category.into();
        validate_text("category", &category)?;
        let valid = category
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(Error::ValidationError {
                field: "category".to_string(),
                reason: format!("'{category}' must be lowercase snake_case"),
            });
        }
        Ok(Self(category))
    }

    /// Returns the category as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the Title Case heading for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::Category;
    ///
    /// let category = Category::new("query_expansion").unwrap();
    /// assert_eq!(category.display_name(), "Query Expansion");
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect::<String>()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

/// Semantic version string (`MAJOR.MINOR.PATCH[-pre][+build]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(String);

impl Version {
    /// Creates a validated semantic version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] unless the core is three
    /// dot-separated numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::Version;
    ///
    /// assert!(Version::new("1.0.0").is_ok());
    /// assert!(Version::new("0.3.1-beta.2").is_ok());
    /// assert!(Version::new("1.0").is_err());
    /// ```
    pub fn new(version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        validate_text("version", &version)?;

        let without_build = version.split('+').next().unwrap_or_default();
        let core = without_build.split('-').next().unwrap_or_default();
        let parts: Vec<&str> = core.split('.').collect();
        let numeric = parts.len() == 3
            && parts
                .iter()
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));

        if !numeric {
            return Err(Error::ValidationError {
                field: "version".to_string(),
                reason: format!("'{version}' is not a semantic version"),
            });
        }
        Ok(Self(version))
    }

    /// Returns the version as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self("1.0.0".to_string())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technique_name_accepts_display_names() {
        let name = TechniqueName::new("BM25 (Best Matching 25)").unwrap();
        assert_eq!(name.to_string(), "BM25 (Best Matching 25)");
    }

    #[test]
    fn test_technique_name_rejects_control_characters() {
        let err = TechniqueName::new("bm\n25").unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_category_rejects_uppercase() {
        assert!(Category::new("Chunking").is_err());
        assert!(Category::new("chunking-v2").is_err());
        assert!(Category::new("chunking_v2").is_ok());
    }

    #[test]
    fn test_category_display_name() {
        assert_eq!(Category::new("chunking").unwrap().display_name(), "Chunking");
        assert_eq!(
            Category::new("multi__hop").unwrap().display_name(),
            "Multi Hop"
        );
    }

    #[test]
    fn test_version_default() {
        assert_eq!(Version::default().as_str(), "1.0.0");
    }

    #[test]
    fn test_version_rejects_non_numeric() {
        assert!(Version::new("one.two.three").is_err());
        assert!(Version::new("1..0").is_err());
        assert!(Version::new("1.0.0+build.7").is_ok());
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let ok: Category = serde_json::from_str("\"retrieval\"").unwrap();
        assert_eq!(ok.as_str(), "retrieval");

        let err = serde_json::from_str::<Category>("\"\"");
        assert!(err.is_err());
    }
}
