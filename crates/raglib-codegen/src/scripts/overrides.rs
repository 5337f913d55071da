//! Showcase configuration overrides selected by name pattern.

use super::escape::{string_literal, value_literal};
use raglib_core::config::OverrideRule;
use serde_json::Value;
use std::collections::BTreeMap;

/// Returns the first rule matching `name` in `category`.
///
/// # Examples
///
/// ```
/// use raglib_codegen::scripts::select_override;
/// use raglib_core::config::ShowcaseConfig;
///
/// let rules = ShowcaseConfig::default().overrides;
/// let rule = select_override(&rules, "chunking", "sentence_window_chunker").unwrap();
/// assert!(rule.values.contains_key("window_size"));
///
/// assert!(select_override(&rules, "generation", "hyde").is_none());
/// ```
#[must_use]
pub fn select_override<'a>(
    rules: &'a [OverrideRule],
    category: &str,
    name: &str,
) -> Option<&'a OverrideRule> {
    rules.iter().find(|rule| rule.matches(category, name))
}

/// Builds the `ComponentConfig` constructor expression for `values`.
///
/// # Errors
///
/// Returns the offending key if a value has no Rust literal form.
pub(crate) fn config_expression(values: &BTreeMap<String, Value>) -> Result<String, String> {
    let mut expression = String::from("ComponentConfig::new()");
    for (key, value) in values {
        let literal = value_literal(value).ok_or_else(|| key.clone())?;
        expression.push_str(&format!(".with({}, {literal})", string_literal(key)));
    }
    Ok(expression)
}
