//! Escaping rules for values interpolated into generated Rust.
//!
//! Every runtime value reaches a template as a complete Rust token: string
//! values become string literals, numbers become suffixed literals, and
//! paths are parsed before use.

use proc_macro2::{Literal, Span};
use serde_json::Value;

/// Renders `value` as a Rust string literal.
///
/// # Examples
///
/// ```
/// use raglib_codegen::scripts::string_literal;
///
/// assert_eq!(string_literal("bm25"), r#""bm25""#);
/// assert_eq!(string_literal("say \"hi\"\n"), r#""say \"hi\"\n""#);
/// ```
#[must_use]
pub fn string_literal(value: &str) -> String {
    Literal::string(value).to_string()
}

/// Renders a configuration value as a Rust expression convertible into
/// `serde_json::Value`.
///
/// Returns `None` for nulls, arrays, and objects, which have no literal
/// form.
#[must_use]
pub fn value_literal(value: &Value) -> Option<String> {
    match value {
        Value::Bool(flag) => Some(flag.to_string()),
        Value::String(text) => Some(string_literal(text)),
        Value::Number(number) => number
            .as_i64()
            .map(|n| Literal::i64_suffixed(n).to_string())
            .or_else(|| number.as_u64().map(|n| Literal::u64_suffixed(n).to_string()))
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| n.is_finite())
                    .map(|n| Literal::f64_suffixed(n).to_string())
            }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses and normalizes a Rust path such as `raglib_techniques::register_all`.
///
/// Generic arguments are rejected: the path must name a plain function.
///
/// # Errors
///
/// Returns the parser error if `path` is not a plain Rust path.
pub fn parse_path(path: &str) -> Result<String, syn::Error> {
    let parsed: syn::Path = syn::parse_str(path.trim())?;
    if parsed
        .segments
        .iter()
        .any(|segment| !matches!(segment.arguments, syn::PathArguments::None))
    {
        return Err(syn::Error::new(
            Span::call_site(),
            format!("'{path}' must not contain generic arguments"),
        ));
    }

    let segments: Vec<String> = parsed
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    let prefix = if parsed.leading_colon.is_some() { "::" } else { "" };
    Ok(format!("{prefix}{}", segments.join("::")))
}
