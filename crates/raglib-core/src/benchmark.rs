//! Benchmark records produced by generated benchmark programs.
//!
//! Generated programs call [`BenchmarkResult::from_outcome`] for every
//! technique and persist a [`BenchmarkReport`] as JSON, so the averaging
//! rules live here rather than in emitted source.

use crate::{ApplyOutcome, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Average text length of payload items.
///
/// Items may be plain strings or objects with a `text` field; anything else
/// counts as zero-length. An empty slice averages to `0.0`.
///
/// # Examples
///
/// ```
/// use raglib_core::average_item_length;
/// use serde_json::json;
///
/// assert_eq!(average_item_length(&[]), 0.0);
/// assert_eq!(average_item_length(&[json!("abcd"), json!({"text": "ab"})]), 3.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_item_length(items: &[Value]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let total: usize = items.iter().map(item_length).sum();
    total as f64 / items.len() as f64
}

fn item_length(item: &Value) -> usize {
    match item {
        Value::String(text) => text.chars().count(),
        Value::Object(fields) => fields
            .get("text")
            .and_then(Value::as_str)
            .map_or(0, |text| text.chars().count()),
        _ => 0,
    }
}

/// Benchmark record for one technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Whether the technique completed successfully
    pub success: bool,
    /// Number of items in the primary output
    pub num_chunks: usize,
    /// Average text length of the primary output items
    pub avg_chunk_length: f64,
    /// Elapsed wall time in seconds
    pub processing_time: f64,
    /// Error message, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Builds a record from an apply outcome.
    ///
    /// `primary_key` names the payload entry that holds the technique's
    /// main output (`chunks` for chunkers).
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::{ApplyOutcome, BenchmarkResult};
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    ///
    /// let outcome = ApplyOutcome::success(BTreeMap::new());
    /// let result = BenchmarkResult::from_outcome(&outcome, "chunks", Duration::from_millis(5));
    ///
    /// assert!(result.success);
    /// assert_eq!(result.num_chunks, 0);
    /// assert_eq!(result.avg_chunk_length, 0.0);
    /// ```
    #[must_use]
    pub fn from_outcome(outcome: &ApplyOutcome, primary_key: &str, elapsed: Duration) -> Self {
        if !outcome.success {
            return Self::failed(
                outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
                elapsed,
            );
        }
        let items = outcome.items(primary_key);
        Self {
            success: true,
            num_chunks: items.len(),
            avg_chunk_length: average_item_length(items),
            processing_time: elapsed.as_secs_f64(),
            error: None,
        }
    }

    /// Builds a failure record.
    #[must_use]
    pub fn failed(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            num_chunks: 0,
            avg_chunk_length: 0.0,
            processing_time: elapsed.as_secs_f64(),
            error: Some(error.into()),
        }
    }
}

/// Results record file written by a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Wall-clock time the report was created
    pub timestamp: String,
    /// Number of techniques the run covered
    pub total_techniques: usize,
    /// Per-technique results keyed by technique name
    pub results: BTreeMap<String, BenchmarkResult>,
}

impl BenchmarkReport {
    /// Creates an empty report stamped with the current time.
    #[must_use]
    pub fn new(total_techniques: usize) -> Self {
        Self {
            timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            total_techniques,
            results: BTreeMap::new(),
        }
    }

    /// Records the result for one technique.
    pub fn record(&mut self, name: impl Into<String>, result: BenchmarkResult) {
        self.results.insert(name.into(), result);
    }

    /// Number of successful techniques.
    #[must_use]
    pub fn successful(&self) -> usize {
        self.results.values().filter(|r| r.success).count()
    }

    /// Mean primary-output size across successful techniques.
    ///
    /// Returns `0.0` when nothing succeeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::BenchmarkReport;
    ///
    /// let report = BenchmarkReport::new(0);
    /// assert_eq!(report.average_chunk_count(), 0.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_chunk_count(&self) -> f64 {
        let counts: Vec<usize> = self
            .results
            .values()
            .filter(|r| r.success)
            .map(|r| r.num_chunks)
            .collect();
        if counts.is_empty() {
            return 0.0;
        }
        counts.iter().sum::<usize>() as f64 / counts.len() as f64
    }

    /// Serializes the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("Failed to serialize benchmark report: {e}"),
        })
    }

    /// Writes the report to `path` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WriteError`] if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| Error::WriteError {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    }
}
