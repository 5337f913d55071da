//! Anchored section replacement inside human-authored documents.
//!
//! A section is located either by explicit sentinel comments
//!
//! ```text
//! <!-- raglib:begin NAME -->
//! ...generated body...
//! <!-- raglib:end NAME -->
//! ```
//!
//! or, for documents without sentinels, by a heading search: the body runs
//! from the line after the start anchor to the next stop-anchor line whose
//! heading depth is at or above the start heading's depth. A deeper heading
//! that happens to match the stop pattern belongs to the section and does
//! not end it.
//!
//! Lines inside fenced code blocks never match an anchor.
//!
//! When a heading anchor locates the section and the patcher also carries a
//! sentinel anchor, the new body is written between sentinels so that later
//! runs take the sentinel path. A replacement its own anchors would not find
//! again is skipped instead of written.

use raglib_core::{Error, Result};
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// How a section is located.
#[derive(Debug, Clone)]
pub enum Anchor {
    /// `<!-- raglib:begin NAME -->` / `<!-- raglib:end NAME -->` markers
    Sentinel(String),
    /// Start and stop patterns matched against single lines
    Heading {
        /// Pattern of the line that opens the section
        start: Regex,
        /// Pattern of a line that may close the section
        stop: Regex,
    },
}

impl Anchor {
    /// Sentinel anchor for `name`.
    #[must_use]
    pub fn sentinel(name: impl Into<String>) -> Self {
        Self::Sentinel(name.into())
    }

    /// Heading anchor from two regular expressions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if either pattern is invalid.
    pub fn heading(start: &str, stop: &str) -> Result<Self> {
        Ok(Self::Heading {
            start: compile(start)?,
            stop: compile(stop)?,
        })
    }

    fn begin_marker(name: &str) -> String {
        format!("<!-- raglib:begin {name} -->")
    }

    fn end_marker(name: &str) -> String {
        format!("<!-- raglib:end {name} -->")
    }

    /// Locates the body range in `document`, or says why it could not.
    fn locate(&self, document: &str) -> std::result::Result<Range<usize>, String> {
        let lines = scan(document);
        match self {
            Self::Sentinel(name) => {
                let begin = Self::begin_marker(name);
                let end = Self::end_marker(name);
                let start = lines
                    .iter()
                    .position(|line| !line.fenced && line.text.trim() == begin)
                    .ok_or_else(|| format!("begin marker '{begin}' not found"))?;
                let stop = lines[start + 1..]
                    .iter()
                    .find(|line| !line.fenced && line.text.trim() == end)
                    .ok_or_else(|| format!("end marker '{end}' not found"))?;
                Ok(lines[start].end..stop.start)
            }
            Self::Heading { start, stop } => {
                let opening = lines
                    .iter()
                    .position(|line| !line.fenced && start.is_match(line.text))
                    .ok_or_else(|| format!("start anchor '{}' not found", start.as_str()))?;
                let depth = heading_depth(lines[opening].text);
                let closing = lines[opening + 1..].iter().find(|line| {
                    !line.fenced
                        && stop.is_match(line.text)
                        && match (depth, heading_depth(line.text)) {
                            (Some(own), Some(other)) => other <= own,
                            _ => true,
                        }
                });
                let body_end = closing.map_or(document.len(), |line| line.start);
                Ok(lines[opening].end..body_end)
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel(name) => write!(f, "sentinel '{name}'"),
            Self::Heading { start, .. } => write!(f, "heading /{}/", start.as_str()),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::ConfigError {
        message: format!("Invalid anchor pattern '{pattern}': {e}"),
    })
}

/// One document line with byte offsets.
struct Line<'a> {
    /// Line text without its terminator
    text: &'a str,
    /// Offset of the first byte
    start: usize,
    /// Offset just past the terminator
    end: usize,
    /// Inside or delimiting a fenced code block
    fenced: bool,
}

fn scan(document: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut in_fence = false;
    for raw in document.split_inclusive('\n') {
        let text = raw.trim_end_matches(['\n', '\r']);
        let is_fence = {
            let trimmed = text.trim_start();
            trimmed.starts_with("```") || trimmed.starts_with("~~~")
        };
        lines.push(Line {
            text,
            start: offset,
            end: offset + raw.len(),
            fenced: in_fence || is_fence,
        });
        if is_fence {
            in_fence = !in_fence;
        }
        offset += raw.len();
    }
    lines
}

/// ATX heading depth (`## Title` is 2), or `None` for other lines.
fn heading_depth(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    let rest = &line[hashes..];
    let is_heading =
        (1..=6).contains(&hashes) && (rest.is_empty() || rest.starts_with([' ', '\t']));
    is_heading.then_some(hashes)
}

/// Result of a patch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The full document with the section body replaced
    Replaced(String),
    /// The section already holds the requested body
    Unchanged,
    /// No anchor matched; the document must be left untouched
    Skipped(String),
}

impl PatchOutcome {
    /// Returns the patched document, if any.
    #[must_use]
    pub fn into_document(self) -> Option<String> {
        match self {
            Self::Replaced(document) => Some(document),
            Self::Unchanged | Self::Skipped(_) => None,
        }
    }

    /// Returns `true` if the patch was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Replaces one anchored section of a document.
///
/// Anchors are tried in order; the first one that locates the section is
/// used. Everything outside the section body is preserved byte for byte.
///
/// # Examples
///
/// ```
/// use raglib_codegen::{Anchor, PatchOutcome, SectionPatcher};
///
/// let patcher = SectionPatcher::new(Anchor::heading("^## A", "^## ").unwrap());
/// let outcome = patcher.apply("# X\n## A\nold\n## B\nkeep", "new");
/// assert_eq!(outcome, PatchOutcome::Replaced("# X\n## A\nnew\n## B\nkeep".to_string()));
///
/// let again = patcher.apply("# X\n## A\nnew\n## B\nkeep", "new");
/// assert_eq!(again, PatchOutcome::Unchanged);
/// ```
#[derive(Debug, Clone)]
pub struct SectionPatcher {
    anchors: Vec<Anchor>,
}

impl SectionPatcher {
    /// Creates a patcher with one anchor.
    #[must_use]
    pub fn new(anchor: Anchor) -> Self {
        Self {
            anchors: vec![anchor],
        }
    }

    /// Adds an anchor tried when the previous ones do not match.
    #[must_use]
    pub fn with_fallback(mut self, anchor: Anchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    /// Anchors in the order they are tried.
    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Replaces the section body with `body`.
    ///
    /// A non-empty body is terminated with a newline if it lacks one. Never
    /// fails: a missing anchor yields [`PatchOutcome::Skipped`], and so does a
    /// patch that a second application would not leave unchanged.
    #[must_use]
    pub fn apply(&self, document: &str, body: &str) -> PatchOutcome {
        let outcome = self.patch_once(document, body);
        if let PatchOutcome::Replaced(patched) = &outcome
            && self.patch_once(patched, body) != PatchOutcome::Unchanged
        {
            return PatchOutcome::Skipped(
                "replacement body would end its own section on the next run; \
                 add raglib:begin/raglib:end sentinels"
                    .to_string(),
            );
        }
        outcome
    }

    fn patch_once(&self, document: &str, body: &str) -> PatchOutcome {
        let mut reasons = Vec::with_capacity(self.anchors.len());
        for anchor in &self.anchors {
            match anchor.locate(document) {
                Ok(range) => {
                    return match (anchor, self.sentinel_name()) {
                        (Anchor::Heading { .. }, Some(name)) => {
                            replace_range(document, range, &between_sentinels(name, body))
                        }
                        _ => replace_range(document, range, body),
                    };
                }
                Err(reason) => reasons.push(reason),
            }
        }
        PatchOutcome::Skipped(reasons.join("; "))
    }

    fn sentinel_name(&self) -> Option<&str> {
        self.anchors.iter().find_map(|anchor| match anchor {
            Anchor::Sentinel(name) => Some(name.as_str()),
            Anchor::Heading { .. } => None,
        })
    }
}

fn between_sentinels(name: &str, body: &str) -> String {
    let mut wrapped = Anchor::begin_marker(name);
    wrapped.push('\n');
    wrapped.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        wrapped.push('\n');
    }
    wrapped.push_str(&Anchor::end_marker(name));
    wrapped
}

fn replace_range(document: &str, range: Range<usize>, body: &str) -> PatchOutcome {
    let mut replacement = String::with_capacity(body.len() + 1);
    // Start anchor on the final line without a terminator.
    if range.start > 0 && !document[..range.start].ends_with('\n') {
        replacement.push('\n');
    }
    replacement.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        replacement.push('\n');
    }

    if document[range.clone()] == replacement {
        return PatchOutcome::Unchanged;
    }

    let mut patched = String::with_capacity(document.len() + replacement.len());
    patched.push_str(&document[..range.start]);
    patched.push_str(&replacement);
    patched.push_str(&document[range.end..]);
    PatchOutcome::Replaced(patched)
}

/// Inserts `section` before the first line matching `before`, unless
/// `guard` already occurs as a line of the document.
///
/// # Examples
///
/// ```
/// use raglib_codegen::{PatchOutcome, insert_section};
/// use regex::Regex;
///
/// let doc = "### 1. Basics\n\n### 2. Using the CLI\n";
/// let before = Regex::new(r"^### 2\. Using the CLI").unwrap();
/// let section = "### 2. Advanced\n\nText\n";
/// let PatchOutcome::Replaced(patched) = insert_section(doc, "### 2. Advanced", &before, section)
/// else {
///     panic!("expected insertion");
/// };
/// assert_eq!(
///     patched,
///     "### 1. Basics\n\n### 2. Advanced\n\nText\n\n### 2. Using the CLI\n"
/// );
/// assert_eq!(
///     insert_section(&patched, "### 2. Advanced", &before, "ignored"),
///     PatchOutcome::Unchanged
/// );
/// ```
#[must_use]
pub fn insert_section(document: &str, guard: &str, before: &Regex, section: &str) -> PatchOutcome {
    let lines = scan(document);
    if lines
        .iter()
        .any(|line| !line.fenced && line.text.trim() == guard.trim())
    {
        return PatchOutcome::Unchanged;
    }

    let Some(anchor) = lines
        .iter()
        .find(|line| !line.fenced && before.is_match(line.text))
    else {
        return PatchOutcome::Skipped(format!(
            "insertion point '{}' not found",
            before.as_str()
        ));
    };

    let mut patched = String::with_capacity(document.len() + section.len() + 2);
    patched.push_str(&document[..anchor.start]);
    patched.push_str(section.trim_end());
    patched.push_str("\n\n");
    patched.push_str(&document[anchor.start..]);
    PatchOutcome::Replaced(patched)
}
