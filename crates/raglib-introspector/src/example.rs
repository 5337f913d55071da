//! Usage-example extraction from contract documentation.

const MARKER: &str = "Example:";

/// Leading whitespace, counted in characters.
fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `line` without its first `count` leading whitespace characters.
fn strip_indent(line: &str, count: usize) -> &str {
    let offset = line
        .char_indices()
        .take_while(|(_, c)| c.is_whitespace())
        .take(count)
        .last()
        .map_or(0, |(index, c)| index + c.len_utf8());
    &line[offset..]
}

/// Extracts the usage-example block from component documentation.
///
/// The block starts after the first line containing `Example:` and ends at
/// the first non-blank line that is not indented deeper than the marker
/// line. Surrounding blank lines are dropped and the block is dedented.
///
/// # Examples
///
/// ```
/// use raglib_introspector::extract_example;
///
/// let docs = "Fixed-size chunker.\n\nExample:\n    let chunker = FixedSizeChunker::new(200);\n    chunker.apply(&doc);\n\nNotes: none";
/// assert_eq!(
///     extract_example(docs).as_deref(),
///     Some("let chunker = FixedSizeChunker::new(200);\nchunker.apply(&doc);"),
/// );
///
/// assert_eq!(extract_example("No example here"), None);
/// ```
#[must_use]
pub fn extract_example(docs: &str) -> Option<String> {
    let mut lines = docs.lines();
    let marker = lines.by_ref().find(|line| line.contains(MARKER))?;
    let marker_indent = indentation(marker);

    let mut block: Vec<&str> = lines
        .take_while(|line| line.trim().is_empty() || indentation(line) > marker_indent)
        .collect();

    while block.last().is_some_and(|line| line.trim().is_empty()) {
        block.pop();
    }
    let leading = block.iter().take_while(|line| line.trim().is_empty()).count();
    block.drain(..leading);

    if block.is_empty() {
        return None;
    }

    let dedent = block
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);

    Some(
        block
            .iter()
            .map(|line| strip_indent(line, dedent).trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
