//! Match rendering: single-line display text and JSON records.

use serde::Serialize;

/// Renders matched source on a single display line.
///
/// Every run of whitespace, including newlines and indentation, collapses to
/// one space. This also collapses whitespace inside string literals, which
/// is acceptable for display output.
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One match in `--format json` output.
#[derive(Debug, Serialize)]
pub(crate) struct MatchRecord<'a> {
    /// Path of the file the match was found in.
    pub(crate) path: &'a str,
    /// One-based line of the match start.
    pub(crate) line: u32,
    /// One-based column of the match start.
    pub(crate) column: u32,
    /// Single-line rendering of the matched source.
    pub(crate) text: String,
}
