//! Position tracking for synthesised pattern text.
//!
//! Encoding a pattern replaces each wildcard with a reserved identifier of a
//! different length, and parsing wraps the encoded text in a syntactic
//! scaffold. Both substitutions shift the coordinates the parser reports, so
//! every substitution point records a correction that later subtracts the
//! synthetic length back out. Lines and columns are one-based; columns count
//! bytes within the line, matching Tree-sitter.

use std::fmt;

/// One-based line/column position in a piece of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// One-based line number.
    pub line: u32,
    /// One-based byte column within the line.
    pub column: u32,
}

impl Position {
    /// The first position of any text.
    pub const START: Self = Self { line: 1, column: 1 };

    /// Creates a position from one-based coordinates.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_position(pos: tree_sitter::Point) -> Position {
    // Line/column numbers will realistically never exceed u32::MAX.
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    Position { line, column }
}

/// Computes the position of a byte offset within `text`.
#[must_use]
pub(crate) fn position_at(text: &str, byte_offset: usize) -> Position {
    let mut line: u32 = 1;
    let mut column: u32 = 1;
    for (idx, ch) in text.char_indices() {
        if idx >= byte_offset {
            break;
        }
        if ch == '\n' {
            line = line.saturating_add(1);
            column = 1;
        } else {
            let width = u32::try_from(ch.len_utf8()).unwrap_or(u32::MAX);
            column = column.saturating_add(width);
        }
    }
    Position { line, column }
}

/// A correction recorded at one substitution point in synthesised text.
///
/// `len` is the number of synthetic bytes inserted at that point (negative
/// when the synthesised form is shorter than the original). Any reported
/// column at or after the point on the same line must have `len` subtracted
/// to recover the original coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PosOffset {
    pub(crate) at_line: u32,
    pub(crate) at_col: u32,
    pub(crate) len: i64,
}

/// Maps a position in rewritten text back to the original pattern text by
/// subtracting every correction recorded at or before it on the same line.
#[must_use]
pub(crate) fn correct_position(pos: Position, offsets: &[PosOffset]) -> Position {
    let mut column = i64::from(pos.column);
    for off in offsets {
        if off.at_line == pos.line && off.at_col <= pos.column {
            column -= off.len;
        }
    }
    let column = u32::try_from(column.max(1)).unwrap_or(u32::MAX);
    Position {
        line: pos.line,
        column,
    }
}

/// A string builder that tracks the line and column of its write head.
///
/// Used while synthesising the encoded pattern text so each substitution can
/// record a [`PosOffset`] at the exact coordinate it lands on.
#[derive(Debug)]
pub(crate) struct PosBuffer {
    text: String,
    line: u32,
    column: u32,
}

impl PosBuffer {
    pub(crate) fn new() -> Self {
        Self {
            text: String::new(),
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        for ch in s.chars() {
            if ch == '\n' {
                self.line = self.line.saturating_add(1);
                self.column = 1;
            } else {
                let width = u32::try_from(ch.len_utf8()).unwrap_or(u32::MAX);
                self.column = self.column.saturating_add(width);
            }
        }
        self.text.push_str(s);
    }

    pub(crate) const fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn pos_buffer_tracks_lines_and_columns() {
        let mut buf = PosBuffer::new();
        assert_eq!(buf.position(), Position::new(1, 1));

        buf.push_str("abc");
        assert_eq!(buf.position(), Position::new(1, 4));

        buf.push_str("\nxy");
        assert_eq!(buf.position(), Position::new(2, 3));
        assert_eq!(buf.into_string(), "abc\nxy");
    }

    #[rstest]
    #[case(0, Position::new(1, 1))]
    #[case(3, Position::new(1, 4))]
    #[case(4, Position::new(2, 1))]
    #[case(6, Position::new(2, 3))]
    fn position_at_counts_lines(#[case] offset: usize, #[case] expected: Position) {
        assert_eq!(position_at("abc\nxyz", offset), expected);
    }

    #[test]
    fn correction_subtracts_synthetic_length_after_the_point() {
        // A wildcard of original length 2 was replaced by 13 bytes at column
        // 20: everything reported at or past column 20 moved right by 11.
        let offsets = vec![PosOffset {
            at_line: 1,
            at_col: 20,
            len: 11,
        }];

        let corrected = correct_position(Position::new(1, 35), &offsets);
        assert_eq!(corrected, Position::new(1, 24));
    }

    #[test]
    fn correction_ignores_points_after_the_error() {
        let offsets = vec![PosOffset {
            at_line: 1,
            at_col: 20,
            len: 11,
        }];

        let corrected = correct_position(Position::new(1, 10), &offsets);
        assert_eq!(corrected, Position::new(1, 10));
    }

    #[test]
    fn correction_ignores_other_lines() {
        let offsets = vec![PosOffset {
            at_line: 1,
            at_col: 5,
            len: 7,
        }];

        let corrected = correct_position(Position::new(2, 9), &offsets);
        assert_eq!(corrected, Position::new(2, 9));
    }

    #[test]
    fn corrections_accumulate_left_to_right() {
        let offsets = vec![
            PosOffset {
                at_line: 1,
                at_col: 3,
                len: 11,
            },
            PosOffset {
                at_line: 1,
                at_col: 30,
                len: 11,
            },
        ];

        // After both substitutions: subtract both lengths.
        let corrected = correct_position(Position::new(1, 45), &offsets);
        assert_eq!(corrected, Position::new(1, 23));
    }

    #[test]
    fn negative_corrections_shift_right() {
        // A stripped one-byte marker records a negative length.
        let offsets = vec![PosOffset {
            at_line: 1,
            at_col: 1,
            len: -1,
        }];

        let corrected = correct_position(Position::new(1, 4), &offsets);
        assert_eq!(corrected, Position::new(1, 5));
    }

    #[test]
    fn correction_clamps_to_column_one() {
        let offsets = vec![PosOffset {
            at_line: 1,
            at_col: 1,
            len: 40,
        }];

        let corrected = correct_position(Position::new(1, 12), &offsets);
        assert_eq!(corrected, Position::new(1, 1));
    }
}
