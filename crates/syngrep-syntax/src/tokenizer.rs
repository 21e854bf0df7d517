//! Wildcard tokenizer and pattern text encoder.
//!
//! Wildcard syntax (`$name`, `$_`, `$*name`, `$(name, /regex/)`) is illegal
//! in every host grammar, so the tokenizer rewrites each wildcard into an
//! ordinary identifier carrying only the wildcard's integer id:
//!
//! ```text
//! $x + f($*args)   becomes   __syngrep_wc0 + f(__syngrep_wc1)
//! ```
//!
//! Names, any-count flags, and name-constraint regexes live in a side table
//! keyed by the id, so nothing is string-decoded at matching time. Because
//! the substitution changes text length, every substitution point records a
//! [`PosOffset`] so later parser errors can be mapped back to the original
//! column.

use regex::Regex;

use crate::error::SyntaxError;
use crate::position::{PosBuffer, PosOffset, position_at};

/// Reserved identifier prefix carrying a wildcard id.
///
/// Chosen so it can never collide with a plausible user identifier while
/// still parsing as an ordinary name in every supported grammar.
pub(crate) const WILDCARD_PREFIX: &str = "__syngrep_wc";

/// Reserved call name used to parse an expression list as call arguments.
pub(crate) const SEQUENCE_WRAPPER: &str = "__syngrep_seq";

/// Leading marker enabling aggressive matching.
const AGGRESSIVE_MARKER: char = '~';

/// Flags and metadata for one wildcard form.
#[derive(Debug)]
pub struct WildcardInfo {
    name: String,
    matches_any: bool,
    name_rx: Option<Regex>,
}

impl WildcardInfo {
    /// Returns the wildcard's name (`_` for the non-binding form).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether this wildcard matches any number of sequence siblings.
    #[must_use]
    pub const fn matches_any(&self) -> bool {
        self.matches_any
    }

    /// Returns the anchored name-constraint regex, if one was given.
    #[must_use]
    pub const fn name_rx(&self) -> Option<&Regex> {
        self.name_rx.as_ref()
    }

    /// Returns whether this wildcard binds no name.
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        self.name == "_"
    }
}

/// Dense id-to-wildcard table built while tokenizing a pattern.
///
/// Ids are assigned once per compilation and never reused; occurrences of an
/// identical form (same name, flags, and regex) share an id.
#[derive(Debug, Default)]
pub struct WildcardTable {
    infos: Vec<WildcardInfo>,
}

impl WildcardTable {
    /// Looks up a wildcard by id.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&WildcardInfo> {
        self.infos.get(id)
    }

    /// Returns the number of distinct wildcard forms in the pattern.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns whether the pattern has no wildcards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    fn intern(&mut self, name: &str, matches_any: bool, name_rx: Option<Regex>) -> usize {
        let rx_source = name_rx.as_ref().map(Regex::as_str);
        let existing = self.infos.iter().position(|info| {
            info.name == name
                && info.matches_any == matches_any
                && info.name_rx.as_ref().map(Regex::as_str) == rx_source
        });
        if let Some(id) = existing {
            return id;
        }

        self.infos.push(WildcardInfo {
            name: name.to_owned(),
            matches_any,
            name_rx,
        });
        self.infos.len() - 1
    }
}

/// One unit of the tokenized pattern: a literal run of host-grammar text or
/// a wildcard occurrence.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PatternToken {
    /// A run of ordinary pattern text, copied through verbatim.
    Text(String),
    /// A wildcard occurrence; `source_len` is the byte length of the
    /// original wildcard syntax it replaces.
    Wildcard { id: usize, source_len: usize },
}

/// The tokenizer's output: token stream, wildcard table, aggressive flag.
#[derive(Debug)]
pub(crate) struct TokenizedPattern {
    pub(crate) tokens: Vec<PatternToken>,
    pub(crate) table: WildcardTable,
    pub(crate) aggressive: bool,
}

/// The encoded pattern: host-grammar-legal text plus position corrections.
#[derive(Debug)]
pub(crate) struct EncodedPattern {
    pub(crate) text: String,
    pub(crate) offsets: Vec<PosOffset>,
}

/// Scans the raw pattern text into a token stream and wildcard table.
///
/// A leading `~` enables aggressive matching and is stripped before the rest
/// of the stream is produced.
pub(crate) fn tokenize(pattern: &str) -> Result<TokenizedPattern, SyntaxError> {
    let (aggressive, rest) = match pattern.strip_prefix(AGGRESSIVE_MARKER) {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };

    let mut scanner = Scanner::new(pattern, rest, aggressive);
    scanner.run()?;

    Ok(TokenizedPattern {
        tokens: scanner.tokens,
        table: scanner.table,
        aggressive,
    })
}

/// Synthesises the encoded text from a token stream, recording a
/// [`PosOffset`] at every point where the synthetic length differs from the
/// original.
pub(crate) fn encode(tokenized: &TokenizedPattern) -> EncodedPattern {
    let mut buf = PosBuffer::new();
    let mut offsets = Vec::new();

    if tokenized.aggressive {
        // The stripped marker shortened the text by one byte at the start.
        offsets.push(PosOffset {
            at_line: 1,
            at_col: 1,
            len: -1,
        });
    }

    for token in &tokenized.tokens {
        match token {
            PatternToken::Text(text) => buf.push_str(text),
            PatternToken::Wildcard { id, source_len } => {
                let placeholder = format!("{WILDCARD_PREFIX}{id}");
                let at = buf.position();
                let inserted = placeholder.len() as i64 - *source_len as i64;
                offsets.push(PosOffset {
                    at_line: at.line,
                    at_col: at.column,
                    len: inserted,
                });
                buf.push_str(&placeholder);
            }
        }
    }

    EncodedPattern {
        text: buf.into_string(),
        offsets,
    }
}

/// Extracts the wildcard id from an encoded identifier, if it is one.
#[must_use]
pub(crate) fn wildcard_id(text: &str) -> Option<usize> {
    text.strip_prefix(WILDCARD_PREFIX)?.parse().ok()
}

struct Scanner<'s> {
    /// The full original pattern, used for error positions.
    original: &'s str,
    /// Byte offset of `rest` within `original` (1 when `~` was stripped).
    base: usize,
    rest: &'s str,
    tokens: Vec<PatternToken>,
    table: WildcardTable,
    pending: String,
}

impl<'s> Scanner<'s> {
    fn new(original: &'s str, rest: &'s str, aggressive: bool) -> Self {
        Self {
            original,
            base: usize::from(aggressive),
            rest,
            tokens: Vec::new(),
            table: WildcardTable::default(),
            pending: String::new(),
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::tokenize(position_at(self.original, self.base + offset), message)
    }

    fn flush_text(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tokens.push(PatternToken::Text(text));
        }
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        let mut chars = self.rest.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            if ch != '$' {
                self.pending.push(ch);
                continue;
            }

            let matches_any = chars.next_if(|(_, c)| *c == '*').is_some();

            let (name, name_rx) = if chars.peek().is_some_and(|(_, c)| *c == '(') {
                chars.next();
                self.scan_constrained(&mut chars, offset)?
            } else {
                (self.scan_name(&mut chars, offset)?, None)
            };

            // The consumed span runs from the `$` to the last wildcard byte.
            let end = match chars.peek() {
                Some((next_offset, _)) => *next_offset,
                None => self.rest.len(),
            };
            let id = self.table.intern(&name, matches_any, name_rx);
            self.flush_text();
            self.tokens.push(PatternToken::Wildcard {
                id,
                source_len: end - offset,
            });
        }

        self.flush_text();
        Ok(())
    }

    /// Scans a plain wildcard name: `_` or an identifier.
    fn scan_name(
        &self,
        chars: &mut std::iter::Peekable<std::str::CharIndices<'s>>,
        wildcard_offset: usize,
    ) -> Result<String, SyntaxError> {
        let mut name = String::new();

        let Some((_, first)) = chars.peek().copied() else {
            return Err(self.error(wildcard_offset, "wildcard must be followed by a name"));
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(self.error(wildcard_offset, "wildcard must be followed by a name"));
        }

        name.push(first);
        chars.next();
        while let Some((_, c)) = chars.peek().copied() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            name.push(c);
            chars.next();
        }

        Ok(name)
    }

    /// Scans the constrained form `$(name, /regex/)`; the leading `$(` has
    /// already been consumed.
    fn scan_constrained(
        &self,
        chars: &mut std::iter::Peekable<std::str::CharIndices<'s>>,
        wildcard_offset: usize,
    ) -> Result<(String, Option<Regex>), SyntaxError> {
        self.skip_spaces(chars);
        let name = self.scan_name(chars, wildcard_offset)?;
        self.skip_spaces(chars);

        if chars.next_if(|(_, c)| *c == ',').is_none() {
            return Err(self.error(
                wildcard_offset,
                "expected ',' between wildcard name and regex",
            ));
        }
        self.skip_spaces(chars);

        if chars.next_if(|(_, c)| *c == '/').is_none() {
            return Err(self.error(wildcard_offset, "expected '/' opening the name regex"));
        }

        let mut source = String::new();
        let mut closed = false;
        while let Some((_, c)) = chars.next() {
            match c {
                '/' => {
                    closed = true;
                    break;
                }
                '\\' => {
                    source.push(c);
                    if let Some((_, escaped)) = chars.next() {
                        source.push(escaped);
                    }
                }
                _ => source.push(c),
            }
        }
        if !closed {
            return Err(self.error(wildcard_offset, "unterminated name regex"));
        }

        self.skip_spaces(chars);
        if chars.next_if(|(_, c)| *c == ')').is_none() {
            return Err(self.error(wildcard_offset, "unterminated wildcard: expected ')'"));
        }

        // Anchor the regex so it must match the whole identifier; `.*`
        // therefore matches all identifiers.
        let rx = Regex::new(&format!("^(?:{source})$"))
            .map_err(|e| self.error(wildcard_offset, format!("invalid regex /{source}/: {e}")))?;

        Ok((name, Some(rx)))
    }

    fn skip_spaces(&self, chars: &mut std::iter::Peekable<std::str::CharIndices<'s>>) {
        while chars.next_if(|(_, c)| *c == ' ').is_some() {}
    }
}
