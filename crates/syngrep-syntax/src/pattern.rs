//! Pattern compilation for structural code matching.
//!
//! Compiling a pattern runs the wildcard tokenizer, encodes the token stream
//! into host-grammar-legal text, and parses that text under successive
//! syntactic hypotheses until one accepts. The result is immutable: a
//! compiled pattern can be shared freely across concurrent searches, and all
//! per-attempt state lives in the matcher.

use crate::error::SyntaxError;
use crate::hypothesis::{HypothesisKind, SyntacticCategory, hypotheses_for, unshift};
use crate::language::SupportedLanguage;
use crate::parser::{ParseResult, Parser};
use crate::position::{Position, correct_position};
use crate::tokenizer::{EncodedPattern, WildcardTable, encode, tokenize};

/// A compiled structural pattern.
///
/// Holds the parsed tree of the encoded pattern text, the wildcard side
/// table, and the aggressive-mode flag. Produced once by
/// [`CompiledPattern::compile`] and read-only afterwards.
#[derive(Debug)]
pub struct CompiledPattern {
    source: String,
    language: SupportedLanguage,
    table: WildcardTable,
    aggressive: bool,
    category: SyntacticCategory,
    kind: HypothesisKind,
    encoded: ParseResult,
}

/// The compiled pattern's root: a single node, or a synthetic node sequence
/// for expression-list and statement-list patterns.
#[derive(Debug)]
pub(crate) enum PatternRoot<'t> {
    /// A single pattern node, attempted against every corpus node.
    Single(tree_sitter::Node<'t>),
    /// An ordered sibling sequence, attempted once per corpus sequence.
    Sequence(Vec<tree_sitter::Node<'t>>),
}

impl CompiledPattern {
    /// Compiles a pattern string for the given language.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Tokenize`] for malformed wildcard syntax and
    /// [`SyntaxError::Compile`] when no syntactic hypothesis parses; both
    /// carry a position in the original pattern text.
    pub fn compile(source: &str, language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let tokenized = tokenize(source)?;
        let encoded = encode(&tokenized);
        let mut parser = Parser::new(language)?;

        let mut first_failure: Option<Position> = None;
        for hypothesis in hypotheses_for(language) {
            let (wrapped, shift) = hypothesis.kind.wrap(language, &encoded.text);
            let parsed = parser.parse(&wrapped)?;

            if parsed.has_errors() {
                if first_failure.is_none() {
                    first_failure = parsed
                        .first_error()
                        .map(|error| recover_position(error.position, shift, &encoded));
                }
                continue;
            }
            if hypothesis
                .kind
                .extract(parsed.root_node(), parsed.source())
                .is_none()
            {
                continue;
            }

            tracing::debug!(
                category = ?hypothesis.category,
                wildcards = tokenized.table.len(),
                "pattern hypothesis accepted"
            );
            return Ok(Self {
                source: source.to_owned(),
                language,
                table: tokenized.table,
                aggressive: tokenized.aggressive,
                category: hypothesis.category,
                kind: hypothesis.kind,
                encoded: parsed,
            });
        }

        Err(SyntaxError::compile(
            first_failure.unwrap_or(Position::START),
            "pattern parses under no syntactic hypothesis",
        ))
    }

    /// Returns the original pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language this pattern is compiled for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the syntactic category the pattern was accepted under.
    #[must_use]
    pub const fn category(&self) -> SyntacticCategory {
        self.category
    }

    /// Returns whether the pattern enabled aggressive matching with a
    /// leading `~`.
    #[must_use]
    pub const fn is_aggressive(&self) -> bool {
        self.aggressive
    }

    /// Returns the wildcard table built while tokenizing the pattern.
    #[must_use]
    pub const fn wildcards(&self) -> &WildcardTable {
        &self.table
    }

    pub(crate) const fn encoded(&self) -> &ParseResult {
        &self.encoded
    }

    /// Recomputes the pattern root from the stored hypothesis.
    ///
    /// Compilation verified the extraction succeeds; the fallback to the raw
    /// root keeps this total without a panic path.
    pub(crate) fn root(&self) -> PatternRoot<'_> {
        self.kind
            .extract(self.encoded.root_node(), self.encoded.source())
            .unwrap_or_else(|| PatternRoot::Single(self.encoded.root_node()))
    }
}

/// Maps an error position in wrapped text back to the original pattern:
/// first undo the hypothesis scaffold, then the tokenizer's substitutions.
fn recover_position(
    reported: Position,
    shift: crate::hypothesis::WrapperShift,
    encoded: &EncodedPattern,
) -> Position {
    correct_position(unshift(reported, shift), &encoded.offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compile_rust(pattern: &str) -> CompiledPattern {
        CompiledPattern::compile(pattern, SupportedLanguage::Rust)
            .unwrap_or_else(|err| panic!("compile {pattern:?}: {err}"))
    }

    #[rstest]
    #[case("x", SyntacticCategory::Expression)]
    #[case("foo(bar)", SyntacticCategory::Expression)]
    #[case("$x + $x", SyntacticCategory::Expression)]
    #[case("1, 2", SyntacticCategory::ExpressionList)]
    #[case("let x = 1", SyntacticCategory::Statements)]
    #[case("a; b", SyntacticCategory::Statements)]
    #[case("Vec<String>", SyntacticCategory::Type)]
    fn rust_patterns_take_the_narrowest_category(
        #[case] pattern: &str,
        #[case] expected: SyntacticCategory,
    ) {
        assert_eq!(compile_rust(pattern).category(), expected);
    }

    #[test]
    fn bare_identifier_compiles_to_an_identifier_node() {
        let pattern = compile_rust("x");
        let PatternRoot::Single(node) = pattern.root() else {
            panic!("should be a single root");
        };
        assert_eq!(node.kind(), "identifier");
    }

    #[test]
    fn statement_list_compiles_to_a_sequence_root() {
        let pattern = compile_rust("a(); b()");
        let PatternRoot::Sequence(nodes) = pattern.root() else {
            panic!("should be a sequence root");
        };
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn expression_list_compiles_to_a_sequence_root() {
        let pattern = compile_rust("$x, $*rest");
        let PatternRoot::Sequence(nodes) = pattern.root() else {
            panic!("should be a sequence root");
        };
        assert_eq!(nodes.len(), 2);
        assert_eq!(pattern.wildcards().len(), 2);
    }

    #[test]
    fn python_expression_unwraps_the_expression_statement() {
        let pattern = CompiledPattern::compile("foo($*_)", SupportedLanguage::Python)
            .unwrap_or_else(|err| panic!("compile: {err}"));
        assert_eq!(pattern.category(), SyntacticCategory::Expression);

        let PatternRoot::Single(node) = pattern.root() else {
            panic!("should be a single root");
        };
        assert_eq!(node.kind(), "call");
    }

    #[test]
    fn typescript_expression_compiles() {
        let pattern = CompiledPattern::compile("foo($_)", SupportedLanguage::TypeScript)
            .unwrap_or_else(|err| panic!("compile: {err}"));
        assert_eq!(pattern.category(), SyntacticCategory::Expression);
    }

    #[test]
    fn aggressive_marker_sets_the_flag() {
        let pattern = compile_rust("~$x + 1");
        assert!(pattern.is_aggressive());
        assert!(!compile_rust("$x + 1").is_aggressive());
    }

    #[test]
    fn unparsable_pattern_reports_a_compile_error() {
        let Err(err) = CompiledPattern::compile("foo(", SupportedLanguage::Rust) else {
            panic!("should fail");
        };
        assert!(matches!(err, SyntaxError::Compile { .. }));
    }

    #[test]
    fn compile_error_position_lands_inside_the_original_pattern() {
        // The wildcard substitution inflates the encoded text by eleven
        // bytes. Wherever the grammar blames the error, the corrected column
        // must land next to the four-byte original, not past column fifteen
        // where the rewritten text would put it.
        let Err(err) = CompiledPattern::compile("$x +", SupportedLanguage::Rust) else {
            panic!("should fail");
        };
        let Some(position) = err.position() else {
            panic!("compile errors carry a position");
        };
        assert_eq!(position.line, 1);
        assert!(
            (1..=6).contains(&position.column),
            "column {} reported against the rewritten text",
            position.column
        );
    }

    #[test]
    fn compilation_is_deterministic() {
        let first = compile_rust("f($*_)");
        let second = compile_rust("f($*_)");
        assert_eq!(first.category(), second.category());
        assert_eq!(first.wildcards().len(), second.wildcards().len());
        assert_eq!(first.encoded().source(), second.encoded().source());
    }

    #[test]
    fn wildcard_ids_are_dense_and_stable() {
        let pattern = compile_rust("$a + $b + $a");
        assert_eq!(pattern.wildcards().len(), 2);
        assert!(pattern.wildcards().get(0).is_some());
        assert!(pattern.wildcards().get(1).is_some());
        assert!(pattern.wildcards().get(2).is_none());
    }
}
