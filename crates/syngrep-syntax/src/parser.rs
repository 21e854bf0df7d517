//! Tree-sitter parsing wrapper with error collection.
//!
//! Tree-sitter is error-tolerant: parsing always yields a tree, possibly
//! containing ERROR or MISSING nodes. Pattern compilation treats any such
//! node as a failed syntactic hypothesis, and corpus loading treats it as an
//! unparsable source file, so both need structured access to the errors.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::position::{Position, point_to_position};

/// Result of parsing source code.
///
/// Owns the parsed syntax tree together with the text it was parsed from,
/// which is needed to resolve node byte ranges back to text.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the parse result contains any syntax errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }

    /// Returns the first syntax error in the tree, in traversal order.
    #[must_use]
    pub fn first_error(&self) -> Option<SyntaxErrorInfo> {
        first_error_node(self.tree.root_node()).map(|node| SyntaxErrorInfo::from_node(node))
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Position where the error starts (one-based).
    pub position: Position,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>) -> Self {
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        Self {
            position: point_to_position(node.start_position()),
            message,
        }
    }
}

/// Tree-sitter parser wrapper for a specific language.
///
/// Each parser instance is configured for a single language; create one per
/// language being parsed.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the language grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code and returns the result.
    ///
    /// Use [`ParseResult::has_errors`] to check whether the source was fully
    /// grammatical; a tree is produced either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser fails to produce a syntax tree at all.
    /// This is rare and typically indicates a parser configuration issue.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

/// Recursively checks if a node or any of its descendants is an ERROR or
/// MISSING node.
fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

/// Finds the first ERROR or MISSING node in traversal order.
fn first_error_node(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn main() {}")]
    #[case(SupportedLanguage::Python, "def hello():\n    pass")]
    #[case(
        SupportedLanguage::TypeScript,
        "function hello(): string { return 'hi'; }"
    )]
    fn parser_parses_valid_source(#[case] language: SupportedLanguage, #[case] source: &str) {
        let mut parser = Parser::new(language).unwrap_or_else(|err| panic!("parser init: {err}"));
        let result = parser
            .parse(source)
            .unwrap_or_else(|err| panic!("parse: {err}"));

        assert!(!result.has_errors());
        assert_eq!(result.language(), language);
    }

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn broken() {")]
    #[case(SupportedLanguage::Python, "def broken(")]
    #[case(SupportedLanguage::TypeScript, "function broken( {")]
    fn parser_detects_syntax_errors(#[case] language: SupportedLanguage, #[case] source: &str) {
        let mut parser = Parser::new(language).unwrap_or_else(|err| panic!("parser init: {err}"));
        let result = parser
            .parse(source)
            .unwrap_or_else(|err| panic!("parse: {err}"));

        assert!(result.has_errors());
        assert!(result.first_error().is_some());
    }

    #[test]
    fn first_error_has_one_based_position() {
        let mut parser =
            Parser::new(SupportedLanguage::Rust).unwrap_or_else(|err| panic!("parser init: {err}"));
        let result = parser
            .parse("fn test() {\n    let x = \n}")
            .unwrap_or_else(|err| panic!("parse: {err}"));

        let Some(error) = result.first_error() else {
            panic!("should report an error");
        };
        assert!(error.position.line >= 1);
        assert!(error.position.column >= 1);
    }
}
