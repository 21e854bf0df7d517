//! Language detection and Tree-sitter grammar selection.
//!
//! This module provides the [`SupportedLanguage`] enum for identifying
//! programming languages, mapping them to their Tree-sitter grammars, and
//! answering the grammar-specific questions the matcher needs: which node
//! kinds hold ordered sibling sequences, and which kinds are identifiers.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Languages supported for structural search.
///
/// Each variant maps to a Tree-sitter grammar that can parse source code
/// for that language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportedLanguage {
    /// Rust source files (`.rs`).
    #[default]
    Rust,
    /// Python source files (`.py`, `.pyi`).
    Python,
    /// TypeScript source files (`.ts`, `.tsx`, `.mts`, `.cts`).
    TypeScript,
}

impl SupportedLanguage {
    /// Detects the language from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Detects the language from a file path by examining its extension.
    ///
    /// Returns `None` if the path has no extension or the extension is not
    /// recognised.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the Tree-sitter language grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            // Use a TSX-capable grammar so `.tsx` is parsed correctly.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns the lower-case identifier for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::TypeScript => "typescript",
        }
    }

    /// Returns all supported languages.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Rust, Self::Python, Self::TypeScript]
    }

    /// Returns whether `kind` is a node whose named children form an ordered
    /// sibling sequence: call arguments, parameter lists, statement blocks,
    /// file roots, declaration lists, and collection literals.
    ///
    /// Sequence patterns (`a, b` or `a; b`) are attempted once against the
    /// full child sequence of each such node.
    #[must_use]
    pub fn is_sequence_container(self, kind: &str) -> bool {
        match self {
            Self::Rust => matches!(
                kind,
                "source_file"
                    | "block"
                    | "arguments"
                    | "parameters"
                    | "type_arguments"
                    | "tuple_expression"
                    | "array_expression"
                    | "declaration_list"
                    | "field_declaration_list"
                    | "field_initializer_list"
                    | "enum_variant_list"
                    | "use_list"
            ),
            Self::Python => matches!(
                kind,
                "module"
                    | "block"
                    | "argument_list"
                    | "parameters"
                    | "tuple"
                    | "list"
                    | "set"
                    | "dictionary"
            ),
            Self::TypeScript => matches!(
                kind,
                "program"
                    | "statement_block"
                    | "arguments"
                    | "formal_parameters"
                    | "array"
                    | "object"
                    | "class_body"
                    | "named_imports"
            ),
        }
    }
}

/// Returns whether `kind` names an identifier node in any supported grammar.
///
/// Tree-sitter grammars use a family of identifier kinds (`identifier`,
/// `field_identifier`, `type_identifier`, …); regex-constrained wildcards
/// accept any of them.
#[must_use]
pub(crate) fn is_identifier_kind(kind: &str) -> bool {
    kind == "identifier" || kind.ends_with("_identifier")
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a language identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "python" | "py" => Ok(Self::Python),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}
