//! Error types for pattern compilation and corpus parsing.
//!
//! Pattern errors always carry a position in the *original* pattern text,
//! after any synthetic text inserted during encoding has been subtracted
//! back out.

use thiserror::Error;

use crate::language::SupportedLanguage;
use crate::position::Position;

/// Errors from pattern compilation and parsing operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInit {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// The parser failed to produce a syntax tree at all.
    #[error("failed to parse {language}: {message}")]
    Parse {
        /// The language that failed to parse.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// The pattern contains malformed wildcard syntax.
    #[error("cannot tokenize pattern at {position}: {message}")]
    Tokenize {
        /// Position of the offending text in the original pattern.
        position: Position,
        /// Description of the tokenize failure.
        message: String,
    },

    /// The pattern parses under no syntactic hypothesis.
    #[error("cannot compile pattern at {position}: {message}")]
    Compile {
        /// Corrected position of the first syntax error in the original
        /// pattern text.
        position: Position,
        /// Description of the compile failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInit {
            language,
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::Parse {
            language,
            message: message.into(),
        }
    }

    /// Creates a tokenize error at the given position.
    #[must_use]
    pub fn tokenize(position: Position, message: impl Into<String>) -> Self {
        Self::Tokenize {
            position,
            message: message.into(),
        }
    }

    /// Creates a compile error at the given position.
    #[must_use]
    pub fn compile(position: Position, message: impl Into<String>) -> Self {
        Self::Compile {
            position,
            message: message.into(),
        }
    }

    /// Returns the pattern position the error refers to, if it has one.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Tokenize { position, .. } | Self::Compile { position, .. } => Some(*position),
            Self::ParserInit { .. } | Self::Parse { .. } => None,
        }
    }
}
