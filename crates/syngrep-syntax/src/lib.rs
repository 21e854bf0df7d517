//! Structural search over source-code syntax trees.
//!
//! This crate compiles wildcard-extended patterns and finds every subtree of
//! a corpus that structurally matches, binding named wildcards consistently
//! across the match. It powers the `syngrep` command-line tool and is usable
//! as a library.
//!
//! # Pattern Language
//!
//! A pattern is a fragment of code in the target language, extended with
//! wildcards:
//!
//! - `$name` - matches any single node; all occurrences of the same name
//!   within one match must denote structurally identical subtrees
//! - `$_` - matches any single node without binding
//! - `$*name` / `$*_` - matches any number of sequence siblings, including
//!   none, where an argument or statement sequence is expected
//! - `$(name, /regex/)` - matches only identifiers whose text matches the
//!   anchored regex
//! - a leading `~` enables aggressive matching (candidate parentheses are
//!   looked through)
//!
//! # Example
//!
//! ```
//! use syngrep_syntax::{CompiledPattern, Parser, SupportedLanguage, search};
//!
//! let mut parser = Parser::new(SupportedLanguage::Rust)?;
//! let corpus = parser.parse("fn main() { f(); f(1, 2); }")?;
//!
//! let pattern = CompiledPattern::compile("f($*_)", SupportedLanguage::Rust)?;
//! for m in search(&pattern, &corpus) {
//!     let _ = (m.start_position(), m.text());
//! }
//! # Ok::<(), syngrep_syntax::SyntaxError>(())
//! ```
//!
//! # Concurrency
//!
//! Compiling and searching are pure functions of their arguments. A
//! [`CompiledPattern`] is immutable once built and safe to share across
//! threads; every match attempt gets its own binding state.

mod error;
mod hypothesis;
mod language;
mod matcher;
mod parser;
mod pattern;
mod position;
mod tokenizer;

pub use error::SyntaxError;
pub use hypothesis::SyntacticCategory;
pub use language::{LanguageParseError, SupportedLanguage};
pub use matcher::{Bindings, BoundValue, Match, search};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use pattern::CompiledPattern;
pub use position::Position;
pub use tokenizer::{WildcardInfo, WildcardTable};
