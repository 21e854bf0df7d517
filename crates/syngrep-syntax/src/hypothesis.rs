//! Syntactic hypotheses for pattern parsing.
//!
//! A pattern fragment is ambiguous as to syntactic category: `x` could be an
//! expression, a statement, or a whole file. Each hypothesis wraps the
//! encoded pattern text in just enough scaffolding for the grammar to parse
//! it as one category, then extracts the pattern root back out of the
//! scaffold. Hypotheses are tried narrowest to broadest and the first clean
//! parse wins, so `x` compiles to an identifier node rather than an
//! expression statement wrapping one.
//!
//! The scaffold shifts every parser-reported coordinate; each hypothesis
//! records how many lines and columns it added so errors can be mapped back
//! to the encoded text (and from there, through the tokenizer's offsets, to
//! the original pattern).

use crate::language::SupportedLanguage;
use crate::pattern::PatternRoot;
use crate::position::Position;
use crate::tokenizer::SEQUENCE_WRAPPER;

/// Syntactic category a pattern was accepted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntacticCategory {
    /// A single expression.
    Expression,
    /// A comma-separated expression list.
    ExpressionList,
    /// One statement or a statement list.
    Statements,
    /// A type expression.
    Type,
    /// One or more top-level declarations, up to a whole file.
    Declarations,
}

/// Synthetic text a wrapper added around the encoded pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WrapperShift {
    /// Lines added before the pattern text.
    pub(crate) lines: u32,
    /// Columns added on pattern lines.
    pub(crate) columns: u32,
    /// Whether the column shift applies only to the first pattern line
    /// (a same-line prefix) rather than to every line (an indent).
    pub(crate) first_line_only: bool,
}

/// Maps a position in wrapped text back to the encoded pattern text.
#[must_use]
pub(crate) fn unshift(pos: Position, shift: WrapperShift) -> Position {
    let line = pos.line.saturating_sub(shift.lines).max(1);
    let column = if line == 1 || !shift.first_line_only {
        pos.column.saturating_sub(shift.columns).max(1)
    } else {
        pos.column
    };
    Position { line, column }
}

/// One syntactic hypothesis: a category plus the scaffold that realises it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Hypothesis {
    pub(crate) category: SyntacticCategory,
    pub(crate) kind: HypothesisKind,
}

/// The scaffold shape and extraction rule of a hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HypothesisKind {
    /// Bare parse accepting a single expression statement, unwrapped.
    BareExpression,
    /// Bare parse accepting the root's children as statements/declarations.
    BareItems,
    /// `fn __syngrep__() { … }` accepting a single block child.
    RustExpression,
    /// `fn __syngrep__() { …; }` accepting the block children as statements.
    RustStatements,
    /// A `__syngrep_seq(…)` call accepting its arguments as the sequence.
    SequenceCall,
    /// `type __SyngrepTy = …;` accepting the aliased type.
    TypeAlias,
    /// `(…);` accepting the parenthesised expression, unwrapped.
    ParenExpression,
    /// `def __syngrep__():` plus an indented suite accepting its statements.
    PythonSuite,
    /// `function __syngrep__() { … }` accepting the body statements.
    FunctionBody,
}

/// Returns the ordered hypotheses for a language, narrowest first.
pub(crate) fn hypotheses_for(language: SupportedLanguage) -> &'static [Hypothesis] {
    use HypothesisKind as K;
    use SyntacticCategory as C;

    match language {
        SupportedLanguage::Rust => &[
            Hypothesis {
                category: C::Expression,
                kind: K::RustExpression,
            },
            Hypothesis {
                category: C::ExpressionList,
                kind: K::SequenceCall,
            },
            Hypothesis {
                category: C::Statements,
                kind: K::RustStatements,
            },
            Hypothesis {
                category: C::Type,
                kind: K::TypeAlias,
            },
            Hypothesis {
                category: C::Declarations,
                kind: K::BareItems,
            },
        ],
        SupportedLanguage::Python => &[
            Hypothesis {
                category: C::Expression,
                kind: K::BareExpression,
            },
            Hypothesis {
                category: C::ExpressionList,
                kind: K::SequenceCall,
            },
            Hypothesis {
                category: C::Statements,
                kind: K::BareItems,
            },
            Hypothesis {
                category: C::Statements,
                kind: K::PythonSuite,
            },
        ],
        SupportedLanguage::TypeScript => &[
            Hypothesis {
                category: C::Expression,
                kind: K::BareExpression,
            },
            Hypothesis {
                category: C::Expression,
                kind: K::ParenExpression,
            },
            Hypothesis {
                category: C::ExpressionList,
                kind: K::SequenceCall,
            },
            Hypothesis {
                category: C::Statements,
                kind: K::BareItems,
            },
            Hypothesis {
                category: C::Type,
                kind: K::TypeAlias,
            },
            Hypothesis {
                category: C::Statements,
                kind: K::FunctionBody,
            },
        ],
    }
}

impl HypothesisKind {
    /// Wraps the encoded pattern text in this hypothesis's scaffold.
    pub(crate) fn wrap(self, language: SupportedLanguage, encoded: &str) -> (String, WrapperShift) {
        match self {
            Self::BareExpression | Self::BareItems => (encoded.to_owned(), WrapperShift::default()),
            Self::RustExpression => prefixed("fn __syngrep__() { ", encoded, " }"),
            Self::RustStatements => {
                let trimmed = encoded.trim_end();
                let suffix = if statement_needs_semicolon(trimmed) {
                    "; }"
                } else {
                    " }"
                };
                prefixed("fn __syngrep__() { ", trimmed, suffix)
            }
            Self::SequenceCall => match language {
                SupportedLanguage::Rust => {
                    prefixed("fn __syngrep__() { __syngrep_seq(", encoded, "); }")
                }
                SupportedLanguage::Python => prefixed("__syngrep_seq(", encoded, ")"),
                SupportedLanguage::TypeScript => prefixed("__syngrep_seq(", encoded, ");"),
            },
            Self::TypeAlias => prefixed("type __SyngrepTy = ", encoded, ";"),
            Self::ParenExpression => prefixed("(", encoded, ");"),
            Self::FunctionBody => prefixed("function __syngrep__() { ", encoded, " }"),
            Self::PythonSuite => {
                let mut out = String::from("def __syngrep__():\n");
                for line in encoded.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
                (
                    out,
                    WrapperShift {
                        lines: 1,
                        columns: 4,
                        first_line_only: false,
                    },
                )
            }
        }
    }

    /// Extracts the pattern root from the parsed scaffold.
    ///
    /// Returns `None` when the tree does not have the shape this hypothesis
    /// promises, which counts as a failed hypothesis even if the parse was
    /// clean.
    pub(crate) fn extract<'t>(
        self,
        root: tree_sitter::Node<'t>,
        source: &str,
    ) -> Option<PatternRoot<'t>> {
        match self {
            Self::BareExpression => {
                let statement = sole_named_child(root)?;
                if statement.kind() != "expression_statement" {
                    return None;
                }
                Some(PatternRoot::Single(sole_named_child(statement)?))
            }
            Self::BareItems => children_as_root(root),
            Self::RustExpression => {
                let body = body_block(first_named_child(root)?)?;
                Some(PatternRoot::Single(sole_named_child(body)?))
            }
            Self::RustStatements => children_as_root(body_block(first_named_child(root)?)?),
            Self::SequenceCall => {
                let call = find_sequence_call(root, source)?;
                let arguments = call.child_by_field_name("arguments")?;
                let children = named_children(arguments);
                if children.is_empty() {
                    return None;
                }
                Some(PatternRoot::Sequence(children))
            }
            Self::TypeAlias => {
                let item = first_named_child(root)?;
                let aliased = item
                    .child_by_field_name("type")
                    .or_else(|| item.child_by_field_name("value"))?;
                Some(PatternRoot::Single(aliased))
            }
            Self::ParenExpression => {
                let statement = sole_named_child(root)?;
                let paren = sole_named_child(statement)?;
                if paren.kind() != "parenthesized_expression" {
                    return None;
                }
                Some(PatternRoot::Single(sole_named_child(paren)?))
            }
            Self::PythonSuite | Self::FunctionBody => {
                children_as_root(body_block(first_named_child(root)?)?)
            }
        }
    }
}

fn prefixed(prefix: &str, encoded: &str, suffix: &str) -> (String, WrapperShift) {
    let columns = u32::try_from(prefix.len()).unwrap_or(u32::MAX);
    (
        format!("{prefix}{encoded}{suffix}"),
        WrapperShift {
            lines: 0,
            columns,
            first_line_only: true,
        },
    )
}

/// Rust statements need a trailing semicolon unless they already end with
/// one or with a closing brace.
fn statement_needs_semicolon(trimmed: &str) -> bool {
    !trimmed.is_empty() && !trimmed.ends_with(';') && !trimmed.ends_with('}')
}

/// Collects named, non-extra children (comments are extras).
pub(crate) fn named_children(node: tree_sitter::Node<'_>) -> Vec<tree_sitter::Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn first_named_child(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    named_children(node).into_iter().next()
}

fn sole_named_child(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    let children = named_children(node);
    if let [only] = children.as_slice() {
        Some(*only)
    } else {
        None
    }
}

fn children_as_root(node: tree_sitter::Node<'_>) -> Option<PatternRoot<'_>> {
    let children = named_children(node);
    if children.is_empty() {
        return None;
    }
    if let [only] = children.as_slice() {
        return Some(PatternRoot::Single(*only));
    }
    Some(PatternRoot::Sequence(children))
}

/// Locates a function body: the `body` field, or the first child whose kind
/// mentions "block".
fn body_block(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    node.child_by_field_name("body").or_else(|| {
        named_children(node)
            .into_iter()
            .find(|child| child.kind().contains("block"))
    })
}

/// Finds the synthetic `__syngrep_seq(…)` call inside a scaffold.
fn find_sequence_call<'t>(
    node: tree_sitter::Node<'t>,
    source: &str,
) -> Option<tree_sitter::Node<'t>> {
    if node.kind() == "call_expression" || node.kind() == "call" {
        let callee_text = node
            .child_by_field_name("function")
            .and_then(|callee| source.get(callee.byte_range()));
        if callee_text == Some(SEQUENCE_WRAPPER) {
            return Some(node);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_sequence_call(child, source) {
            return Some(found);
        }
    }

    None
}
