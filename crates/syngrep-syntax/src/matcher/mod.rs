//! Pattern matching engine for finding code structures.
//!
//! The search walks every named node of a corpus tree in pre-order. Single
//! patterns get one unification attempt per node; sequence patterns get one
//! attempt per sequence container (call arguments, statement blocks, file
//! roots, …) against the container's full child sequence. Every attempt
//! starts from a fresh binding state, matching is never exclusive, and
//! overlapping or nested matches are all reported.

mod binding;
mod unify;

use std::ops::Range;

use crate::hypothesis::named_children;
use crate::parser::ParseResult;
use crate::pattern::{CompiledPattern, PatternRoot};
use crate::position::{Position, point_to_position};

pub use binding::{Bindings, BoundValue};

use binding::MatchState;
use unify::Unifier;

/// A successful match of a pattern against a corpus subtree.
///
/// Borrows from the corpus tree, which stays immutable for the duration of a
/// search.
#[derive(Debug)]
pub struct Match<'a> {
    anchor: tree_sitter::Node<'a>,
    nodes: Vec<tree_sitter::Node<'a>>,
    source: &'a str,
    bindings: Bindings<'a>,
}

impl<'a> Match<'a> {
    /// Returns the matched node.
    ///
    /// For a sequence match this is the container whose children matched;
    /// the individual siblings are available from [`Match::nodes`].
    #[must_use]
    pub const fn node(&self) -> tree_sitter::Node<'a> {
        self.anchor
    }

    /// Returns the matched nodes: one for a single-node match, the full
    /// sibling sequence for a sequence match (empty if an any-count wildcard
    /// matched an empty sequence).
    #[must_use]
    pub fn nodes(&self) -> &[tree_sitter::Node<'a>] {
        &self.nodes
    }

    /// Returns the byte range the match covers in the corpus source.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => first.start_byte()..last.end_byte(),
            _ => {
                let at = self.anchor.start_byte();
                at..at
            }
        }
    }

    /// Returns the source text the match covers.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.source.get(self.byte_range()).unwrap_or_default()
    }

    /// Returns the one-based position where the match starts.
    #[must_use]
    pub fn start_position(&self) -> Position {
        let point = self
            .nodes
            .first()
            .map_or_else(|| self.anchor.start_position(), |node| node.start_position());
        point_to_position(point)
    }

    /// Returns the wildcard bindings of this match.
    #[must_use]
    pub const fn bindings(&self) -> &Bindings<'a> {
        &self.bindings
    }
}

/// Finds every subtree of `corpus` that structurally matches `pattern`.
///
/// Matching cannot fail: a malformed pattern is rejected at compile time and
/// an unmatched node is simply absent from the result. Searching trees of a
/// different language than the pattern yields no matches.
#[must_use]
pub fn search<'a>(pattern: &CompiledPattern, corpus: &'a ParseResult) -> Vec<Match<'a>> {
    if pattern.language() != corpus.language() {
        tracing::warn!(
            pattern = %pattern.language(),
            corpus = %corpus.language(),
            "language mismatch between pattern and corpus"
        );
        return Vec::new();
    }

    let root = pattern.root();
    let unifier = Unifier::new(pattern, corpus);
    let mut matches = Vec::new();
    collect(corpus.root_node(), &root, &unifier, corpus, &mut matches);
    tracing::debug!(count = matches.len(), "search finished");
    matches
}

impl CompiledPattern {
    /// Finds all matches of this pattern in the parsed corpus.
    ///
    /// Equivalent to [`search`]; provided for call-site convenience.
    #[must_use]
    pub fn search<'a>(&self, corpus: &'a ParseResult) -> Vec<Match<'a>> {
        search(self, corpus)
    }
}

fn collect<'p, 'a>(
    node: tree_sitter::Node<'a>,
    root: &PatternRoot<'p>,
    unifier: &Unifier<'p, 'a>,
    corpus: &'a ParseResult,
    matches: &mut Vec<Match<'a>>,
) {
    if node.is_named() && !node.is_extra() {
        match root {
            PatternRoot::Single(pattern) => {
                let mut state = MatchState::new(corpus.source());
                if unifier.unify_node(*pattern, node, &mut state) {
                    matches.push(Match {
                        anchor: node,
                        nodes: vec![node],
                        source: corpus.source(),
                        bindings: state.into_bindings(),
                    });
                }
            }
            PatternRoot::Sequence(patterns) => {
                if corpus.language().is_sequence_container(node.kind()) {
                    let children = named_children(node);
                    let mut state = MatchState::new(corpus.source());
                    if unifier.unify_sequence(patterns, &children, &mut state) {
                        matches.push(Match {
                            anchor: node,
                            nodes: children,
                            source: corpus.source(),
                            bindings: state.into_bindings(),
                        });
                    }
                }
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, root, unifier, corpus, matches);
    }
}
