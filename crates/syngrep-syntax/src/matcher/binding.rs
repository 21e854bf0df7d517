//! Per-attempt wildcard bindings.
//!
//! Bindings map wildcard names (excluding `_`) to the corpus subtrees they
//! matched. A [`MatchState`] lives for exactly one unification attempt: it is
//! cloned for trial sub-matches and committed only when the whole attempt
//! succeeds, so a failed attempt never leaks partial bindings.

use std::collections::HashMap;

use crate::matcher::unify::{node_text, nodes_equal};

/// A value bound to a wildcard name.
#[derive(Debug, Clone)]
pub enum BoundValue<'a> {
    /// A single-node binding (`$name`).
    Single(tree_sitter::Node<'a>),
    /// A run of sequence siblings bound by an any-count wildcard (`$*name`).
    /// The run may be empty.
    Nodes(Vec<tree_sitter::Node<'a>>),
}

/// Wildcard bindings of a successful match.
///
/// Returned as match metadata for embedding callers; the command-line tool
/// only prints matched nodes.
#[derive(Debug, Clone)]
pub struct Bindings<'a> {
    source: &'a str,
    inner: HashMap<String, BoundValue<'a>>,
}

impl<'a> Bindings<'a> {
    /// Looks up the value bound to a wildcard name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoundValue<'a>> {
        self.inner.get(name)
    }

    /// Returns the source text covered by a binding.
    ///
    /// An empty any-count run yields an empty string; an unknown name yields
    /// `None`.
    #[must_use]
    pub fn text_of(&self, name: &str) -> Option<&'a str> {
        match self.inner.get(name)? {
            BoundValue::Single(node) => Some(node_text(*node, self.source)),
            BoundValue::Nodes(nodes) => {
                let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
                    return Some("");
                };
                Some(
                    self.source
                        .get(first.start_byte()..last.end_byte())
                        .unwrap_or_default(),
                )
            }
        }
    }

    /// Returns whether no wildcard bound a name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over bound names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

/// Mutable binding state scoped to one unification attempt.
#[derive(Debug, Clone)]
pub(crate) struct MatchState<'a> {
    source: &'a str,
    inner: HashMap<String, BoundValue<'a>>,
}

impl<'a> MatchState<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: HashMap::new(),
        }
    }

    /// Binds a single node, or checks consistency against an earlier binding
    /// of the same name. `_` always succeeds and binds nothing.
    pub(crate) fn bind_single(&mut self, name: &str, node: tree_sitter::Node<'a>) -> bool {
        if name == "_" {
            return true;
        }
        match self.inner.get(name) {
            None => {
                self.inner.insert(name.to_owned(), BoundValue::Single(node));
                true
            }
            Some(BoundValue::Single(prev)) => nodes_equal(self.source, *prev, node),
            Some(BoundValue::Nodes(_)) => false,
        }
    }

    /// Binds an any-count run, or checks consistency against an earlier
    /// binding of the same name.
    pub(crate) fn bind_nodes(&mut self, name: &str, nodes: &[tree_sitter::Node<'a>]) -> bool {
        if name == "_" {
            return true;
        }
        match self.inner.get(name) {
            None => {
                self.inner
                    .insert(name.to_owned(), BoundValue::Nodes(nodes.to_vec()));
                true
            }
            Some(BoundValue::Nodes(prev)) => {
                prev.len() == nodes.len()
                    && prev
                        .iter()
                        .zip(nodes.iter())
                        .all(|(a, b)| nodes_equal(self.source, *a, *b))
            }
            Some(BoundValue::Single(_)) => false,
        }
    }

    pub(crate) fn into_bindings(self) -> Bindings<'a> {
        Bindings {
            source: self.source,
            inner: self.inner,
        }
    }
}
