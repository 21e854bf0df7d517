//! Wildcard-aware structural unification.
//!
//! Unification compares a compiled pattern node against a candidate corpus
//! node. Node kinds must agree; significant anonymous tokens (operators and
//! keywords, but not separators or delimiters) must agree by text; named
//! children unify by the sequence rule, which lets any-count wildcards take
//! contiguous runs of siblings. Leaves compare by token text.
//!
//! Sequence alignment is greedy with backtracking: an any-count wildcard
//! first takes the minimal run that leaves enough candidates for the fixed
//! sub-patterns to its right, growing one element at a time when a later
//! element fails to unify. Leftmost-greedy is the canonical behaviour for
//! ambiguous splits.

use crate::hypothesis::named_children;
use crate::language::is_identifier_kind;
use crate::matcher::binding::MatchState;
use crate::parser::ParseResult;
use crate::pattern::CompiledPattern;
use crate::tokenizer::{WildcardInfo, WildcardTable, wildcard_id};

/// Stateless unification engine for one (pattern, corpus) pair.
///
/// All per-attempt mutable state lives in the [`MatchState`] passed through
/// the calls, so one unifier serves every attempt of a search.
pub(crate) struct Unifier<'p, 'a> {
    pattern_source: &'p str,
    corpus_source: &'a str,
    table: &'p WildcardTable,
    aggressive: bool,
}

impl<'p, 'a> Unifier<'p, 'a> {
    pub(crate) fn new(pattern: &'p CompiledPattern, corpus: &'a ParseResult) -> Self {
        Self {
            pattern_source: pattern.encoded().source(),
            corpus_source: corpus.source(),
            table: pattern.wildcards(),
            aggressive: pattern.is_aggressive(),
        }
    }

    /// Unifies a single pattern node with a single candidate node.
    pub(crate) fn unify_node(
        &self,
        pattern: tree_sitter::Node<'p>,
        candidate: tree_sitter::Node<'a>,
        state: &mut MatchState<'a>,
    ) -> bool {
        if let Some(info) = self.wildcard_of(pattern) {
            return self.bind_wildcard(info, candidate, state);
        }

        let candidate = self.skim(pattern, candidate);

        if pattern.kind_id() != candidate.kind_id() {
            return false;
        }
        if significant_tokens(pattern, self.pattern_source)
            != significant_tokens(candidate, self.corpus_source)
        {
            return false;
        }

        let pattern_children = named_children(pattern);
        let candidate_children = named_children(candidate);
        if pattern_children.is_empty() && candidate_children.is_empty() {
            return node_text(pattern, self.pattern_source)
                == node_text(candidate, self.corpus_source);
        }

        self.unify_sequence(&pattern_children, &candidate_children, state)
    }

    /// Unifies a pattern sequence with a candidate sequence.
    ///
    /// With no any-count wildcards this reduces to element-wise unification.
    pub(crate) fn unify_sequence(
        &self,
        patterns: &[tree_sitter::Node<'p>],
        candidates: &[tree_sitter::Node<'a>],
        state: &mut MatchState<'a>,
    ) -> bool {
        self.align(patterns, candidates, 0, 0, state)
    }

    fn align(
        &self,
        patterns: &[tree_sitter::Node<'p>],
        candidates: &[tree_sitter::Node<'a>],
        pattern_idx: usize,
        candidate_idx: usize,
        state: &mut MatchState<'a>,
    ) -> bool {
        let Some(pattern) = patterns.get(pattern_idx).copied() else {
            return candidate_idx == candidates.len();
        };

        if let Some(info) = self.wildcard_of(pattern).filter(|info| info.matches_any()) {
            // Minimal run first; grow on backtracking.
            for end in candidate_idx..=candidates.len() {
                let Some(run) = candidates.get(candidate_idx..end) else {
                    continue;
                };
                let mut trial = state.clone();
                if !trial.bind_nodes(info.name(), run) {
                    continue;
                }
                if self.align(patterns, candidates, pattern_idx + 1, end, &mut trial) {
                    *state = trial;
                    return true;
                }
            }
            return false;
        }

        let Some(candidate) = candidates.get(candidate_idx).copied() else {
            return false;
        };
        let mut trial = state.clone();
        if !self.unify_node(pattern, candidate, &mut trial) {
            return false;
        }
        if self.align(
            patterns,
            candidates,
            pattern_idx + 1,
            candidate_idx + 1,
            &mut trial,
        ) {
            *state = trial;
            return true;
        }
        false
    }

    /// Resolves a pattern node to its wildcard, if it is one.
    ///
    /// A wildcard used in statement position parses as an expression
    /// statement wrapping the reserved identifier; look through that wrapper.
    pub(crate) fn wildcard_of(&self, node: tree_sitter::Node<'p>) -> Option<&'p WildcardInfo> {
        if let Some(id) = wildcard_id(node_text(node, self.pattern_source)) {
            return self.table.get(id);
        }
        if node.kind() != "expression_statement" {
            return None;
        }
        let children = named_children(node);
        if let [only] = children.as_slice() {
            self.wildcard_of(*only)
        } else {
            None
        }
    }

    fn bind_wildcard(
        &self,
        info: &WildcardInfo,
        candidate: tree_sitter::Node<'a>,
        state: &mut MatchState<'a>,
    ) -> bool {
        if let Some(rx) = info.name_rx() {
            if !is_identifier_kind(candidate.kind()) {
                return false;
            }
            if !rx.is_match(node_text(candidate, self.corpus_source)) {
                return false;
            }
        }
        state.bind_single(info.name(), candidate)
    }

    /// In aggressive mode, looks through candidate parentheses the pattern
    /// does not itself spell out.
    fn skim(&self, pattern: tree_sitter::Node<'p>, candidate: tree_sitter::Node<'a>) -> tree_sitter::Node<'a> {
        if !self.aggressive {
            return candidate;
        }
        let mut current = candidate;
        while current.kind() == "parenthesized_expression"
            && pattern.kind_id() != current.kind_id()
        {
            let children = named_children(current);
            let [only] = children.as_slice() else { break };
            current = *only;
        }
        current
    }
}

/// Returns the source text a node spans.
#[must_use]
pub(crate) fn node_text<'s>(node: tree_sitter::Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Recursive structural equality between two corpus subtrees.
///
/// Used for wildcard name consistency: all occurrences of the same wildcard
/// name within one match must denote structurally identical subtrees, not
/// merely textually identical ones.
#[must_use]
pub(crate) fn nodes_equal(source: &str, a: tree_sitter::Node<'_>, b: tree_sitter::Node<'_>) -> bool {
    if a.id() == b.id() {
        return true;
    }
    if a.kind_id() != b.kind_id() {
        return false;
    }
    if significant_tokens(a, source) != significant_tokens(b, source) {
        return false;
    }

    let a_children = named_children(a);
    let b_children = named_children(b);
    if a_children.is_empty() && b_children.is_empty() {
        return node_text(a, source) == node_text(b, source);
    }

    a_children.len() == b_children.len()
        && a_children
            .iter()
            .zip(b_children.iter())
            .all(|(x, y)| nodes_equal(source, *x, *y))
}

/// Collects the anonymous tokens that carry structure: operators, keywords,
/// and other fixed spellings, excluding separators and delimiters.
///
/// Separators are excluded so an any-count wildcard can take an empty run
/// between fixed elements without tripping over a leftover comma.
fn significant_tokens<'s>(node: tree_sitter::Node<'_>, source: &'s str) -> Vec<&'s str> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_named() && !child.is_extra())
        .map(|child| node_text(child, source))
        .filter(|text| !is_separator(text))
        .collect()
}

fn is_separator(token: &str) -> bool {
    matches!(
        token,
        "(" | ")" | "[" | "]" | "{" | "}" | "," | ";" | "." | ":" | "::" | "->" | "=>"
    )
}
