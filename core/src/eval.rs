//! Balanced ordered multiset of `(evaluation-key, clause)` pairs, used to
//! select the "best" (smallest-key) clause under a given heuristic.
//!
//! `spec.md` §4.2 leaves the internal algorithm unspecified ("any
//! self-balancing tree suffices provided all operations are O(log n)").
//! The standard library's `BTreeMap` is the idiomatic choice here — it is
//! the self-balancing ordered tree the rest of the Rust ecosystem reaches
//! for (see e.g. `near-sdk`'s `tree_map.rs` or the various `btree*`
//! examples in the broader retrieval pack) and gives every required
//! operation at the required complexity for free.

use std::collections::BTreeMap;

/// A heuristic score attached to a clause, used to order selection.
/// Represented as a tuple so ties within a slot can still be broken
/// deterministically; `spec.md` §3 calls this "a pair or tuple".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvalKey(pub i64, pub i64);

impl EvalKey {
    pub fn new(primary: i64, secondary: i64) -> Self {
        Self(primary, secondary)
    }
}

/// Stable per-clause identity used to break ties between equal
/// [`EvalKey`]s (multiple clauses may legitimately share a score) and as
/// the sole key for `extract`. Re-exported from [`crate::clause`], which
/// owns the canonical definition.
pub type ClauseIdent = crate::clause::ClauseIdent;

/// An ordered multimap from `(EvalKey, ClauseIdent)` to an opaque value
/// (the clause's set-local handle), keeping entries totally ordered and
/// unique by construction (`BTreeMap`'s key already includes the
/// tie-breaking identity).
#[derive(Debug, Default)]
pub struct OrderedEvalTree<V> {
    tree: BTreeMap<(EvalKey, ClauseIdent), V>,
}

impl<V> OrderedEvalTree<V> {
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert `(key, ident) -> value`. Panics (via `debug_assert`) if the
    /// pair is already present — `spec.md` §4.2 defines `insert` as
    /// failing on a duplicate, and a duplicate here is always a
    /// programmer error (the same clause registered twice under the same
    /// slot).
    pub fn insert(&mut self, key: EvalKey, ident: ClauseIdent, value: V) {
        let prior = self.tree.insert((key, ident), value);
        debug_assert!(
            prior.is_none(),
            "OrderedEvalTree::insert: (key, ident) pair already present"
        );
    }

    /// Remove and return the value registered under `(key, ident)`, or
    /// `None` if absent.
    pub fn extract(&mut self, key: EvalKey, ident: ClauseIdent) -> Option<V> {
        self.tree.remove(&(key, ident))
    }

    /// The value with the smallest `(EvalKey, ClauseIdent)` pair, or
    /// `None` if the tree is empty. Never removes the entry.
    pub fn find_smallest(&self) -> Option<&V> {
        self.tree.values().next()
    }

    pub fn find_smallest_key(&self) -> Option<(EvalKey, ClauseIdent)> {
        self.tree.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(EvalKey, ClauseIdent), &V)> {
        self.tree.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_smallest_is_none_on_empty_tree() {
        let tree: OrderedEvalTree<&str> = OrderedEvalTree::new();
        assert_eq!(tree.find_smallest(), None);
    }

    #[test]
    fn find_smallest_breaks_ties_by_ident() {
        let mut tree = OrderedEvalTree::new();
        tree.insert(EvalKey::new(1, 0), 5, "five");
        tree.insert(EvalKey::new(1, 0), 2, "two");
        tree.insert(EvalKey::new(0, 0), 9, "zero-key");
        assert_eq!(tree.find_smallest(), Some(&"zero-key"));
        tree.extract(EvalKey::new(0, 0), 9);
        assert_eq!(tree.find_smallest(), Some(&"two"));
    }

    #[test]
    fn extract_removes_exactly_the_given_pair() {
        let mut tree = OrderedEvalTree::new();
        tree.insert(EvalKey::new(3, 0), 1, "a");
        tree.insert(EvalKey::new(3, 0), 2, "b");
        assert_eq!(tree.extract(EvalKey::new(3, 0), 1), Some("a"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.extract(EvalKey::new(3, 0), 1), None);
    }

    #[test]
    fn eval_key_orders_lexicographically() {
        assert!(EvalKey::new(0, 5) < EvalKey::new(1, 0));
        assert!(EvalKey::new(1, 0) < EvalKey::new(1, 1));
    }
}
