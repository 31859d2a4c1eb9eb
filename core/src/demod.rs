//! Facade over the demodulator (rewrite) index.
//!
//! `spec.md` §2/§4.4 names this component but puts the PD-tree structure
//! itself out of scope ("a perfect discrimination tree keyed on term
//! structure is a large subsystem in its own right"). [`DemodIndex`] is
//! the seam [`crate::clause_set::ClauseSet`] calls through on
//! `indexed_insert`/`extract`; [`HeadSymbolDemodIndex`] is a minimal
//! stand-in implementation (bucketed by a unit equation side's head
//! symbol) good enough to exercise and test that seam without building
//! the real discrimination tree.

use fnv::FnvHashMap;

use crate::clause_set::ClauseRef;
use crate::term::{EqnSide, Term};

/// What a [`crate::clause_set::ClauseSet`] needs from a demodulator
/// index: register or deregister one side of a unit equation clause
/// under the term it rewrites from.
pub trait DemodIndex {
    fn insert(&mut self, cref: ClauseRef, side_term: &Term, side: EqnSide);
    fn remove(&mut self, cref: ClauseRef, side_term: &Term, side: EqnSide);
}

fn head_symbol(term: &Term) -> Option<&str> {
    match term {
        Term::App(name, _) => Some(name.as_str()),
        Term::Var(_) => None,
    }
}

/// Buckets registered sides by the rewritten term's head symbol. Not a
/// real discrimination tree (no argument-structure narrowing), but
/// enough to answer "which clauses could possibly rewrite a term headed
/// by symbol `f`" the way the real PD-tree's top-level dispatch does.
#[derive(Debug, Default)]
pub struct HeadSymbolDemodIndex {
    buckets: FnvHashMap<String, Vec<(ClauseRef, EqnSide)>>,
}

impl HeadSymbolDemodIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self, symbol: &str) -> &[(ClauseRef, EqnSide)] {
        self.buckets
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DemodIndex for HeadSymbolDemodIndex {
    fn insert(&mut self, cref: ClauseRef, side_term: &Term, side: EqnSide) {
        let Some(symbol) = head_symbol(side_term) else {
            return; // a bare variable rewrites nothing; nothing to index
        };
        self.buckets
            .entry(symbol.to_owned())
            .or_default()
            .push((cref, side));
    }

    fn remove(&mut self, cref: ClauseRef, side_term: &Term, side: EqnSide) {
        let Some(symbol) = head_symbol(side_term) else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(symbol) {
            bucket.retain(|&(c, s)| !(c == cref && s == side));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause_set::ClauseSet;

    fn cref(n: usize) -> ClauseRef {
        // ClauseRef's field is private; round-trip one through a real
        // set instead of constructing it directly.
        let mut set = ClauseSet::new();
        let mut last = None;
        for i in 0..=n {
            last = Some(set.insert(crate::clause::Clause::new(
                i as u64,
                vec![crate::term::Literal::atom(true, "p", vec![])],
            )));
        }
        last.unwrap()
    }

    #[test]
    fn insert_buckets_by_head_symbol_of_each_side() {
        let mut index = HeadSymbolDemodIndex::new();
        let c = cref(0);
        let lhs = Term::app("f", vec![Term::var(0)]);
        let rhs = Term::app("g", vec![Term::var(0)]);
        index.insert(c, &lhs, EqnSide::Left);
        index.insert(c, &rhs, EqnSide::Right);
        assert_eq!(index.len(), 2);
        assert_eq!(index.candidates("f").to_vec(), vec![(c, EqnSide::Left)]);
        assert_eq!(index.candidates("g").to_vec(), vec![(c, EqnSide::Right)]);
    }

    #[test]
    fn bare_variable_side_is_not_indexed() {
        let mut index = HeadSymbolDemodIndex::new();
        index.insert(cref(0), &Term::var(0), EqnSide::Left);
        assert!(index.is_empty());
    }

    #[test]
    fn remove_clears_exactly_the_registered_position() {
        let mut index = HeadSymbolDemodIndex::new();
        let c1 = cref(0);
        let c2 = cref(1);
        let lhs = Term::app("f", vec![]);
        index.insert(c1, &lhs, EqnSide::Left);
        index.insert(c2, &lhs, EqnSide::Left);
        index.remove(c1, &lhs, EqnSide::Left);
        assert_eq!(index.candidates("f").to_vec(), vec![(c2, EqnSide::Left)]);
    }
}
