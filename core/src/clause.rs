//! The clause: literals, parent links, bookkeeping flags, and the
//! evaluation slots a [`crate::clause_set::ClauseSet`] indexes it under.

use std::collections::BTreeSet;

use crate::eval::EvalKey;
use crate::term::{eq_definition_side, EqnSide, Literal};

/// Stable, never-reused identity for a clause. Survives extraction and
/// reinsertion into a [`crate::clause_set::ClauseSet`]; used for
/// `find_by_id`, parent links, and to break ties in
/// [`crate::eval::OrderedEvalTree`]. Contrast with
/// [`crate::clause_set::ClauseRef`], the arena slot a clause currently
/// occupies, which *does* change on reinsertion.
pub type ClauseIdent = u64;

/// Bookkeeping flags a clause carries. `spec.md` §6 asks for "a bitflag
/// property set with at least `DeleteClause`, `DIndexed`, `SIndexed`,
/// `IsSOS`"; none of the example repos in this retrieval pack depend on
/// the `bitflags` crate, so this is a small hand-rolled bitset over a
/// `u8`, in the same spirit as the teacher's own hand-rolled small types
/// (`lbool`, `Lit`, `Var`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseFlags(u8);

impl ClauseFlags {
    pub const DELETE_CLAUSE: ClauseFlags = ClauseFlags(1 << 0);
    pub const D_INDEXED: ClauseFlags = ClauseFlags(1 << 1);
    pub const S_INDEXED: ClauseFlags = ClauseFlags(1 << 2);
    pub const IS_SOS: ClauseFlags = ClauseFlags(1 << 3);

    pub const fn empty() -> Self {
        ClauseFlags(0)
    }

    pub fn contains(self, flag: ClauseFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn set(&mut self, flag: ClauseFlags) {
        self.0 |= flag.0;
    }

    pub fn clear(&mut self, flag: ClauseFlags) {
        self.0 &= !flag.0;
    }
}

impl std::ops::BitOr for ClauseFlags {
    type Output = ClauseFlags;
    fn bitor(self, rhs: ClauseFlags) -> ClauseFlags {
        ClauseFlags(self.0 | rhs.0)
    }
}

/// A clause: a disjunction of [`Literal`]s plus the bookkeeping a
/// saturation loop needs to track it through a [`crate::clause_set::ClauseSet`].
#[derive(Debug, Clone)]
pub struct Clause {
    pub ident: ClauseIdent,
    pub literals: Vec<Literal>,
    pub flags: ClauseFlags,
    /// Identifiers of the clauses this one was derived from. Empty for
    /// an input (axiom) clause.
    pub parents: BTreeSet<ClauseIdent>,
    /// The `(EvalKey, eval_index)` pairs this clause is currently
    /// registered under in its owning set's eval trees, in the order
    /// `ClauseSet::insert` registered them. Mirrors the original's
    /// `clause->evaluations` linked chain.
    pub evaluations: Vec<EvalKey>,
    /// Creation-order date stamp, set by `ClauseSet::insert`.
    pub date: u64,
    /// `None` while not a member of any set; `Some` mirrors the
    /// original's `clause->set` back-pointer, collapsed to a flag
    /// because this layer never needs to reach back into the set from
    /// the clause itself.
    pub attached: bool,
}

impl Clause {
    /// Construct a fresh, unattached clause with the given identity and
    /// literals. `date`/`evaluations`/`flags` start out empty; a
    /// [`crate::clause_set::ClauseSet`] fills in `date` on insert.
    pub fn new(ident: ClauseIdent, literals: Vec<Literal>) -> Self {
        Self {
            ident,
            literals,
            flags: ClauseFlags::empty(),
            parents: BTreeSet::new(),
            evaluations: Vec::new(),
            date: 0,
            attached: false,
        }
    }

    pub fn with_parents(mut self, parents: impl IntoIterator<Item = ClauseIdent>) -> Self {
        self.parents = parents.into_iter().collect();
        self
    }

    /// `ClauseLiteralNumber`.
    pub fn literal_number(&self) -> usize {
        self.literals.len()
    }

    /// `ClauseIsUnit`.
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// `ClauseIsEmpty`.
    pub fn is_empty_clause(&self) -> bool {
        self.literals.is_empty()
    }

    /// `ClauseStandardWeight`: symbol count summed over all literals.
    /// Used both by `find_best`/`find_heaviest` callers as a default
    /// heuristic and by `ClauseSetSort`.
    pub fn standard_weight(&self) -> u64 {
        self.literals.iter().map(Literal::weight).sum()
    }

    /// `ClauseIsTrivial`: contains `t = t` for some `t` (a reflexive
    /// positive equation literal).
    pub fn is_trivial(&self) -> bool {
        self.literals.iter().any(Literal::is_reflexive)
    }

    /// `ClauseIsTautology`: contains a literal and its structural
    /// complement. O(n^2) in literal count, matching the original's
    /// pairwise scan.
    pub fn is_tautology(&self) -> bool {
        for (i, l) in self.literals.iter().enumerate() {
            for r in &self.literals[i + 1..] {
                if l.is_complement_of(r) {
                    return true;
                }
            }
        }
        false
    }

    /// `ClauseCompareFun`: a deterministic total order used by
    /// `ClauseSetMarkCopies` to detect duplicates. Compares by literal
    /// count, then lexicographically by literal.
    pub fn compare(&self, other: &Clause) -> std::cmp::Ordering {
        self.literals
            .len()
            .cmp(&other.literals.len())
            .then_with(|| self.literals.cmp(&other.literals))
    }

    /// Whether `self` and `other` are copies under [`Self::compare`]
    /// (used by `ClauseSetMarkCopies`/`delete_copies`).
    pub fn is_copy_of(&self, other: &Clause) -> bool {
        self.compare(other) == std::cmp::Ordering::Equal
    }

    /// `ClauseParentsAreSubset`: are `self`'s parents a subset of
    /// `other`'s? Used by duplicate elimination to decide which clause's
    /// parent links to keep.
    pub fn parents_are_subset(&self, other: &Clause) -> bool {
        self.parents.is_subset(&other.parents)
    }

    /// `ClauseDetachParents`: clear the parent-link set. Used when a
    /// kept duplicate's parents are not a superset of the discarded
    /// clause's.
    pub fn detach_parents(&mut self) {
        self.parents.clear();
    }

    /// `ClauseIsEqDefinition`: is some literal an equational definition
    /// with head arity at least `min_arity`? Returns the defining
    /// literal's index and which side the pattern occupies.
    pub fn find_eq_definition(&self, min_arity: usize) -> Option<(usize, EqnSide)> {
        self.literals
            .iter()
            .enumerate()
            .find_map(|(i, lit)| eq_definition_side(lit, min_arity).map(|side| (i, side)))
    }

    /// `ClauseCollectVariables`.
    pub fn collect_variables(&self) -> BTreeSet<u32> {
        let mut out = BTreeSet::new();
        for lit in &self.literals {
            lit.lterm.collect_variables(&mut out);
            if lit.is_equation {
                lit.rterm.collect_variables(&mut out);
            }
        }
        out
    }

    /// `ClauseMaxVarNumber`, used by `ClauseSetMaxVarNumber`.
    pub fn max_var_number(&self) -> Option<u32> {
        self.collect_variables().into_iter().next_back()
    }

    /// `ClauseAddSymbolDistribution`: fold this clause's symbol
    /// occurrences into the running histogram `ClauseSetAddSymbolDistribution`
    /// forwards through.
    pub fn add_symbol_distribution(&self, dist: &mut std::collections::HashMap<String, u64>) {
        for lit in &self.literals {
            lit.lterm.add_symbol_distribution(dist);
            if lit.is_equation {
                lit.rterm.add_symbol_distribution(dist);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn pred(name: &str, positive: bool) -> Literal {
        Literal::atom(positive, name, vec![Term::var(0)])
    }

    #[test]
    fn flags_set_clear_and_contains_roundtrip() {
        let mut flags = ClauseFlags::empty();
        assert!(!flags.contains(ClauseFlags::IS_SOS));
        flags.set(ClauseFlags::IS_SOS);
        flags.set(ClauseFlags::D_INDEXED);
        assert!(flags.contains(ClauseFlags::IS_SOS));
        assert!(flags.contains(ClauseFlags::D_INDEXED));
        assert!(!flags.contains(ClauseFlags::S_INDEXED));
        flags.clear(ClauseFlags::IS_SOS);
        assert!(!flags.contains(ClauseFlags::IS_SOS));
        assert!(flags.contains(ClauseFlags::D_INDEXED));
    }

    #[test]
    fn tautology_detects_complementary_literals() {
        let clause = Clause::new(1, vec![pred("p", true), pred("p", false)]);
        assert!(clause.is_tautology());
        let clause = Clause::new(2, vec![pred("p", true), pred("q", false)]);
        assert!(!clause.is_tautology());
    }

    #[test]
    fn trivial_detects_reflexive_equation() {
        let refl = Literal::equation(true, Term::var(0), Term::var(0));
        let clause = Clause::new(1, vec![refl]);
        assert!(clause.is_trivial());

        let non_refl = Literal::equation(true, Term::var(0), Term::var(1));
        let clause = Clause::new(2, vec![non_refl]);
        assert!(!clause.is_trivial());
    }

    #[test]
    fn standard_weight_counts_symbols() {
        let clause = Clause::new(1, vec![Literal::atom(true, "p", vec![Term::atom("a")])]);
        // p(a): predicate symbol (1) + constant a (1) = 2
        assert_eq!(clause.standard_weight(), 2);
    }

    #[test]
    fn is_copy_of_ignores_identity_and_order_of_construction() {
        let a = Clause::new(1, vec![pred("p", true)]);
        let b = Clause::new(2, vec![pred("p", true)]);
        assert!(a.is_copy_of(&b));
        let c = Clause::new(3, vec![pred("p", false)]);
        assert!(!a.is_copy_of(&c));
    }

    #[test]
    fn parents_subset_and_detach() {
        let mut a = Clause::new(1, vec![]).with_parents([10, 20]);
        let b = Clause::new(2, vec![]).with_parents([10, 20, 30]);
        assert!(a.parents_are_subset(&b));
        assert!(!b.parents_are_subset(&a));
        a.detach_parents();
        assert!(a.parents.is_empty());
    }

    #[test]
    fn eq_definition_requires_distinct_variable_arguments() {
        let good = Literal::equation(
            true,
            Term::app("f", vec![Term::var(0), Term::var(1)]),
            Term::var(2),
        );
        let clause = Clause::new(1, vec![good]);
        assert_eq!(clause.find_eq_definition(2), Some((0, EqnSide::Left)));

        let repeated_var = Literal::equation(
            true,
            Term::app("g", vec![Term::var(0), Term::var(0)]),
            Term::var(1),
        );
        let clause = Clause::new(2, vec![repeated_var]);
        assert_eq!(clause.find_eq_definition(2), None);
    }

    #[test]
    fn collect_variables_covers_both_equation_sides() {
        let lit = Literal::equation(true, Term::var(3), Term::var(1));
        let clause = Clause::new(1, vec![lit]);
        let vars = clause.collect_variables();
        assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(clause.max_var_number(), Some(3));
    }
}
