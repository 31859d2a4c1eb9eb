//! Minimal term/literal/signature model.
//!
//! `spec.md` §1 puts the clause AST, term representation and ordering
//! out of scope — they are external collaborators the data layer only
//! calls through the interface listed in §6
//! (`ClauseLiteralNumber`, `ClauseCompareFun`, `ClauseIsTautology`, ...).
//! This module is the minimal stand-in needed to make the crate
//! self-contained and testable; a real integration would replace it with
//! the prover's own term bank and keep the `ClauseInfo` surface on
//! [`crate::clause::Clause`] as the seam.

use std::collections::BTreeSet;
use std::fmt;

/// A first-order term: either a variable or an applied function symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Var(u32),
    App(String, Vec<Term>),
}

impl Term {
    pub fn var(id: u32) -> Self {
        Term::Var(id)
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Term::App(name.into(), Vec::new())
    }

    pub fn app(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::App(name.into(), args)
    }

    pub fn collect_variables(&self, out: &mut BTreeSet<u32>) {
        match self {
            Term::Var(v) => {
                out.insert(*v);
            }
            Term::App(_, args) => {
                for a in args {
                    a.collect_variables(out);
                }
            }
        }
    }

    pub fn add_symbol_distribution(&self, dist: &mut std::collections::HashMap<String, u64>) {
        if let Term::App(name, args) = self {
            *dist.entry(name.clone()).or_insert(0) += 1;
            for a in args {
                a.add_symbol_distribution(dist);
            }
        }
    }

    fn head_symbol(&self) -> Option<&str> {
        match self {
            Term::App(name, _) => Some(name),
            Term::Var(_) => None,
        }
    }

    fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Term::Var(_) => false,
            Term::App(n, args) => n == name || args.iter().any(|a| a.contains_symbol(name)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "X{v}"),
            Term::App(name, args) if args.is_empty() => write!(f, "{name}"),
            Term::App(name, args) => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Which side of a unit equation a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqnSide {
    Left,
    Right,
}

/// A single literal: either a plain atom (`p(t1,...,tn)`) or an equation
/// (`l = r` / `l != r`), positive or negative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub positive: bool,
    pub is_equation: bool,
    pub lterm: Term,
    /// Only meaningful when `is_equation` is true; `Term::atom("$true")`
    /// placeholder unused for plain atoms.
    pub rterm: Term,
    /// Set by `ClauseSetMarkMaximalTerms`'s counterpart; not consulted
    /// by anything else in this crate besides the maximal-term marker
    /// itself, mirroring the original's orientation flag on literals.
    pub oriented: bool,
}

impl Literal {
    pub fn atom(positive: bool, predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            positive,
            is_equation: false,
            lterm: Term::app(predicate, args),
            rterm: Term::atom("$unused"),
            oriented: false,
        }
    }

    pub fn equation(positive: bool, lterm: Term, rterm: Term) -> Self {
        Self {
            positive,
            is_equation: true,
            lterm,
            rterm,
            oriented: false,
        }
    }

    /// True for a *unit* equation's complementary side check: `l = l`
    /// under this literal's exact (unrenamed) syntax.
    pub fn is_reflexive(&self) -> bool {
        self.is_equation && self.positive && self.lterm == self.rterm
    }

    /// Structural complement check: same atom, opposite polarity. This
    /// stands in for the original's variant/unification-aware check;
    /// good enough for the deterministic, ground-ish clauses this layer
    /// is tested with.
    pub fn is_complement_of(&self, other: &Literal) -> bool {
        self.positive != other.positive
            && self.is_equation == other.is_equation
            && self.lterm == other.lterm
            && self.rterm == other.rterm
    }

    pub fn weight(&self) -> u64 {
        fn term_weight(t: &Term) -> u64 {
            match t {
                Term::Var(_) => 1,
                Term::App(_, args) => 1 + args.iter().map(term_weight).sum::<u64>(),
            }
        }
        let base = term_weight(&self.lterm);
        if self.is_equation {
            base + term_weight(&self.rterm)
        } else {
            base
        }
    }
}

/// A function or predicate symbol entry in a [`Signature`].
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: String,
    pub arity: usize,
    pub is_predicate: bool,
}

/// The symbol table used by [`crate::eqaxioms::EqAxiomPrinter`]. Mirrors
/// `Sig_p` from the original closely enough to reproduce its axiom
/// enumeration: the first `internal_symbols` entries (the equality
/// predicate itself, in the original) are skipped when generating
/// substitutivity axioms.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    pub internal_symbols: usize,
    symbols: Vec<SymbolInfo>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, name: impl Into<String>, arity: usize) {
        self.symbols.push(SymbolInfo {
            name: name.into(),
            arity,
            is_predicate: false,
        });
    }

    pub fn add_predicate(&mut self, name: impl Into<String>, arity: usize) {
        self.symbols.push(SymbolInfo {
            name: name.into(),
            arity,
            is_predicate: true,
        });
    }

    /// Non-internal symbols with arity > 0 (arity-0 symbols have no
    /// substitutivity axiom, exactly as in the original: `if((arity =
    /// SigFindArity(sig, i)))` skips the zero case).
    pub fn user_symbols(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.symbols
            .iter()
            .skip(self.internal_symbols)
            .filter(|s| s.arity > 0)
    }
}

pub(crate) use self::helpers::*;
mod helpers {
    use super::*;

    /// `ClauseIsEqDefinition`: detect `f(X1,...,Xn) = t` (or the mirror
    /// image) where `f` has at least `min_arity` pairwise-distinct
    /// variable arguments and `t` does not mention `f` itself. Returns
    /// the side the definition is oriented on, if any.
    pub fn eq_definition_side(lit: &Literal, min_arity: usize) -> Option<EqnSide> {
        if !lit.is_equation || !lit.positive {
            return None;
        }
        if is_definitional_head(&lit.lterm, &lit.rterm, min_arity) {
            return Some(EqnSide::Left);
        }
        if is_definitional_head(&lit.rterm, &lit.lterm, min_arity) {
            return Some(EqnSide::Right);
        }
        None
    }

    fn is_definitional_head(head: &Term, body: &Term, min_arity: usize) -> bool {
        let Term::App(name, args) = head else {
            return false;
        };
        if args.len() < min_arity {
            return false;
        }
        let mut seen = BTreeSet::new();
        for a in args {
            match a {
                Term::Var(v) => {
                    if !seen.insert(*v) {
                        return false; // repeated variable argument
                    }
                }
                Term::App(..) => return false, // not a flat pattern
            }
        }
        !body.contains_symbol(name)
    }
}
