//! Printer for the equality axioms a saturation prover needs once it
//! starts treating `=` as an interpreted predicate rather than an
//! ordinary one: reflexivity, symmetry, transitivity, plus one
//! substitutivity axiom per argument position (or one axiom covering the
//! whole arity, in `single_subst` mode) of every non-internal function
//! and predicate symbol in a [`Signature`].
//!
//! Grounded on `original_source/CLAUSES/ccl_clausesets.c`'s `EqAxiomsPrint`,
//! `eq_func_axiom_print`/`eq_pred_axiom_print` (its LOP format) and
//! `tptp_eq_func_axiom_print`/`tptp_eq_pred_axiom_print` (its TPTP format),
//! which branch on a process-global `TPTPFormatPrint` flag and a
//! `single_subst` parameter. `spec.md` §9 calls the global flag out as a
//! design wart; here both `format` and `single_subst` are explicit fields
//! on [`EqAxiomPrinter`] instead. The emitted strings are copied
//! character-for-character from the original's `fprintf` templates —
//! `spec.md` §6 requires the wire format not to drift from what downstream
//! tooling already expects.

use std::fmt::Write as _;

use crate::term::{Signature, SymbolInfo};

/// Which concrete syntax [`EqAxiomPrinter`] renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxiomFormat {
    /// LOP Horn-clause syntax: `head <- body.`
    Lop,
    /// TPTP-2 syntax: `input_clause(name, axiom, [±literal, ...]).`
    Tptp,
}

/// Emits the equality axioms for a [`Signature`] in one of two wire
/// formats. `single_subst` chooses, per symbol, between one
/// arity-wide substitutivity axiom and one axiom per argument position
/// (`spec.md` §4.5).
pub struct EqAxiomPrinter {
    format: AxiomFormat,
    single_subst: bool,
}

impl EqAxiomPrinter {
    pub fn new(format: AxiomFormat, single_subst: bool) -> Self {
        Self {
            format,
            single_subst,
        }
    }

    /// Render the three fixed equality axioms followed by the
    /// substitutivity axioms for every symbol `sig.user_symbols()` yields
    /// (every symbol past `sig.internal_symbols`, with arity greater than
    /// zero). Byte-identical across runs for a fixed signature and format
    /// (`spec.md` §8, "Equality-axiom stability").
    pub fn print_equality_axioms(&self, sig: &Signature) -> String {
        let mut out = String::new();
        self.print_fixed_axioms(&mut out);
        for sym in sig.user_symbols() {
            if sym.is_predicate {
                self.print_pred_substitutivity(sym, &mut out);
            } else {
                self.print_func_substitutivity(sym, &mut out);
            }
        }
        out
    }

    fn print_fixed_axioms(&self, out: &mut String) {
        match self.format {
            AxiomFormat::Lop => {
                out.push_str(
                    "equal(X,X) <- .\n\
                     equal(X,Y) <- equal(Y,X).\n\
                     equal(X,Z) <- equal(X,Y), equal(Y,Z).\n",
                );
            }
            AxiomFormat::Tptp => {
                out.push_str(
                    "input_clause(eq_reflexive, axiom, [++equal(X,X)]).\n\
                     input_clause(eq_symmetric, axiom, [++equal(X,Y),--equal(Y,X)]).\n\
                     input_clause(eq_transitive, axiom, [++equal(X,Z),--equal(X,Y),--equal(Y,Z)]).\n",
                );
            }
        }
    }

    fn print_func_substitutivity(&self, sym: &SymbolInfo, out: &mut String) {
        match self.format {
            AxiomFormat::Lop => {
                if self.single_subst {
                    for i in 1..=sym.arity {
                        writeln!(
                            out,
                            "equal({},{}) <- equal(Y,Z).",
                            var_pattern(&sym.name, sym.arity, "X", Some(("Y", i))),
                            var_pattern(&sym.name, sym.arity, "X", Some(("Z", i))),
                        )
                        .unwrap();
                    }
                } else {
                    write!(
                        out,
                        "equal({},{}) <- ",
                        var_pattern(&sym.name, sym.arity, "X", None),
                        var_pattern(&sym.name, sym.arity, "Y", None),
                    )
                    .unwrap();
                    write_eq_premises(out, sym.arity);
                    out.push_str(".\n");
                }
            }
            AxiomFormat::Tptp => {
                if self.single_subst {
                    for i in 1..=sym.arity {
                        writeln!(
                            out,
                            "input_clause(eq_subst_{}{i}, axiom, [++equal({},{}),--equal(Y,Z)]).",
                            sym.name,
                            var_pattern(&sym.name, sym.arity, "X", Some(("Y", i))),
                            var_pattern(&sym.name, sym.arity, "X", Some(("Z", i))),
                        )
                        .unwrap();
                    }
                } else {
                    write!(
                        out,
                        "input_clause(eq_subst_{}, axiom, [++equal({},{})",
                        sym.name,
                        var_pattern(&sym.name, sym.arity, "X", None),
                        var_pattern(&sym.name, sym.arity, "Y", None),
                    )
                    .unwrap();
                    write_tptp_eq_premises(out, sym.arity);
                    out.push_str("]).\n");
                }
            }
        }
    }

    fn print_pred_substitutivity(&self, sym: &SymbolInfo, out: &mut String) {
        match self.format {
            AxiomFormat::Lop => {
                if self.single_subst {
                    for i in 1..=sym.arity {
                        writeln!(
                            out,
                            "{} <- {}, equal(Y,Z).",
                            var_pattern(&sym.name, sym.arity, "X", Some(("Y", i))),
                            var_pattern(&sym.name, sym.arity, "X", Some(("Z", i))),
                        )
                        .unwrap();
                    }
                } else {
                    write!(
                        out,
                        "{} <- {}",
                        var_pattern(&sym.name, sym.arity, "X", None),
                        var_pattern(&sym.name, sym.arity, "Y", None),
                    )
                    .unwrap();
                    write_eq_premises_with_leading_comma(out, sym.arity);
                    out.push_str(".\n");
                }
            }
            AxiomFormat::Tptp => {
                if self.single_subst {
                    for i in 1..=sym.arity {
                        writeln!(
                            out,
                            "input_clause(eq_subst_{}{i}, axiom, [++{},--{},--equal(Y,Z)]).",
                            sym.name,
                            var_pattern(&sym.name, sym.arity, "X", Some(("Y", i))),
                            var_pattern(&sym.name, sym.arity, "X", Some(("Z", i))),
                        )
                        .unwrap();
                    }
                } else {
                    write!(
                        out,
                        "input_clause(eq_subst_{}, axiom, [++{},--{}",
                        sym.name,
                        var_pattern(&sym.name, sym.arity, "X", None),
                        var_pattern(&sym.name, sym.arity, "Y", None),
                    )
                    .unwrap();
                    write_tptp_eq_premises(out, sym.arity);
                    out.push_str("]).\n");
                }
            }
        }
    }
}

/// `print_var_pattern`: `symbol(V1,V2,...,Vn)`, except at 1-based position
/// `exception.1` (if given) where the argument is `exception.0` printed
/// bare, with no numeric suffix — mirrors the original's `alt_var`
/// parameter exactly.
fn var_pattern(symbol: &str, arity: usize, var: &str, exception: Option<(&str, usize)>) -> String {
    let mut out = String::new();
    out.push_str(symbol);
    out.push('(');
    for i in 1..=arity {
        if i > 1 {
            out.push(',');
        }
        match exception {
            Some((alt, pos)) if pos == i => out.push_str(alt),
            _ => {
                write!(out, "{var}{i}").unwrap();
            }
        }
    }
    out.push(')');
    out
}

/// `equal(X1,Y1),equal(X2,Y2),...,equal(Xn,Yn)` — the non-`single_subst`
/// function-axiom body.
fn write_eq_premises(out: &mut String, arity: usize) {
    for i in 1..=arity {
        if i > 1 {
            out.push(',');
        }
        write!(out, "equal(X{i},Y{i})").unwrap();
    }
}

/// Same, but with a leading comma on every term (the non-`single_subst`
/// predicate-axiom body, appended after the predicate's own `Y`-pattern).
fn write_eq_premises_with_leading_comma(out: &mut String, arity: usize) {
    for i in 1..=arity {
        write!(out, ",equal(X{i},Y{i})").unwrap();
    }
}

/// `,--equal(X1,Y1),--equal(X2,Y2),...` — the TPTP non-`single_subst`
/// premise tail, shared by function and predicate axioms.
fn write_tptp_eq_premises(out: &mut String, arity: usize) {
    for i in 1..=arity {
        write!(out, ",--equal(X{i},Y{i})").unwrap();
    }
}
