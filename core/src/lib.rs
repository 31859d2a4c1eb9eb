//! Saturation data layer: an adaptive sparse/dense integer map, a
//! balanced evaluation-ordered tree, and an evaluation-ordered clause
//! set built on top of both, plus the facades the clause set calls
//! through for demodulator indexing, feature-vector indexing, and
//! printing the equality axioms a saturation loop needs once `=` is
//! treated as an interpreted predicate.
//!
//! Grounded throughout on `original_source/BASICS/clb_intmap.c` and
//! `original_source/CLAUSES/ccl_clausesets.c` (the E theorem prover's C
//! implementation of this layer), restructured onto the arena/handle
//! idiom `ratsat`'s `ClauseAllocator`/`CRef` use in place of raw
//! pointers.

pub mod clause;
pub mod clause_set;
pub mod demod;
pub mod eqaxioms;
pub mod eval;
pub mod fvindex;
pub mod intmap;
pub mod term;

pub use clause::{Clause, ClauseFlags, ClauseIdent};
pub use clause_set::{date_max, ClauseRef, ClauseSet};
pub use demod::{DemodIndex, HeadSymbolDemodIndex};
pub use eqaxioms::{AxiomFormat, EqAxiomPrinter};
pub use eval::{EvalKey, OrderedEvalTree};
pub use fvindex::{BucketFeatureVectorIndex, FeatureVectorIndex};
pub use intmap::AdaptiveIntMap;
pub use term::{EqnSide, Literal, Signature, SymbolInfo, Term};
