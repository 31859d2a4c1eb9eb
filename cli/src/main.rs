//! Demonstration front-end for the saturation data layer: prints
//! equality axioms for a signature description, and builds a small
//! synthetic clause set to show off `ClauseSet`'s bookkeeping counters
//! and query operations.
//!
//! Modeled on `batsat-bin`'s CLI shape (flag parsing, an optional
//! `logging` feature wiring `env_logger` to `-v`/`--verbose`), but with
//! the solver swapped out for this crate's axiom printer and clause set.
//! `e_deduction_server.c`'s `-v`/`--verbose` and `-l`/`--output-level`
//! flags are carried over as the ambient option style; its sockets,
//! forking, and batch-file processing are not (`spec.md` §1 leaves the
//! server shell out of scope).

use clap::{Parser, Subcommand};
use satcore::{AxiomFormat, Clause, ClauseSet, EqAxiomPrinter, EvalKey, Literal, Signature, Term};

#[derive(Parser)]
#[command(name = "satcore", version, about = "Saturation data layer demo front-end")]
struct Cli {
    /// Increase verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Emit the equality axioms for a signature in LOP or TPTP-2 syntax.
    Axioms {
        /// Function symbol, as `name:arity` (repeatable).
        #[arg(long = "function", value_name = "NAME:ARITY")]
        functions: Vec<String>,
        /// Predicate symbol, as `name:arity` (repeatable).
        #[arg(long = "predicate", value_name = "NAME:ARITY")]
        predicates: Vec<String>,
        /// Wire format to emit.
        #[arg(long, value_enum, default_value_t = Format::Lop)]
        format: Format,
        /// Emit one substitutivity axiom per argument position instead
        /// of a single axiom covering the whole arity.
        #[arg(long)]
        single_subst: bool,
    },
    /// Build a small synthetic clause set and print its counters and the
    /// outcome of a few saturation-layer queries over it.
    Demo {
        /// Number of synthetic unit clauses to insert.
        #[arg(long, default_value_t = 5)]
        clauses: usize,
        /// Output detail level: 0 prints only the headline counters, 1
        /// adds find_best/find_heaviest, 2 adds the symbol distribution.
        #[arg(short = 'l', long = "output-level", default_value_t = 1)]
        output_level: u8,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Format {
    Lop,
    Tptp,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Axioms {
            functions,
            predicates,
            format,
            single_subst,
        } => run_axioms(&functions, &predicates, format, single_subst),
        Command::Demo {
            clauses,
            output_level,
        } => run_demo(clauses, output_level),
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbose: u8) {}

/// Parse a `name:arity` symbol spec, as used by `--function`/`--predicate`.
fn parse_symbol(spec: &str) -> (String, usize) {
    let Some((name, arity)) = spec.split_once(':') else {
        eprintln!("error: symbol spec {spec:?} must be NAME:ARITY");
        std::process::exit(2);
    };
    let Ok(arity) = arity.parse::<usize>() else {
        eprintln!("error: arity in {spec:?} must be a non-negative integer");
        std::process::exit(2);
    };
    (name.to_string(), arity)
}

fn run_axioms(functions: &[String], predicates: &[String], format: Format, single_subst: bool) {
    let mut sig = Signature::new();
    for spec in functions {
        let (name, arity) = parse_symbol(spec);
        sig.add_function(name, arity);
    }
    for spec in predicates {
        let (name, arity) = parse_symbol(spec);
        sig.add_predicate(name, arity);
    }

    let format = match format {
        Format::Lop => AxiomFormat::Lop,
        Format::Tptp => AxiomFormat::Tptp,
    };
    let printer = EqAxiomPrinter::new(format, single_subst);
    print!("{}", printer.print_equality_axioms(&sig));
}

/// Build `count` unit clauses `p(a,a,...,a)` of strictly increasing
/// arity (so `standard_weight` increases with insertion order), score
/// each under eval slot 0 by its own weight, and insert them all.
fn build_demo_set(count: usize) -> ClauseSet {
    let mut set = ClauseSet::new();
    for i in 0..count {
        let args = (0..=i).map(|_| Term::atom("a")).collect::<Vec<_>>();
        let lit = Literal::atom(true, "p", args);
        let mut clause = Clause::new(i as u64, vec![lit]);
        let weight = clause.standard_weight() as i64;
        clause.evaluations.push(EvalKey::new(weight, i as i64));
        set.insert(clause);
    }
    set
}

fn run_demo(count: usize, output_level: u8) {
    let mut set = build_demo_set(count);
    println!(
        "members={} literals={} eval_slots={} date={}",
        set.members(),
        set.literals(),
        set.eval_index_count(),
        set.date()
    );

    if output_level >= 1 {
        if let Some(best) = set.find_best(0) {
            let c = set.get(best);
            println!("find_best(0) -> clause {} (weight={})", c.ident, c.standard_weight());
        }
        if let Some(heaviest) = set.find_heaviest() {
            let c = set.get(heaviest);
            println!("find_heaviest -> clause {} (weight={})", c.ident, c.standard_weight());
        }
    }

    if output_level >= 2 {
        let mut dist = std::collections::HashMap::new();
        set.add_symbol_distribution(&mut dist);
        let mut symbols: Vec<_> = dist.into_iter().collect();
        symbols.sort();
        for (symbol, occurrences) in symbols {
            println!("symbol {symbol}: {occurrences}");
        }
    }

    set.sort(|a, b| a.standard_weight().cmp(&b.standard_weight()));
    println!("ring order after sort (ascending standard_weight):");
    for (_, clause) in set.iter() {
        println!("  clause {} weight={}", clause.ident, clause.standard_weight());
    }
}
