//! # tracelr
//!
//! Canonical LR(1) table construction with a step-recording shift-reduce
//! driver.
//!
//! ## Overview
//!
//! tracelr turns a plain-text BNF-style grammar into the canonical
//! collection of LR(1) item sets and the ACTION/GOTO tables, reporting every
//! conflict it finds, and then drives the shift-reduce algorithm over an
//! input token sequence while recording a complete trace: stack, remaining
//! input, action, explanation, sentential form, and the incrementally built
//! parse tree.
//!
//! The pipeline runs strictly leaves-first:
//!
//! 1. [`build_grammar`] — text → [`Grammar`] (augmented, classified,
//!    FIRST/FOLLOW memoized), or a list of diagnostics.
//! 2. [`build_automaton`] — grammar → [`Automaton`] (states, transitions).
//! 3. [`build_table`] — automaton → [`ParsingTable`] (ACTION, GOTO,
//!    conflicts, deterministic tie-breaks).
//! 4. [`Driver::parse`] — input string → [`ParseOutcome`] (steps, tree,
//!    tokens).
//!
//! Everything built is immutable afterwards and freely shareable across
//! threads; each parse owns its own step log and tree. Identical inputs
//! produce byte-identical traces: symbol iteration is sorted wherever order
//! could influence state numbering.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracelr::{build_automaton, build_grammar, build_table, Driver};
//!
//! let grammar = build_grammar("E -> E + id | id", "E").expect("grammar is well formed");
//! let automaton = build_automaton(&grammar)?;
//! let table = build_table(&grammar, &automaton);
//! assert!(table.is_conflict_free());
//!
//! let outcome = Driver::new(&grammar, &table)?.parse("id + id")?;
//! assert!(outcome.success);
//! assert_eq!(outcome.steps.last().unwrap().sentential_form, "E");
//!
//! let root = outcome.tree.root().unwrap();
//! assert_eq!(outcome.tree.leaf_yield(root), vec!["id", "+", "id"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] — symbols, productions, FIRST/FOLLOW, text reading
//! - [`automaton`] — LR(1) items, CLOSURE/GOTO, canonical collection
//! - [`table`] — ACTION/GOTO assembly and conflict records
//! - [`driver`] — the step-recording parse loop and tree arena
//! - [`snapshot`] — serializable views for external consumers
//! - [`error`] — structured failure values

pub mod automaton;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod snapshot;
pub mod table;

pub use automaton::{
    build_automaton, build_automaton_with, Automaton, AutomatonConfig, Item, ItemSet, Transition,
};
pub use driver::{
    Driver, DriverConfig, NodeKind, ParseFailure, ParseOutcome, ParseStep, ParseTree, StepAction,
    TreeNode,
};
pub use error::{
    AutomatonError, DiagnosticKind, DriverError, GrammarDiagnostic, TokenizeError,
};
pub use grammar::reader::tokenize;
pub use grammar::{Grammar, Production, RawProduction, Symbol};
pub use snapshot::{
    snapshot_automaton, snapshot_grammar, snapshot_state, snapshot_table, summarize_grammar,
    summarize_table,
};
pub use table::{build_table, Action, ConflictInfo, ConflictKind, GrammarClass, ParsingTable};

/// Read grammar text and build the augmented, classified grammar.
///
/// # Errors
///
/// Returns every diagnostic found — syntax errors with line numbers, and
/// semantic problems such as an undefined start symbol — when any of them is
/// fatal.
pub fn build_grammar(text: &str, start: &str) -> Result<Grammar, Vec<GrammarDiagnostic>> {
    let raw = grammar::reader::read_productions(text)?;
    Grammar::from_raw(raw, start)
}

/// One-call strict parse: refuses conflicted tables, then runs the driver.
///
/// # Errors
///
/// [`DriverError::ConflictedTable`] for an ambiguous table, or an internal
/// invariant violation from a malformed one.
pub fn parse(
    grammar: &Grammar,
    table: &ParsingTable,
    input: &str,
) -> Result<ParseOutcome, DriverError> {
    Driver::new(grammar, table)?.parse(input)
}
