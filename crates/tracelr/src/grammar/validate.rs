//! Non-fatal grammar checks: duplicates, reachability, unused symbols.

use compact_str::CompactString;
use hashbrown::HashSet;

use super::{Production, Symbol};
use crate::error::{DiagnosticKind, GrammarDiagnostic};

/// Run the post-classification checks over the full production list
/// (augmented production included, at index 0).
pub(crate) fn check(productions: &[Production], start: &Symbol) -> Vec<GrammarDiagnostic> {
    let mut diagnostics = Vec::new();
    check_duplicates(productions, &mut diagnostics);
    check_reachability(productions, start, &mut diagnostics);
    check_unused(productions, start, &mut diagnostics);
    diagnostics
}

fn check_duplicates(productions: &[Production], diagnostics: &mut Vec<GrammarDiagnostic>) {
    let mut seen: HashSet<(&Symbol, &[Symbol])> = HashSet::new();
    for production in &productions[1..] {
        if !seen.insert((&production.lhs, production.rhs.as_slice())) {
            diagnostics.push(
                GrammarDiagnostic::new(
                    DiagnosticKind::DuplicateProduction,
                    format!("production '{production}' is listed more than once"),
                )
                .with_symbol(production.lhs.name()),
            );
        }
    }
}

/// Non-terminals no derivation from the start symbol can reach.
fn check_reachability(
    productions: &[Production],
    start: &Symbol,
    diagnostics: &mut Vec<GrammarDiagnostic>,
) {
    let mut reachable: HashSet<&str> = HashSet::new();
    reachable.insert(start.name());
    loop {
        let mut changed = false;
        for production in productions {
            if !reachable.contains(production.lhs.name()) {
                continue;
            }
            for symbol in &production.rhs {
                if symbol.is_non_terminal() && reachable.insert(symbol.name()) {
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let mut flagged: HashSet<&str> = HashSet::new();
    for production in &productions[1..] {
        let name = production.lhs.name();
        if !reachable.contains(name) && flagged.insert(name) {
            diagnostics.push(
                GrammarDiagnostic::new(
                    DiagnosticKind::UnreachableFromStart,
                    format!("non-terminal '{name}' is unreachable from the start symbol"),
                )
                .with_symbol(name),
            );
        }
    }
}

/// Non-terminals that never appear on any right-hand side (the start symbol
/// excepted; the augmented start never appears on a RHS by construction).
fn check_unused(
    productions: &[Production],
    start: &Symbol,
    diagnostics: &mut Vec<GrammarDiagnostic>,
) {
    let used: HashSet<&str> = productions
        .iter()
        .flat_map(|production| production.rhs.iter())
        .map(Symbol::name)
        .collect();

    let mut flagged: HashSet<CompactString> = HashSet::new();
    for production in &productions[1..] {
        let name = production.lhs.name();
        if name != start.name() && !used.contains(name) && flagged.insert(name.into()) {
            diagnostics.push(
                GrammarDiagnostic::new(
                    DiagnosticKind::UnusedSymbol,
                    format!("symbol '{name}' is never used on a right-hand side"),
                )
                .with_symbol(name),
            );
        }
    }
}
