//! # Snapshot Facade
//!
//! Read-only, serializable views of the grammar, automaton, and tables.
//!
//! ## Overview
//!
//! External consumers (an HTTP layer, a CLI, a visualizer) never touch the
//! core types directly; they receive these plain data views instead. Every
//! view derives `Serialize`, every list is sorted or in construction order,
//! and items are printed in the one canonical form `A → α · β , a` so all
//! renderers agree.

use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::Serialize;

use crate::automaton::Automaton;
use crate::grammar::{Grammar, Symbol, SymbolSet};
use crate::table::{Action, ConflictInfo, GrammarClass, ParsingTable};

/// One outgoing transition of a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionView {
    pub symbol: CompactString,
    pub to: usize,
}

/// A full transition edge, for whole-automaton views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionEdge {
    pub from: usize,
    pub symbol: CompactString,
    pub to: usize,
}

/// Everything a visualizer needs to draw one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub state: usize,
    /// Items printed as `A → α · β , a`, in canonical order.
    pub items: Vec<String>,
    /// Shift symbols in the automaton's iteration order (terminals first,
    /// alphabetical).
    pub shift_symbols: Vec<CompactString>,
    /// Productions reducible in this state, ascending.
    pub reduce_production_indices: Vec<usize>,
    pub transitions: Vec<TransitionView>,
}

/// View of a single automaton state.
#[must_use]
pub fn snapshot_state(
    grammar: &Grammar,
    automaton: &Automaton,
    state: usize,
) -> Option<StateSnapshot> {
    let item_set = automaton.state(state)?;

    let items = item_set
        .sorted_items()
        .into_iter()
        .map(|item| item.display(grammar))
        .collect();

    let shift_symbols = item_set
        .shift_symbols(grammar)
        .into_iter()
        .map(|symbol| CompactString::from(symbol.name()))
        .collect();

    let mut reduce_production_indices: Vec<usize> = item_set
        .reduce_items(grammar)
        .into_iter()
        .map(|item| item.production)
        .collect();
    reduce_production_indices.dedup();

    let transitions = automaton
        .transitions_from(state)
        .map(|transition| TransitionView {
            symbol: CompactString::from(transition.symbol.name()),
            to: transition.to,
        })
        .collect();

    Some(StateSnapshot {
        state,
        items,
        shift_symbols,
        reduce_production_indices,
        transitions,
    })
}

/// The whole automaton: every state view plus the transition relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomatonSnapshot {
    pub num_states: usize,
    pub states: Vec<StateSnapshot>,
    pub transitions: Vec<TransitionEdge>,
}

/// View of the full automaton.
#[must_use]
pub fn snapshot_automaton(grammar: &Grammar, automaton: &Automaton) -> AutomatonSnapshot {
    let states = (0..automaton.len())
        .map(|state| {
            snapshot_state(grammar, automaton, state).expect("state index within bounds")
        })
        .collect();
    let transitions = automaton
        .transitions()
        .iter()
        .map(|transition| TransitionEdge {
            from: transition.from,
            symbol: CompactString::from(transition.symbol.name()),
            to: transition.to,
        })
        .collect();
    AutomatonSnapshot {
        num_states: automaton.len(),
        states,
        transitions,
    }
}

/// ACTION and GOTO rendered as display tables, row per state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    /// `["State", terminal…]`, terminals sorted.
    pub action_headers: Vec<String>,
    /// One row per state: `["State i", cell…]` with `s4` / `r2` / `acc` /
    /// empty cells.
    pub action_rows: Vec<Vec<String>>,
    /// `["State", non-terminal…]`, sorted.
    pub goto_headers: Vec<String>,
    pub goto_rows: Vec<Vec<String>>,
    pub conflicts: Vec<ConflictInfo>,
}

/// View of the parsing table, for tabular rendering.
#[must_use]
pub fn snapshot_table(table: &ParsingTable) -> TableSnapshot {
    let mut terminals: Vec<CompactString> = table
        .action_entries()
        .map(|(_, symbol, _)| CompactString::from(symbol.name()))
        .collect();
    terminals.sort();
    terminals.dedup();

    let mut non_terminals: Vec<CompactString> =
        table.goto_entries().map(|(_, name, _)| CompactString::from(name)).collect();
    non_terminals.sort();
    non_terminals.dedup();

    let mut action_headers = vec!["State".to_string()];
    action_headers.extend(terminals.iter().map(ToString::to_string));
    let mut goto_headers = vec!["State".to_string()];
    goto_headers.extend(non_terminals.iter().map(ToString::to_string));

    let mut action_rows = Vec::with_capacity(table.num_states());
    let mut goto_rows = Vec::with_capacity(table.num_states());
    for state in 0..table.num_states() {
        let mut action_row = vec![format!("State {state}")];
        for name in &terminals {
            let symbol = if name.as_str() == "$" {
                Symbol::EndOfInput
            } else {
                Symbol::Terminal(name.clone())
            };
            action_row.push(match table.get_action(state, &symbol) {
                Some(Action::Shift(target)) => format!("s{target}"),
                Some(Action::Reduce(production)) => format!("r{production}"),
                Some(Action::Accept) => "acc".to_string(),
                None => String::new(),
            });
        }
        action_rows.push(action_row);

        let mut goto_row = vec![format!("State {state}")];
        for name in &non_terminals {
            goto_row.push(
                table
                    .get_goto(state, name)
                    .map_or_else(String::new, |target| target.to_string()),
            );
        }
        goto_rows.push(goto_row);
    }

    TableSnapshot {
        action_headers,
        action_rows,
        goto_headers,
        goto_rows,
        conflicts: table.conflicts().to_vec(),
    }
}

/// The grammar as plain data: productions, symbol partition, FIRST/FOLLOW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarSnapshot {
    pub start: CompactString,
    pub augmented_start: CompactString,
    /// `"A → α"` strings indexed by production number.
    pub productions: Vec<String>,
    pub terminals: Vec<CompactString>,
    pub non_terminals: Vec<CompactString>,
    pub first: BTreeMap<String, Vec<String>>,
    pub follow: BTreeMap<String, Vec<String>>,
}

/// View of the grammar, FIRST/FOLLOW included.
#[must_use]
pub fn snapshot_grammar(grammar: &Grammar) -> GrammarSnapshot {
    let sorted_names = |set: &SymbolSet| {
        let mut names: Vec<String> = set.iter().map(|symbol| symbol.name().to_string()).collect();
        names.sort();
        names
    };

    let mut first = BTreeMap::new();
    let mut follow = BTreeMap::new();
    for symbol in grammar.non_terminals() {
        let name = symbol.name();
        if let Some(set) = grammar.first(name) {
            first.insert(name.to_string(), sorted_names(set));
        }
        if let Some(set) = grammar.follow(name) {
            follow.insert(name.to_string(), sorted_names(set));
        }
    }

    GrammarSnapshot {
        start: CompactString::from(grammar.start().name()),
        augmented_start: CompactString::from(grammar.augmented_start().name()),
        productions: grammar
            .productions()
            .iter()
            .map(ToString::to_string)
            .collect(),
        terminals: grammar
            .terminals()
            .iter()
            .map(|symbol| CompactString::from(symbol.name()))
            .collect(),
        non_terminals: grammar
            .non_terminals()
            .iter()
            .map(|symbol| CompactString::from(symbol.name()))
            .collect(),
        first,
        follow,
    }
}

/// Headline numbers for a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarSummary {
    pub num_productions: usize,
    pub num_terminals: usize,
    pub num_non_terminals: usize,
    pub start: CompactString,
}

/// Counts for display alongside a grammar view.
#[must_use]
pub fn summarize_grammar(grammar: &Grammar) -> GrammarSummary {
    GrammarSummary {
        num_productions: grammar.productions().len(),
        num_terminals: grammar.terminals().len(),
        num_non_terminals: grammar.non_terminals().len(),
        start: CompactString::from(grammar.start().name()),
    }
}

/// Headline numbers for a parsing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub num_states: usize,
    pub action_entries: usize,
    pub goto_entries: usize,
    pub num_conflicts: usize,
    pub grammar_class: GrammarClass,
}

/// Counts and classification for display alongside a table view.
#[must_use]
pub fn summarize_table(table: &ParsingTable) -> TableSummary {
    TableSummary {
        num_states: table.num_states(),
        action_entries: table.action_entries().count(),
        goto_entries: table.goto_entries().count(),
        num_conflicts: table.conflicts().len(),
        grammar_class: table.grammar_class(),
    }
}
