//! # Parsing Table
//!
//! ACTION/GOTO table assembly with conflict detection.
//!
//! ## Overview
//!
//! [`build_table`] walks every automaton state: reduce items (in canonical
//! item order) contribute `Reduce` entries — or the single `Accept` entry for
//! `[S' → S ·, $]` — and terminal transitions contribute `Shift` entries.
//! Non-terminal transitions fill GOTO, which cannot conflict because GOTO is
//! a function.
//!
//! A second insertion at an occupied ACTION key is a conflict. Construction
//! never stops: every conflict is recorded with both actions, and a
//! deterministic tie-break decides what stays in the table — `Shift` beats
//! `Reduce`, and the smaller production index wins between two `Reduce`s.
//! Strict consumers check [`ParsingTable::is_conflict_free`] and refuse the
//! table; lenient ones drive the tie-broken entries.

use std::fmt;

use compact_str::CompactString;
use hashbrown::HashMap;
use serde::Serialize;

use crate::automaton::Automaton;
use crate::grammar::{Grammar, Symbol};

/// A parse action stored in the ACTION table.
///
/// `Error` is deliberately absent: a missing entry is the error case, and the
/// driver's match on this enum stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// Conflict classification: any conflict involving a `Shift` is
/// shift-reduce, the rest are reduce-reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

/// A recorded ACTION-table collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictInfo {
    pub state: usize,
    pub symbol: CompactString,
    /// The colliding actions, in discovery order.
    pub actions: Vec<Action>,
    pub kind: ConflictKind,
    /// The action the tie-break left in the table.
    pub chosen: Action,
}

/// What the conflict list says about the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarClass {
    /// Conflict-free: the grammar is LR(1).
    Lr1,
    /// Only shift-reduce conflicts; the tie-broken table prefers shifting.
    ShiftReduceConflicts,
    /// At least one reduce-reduce conflict.
    ReduceReduceConflicts,
}

impl fmt::Display for GrammarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lr1 => f.write_str("LR(1)"),
            Self::ShiftReduceConflicts => f.write_str("not LR(1): shift-reduce conflicts"),
            Self::ReduceReduceConflicts => f.write_str("not LR(1): reduce-reduce conflicts"),
        }
    }
}

type ActionTable = HashMap<(usize, Symbol), Action, ahash::RandomState>;
type GotoTable = HashMap<(usize, CompactString), usize, ahash::RandomState>;

/// The LR(1) ACTION and GOTO tables, plus every conflict found while
/// building them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingTable {
    action_table: ActionTable,
    goto_table: GotoTable,
    conflicts: Vec<ConflictInfo>,
    num_states: usize,
}

impl ParsingTable {
    /// The installed action for `(state, symbol)`; `None` is the implicit
    /// error action.
    #[must_use]
    pub fn get_action(&self, state: usize, symbol: &Symbol) -> Option<Action> {
        self.action_table.get(&(state, symbol.clone())).copied()
    }

    /// The GOTO target for `(state, non-terminal)`.
    #[must_use]
    pub fn get_goto(&self, state: usize, non_terminal: &str) -> Option<usize> {
        self.goto_table
            .get(&(state, CompactString::from(non_terminal)))
            .copied()
    }

    /// All recorded conflicts, in discovery order.
    #[must_use]
    pub fn conflicts(&self) -> &[ConflictInfo] {
        &self.conflicts
    }

    #[must_use]
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of automaton states the table was built from.
    #[must_use]
    pub const fn num_states(&self) -> usize {
        self.num_states
    }

    /// Classify the grammar from the conflict list.
    #[must_use]
    pub fn grammar_class(&self) -> GrammarClass {
        if self.conflicts.is_empty() {
            GrammarClass::Lr1
        } else if self
            .conflicts
            .iter()
            .any(|conflict| conflict.kind == ConflictKind::ReduceReduce)
        {
            GrammarClass::ReduceReduceConflicts
        } else {
            GrammarClass::ShiftReduceConflicts
        }
    }

    /// Sorted names of the terminals with an action in `state`; this is what
    /// reject explanations enumerate.
    #[must_use]
    pub fn expected_terminals(&self, state: usize) -> Vec<CompactString> {
        let mut names: Vec<CompactString> = self
            .action_table
            .keys()
            .filter(|(s, _)| *s == state)
            .map(|(_, symbol)| CompactString::from(symbol.name()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Iterate all ACTION entries (arbitrary order).
    pub fn action_entries(&self) -> impl Iterator<Item = (usize, &Symbol, Action)> {
        self.action_table
            .iter()
            .map(|((state, symbol), action)| (*state, symbol, *action))
    }

    /// Iterate all GOTO entries (arbitrary order).
    pub fn goto_entries(&self) -> impl Iterator<Item = (usize, &str, usize)> {
        self.goto_table
            .iter()
            .map(|((state, name), target)| (*state, name.as_str(), *target))
    }

    fn try_set(&mut self, state: usize, symbol: Symbol, incoming: Action) {
        match self.action_table.get(&(state, symbol.clone())) {
            None => {
                self.action_table.insert((state, symbol), incoming);
            }
            Some(existing) if *existing == incoming => {}
            Some(&existing) => {
                let chosen = resolve(existing, incoming);
                let kind = if matches!(existing, Action::Shift(_))
                    || matches!(incoming, Action::Shift(_))
                {
                    ConflictKind::ShiftReduce
                } else {
                    ConflictKind::ReduceReduce
                };
                self.conflicts.push(ConflictInfo {
                    state,
                    symbol: CompactString::from(symbol.name()),
                    actions: vec![existing, incoming],
                    kind,
                    chosen,
                });
                self.action_table.insert((state, symbol), chosen);
            }
        }
    }
}

/// Deterministic tie-break: Accept is untouchable, Shift beats Reduce, and
/// the smaller production index wins between Reduces.
const fn resolve(existing: Action, incoming: Action) -> Action {
    match (existing, incoming) {
        (Action::Accept, _) | (_, Action::Accept) => Action::Accept,
        (Action::Shift(state), Action::Reduce(_)) | (Action::Reduce(_), Action::Shift(state)) => {
            Action::Shift(state)
        }
        (Action::Reduce(a), Action::Reduce(b)) => {
            if a <= b {
                Action::Reduce(a)
            } else {
                Action::Reduce(b)
            }
        }
        // GOTO is a function, so two shifts on one symbol cannot happen.
        (Action::Shift(_), Action::Shift(_)) => existing,
    }
}

/// Assemble ACTION and GOTO from the automaton.
#[must_use]
pub fn build_table(grammar: &Grammar, automaton: &Automaton) -> ParsingTable {
    let mut table = ParsingTable {
        action_table: ActionTable::with_hasher(ahash::RandomState::new()),
        goto_table: GotoTable::with_hasher(ahash::RandomState::new()),
        conflicts: Vec::new(),
        num_states: automaton.len(),
    };

    for (state, item_set) in automaton.states().iter().enumerate() {
        for item in item_set.reduce_items(grammar) {
            if item.is_accept(grammar) {
                table.try_set(state, Symbol::EndOfInput, Action::Accept);
            } else {
                table.try_set(state, item.lookahead.clone(), Action::Reduce(item.production));
            }
        }
        for transition in automaton.transitions_from(state) {
            match &transition.symbol {
                symbol @ Symbol::Terminal(_) => {
                    table.try_set(state, symbol.clone(), Action::Shift(transition.to));
                }
                Symbol::NonTerminal(name) => {
                    table.goto_table.insert((state, name.clone()), transition.to);
                }
                Symbol::Epsilon | Symbol::EndOfInput => {}
            }
        }
    }

    table
}
