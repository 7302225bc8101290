//! # Automaton
//!
//! Canonical collection of LR(1) item sets.
//!
//! ## Overview
//!
//! [`build_automaton`] enumerates every item set reachable from
//! `CLOSURE({[S' → · S, $]})` with a breadth-first worklist, deduplicating
//! by item-set equality. Shift symbols are visited in sorted order
//! (terminals first, then non-terminals, alphabetically within each), which
//! makes state numbering reproducible run to run.
//!
//! Canonical LR(1) can blow up exponentially on pathological grammars, so the
//! builder enforces a configurable state cap and fails with
//! [`AutomatonError::StateExplosion`] instead of exhausting memory.

pub mod item;

pub use item::{Item, ItemSet};

use hashbrown::HashMap;

use crate::error::AutomatonError;
use crate::grammar::{Grammar, Symbol};

/// A transition `(from, symbol, to)` of the LR(1) automaton.
///
/// GOTO is a function, so there is at most one transition per
/// `(from, symbol)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub symbol: Symbol,
    pub to: usize,
}

/// Limits for canonical-collection enumeration.
#[derive(Debug, Clone, Copy)]
pub struct AutomatonConfig {
    /// Hard cap on the number of states.
    pub max_states: usize,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self { max_states: 10_000 }
    }
}

/// The canonical collection: states indexed by discovery order, plus the
/// transition relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<ItemSet>,
    transitions: Vec<Transition>,
    by_source: HashMap<(usize, Symbol), usize>,
}

impl Automaton {
    /// All states; index 0 is the initial state.
    #[must_use]
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    #[must_use]
    pub fn state(&self, index: usize) -> Option<&ItemSet> {
        self.states.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Transitions in discovery order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `state`, in the sorted symbol order they were
    /// discovered in.
    pub fn transitions_from(&self, state: usize) -> impl Iterator<Item = &Transition> {
        self.transitions
            .iter()
            .filter(move |transition| transition.from == state)
    }

    /// The target of the transition on `symbol` out of `state`, if any.
    #[must_use]
    pub fn target(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.by_source.get(&(state, symbol.clone())).copied()
    }
}

/// Build the canonical collection with default limits.
///
/// # Errors
///
/// Fails with [`AutomatonError::StateExplosion`] if the grammar needs more
/// than the default 10 000 states.
pub fn build_automaton(grammar: &Grammar) -> Result<Automaton, AutomatonError> {
    build_automaton_with(grammar, &AutomatonConfig::default())
}

/// Build the canonical collection under explicit limits.
///
/// # Errors
///
/// Fails with [`AutomatonError::StateExplosion`] when the state cap is hit.
pub fn build_automaton_with(
    grammar: &Grammar,
    config: &AutomatonConfig,
) -> Result<Automaton, AutomatonError> {
    let mut initial: ItemSet = [Item::new(0, 0, Symbol::EndOfInput)].into_iter().collect();
    initial.close(grammar);

    let mut states = vec![initial.clone()];
    let mut index_of: HashMap<ItemSet, usize> = HashMap::new();
    index_of.insert(initial, 0);

    let mut transitions = Vec::new();
    let mut by_source: HashMap<(usize, Symbol), usize> = HashMap::new();
    let mut worklist = std::collections::VecDeque::from([0usize]);

    while let Some(from) = worklist.pop_front() {
        let current = states[from].clone();
        for symbol in current.shift_symbols(grammar) {
            let Some(next) = current.goto(grammar, &symbol) else {
                continue;
            };
            let to = if let Some(&existing) = index_of.get(&next) {
                existing
            } else {
                let index = states.len();
                if index >= config.max_states {
                    return Err(AutomatonError::StateExplosion {
                        limit: config.max_states,
                    });
                }
                states.push(next.clone());
                index_of.insert(next, index);
                worklist.push_back(index);
                index
            };
            transitions.push(Transition {
                from,
                symbol: symbol.clone(),
                to,
            });
            by_source.insert((from, symbol), to);
        }
    }

    Ok(Automaton {
        states,
        transitions,
        by_source,
    })
}
