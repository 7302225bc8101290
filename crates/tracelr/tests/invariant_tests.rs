//! Structural invariants of the canonical collection and the tables, checked
//! over several representative grammars.

use tracelr::{
    build_automaton, build_grammar, build_table, Action, Automaton, ConflictKind, Grammar,
    ParsingTable, Symbol,
};

const GRAMMARS: &[(&str, &str)] = &[
    (
        "S -> E\nE -> E + T | T\nT -> T * F | F\nF -> ( E ) | id\n",
        "S",
    ),
    (
        "S -> I\nI -> if E then I | if E then I else I | other\nE -> x\n",
        "S",
    ),
    ("S -> A a | B a\nA -> x\nB -> x\n", "S"),
    ("S -> L\nL -> L x | ε\n", "S"),
    ("S -> A B\nA -> a | ε\nB -> b | ε\n", "S"),
];

fn build(text: &str, start: &str) -> (Grammar, Automaton, ParsingTable) {
    let grammar = build_grammar(text, start).unwrap();
    let automaton = build_automaton(&grammar).unwrap();
    let table = build_table(&grammar, &automaton);
    (grammar, automaton, table)
}

#[test]
fn test_every_dotted_symbol_has_a_consistent_transition() {
    for (text, start) in GRAMMARS {
        let (grammar, automaton, _) = build(text, start);
        for (index, state) in automaton.states().iter().enumerate() {
            for item in state.items() {
                let Some(symbol) = item.symbol_after_dot(&grammar) else {
                    continue;
                };
                let target = automaton
                    .target(index, symbol)
                    .unwrap_or_else(|| panic!("{text}: state {index} lacks transition on {symbol}"));
                assert!(
                    automaton.state(target).unwrap().contains(&item.advanced()),
                    "{text}: advanced item missing from state {target}"
                );
            }
        }
    }
}

#[test]
fn test_every_transition_matches_goto() {
    for (text, start) in GRAMMARS {
        let (grammar, automaton, _) = build(text, start);
        for transition in automaton.transitions() {
            let computed = automaton
                .state(transition.from)
                .unwrap()
                .goto(&grammar, &transition.symbol)
                .expect("recorded transitions have non-empty GOTO");
            assert_eq!(automaton.state(transition.to).unwrap(), &computed);
        }
    }
}

#[test]
fn test_action_defined_exactly_where_items_demand() {
    for (text, start) in GRAMMARS {
        let (grammar, automaton, table) = build(text, start);
        for (index, state) in automaton.states().iter().enumerate() {
            for terminal in grammar.terminals() {
                let has_reduce = state
                    .reduce_items(&grammar)
                    .iter()
                    .any(|item| &item.lookahead == terminal);
                let has_shift = automaton.target(index, terminal).is_some();
                let expects_entry = has_reduce || has_shift;
                assert_eq!(
                    table.get_action(index, terminal).is_some(),
                    expects_entry,
                    "{text}: ACTION[{index}, {terminal}] presence mismatch"
                );
            }
        }
    }
}

#[test]
fn test_competing_reduces_are_recorded_as_conflicts() {
    for (text, start) in GRAMMARS {
        let (grammar, automaton, table) = build(text, start);
        for (index, state) in automaton.states().iter().enumerate() {
            let reduces = state.reduce_items(&grammar);
            for (i, left) in reduces.iter().enumerate() {
                for right in &reduces[i + 1..] {
                    if left.lookahead == right.lookahead && left.production != right.production {
                        assert!(
                            table.conflicts().iter().any(|conflict| {
                                conflict.state == index
                                    && conflict.symbol == left.lookahead.name()
                                    && conflict.kind == ConflictKind::ReduceReduce
                            }),
                            "{text}: unrecorded reduce-reduce collision in state {index}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_shift_entries_point_at_recorded_transitions() {
    for (text, start) in GRAMMARS {
        let (_, automaton, table) = build(text, start);
        for (state, symbol, action) in table.action_entries() {
            if let Action::Shift(target) = action {
                assert_eq!(
                    automaton.target(state, symbol),
                    Some(target),
                    "{text}: shift entry disagrees with automaton"
                );
            }
        }
    }
}

#[test]
fn test_goto_entries_mirror_non_terminal_transitions() {
    for (text, start) in GRAMMARS {
        let (_, automaton, table) = build(text, start);
        for (state, name, target) in table.goto_entries() {
            assert_eq!(
                automaton.target(state, &Symbol::non_terminal(name)),
                Some(target),
                "{text}: GOTO entry disagrees with automaton"
            );
        }
    }
}

#[test]
fn test_text_round_trip_rebuilds_identical_tables() {
    for (text, start) in GRAMMARS {
        let (grammar, automaton, table) = build(text, start);
        let rendered = grammar.to_text();
        let (regrammar, reautomaton, retable) = build(&rendered, start);

        assert_eq!(
            grammar.to_text(),
            regrammar.to_text(),
            "{text}: text rendering is not a fixpoint"
        );
        assert_eq!(automaton, reautomaton, "{text}: automata differ");
        assert_eq!(table, retable, "{text}: tables differ");
    }
}
