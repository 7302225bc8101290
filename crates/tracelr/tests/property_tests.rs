//! Property-based tests: random token sequences against the expression
//! grammar.

use proptest::prelude::*;
use tracelr::{build_automaton, build_grammar, build_table, Driver, StepAction};

const EXPR: &str = "\
S -> E
E -> E + T | T
T -> T * F | F
F -> ( E ) | id
";

fn token() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("id"),
        Just("+"),
        Just("*"),
        Just("("),
        Just(")"),
    ]
}

proptest! {
    #[test]
    fn prop_parse_is_total_and_deterministic(
        tokens in proptest::collection::vec(token(), 0..10)
    ) {
        let grammar = build_grammar(EXPR, "S").unwrap();
        let automaton = build_automaton(&grammar).unwrap();
        let table = build_table(&grammar, &automaton);
        let driver = Driver::new(&grammar, &table).unwrap();

        let input = tokens.join(" ");
        let first = driver.parse(&input).unwrap();
        let second = driver.parse(&input).unwrap();
        prop_assert_eq!(&first, &second);

        // Success and failure are mutually exclusive and consistent with the
        // final recorded action.
        let last_action = first.steps.last().unwrap().action;
        if first.success {
            prop_assert!(first.failure.is_none());
            prop_assert_eq!(last_action, StepAction::Accept);
            prop_assert!(first.tree.root().is_some());
        } else {
            prop_assert!(first.failure.is_some());
            prop_assert_eq!(last_action, StepAction::Error);
            prop_assert!(first.tree.root().is_none());
        }
    }

    #[test]
    fn prop_accepted_tree_yield_equals_input(
        tokens in proptest::collection::vec(token(), 0..10)
    ) {
        let grammar = build_grammar(EXPR, "S").unwrap();
        let automaton = build_automaton(&grammar).unwrap();
        let table = build_table(&grammar, &automaton);
        let driver = Driver::new(&grammar, &table).unwrap();

        let input = tokens.join(" ");
        let outcome = driver.parse(&input).unwrap();
        if let Some(root) = outcome.tree.root() {
            prop_assert_eq!(outcome.tree.leaf_yield(root), tokens);
            // A successful parse always reduces down to the start symbol.
            prop_assert_eq!(
                outcome.steps.last().unwrap().sentential_form.as_str(),
                "S"
            );
        }
    }

    #[test]
    fn prop_step_ordinals_and_stack_bottom_are_stable(
        tokens in proptest::collection::vec(token(), 0..10)
    ) {
        let grammar = build_grammar(EXPR, "S").unwrap();
        let automaton = build_automaton(&grammar).unwrap();
        let table = build_table(&grammar, &automaton);
        let driver = Driver::new(&grammar, &table).unwrap();

        let outcome = driver.parse(&tokens.join(" ")).unwrap();
        for (index, step) in outcome.steps.iter().enumerate() {
            prop_assert_eq!(step.ordinal, index + 1);
            prop_assert_eq!(step.stack[0].0, 0);
            prop_assert_eq!(step.stack[0].1.as_str(), "");
            prop_assert_eq!(step.remaining_input.last().unwrap().as_str(), "$");
        }
    }
}
