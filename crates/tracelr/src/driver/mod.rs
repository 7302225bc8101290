//! # Parse Driver
//!
//! The shift-reduce loop, with a complete step trace.
//!
//! ## Overview
//!
//! A [`Driver`] borrows an immutable [`Grammar`] and [`ParsingTable`] and
//! runs the LR(1) algorithm over a tokenized input, recording one
//! [`ParseStep`] per iteration: the stack, the remaining input, the action
//! taken, a human-readable explanation, the tree nodes just created, and the
//! current sentential form. Step 1 always records the initial configuration;
//! every later step snapshots the configuration *after* its action's effects.
//!
//! Ordinary failures — an unknown token, a missing ACTION entry, the step
//! limit — are structured values inside [`ParseOutcome`]. [`DriverError`] is
//! reserved for strict-mode refusal of a conflicted table and for internal
//! invariant violations that indicate a table-construction bug.

pub mod tree;

pub use tree::{NodeKind, ParseTree, TreeNode};

use compact_str::CompactString;
use serde::Serialize;

use crate::error::DriverError;
use crate::grammar::{reader, Grammar, Symbol};
use crate::table::{Action, ParsingTable};

/// Limits for a single parse run.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Maximum recorded action steps; one extra diagnostic step is emitted
    /// when the limit is hit. Guards against reduce cycles in malformed
    /// tables.
    pub max_steps: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { max_steps: 10_000 }
    }
}

/// What a recorded step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Step 1: the initial configuration, before any table lookup.
    Initial,
    Shift { state: usize },
    Reduce { production: usize },
    Accept,
    /// No ACTION entry existed (or the step limit was hit).
    Error,
}

/// One immutable snapshot of the parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStep {
    /// 1-based step number.
    pub ordinal: usize,
    /// `(state, symbol)` pairs; position 0 carries state 0 and an empty
    /// symbol.
    pub stack: Vec<(usize, CompactString)>,
    /// Unconsumed tokens, always ending in `$`.
    pub remaining_input: Vec<CompactString>,
    /// The lookahead consulted for this step, pre-advance.
    pub lookahead: CompactString,
    pub action: StepAction,
    pub explanation: String,
    /// Ids of tree nodes created by this step.
    pub created_nodes: Vec<usize>,
    /// Stack symbols after position 0, then remaining input minus `$`.
    pub sentential_form: String,
}

/// Why a parse did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseFailure {
    /// An input token matching no declared terminal; no steps are recorded.
    UnknownToken {
        token: CompactString,
        position: usize,
    },
    /// The driver reached a configuration with no ACTION entry.
    Reject {
        state: usize,
        lookahead: CompactString,
        expected: Vec<CompactString>,
    },
    /// The step cap was hit; the table is likely malformed.
    StepLimitExceeded { limit: usize },
}

/// Everything one parse invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub success: bool,
    pub steps: Vec<ParseStep>,
    pub tree: ParseTree,
    /// The tokenized input including `$` (the raw split when tokenization
    /// itself failed).
    pub tokens: Vec<CompactString>,
    pub failure: Option<ParseFailure>,
}

/// A step-recording LR(1) shift-reduce driver.
///
/// The borrowed grammar and table are shared read-only; each call to
/// [`Driver::parse`] owns its step log and tree, so concurrent parses never
/// share mutable state.
pub struct Driver<'a> {
    grammar: &'a Grammar,
    table: &'a ParsingTable,
    config: DriverConfig,
}

impl<'a> Driver<'a> {
    /// Strict constructor: refuses a table with recorded conflicts.
    ///
    /// # Errors
    ///
    /// [`DriverError::ConflictedTable`] when the table is ambiguous.
    pub fn new(grammar: &'a Grammar, table: &'a ParsingTable) -> Result<Self, DriverError> {
        if table.is_conflict_free() {
            Ok(Self::lenient(grammar, table))
        } else {
            Err(DriverError::ConflictedTable {
                conflicts: table.conflicts().len(),
            })
        }
    }

    /// Lenient constructor: drives the tie-broken entries of a conflicted
    /// table.
    #[must_use]
    pub fn lenient(grammar: &'a Grammar, table: &'a ParsingTable) -> Self {
        Self {
            grammar,
            table,
            config: DriverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Tokenize `input` and run the shift-reduce loop, recording every step.
    ///
    /// # Errors
    ///
    /// Only internal invariant violations ([`DriverError::MissingGoto`],
    /// [`DriverError::StackUnderflow`]) — ordinary rejections come back as a
    /// [`ParseOutcome`] with `success == false`.
    pub fn parse(&self, input: &str) -> Result<ParseOutcome, DriverError> {
        let tokens = match reader::tokenize(self.grammar, input) {
            Ok(tokens) => tokens,
            Err(err) => {
                return Ok(ParseOutcome {
                    success: false,
                    steps: Vec::new(),
                    tree: ParseTree::default(),
                    tokens: input.split_whitespace().map(CompactString::from).collect(),
                    failure: Some(ParseFailure::UnknownToken {
                        token: err.token,
                        position: err.position,
                    }),
                });
            }
        };

        let mut stack: Vec<(usize, CompactString)> = vec![(0, CompactString::default())];
        let mut node_stack: Vec<usize> = Vec::new();
        let mut tree = ParseTree::default();
        let mut steps: Vec<ParseStep> = Vec::new();
        let mut pointer = 0usize;
        let mut failure = None;
        let mut success = false;

        record(
            &mut steps,
            &stack,
            &tokens,
            pointer,
            tokens[0].as_str(),
            StepAction::Initial,
            format!("Start in state 0 with lookahead '{}'", tokens[0]),
            Vec::new(),
        );

        loop {
            let lookahead = tokens[pointer].clone();

            if steps.len() >= self.config.max_steps {
                record(
                    &mut steps,
                    &stack,
                    &tokens,
                    pointer,
                    &lookahead,
                    StepAction::Error,
                    format!("Step limit of {} exceeded; aborting", self.config.max_steps),
                    Vec::new(),
                );
                failure = Some(ParseFailure::StepLimitExceeded {
                    limit: self.config.max_steps,
                });
                break;
            }

            let state = stack.last().map_or(0, |entry| entry.0);
            let lookahead_symbol = if lookahead == "$" {
                Symbol::EndOfInput
            } else {
                Symbol::Terminal(lookahead.clone())
            };

            match self.table.get_action(state, &lookahead_symbol) {
                None => {
                    let expected = self.table.expected_terminals(state);
                    record(
                        &mut steps,
                        &stack,
                        &tokens,
                        pointer,
                        &lookahead,
                        StepAction::Error,
                        format!(
                            "No action for state {state} with lookahead '{lookahead}'; expected one of: {}",
                            expected.join(", ")
                        ),
                        Vec::new(),
                    );
                    failure = Some(ParseFailure::Reject {
                        state,
                        lookahead,
                        expected,
                    });
                    break;
                }
                Some(Action::Shift(target)) => {
                    stack.push((target, lookahead.clone()));
                    let node = tree.push_leaf(lookahead.clone());
                    node_stack.push(node);
                    pointer += 1;
                    record(
                        &mut steps,
                        &stack,
                        &tokens,
                        pointer,
                        &lookahead,
                        StepAction::Shift { state: target },
                        format!("Shift: move to state {target} and push '{lookahead}'"),
                        vec![node],
                    );
                }
                Some(Action::Reduce(production)) => {
                    let rule = self.grammar.production(production);
                    let count = rule.rhs.len();
                    if stack.len() < count + 1 {
                        return Err(DriverError::StackUnderflow {
                            production,
                            needed: count,
                            depth: stack.len().saturating_sub(1),
                        });
                    }
                    let children = node_stack.split_off(node_stack.len() - count);
                    stack.truncate(stack.len() - count);
                    let state_after = stack.last().map_or(0, |entry| entry.0);
                    let lhs = rule.lhs.name();
                    let Some(target) = self.table.get_goto(state_after, lhs) else {
                        return Err(DriverError::MissingGoto {
                            state: state_after,
                            symbol: CompactString::from(lhs),
                            production,
                        });
                    };
                    stack.push((target, CompactString::from(lhs)));
                    let node = tree.push_internal(CompactString::from(lhs), production, children);
                    node_stack.push(node);
                    record(
                        &mut steps,
                        &stack,
                        &tokens,
                        pointer,
                        &lookahead,
                        StepAction::Reduce { production },
                        format!("Reduce: apply production {rule}"),
                        vec![node],
                    );
                }
                Some(Action::Accept) => {
                    if let Some(&root) = node_stack.last() {
                        tree.set_root(root);
                    }
                    success = true;
                    record(
                        &mut steps,
                        &stack,
                        &tokens,
                        pointer,
                        &lookahead,
                        StepAction::Accept,
                        "Accept: input successfully parsed".to_string(),
                        Vec::new(),
                    );
                    break;
                }
            }
        }

        Ok(ParseOutcome {
            success,
            steps,
            tree,
            tokens,
            failure,
        })
    }
}

/// Snapshot the configuration as it stands and append it to the log.
#[allow(clippy::too_many_arguments)]
fn record(
    steps: &mut Vec<ParseStep>,
    stack: &[(usize, CompactString)],
    tokens: &[CompactString],
    pointer: usize,
    lookahead: &str,
    action: StepAction,
    explanation: String,
    created_nodes: Vec<usize>,
) {
    let sentential_form = stack
        .iter()
        .skip(1)
        .map(|(_, name)| name.as_str())
        .chain(
            tokens[pointer..]
                .iter()
                .map(CompactString::as_str)
                .filter(|name| *name != "$"),
        )
        .collect::<Vec<_>>()
        .join(" ");

    steps.push(ParseStep {
        ordinal: steps.len() + 1,
        stack: stack.to_vec(),
        remaining_input: tokens[pointer..].to_vec(),
        lookahead: CompactString::from(lookahead),
        action,
        explanation,
        created_nodes,
        sentential_form,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build_automaton;
    use crate::build_grammar;
    use crate::table::build_table;

    fn pipeline(text: &str) -> (Grammar, ParsingTable) {
        let grammar = build_grammar(text, "S").unwrap();
        let automaton = build_automaton(&grammar).unwrap();
        let table = build_table(&grammar, &automaton);
        (grammar, table)
    }

    #[test]
    fn test_single_token_grammar() {
        let (grammar, table) = pipeline("S -> id\n");
        let outcome = Driver::new(&grammar, &table).unwrap().parse("id").unwrap();

        assert!(outcome.success);
        assert!(outcome.failure.is_none());
        // initial, shift id, reduce S → id, accept
        assert_eq!(outcome.steps.len(), 4);
        assert_eq!(outcome.steps[0].action, StepAction::Initial);
        assert!(matches!(outcome.steps[1].action, StepAction::Shift { .. }));
        assert_eq!(outcome.steps[2].action, StepAction::Reduce { production: 1 });
        assert_eq!(outcome.steps[3].action, StepAction::Accept);

        let root = outcome.tree.root().unwrap();
        assert_eq!(outcome.tree.node(root).unwrap().symbol, "S");
        assert_eq!(outcome.tree.leaf_yield(root), vec!["id"]);
    }

    #[test]
    fn test_steps_snapshot_post_action_configuration() {
        let (grammar, table) = pipeline("S -> id\n");
        let outcome = Driver::new(&grammar, &table).unwrap().parse("id").unwrap();

        let initial = &outcome.steps[0];
        assert_eq!(initial.stack, vec![(0, CompactString::default())]);
        assert_eq!(initial.remaining_input, vec!["id", "$"]);
        assert_eq!(initial.sentential_form, "id");

        let shift = &outcome.steps[1];
        assert_eq!(shift.stack.len(), 2);
        assert_eq!(shift.stack[1].1, "id");
        assert_eq!(shift.remaining_input, vec!["$"]);
        assert_eq!(shift.lookahead, "id");
        assert_eq!(shift.sentential_form, "id");

        let reduce = &outcome.steps[2];
        assert_eq!(reduce.stack[1].1, "S");
        assert_eq!(reduce.lookahead, "$");
        assert_eq!(reduce.sentential_form, "S");
    }

    #[test]
    fn test_reject_records_final_error_step() {
        let (grammar, table) = pipeline("S -> id + id\n");
        let outcome = Driver::new(&grammar, &table).unwrap().parse("id +").unwrap();

        assert!(!outcome.success);
        let last = outcome.steps.last().unwrap();
        assert_eq!(last.action, StepAction::Error);
        assert_eq!(last.lookahead, "$");
        match outcome.failure.as_ref().unwrap() {
            ParseFailure::Reject {
                lookahead,
                expected,
                ..
            } => {
                assert_eq!(lookahead, "$");
                assert_eq!(expected.as_slice(), ["id"]);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(outcome.tree.root().is_none());
    }

    #[test]
    fn test_unknown_token_produces_no_steps() {
        let (grammar, table) = pipeline("S -> id\n");
        let outcome = Driver::new(&grammar, &table).unwrap().parse("id ?").unwrap();

        assert!(!outcome.success);
        assert!(outcome.steps.is_empty());
        assert!(outcome.tree.is_empty());
        assert_eq!(
            outcome.failure,
            Some(ParseFailure::UnknownToken {
                token: "?".into(),
                position: 1
            })
        );
    }

    #[test]
    fn test_step_limit_aborts_with_diagnostic_step() {
        let (grammar, table) = pipeline("S -> id + id\n");
        let driver = Driver::new(&grammar, &table)
            .unwrap()
            .with_config(DriverConfig { max_steps: 2 });
        let outcome = driver.parse("id + id").unwrap();

        assert!(!outcome.success);
        assert_eq!(
            outcome.failure,
            Some(ParseFailure::StepLimitExceeded { limit: 2 })
        );
        assert_eq!(outcome.steps.last().unwrap().action, StepAction::Error);
    }

    #[test]
    fn test_strict_driver_refuses_conflicted_table() {
        let (grammar, table) = pipeline("S -> A a | B a\nA -> x\nB -> x\n");
        assert!(matches!(
            Driver::new(&grammar, &table),
            Err(DriverError::ConflictedTable { conflicts: 1 })
        ));
        // The lenient driver runs the tie-broken table.
        let outcome = Driver::lenient(&grammar, &table).parse("x a").unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn test_parse_twice_is_byte_identical() {
        let (grammar, table) = pipeline("S -> id + id\n");
        let driver = Driver::new(&grammar, &table).unwrap();
        let first = driver.parse("id + id").unwrap();
        let second = driver.parse("id + id").unwrap();
        assert_eq!(first, second);
    }
}
