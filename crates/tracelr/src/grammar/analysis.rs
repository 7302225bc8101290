//! FIRST and FOLLOW set computation.
//!
//! Both sets are computed by monotone least-fixed-point iteration: a full
//! pass over the productions with a dirty flag, repeated until a pass adds
//! nothing. Set sizes are bounded by the symbol count and every pass is
//! monotone, so termination is guaranteed.

use super::{NameMap, Production, Symbol, SymbolSet};

/// FIRST of a symbol sequence, given per-non-terminal FIRST sets.
///
/// Returns terminals, plus [`Symbol::Epsilon`] iff the whole sequence is
/// nullable (an empty sequence is).
pub(crate) fn first_of_slice(first: &NameMap<SymbolSet>, symbols: &[Symbol]) -> SymbolSet {
    let mut set = SymbolSet::default();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(_) | Symbol::EndOfInput => {
                set.insert(symbol.clone());
                return set;
            }
            Symbol::Epsilon => {}
            Symbol::NonTerminal(name) => {
                let Some(nt_first) = first.get(name.as_str()) else {
                    return set;
                };
                set.extend(nt_first.iter().filter(|s| !s.is_epsilon()).cloned());
                if !nt_first.contains(&Symbol::Epsilon) {
                    return set;
                }
            }
        }
    }
    set.insert(Symbol::Epsilon);
    set
}

/// Per-non-terminal FIRST sets for the whole production list.
pub(crate) fn compute_first(productions: &[Production]) -> NameMap<SymbolSet> {
    let mut first: NameMap<SymbolSet> = NameMap::default();
    for production in productions {
        first
            .entry(production.lhs.name().into())
            .or_default();
    }

    loop {
        let mut changed = false;
        for production in productions {
            let derived = first_of_slice(&first, &production.rhs);
            let set = first
                .get_mut(production.lhs.name())
                .expect("every LHS is seeded");
            for symbol in derived {
                if set.insert(symbol) {
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    first
}

/// Per-non-terminal FOLLOW sets.
///
/// `$` seeds the augmented start; everything else propagates from
/// `B → α A β` (`FIRST(β) \ {ε}` into FOLLOW(A), and FOLLOW(B) when β is
/// nullable or empty).
pub(crate) fn compute_follow(
    productions: &[Production],
    first: &NameMap<SymbolSet>,
    augmented_start: &Symbol,
) -> NameMap<SymbolSet> {
    let mut follow: NameMap<SymbolSet> = NameMap::default();
    for production in productions {
        follow
            .entry(production.lhs.name().into())
            .or_default();
    }
    follow
        .get_mut(augmented_start.name())
        .expect("augmented start has a production")
        .insert(Symbol::EndOfInput);

    loop {
        let mut changed = false;
        for production in productions {
            for (i, symbol) in production.rhs.iter().enumerate() {
                let Symbol::NonTerminal(name) = symbol else {
                    continue;
                };
                let mut additions = first_of_slice(first, &production.rhs[i + 1..]);
                let nullable_rest = additions.remove(&Symbol::Epsilon);
                if nullable_rest
                    && let Some(lhs_follow) = follow.get(production.lhs.name())
                {
                    additions.extend(lhs_follow.iter().cloned());
                }
                let set = follow
                    .get_mut(name.as_str())
                    .expect("every referenced non-terminal has a production");
                for addition in additions {
                    if set.insert(addition) {
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    follow
}

#[cfg(test)]
mod tests {
    use crate::build_grammar;
    use crate::grammar::Symbol;

    const EXPR: &str = "\
S -> E
E -> E + T | T
T -> T * F | F
F -> ( E ) | id
";

    fn terminal_names(set: &crate::grammar::SymbolSet) -> Vec<String> {
        let mut names: Vec<String> = set.iter().map(|s| s.name().to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_first_sets_of_expression_grammar() {
        let grammar = build_grammar(EXPR, "S").unwrap();
        for name in ["S", "E", "T", "F"] {
            assert_eq!(
                terminal_names(grammar.first(name).unwrap()),
                vec!["(", "id"],
                "FIRST({name})"
            );
        }
    }

    #[test]
    fn test_follow_sets_of_expression_grammar() {
        let grammar = build_grammar(EXPR, "S").unwrap();
        assert_eq!(terminal_names(grammar.follow("S'").unwrap()), vec!["$"]);
        assert_eq!(terminal_names(grammar.follow("S").unwrap()), vec!["$"]);
        assert_eq!(
            terminal_names(grammar.follow("E").unwrap()),
            vec!["$", ")", "+"]
        );
        assert_eq!(
            terminal_names(grammar.follow("T").unwrap()),
            vec!["$", ")", "*", "+"]
        );
        assert_eq!(
            terminal_names(grammar.follow("F").unwrap()),
            vec!["$", ")", "*", "+"]
        );
    }

    #[test]
    fn test_first_with_nullable_chain() {
        let grammar = build_grammar("S -> A B\nA -> a | ε\nB -> b | ε\n", "S").unwrap();
        let first_s = grammar.first("S").unwrap();
        assert!(first_s.contains(&Symbol::terminal("a")));
        assert!(first_s.contains(&Symbol::terminal("b")));
        assert!(first_s.contains(&Symbol::Epsilon));

        assert_eq!(
            terminal_names(grammar.follow("A").unwrap()),
            vec!["$", "b"]
        );
        assert_eq!(terminal_names(grammar.follow("B").unwrap()), vec!["$"]);
    }

    #[test]
    fn test_first_of_sequence() {
        let grammar = build_grammar("S -> A b\nA -> a | ε\n", "S").unwrap();
        let seq = [Symbol::non_terminal("A"), Symbol::terminal("b")];
        let first = grammar.first_of(&seq);
        assert!(first.contains(&Symbol::terminal("a")));
        assert!(first.contains(&Symbol::terminal("b")));
        assert!(!first.contains(&Symbol::Epsilon));
    }
}
