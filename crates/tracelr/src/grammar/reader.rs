//! Grammar-text reading and input tokenization.
//!
//! The notation is line-oriented: `LHS -> RHS | RHS | …`, symbols separated
//! by whitespace, `ε` / `epsilon` or an empty alternative for the empty
//! production, `#` line comments, and both `->` and `→` as the arrow. A
//! quoted symbol (`'+'` or `"+"`) is accepted by stripping the quotes.
//!
//! The reader emits opaque [`RawProduction`] names only; terminal versus
//! non-terminal classification needs the full production list and happens in
//! the grammar model.

use compact_str::CompactString;

use super::{Grammar, RawProduction};
use crate::error::{DiagnosticKind, GrammarDiagnostic, TokenizeError};

const EPSILON_MARKERS: [&str; 3] = ["ε", "epsilon", "eps"];

fn syntax_error(line: usize, fragment: &str, message: impl Into<String>) -> GrammarDiagnostic {
    GrammarDiagnostic::new(
        DiagnosticKind::Syntax,
        format!("line {line}: {}: '{fragment}'", message.into()),
    )
    .with_line(line)
    .with_symbol(fragment)
}

/// Strip one level of matching quotes from a symbol token.
fn unquote(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

/// Parse grammar text into raw productions, preserving source order.
///
/// Alternatives are expanded into one production each. Every malformed line
/// yields its own diagnostic so callers can show all problems at once.
///
/// # Errors
///
/// Returns every syntax diagnostic found when any line is malformed.
pub fn read_productions(text: &str) -> Result<Vec<RawProduction>, Vec<GrammarDiagnostic>> {
    let mut productions = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, source_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = source_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((lhs_part, rhs_part)) = split_arrow(trimmed) else {
            diagnostics.push(syntax_error(line, trimmed, "missing '->' in production"));
            continue;
        };

        let lhs = lhs_part.trim();
        if lhs.is_empty() || lhs.split_whitespace().count() != 1 {
            diagnostics.push(syntax_error(
                line,
                lhs_part.trim(),
                "left-hand side must be a single symbol",
            ));
            continue;
        }
        if EPSILON_MARKERS.contains(&lhs) {
            diagnostics.push(syntax_error(line, lhs, "ε cannot be a left-hand side"));
            continue;
        }

        for alternative in rhs_part.split('|') {
            let mut rhs = Vec::new();
            let mut bad = false;
            for token in alternative.split_whitespace() {
                if EPSILON_MARKERS.contains(&token) {
                    continue;
                }
                let name = unquote(token);
                if name.is_empty() {
                    diagnostics.push(syntax_error(line, token, "empty quoted symbol"));
                    bad = true;
                    break;
                }
                rhs.push(CompactString::from(name));
            }
            if !bad {
                productions.push(RawProduction {
                    line,
                    lhs: CompactString::from(lhs),
                    rhs,
                });
            }
        }
    }

    if diagnostics.is_empty() {
        Ok(productions)
    } else {
        Err(diagnostics)
    }
}

/// Split a production line at the first `->` or `→`.
fn split_arrow(line: &str) -> Option<(&str, &str)> {
    let ascii = line.find("->");
    let unicode = line.find('→');
    match (ascii, unicode) {
        (Some(a), Some(u)) if a < u => Some((&line[..a], &line[a + 2..])),
        (Some(a), None) => Some((&line[..a], &line[a + 2..])),
        (_, Some(u)) => Some((&line[..u], &line[u + '→'.len_utf8()..])),
        (None, None) => None,
    }
}

/// Tokenize driver input against the grammar's declared terminals.
///
/// Splits on whitespace, requires every token to match a declared terminal
/// name exactly, and appends the `$` end marker.
///
/// # Errors
///
/// Fails on the first token that matches no declared terminal.
pub fn tokenize(grammar: &Grammar, input: &str) -> Result<Vec<CompactString>, TokenizeError> {
    let mut tokens = Vec::new();
    for (position, token) in input.split_whitespace().enumerate() {
        if !grammar.is_terminal_name(token) {
            return Err(TokenizeError {
                token: CompactString::from(token),
                position,
            });
        }
        tokens.push(CompactString::from(token));
    }
    tokens.push(CompactString::from("$"));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_productions_and_alternatives() {
        let productions =
            read_productions("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | id\n").unwrap();
        assert_eq!(productions.len(), 6);
        assert_eq!(productions[0].lhs, "E");
        assert_eq!(productions[0].rhs, vec!["E", "+", "T"]);
        assert_eq!(productions[1].rhs, vec!["T"]);
        assert_eq!(productions[5].rhs, vec!["id"]);
    }

    #[test]
    fn test_comments_blank_lines_and_unicode_arrow() {
        let text = "# expression grammar\n\nE → T\n  \nT → id\n";
        let productions = read_productions(text).unwrap();
        assert_eq!(productions.len(), 2);
        assert_eq!(productions[0].line, 3);
        assert_eq!(productions[1].line, 5);
    }

    #[test]
    fn test_epsilon_spellings() {
        for text in ["L -> L x | ε", "L -> L x | epsilon", "L -> L x |"] {
            let productions = read_productions(text).unwrap();
            assert_eq!(productions.len(), 2, "{text}");
            assert!(productions[1].rhs.is_empty(), "{text}");
        }
    }

    #[test]
    fn test_quoted_terminals_are_unquoted() {
        let productions = read_productions("E -> E '+' T | T\nT -> \"id\"\n").unwrap();
        assert_eq!(productions[0].rhs, vec!["E", "+", "T"]);
        assert_eq!(productions[2].rhs, vec!["id"]);
    }

    #[test]
    fn test_malformed_lines_all_reported() {
        let err = read_productions("E =>\nA B -> c\nε -> x\n").unwrap_err();
        assert_eq!(err.len(), 3);
        assert_eq!(err[0].line, Some(1));
        assert_eq!(err[1].line, Some(2));
        assert_eq!(err[2].line, Some(3));
        assert!(err.iter().all(|d| d.kind == DiagnosticKind::Syntax));
    }

    #[test]
    fn test_tokenize_appends_end_marker() {
        let grammar = crate::build_grammar("S -> id + id\n", "S").unwrap();
        let tokens = tokenize(&grammar, "id + id").unwrap();
        assert_eq!(tokens, vec!["id", "+", "id", "$"]);
    }

    #[test]
    fn test_tokenize_rejects_unknown_token() {
        let grammar = crate::build_grammar("S -> id\n", "S").unwrap();
        let err = tokenize(&grammar, "id ? id").unwrap_err();
        assert_eq!(err.token, "?");
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_tokenize_empty_input_is_just_the_end_marker() {
        let grammar = crate::build_grammar("S -> id\n", "S").unwrap();
        assert_eq!(tokenize(&grammar, "  ").unwrap(), vec!["$"]);
    }
}
