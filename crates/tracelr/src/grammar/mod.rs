//! # Grammar Model
//!
//! Context-free grammar representation for LR(1) table construction.
//!
//! ## Overview
//!
//! A [`Grammar`] owns a production list whose index 0 is always the
//! synthesized augmented production `S' → S`, the terminal / non-terminal
//! partition derived from those productions, and the memoized FIRST and
//! FOLLOW sets. Grammars are built once — from text via [`build_grammar`]
//! (see [`reader`]) or from pre-split productions via [`Grammar::from_raw`] —
//! and are immutable afterwards, so they can be shared freely across threads
//! and across concurrent parses.
//!
//! Classification is dynamic: a name is a non-terminal exactly when it
//! appears as some production's left-hand side, so the text reader emits
//! opaque names and classification happens here, once every production is
//! known.
//!
//! [`build_grammar`]: crate::build_grammar

pub mod analysis;
pub mod reader;
pub mod symbol;
pub mod validate;

pub use symbol::Symbol;

use std::fmt;

use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use smallvec::{smallvec, SmallVec};

use crate::error::{DiagnosticKind, GrammarDiagnostic};

/// Set of symbols, as produced by FIRST/FOLLOW queries.
pub type SymbolSet = HashSet<Symbol>;

pub(crate) type NameMap<V> = HashMap<CompactString, V>;

/// A production as read from source text, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduction {
    /// 1-based source line the production came from.
    pub line: usize,
    pub lhs: CompactString,
    pub rhs: Vec<CompactString>,
}

/// A classified production `lhs → rhs`, identified by its stable index.
///
/// Index 0 is reserved for the augmented production; REDUCE actions and step
/// records refer to productions by this index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub index: usize,
    /// Always a [`Symbol::NonTerminal`].
    pub lhs: Symbol,
    /// Empty for an ε-production.
    pub rhs: SmallVec<[Symbol; 4]>,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} →", self.lhs.name())?;
        if self.rhs.is_empty() {
            write!(f, " ε")
        } else {
            for symbol in &self.rhs {
                write!(f, " {}", symbol.name())?;
            }
            Ok(())
        }
    }
}

/// An immutable context-free grammar, augmented and classified.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    start: Symbol,
    augmented_start: Symbol,
    /// Sorted; includes [`Symbol::EndOfInput`].
    terminals: Vec<Symbol>,
    /// Sorted; includes the augmented start.
    non_terminals: Vec<Symbol>,
    by_lhs: NameMap<Vec<usize>>,
    first: NameMap<SymbolSet>,
    follow: NameMap<SymbolSet>,
    warnings: Vec<GrammarDiagnostic>,
}

impl Grammar {
    /// Build a grammar from raw productions and a start-symbol name.
    ///
    /// Synthesizes the augmented production, classifies every name (LHS of
    /// any production ⇒ non-terminal, otherwise terminal), runs validation,
    /// and computes FIRST/FOLLOW.
    ///
    /// # Errors
    ///
    /// Returns the full diagnostic list when any fatal diagnostic is present
    /// (undefined non-terminal, undefined start symbol, reserved symbol).
    /// Non-fatal diagnostics are retained on the grammar; see
    /// [`Grammar::diagnostics`].
    pub fn from_raw(
        raw: Vec<RawProduction>,
        start: &str,
    ) -> Result<Self, Vec<GrammarDiagnostic>> {
        let mut diagnostics = Vec::new();

        for production in &raw {
            if production.lhs == "$" {
                diagnostics.push(
                    GrammarDiagnostic::new(
                        DiagnosticKind::ReservedSymbol,
                        "'$' is reserved for end of input and cannot be a left-hand side",
                    )
                    .with_line(production.line)
                    .with_symbol("$"),
                );
            }
            for name in &production.rhs {
                if name.as_str() == "$" {
                    diagnostics.push(
                        GrammarDiagnostic::new(
                            DiagnosticKind::ReservedSymbol,
                            "'$' is reserved for end of input and cannot appear in a production",
                        )
                        .with_line(production.line)
                        .with_symbol("$"),
                    );
                }
            }
        }

        let lhs_names: HashSet<CompactString> =
            raw.iter().map(|production| production.lhs.clone()).collect();

        if !lhs_names.contains(start) {
            diagnostics.push(
                GrammarDiagnostic::new(
                    DiagnosticKind::UndefinedStartSymbol,
                    format!("start symbol '{start}' has no productions"),
                )
                .with_symbol(start),
            );
        }

        // Pick an augmented-start name that cannot collide with a user name.
        let mut augmented_name = CompactString::from(start);
        augmented_name.push('\'');
        while lhs_names.contains(&augmented_name) {
            augmented_name.push('\'');
        }

        let classify = |name: &CompactString| -> Symbol {
            if lhs_names.contains(name) {
                Symbol::NonTerminal(name.clone())
            } else {
                Symbol::Terminal(name.clone())
            }
        };

        let start_symbol = Symbol::non_terminal(start);
        let augmented_start = Symbol::NonTerminal(augmented_name);

        let mut productions = Vec::with_capacity(raw.len() + 1);
        productions.push(Production {
            index: 0,
            lhs: augmented_start.clone(),
            rhs: smallvec![start_symbol.clone()],
        });
        for production in &raw {
            let index = productions.len();
            productions.push(Production {
                index,
                lhs: Symbol::NonTerminal(production.lhs.clone()),
                rhs: production.rhs.iter().map(&classify).collect(),
            });
        }

        // A terminal-classified name that looks like a non-terminal is almost
        // certainly a forgotten definition, not an intentional terminal.
        {
            let mut reported: HashSet<&CompactString> = HashSet::new();
            for production in &productions[1..] {
                for symbol in &production.rhs {
                    if let Symbol::Terminal(name) = symbol
                        && name.chars().next().is_some_and(char::is_uppercase)
                        && reported.insert(name)
                    {
                        diagnostics.push(
                            GrammarDiagnostic::new(
                                DiagnosticKind::UndefinedNonTerminal,
                                format!("symbol '{name}' appears to be a non-terminal but has no productions"),
                            )
                            .with_symbol(name.clone()),
                        );
                    }
                }
            }
        }

        diagnostics.extend(validate::check(&productions, &start_symbol));

        if diagnostics.iter().any(|d| d.kind.is_fatal()) {
            return Err(diagnostics);
        }

        let mut terminals: Vec<Symbol> = productions
            .iter()
            .flat_map(|production| production.rhs.iter())
            .filter(|symbol| symbol.is_terminal())
            .cloned()
            .collect();
        terminals.push(Symbol::EndOfInput);
        terminals.sort();
        terminals.dedup();

        let mut non_terminals: Vec<Symbol> = productions
            .iter()
            .map(|production| production.lhs.clone())
            .collect();
        non_terminals.sort();
        non_terminals.dedup();

        let mut by_lhs: NameMap<Vec<usize>> = HashMap::new();
        for production in &productions {
            by_lhs
                .entry(CompactString::from(production.lhs.name()))
                .or_default()
                .push(production.index);
        }

        let first = analysis::compute_first(&productions);
        let follow = analysis::compute_follow(&productions, &first, &augmented_start);

        Ok(Self {
            productions,
            start: start_symbol,
            augmented_start,
            terminals,
            non_terminals,
            by_lhs,
            first,
            follow,
            warnings: diagnostics,
        })
    }

    /// All productions; index 0 is the augmented production.
    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The production with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; production indices come from this
    /// grammar's own tables, so an out-of-range index is a caller bug.
    #[must_use]
    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    /// Indices of the productions whose LHS has the given name.
    #[must_use]
    pub fn productions_for(&self, name: &str) -> &[usize] {
        self.by_lhs.get(name).map_or(&[], Vec::as_slice)
    }

    /// The user-declared start symbol.
    #[must_use]
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// The synthesized augmented start symbol (`S'`).
    #[must_use]
    pub fn augmented_start(&self) -> &Symbol {
        &self.augmented_start
    }

    /// Sorted terminals, `$` included.
    #[must_use]
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    /// Sorted non-terminals, the augmented start included.
    #[must_use]
    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    /// Whether `name` is a declared terminal (the `$` marker is not).
    #[must_use]
    pub fn is_terminal_name(&self, name: &str) -> bool {
        self.terminals
            .iter()
            .any(|symbol| symbol.is_terminal() && symbol.name() == name)
    }

    /// Memoized FIRST set of a non-terminal; may contain [`Symbol::Epsilon`].
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&SymbolSet> {
        self.first.get(name)
    }

    /// Memoized FOLLOW set of a non-terminal.
    #[must_use]
    pub fn follow(&self, name: &str) -> Option<&SymbolSet> {
        self.follow.get(name)
    }

    /// FIRST of a symbol sequence; contains ε iff every symbol is nullable.
    #[must_use]
    pub fn first_of(&self, symbols: &[Symbol]) -> SymbolSet {
        analysis::first_of_slice(&self.first, symbols)
    }

    /// FIRST(βa) for CLOSURE: terminals only, ε replaced by the lookahead.
    pub(crate) fn lookahead_first(&self, suffix: &[Symbol], lookahead: &Symbol) -> SymbolSet {
        let mut set = self.first_of(suffix);
        if set.remove(&Symbol::Epsilon) {
            set.insert(lookahead.clone());
        }
        set
    }

    /// Non-fatal diagnostics recorded during construction.
    #[must_use]
    pub fn diagnostics(&self) -> &[GrammarDiagnostic] {
        &self.warnings
    }

    /// Render the user productions back to grammar-text notation.
    ///
    /// The augmented production is skipped; alternatives of consecutive
    /// productions with the same LHS are joined with `|`. Reading the result
    /// back reproduces the production list in the same order, which is what
    /// makes the text round-trip rebuild identical automata and tables.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut previous_lhs: Option<&str> = None;
        for production in &self.productions[1..] {
            let rhs = if production.rhs.is_empty() {
                "ε".to_string()
            } else {
                production
                    .rhs
                    .iter()
                    .map(Symbol::name)
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            if previous_lhs == Some(production.lhs.name()) {
                out.push_str(" | ");
                out.push_str(&rhs);
            } else {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(production.lhs.name());
                out.push_str(" -> ");
                out.push_str(&rhs);
            }
            previous_lhs = Some(production.lhs.name());
        }
        out.push('\n');
        out
    }
}
