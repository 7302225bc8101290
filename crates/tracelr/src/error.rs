//! # Error Types
//!
//! Structured failure values for every layer of the pipeline.
//!
//! Nothing in this crate panics on bad input: grammar problems come back as
//! [`GrammarDiagnostic`] lists, resource limits as [`AutomatonError`], and
//! runtime parse problems either as a recorded rejection step or, for bugs in
//! table construction, as a [`DriverError`].

use compact_str::CompactString;
use serde::Serialize;
use thiserror::Error;

/// Category of a grammar diagnostic.
///
/// Fatal kinds abort grammar construction; the remaining kinds are reported
/// but the grammar is still built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A line of grammar text that does not match the `LHS -> RHS | RHS`
    /// shape.
    Syntax,
    /// A right-hand-side name that looks like a non-terminal but has no
    /// productions.
    UndefinedNonTerminal,
    /// The declared start symbol has no productions.
    UndefinedStartSymbol,
    /// `$` (or another reserved name) used as a grammar symbol.
    ReservedSymbol,
    /// A non-terminal that no derivation from the start symbol can reach.
    UnreachableFromStart,
    /// A symbol that never appears on any right-hand side and is not the
    /// start symbol.
    UnusedSymbol,
    /// The same production listed more than once verbatim.
    DuplicateProduction,
}

impl DiagnosticKind {
    /// Whether this diagnostic prevents the grammar from being constructed.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::Syntax
                | Self::UndefinedNonTerminal
                | Self::UndefinedStartSymbol
                | Self::ReservedSymbol
        )
    }
}

/// A single grammar problem, with enough context to point the user at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct GrammarDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// 1-based source line, for diagnostics raised while reading text.
    pub line: Option<usize>,
    /// The offending symbol name, when one symbol is to blame.
    pub symbol: Option<CompactString>,
}

impl GrammarDiagnostic {
    pub(crate) fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            symbol: None,
        }
    }

    pub(crate) fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub(crate) fn with_symbol(mut self, symbol: impl Into<CompactString>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// Failure while enumerating the canonical collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The canonical collection exceeded the configured state cap.
    #[error("state limit of {limit} exceeded while enumerating LR(1) item sets")]
    StateExplosion { limit: usize },
}

/// An input token that matches no declared terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown token '{token}' at position {position}")]
pub struct TokenizeError {
    pub token: CompactString,
    /// 0-based index of the offending token in the whitespace-split input.
    pub position: usize,
}

/// Errors raised by the parse driver.
///
/// `ConflictedTable` is a caller decision (strict drivers refuse ambiguous
/// tables); the other variants indicate a bug in table construction and carry
/// enough context to reproduce it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The parsing table has recorded conflicts and the driver was built in
    /// strict mode.
    #[error("parsing table has {conflicts} conflict(s); refusing to parse in strict mode")]
    ConflictedTable { conflicts: usize },

    /// A reduce landed in a state with no GOTO entry for the production's
    /// left-hand side.
    #[error("no GOTO entry for state {state} on '{symbol}' while reducing production {production}")]
    MissingGoto {
        state: usize,
        symbol: CompactString,
        production: usize,
    },

    /// A reduce asked for more stack entries than exist.
    #[error(
        "parse stack underflow: production {production} pops {needed} symbols but only {depth} are stacked"
    )]
    StackUnderflow {
        production: usize,
        needed: usize,
        depth: usize,
    },
}
