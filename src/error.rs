//! Error types for lexing, parsing, and merging.
//!
//! Failures come in two layers. A lexical failure surfaces as a single
//! `ERROR` token that halts the token stream; the parser converts it into
//! [`Error::Lexical`]. Syntactic failures are the parser's own taxonomy,
//! each carrying the failing token's 1-based line and column. There is no
//! recovery and no partial document: a caller that wants to treat a broken
//! file as an empty one writes that policy itself, e.g.
//! `parse_text(text).unwrap_or_default()`.
//!
//! [`MergeError`] is separate: a table/non-table clash at a shared key means
//! the two documents are structurally incompatible, which is not a parse
//! problem.

use crate::token::{Token, TokenKind};
use thiserror::Error;

/// All errors the lexer/parser pipeline can produce.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The tokenizer emitted an `ERROR` token (malformed escape,
    /// unterminated string or long bracket, unrecognized input).
    #[error("lexical error at line {line}, column {column}: {message}")]
    Lexical {
        line: usize,
        column: usize,
        message: String,
    },

    /// The token cannot continue any production at this point.
    #[error("unexpected token {found} at line {line}, column {column}{expected}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        found: TokenKind,
        /// Pre-rendered `", expected ..."` suffix; empty when no candidate
        /// set is worth reporting.
        expected: String,
    },

    /// A delimiter implied a name must follow, but none did.
    #[error("name expected at line {line}, column {column}, found {found}")]
    NameMissing {
        line: usize,
        column: usize,
        found: TokenKind,
    },

    /// A delimiter implied an expression must follow, but none did.
    #[error("expression expected at line {line}, column {column}, found {found}")]
    ExpressionMissing {
        line: usize,
        column: usize,
        found: TokenKind,
    },

    /// Left/right list lengths of an assignment differ; nothing is assigned.
    #[error("assignment mismatch at line {line}, column {column}: {names} names but {values} values")]
    CountMismatch {
        line: usize,
        column: usize,
        names: usize,
        values: usize,
    },

    /// Valid Lua, but outside the literal data subset (variable references,
    /// calls, operators).
    #[error("unsupported construct {found} at line {line}, column {column}: only literal data is accepted")]
    UnsupportedToken {
        line: usize,
        column: usize,
        found: TokenKind,
    },

    /// Reading from an input stream failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    pub(crate) fn lexical(token: &Token) -> Self {
        Error::Lexical {
            line: token.line,
            column: token.column,
            message: token.text.clone(),
        }
    }

    pub(crate) fn unexpected(token: &Token, expected: &[TokenKind]) -> Self {
        let expected = match expected {
            [] => String::new(),
            [one] => format!(", expected {one}"),
            many => {
                let list: Vec<&str> = many.iter().map(|kind| kind.describe()).collect();
                format!(", expected one of {}", list.join(", "))
            }
        };
        Error::UnexpectedToken {
            line: token.line,
            column: token.column,
            found: token.kind,
            expected,
        }
    }

    pub(crate) fn name_missing(token: &Token) -> Self {
        Error::NameMissing {
            line: token.line,
            column: token.column,
            found: token.kind,
        }
    }

    pub(crate) fn expression_missing(token: &Token) -> Self {
        Error::ExpressionMissing {
            line: token.line,
            column: token.column,
            found: token.kind,
        }
    }

    pub(crate) fn count_mismatch(token: &Token, names: usize, values: usize) -> Self {
        Error::CountMismatch {
            line: token.line,
            column: token.column,
            names,
            values,
        }
    }

    pub(crate) fn unsupported(token: &Token) -> Self {
        Error::UnsupportedToken {
            line: token.line,
            column: token.column,
            found: token.kind,
        }
    }

    /// Line/column the error points at, when it carries a position.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lexical { line, column, .. }
            | Error::UnexpectedToken { line, column, .. }
            | Error::NameMissing { line, column, .. }
            | Error::ExpressionMissing { line, column, .. }
            | Error::CountMismatch { line, column, .. }
            | Error::UnsupportedToken { line, column, .. } => Some((*line, *column)),
            Error::Io(_) => None,
        }
    }
}

/// Structural merge failure: the operands disagree about a key's shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    /// One operand holds a table and the other a scalar at the same key.
    #[error("merge shape mismatch at key {path}: table on one side, scalar on the other")]
    ShapeMismatch { path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
