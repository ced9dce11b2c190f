//! # luadata
//!
//! A parser and canonical serializer for the Lua table-literal data format:
//! the assignment-per-name, nested-table dialect that games and addons use
//! for saved-variables databases.
//!
//! The crate reads a *data-only* subset of Lua — top-level assignments whose
//! right-hand sides are literals or nested table constructors — into a typed
//! value tree, and re-emits that tree as canonical source text: keys sorted
//! by a fixed total order, one tab per nesting level, a fixed escape table,
//! and `-- [N]` annotations on implicit array indices. Two semantically
//! equal documents serialize to byte-identical text no matter how they were
//! written, which makes the output stable under diffs and safe to merge.
//!
//! ## Quick start
//!
//! ```rust
//! use luadata::{parse_text, to_string, LuaValue};
//!
//! let text = r#"
//! MineDB = {
//!     ["Westfall"] = { 331, 472, 17 },
//! }
//! enabled = true
//! "#;
//!
//! let root = parse_text(text).unwrap();
//! assert_eq!(
//!     root.get(&LuaValue::Identifier("enabled".into())),
//!     Some(&LuaValue::Boolean(true))
//! );
//!
//! let canonical = to_string(&root);
//! assert_eq!(
//!     canonical,
//!     "MineDB = {\n\
//!      \t[\"Westfall\"] = {\n\
//!      \t\t331, -- [1]\n\
//!      \t\t472, -- [2]\n\
//!      \t\t17, -- [3]\n\
//!      \t},\n\
//!      }\n\
//!      enabled = true\n"
//! );
//!
//! // canonical text is a fixed point
//! assert_eq!(parse_text(&canonical).unwrap(), root);
//! ```
//!
//! ## Merging databases
//!
//! [`merge_tables`] deep-combines two documents: nested tables merge
//! recursively, scalar conflicts resolve in favor of the left operand, and
//! a table/scalar clash at the same key is an error because the documents
//! are structurally incompatible.
//!
//! ```rust
//! use luadata::{merge_tables, parse_text};
//!
//! let base = parse_text("db = { [201] = 3 }\n").unwrap();
//! let addition = parse_text("db = { [202] = 4 }\n").unwrap();
//! let merged = merge_tables(&base, &addition).unwrap();
//! assert_eq!(merged.get(&luadata::LuaValue::Identifier("db".into()))
//!     .and_then(|v| v.as_table()).map(|t| t.len()), Some(2));
//! ```
//!
//! ## Failure policy
//!
//! Parsing is fail-closed: any lexical or syntactic problem returns an
//! [`Error`] carrying the offending line and column, and no partial document
//! is ever produced. A caller that prefers an empty default document writes
//! that at the call site:
//!
//! ```rust
//! let root = luadata::parse_text("not || valid").unwrap_or_default();
//! assert!(root.is_empty());
//! ```
//!
//! ## Scope
//!
//! This is a data language, not a programming language: variable references,
//! function calls, operators, and control flow are rejected with an
//! "unsupported construct" error. Input is processed synchronously to
//! completion; every parse owns its own lexer and produces a fresh tree, so
//! separate parses may run on separate threads, and fully built values are
//! safe to share read-only. See the [`format`](crate::format) module for the
//! grammar and the canonical form in detail.

pub mod error;
pub mod format;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod ser;
pub mod table;
pub mod token;
pub mod value;

pub use error::{Error, MergeError, Result};
pub use lexer::Tokenizer;
pub use merge::{merge, merge_tables};
pub use parser::Parser;
pub use table::LuaTable;
pub use token::{Token, TokenKind};
pub use value::LuaValue;

use std::io;

/// Tokenizes a line source. Each yielded line is one physical line with its
/// terminator included (the final line may omit it).
pub fn tokenize<L>(lines: L) -> Tokenizer<L>
where
    L: Iterator<Item = String>,
{
    Tokenizer::new(lines)
}

/// Tokenizes a complete in-memory text.
///
/// # Examples
///
/// ```rust
/// use luadata::{tokenize_text, TokenKind};
///
/// let last = tokenize_text("x = 1").last().unwrap();
/// assert_eq!(last.kind, TokenKind::EndOfStream);
/// ```
#[must_use]
pub fn tokenize_text(text: &str) -> Tokenizer<std::vec::IntoIter<String>> {
    Tokenizer::from_text(text)
}

/// Parses a token stream into the root table.
///
/// # Errors
///
/// Any [`Error`] variant of the parser taxonomy, or [`Error::Lexical`] when
/// the stream contains an error token.
pub fn parse<I>(tokens: I) -> Result<LuaTable>
where
    I: Iterator<Item = Token>,
{
    Parser::new(tokens).parse()
}

/// Parses a complete in-memory text into the root table.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_text(text: &str) -> Result<LuaTable> {
    parse(tokenize_text(text))
}

/// Reads a stream to its end and parses it into the root table.
///
/// # Errors
///
/// [`Error::Io`] if reading fails, otherwise see [`parse`].
pub fn parse_reader<R: io::BufRead>(mut reader: R) -> Result<LuaTable> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .map_err(|e| Error::Io(e.to_string()))?;
        if n == 0 {
            break;
        }
        lines.push(line);
    }
    parse(tokenize(lines.into_iter()))
}

/// Serializes a root table to its canonical whole-document form.
#[must_use]
pub fn to_string(root: &LuaTable) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = root.serialize(&mut out, 0);
    out
}

/// Serializes a root table to a writer in canonical whole-document form.
///
/// # Errors
///
/// [`Error::Io`] if the writer fails.
pub fn to_writer<W: io::Write>(mut writer: W, root: &LuaTable) -> Result<()> {
    writer
        .write_all(to_string(root).as_bytes())
        .map_err(|e| Error::Io(e.to_string()))
}
