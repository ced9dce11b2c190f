//! The accepted input grammar and the canonical output form.
//!
//! This module only documents the format; the implementation lives in
//! [`lexer`](crate::lexer), [`parser`](crate::parser), and
//! [`ser`](crate::ser).
//!
//! # Input: a data-only subset of Lua
//!
//! The input is the table-literal dialect used by saved-variables files: a
//! sequence of top-level assignments whose right-hand sides are literals or
//! nested table constructors. It is a *data* language; nothing is evaluated.
//!
//! ```text
//! GatherMateHerbDB = {
//!     [201] = {
//!         [494471] = 402,  -- packed coordinate -> node id
//!         [327350] = 402,
//!     },
//! }
//! profileKeys = {
//!     ["Someone - Server"] = "Default",
//! }
//! ```
//!
//! ## Lexical elements
//!
//! - **Comments**: `-- to end of line`, or long-bracket blocks
//!   `--[[ ... ]]` / `--[==[ ... ]==]` spanning lines. The opener's `=`
//!   count must match the closer's.
//! - **Strings**: single- or double-quoted on one line, with the escapes
//!   `\a \b \f \n \r \t \v \' \" \\ \[ \]`; or long-bracket strings
//!   `[[ ... ]]` which span lines, interpret no escapes, and drop one line
//!   ending directly after the opener.
//! - **Numbers**: optional sign, digits with optional fraction, optional
//!   exponent (`0`, `+1`, `-23`, `4.`, `.5`, `10.11e12`). A spelling with a
//!   dot or exponent becomes a float, anything else an integer.
//! - **Names**: `[A-Za-z_][A-Za-z0-9_]*`, minus the reserved words.
//!
//! All reserved words and operators of the host language are recognized by
//! the lexer so that out-of-subset input fails with a precise diagnostic
//! instead of a confusing one.
//!
//! ## Statements
//!
//! ```text
//! statement  := namelist ['=' exprlist]
//! expr       := nil | true | false | NUMBER | STRING | table
//! table      := '{' field {(',' | ';') field} '}'
//! field      := '[' expr ']' '=' expr | expr
//! ```
//!
//! `a, b = 1, 2` assigns pairwise and the list lengths must match exactly.
//! `a, b` alone binds both names to `nil`. Positional fields take implicit
//! integer keys counted from 1; keyed and positional fields mix freely, and
//! a duplicated key keeps the value that appears last in the source.
//!
//! Out of scope by design: variable references (`x = y`), function calls,
//! arithmetic, the `name = expr` field shorthand, and `nil` keys. These
//! fail with an "unsupported construct" error.
//!
//! # Output: canonical form
//!
//! Serialization produces the unique canonical rendering of a value tree:
//!
//! - keys iterate in the crate-wide total order — by type rank
//!   (`Identifier < Boolean < Integer < Numeric < String < Table < Nil`),
//!   then by canonical string, which sorts integers lexicographically;
//! - indentation is one tab per nesting level;
//! - strings always use double quotes and the fixed escape table;
//! - an integer key equal to its 1-based position is elided and the entry
//!   annotated with a trailing `-- [N]` comment;
//! - the document (level 0) form has no enclosing braces: one
//!   `name = value` line per top-level entry.
//!
//! ```text
//! mix = {
//!     "sss", -- [1]
//!     123.456, -- [2]
//!     false, -- [3]
//!     [10] = "explicit key",
//! }
//! ```
//!
//! Two value trees are equal exactly when their canonical forms are byte
//! identical, so re-serializing a parsed canonical document reproduces it.
