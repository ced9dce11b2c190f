//! Canonical text rendering.
//!
//! Rendering lives on the value types ([`LuaValue::serialize`],
//! [`LuaTable::serialize`]) but is a responsibility of its own: it defines
//! the *canonical form* of a document. Keys are iterated in the crate-wide
//! sorted order, nesting indents by one tab per level, strings use the fixed
//! escape table, and an integer key equal to its 1-based position among the
//! iterated entries is elided and annotated with a trailing `-- [N]` comment
//! so a reader can still count positions.
//!
//! Level `0` is the whole-document form: no enclosing braces, one
//! `name = value` line per entry. Parsing the output reproduces an equal
//! value tree for every tree the parser can produce (floats that are NaN
//! have no literal spelling and are the one exception).
//!
//! ```rust
//! use luadata::{parse_text, to_string};
//!
//! let doc = parse_text("t = {30, 10, [10] = 1}\nname = 'x'\n").unwrap();
//! let canonical = to_string(&doc);
//! assert_eq!(parse_text(&canonical).unwrap(), doc);
//! ```

use crate::table::LuaTable;
use crate::value::LuaValue;
use num_bigint::BigInt;
use std::fmt::{self, Write};

/// Canonical spelling of a float. `Display` already yields the shortest
/// round-tripping digits; a `.0` is forced when no dot survives so the text
/// re-parses as a float rather than an integer. Infinities use an
/// overflowing literal that parses back to themselves; NaN has no literal
/// spelling at all.
pub(crate) fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "1e999" } else { "-1e999" }.to_string();
    }
    let mut s = f.to_string();
    if !s.contains(['.', 'e', 'E']) {
        s.push_str(".0");
    }
    s
}

/// Applies the fixed escape table. Control characters outside the table pass
/// through verbatim; the lexer reads them back as-is.
pub(crate) fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\u{0007}' => out.push_str("\\a"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{000B}' => out.push_str("\\v"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '[' => out.push_str("\\["),
            ']' => out.push_str("\\]"),
            other => out.push(other),
        }
    }
}

fn indent<W: Write>(out: &mut W, level: usize) -> fmt::Result {
    for _ in 0..level {
        out.write_char('\t')?;
    }
    Ok(())
}

impl LuaValue {
    /// Writes the canonical form of this value at the given nesting level.
    /// Level `0` is reserved for a whole document; see
    /// [`LuaTable::serialize`].
    pub fn serialize<W: Write>(&self, out: &mut W, level: usize) -> fmt::Result {
        match self {
            LuaValue::Table(table) => table.serialize(out, level),
            scalar => out.write_str(&scalar.canonical()),
        }
    }
}

impl LuaTable {
    /// Writes the canonical form of this table. At level `0` the enclosing
    /// braces are omitted and every entry becomes one top-level
    /// `name = value` line; nested levels render braced, comma-terminated
    /// entries indented by one tab per level.
    pub fn serialize<W: Write>(&self, out: &mut W, level: usize) -> fmt::Result {
        if level > 0 {
            out.write_str("{\n")?;
        }
        for (position, (key, value)) in self.iter_sorted().enumerate() {
            let position = position + 1;
            indent(out, level)?;
            let implicit = matches!(key, LuaValue::Integer(n) if *n == BigInt::from(position));
            if !implicit {
                match key {
                    LuaValue::Identifier(name) => out.write_str(name)?,
                    other => {
                        out.write_char('[')?;
                        other.serialize(out, level + 1)?;
                        out.write_char(']')?;
                    }
                }
                out.write_str(" = ")?;
            }
            value.serialize(out, level + 1)?;
            if level > 0 {
                out.write_char(',')?;
                if implicit {
                    write!(out, " -- [{position}]")?;
                }
            }
            out.write_char('\n')?;
        }
        if level > 0 {
            indent(out, level - 1)?;
            out.write_char('}')?;
        }
        Ok(())
    }
}
