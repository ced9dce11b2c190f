//! Dynamic value representation for parsed documents.
//!
//! [`LuaValue`] is the closed set of value variants the literal subset can
//! express. Every variant except [`LuaValue::Nil`] can also act as a table
//! key. Values are built bottom-up during parsing and are not mutated after
//! being nested into a parent, so fully constructed trees are safe to share
//! read-only across threads.
//!
//! ## Ordering
//!
//! All values are totally ordered by `(type rank, canonical string)` with the
//! fixed rank sequence `Identifier < Boolean < Integer < Numeric < String <
//! Table < Nil`. Two values are equal exactly when they share a rank and a
//! canonical string. This ordering drives table key iteration and makes the
//! serialized output deterministic regardless of construction order. Note
//! that it makes integer keys sort lexicographically on their decimal
//! spelling (`1 < 10 < 2`).
//!
//! ```rust
//! use luadata::LuaValue;
//!
//! let mut values = vec![
//!     LuaValue::Nil,
//!     LuaValue::from("text"),
//!     LuaValue::from(7),
//!     LuaValue::Boolean(true),
//! ];
//! values.sort();
//! assert_eq!(values.last(), Some(&LuaValue::Nil));
//! ```

use crate::ser;
use crate::table::LuaTable;
use num_bigint::BigInt;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A dynamically-typed value of the literal data subset.
///
/// `Integer` holds an arbitrary-precision integer (numeric tokens without a
/// decimal point or exponent); `Numeric` holds an `f64` (tokens with either).
/// `Identifier` is a bare name, distinct from `String` because it serializes
/// without quotes.
#[derive(Clone, Debug, Default)]
pub enum LuaValue {
    #[default]
    Nil,
    Boolean(bool),
    Integer(BigInt),
    Numeric(f64),
    String(String),
    Identifier(String),
    Table(LuaTable),
}

impl LuaValue {
    /// Position of this variant in the fixed type-rank sequence.
    pub(crate) const fn type_rank(&self) -> u8 {
        match self {
            LuaValue::Identifier(_) => 0,
            LuaValue::Boolean(_) => 1,
            LuaValue::Integer(_) => 2,
            LuaValue::Numeric(_) => 3,
            LuaValue::String(_) => 4,
            LuaValue::Table(_) => 5,
            LuaValue::Nil => 6,
        }
    }

    /// The canonical textual form of this value: the exact text the
    /// serializer emits for it in value position (tables use a compact
    /// single-line rendering here). Comparison and equality are defined over
    /// `(type rank, canonical string)`.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            LuaValue::Nil => "nil".to_string(),
            LuaValue::Boolean(true) => "true".to_string(),
            LuaValue::Boolean(false) => "false".to_string(),
            LuaValue::Integer(n) => n.to_string(),
            LuaValue::Numeric(f) => ser::float_repr(*f),
            LuaValue::String(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                ser::escape_into(s, &mut out);
                out.push('"');
                out
            }
            LuaValue::Identifier(name) => name.clone(),
            LuaValue::Table(table) => table.canonical(),
        }
    }

    /// Returns `true` if the value is `Nil`.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, LuaValue::Table(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LuaValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            LuaValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LuaValue::Integer(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// If the value is a float, returns it.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LuaValue::Numeric(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a string, returns it. Bare identifiers are a distinct
    /// variant; see [`LuaValue::as_name`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a bare identifier, returns its name.
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            LuaValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// If the value is a table, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&LuaTable> {
        match self {
            LuaValue::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LuaValue {}

impl PartialOrd for LuaValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LuaValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_rank()
            .cmp(&other.type_rank())
            .then_with(|| self.canonical().cmp(&other.canonical()))
    }
}

impl Hash for LuaValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        self.canonical().hash(state);
    }
}

impl fmt::Display for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<bool> for LuaValue {
    fn from(value: bool) -> Self {
        LuaValue::Boolean(value)
    }
}

impl From<i8> for LuaValue {
    fn from(value: i8) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<i16> for LuaValue {
    fn from(value: i16) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<i32> for LuaValue {
    fn from(value: i32) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<i64> for LuaValue {
    fn from(value: i64) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<u8> for LuaValue {
    fn from(value: u8) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<u16> for LuaValue {
    fn from(value: u16) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<u32> for LuaValue {
    fn from(value: u32) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<u64> for LuaValue {
    fn from(value: u64) -> Self {
        LuaValue::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for LuaValue {
    fn from(value: BigInt) -> Self {
        LuaValue::Integer(value)
    }
}

impl From<f32> for LuaValue {
    fn from(value: f32) -> Self {
        LuaValue::Numeric(value as f64)
    }
}

impl From<f64> for LuaValue {
    fn from(value: f64) -> Self {
        LuaValue::Numeric(value)
    }
}

impl From<&str> for LuaValue {
    fn from(value: &str) -> Self {
        LuaValue::String(value.to_string())
    }
}

impl From<String> for LuaValue {
    fn from(value: String) -> Self {
        LuaValue::String(value)
    }
}

impl From<LuaTable> for LuaValue {
    fn from(value: LuaTable) -> Self {
        LuaValue::Table(value)
    }
}

impl Serialize for LuaValue {
    /// Projects the value onto the data model of any serde format: tables
    /// whose keys are exactly `1..N` become sequences, other tables become
    /// maps with their keys projected to strings.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LuaValue::Nil => serializer.serialize_unit(),
            LuaValue::Boolean(b) => serializer.serialize_bool(*b),
            LuaValue::Integer(n) => match i64::try_from(n) {
                Ok(i) => serializer.serialize_i64(i),
                Err(_) => serializer.serialize_str(&n.to_string()),
            },
            LuaValue::Numeric(f) => serializer.serialize_f64(*f),
            LuaValue::String(s) | LuaValue::Identifier(s) => serializer.serialize_str(s),
            LuaValue::Table(table) => {
                if table.is_sequence() {
                    let mut seq = serializer.serialize_seq(Some(table.len()))?;
                    for (_, value) in table.iter_sorted() {
                        seq.serialize_element(value)?;
                    }
                    seq.end()
                } else {
                    let mut map = serializer.serialize_map(Some(table.len()))?;
                    for (key, value) in table.iter_sorted() {
                        let name = match key {
                            LuaValue::String(s) | LuaValue::Identifier(s) => s.clone(),
                            other => other.canonical(),
                        };
                        map.serialize_entry(&name, value)?;
                    }
                    map.end()
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for LuaValue {
    /// Builds a value tree from any self-describing format: maps become
    /// tables with string keys, sequences become tables with implicit
    /// integer keys. Use [`LuaTable::into_document`] afterwards if the
    /// result should serialize as a whole document.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = LuaValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any literal data value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(LuaValue::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(LuaValue::Integer(BigInt::from(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(LuaValue::Integer(BigInt::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(LuaValue::Numeric(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(LuaValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(LuaValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(LuaValue::Nil)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(LuaValue::Nil)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut table = LuaTable::new();
                while let Some(element) = seq.next_element()? {
                    table.append(element);
                }
                Ok(LuaValue::Table(table))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = LuaTable::new();
                while let Some((key, value)) = map.next_entry::<String, LuaValue>()? {
                    table.set(LuaValue::String(key), value);
                }
                Ok(LuaValue::Table(table))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
