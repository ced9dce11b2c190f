//! The table type: a key-unique mapping from values to values.
//!
//! [`LuaTable`] stores its entries keyed by a canonicalized
//! `(type rank, canonical string)` projection of the key value, so two keys
//! are the same entry exactly when they are equal under the crate-wide value
//! ordering, independent of any hashing behavior of the key types
//! themselves. Insertion order is irrelevant to observable behavior:
//! iteration for serialization, comparison, and equality always runs in
//! sorted key order.
//!
//! A table's *array part* is implicit: the maximal run of integer keys
//! `1..N` all present. [`LuaTable::append`] extends that run, and the
//! serializer renders it without explicit keys.

use crate::token::keyword;
use crate::value::LuaValue;
use indexmap::IndexMap;
use num_bigint::BigInt;

/// Hashable projection of a key value; the equality/ordering contract of
/// [`LuaValue`] reduced to a plain comparable pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct TableKey {
    rank: u8,
    canonical: String,
}

impl TableKey {
    fn of(value: &LuaValue) -> Self {
        TableKey {
            rank: value.type_rank(),
            canonical: value.canonical(),
        }
    }
}

/// An insertion-order-independent, key-unique mapping from [`LuaValue`] to
/// [`LuaValue`]. Any value variant except `Nil` may be a key; duplicate keys
/// overwrite.
///
/// # Examples
///
/// ```rust
/// use luadata::{LuaTable, LuaValue};
///
/// let mut zones = LuaTable::new();
/// zones
///     .set(LuaValue::from("Duskwood"), LuaValue::from(201))
///     .append(LuaValue::from("first"));
/// assert_eq!(zones.len(), 2);
/// assert_eq!(
///     zones.get(&LuaValue::from("Duskwood")),
///     Some(&LuaValue::from(201))
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct LuaTable {
    entries: IndexMap<TableKey, (LuaValue, LuaValue)>,
}

impl LuaTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        LuaTable {
            entries: IndexMap::new(),
        }
    }

    /// Creates an empty table with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        LuaTable {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or overwrites the entry for `key`. Returns `self` for
    /// chaining.
    ///
    /// # Panics
    ///
    /// Panics if `key` is `Nil`; the parser rejects `nil` keys before they
    /// reach a table.
    pub fn set(&mut self, key: LuaValue, value: LuaValue) -> &mut Self {
        assert!(!key.is_nil(), "nil cannot be a table key");
        self.entries.insert(TableKey::of(&key), (key, value));
        self
    }

    /// Appends `value` at the next implicit index: the length of the array
    /// part plus one. The array part is the maximal run of integer keys
    /// `1..N` all present, so a table holding only key `5` appends at key
    /// `1`, not `6`.
    pub fn append(&mut self, value: LuaValue) -> &mut Self {
        let next = self.array_len() + 1;
        self.set(LuaValue::Integer(BigInt::from(next)), value)
    }

    /// Returns the value stored under `key`, compared by value equality.
    #[must_use]
    pub fn get(&self, key: &LuaValue) -> Option<&LuaValue> {
        self.entries.get(&TableKey::of(key)).map(|(_, value)| value)
    }

    /// Returns `true` if an entry exists for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &LuaValue) -> bool {
        self.entries.contains_key(&TableKey::of(key))
    }

    /// Length of the array part: the maximal `N` such that the integer keys
    /// `1..=N` are all present.
    #[must_use]
    pub fn array_len(&self) -> usize {
        let mut n = 0;
        while self.contains_key(&LuaValue::Integer(BigInt::from(n + 1))) {
            n += 1;
        }
        n
    }

    /// Returns `true` if every key is an integer (the keys need not be
    /// consecutive; see [`LuaTable::is_sequence`] for that).
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.entries
            .values()
            .all(|(key, _)| matches!(key, LuaValue::Integer(_)))
    }

    /// Returns `true` if the keys are exactly the integers `1..=len`.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.array_len() == self.len()
    }

    /// Iterates entries in sorted key order (the only order this type
    /// exposes).
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&LuaValue, &LuaValue)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, (key, value))| (key, value))
    }

    /// Iterates keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &LuaValue> {
        self.iter_sorted().map(|(key, _)| key)
    }

    /// Compact single-line rendering used as the canonical string of a table
    /// value in ordering and equality.
    pub(crate) fn canonical(&self) -> String {
        let mut out = String::from("{");
        for (key, value) in self.iter_sorted() {
            out.push('[');
            out.push_str(&key.canonical());
            out.push_str("]=");
            out.push_str(&value.canonical());
            out.push(',');
        }
        out.push('}');
        out
    }

    /// Rewrites identifier-shaped `String` keys as `Identifier` keys, so a
    /// table imported from a foreign format (where every key is a plain
    /// string) can serialize as a whole document of bare `name = value`
    /// lines. Keys that are not valid bare names are left alone.
    #[must_use]
    pub fn into_document(self) -> LuaTable {
        let mut doc = LuaTable::with_capacity(self.len());
        for (_, (key, value)) in self.entries {
            let key = match key {
                LuaValue::String(s) if is_bare_name(&s) => LuaValue::Identifier(s),
                other => other,
            };
            doc.set(key, value);
        }
        doc
    }
}

fn is_bare_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && keyword(s).is_none()
}

impl PartialEq for LuaTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.canonical() == other.canonical()
    }
}

impl Eq for LuaTable {}
