//! Structural deep-merge of two value trees.
//!
//! Used by batch workflows that fold a pile of documents into one base. The
//! policy is deliberately simple: tables merge recursively, scalars resolve
//! left-biased (the first operand's value survives, no provenance tracking
//! exists), and a table on one side against a scalar on the other is fatal,
//! because it means the two documents disagree about the shape of the data.
//!
//! ```rust
//! use luadata::{merge_tables, parse_text, to_string};
//!
//! let base = parse_text("herbs = { [201] = 3 }\n").unwrap();
//! let extra = parse_text("herbs = { [202] = 5 }\nore = {}\n").unwrap();
//! let merged = merge_tables(&base, &extra).unwrap();
//! assert_eq!(
//!     to_string(&merged),
//!     "herbs = {\n\t[201] = 3,\n\t[202] = 5,\n}\nore = {\n}\n"
//! );
//! ```

use crate::error::MergeError;
use crate::table::LuaTable;
use crate::value::LuaValue;

/// Deep-merges two optional values into a new one. `None` means the operand
/// is absent: `merge(None, None)` is an empty table, and an absent side
/// yields the other unchanged. Inputs are never mutated.
///
/// # Errors
///
/// [`MergeError::ShapeMismatch`] when one operand holds a table and the
/// other a scalar under the same key.
pub fn merge(
    left: Option<&LuaValue>,
    right: Option<&LuaValue>,
) -> Result<LuaValue, MergeError> {
    let mut path = Vec::new();
    merge_at(&mut path, left, right)
}

/// Deep-merges two tables; the table-level entry point of [`merge`].
///
/// # Errors
///
/// [`MergeError::ShapeMismatch`] when the operands disagree about a key's
/// shape anywhere in the tree.
pub fn merge_tables(left: &LuaTable, right: &LuaTable) -> Result<LuaTable, MergeError> {
    let mut path = Vec::new();
    merge_tables_at(&mut path, left, right)
}

fn merge_at(
    path: &mut Vec<String>,
    left: Option<&LuaValue>,
    right: Option<&LuaValue>,
) -> Result<LuaValue, MergeError> {
    match (left, right) {
        (None, None) => Ok(LuaValue::Table(LuaTable::new())),
        (Some(value), None) | (None, Some(value)) => Ok(value.clone()),
        (Some(LuaValue::Table(a)), Some(LuaValue::Table(b))) => {
            Ok(LuaValue::Table(merge_tables_at(path, a, b)?))
        }
        (Some(a), Some(b)) => {
            if a.is_table() != b.is_table() {
                return Err(MergeError::ShapeMismatch {
                    path: render_path(path),
                });
            }
            // left-biased: on disagreement the right operand is discarded
            Ok(a.clone())
        }
    }
}

fn merge_tables_at(
    path: &mut Vec<String>,
    left: &LuaTable,
    right: &LuaTable,
) -> Result<LuaTable, MergeError> {
    let mut merged = LuaTable::with_capacity(left.len().max(right.len()));
    for (key, value) in left.iter_sorted() {
        path.push(key.canonical());
        let combined = merge_at(path, Some(value), right.get(key))?;
        path.pop();
        merged.set(key.clone(), combined);
    }
    for (key, value) in right.iter_sorted() {
        if !left.contains_key(key) {
            merged.set(key.clone(), value.clone());
        }
    }
    Ok(merged)
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, LuaValue)]) -> LuaTable {
        let mut t = LuaTable::new();
        for (key, value) in pairs {
            t.set(LuaValue::from(*key), value.clone());
        }
        t
    }

    #[test]
    fn both_absent_yields_empty_table() {
        let merged = merge(None, None).unwrap();
        assert_eq!(merged, LuaValue::Table(LuaTable::new()));
    }

    #[test]
    fn absent_side_passes_through() {
        let value = LuaValue::from(42);
        assert_eq!(merge(Some(&value), None).unwrap(), value);
        assert_eq!(merge(None, Some(&value)).unwrap(), value);
    }

    #[test]
    fn left_wins_on_scalar_conflict() {
        let a = table(&[("a", LuaValue::from(1))]);
        let b = table(&[("a", LuaValue::from(2))]);
        let merged = merge_tables(&a, &b).unwrap();
        assert_eq!(merged.get(&LuaValue::from("a")), Some(&LuaValue::from(1)));
    }

    #[test]
    fn disjoint_keys_union() {
        let a = table(&[("a", LuaValue::from(1))]);
        let b = table(&[("b", LuaValue::from(2))]);
        let merged = merge_tables(&a, &b).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(&LuaValue::from("a")), Some(&LuaValue::from(1)));
        assert_eq!(merged.get(&LuaValue::from("b")), Some(&LuaValue::from(2)));
    }

    #[test]
    fn nested_tables_recurse() {
        let a = table(&[("zone", LuaValue::from(table(&[("x", LuaValue::from(1))])))]);
        let b = table(&[("zone", LuaValue::from(table(&[("y", LuaValue::from(2))])))]);
        let merged = merge_tables(&a, &b).unwrap();
        let zone = merged
            .get(&LuaValue::from("zone"))
            .and_then(LuaValue::as_table)
            .unwrap();
        assert_eq!(zone.len(), 2);
    }

    #[test]
    fn shape_mismatch_is_fatal() {
        let a = table(&[("a", LuaValue::from(table(&[("x", LuaValue::from(1))])))]);
        let b = table(&[("a", LuaValue::from(5))]);
        let err = merge_tables(&a, &b).unwrap_err();
        assert_eq!(
            err,
            MergeError::ShapeMismatch {
                path: "\"a\"".to_string(),
            }
        );
        // symmetric
        assert!(merge_tables(&b, &a).is_err());
    }

    #[test]
    fn mismatch_path_points_into_the_tree() {
        let a = table(&[(
            "outer",
            LuaValue::from(table(&[("inner", LuaValue::from(1))])),
        )]);
        let b = table(&[(
            "outer",
            LuaValue::from(table(&[("inner", LuaValue::from(LuaTable::new()))])),
        )]);
        let err = merge_tables(&a, &b).unwrap_err();
        assert_eq!(
            err,
            MergeError::ShapeMismatch {
                path: "\"outer\".\"inner\"".to_string(),
            }
        );
    }

    #[test]
    fn inputs_are_untouched() {
        let a = table(&[("a", LuaValue::from(1))]);
        let b = table(&[("a", LuaValue::from(2)), ("b", LuaValue::from(3))]);
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = merge_tables(&a, &b).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn equal_scalars_are_kept_once() {
        let a = table(&[("a", LuaValue::from(7))]);
        let b = table(&[("a", LuaValue::from(7))]);
        let merged = merge_tables(&a, &b).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(&LuaValue::from("a")), Some(&LuaValue::from(7)));
    }
}
