use luadata::{merge_tables, parse_reader, parse_text, to_string, LuaTable, LuaValue, MergeError};

fn name(s: &str) -> LuaValue {
    LuaValue::Identifier(s.into())
}

const HERB_DB: &str = r#"
GatherMateHerbDB = {
	[301] = {
		[101010] = 415,
	},
	[201] = {
		[494471] = 402,
		[327350] = 402,
	},
}
GatherMateDB = {
	["profileKeys"] = {
		["Gatherer - Dunemaul"] = "Default",
	},
}
"#;

const HERB_DB_CANONICAL: &str = "GatherMateDB = {\n\
\t[\"profileKeys\"] = {\n\
\t\t[\"Gatherer - Dunemaul\"] = \"Default\",\n\
\t},\n\
}\n\
GatherMateHerbDB = {\n\
\t[201] = {\n\
\t\t[327350] = 402,\n\
\t\t[494471] = 402,\n\
\t},\n\
\t[301] = {\n\
\t\t[101010] = 415,\n\
\t},\n\
}\n";

#[test]
fn database_parses_and_canonicalizes() {
    let root = parse_text(HERB_DB).unwrap();
    assert_eq!(to_string(&root), HERB_DB_CANONICAL);
}

#[test]
fn canonical_text_is_a_fixed_point() {
    let root = parse_text(HERB_DB).unwrap();
    let once = to_string(&root);
    let again = to_string(&parse_text(&once).unwrap());
    assert_eq!(once, again);
    assert_eq!(parse_text(&once).unwrap(), root);
}

#[test]
fn serialization_is_deterministic() {
    let root = parse_text(HERB_DB).unwrap();
    assert_eq!(to_string(&root), to_string(&root.clone()));
}

#[test]
fn key_order_ignores_source_order() {
    let forward = parse_text("a = 1\nb = 2\nc = 3\n").unwrap();
    let backward = parse_text("c = 3\nb = 2\na = 1\n").unwrap();
    assert_eq!(forward, backward);
    assert_eq!(to_string(&forward), to_string(&backward));
}

#[test]
fn implicit_indices_render_with_annotations() {
    let root = parse_text("t = {10, 20, 30}\n").unwrap();
    assert_eq!(
        to_string(&root),
        "t = {\n\t10, -- [1]\n\t20, -- [2]\n\t30, -- [3]\n}\n"
    );
    assert_eq!(parse_text(&to_string(&root)).unwrap(), root);
}

#[test]
fn eleven_element_array_round_trips() {
    // two-digit keys sort before "2", so most entries render explicitly,
    // but re-parsing still reproduces the same table
    let root = parse_text("t = {1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11}\n").unwrap();
    let canonical = to_string(&root);
    assert_eq!(parse_text(&canonical).unwrap(), root);
}

#[test]
fn long_string_round_trips_as_quoted() {
    let root = parse_text("note = [[\nline one\nline two\n]]\n").unwrap();
    assert_eq!(
        root.get(&name("note")),
        Some(&LuaValue::from("line one\nline two\n"))
    );
    let canonical = to_string(&root);
    assert_eq!(canonical, "note = \"line one\\nline two\\n\"\n");
    assert_eq!(parse_text(&canonical).unwrap(), root);
}

#[test]
fn escaped_strings_round_trip() {
    let root = parse_text("s = \"tab\\there \\[and\\] 'quotes'\"\n").unwrap();
    assert_eq!(
        root.get(&name("s")),
        Some(&LuaValue::from("tab\there [and] 'quotes'"))
    );
    assert_eq!(parse_text(&to_string(&root)).unwrap(), root);
}

#[test]
fn reader_and_text_agree() {
    let from_reader = parse_reader(std::io::Cursor::new(HERB_DB)).unwrap();
    assert_eq!(from_reader, parse_text(HERB_DB).unwrap());
}

#[test]
fn batch_merge_workflow() {
    let base = parse_text(
        "GatherMateHerbDB = {\n\t[201] = {\n\t\t[1] = 402,\n\t\t[2] = 403,\n\t},\n}\n",
    )
    .unwrap();
    let addition = parse_text(
        "GatherMateHerbDB = {\n\t[201] = {\n\t\t[2] = 999,\n\t\t[3] = 404,\n\t},\n\t[301] = {\n\t\t[9] = 415,\n\t},\n}\n",
    )
    .unwrap();

    let merged = merge_tables(&base, &addition).unwrap();
    assert_eq!(
        to_string(&merged),
        "GatherMateHerbDB = {\n\
         \t[201] = {\n\
         \t\t402, -- [1]\n\
         \t\t403, -- [2]\n\
         \t\t404, -- [3]\n\
         \t},\n\
         \t[301] = {\n\
         \t\t[9] = 415,\n\
         \t},\n\
         }\n"
    );
    // the originals are untouched
    assert_eq!(
        to_string(&base),
        "GatherMateHerbDB = {\n\t[201] = {\n\t\t402, -- [1]\n\t\t403, -- [2]\n\t},\n}\n"
    );
}

#[test]
fn merge_rejects_shape_disagreement() {
    let a = parse_text("db = { [\"profiles\"] = {} }\n").unwrap();
    let b = parse_text("db = { [\"profiles\"] = 5 }\n").unwrap();
    let err = merge_tables(&a, &b).unwrap_err();
    assert!(matches!(err, MergeError::ShapeMismatch { .. }));
}

#[test]
fn failed_parse_yields_no_partial_document() {
    // the first statement is fine; the second is broken, so nothing is kept
    assert!(parse_text("good = 1\nbad = bad\n").is_err());
    let root = parse_text("good = 1\nbad = bad\n").unwrap_or_default();
    assert!(root.is_empty());
}

#[test]
fn json_projection() {
    let root = parse_text("list = {1, 2, 3}\nmeta = { [\"name\"] = \"x\", [5] = true }\n").unwrap();
    let json = serde_json::to_value(LuaValue::Table(root)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "list": [1, 2, 3],
            "meta": {"5": true, "name": "x"},
        })
    );
}

#[test]
fn json_import_serializes_as_document() {
    let value: LuaValue =
        serde_json::from_str(r#"{"a": [1, 2], "b": {"c": true}, "n": null}"#).unwrap();
    let table = match value {
        LuaValue::Table(table) => table.into_document(),
        other => panic!("expected a table, got {other}"),
    };
    assert_eq!(
        to_string(&table),
        "a = {\n\
         \t1, -- [1]\n\
         \t2, -- [2]\n\
         }\n\
         b = {\n\
         \t[\"c\"] = true,\n\
         }\n\
         n = nil\n"
    );
}

#[test]
fn api_built_document_round_trips() {
    let mut zone = LuaTable::new();
    zone.set(LuaValue::from(494471), LuaValue::from(402))
        .append(LuaValue::from("marker"));
    let mut root = LuaTable::new();
    root.set(name("zone"), LuaValue::from(zone))
        .set(name("ratio"), LuaValue::from(0.5))
        .set(name("title"), LuaValue::from("node map"));

    let canonical = to_string(&root);
    assert_eq!(parse_text(&canonical).unwrap(), root);
}

#[test]
fn whole_float_values_stay_floats() {
    let mut root = LuaTable::new();
    root.set(name("x"), LuaValue::from(1.0));
    let canonical = to_string(&root);
    assert_eq!(canonical, "x = 1.0\n");
    let reparsed = parse_text(&canonical).unwrap();
    assert_eq!(reparsed.get(&name("x")), Some(&LuaValue::from(1.0)));
}
