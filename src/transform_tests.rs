use super::*;
use crate::Span;
use crate::parser::{DEFAULT_MAX_ARRAY_DEPTH, Parser};

fn transform(src: &str) -> Result<Table, Error> {
    let doc = Parser::new(src, DEFAULT_MAX_ARRAY_DEPTH)
        .parse()
        .unwrap_or_else(|e| panic!("{src:?} did not parse: {e:?}"));
    Transform::new(src).document(doc)
}

#[track_caller]
fn transform_ok(src: &str) -> Table {
    transform(src).unwrap_or_else(|e| panic!("{src:?} failed: {e}"))
}

#[track_caller]
fn reassigned(src: &str) -> Error {
    match transform(src) {
        Ok(table) => panic!("expected a conflict for {src:?}, got {table:?}"),
        Err(err) => {
            assert!(err.is_conflict(), "{err}");
            err
        }
    }
}

fn table(entries: Vec<(&str, Value)>) -> Value {
    Value::Table(
        entries
            .into_iter()
            .map(|(k, v)| (Key::new(k, Span::default()), v))
            .collect(),
    )
}

#[test]
fn scalars() {
    let t = transform_ok(
        "i = -42\nf = 3.5\nt = true\nn = false\nd = 1979-05-27T07:32:00Z\ns = \"hi\"",
    );
    assert_eq!(t["i"], Value::Integer(-42));
    assert_eq!(t["f"], Value::Float(3.5));
    assert_eq!(t["t"], Value::Boolean(true));
    assert_eq!(t["n"], Value::Boolean(false));
    assert_eq!(
        t["d"].as_datetime().map(|d| d.unix_timestamp()),
        Some(296_638_320)
    );
    assert_eq!(t["s"].as_str(), Some("hi"));
}

#[test]
fn integer_bounds() {
    let t = transform_ok("max = 9223372036854775807\nmin = -9223372036854775808");
    assert_eq!(t["max"], Value::Integer(i64::MAX));
    assert_eq!(t["min"], Value::Integer(i64::MIN));

    let src = "ok = 1\nbig = 9223372036854775808";
    let err = transform(src).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange("i64"));
    assert!(err.is_syntax());
    assert_eq!((err.line, err.column), (2, 7));
}

#[test]
fn unescape_known_sequences() {
    assert_eq!(unescape(r"plain"), "plain");
    assert_eq!(unescape(r"a\nb"), "a\nb");
    assert_eq!(unescape(r#"\0\t\n\r\"\\"#), "\0\t\n\r\"\\");
    assert_eq!(unescape(r"\x41\x62"), "Ab");
    assert_eq!(unescape(r"\xe9"), "é");
    assert_eq!(unescape(r"\\x41"), r"\x41");
    // not produced by the grammar, passed through untouched
    assert_eq!(unescape(r"\q"), r"\q");
    assert_eq!(unescape(r"\x4"), r"\x4");
    assert_eq!(unescape(r"\xzz"), r"\xzz");
    assert_eq!(unescape("trailing\\"), "trailing\\");
}

#[test]
fn strings_are_unescaped() {
    let t = transform_ok(r#"k = "a\nb""#);
    assert_eq!(t["k"].as_str(), Some("a\nb"));
    let t = transform_ok(r#"k = "\x41""#);
    assert_eq!(t["k"].as_str(), Some("A"));
}

#[test]
fn arrays_convert_in_order() {
    let t = transform_ok("a = [3, 1, 2]\nb = [[1], [\"x\"]]");
    assert_eq!(
        t["a"],
        Value::Array(vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)])
    );
    assert_eq!(
        t["b"],
        Value::Array(vec![
            Value::Array(vec![Value::Integer(1)]),
            Value::Array(vec![Value::String("x".into())]),
        ])
    );
}

#[test]
fn flat_lists_overwrite_duplicates() {
    let t = transform_ok("a = 1\nb = 2\na = 3");
    assert_eq!(t.len(), 2);
    assert_eq!(t["a"], Value::Integer(3));
    let keys: Vec<_> = t.keys().map(Key::as_str).collect();
    assert_eq!(keys, ["a", "b"]);

    let t = transform_ok("[g]\nx = 1\nx = \"two\"");
    assert_eq!(t["g"]["x"].as_str(), Some("two"));
}

#[test]
fn dotted_assignment_keys_are_literal() {
    let t = transform_ok("a.b = 1");
    assert_eq!(t["a.b"], Value::Integer(1));
    assert!(t.get("a").is_none());
}

#[test]
fn group_paths_nest() {
    let t = transform_ok("[a.b]\nc = 1");
    let expected = table(vec![(
        "a",
        table(vec![("b", table(vec![("c", Value::Integer(1))]))]),
    )]);
    assert_eq!(Value::Table(t), expected);
}

#[test]
fn group_segments_keep_their_own_spans() {
    let src = "[alpha.beta]\n";
    let t = transform_ok(src);
    let (alpha, inner) = t.get_key_value("alpha").unwrap();
    assert_eq!(alpha.span, Span::new(1, 6));
    let (beta, _) = inner.as_table().unwrap().get_key_value("beta").unwrap();
    assert_eq!(beta.span, Span::new(7, 11));
}

#[test]
fn empty_groups_are_empty_tables() {
    let t = transform_ok("[g]\n#comment\n");
    assert_eq!(Value::Table(t), table(vec![("g", table(vec![]))]));

    let t = transform_ok("[a]\n[b.c]");
    assert_eq!(
        Value::Table(t),
        table(vec![
            ("a", table(vec![])),
            ("b", table(vec![("c", table(vec![]))])),
        ])
    );
}

#[test]
fn groups_merge_into_existing_tables() {
    let t = transform_ok("[a.b]\nx = 1\n[a.c]\ny = 2\n[a]\nz = 3");
    assert_eq!(t["a"]["b"]["x"], Value::Integer(1));
    assert_eq!(t["a"]["c"]["y"], Value::Integer(2));
    assert_eq!(t["a"]["z"], Value::Integer(3));
    let keys: Vec<_> = t["a"].as_table().unwrap().keys().map(Key::as_str).collect();
    assert_eq!(keys, ["b", "c", "z"]);

    // a repeated header that only adds keys is fine
    let t = transform_ok("[a]\nx = 1\n[a]\ny = 2");
    assert_eq!(t["a"].as_table().unwrap().len(), 2);
}

#[test]
fn the_overview_document() {
    let src = "title = \"global title\"\n[group1]\na = 1\nb = 2\n[group2]\nc = [3, 4]\n";
    let t = transform_ok(src);
    let expected = table(vec![
        ("title", "global title".into()),
        (
            "group1",
            table(vec![("a", Value::Integer(1)), ("b", Value::Integer(2))]),
        ),
        (
            "group2",
            table(vec![(
                "c",
                Value::Array(vec![Value::Integer(3), Value::Integer(4)]),
            )]),
        ),
    ]);
    assert_eq!(Value::Table(t), expected);
}

#[test]
fn value_over_value() {
    let src = "[a]\nx = 1\n[a]\nx = 2";
    let err = reassigned(src);
    assert_eq!(
        err.kind,
        ErrorKind::Reassign {
            key: "x".into(),
            first: Span::new(4, 5),
        }
    );
    assert_eq!((err.line, err.column), (4, 1));
    assert_eq!(err.span, Span::new(14, 15));
}

#[test]
fn table_over_value() {
    let err = reassigned("a = 1\n[a]\nb = 2");
    assert!(matches!(&err.kind, ErrorKind::Reassign { key, .. } if key == "a"));
    assert_eq!((err.line, err.column), (2, 2));

    let err = reassigned("[a]\nb = 1\n[a.b.c]");
    assert!(matches!(&err.kind, ErrorKind::Reassign { key, .. } if key == "b"));
    assert_eq!((err.line, err.column), (3, 4));
}

#[test]
fn value_over_table() {
    let err = reassigned("[a.b]\nc = 1\n[a]\nb = 2");
    assert!(matches!(&err.kind, ErrorKind::Reassign { key, .. } if key == "b"));
    assert_eq!((err.line, err.column), (4, 1));
    assert_eq!(err.to_string(), "cannot reassign key `b` at line 4 column 1");
}

#[test]
fn merge_directly() {
    let transform = Transform::new("");
    let mut existing = match table(vec![("a", table(vec![("x", Value::Integer(1))]))]) {
        Value::Table(t) => t,
        _ => unreachable!(),
    };
    let incoming = match table(vec![
        ("a", table(vec![("y", Value::Integer(2))])),
        ("b", Value::Boolean(true)),
    ]) {
        Value::Table(t) => t,
        _ => unreachable!(),
    };
    transform.merge(&mut existing, incoming).unwrap();
    assert_eq!(existing["a"]["x"], Value::Integer(1));
    assert_eq!(existing["a"]["y"], Value::Integer(2));
    assert_eq!(existing["b"], Value::Boolean(true));
}
