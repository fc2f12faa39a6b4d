use super::*;

fn sample() -> Value {
    let mut inner = Table::new();
    inner.insert(Key::new("port", Span::new(20, 24)), Value::Integer(8080));
    inner.insert(
        Key::new("hosts", Span::new(32, 37)),
        Value::Array(vec!["a".into(), "b".into()]),
    );
    let mut root = Table::new();
    root.insert(Key::new("server", Span::new(1, 7)), Value::Table(inner));
    Value::Table(root)
}

#[test]
fn accessors_match_only_their_type() {
    let ts: Timestamp = "1979-05-27T07:32:00Z".parse().unwrap();
    let values = [
        Value::Integer(1),
        Value::Float(1.5),
        Value::Boolean(true),
        Value::Datetime(ts),
        Value::String("s".into()),
        Value::Array(vec![Value::Integer(1)]),
        Value::Table(Table::new()),
    ];
    let names: Vec<_> = values.iter().map(Value::type_str).collect();
    assert_eq!(
        names,
        ["integer", "float", "boolean", "datetime", "string", "array", "table"]
    );

    assert_eq!(values[0].as_i64(), Some(1));
    assert_eq!(values[1].as_f64(), Some(1.5));
    assert_eq!(values[2].as_bool(), Some(true));
    assert_eq!(values[3].as_datetime(), Some(&ts));
    assert_eq!(values[4].as_str(), Some("s"));
    assert_eq!(values[5].as_array(), Some(&[Value::Integer(1)][..]));
    assert!(values[6].as_table().is_some());

    for (i, value) in values.iter().enumerate() {
        assert_eq!(value.as_i64().is_some(), i == 0);
        assert_eq!(value.as_f64().is_some(), i == 1);
        assert_eq!(value.as_bool().is_some(), i == 2);
        assert_eq!(value.as_datetime().is_some(), i == 3);
        assert_eq!(value.as_str().is_some(), i == 4);
        assert_eq!(value.as_array().is_some(), i == 5);
        assert_eq!(value.as_table().is_some(), i == 6);
    }
}

#[test]
fn indexing_and_lookup() {
    let value = sample();
    assert_eq!(value["server"]["port"].as_i64(), Some(8080));
    assert_eq!(value["server"]["hosts"][0].as_str(), Some("a"));
    assert_eq!(value["server"]["hosts"][1].as_str(), Some("b"));
    assert!(value.get("server").is_some());
    assert!(value.get("nope").is_none());
    assert!(Value::Integer(1).get("server").is_none());
}

#[test]
#[should_panic(expected = "no entry found for key `nope`")]
fn index_missing_key_panics() {
    let _ = &sample()["nope"];
}

#[test]
#[should_panic(expected = "cannot index integer with key `x`")]
fn index_wrong_type_panics() {
    let _ = &Value::Integer(3)["x"];
}

#[test]
#[should_panic(expected = "out of bounds")]
fn index_past_the_end_panics() {
    let _ = &sample()["server"]["hosts"][2];
}

#[test]
fn as_table_mut_allows_edits() {
    let mut value = sample();
    let server = value["server"].clone();
    let table = value.as_table_mut().unwrap();
    table.insert(Key::new("copy", Span::default()), server);
    assert_eq!(value["copy"], value["server"]);
    assert!(Value::Boolean(false).as_table_mut().is_none());
}

#[test]
fn debug_prints_plain_data() {
    let value = sample();
    assert_eq!(
        format!("{value:?}"),
        r#"{server: {port: 8080, hosts: ["a", "b"]}}"#
    );
    let ts: Timestamp = "2013-02-24T17:26:21Z".parse().unwrap();
    assert_eq!(format!("{:?}", Value::from(ts)), "2013-02-24T17:26:21Z");
}

#[test]
fn keys_compare_by_name() {
    let a = Key::new("a", Span::new(0, 1));
    let a2 = Key::new("a", Span::new(10, 11));
    let b = Key::new("b", Span::new(0, 1));
    assert_eq!(a, a2);
    assert!(a < b);
    assert_eq!(a.as_str(), "a");
    assert_eq!(a.to_string(), "a");
    assert_eq!(format!("{b:?}"), "b");
}

#[test]
fn conversions() {
    assert_eq!(Value::from(5i64), Value::Integer(5));
    assert_eq!(Value::from(0.25), Value::Float(0.25));
    assert_eq!(Value::from(false), Value::Boolean(false));
    assert_eq!(Value::from("x"), Value::String("x".into()));
    assert_eq!(Value::from(String::from("y")), Value::String("y".into()));
    assert_eq!(
        Value::from(vec![Value::from(1i64)]),
        Value::Array(vec![Value::Integer(1)])
    );
    assert_eq!(Value::from(Table::new()), Value::Table(Table::new()));
}

#[cfg(feature = "serde")]
#[test]
fn serialize_is_implemented_for_nested_data() {
    fn assert_serialize<T: serde::Serialize>(_: &T) {}
    let value = sample();
    assert_serialize(&value);
    assert_serialize(value.as_table().unwrap());
    assert_serialize(&Key::new("k", Span::default()));
}
