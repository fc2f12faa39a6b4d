#![allow(missing_docs)]

use codespan_reporting::diagnostic::{Diagnostic, Label};
use toml_peg::{Table, Value};

/// Loads a valid document and asserts its JSON form matches the expected
/// `serde_json::json!` value. Without a literal the document is read from
/// `data/<name>.toml`.
#[macro_export]
macro_rules! valid {
    ($name:ident, $expected:tt) => {
        #[test]
        fn $name() {
            let toml_str = std::fs::read_to_string(concat!("data/", stringify!($name), ".toml"))
                .expect(concat!("failed to load ", stringify!($name), ".toml"));
            $crate::assert_loads(stringify!($name), &toml_str, serde_json::json!($expected));
        }
    };
    ($name:ident, $toml:literal, $expected:tt) => {
        #[test]
        fn $name() {
            $crate::assert_loads(stringify!($name), $toml, serde_json::json!($expected));
        }
    };
}

/// Loads an invalid document and asserts the error code and where it points.
#[macro_export]
macro_rules! invalid {
    ($name:ident, $code:literal, $line:literal : $column:literal) => {
        #[test]
        fn $name() {
            let toml_str = std::fs::read_to_string(concat!("data/", stringify!($name), ".toml"))
                .expect(concat!("failed to load ", stringify!($name), ".toml"));
            $crate::assert_fails(stringify!($name), &toml_str, $code, ($line, $column));
        }
    };
    ($name:ident, $toml:literal, $code:literal, $line:literal : $column:literal) => {
        #[test]
        fn $name() {
            $crate::assert_fails(stringify!($name), $toml, $code, ($line, $column));
        }
    };
}

#[track_caller]
pub fn assert_loads(name: &str, toml: &str, expected: serde_json::Value) {
    let table = match toml_peg::load(toml) {
        Ok(table) => table,
        Err(err) => {
            let file = File::new("input.toml", toml);
            let error = emit_diags(&file, Some(err.to_diagnostic(())));
            panic!("{name}: failed to load\n{error}");
        }
    };
    let actual = serde_json::to_value(&table).expect("tables always serialize");
    pretty_assertions::assert_eq!(actual, expected, "{name}");

    // every key span must point at the key's own text
    let file = File::new("input.toml", toml);
    let mut spans = Vec::new();
    collect_spans("root", &table, &mut spans);
    for diag in &spans {
        let label = &diag.labels[0];
        assert_eq!(
            &toml[label.range.clone()],
            diag.message,
            "{name}: span of key `{}` is wrong\n{}",
            diag.message,
            emit_diags(&file, Some(diag.clone()))
        );
    }
}

#[track_caller]
pub fn assert_fails(name: &str, toml: &str, code: &str, at: (usize, usize)) -> String {
    let err = match toml_peg::load(toml) {
        Ok(table) => panic!("{name}: expected an error but loaded {table:?}"),
        Err(err) => err,
    };
    assert_eq!(err.kind.to_string(), code, "{name}: {err}");
    assert_eq!((err.line, err.column), at, "{name}: {err}");

    let file = File::new("input.toml", toml);
    let rendered = emit_diags(&file, Some(err.to_diagnostic(())));
    assert!(
        rendered.contains(&format!("error[{code}]")),
        "{name}: unexpected rendering\n{rendered}"
    );
    assert!(
        rendered.contains(&format!("input.toml:{}:{}", at.0, at.1)),
        "{name}: unexpected rendering\n{rendered}"
    );
    rendered
}

pub type File<'s> = codespan_reporting::files::SimpleFile<&'static str, &'s str>;

pub fn emit_diags(f: &File<'_>, error: impl IntoIterator<Item = Diagnostic<()>>) -> String {
    let mut output = codespan_reporting::term::termcolor::NoColor::new(Vec::new());

    for diag in error {
        codespan_reporting::term::emit_to_write_style(
            &mut output,
            &codespan_reporting::term::Config::default(),
            f,
            &diag,
        )
        .expect("failed to render diagnostic");
    }

    String::from_utf8(output.into_inner()).unwrap()
}

/// Emits a note for every key in `table`, recursing into nested tables and
/// tables inside arrays. The message is the key name and the label its span.
pub fn collect_spans(path: &str, table: &Table, diags: &mut Vec<Diagnostic<()>>) {
    fn walk(path: &str, value: &Value, diags: &mut Vec<Diagnostic<()>>) {
        match value {
            Value::Table(table) => collect_spans(path, table, diags),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    walk(&format!("{path}_{i}"), item, diags);
                }
            }
            _ => {}
        }
    }

    for (key, value) in table {
        let path = format!("{path}_{}", key.name);
        diags.push(
            Diagnostic::note()
                .with_code(value.type_str())
                .with_message(key.as_str())
                .with_labels(vec![Label::primary((), key.span)]),
        );
        walk(&path, value, diags);
    }
}
