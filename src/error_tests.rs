use super::*;

#[test]
fn display_all_error_kinds() {
    let cases: Vec<(ErrorKind, &str)> = vec![
        (
            ErrorKind::Unexpected {
                expected: "a value",
            },
            "unexpected-input",
        ),
        (ErrorKind::OutOfRange("i64"), "out-of-range"),
        (ErrorKind::FileTooLarge, "file-too-large"),
        (
            ErrorKind::Reassign {
                key: "k".into(),
                first: Span::new(0, 1),
            },
            "reassign",
        ),
    ];
    for (kind, expected) in cases {
        assert_eq!(kind.to_string(), expected);
        assert_eq!(format!("{kind:?}"), expected);
    }
}

#[test]
fn new_resolves_line_and_column() {
    let src = "a = 1\nbb = 2\n  cé = x";
    let at = src.find('x').unwrap() as u32;
    let err = Error::new(
        ErrorKind::Unexpected {
            expected: "a value",
        },
        Span::new(at, at),
        src,
    );
    assert_eq!((err.line, err.column), (3, 8));

    let err = Error::new(ErrorKind::FileTooLarge, Span::new(0, 0), src);
    assert_eq!((err.line, err.column), (1, 1));
}

#[test]
fn messages() {
    let src = "a = 1\n[a]\nx = oops";
    let at = src.find("oops").unwrap() as u32;
    let err = Error::new(
        ErrorKind::Unexpected {
            expected: "a value",
        },
        Span::new(at, at),
        src,
    );
    assert_eq!(
        err.to_string(),
        "unexpected input at line 3 column 5, expected a value"
    );
    assert!(err.is_syntax());
    assert!(!err.is_conflict());

    let err = Error::new(
        ErrorKind::Reassign {
            key: "a".into(),
            first: Span::new(0, 1),
        },
        Span::new(7, 8),
        src,
    );
    assert_eq!(err.to_string(), "cannot reassign key `a` at line 2 column 2");
    assert!(err.is_conflict());
    assert!(!err.is_syntax());

    let err = Error::new(ErrorKind::OutOfRange("i64"), Span::new(4, 5), src);
    assert_eq!(
        err.to_string(),
        "number at line 1 column 5 is out of range of 'i64'"
    );
    assert!(err.is_syntax());

    let err = Error::new(ErrorKind::FileTooLarge, Span::default(), "");
    assert_eq!(err.to_string(), "file is too large (maximum 4GiB)");
}

#[cfg(feature = "reporting")]
#[test]
fn diagnostics_label_both_definitions() {
    use codespan_reporting::diagnostic::LabelStyle;

    let src = "[a]\nx = 1\n[a]\nx = 2";
    let err = Error::new(
        ErrorKind::Reassign {
            key: "x".into(),
            first: Span::new(4, 5),
        },
        Span::new(14, 15),
        src,
    );
    let diag = err.to_diagnostic(());
    assert_eq!(diag.code.as_deref(), Some("reassign"));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.labels[0].style, LabelStyle::Secondary);
    assert_eq!(diag.labels[0].range, 4..5);
    assert_eq!(diag.labels[1].style, LabelStyle::Primary);
    assert_eq!(diag.labels[1].range, 14..15);
}
