use alloc::string::ToString;

use rstest::rstest;

use crate::{
    Document, LayoutError, NodeIndex, NodeKind, ParseErrorKind, ParseOptions, Phase, QueryError,
};

fn malformed(found: char, expected: &'static str) -> ParseErrorKind {
    ParseErrorKind::MalformedStructuralByte { found, expected }
}

#[rstest]
#[case::empty("", ParseErrorKind::UnexpectedEndOfInput, 0)]
#[case::only_whitespace(" \n\t", ParseErrorKind::UnexpectedEndOfInput, 3)]
#[case::unclosed_array("[1,2", ParseErrorKind::UnexpectedEndOfInput, 4)]
#[case::unclosed_string(r#"{"key"#, ParseErrorKind::UnexpectedEndOfInput, 5)]
#[case::missing_separator("[1 2]", malformed('2', "',' or ']'"), 3)]
#[case::numeric_key("{1:2}", malformed('1', "an object key or '}'"), 1)]
#[case::bad_value("[1, 2, x]", malformed('x', "a value"), 7)]
#[case::stray_close("]", malformed(']', "a value"), 0)]
#[case::missing_colon(r#"{"a" 1}"#, malformed('1', "':' after an object key"), 6)]
fn rejected_during_compaction(
    #[case] input: &str,
    #[case] kind: ParseErrorKind,
    #[case] offset: usize,
) {
    let err = Document::parse(input.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), &kind);
    assert_eq!(err.phase(), Phase::Compaction);
    assert_eq!(err.offset(), offset);
}

#[test]
fn depth_limit() {
    let options = ParseOptions {
        max_depth: 2,
        ..ParseOptions::default()
    };
    let err = Document::parse_with_options(b"[[[]]]", &options).unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::DepthLimitExceeded { limit: 2 });
    assert_eq!(err.offset(), 2);

    let deep = "[".repeat(ParseOptions::DEFAULT_MAX_DEPTH + 1);
    assert_eq!(
        Document::parse(deep.as_bytes()).unwrap_err().kind(),
        &ParseErrorKind::DepthLimitExceeded {
            limit: ParseOptions::DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn trailing_content() {
    let options = ParseOptions {
        reject_trailing_content: true,
        ..ParseOptions::default()
    };
    let err = Document::parse_with_options(b"[1] x", &options).unwrap_err();
    assert_eq!(err.kind(), &malformed('x', "end of input"));
    assert_eq!(err.offset(), 4);
    assert_eq!(
        Document::parse(b"[1] x").unwrap().compacted(),
        "[+1]"
    );
}

#[test]
fn error_message_names_phase_and_offset() {
    let err = Document::parse(b"[1 2]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected byte '2' where ',' or ']' was required during compaction at byte 3"
    );
}

#[test]
fn misaligned_and_out_of_range_indices() {
    let doc = Document::parse(b"[1]").unwrap();
    assert_eq!(
        doc.kind(NodeIndex::new(1)),
        Err(QueryError::IndexOutOfRange { index: 1, len: 4 })
    );
    assert_eq!(
        doc.next(NodeIndex::new(4)),
        Err(QueryError::IndexOutOfRange { index: 4, len: 4 })
    );
    assert!(doc.record(NodeIndex::new(u32::MAX - 1)).is_err());
}

#[test]
fn wrong_kind_queries() {
    let doc = Document::parse(br#"{"n": 1, "s": "x", "a": []}"#).unwrap();
    let root = doc.root();
    let n = doc.get(root, "n").unwrap().unwrap();
    let s = doc.get(root, "s").unwrap().unwrap();
    let a = doc.get(root, "a").unwrap().unwrap();

    assert_eq!(
        doc.as_bool(n),
        Err(QueryError::WrongKind {
            expected: "boolean",
            found: NodeKind::Number,
        })
    );
    assert_eq!(
        doc.string(n),
        Err(QueryError::WrongKind {
            expected: "string",
            found: NodeKind::Number,
        })
    );
    assert_eq!(
        doc.as_f64(s),
        Err(QueryError::WrongKind {
            expected: "number",
            found: NodeKind::String,
        })
    );
    assert_eq!(
        doc.get(a, "k"),
        Err(QueryError::WrongKind {
            expected: "object",
            found: NodeKind::Array,
        })
    );
    assert_eq!(
        doc.index(root, 0),
        Err(QueryError::WrongKind {
            expected: "array",
            found: NodeKind::Object,
        })
    );
    assert_eq!(
        doc.len(s),
        Err(QueryError::WrongKind {
            expected: "object or array",
            found: NodeKind::String,
        })
    );
    assert_eq!(
        doc.first_child(n),
        Err(QueryError::WrongKind {
            expected: "object or array",
            found: NodeKind::Number,
        })
    );
}

#[test]
fn lone_sign_is_not_a_number() {
    let doc = Document::parse(b"-").unwrap();
    assert_eq!(doc.kind(doc.root()), Ok(NodeKind::Number));
    assert_eq!(
        doc.as_f64(doc.root()),
        Err(QueryError::InvalidNumber {
            text: "-".to_string()
        })
    );
}

#[test]
fn from_parts_rejects_corrupt_tables() {
    let (compacted, _) = Document::parse(b"[1,2]").unwrap().into_parts();
    assert_eq!(
        Document::from_parts(compacted.clone(), alloc::vec![]),
        Err(LayoutError::EmptyTable)
    );
    assert_eq!(
        Document::from_parts(compacted.clone(), alloc::vec![0, 0, 1, 2, 3, 0]),
        Err(LayoutError::SkipOutOfRange { index: 2, skip: 2 })
    );
    assert_eq!(
        Document::from_parts(compacted, alloc::vec![0, 0, 9, 0]),
        Err(LayoutError::OffsetOutOfRange {
            index: 2,
            offset: 9,
            len: 6,
        })
    );
}

#[test]
fn from_parts_rejects_tables_that_miscount_children() {
    let (compacted, table) = Document::parse(b"[1,2]").unwrap().into_parts();
    assert_eq!(table, [0, 0, 1, 4, 3, 0]);
    assert_eq!(
        Document::from_parts(compacted.clone(), alloc::vec![0, 0, 1, 0]),
        Err(LayoutError::TableMismatch { index: 2 })
    );

    let (compacted, _) = Document::parse(b"[1]").unwrap().into_parts();
    assert_eq!(
        Document::from_parts(compacted, alloc::vec![0, 0]),
        Err(LayoutError::TableMismatch { index: 2 })
    );
}

#[cfg(feature = "std")]
#[test]
fn reader_errors_surface_as_io() {
    use std::io::{self, Read};

    struct Broken;
    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))
        }
    }

    let err = Document::from_reader(Broken, 64, &ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::Io(io::ErrorKind::UnexpectedEof));
    assert_eq!(err.phase(), Phase::Compaction);
}
