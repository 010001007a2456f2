#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use jsonslab::{Document, NodeIndex, NodeKind, ParseOptions};
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

const MAX_NESTING: usize = 6;

const JSON_WHITESPACE: &[u8] = b" \t\n\r";
// Skipped only when whitespace handling is lenient.
const CONTROL_WHITESPACE: &[u8] = b"\x00\x0b\x1f";

#[derive(Debug, Arbitrary)]
struct Input {
    strict_whitespace: bool,
    reject_trailing_content: bool,
    text: Text,
}

#[derive(Debug, Arbitrary)]
enum Text {
    /// Arbitrary bytes; most of them fail to parse.
    Raw(Vec<u8>),
    /// A valid document, re-spaced between tokens.
    Spaced { value: JsonValue, seed: u64 },
}

#[derive(Debug)]
struct JsonValue(Value);

impl<'a> Arbitrary<'a> for JsonValue {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        json_value(u, 0).map(JsonValue)
    }
}

fn json_value(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Value> {
    let kinds = if depth < MAX_NESTING { 7 } else { 5 };
    Ok(match u.choose_index(kinds)? {
        0 => Value::Null,
        1 => Value::Bool(u.arbitrary()?),
        2 => Value::from(u.arbitrary::<i64>()?),
        // non-finite floats serialize as null
        3 => Value::from(u.arbitrary::<f64>()?),
        4 => Value::String(u.arbitrary()?),
        5 => {
            let len = u.int_in_range(0..=4)?;
            Value::Array(
                (0..len)
                    .map(|_| json_value(u, depth + 1))
                    .collect::<arbitrary::Result<_>>()?,
            )
        }
        _ => {
            let len = u.int_in_range(0..=4)?;
            let mut object = serde_json::Map::new();
            for _ in 0..len {
                object.insert(u.arbitrary()?, json_value(u, depth + 1)?);
            }
            Value::Object(object)
        }
    })
}

/// Serializes `value` and inserts runs of whitespace after structural bytes
/// outside strings.
fn spaced(value: &Value, seed: u64, strict: bool) -> (Vec<u8>, Vec<u8>) {
    let minified = serde_json::to_vec(value).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(minified.len() * 2);
    let (mut in_string, mut escaped) = (false, false);
    for &byte in &minified {
        out.push(byte);
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if byte == b'"' {
            in_string = true;
            continue;
        }
        if matches!(byte, b'{' | b'[' | b',' | b':') && rng.random_bool(0.4) {
            for _ in 0..rng.random_range(1..=3) {
                let lenient = !strict && rng.random_bool(0.2);
                let pool = if lenient { CONTROL_WHITESPACE } else { JSON_WHITESPACE };
                out.push(pool[rng.random_range(0..pool.len())]);
            }
        }
    }
    (out, minified)
}

/// Runs every query on every node; none of them may panic.
fn walk(doc: &Document, node: NodeIndex) {
    let Ok(kind) = doc.kind(node) else {
        panic!("built table holds an unclassifiable record {node}");
    };
    match kind {
        NodeKind::Object => {
            assert_eq!(doc.entries(node).unwrap().count(), doc.len(node).unwrap());
            for entry in doc.entries(node).unwrap() {
                let _ = doc.string(entry.key);
                walk(doc, entry.value);
            }
        }
        NodeKind::Array => {
            for element in doc.elements(node).unwrap() {
                walk(doc, element);
            }
        }
        NodeKind::String => {
            let _ = doc.raw_str(node);
            let _ = doc.string(node);
        }
        NodeKind::Number => {
            let _ = doc.number_text(node);
            let _ = doc.number(node);
            let _ = doc.as_i64(node);
        }
        NodeKind::Boolean => {
            doc.as_bool(node).unwrap();
        }
        NodeKind::Null => {}
    }
}

fn check(input: &[u8], options: &ParseOptions) -> Option<Document> {
    let doc = Document::parse_with_options(input, options).ok()?;

    assert!(doc.compacted().len() <= input.len() + 1);
    walk(&doc, doc.root());

    let (compacted, table) = doc.clone().into_parts();
    assert_eq!(Document::from_parts(compacted, table).unwrap(), doc);
    Some(doc)
}

fuzz_target!(|input: Input| {
    let options = ParseOptions {
        strict_whitespace: input.strict_whitespace,
        reject_trailing_content: input.reject_trailing_content,
        ..ParseOptions::default()
    };
    match input.text {
        Text::Raw(bytes) => {
            check(&bytes, &options);
        }
        Text::Spaced { value, seed } => {
            let (text, minified) = spaced(&value.0, seed, options.strict_whitespace);
            let doc = check(&text, &options).expect("serialized JSON must parse");
            assert_eq!(Some(doc), check(&minified, &options));
        }
    }
});
