#![allow(missing_docs)]

use jsonslab::{Document, NodeKind, Number};

const NESTED: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "request": {
        "filename": "example.rs",
        "options": {
            "opt_level": 2,
            "ratio": 1.5e+3,
            "features": ["serde", "tokio"]
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")"
    ],
    "flags": [true, false, {}, []]
}
"#;

#[test]
fn navigates_nested_document() {
    let doc = Document::parse(NESTED.as_bytes()).unwrap();
    let root = doc.root_node();

    let decision = root.get("moderation").unwrap().unwrap().get("decision").unwrap().unwrap();
    assert_eq!(decision.string().unwrap(), "allow");

    let reason = root.get("moderation").unwrap().unwrap().get("reason").unwrap().unwrap();
    assert_eq!(reason.kind(), Ok(NodeKind::Null));

    let options = root.get("request").unwrap().unwrap().get("options").unwrap().unwrap();
    assert_eq!(options.get("opt_level").unwrap().unwrap().number(), Ok(Number::Integer(2)));
    assert_eq!(options.get("ratio").unwrap().unwrap().as_f64(), Ok(1500.0));

    let features: Vec<String> = options
        .get("features")
        .unwrap()
        .unwrap()
        .elements()
        .unwrap()
        .map(|n| n.string().unwrap().to_string())
        .collect();
    assert_eq!(features, ["serde", "tokio"]);

    let second = root.get("snippets").unwrap().unwrap().at(1).unwrap().unwrap();
    assert_eq!(second.string().unwrap(), r#"println!("hi")"#);
}

#[test]
fn flags_mix_constants_and_empty_containers() {
    let doc = Document::parse(NESTED.as_bytes()).unwrap();
    let flags = doc.root_node().get("flags").unwrap().unwrap();
    let kinds: Vec<NodeKind> = flags.elements().unwrap().map(|n| n.kind().unwrap()).collect();
    assert_eq!(
        kinds,
        [NodeKind::Boolean, NodeKind::Boolean, NodeKind::Object, NodeKind::Array]
    );
    let empties: Vec<bool> = flags
        .elements()
        .unwrap()
        .filter(|n| n.kind().unwrap().is_container())
        .map(|n| n.is_empty().unwrap())
        .collect();
    assert_eq!(empties, [true, true]);
}

#[test]
fn top_level_keys_in_source_order() {
    let doc = Document::parse(NESTED.as_bytes()).unwrap();
    let keys: Vec<String> = doc
        .root_node()
        .entries()
        .unwrap()
        .map(|(key, _)| key.string().unwrap().to_string())
        .collect();
    assert_eq!(keys, ["moderation", "request", "snippets", "flags"]);
}

#[test]
fn compacted_text_drops_only_layout() {
    let doc = Document::parse(NESTED.as_bytes()).unwrap();
    assert!(doc.compacted().len() < NESTED.len());
    assert!(!doc.compacted().contains(&b'\n'));
    // whitespace inside strings survives
    let snippet = doc.root_node().get("snippets").unwrap().unwrap().at(0).unwrap().unwrap();
    assert_eq!(snippet.string().unwrap(), "fn main() {}");
}
