use alloc::string::String;

use serde_json::{Map, Value};

use crate::{Document, NodeIndex, NodeKind, Number};

/// Rebuilds a `serde_json` value from a node using only the query API.
pub(crate) fn to_value(doc: &Document, node: NodeIndex) -> Value {
    match doc.kind(node).unwrap() {
        NodeKind::Null => Value::Null,
        NodeKind::Boolean => Value::Bool(doc.as_bool(node).unwrap()),
        NodeKind::Number => match doc.number(node).unwrap() {
            Number::Integer(n) => Value::from(n),
            Number::Float(n) => Value::from(n),
        },
        NodeKind::String => Value::String(string(doc, node)),
        NodeKind::Array => Value::Array(
            doc.elements(node)
                .unwrap()
                .map(|element| to_value(doc, element))
                .collect(),
        ),
        NodeKind::Object => {
            let mut map = Map::new();
            for entry in doc.entries(node).unwrap() {
                map.insert(string(doc, entry.key), to_value(doc, entry.value));
            }
            Value::Object(map)
        }
    }
}

pub(crate) fn string(doc: &Document, node: NodeIndex) -> String {
    String::from_utf8(doc.string(node).unwrap().into()).unwrap()
}
