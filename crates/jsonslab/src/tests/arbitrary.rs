use alloc::{boxed::Box, string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};
use serde_json::{Map, Number, Value};

/// A JSON value whose strings read back unchanged.
///
/// Control characters are left out of strings: a serializer writes them as
/// `\n` or `\u0001`, which read back as `n` and `u0001`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JsonValue(pub(crate) Value);

fn plain_string(g: &mut Gen) -> String {
    String::arbitrary(g).chars().filter(|&c| c >= ' ').collect()
}

fn number(g: &mut Gen) -> Number {
    if bool::arbitrary(g) {
        Number::from(i64::arbitrary(g))
    } else {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        // finite, so always representable
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}

fn gen_val(g: &mut Gen, depth: usize) -> Value {
    let choices = if depth == 0 { 4 } else { 6 };
    match usize::arbitrary(g) % choices {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Number(number(g)),
        3 => Value::String(plain_string(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(plain_string(g), gen_val(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for JsonValue {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        Self(gen_val(g, depth))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let children: Vec<Value> = match &self.0 {
            Value::Array(items) => items.clone(),
            Value::Object(map) => map.values().cloned().collect(),
            _ => Vec::new(),
        };
        Box::new(children.into_iter().map(JsonValue))
    }
}
