//! Synthetic schemas.

use serde_json::{Map, Value, json};

const PROPERTY_KINDS: [&str; 6] = ["string", "integer", "number", "boolean", "uuid", "array"];

fn property(kind: &str) -> Value {
    match kind {
        "uuid" => json!({"type": "string", "format": "uuid"}),
        "array" => json!({"type": "array", "items": {"type": "string"}}),
        other => json!({"type": other}),
    }
}

/// Builds a flat record schema with `fields` properties of mixed kinds.
#[must_use]
pub fn wide_schema(fields: usize) -> Value {
    let properties: Map<String, Value> = (0..fields)
        .map(|i| {
            let kind = PROPERTY_KINDS[i % PROPERTY_KINDS.len()];
            (format!("field{i}"), property(kind))
        })
        .collect();
    json!({"title": "Wide", "properties": properties})
}

/// Builds a chain of `depth` nested objects below the root.
///
/// Every level carries a few scalar properties plus a `child` object, so
/// the model holds `depth + 1` record types.
#[must_use]
pub fn nested_schema(depth: usize) -> Value {
    let mut node = level(None);
    for _ in 0..depth {
        node = level(Some(node));
    }
    if let Value::Object(map) = &mut node {
        map.insert("title".into(), json!("Tree"));
    }
    node
}

fn level(child: Option<Value>) -> Value {
    let mut properties = Map::new();
    properties.insert("label".into(), property("string"));
    properties.insert("weight".into(), property("number"));
    properties.insert("tags".into(), property("array"));
    if let Some(child) = child {
        properties.insert("child".into(), child);
    }
    json!({"type": "object", "properties": properties})
}
