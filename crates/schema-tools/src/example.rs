//! Deterministic example synthesis.
//!
//! Produces one concrete JSON value for a schema node. Unlike normalization,
//! dispatch here is purely on the declared `type`: an object without
//! `type: object` synthesizes to the generic `"mock value"` literal.

use crate::model::{SchemaNode, SchemaTable};
use crate::normalize::MAX_DEPTH;
use crate::resolver::{Resolved, resolve};
use serde_json::{Map, Value, json};

/// Synthesize one example value for a schema node.
///
/// Total over arbitrary input: absent nodes and unresolvable references yield
/// `null`, unknown types yield `"mock value"`. Recursion shares the
/// normalizer's depth bound; past it the value degrades to `null`.
pub fn synthesize(node: Option<&SchemaNode>, components: &SchemaTable) -> Value {
    synthesize_at(node, components, 0)
}

fn synthesize_at(node: Option<&SchemaNode>, components: &SchemaTable, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::Null;
    }

    let Some(node) = node else {
        return Value::Null;
    };

    let schema = match resolve(node, components) {
        None => return Value::Null,
        Some(Resolved::Unresolved(_)) => return json!("mock value"),
        Some(Resolved::Schema(schema)) => schema,
    };

    match schema.schema_type.as_deref() {
        Some("object") => {
            let mut fields = Map::new();
            if let Some(properties) = &schema.properties {
                for (name, prop) in properties {
                    fields.insert(
                        name.clone(),
                        synthesize_at(Some(prop), components, depth + 1),
                    );
                }
            }
            Value::Object(fields)
        }
        Some("array") => {
            // A fixed-size illustrative sample, not a random count.
            Value::Array(
                (0..2)
                    .map(|_| synthesize_at(schema.items.as_deref(), components, depth + 1))
                    .collect(),
            )
        }
        Some("string") => schema
            .example
            .clone()
            .unwrap_or_else(|| json!("example string")),
        Some("integer" | "number") => schema.example.clone().unwrap_or_else(|| json!(123)),
        Some("boolean") => schema.example.clone().unwrap_or_else(|| json!(true)),
        _ => json!("mock value"),
    }
}
