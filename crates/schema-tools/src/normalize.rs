//! Recursive schema normalization.
//!
//! Converts an arbitrary, possibly self-referential schema node into one
//! fully-resolved structural description. Recursion is bounded by a fixed
//! depth counter rather than cycle detection; past the bound a sentinel
//! object is returned so deeply nested or cyclic schemas always terminate.

use crate::model::{SchemaNode, SchemaTable};
use crate::resolver::{Resolved, resolve};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Maximum recursion depth for normalization and synthesis.
pub const MAX_DEPTH: usize = 10;

/// A fully-resolved, self-contained structural description of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Present iff the schema normalized as an object. A property whose
    /// reference resolved to nothing is kept as an explicit null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Option<NormalizedSchema>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<NormalizedSchema>>,
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Option<NormalizedSchema>>>,
    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Option<NormalizedSchema>>>,
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Option<NormalizedSchema>>>,
}

fn max_depth_sentinel() -> NormalizedSchema {
    NormalizedSchema {
        schema_type: Some("object".to_string()),
        description: Some("Max depth reached".to_string()),
        ..NormalizedSchema::default()
    }
}

/// Normalize a schema node.
///
/// Returns `None` when the node is absent or its reference resolves to
/// nothing. Callers start at `depth = 0`; recursion past [`MAX_DEPTH`] yields
/// the sentinel `{type: "object", description: "Max depth reached"}`.
///
/// Deterministic: identical inputs always yield a structurally identical
/// output.
pub fn normalize(
    node: Option<&SchemaNode>,
    components: &SchemaTable,
    depth: usize,
) -> Option<NormalizedSchema> {
    if depth > MAX_DEPTH {
        return Some(max_depth_sentinel());
    }

    let node = node?;
    let schema = match resolve(node, components)? {
        Resolved::Schema(schema) => schema,
        // Kept verbatim; it has no inline shape to describe.
        Resolved::Unresolved(_) => return Some(NormalizedSchema::default()),
    };

    let mut out = NormalizedSchema {
        schema_type: schema.schema_type.clone(),
        format: schema.format.clone(),
        description: schema.description.clone(),
        example: schema.example.clone(),
        default: schema.default.clone(),
        enum_values: schema.enum_values.clone(),
        minimum: schema.minimum,
        maximum: schema.maximum,
        min_length: schema.min_length,
        max_length: schema.max_length,
        pattern: schema.pattern.clone(),
        ..NormalizedSchema::default()
    };

    // `type` is often omitted in the wild; the presence of `properties` or
    // `items` is just as authoritative.
    let is_object = schema.schema_type.as_deref() == Some("object") || schema.properties.is_some();
    let is_array = schema.schema_type.as_deref() == Some("array") || schema.items.is_some();

    if is_object {
        out.schema_type = Some("object".to_string());
        let mut properties = IndexMap::new();
        if let Some(declared) = &schema.properties {
            for (name, prop) in declared {
                properties.insert(name.clone(), normalize(Some(prop), components, depth + 1));
            }
        }
        out.properties = Some(properties);
        out.required = Some(schema.required.clone().unwrap_or_default());
    }

    if is_array {
        out.schema_type = Some("array".to_string());
        out.items = schema
            .items
            .as_deref()
            .and_then(|items| normalize(Some(items), components, depth + 1))
            .map(Box::new);
        out.min_items = schema.min_items;
        out.max_items = schema.max_items;
    }

    // Composition is additive to type handling, never exclusive with it.
    out.all_of = normalize_branches(schema.all_of.as_deref(), components, depth);
    out.any_of = normalize_branches(schema.any_of.as_deref(), components, depth);
    out.one_of = normalize_branches(schema.one_of.as_deref(), components, depth);

    Some(out)
}

fn normalize_branches(
    branches: Option<&[SchemaNode]>,
    components: &SchemaTable,
    depth: usize,
) -> Option<Vec<Option<NormalizedSchema>>> {
    let branches = branches?;
    Some(
        branches
            .iter()
            .map(|branch| normalize(Some(branch), components, depth + 1))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SchemaNode {
        SchemaNode::from_value(&value)
    }

    fn table(entries: serde_json::Value) -> SchemaTable {
        entries
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), SchemaNode::from_value(v)))
            .collect()
    }

    #[test]
    fn object_keeps_every_declared_property() {
        let schema = node(json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "integer"},
                "name": {"type": "string", "minLength": 1},
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        }));
        let out = normalize(Some(&schema), &SchemaTable::new(), 0).unwrap();
        assert_eq!(out.schema_type.as_deref(), Some("object"));
        let properties = out.properties.as_ref().unwrap();
        assert_eq!(properties.len(), 3);
        assert!(properties.values().all(Option::is_some));
        assert_eq!(out.required, Some(vec!["id".to_string()]));

        let tags = properties["tags"].as_ref().unwrap();
        assert_eq!(tags.schema_type.as_deref(), Some("array"));
        assert_eq!(
            tags.items.as_ref().unwrap().schema_type.as_deref(),
            Some("string")
        );
    }

    #[test]
    fn typeless_schema_with_properties_is_forced_to_object() {
        let schema = node(json!({"properties": {"a": {"type": "boolean"}}}));
        let out = normalize(Some(&schema), &SchemaTable::new(), 0).unwrap();
        assert_eq!(out.schema_type.as_deref(), Some("object"));
        assert_eq!(out.required, Some(Vec::new()));
    }

    #[test]
    fn scalar_metadata_is_copied_verbatim() {
        let schema = node(json!({
            "type": "string",
            "format": "email",
            "pattern": "^.+@.+$",
            "minLength": 3,
            "maxLength": 64,
            "enum": ["a@b.c"],
            "example": "a@b.c",
            "default": "none@none",
            "description": "contact address"
        }));
        let out = normalize(Some(&schema), &SchemaTable::new(), 0).unwrap();
        assert_eq!(out.format.as_deref(), Some("email"));
        assert_eq!(out.pattern.as_deref(), Some("^.+@.+$"));
        assert_eq!(out.min_length, Some(3));
        assert_eq!(out.max_length, Some(64));
        assert_eq!(out.enum_values, Some(vec![json!("a@b.c")]));
        assert_eq!(out.example, Some(json!("a@b.c")));
        assert_eq!(out.default, Some(json!("none@none")));
        assert_eq!(out.description.as_deref(), Some("contact address"));
    }

    #[test]
    fn missing_component_yields_none() {
        let schema = SchemaNode::Ref("#/components/schemas/Ghost".to_string());
        assert!(normalize(Some(&schema), &SchemaTable::new(), 0).is_none());
        assert!(normalize(None, &SchemaTable::new(), 0).is_none());
    }

    #[test]
    fn self_referential_schema_hits_the_depth_sentinel() {
        // `Node.next` points back at `Node`; 20 reference hops deep by
        // construction, unbounded without the depth guard.
        let components = table(json!({
            "Node": {
                "type": "object",
                "properties": {
                    "value": {"type": "string"},
                    "next": {"$ref": "#/components/schemas/Node"}
                }
            }
        }));
        let schema = SchemaNode::Ref("#/components/schemas/Node".to_string());
        let out = normalize(Some(&schema), &components, 0).unwrap();

        let mut cursor = &out;
        let mut sentinel_seen = false;
        for _ in 0..=MAX_DEPTH + 1 {
            if cursor.description.as_deref() == Some("Max depth reached") {
                sentinel_seen = true;
                break;
            }
            cursor = cursor
                .properties
                .as_ref()
                .and_then(|p| p.get("next"))
                .and_then(Option::as_ref)
                .expect("chain should continue until the sentinel");
        }
        assert!(sentinel_seen, "expected the max-depth sentinel");
    }

    #[test]
    fn composition_branches_are_normalized_in_order() {
        let components = table(json!({"Base": {"type": "object", "properties": {"id": {}}}}));
        let schema = node(json!({
            "allOf": [
                {"$ref": "#/components/schemas/Base"},
                {"type": "object", "properties": {"extra": {"type": "string"}}},
                {"$ref": "#/components/schemas/Missing"}
            ]
        }));
        let out = normalize(Some(&schema), &components, 0).unwrap();
        let all_of = out.all_of.as_ref().unwrap();
        assert_eq!(all_of.len(), 3);
        assert!(all_of[0].is_some());
        assert!(all_of[1].is_some());
        assert!(all_of[2].is_none());
    }

    #[test]
    fn object_with_one_of_keeps_both_shapes() {
        let schema = node(json!({
            "type": "object",
            "properties": {"kind": {"type": "string"}},
            "oneOf": [{"type": "object"}, {"type": "array", "items": {}}]
        }));
        let out = normalize(Some(&schema), &SchemaTable::new(), 0).unwrap();
        assert_eq!(out.schema_type.as_deref(), Some("object"));
        assert_eq!(out.one_of.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn normalization_is_deterministic() {
        let components = table(json!({"Pet": {"type": "object", "properties": {"id": {}}}}));
        let schema = node(json!({
            "type": "object",
            "properties": {"pet": {"$ref": "#/components/schemas/Pet"}}
        }));
        let a = normalize(Some(&schema), &components, 0);
        let b = normalize(Some(&schema), &components, 0);
        assert_eq!(a, b);
    }
}
