//! Permissive OpenAPI document model.
//!
//! Real-world Swagger documents are frequently incomplete or loosely typed, and
//! validating them is explicitly not this crate's job. The model therefore
//! defaults every missing field and — for schema nodes, the part of the
//! document the engine recurses through — deserializes *totally*: any JSON
//! value becomes a [`SchemaNode`], so the normalizer and synthesizer never see
//! a parse error.
//!
//! A schema node is a tagged variant: either a `$ref` pointer or an inline
//! body. The two are mutually exclusive by construction (a node carrying a
//! `$ref` key is a [`SchemaNode::Ref`] regardless of any sibling keys).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The `components.schemas` table: name -> schema node.
pub type SchemaTable = IndexMap<String, SchemaNode>;

/// Root of a fetched OpenAPI document.
///
/// Replaced wholesale on every successful load; never merged across loads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Document {
    pub info: Info,
    pub paths: IndexMap<String, PathItem>,
    pub components: Components,
    pub servers: Vec<Value>,
    pub security: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Info {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
    pub schemas: SchemaTable,
    /// Carried through to load responses verbatim; never interpreted.
    pub security_schemes: Option<Value>,
}

/// One path template entry: at most one operation per HTTP method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
}

impl PathItem {
    /// Declared operations in the fixed extraction order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("post", &self.post),
            ("put", &self.put),
            ("patch", &self.patch),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: Option<String>,
    /// Location: `path` | `query` | `header` | `cookie`.
    #[serde(rename = "in")]
    pub location: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    pub deprecated: bool,
    pub schema: Option<SchemaNode>,
    pub example: Option<Value>,
    pub style: Option<String>,
    pub explode: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaType {
    pub schema: Option<SchemaNode>,
    pub example: Option<Value>,
    /// Named examples map; carried through opaquely.
    pub examples: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: Option<String>,
    pub content: IndexMap<String, MediaType>,
    pub headers: IndexMap<String, Header>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Header {
    pub description: Option<String>,
    pub required: bool,
    pub schema: Option<SchemaNode>,
}

/// A schema position in the document: either a reference or an inline body.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// A `$ref` pointer, kept verbatim.
    Ref(String),
    /// An inline schema definition.
    Inline(Box<Schema>),
}

/// An inline schema body.
///
/// Every field is optional; a schema with no recognizable keys is simply
/// empty. `properties` and the composition arrays preserve declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub required: Option<Vec<String>>,
    pub items: Option<Box<SchemaNode>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub all_of: Option<Vec<SchemaNode>>,
    pub any_of: Option<Vec<SchemaNode>>,
    pub one_of: Option<Vec<SchemaNode>>,
}

impl SchemaNode {
    /// Build a node from arbitrary JSON. Total: never fails.
    ///
    /// Non-object values and fields of unexpected shape degrade to an empty
    /// inline schema / absent fields rather than erroring.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return SchemaNode::Inline(Box::default());
        };

        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Ref(reference.to_string());
        }

        SchemaNode::Inline(Box::new(Schema {
            schema_type: str_field(map, "type"),
            format: str_field(map, "format"),
            description: str_field(map, "description"),
            example: map.get("example").cloned(),
            default: map.get("default").cloned(),
            enum_values: map.get("enum").and_then(Value::as_array).cloned(),
            minimum: num_field(map, "minimum"),
            maximum: num_field(map, "maximum"),
            min_length: uint_field(map, "minLength"),
            max_length: uint_field(map, "maxLength"),
            pattern: str_field(map, "pattern"),
            properties: node_map(map, "properties"),
            required: string_list(map, "required"),
            items: map.get("items").map(|v| Box::new(SchemaNode::from_value(v))),
            min_items: uint_field(map, "minItems"),
            max_items: uint_field(map, "maxItems"),
            all_of: node_list(map, "allOf"),
            any_of: node_list(map, "anyOf"),
            one_of: node_list(map, "oneOf"),
        }))
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(SchemaNode::from_value(&value))
    }
}

fn str_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn num_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn uint_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(Value::as_u64)
}

fn string_list(map: &serde_json::Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let arr = map.get(key)?.as_array()?;
    Some(
        arr.iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

fn node_list(map: &serde_json::Map<String, Value>, key: &str) -> Option<Vec<SchemaNode>> {
    let arr = map.get(key)?.as_array()?;
    Some(arr.iter().map(SchemaNode::from_value).collect())
}

fn node_map(
    map: &serde_json::Map<String, Value>,
    key: &str,
) -> Option<IndexMap<String, SchemaNode>> {
    let obj = map.get(key)?.as_object()?;
    Some(
        obj.iter()
            .map(|(k, v)| (k.clone(), SchemaNode::from_value(v)))
            .collect(),
    )
}
