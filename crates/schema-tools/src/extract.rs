//! Endpoint extraction.
//!
//! Walks the document's path/method table and assembles one denormalized
//! record per operation: parameters grouped by location, request body content
//! variants with generated examples, per-status responses with headers, and a
//! derived summary. Records are built fresh on every call and never mutated
//! afterwards.

use crate::example::synthesize;
use crate::model::{
    Document, Header, Operation, Parameter, RequestBody, Response, SchemaTable,
};
use crate::normalize::{NormalizedSchema, normalize};
use crate::resolver::{Resolved, resolve};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

const JSON_CONTENT_TYPE: &str = "application/json";

/// One extracted operation, ready for serialization to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,
    /// Upper-cased HTTP method.
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub parameters: ParameterGroups,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyView>,
    pub responses: IndexMap<String, ResponseView>,
    pub stats: EndpointStats,
}

/// Parameters bucketed by location, plus the catch-all `all` list.
/// Declaration order is preserved within each group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParameterGroups {
    pub all: Vec<ParameterView>,
    pub path: Vec<ParameterView>,
    pub query: Vec<ParameterView>,
    pub header: Vec<ParameterView>,
    pub cookie: Vec<ParameterView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterView {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<NormalizedSchema>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub content: IndexMap<String, RequestContentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_example: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContentView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<NormalizedSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Synthesized only when the document supplied no literal example.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_example: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: IndexMap<String, ResponseContentView>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, HeaderView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseContentView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<NormalizedSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<NormalizedSchema>,
}

/// Derived summary, computed purely from the already-built structures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointStats {
    pub parameter_count: usize,
    pub required_parameters: Vec<RequiredParameter>,
    pub has_request_body: bool,
    pub request_content_types: Vec<String>,
    pub response_status_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequiredParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

/// Extract one record per declared operation, path by path, methods in the
/// fixed order get/post/put/patch/delete/options/head.
///
/// Total over structurally incomplete documents: missing pieces degrade to
/// empty collections or absent fields.
pub fn extract_endpoints(document: &Document) -> Vec<Endpoint> {
    let components = &document.components.schemas;
    let mut endpoints = Vec::new();

    for (path, item) in &document.paths {
        for (method, operation) in item.operations() {
            endpoints.push(build_endpoint(path, method, operation, components));
        }
    }

    endpoints
}

fn build_endpoint(
    path: &str,
    method: &str,
    operation: &Operation,
    components: &SchemaTable,
) -> Endpoint {
    let parameters = group_parameters(&operation.parameters, components);
    let request_body = operation
        .request_body
        .as_ref()
        .map(|body| request_body_view(body, components));
    let responses: IndexMap<String, ResponseView> = operation
        .responses
        .iter()
        .map(|(status, response)| (status.clone(), response_view(response, components)))
        .collect();

    let stats = build_stats(&parameters, request_body.as_ref(), &responses);

    Endpoint {
        path: path.to_string(),
        method: method.to_uppercase(),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        operation_id: operation.operation_id.clone(),
        tags: operation.tags.clone(),
        deprecated: operation.deprecated,
        parameters,
        request_body,
        responses,
        stats,
    }
}

fn group_parameters(parameters: &[Parameter], components: &SchemaTable) -> ParameterGroups {
    let mut groups = ParameterGroups::default();

    for parameter in parameters {
        let view = parameter_view(parameter, components);
        match view.location.as_str() {
            "path" => groups.path.push(view.clone()),
            "query" => groups.query.push(view.clone()),
            "header" => groups.header.push(view.clone()),
            "cookie" => groups.cookie.push(view.clone()),
            // Unknown locations still appear in `all`.
            _ => {}
        }
        groups.all.push(view);
    }

    groups
}

fn parameter_view(parameter: &Parameter, components: &SchemaTable) -> ParameterView {
    let schema_node = parameter.schema.as_ref();
    let normalized = normalize(schema_node, components, 0);

    // Raw inline fields back up the normalized ones when resolution failed.
    let raw = schema_node.and_then(|node| match resolve(node, components) {
        Some(Resolved::Schema(schema)) => Some(schema),
        _ => None,
    });

    let norm = normalized.as_ref();
    ParameterView {
        name: parameter.name.clone().unwrap_or_default(),
        location: parameter.location.clone().unwrap_or_default(),
        required: parameter.required,
        deprecated: parameter.deprecated,
        description: parameter.description.clone(),
        param_type: norm
            .and_then(|n| n.schema_type.clone())
            .or_else(|| raw.and_then(|s| s.schema_type.clone())),
        format: norm
            .and_then(|n| n.format.clone())
            .or_else(|| raw.and_then(|s| s.format.clone())),
        // An explicit parameter-level example beats the schema-derived one.
        example: parameter
            .example
            .clone()
            .or_else(|| norm.and_then(|n| n.example.clone())),
        default: norm
            .and_then(|n| n.default.clone())
            .or_else(|| raw.and_then(|s| s.default.clone())),
        enum_values: norm
            .and_then(|n| n.enum_values.clone())
            .or_else(|| raw.and_then(|s| s.enum_values.clone())),
        minimum: norm.and_then(|n| n.minimum).or_else(|| raw.and_then(|s| s.minimum)),
        maximum: norm.and_then(|n| n.maximum).or_else(|| raw.and_then(|s| s.maximum)),
        style: parameter.style.clone(),
        explode: parameter.explode,
        schema: normalized,
    }
}

fn request_body_view(body: &RequestBody, components: &SchemaTable) -> RequestBodyView {
    let mut content = IndexMap::new();

    for (content_type, media) in &body.content {
        let schema = normalize(media.schema.as_ref(), components, 0);
        let generated_example = if media.example.is_none() {
            Some(synthesize(media.schema.as_ref(), components))
        } else {
            None
        };
        content.insert(
            content_type.clone(),
            RequestContentView {
                schema,
                example: media.example.clone(),
                generated_example,
            },
        );
    }

    // Primary example: the JSON variant's literal example, else its generated
    // one. Other content types never become primary.
    let primary_example = content
        .get(JSON_CONTENT_TYPE)
        .and_then(|c| c.example.clone().or_else(|| c.generated_example.clone()));

    RequestBodyView {
        description: body.description.clone(),
        required: body.required,
        content,
        primary_example,
    }
}

fn response_view(response: &Response, components: &SchemaTable) -> ResponseView {
    let content = response
        .content
        .iter()
        .map(|(content_type, media)| {
            (
                content_type.clone(),
                ResponseContentView {
                    schema: normalize(media.schema.as_ref(), components, 0),
                    // Literal examples only; responses never get generated ones.
                    example: media.example.clone(),
                    examples: media.examples.clone(),
                },
            )
        })
        .collect();

    let headers = response
        .headers
        .iter()
        .map(|(name, header)| (name.clone(), header_view(header, components)))
        .collect();

    ResponseView {
        description: response.description.clone(),
        content,
        headers,
    }
}

fn header_view(header: &Header, components: &SchemaTable) -> HeaderView {
    HeaderView {
        description: header.description.clone(),
        required: header.required,
        schema: normalize(header.schema.as_ref(), components, 0),
    }
}

fn build_stats(
    parameters: &ParameterGroups,
    request_body: Option<&RequestBodyView>,
    responses: &IndexMap<String, ResponseView>,
) -> EndpointStats {
    let required_parameters = parameters
        .all
        .iter()
        .filter(|p| p.required)
        .map(|p| RequiredParameter {
            name: p.name.clone(),
            location: p.location.clone(),
            param_type: p.param_type.clone(),
        })
        .collect();

    let request_content_types = request_body
        .map(|body| body.content.keys().cloned().collect())
        .unwrap_or_default();

    EndpointStats {
        parameter_count: parameters.all.len(),
        required_parameters,
        has_request_body: request_body.is_some(),
        request_content_types,
        response_status_codes: responses.keys().cloned().collect(),
    }
}
