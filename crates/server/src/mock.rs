//! Mock route table and dispatch.
//!
//! Instead of registering routes with the framework (and having to tear them
//! out again on reload), every loaded operation becomes one entry in an
//! explicit table; the router's fallback handler matches the request against
//! it. OpenAPI path templates (`/pets/{petId}`) are matched segment-wise, a
//! `{param}` segment accepting any value.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use mockbird_schema_tools::model::Document;
use mockbird_schema_tools::synthesize;
use serde_json::{Value, json};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// One mock route: an operation's method, its path template, and the
/// response synthesized from its 200-response JSON schema (if declared).
#[derive(Debug)]
pub struct MockRoute {
    /// Upper-cased HTTP method.
    pub method: String,
    /// The original path template, e.g. `/pets/{petId}`.
    pub path: String,
    segments: Vec<Segment>,
    /// Precomputed synthesized example; `None` when the operation declares no
    /// 200-response JSON schema.
    pub example: Option<Value>,
}

impl MockRoute {
    #[must_use]
    pub fn matches(&self, method: &str, path: &str) -> bool {
        if !self.method.eq_ignore_ascii_case(method) {
            return false;
        }
        let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if actual.len() != self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(actual)
            .all(|(expected, segment)| match expected {
                Segment::Literal(lit) => lit == segment,
                Segment::Param(_) => true,
            })
    }
}

/// Parse a path template into match segments.
#[must_use]
pub fn parse_template(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            }
        })
        .collect()
}

/// Build the mock route table for a document: one route per declared
/// (path, method) pair, with the 200-response JSON example synthesized
/// up front (synthesis is deterministic, so there is nothing to defer).
#[must_use]
pub fn build_mock_routes(document: &Document) -> Vec<MockRoute> {
    let components = &document.components.schemas;
    let mut routes = Vec::new();

    for (path, item) in &document.paths {
        for (method, operation) in item.operations() {
            let example = operation
                .responses
                .get("200")
                .and_then(|response| response.content.get(JSON_CONTENT_TYPE))
                .and_then(|media| media.schema.as_ref())
                .map(|schema| synthesize(Some(schema), components));

            routes.push(MockRoute {
                method: method.to_uppercase(),
                path: path.clone(),
                segments: parse_template(path),
                example,
            });
        }
    }

    routes
}

/// Fallback handler: serve the first matching mock route, else 404.
pub async fn mock_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let Some(api) = state.current() else {
        return not_found();
    };

    for route in &api.routes {
        if route.matches(method.as_str(), uri.path()) {
            return match &route.example {
                Some(example) => Json(example.clone()).into_response(),
                None => Json(json!({
                    "message": format!("Mocked {} {}", route.method, route.path)
                }))
                .into_response(),
            };
        }
    }

    not_found()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response()
}
