//! Management API: document loading and the endpoint catalog.

use crate::mock::build_mock_routes;
use crate::state::{AppState, LoadedApi};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use mockbird_schema_tools::extract::{Endpoint, extract_endpoints};
use mockbird_schema_tools::loader::fetch_document;
use mockbird_schema_tools::model::Info;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoadRequest {
    pub url: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointsQuery {
    pub method: Option<String>,
    pub tag: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Select one page of `items`. Page numbers are 1-based; out-of-range pages
/// yield an empty slice, zero values are clamped to the defaults' floor.
pub fn paginate<T>(items: &[T], page: Option<usize>, limit: Option<usize>) -> (&[T], Pagination) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);

    let total = items.len();
    let total_pages = total.div_ceil(limit);
    let start = (page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);

    let pagination = Pagination {
        page,
        limit,
        total,
        total_pages,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    };

    (&items[start..end], pagination)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadResponse<'a> {
    message: &'static str,
    info: &'a Info,
    pagination: Pagination,
    endpoints: &'a [Endpoint],
    mock_base_url: String,
    security_schemes: Option<&'a Value>,
    servers: &'a [Value],
}

#[derive(Serialize)]
struct EndpointsResponse<'a> {
    pagination: Pagination,
    endpoints: &'a [&'a Endpoint],
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `POST /load-swagger`: fetch the document at `url`, replace all derived
/// state, and return the first page of extracted endpoints.
pub async fn load_swagger(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoadRequest>,
    body: Option<Json<LoadRequest>>,
) -> Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let Some(url) = body.url.clone().filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "url is required"})),
        )
            .into_response();
    };

    let document = match fetch_document(state.client(), &url).await {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Loading OpenAPI document from {url} failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Failed to load Swagger document",
                    "error": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    let endpoints = extract_endpoints(&document);
    let routes = build_mock_routes(&document);

    let page = query.page.or(body.page);
    let limit = query.limit.or(body.limit);
    let (page_items, pagination) = paginate(&endpoints, page, limit);

    // Serialized eagerly, so the borrows end before the state swap below.
    let response = Json(LoadResponse {
        message: "Swagger document loaded successfully",
        info: &document.info,
        pagination,
        endpoints: page_items,
        mock_base_url: mock_base_url(&headers),
        security_schemes: document.components.security_schemes.as_ref(),
        servers: &document.servers,
    })
    .into_response();

    state.replace(LoadedApi {
        source_url: url,
        endpoints,
        routes,
    });

    response
}

/// `GET /endpoints`: the catalog of the currently loaded document, with
/// optional `method`/`tag` filters and pagination.
pub async fn list_endpoints(
    State(state): State<AppState>,
    Query(query): Query<EndpointsQuery>,
) -> Response {
    let Some(api) = state.current() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": "No Swagger document loaded. Load one via POST /load-swagger first."
            })),
        )
            .into_response();
    };

    let filtered: Vec<&Endpoint> = api
        .endpoints
        .iter()
        .filter(|e| {
            query
                .method
                .as_ref()
                .is_none_or(|m| e.method.eq_ignore_ascii_case(m))
        })
        .filter(|e| {
            query
                .tag
                .as_ref()
                .is_none_or(|t| e.tags.iter().any(|tag| tag == t))
        })
        .collect();

    let (page_items, pagination) = paginate(&filtered, query.page, query.limit);

    Json(EndpointsResponse {
        pagination,
        endpoints: page_items,
    })
    .into_response()
}

/// The externally reachable origin of the mock routes, honoring a reverse
/// proxy's forwarded protocol.
fn mock_base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}")
}
