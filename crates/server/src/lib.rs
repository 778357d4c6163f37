//! Mockbird server: HTTP surface over `mockbird-schema-tools`.
//!
//! Three fixed routes (`POST /load-swagger`, `GET /endpoints`, `GET /health`)
//! plus a fallback that serves mock responses for whatever document is
//! currently loaded.

use axum::Router;
use axum::routing::{get, post};

pub mod api;
pub mod mock;
pub mod state;

pub use state::AppState;

/// Build the application router.
///
/// Mock routes are not registered with the framework: the fallback handler
/// dispatches against the explicit route table owned by [`AppState`], which is
/// rebuilt wholesale on every load.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/load-swagger", post(api::load_swagger))
        .route("/endpoints", get(api::list_endpoints))
        .fallback(mock::mock_handler)
        .with_state(state)
}
