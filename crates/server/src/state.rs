//! Shared application state.
//!
//! One lock guards the entire loaded-document world: the endpoint catalog and
//! the mock route table are built off to the side and swapped in together, so
//! an in-flight request never observes a half-replaced document.

use crate::mock::MockRoute;
use mockbird_schema_tools::extract::Endpoint;
use parking_lot::RwLock;
use std::sync::Arc;

/// Everything derived from one successfully loaded document.
#[derive(Debug)]
pub struct LoadedApi {
    pub source_url: String,
    pub endpoints: Vec<Endpoint>,
    pub routes: Vec<MockRoute>,
}

/// Process-wide state: the HTTP client and the currently loaded API, if any.
#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    current: Arc<RwLock<Option<Arc<LoadedApi>>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The currently loaded API, if a load has succeeded.
    #[must_use]
    pub fn current(&self) -> Option<Arc<LoadedApi>> {
        self.current.read().clone()
    }

    /// Replace the loaded API atomically. A failed load never reaches this
    /// point, so prior state survives load errors untouched.
    pub fn replace(&self, api: LoadedApi) {
        tracing::info!(
            "Loaded {} endpoints ({} mock routes) from {}",
            api.endpoints.len(),
            api.routes.len(),
            api.source_url
        );
        *self.current.write() = Some(Arc::new(api));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
