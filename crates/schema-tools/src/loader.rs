//! Remote document loading.
//!
//! Fetches a Swagger/OpenAPI document over HTTP and parses it. No retries and
//! no explicit timeout: a slow upstream blocks only the requesting caller.

use crate::error::{Result, SchemaToolsError};
use crate::model::Document;
use url::Url;

/// Fetch and parse the document at `spec_url`.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the fetch fails, the body cannot
/// be read, or the content does not parse as JSON/YAML.
pub async fn fetch_document(client: &reqwest::Client, spec_url: &str) -> Result<Document> {
    let url = Url::parse(spec_url).map_err(|e| SchemaToolsError::InvalidUrl {
        url: spec_url.to_string(),
        message: e.to_string(),
    })?;

    tracing::info!("Fetching OpenAPI document from {spec_url}");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SchemaToolsError::SpecFetch {
            url: spec_url.to_string(),
            message: e.to_string(),
        })?;

    let body = response
        .text()
        .await
        .map_err(|e| SchemaToolsError::SpecReadBody {
            url: spec_url.to_string(),
            message: e.to_string(),
        })?;

    parse_document(spec_url, &body)
}

/// Parse document content. JSON is a valid subset of YAML, so `serde_yaml`
/// alone covers both formats.
///
/// # Errors
///
/// Returns an error if the content is neither valid JSON nor valid YAML.
pub fn parse_document(location: &str, content: &str) -> Result<Document> {
    serde_yaml::from_str(content).map_err(|e| SchemaToolsError::SpecParse {
        location: location.to_string(),
        source: e,
    })
}
