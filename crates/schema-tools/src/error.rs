//! Error types for `mockbird-schema-tools`.

use thiserror::Error;

/// Main error type for document loading.
///
/// The schema engine itself (resolver/normalizer/synthesizer/extractor) is
/// total over arbitrary input and never produces an error; only fetching and
/// parsing the remote document can fail.
#[derive(Error, Debug)]
pub enum SchemaToolsError {
    #[error("invalid OpenAPI document URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("failed to fetch OpenAPI document from '{url}': {message}")]
    SpecFetch { url: String, message: String },

    #[error("failed to read OpenAPI document body from '{url}': {message}")]
    SpecReadBody { url: String, message: String },

    #[error("failed to parse OpenAPI document from '{location}': {source}")]
    SpecParse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type alias for schema tooling operations.
pub type Result<T> = std::result::Result<T, SchemaToolsError>;
