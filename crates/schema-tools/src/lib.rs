//! OpenAPI schema tooling for Mockbird.
//!
//! This crate owns everything between "a Swagger/OpenAPI document fetched from
//! somewhere" and "structures a client or mock server can use":
//! - a permissive document model ([`model`]) that never rejects input
//! - local `$ref` resolution ([`resolver`])
//! - recursive structural normalization with a depth bound ([`normalize`])
//! - deterministic example synthesis ([`example`])
//! - per-operation endpoint extraction ([`extract`])
//! - the remote document loader ([`loader`])
//!
//! It intentionally contains **no** HTTP server logic; `mockbird-server`
//! drives it.

pub mod error;
pub mod example;
pub mod extract;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod resolver;

pub use error::{Result, SchemaToolsError};
pub use example::synthesize;
pub use extract::{Endpoint, extract_endpoints};
pub use model::{Document, Schema, SchemaNode, SchemaTable};
pub use normalize::{MAX_DEPTH, NormalizedSchema, normalize};
pub use resolver::{Resolved, resolve};
