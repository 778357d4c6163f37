//! Local `$ref` resolution.
//!
//! Only references rooted at `#/components/schemas/` are honored. Anything
//! else (external files, URLs, other component kinds) is deliberately kept as
//! an unresolved literal: downstream code treats it as a schema with no inline
//! shape. This is a narrowing, not a failure.

use crate::model::{Schema, SchemaNode, SchemaTable};

const LOCAL_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Outcome of resolving a schema node.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// An inline body, either given directly or found in the component table.
    Schema(&'a Schema),
    /// A reference form we do not resolve; the `$ref` string is kept verbatim.
    Unresolved(&'a str),
}

/// Resolve a schema node against the component table.
///
/// Returns `None` when the node is a local reference to a name that is absent
/// from the table. Resolution is single-hop: a component entry that is itself
/// a `$ref` is not chased and surfaces as [`Resolved::Unresolved`].
///
/// Pure function of its inputs; no side effects.
pub fn resolve<'a>(node: &'a SchemaNode, components: &'a SchemaTable) -> Option<Resolved<'a>> {
    match node {
        SchemaNode::Inline(schema) => Some(Resolved::Schema(schema)),
        SchemaNode::Ref(reference) => match reference.strip_prefix(LOCAL_SCHEMA_PREFIX) {
            Some(name) => match components.get(name)? {
                SchemaNode::Inline(schema) => Some(Resolved::Schema(schema)),
                SchemaNode::Ref(inner) => Some(Resolved::Unresolved(inner)),
            },
            None => Some(Resolved::Unresolved(reference)),
        },
    }
}
