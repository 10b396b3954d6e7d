#![deny(missing_docs)]

//! # Registries
//!
//! Named stores behind the three pointer namespaces of a Swagger 2.0 document:
//! `#/definitions/`, `#/parameters/` and `#/responses/`.
//!
//! The namespaces are independent. Parameter and response entries may still
//! point into `#/definitions/` because their schemas go through the
//! [`DefinitionRegistry`].

use crate::schema::SchemaNode;
use serde_json::{json, Value};

pub mod definitions;
pub mod parameters;
pub mod responses;

pub use definitions::DefinitionRegistry;
pub use parameters::ParameterRegistry;
pub use responses::ResponseRegistry;

/// Builds `{"$ref": "<prefix><name>"}`.
pub(crate) fn ref_object(prefix: &str, name: &str) -> Value {
    json!({ "$ref": format!("{prefix}{name}") })
}

/// Title for a `body` node nested in `parent`.
///
/// The body's declared type name wins. A type name that is literally `body`
/// gives `<ParentType>Body`, and an undeclared one falls back to the node's
/// display title (or `Body`).
pub(crate) fn body_title(body: &SchemaNode, parent: &SchemaNode) -> String {
    match body.type_name.as_deref() {
        Some("body") => {
            let parent_type = parent
                .type_name
                .clone()
                .or_else(|| parent.display_title())
                .unwrap_or_default();
            format!("{parent_type}Body")
        }
        Some(type_name) if !type_name.is_empty() => type_name.to_string(),
        _ => body.display_title().unwrap_or_else(|| "Body".to_string()),
    }
}
