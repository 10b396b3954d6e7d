#![deny(missing_docs)]

//! # Response Registry
//!
//! Builds Response Objects from `{status: schema}` mappings and optionally
//! moves them into the `#/responses/` namespace.
//!
//! A response schema is a mapping whose `body` child describes the payload
//! and whose `header`/`headers` child describes the response headers.

use crate::convert::SchemaObject;
use crate::error::{AppError, AppResult};
use crate::registry::{body_title, ref_object, DefinitionRegistry};
use crate::schema::SchemaNode;
use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::debug;

/// Pointer prefix of the responses namespace.
pub const JSON_POINTER: &str = "#/responses/";

/// Builds the responses of an operation.
#[derive(Debug, Clone, Default)]
pub struct ResponseRegistry {
    referencing: bool,
    responses: IndexMap<String, Value>,
}

impl ResponseRegistry {
    /// A registry that returns `$ref`s when `referencing` is set.
    pub fn new(referencing: bool) -> Self {
        Self {
            referencing,
            responses: IndexMap::new(),
        }
    }

    /// Converts a `{status: schema}` mapping into a `responses` object.
    ///
    /// Every schema must carry a description. The whole mapping is checked
    /// before anything is converted, so a failure leaves the registries as
    /// they were.
    pub fn from_schema_mapping(
        &mut self,
        mapping: &IndexMap<String, SchemaNode>,
        definitions: &mut DefinitionRegistry,
    ) -> AppResult<SchemaObject> {
        if let Some((status, _)) = mapping.iter().find(|(_, node)| !has_description(node)) {
            return Err(AppError::MissingDescription(status.clone()));
        }

        let mut responses = SchemaObject::new();
        for (status, node) in mapping {
            let response = self.convert_response(status, node, definitions)?;
            responses.insert(status.clone(), response);
        }
        Ok(responses)
    }

    /// Same as [`from_schema_mapping`](Self::from_schema_mapping) with the
    /// statuses taken from the names of `node`'s children.
    pub fn from_schema(
        &mut self,
        node: &SchemaNode,
        definitions: &mut DefinitionRegistry,
    ) -> AppResult<SchemaObject> {
        let mapping: IndexMap<String, SchemaNode> = node
            .children
            .iter()
            .map(|child| (child.name.clone(), child.clone()))
            .collect();
        self.from_schema_mapping(&mapping, definitions)
    }

    fn convert_response(
        &mut self,
        status: &str,
        node: &SchemaNode,
        definitions: &mut DefinitionRegistry,
    ) -> AppResult<Value> {
        let mut response = SchemaObject::new();
        response.insert(
            "description".into(),
            json!(node.description.as_deref().unwrap_or_default()),
        );

        for field in &node.children {
            match field.name.as_str() {
                "body" => {
                    let title = body_title(field, node);
                    let schema = definitions.from_schema_titled(field, Some(&title), None)?;
                    response.insert("schema".into(), schema);
                }
                "header" | "headers" => {
                    let converted = definitions.type_converter().convert(field)?;
                    if let Some(Value::Object(mut headers)) = converted.get("properties").cloned() {
                        // Header objects take no title
                        for header in headers.values_mut() {
                            if let Value::Object(header) = header {
                                header.remove("title");
                            }
                        }
                        response.insert("headers".into(), Value::Object(headers));
                    }
                }
                other => debug!(status, child = %other, "ignoring response child"),
            }
        }

        let name = node
            .type_name
            .clone()
            .or_else(|| node.title.clone())
            .unwrap_or_else(|| status.to_string());
        Ok(self.reference(Value::Object(response), &name))
    }

    fn reference(&mut self, response: Value, name: &str) -> Value {
        if !self.referencing {
            return response;
        }
        debug!(response = %name, "registering response");
        self.responses.insert(name.to_string(), response);
        ref_object(JSON_POINTER, name)
    }

    /// All registered responses, in registration order.
    pub fn responses(&self) -> &IndexMap<String, Value> {
        &self.responses
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// The registry content as a `responses` object.
    pub fn to_object(&self) -> SchemaObject {
        self.responses
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn has_description(node: &SchemaNode) -> bool {
    node.description.as_deref().is_some_and(|d| !d.is_empty())
}
