#![deny(missing_docs)]

//! # Parameter Conversion
//!
//! Turns one location-bound schema node into a Swagger 2.0 Parameter Object.
//!
//! Swagger 2.0 only allows a `schema` key on body parameters. Object (or
//! referenced) schemas are therefore nested under `schema`, while primitive
//! schemas are flattened onto the parameter itself.

use crate::error::{AppError, AppResult};
use crate::registry::DefinitionRegistry;
use crate::schema::SchemaNode;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Where a parameter lives in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// URL template segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Request body.
    Body,
}

impl ParameterLocation {
    /// The value of the parameter's `in` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = AppError;

    /// Accepts the Swagger names and the request-schema child names
    /// (`querystring`, `GET`, `headers`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(ParameterLocation::Path),
            "query" | "querystring" | "GET" => Ok(ParameterLocation::Query),
            "header" | "headers" => Ok(ParameterLocation::Header),
            "body" => Ok(ParameterLocation::Body),
            other => Err(AppError::UnsupportedLocation(other.to_string())),
        }
    }
}

/// Keys of a converted schema never copied onto a parameter. `default` is
/// handled by [`to_parameter`] itself.
const SCHEMA_ONLY_KEYS: &[&str] = &["title", "summary", "default"];

/// Converts `node` into a parameter located at `location`.
///
/// The node's schema goes through `definitions`, so object schemas may come
/// back as `$ref`s when the registry is configured to reference them. Body
/// nodes are titled after their declared type name (`title` overrides it).
pub fn to_parameter(
    location: ParameterLocation,
    node: &SchemaNode,
    title: Option<&str>,
    definitions: &mut DefinitionRegistry,
) -> AppResult<Value> {
    let mut converted = Map::new();
    converted.insert("name".into(), json!(node.name));
    converted.insert("in".into(), json!(location.as_str()));
    converted.insert("required".into(), json!(node.required));
    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        converted.insert("description".into(), json!(description));
    }

    if location == ParameterLocation::Body {
        let title = title
            .map(str::to_string)
            .or_else(|| node.type_name.clone());
        let schema = definitions.from_schema_titled(node, title.as_deref(), None)?;
        converted.insert("schema".into(), schema);
        return Ok(Value::Object(converted));
    }

    if let Some(default) = node.default.as_ref().filter(|d| is_truthy(d)) {
        converted.insert("default".into(), default.clone());
    }

    let schema = definitions.from_schema_titled(node, title, None)?;
    let nests = schema.get("$ref").is_some()
        || schema.get("type").and_then(Value::as_str) == Some("object");

    if nests {
        converted.insert("schema".into(), schema);
    } else if let Value::Object(schema) = schema {
        flatten_onto(&mut converted, schema);
    }
    Ok(Value::Object(converted))
}

/// Copies a primitive schema's keywords onto the parameter.
fn flatten_onto(param: &mut Map<String, Value>, schema: Map<String, Value>) {
    for (key, value) in schema {
        if SCHEMA_ONLY_KEYS.contains(&key.as_str()) || param.contains_key(&key) {
            continue;
        }
        if key == "items" {
            // Parameter items only carry the scalar type
            let item_type = value.get("type").cloned();
            match item_type {
                Some(item_type) => param.insert(key, json!({ "type": item_type })),
                None => param.insert(key, value),
            };
            continue;
        }
        param.insert(key, value);
    }
}

/// Falsy defaults (`null`, `false`, `0`, empty string/list/map) are not shown.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
