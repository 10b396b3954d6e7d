#![deny(missing_docs)]

//! # Definition Registry
//!
//! Depth-bounded flattening of object schemas into `#/definitions/` entries.
//!
//! The reference depth controls how many levels of nesting are replaced by
//! pointers:
//!
//! - `0`: everything stays inline and nothing is registered.
//! - `n > 0`: at most `n` levels, starting at the root, become `$ref`s.
//! - `n < 0`: every object schema becomes a `$ref`.
//!
//! Only `object` schemas and `array` schemas whose items are (recursively)
//! objects are referenced. Everything else is returned untouched.

use crate::convert::{SchemaObject, TypeConverter};
use crate::error::{AppError, AppResult};
use crate::registry::ref_object;
use crate::schema::SchemaNode;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Pointer prefix of the definitions namespace.
pub const JSON_POINTER: &str = "#/definitions/";

/// Stores named object schemas and hands out pointers to them.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    ref_depth: i32,
    definitions: IndexMap<String, Value>,
    converter: TypeConverter,
}

impl DefinitionRegistry {
    /// A registry with the built-in type converter.
    pub fn new(ref_depth: i32) -> Self {
        Self {
            ref_depth,
            ..Default::default()
        }
    }

    /// Replaces the type converter used by [`from_schema`](Self::from_schema).
    pub fn with_type_converter(mut self, converter: TypeConverter) -> Self {
        self.converter = converter;
        self
    }

    /// The configured reference depth.
    pub fn ref_depth(&self) -> i32 {
        self.ref_depth
    }

    /// The type converter schemas are converted with.
    pub fn type_converter(&self) -> &TypeConverter {
        &self.converter
    }

    /// Converts `node` and flattens the result at the configured depth.
    pub fn from_schema(&mut self, node: &SchemaNode, fallback: Option<&str>) -> AppResult<Value> {
        self.from_schema_titled(node, None, fallback)
    }

    /// Like [`from_schema`](Self::from_schema) with `title` overriding the
    /// node's own title.
    pub fn from_schema_titled(
        &mut self,
        node: &SchemaNode,
        title: Option<&str>,
        fallback: Option<&str>,
    ) -> AppResult<Value> {
        let schema = self.converter.convert_titled(node, title)?;
        let depth = self.ref_depth;
        self.flatten(Value::Object(schema), depth, fallback)
    }

    /// Replaces referenceable schemas in `schema` by pointers, `depth` levels
    /// deep, registering every replaced schema.
    pub fn flatten(
        &mut self,
        mut schema: Value,
        depth: i32,
        fallback: Option<&str>,
    ) -> AppResult<Value> {
        if depth == 0 || !is_referenceable(&schema) {
            return Ok(schema);
        }

        let name = match title_of(&schema).or(fallback) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let kind = schema
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                return Err(AppError::MissingTitle(kind));
            }
        };

        // Negative depths never reach zero
        let child_depth = depth.saturating_sub(1);
        if let Some(Value::Object(properties)) = schema.get_mut("properties") {
            for (key, property) in properties.iter_mut() {
                trace!(definition = %name, property = %key, "flattening property");
                let taken = std::mem::take(property);
                *property = self.flatten(taken, child_depth, Some(key.as_str()))?;
            }
        }
        if let Some(items) = schema.get_mut("items") {
            let taken = std::mem::take(items);
            *items = self.flatten(taken, child_depth, None)?;
        }

        self.register(name.clone(), schema);
        Ok(ref_object(JSON_POINTER, &name))
    }

    fn register(&mut self, name: String, schema: Value) {
        match self.definitions.get(&name) {
            Some(existing) if *existing != schema => {
                warn!(definition = %name, "overwriting a different definition with the same name");
            }
            Some(_) => {}
            None => debug!(definition = %name, "registering definition"),
        }
        self.definitions.insert(name, schema);
    }

    /// All registered definitions, in registration order.
    pub fn definitions(&self) -> &IndexMap<String, Value> {
        &self.definitions
    }

    /// Looks up one definition.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.definitions.get(name)
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The registry content as a `definitions` object.
    pub fn to_object(&self) -> SchemaObject {
        self.definitions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn title_of(schema: &Value) -> Option<&str> {
    schema.get("title").and_then(Value::as_str)
}

/// Objects, and arrays whose items are referenceable.
fn is_referenceable(schema: &Value) -> bool {
    match schema.get("type").and_then(Value::as_str) {
        Some("object") => true,
        Some("array") => schema.get("items").is_some_and(is_referenceable),
        _ => false,
    }
}
