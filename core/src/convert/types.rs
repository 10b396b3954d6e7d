#![deny(missing_docs)]

//! # Type Conversion
//!
//! Recursive conversion of [`SchemaNode`] trees into Swagger schema objects.
//!
//! Built-in kinds are matched exhaustively. Custom kinds (and overrides of
//! built-in ones) are looked up by [`SchemaKind::name`] in a converter table;
//! anything left over goes to the default converter if one is registered.

use crate::convert::strings::resolve_shorthand;
use crate::convert::validators::{
    convert_validator, ValidatorRule, ARRAY_RULES, NUMBER_RULES, STRING_RULES,
};
use crate::convert::SchemaObject;
use crate::error::{AppError, AppResult};
use crate::schema::{SchemaKind, SchemaNode, UnknownPolicy};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Title given to untitled arrays with no declared type name.
const SEQUENCE_TYPE_NAME: &str = "Sequence";

/// A pluggable converter for one schema kind.
pub trait CustomTypeConverter: Send + Sync {
    /// Converts `node`. `dispatcher` converts children.
    fn convert(&self, node: &SchemaNode, dispatcher: &TypeConverter) -> AppResult<SchemaObject>;
}

impl<F> CustomTypeConverter for F
where
    F: Fn(&SchemaNode, &TypeConverter) -> AppResult<SchemaObject> + Send + Sync,
{
    fn convert(&self, node: &SchemaNode, dispatcher: &TypeConverter) -> AppResult<SchemaObject> {
        self(node, dispatcher)
    }
}

/// Dispatches schema nodes to their converters.
#[derive(Clone, Default)]
pub struct TypeConverter {
    custom: HashMap<String, Arc<dyn CustomTypeConverter>>,
    fallback: Option<Arc<dyn CustomTypeConverter>>,
}

impl fmt::Debug for TypeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.custom.keys().collect();
        kinds.sort();
        f.debug_struct("TypeConverter")
            .field("custom", &kinds)
            .field("has_default", &self.fallback.is_some())
            .finish()
    }
}

impl TypeConverter {
    /// A converter for the built-in kinds only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `converter` for the kind called `kind`, replacing any built-in.
    pub fn with_custom(
        mut self,
        kind: impl Into<String>,
        converter: impl CustomTypeConverter + 'static,
    ) -> Self {
        self.custom.insert(kind.into(), Arc::new(converter));
        self
    }

    /// Registers the converter used for kinds nothing else handles.
    pub fn with_default(mut self, converter: impl CustomTypeConverter + 'static) -> Self {
        self.fallback = Some(Arc::new(converter));
        self
    }

    /// Converts `node` into a schema object.
    pub fn convert(&self, node: &SchemaNode) -> AppResult<SchemaObject> {
        self.convert_titled(node, None)
    }

    /// Converts `node`, using `title` instead of the node's own title.
    pub fn convert_titled(&self, node: &SchemaNode, title: Option<&str>) -> AppResult<SchemaObject> {
        trace!(name = %node.name, kind = %node.kind, "converting schema node");

        if let Some(custom) = self.custom.get(node.kind.name()) {
            let mut converted = custom.convert(node, self)?;
            if let Some(title) = title {
                converted.insert("title".into(), json!(title));
            }
            return Ok(converted);
        }

        match &node.kind {
            SchemaKind::Boolean => Ok(base_type(node, "boolean", title)),
            SchemaKind::Date => Ok(formatted(node, "date", title)),
            SchemaKind::DateTime => Ok(formatted(node, "date-time", title)),
            SchemaKind::Time => Ok(formatted(node, "time", title)),
            SchemaKind::Integer => Ok(with_validator(
                base_type(node, "integer", title),
                node,
                NUMBER_RULES,
            )),
            SchemaKind::Number => Ok(with_validator(
                base_type(node, "number", title),
                node,
                NUMBER_RULES,
            )),
            SchemaKind::String => self.convert_string(node, title),
            SchemaKind::Mapping => self.convert_object(node, title),
            SchemaKind::Sequence => self.convert_array(node, title),
            SchemaKind::Custom(kind) => match &self.fallback {
                Some(fallback) => {
                    let mut converted = fallback.convert(node, self)?;
                    if let Some(title) = title {
                        converted.insert("title".into(), json!(title));
                    }
                    Ok(converted)
                }
                None => Err(AppError::UnsupportedType(kind.clone())),
            },
        }
    }

    fn convert_string(&self, node: &SchemaNode, title: Option<&str>) -> AppResult<SchemaObject> {
        let shorthand = resolve_shorthand(node)?;
        let mut converted = base_type(node, "string", title);
        if let Some(format) = shorthand.format {
            converted.insert("format".into(), Value::String(format));
        }

        let validator = node.validator.as_ref().or(shorthand.implied_validator.as_ref());
        if let Some(validator) = validator {
            converted.extend(convert_validator(validator, STRING_RULES));
        }
        Ok(converted)
    }

    fn convert_object(&self, node: &SchemaNode, title: Option<&str>) -> AppResult<SchemaObject> {
        let mut converted = base_type(node, "object", title);

        let mut properties = SchemaObject::new();
        let mut required = Vec::new();
        for child in &node.children {
            properties.insert(child.name.clone(), Value::Object(self.convert(child)?));
            if child.required {
                required.push(Value::String(child.name.clone()));
            }
        }

        if !properties.is_empty() {
            converted.insert("properties".into(), Value::Object(properties));
        }
        if !required.is_empty() {
            converted.insert("required".into(), Value::Array(required));
        }
        if node.unknown == UnknownPolicy::Preserve {
            converted.insert("additionalProperties".into(), json!({}));
        }
        Ok(converted)
    }

    fn convert_array(&self, node: &SchemaNode, title: Option<&str>) -> AppResult<SchemaObject> {
        let item = match node.children.as_slice() {
            [item] => item,
            other => {
                return Err(AppError::General(format!(
                    "Sequence schema '{}' must declare exactly one item node, found {}",
                    node.name,
                    other.len()
                )))
            }
        };

        let mut converted = base_type(node, "array", title);
        converted.insert("items".into(), Value::Object(self.convert(item)?));
        if !converted.contains_key("title") {
            let synthesized = node.type_name.as_deref().unwrap_or(SEQUENCE_TYPE_NAME);
            converted.insert("title".into(), json!(synthesized));
        }
        Ok(with_validator(converted, node, ARRAY_RULES))
    }
}

/// Fields shared by every kind: type, title, description, default, example.
fn base_type(node: &SchemaNode, type_name: &str, title: Option<&str>) -> SchemaObject {
    let mut converted = SchemaObject::new();
    converted.insert("type".into(), json!(type_name));

    let title = title.map(str::to_string).or_else(|| node.display_title());
    if let Some(title) = title {
        converted.insert("title".into(), Value::String(title));
    }
    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        // summary is kept for older consumers
        converted.insert("summary".into(), json!(description));
        converted.insert("description".into(), json!(description));
    }
    if let Some(default) = &node.default {
        converted.insert("default".into(), default.clone());
    }
    if let Some(example) = &node.example {
        converted.insert("example".into(), example.clone());
    }
    converted
}

fn formatted(node: &SchemaNode, format: &str, title: Option<&str>) -> SchemaObject {
    let mut converted = base_type(node, "string", title);
    converted.insert("format".into(), json!(format));
    converted
}

fn with_validator(
    mut converted: SchemaObject,
    node: &SchemaNode,
    rules: &[ValidatorRule],
) -> SchemaObject {
    if let Some(validator) = &node.validator {
        converted.extend(convert_validator(validator, rules));
    }
    converted
}
