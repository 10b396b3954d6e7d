#![deny(missing_docs)]

//! # Schema Conversion
//!
//! Converters from [`SchemaNode`] trees to Swagger 2.0 objects.
//!
//! - [`types`]: schema nodes to Schema Objects.
//! - [`validators`]: validators to constraint keywords.
//! - [`parameters`]: location-bound nodes to Parameter Objects.

use crate::error::AppResult;
use crate::registry::DefinitionRegistry;
use crate::schema::SchemaNode;
use serde_json::Value;

pub mod parameters;
pub(crate) mod strings;
pub mod types;
pub mod validators;

pub use parameters::{to_parameter, ParameterLocation};
pub use types::{CustomTypeConverter, TypeConverter};

/// A Swagger Schema Object under construction.
pub type SchemaObject = serde_json::Map<String, Value>;

/// Converts `node` with the built-in type converters.
pub fn convert_schema(node: &SchemaNode) -> AppResult<Value> {
    TypeConverter::new().convert(node).map(Value::Object)
}

/// Converts `node` into a parameter located at `location`.
///
/// `location` accepts the same aliases as [`ParameterLocation`]'s `FromStr`.
/// Schemas are always inlined.
pub fn convert_parameter(location: &str, node: &SchemaNode) -> AppResult<Value> {
    let location = location.parse::<ParameterLocation>()?;
    to_parameter(location, node, None, &mut DefinitionRegistry::new(0))
}
