#![deny(missing_docs)]

//! # Swagdoc Core
//!
//! Core library for the schema-driven Swagger 2.0 generator.
//!
//! Schema trees attached to service views are converted into Swagger schema,
//! parameter and response objects, with repeated object shapes optionally
//! folded behind `$ref` pointers, and assembled into one document.

/// Shared error types.
pub mod error;

/// Input schema trees and validators.
pub mod schema;

/// Schema, validator and parameter converters.
pub mod convert;

/// Definition, parameter and response registries.
pub mod registry;

/// Services and views to document.
pub mod service;

/// Generator options and value providers.
pub mod config;

/// Pre-conversion rewrites.
pub mod transform;

/// Document assembly.
pub mod document;

pub use config::{GeneratorConfig, Provider};
pub use convert::{
    convert_parameter, convert_schema, to_parameter, CustomTypeConverter, ParameterLocation,
    SchemaObject, TypeConverter,
};
pub use document::{generate_swagger_spec, SwaggerGenerator};
pub use error::{AppError, AppResult};
pub use registry::{DefinitionRegistry, ParameterRegistry, ResponseRegistry};
pub use schema::{SchemaKind, SchemaNode, UnknownPolicy, Validator};
pub use service::{
    ContentType, Service, ServiceManifest, ValidatorPipeline, ViewArgs, ViewClass, ViewDefinition,
    ViewRef,
};
pub use transform::{location_schema_transformer, SchemaTransformer};
