#![deny(missing_docs)]

//! # Transformations
//!
//! Rewrites applied before conversion: request-schema transformers, docstring
//! trimming and URL template normalization.

use crate::schema::SchemaNode;
use crate::service::{ValidatorPipeline, ViewArgs};
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};

/// Rewrites a view's request schema before its parameters are extracted.
pub type SchemaTransformer = Arc<dyn Fn(SchemaNode, &ViewArgs) -> SchemaNode + Send + Sync>;

/// Wraps single-location schemas under the child their pipeline reads.
///
/// A schema validated by the body pipeline describes the body itself; the
/// parameter extraction expects it under a `body` child, so it becomes
/// `mapping { body: <schema> }`. Same for `querystring`, `headers` and
/// `path`. Schemas of views using the full request pipeline are untouched.
pub fn location_schema_transformer(schema: SchemaNode, args: &ViewArgs) -> SchemaNode {
    let location = args.validators.iter().find_map(|pipeline| match pipeline {
        ValidatorPipeline::Body => Some("body"),
        ValidatorPipeline::Querystring => Some("querystring"),
        ValidatorPipeline::Headers => Some("headers"),
        ValidatorPipeline::Path => Some("path"),
        _ => None,
    });

    match location {
        Some(location) => {
            let mut wrapper = SchemaNode::mapping(vec![schema.named(location)]);
            wrapper.type_name = Some("RequestSchema".to_string());
            wrapper
        }
        None => schema,
    }
}

/// The transformers every generator starts with.
pub fn default_transformers() -> Vec<SchemaTransformer> {
    let location: SchemaTransformer = Arc::new(location_schema_transformer);
    vec![location]
}

/// Expands tabs and strips the indentation of every docstring line.
pub fn trim_docstring(docstring: &str) -> String {
    docstring
        .replace('\t', "        ")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Turns `*name` subpath markers into `{name}` template segments. A bare `*`
/// becomes `{subpath}`.
pub fn substitute_subpath_markers(path: &str) -> String {
    static SUBPATH_RE: OnceLock<Regex> = OnceLock::new();
    let subpath_re = SUBPATH_RE.get_or_init(|| Regex::new(r"\*(\w*)").expect("Invalid regex"));
    subpath_re
        .replace_all(path, |caps: &Captures| match &caps[1] {
            "" => "{subpath}".to_string(),
            name => format!("{{{name}}}"),
        })
        .into_owned()
}
