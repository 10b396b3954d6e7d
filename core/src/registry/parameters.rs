#![deny(missing_docs)]

//! # Parameter Registry
//!
//! Extracts Parameter Objects from request schemas and URL templates, and
//! optionally moves them into the `#/parameters/` namespace.

use crate::convert::{to_parameter, ParameterLocation, SchemaObject};
use crate::error::AppResult;
use crate::registry::{body_title, ref_object, DefinitionRegistry};
use crate::schema::SchemaNode;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use tracing::debug;

/// Pointer prefix of the parameters namespace.
pub const JSON_POINTER: &str = "#/parameters/";

/// Builds the parameters of an operation.
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    referencing: bool,
    parameters: IndexMap<String, Value>,
}

impl ParameterRegistry {
    /// A registry that returns `$ref`s when `referencing` is set.
    pub fn new(referencing: bool) -> Self {
        Self {
            referencing,
            parameters: IndexMap::new(),
        }
    }

    /// Extracts the parameters described by a request schema.
    ///
    /// A child named `body` becomes the body parameter. Children named after a
    /// location (`path`, `querystring`, `GET`, `header`, `headers`) contribute
    /// one parameter per grandchild. Other children are ignored.
    pub fn from_schema(
        &mut self,
        request: &SchemaNode,
        definitions: &mut DefinitionRegistry,
    ) -> AppResult<Vec<Value>> {
        let mut params = Vec::new();

        for location_node in &request.children {
            let location = match location_node.name.parse::<ParameterLocation>() {
                Ok(location) => location,
                Err(_) => {
                    debug!(child = %location_node.name, "skipping request child without a location");
                    continue;
                }
            };

            if location == ParameterLocation::Body {
                let title = body_title(location_node, request);
                let param = to_parameter(location, location_node, Some(&title), definitions)?;
                params.push(self.reference(param, Some(&title)));
                continue;
            }

            for node in &location_node.children {
                let param = to_parameter(location, node, None, definitions)?;
                params.push(self.reference(param, None));
            }
        }

        Ok(params)
    }

    /// Required string path parameters for every `{name}` in `path`.
    pub fn from_path(&mut self, path: &str) -> Vec<Value> {
        // `{name}` or `{name:regex}`
        static PATH_PARAM_RE: OnceLock<Regex> = OnceLock::new();
        let path_param_re = PATH_PARAM_RE
            .get_or_init(|| Regex::new(r"\{([^}:]+)(?::[^}]*)?\}").expect("Invalid regex"));

        path_param_re
            .captures_iter(path)
            .map(|captures| {
                let param = json!({
                    "name": &captures[1],
                    "in": "path",
                    "type": "string",
                    "required": true,
                });
                self.reference(param, None)
            })
            .collect()
    }

    /// Registers `param` and returns a pointer to it when referencing;
    /// otherwise returns `param` unchanged.
    ///
    /// The entry is named `name`, else the parameter's `title`, else its
    /// `name` field.
    pub fn reference(&mut self, param: Value, name: Option<&str>) -> Value {
        if !self.referencing {
            return param;
        }
        let name = name
            .map(str::to_string)
            .or_else(|| string_field(&param, "title"))
            .or_else(|| string_field(&param, "name"))
            .unwrap_or_default();

        debug!(parameter = %name, "registering parameter");
        self.parameters.insert(name.clone(), param);
        ref_object(JSON_POINTER, &name)
    }

    /// All registered parameters, in registration order.
    pub fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// The registry content as a `parameters` object.
    pub fn to_object(&self) -> SchemaObject {
        self.parameters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
