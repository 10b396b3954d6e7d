#![deny(missing_docs)]

//! # Service Model
//!
//! Plain-data description of the routes to document: each [`Service`] is one
//! URL path with one [`ViewDefinition`] per HTTP method it answers.
//!
//! Everything here deserializes from a manifest, e.g.:
//!
//! ```yaml
//! services:
//!   - name: users
//!     path: /users/{id}
//!     tags: [users]
//!     definitions:
//!       - method: GET
//!         view: { name: get_user, docstring: Fetch one user. }
//!         args:
//!           renderer: json
//!           schema: { type: mapping, children: [] }
//! ```

use crate::config::Provider;
use crate::error::AppResult;
use crate::schema::SchemaNode;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// One documented URL path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    /// Service identifier.
    pub name: String,
    /// URL template, with `{name}` segments and `*name` subpath markers.
    pub path: String,
    /// Free text description.
    pub description: Option<String>,
    /// Tags prepended to the tags of every operation.
    pub tags: Vec<String>,
    /// Class the views are methods of, if any.
    pub klass: Option<ViewClass>,
    /// One entry per (method, view) pair.
    pub definitions: Vec<ViewDefinition>,
}

impl Service {
    /// A service answering on `path`.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Adds a view for `method`.
    pub fn with_view(mut self, method: impl Into<String>, view: ViewRef, args: ViewArgs) -> Self {
        self.definitions.push(ViewDefinition {
            method: method.into(),
            view,
            args,
        });
        self
    }

    /// Sets the service-level tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the view class.
    pub fn with_klass(mut self, klass: ViewClass) -> Self {
        self.klass = Some(klass);
        self
    }
}

/// A single (method, view, arguments) registration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewDefinition {
    /// HTTP method, any case.
    pub method: String,
    /// The view answering the method.
    pub view: ViewRef,
    /// Arguments the view was registered with.
    #[serde(default)]
    pub args: ViewArgs,
}

/// The view callable, reduced to what documentation needs.
///
/// Deserializes from either a bare name or `{ name, docstring }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ViewRefRepr")]
pub struct ViewRef {
    /// Function or method name.
    pub name: String,
    /// The view's docstring.
    pub docstring: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ViewRefRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        docstring: Option<String>,
    },
}

impl From<ViewRefRepr> for ViewRef {
    fn from(repr: ViewRefRepr) -> Self {
        match repr {
            ViewRefRepr::Name(name) => ViewRef {
                name,
                docstring: None,
            },
            ViewRefRepr::Full { name, docstring } => ViewRef { name, docstring },
        }
    }
}

impl ViewRef {
    /// A view without docstring.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docstring: None,
        }
    }

    /// Sets the docstring.
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }
}

/// A class whose methods serve as views.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewClass {
    /// Class name.
    pub name: String,
    /// Class docstring. Used as the description of the service tag.
    pub docstring: Option<String>,
    /// Method name to method docstring.
    pub methods: IndexMap<String, String>,
}

impl ViewClass {
    /// Docstring of `method`, matched case-insensitively.
    pub fn method_doc(&self, method: &str) -> Option<&str> {
        self.methods
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(method))
            .map(|(_, doc)| doc.as_str())
    }
}

/// A declared request content type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentType {
    /// A literal media type.
    Static(String),
    /// A runtime predicate; its value cannot be documented.
    Dynamic {
        /// Name of the predicate.
        dynamic: String,
    },
}

impl ContentType {
    /// The media type, when known statically.
    pub fn as_static(&self) -> Option<&str> {
        match self {
            ContentType::Static(ctype) => Some(ctype),
            ContentType::Dynamic { .. } => None,
        }
    }
}

impl From<&str> for ContentType {
    fn from(ctype: &str) -> Self {
        ContentType::Static(ctype.to_string())
    }
}

/// Which part of the request a view's schema validator looks at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ValidatorPipeline {
    /// The whole request (`body`, `querystring`, ... children).
    Request,
    /// The body only.
    Body,
    /// The query string only.
    Querystring,
    /// The headers only.
    Headers,
    /// The path only.
    Path,
    /// Anything else.
    Other(String),
}

impl From<String> for ValidatorPipeline {
    fn from(raw: String) -> Self {
        let name = raw.strip_prefix("colander_").unwrap_or(&raw);
        let name = name.strip_suffix("_validator").unwrap_or(name);
        match name {
            "request" | "colander" | "validator" => ValidatorPipeline::Request,
            "body" => ValidatorPipeline::Body,
            "querystring" => ValidatorPipeline::Querystring,
            "headers" => ValidatorPipeline::Headers,
            "path" => ValidatorPipeline::Path,
            _ => ValidatorPipeline::Other(raw),
        }
    }
}

/// Arguments a view was registered with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewArgs {
    /// Request schema.
    pub schema: Option<SchemaNode>,
    /// Validation pipelines applied to `schema`.
    pub validators: Vec<ValidatorPipeline>,
    /// Renderer name (`json`, `simplejson`, `xml`, ...).
    pub renderer: Option<String>,
    /// Accepted request content types.
    #[serde(deserialize_with = "one_or_many")]
    pub content_type: Option<Vec<ContentType>>,
    /// Response schemas by status code.
    pub response_schemas: Option<IndexMap<String, SchemaNode>>,
    /// Operation tags.
    pub tags: Option<Provider>,
    /// Operation id.
    pub operation_id: Option<Provider>,
    /// Security requirements.
    pub api_security: Option<Provider>,
    /// Class holding the view when the view is given by method name.
    pub klass: Option<ViewClass>,
}

impl ViewArgs {
    /// Sets the request schema.
    pub fn with_schema(mut self, schema: SchemaNode) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the renderer.
    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    /// Sets the accepted content types.
    pub fn with_content_types<I, C>(mut self, ctypes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ContentType>,
    {
        self.content_type = Some(ctypes.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a validation pipeline.
    pub fn with_validator(mut self, pipeline: ValidatorPipeline) -> Self {
        self.validators.push(pipeline);
        self
    }

    /// Sets the response schema for `status`.
    pub fn with_response(mut self, status: impl Into<String>, schema: SchemaNode) -> Self {
        self.response_schemas
            .get_or_insert_with(IndexMap::new)
            .insert(status.into(), schema);
        self
    }

    /// Sets the operation tags.
    pub fn with_tags(mut self, tags: Provider) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the operation id.
    pub fn with_operation_id(mut self, operation_id: Provider) -> Self {
        self.operation_id = Some(operation_id);
        self
    }

    /// Sets the security requirements.
    pub fn with_security(mut self, security: Provider) -> Self {
        self.api_security = Some(security);
        self
    }

    /// Sets the view class.
    pub fn with_klass(mut self, klass: ViewClass) -> Self {
        self.klass = Some(klass);
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<ContentType>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<ContentType>),
        One(ContentType),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(many)) => Some(many),
        Some(OneOrMany::One(one)) => Some(vec![one]),
        None => None,
    })
}

/// Top-level manifest file: the services to document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceManifest {
    /// Services, in document order.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl ServiceManifest {
    /// Parses a YAML manifest. JSON is accepted too since it is valid YAML.
    pub fn from_yaml_str(raw: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}
