#![deny(missing_docs)]

//! # Generator Configuration
//!
//! Options of a [`SwaggerGenerator`](crate::document::SwaggerGenerator) run
//! and the [`Provider`]s that fill operation fields a view left undeclared.
//!
//! Configuration files are YAML or JSON; every key is optional:
//!
//! ```yaml
//! title: Pet store
//! version: "1.0"
//! def_ref_depth: -1
//! param_ref: true
//! ignore_ctypes: [text/xml]
//! default_security: [{ api_key: [] }]
//! tags_from_path: true
//! ```

use crate::error::AppResult;
use crate::service::Service;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Signature of a dynamic provider: `(service, lower-cased method) -> value`.
pub type ProviderFn = dyn Fn(&Service, &str) -> Value + Send + Sync;

/// A value known up front, or computed per operation.
#[derive(Clone)]
pub enum Provider {
    /// The same value for every operation.
    Static(Value),
    /// Computed from the service and method.
    Dynamic(Arc<ProviderFn>),
}

impl Provider {
    /// Wraps a closure.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Service, &str) -> Value + Send + Sync + 'static,
    {
        Provider::Dynamic(Arc::new(f))
    }

    /// Tags each operation with the first segment of its service path.
    pub fn first_path_segment() -> Self {
        Provider::dynamic(|service, _method| {
            match service.path.split('/').nth(1).filter(|s| !s.is_empty()) {
                Some(segment) => json!([segment]),
                None => json!([]),
            }
        })
    }

    /// The value for `method` on `service`.
    pub fn resolve(&self, service: &Service, method: &str) -> Value {
        match self {
            Provider::Static(value) => value.clone(),
            Provider::Dynamic(f) => f(service, method),
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Provider::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<Value> for Provider {
    fn from(value: Value) -> Self {
        Provider::Static(value)
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Provider::Static)
    }
}

/// Options of one generator run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// `info.title`.
    pub title: String,
    /// `info.version`.
    pub version: String,
    /// `basePath`.
    pub base_path: String,
    /// Extra `info` fields (contact, license, ...).
    pub info: Map<String, Value>,
    /// Document the generated content is merged into.
    pub swagger: Map<String, Value>,
    /// Definition reference depth: `0` inline, `n > 0` bounded, `n < 0` unbounded.
    pub def_ref_depth: i32,
    /// Move parameters into `#/parameters/`.
    pub param_ref: bool,
    /// Move responses into `#/responses/`.
    pub resp_ref: bool,
    /// Methods never documented, any case.
    pub ignore_methods: Vec<String>,
    /// Views accepting any of these content types are skipped.
    pub ignore_ctypes: Vec<String>,
    /// Tags for operations that declare none.
    pub default_tags: Option<Provider>,
    /// Operation ids for operations that declare none.
    pub default_op_ids: Option<Provider>,
    /// Security for operations that declare none.
    pub default_security: Option<Provider>,
    /// Tag undeclared operations with their first path segment.
    ///
    /// Ignored when `default_tags` is set.
    pub tags_from_path: bool,
    /// Use view docstrings as operation summaries.
    pub summary_docstrings: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            title: String::new(),
            version: String::new(),
            base_path: "/".to_string(),
            info: Map::new(),
            swagger: Map::new(),
            def_ref_depth: 0,
            param_ref: false,
            resp_ref: false,
            ignore_methods: vec!["HEAD".to_string(), "OPTIONS".to_string()],
            ignore_ctypes: Vec::new(),
            default_tags: None,
            default_op_ids: None,
            default_security: None,
            tags_from_path: false,
            summary_docstrings: false,
        }
    }
}

impl GeneratorConfig {
    /// A default configuration for the given API title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        GeneratorConfig {
            title: title.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Parses a YAML (or JSON) configuration.
    pub fn from_yaml_str(raw: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses a JSON configuration.
    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Loads a configuration file. `.json` files are parsed as JSON,
    /// anything else as YAML.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_yaml_str(&raw),
        }
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Sets the definition reference depth.
    pub fn with_def_ref_depth(mut self, depth: i32) -> Self {
        self.def_ref_depth = depth;
        self
    }

    /// Enables parameter references.
    pub fn with_param_ref(mut self, enabled: bool) -> Self {
        self.param_ref = enabled;
        self
    }

    /// Enables response references.
    pub fn with_resp_ref(mut self, enabled: bool) -> Self {
        self.resp_ref = enabled;
        self
    }

    /// Sets the ignored content types.
    pub fn with_ignore_ctypes<I, S>(mut self, ctypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_ctypes = ctypes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default tags provider.
    pub fn with_default_tags(mut self, provider: Provider) -> Self {
        self.default_tags = Some(provider);
        self
    }

    /// Sets the default operation id provider.
    pub fn with_default_op_ids(mut self, provider: Provider) -> Self {
        self.default_op_ids = Some(provider);
        self
    }

    /// Sets the default security provider.
    pub fn with_default_security(mut self, provider: Provider) -> Self {
        self.default_security = Some(provider);
        self
    }

    /// Toggles docstring summaries.
    pub fn with_summary_docstrings(mut self, enabled: bool) -> Self {
        self.summary_docstrings = enabled;
        self
    }

    /// The provider used for undeclared tags, if any.
    pub fn tags_provider(&self) -> Option<Provider> {
        match &self.default_tags {
            Some(provider) => Some(provider.clone()),
            None if self.tags_from_path => Some(Provider::first_path_segment()),
            None => None,
        }
    }

    /// True when `method` is in `ignore_methods`.
    pub fn ignores_method(&self, method: &str) -> bool {
        self.ignore_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }
}
