#![deny(missing_docs)]

//! # Document Assembly
//!
//! Walks services and their views, builds one Operation Object per
//! (path, method) and merges the three registries into the final Swagger 2.0
//! document.

use crate::config::GeneratorConfig;
use crate::convert::{SchemaObject, TypeConverter};
use crate::error::{AppError, AppResult};
use crate::registry::{DefinitionRegistry, ParameterRegistry, ResponseRegistry};
use crate::service::{Service, ViewDefinition};
use crate::transform::{
    default_transformers, substitute_subpath_markers, trim_docstring, SchemaTransformer,
};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::{debug, info, warn};

/// Description of the response every operation starts with.
pub const UNDOCUMENTED_RESPONSE: &str = "UNDOCUMENTED RESPONSE";

/// Generates a Swagger 2.0 document from a set of services.
///
/// A generator owns its registries and is consumed by [`generate`](Self::generate).
pub struct SwaggerGenerator {
    services: Vec<Service>,
    config: GeneratorConfig,
    definitions: DefinitionRegistry,
    parameters: ParameterRegistry,
    responses: ResponseRegistry,
    transformers: Vec<SchemaTransformer>,
}

impl fmt::Debug for SwaggerGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwaggerGenerator")
            .field("services", &self.services.len())
            .field("config", &self.config)
            .field("definitions", &self.definitions)
            .field("parameters", &self.parameters)
            .field("responses", &self.responses)
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

impl SwaggerGenerator {
    /// A generator for `services` using the built-in converters.
    pub fn new(services: Vec<Service>, config: GeneratorConfig) -> Self {
        Self {
            definitions: DefinitionRegistry::new(config.def_ref_depth),
            parameters: ParameterRegistry::new(config.param_ref),
            responses: ResponseRegistry::new(config.resp_ref),
            transformers: default_transformers(),
            services,
            config,
        }
    }

    /// Replaces the type converter, e.g. to support custom schema kinds.
    pub fn with_type_converter(mut self, converter: TypeConverter) -> Self {
        self.definitions = DefinitionRegistry::new(self.config.def_ref_depth)
            .with_type_converter(converter);
        self
    }

    /// Appends a request-schema transformer. Transformers run in order.
    pub fn with_schema_transformer(mut self, transformer: SchemaTransformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Builds the document.
    pub fn generate(self) -> AppResult<Value> {
        let SwaggerGenerator {
            services,
            config,
            mut definitions,
            mut parameters,
            mut responses,
            transformers,
        } = self;

        info!(services = services.len(), "generating swagger document");

        let mut doc = config.swagger.clone();
        let mut info = match doc.remove("info") {
            Some(Value::Object(info)) => info,
            _ => Map::new(),
        };
        merge_objects(&mut info, config.info.clone());
        info.insert("title".into(), json!(config.title));
        info.insert("version".into(), json!(config.version));

        let mut paths = match doc.remove("paths") {
            Some(Value::Object(paths)) => paths,
            _ => Map::new(),
        };
        let root_tags = match doc.remove("tags") {
            Some(Value::Array(tags)) => tags,
            _ => Vec::new(),
        };

        let mut builder = PathBuilder {
            config: &config,
            definitions: &mut definitions,
            parameters: &mut parameters,
            responses: &mut responses,
            transformers: &transformers,
            root_tags,
        };

        for service in &services {
            let (path, item) = builder.build_path(service)?;
            match paths.get_mut(&path) {
                Some(Value::Object(existing)) => merge_path_item(existing, item, &service.path)?,
                _ => {
                    paths.insert(path, Value::Object(item));
                }
            }
        }
        let root_tags = builder.root_tags;

        doc.insert("swagger".into(), json!("2.0"));
        doc.insert("info".into(), Value::Object(info));
        doc.insert("basePath".into(), json!(config.base_path));
        doc.insert("paths".into(), Value::Object(paths));
        if !root_tags.is_empty() {
            doc.insert("tags".into(), Value::Array(root_tags));
        }

        for (key, content) in [
            ("definitions", definitions.to_object()),
            ("parameters", parameters.to_object()),
            ("responses", responses.to_object()),
        ] {
            if content.is_empty() {
                continue;
            }
            match doc.get_mut(key) {
                Some(Value::Object(existing)) => merge_objects(existing, content),
                _ => {
                    doc.insert(key.into(), Value::Object(content));
                }
            }
        }

        Ok(Value::Object(doc))
    }
}

/// One-shot helper: documents `services` as API `title` at `version`.
pub fn generate_swagger_spec(
    services: Vec<Service>,
    title: &str,
    version: &str,
    config: GeneratorConfig,
) -> AppResult<Value> {
    let config = GeneratorConfig {
        title: title.to_string(),
        version: version.to_string(),
        ..config
    };
    SwaggerGenerator::new(services, config).generate()
}

/// Recursively merges `source` into `target`; `source` wins on conflicts.
pub fn merge_objects(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_objects(existing, incoming)
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Adds the operations of `item` to a path item already in the document.
///
/// Path-level parameters are unioned by `name` and `in`, or by equality for
/// `$ref` entries. An operation whose method is already present raises
/// [`AppError::DuplicateOperation`].
fn merge_path_item(existing: &mut SchemaObject, item: SchemaObject, path: &str) -> AppResult<()> {
    for (key, value) in item {
        if key != "parameters" {
            if existing.contains_key(&key) {
                return Err(AppError::DuplicateOperation {
                    method: key,
                    path: path.to_string(),
                });
            }
            existing.insert(key, value);
            continue;
        }

        let Value::Array(incoming) = value else {
            continue;
        };
        let params = existing
            .entry("parameters")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(params) = params {
            for param in incoming {
                let known = params.iter().any(|p| {
                    *p == param
                        || (p.get("name").is_some()
                            && p.get("name") == param.get("name")
                            && p.get("in") == param.get("in"))
                });
                if !known {
                    params.push(param);
                }
            }
        }
    }
    Ok(())
}

/// Borrowed generator state while paths are built.
struct PathBuilder<'a> {
    config: &'a GeneratorConfig,
    definitions: &'a mut DefinitionRegistry,
    parameters: &'a mut ParameterRegistry,
    responses: &'a mut ResponseRegistry,
    transformers: &'a [SchemaTransformer],
    root_tags: Vec<Value>,
}

impl PathBuilder<'_> {
    fn build_path(&mut self, service: &Service) -> AppResult<(String, SchemaObject)> {
        let path = substitute_subpath_markers(&service.path);
        debug!(service = %service.name, %path, "building path item");

        let mut item = SchemaObject::new();
        let path_params = self.parameters.from_path(&path);
        if !path_params.is_empty() {
            item.insert("parameters".into(), Value::Array(path_params));
        }

        for view in &service.definitions {
            let method = view.method.to_lowercase();
            if self.config.ignores_method(&method) {
                debug!(%method, %path, "ignoring method");
                continue;
            }

            let consumes = self.consumes(view);
            if let Some(ctype) = consumes
                .iter()
                .find(|c| self.config.ignore_ctypes.contains(*c))
            {
                debug!(%method, %path, %ctype, "ignoring view for content type");
                continue;
            }

            if item.contains_key(&method) {
                return Err(AppError::DuplicateOperation {
                    method,
                    path: service.path.clone(),
                });
            }

            let mut op = self.build_operation(service, view, consumes)?;
            self.apply_tags(&mut op, service, view, &method)?;
            self.apply_operation_id(&mut op, service, view, &method);
            self.apply_security(&mut op, service, view, &method)?;
            item.insert(method, Value::Object(op));
        }

        Ok((path, item))
    }

    /// Statically known content types of a view. Dynamic ones are dropped.
    fn consumes(&self, view: &ViewDefinition) -> Vec<String> {
        let Some(ctypes) = &view.args.content_type else {
            return Vec::new();
        };
        let mut consumes = Vec::new();
        for ctype in ctypes {
            match ctype.as_static() {
                Some(ctype) => {
                    if !consumes.iter().any(|c| c == ctype) {
                        consumes.push(ctype.to_string());
                    }
                }
                None => warn!(view = %view.view.name, "dropping dynamic content type"),
            }
        }
        consumes
    }

    fn build_operation(
        &mut self,
        service: &Service,
        view: &ViewDefinition,
        consumes: Vec<String>,
    ) -> AppResult<SchemaObject> {
        let args = &view.args;
        let mut op = SchemaObject::new();
        op.insert(
            "responses".into(),
            json!({ "default": { "description": UNDOCUMENTED_RESPONSE } }),
        );

        if let Some(produces) = args.renderer.as_deref().and_then(produces_for) {
            op.insert("produces".into(), json!([produces]));
        }
        if !consumes.is_empty() {
            op.insert("consumes".into(), json!(consumes));
        }

        if let Some(schema) = &args.schema {
            let schema = self
                .transformers
                .iter()
                .fold(schema.clone(), |schema, transform| transform(schema, args));
            let params = self.parameters.from_schema(&schema, self.definitions)?;
            if !params.is_empty() {
                op.insert("parameters".into(), Value::Array(params));
            }
        }

        if self.config.summary_docstrings {
            let klass = args.klass.as_ref().or(service.klass.as_ref());
            let docstring = view
                .view
                .docstring
                .as_deref()
                .or_else(|| klass.and_then(|k| k.method_doc(&view.view.name)))
                .map(trim_docstring)
                .filter(|doc| !doc.is_empty());
            if let Some(summary) = docstring {
                op.insert("summary".into(), json!(summary));
            }
        }

        if let Some(response_schemas) = args.response_schemas.as_ref().filter(|r| !r.is_empty()) {
            let responses = self
                .responses
                .from_schema_mapping(response_schemas, self.definitions)?;
            op.insert("responses".into(), Value::Object(responses));
        }

        Ok(op)
    }

    /// Declared (or default) tags, after the service tags, deduplicated.
    /// Service tags come first, then the declared or default ones. Only tags
    /// owned by the service (its own list and the default provider's) are
    /// described by the view class docstring.
    fn apply_tags(
        &mut self,
        op: &mut SchemaObject,
        service: &Service,
        view: &ViewDefinition,
        method: &str,
    ) -> AppResult<()> {
        let mut tags: Vec<String> = Vec::new();
        for tag in &service.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        let mut view_tags: Vec<String> = Vec::new();

        let (provider, declared) = match view.args.tags.clone() {
            Some(provider) => (Some(provider), true),
            None => (self.config.tags_provider(), false),
        };
        if let Some(provider) = provider {
            let values = match provider.resolve(service, method) {
                Value::Array(values) => values,
                other => return Err(AppError::InvalidTags(other.to_string())),
            };
            for value in values {
                let Value::String(tag) = value else {
                    return Err(AppError::InvalidTags(value.to_string()));
                };
                if tags.contains(&tag) || view_tags.contains(&tag) {
                    continue;
                }
                if declared {
                    view_tags.push(tag);
                } else {
                    tags.push(tag);
                }
            }
        }

        if tags.is_empty() && view_tags.is_empty() {
            return Ok(());
        }
        let docstring = service
            .klass
            .as_ref()
            .or(view.args.klass.as_ref())
            .and_then(|k| k.docstring.clone());
        for tag in &tags {
            self.register_root_tag(tag, docstring.as_deref());
        }
        for tag in &view_tags {
            self.register_root_tag(tag, None);
        }
        tags.extend(view_tags);
        op.insert("tags".into(), json!(tags));
        Ok(())
    }

    fn register_root_tag(&mut self, name: &str, docstring: Option<&str>) {
        let known = self
            .root_tags
            .iter()
            .any(|tag| tag.get("name").and_then(Value::as_str) == Some(name));
        if known {
            return;
        }
        let mut tag = SchemaObject::new();
        tag.insert("name".into(), json!(name));
        if let Some(description) = docstring.map(trim_docstring).filter(|d| !d.is_empty()) {
            tag.insert("description".into(), json!(description));
        }
        self.root_tags.push(Value::Object(tag));
    }

    fn apply_operation_id(
        &self,
        op: &mut SchemaObject,
        service: &Service,
        view: &ViewDefinition,
        method: &str,
    ) {
        let provider = view
            .args
            .operation_id
            .as_ref()
            .or(self.config.default_op_ids.as_ref());
        if let Some(provider) = provider {
            let operation_id = provider.resolve(service, method);
            if !operation_id.is_null() {
                op.insert("operationId".into(), operation_id);
            }
        }
    }

    fn apply_security(
        &self,
        op: &mut SchemaObject,
        service: &Service,
        view: &ViewDefinition,
        method: &str,
    ) -> AppResult<()> {
        let provider = view
            .args
            .api_security
            .as_ref()
            .or(self.config.default_security.as_ref());
        let Some(provider) = provider else {
            return Ok(());
        };
        match provider.resolve(service, method) {
            security @ Value::Array(_) => {
                op.insert("security".into(), security);
                Ok(())
            }
            other => Err(AppError::InvalidSecurity(other.to_string())),
        }
    }
}

/// `produces` entry implied by a renderer name.
fn produces_for(renderer: &str) -> Option<&'static str> {
    if renderer.contains("json") {
        Some("application/json")
    } else if renderer == "xml" {
        Some("text/xml")
    } else {
        None
    }
}
