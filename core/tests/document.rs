use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use swagdoc_core::{
    generate_swagger_spec, AppError, ContentType, GeneratorConfig, Provider, SchemaNode, Service,
    SwaggerGenerator, TypeConverter, Validator, ValidatorPipeline, ViewArgs, ViewClass, ViewRef,
};

fn body_schema() -> SchemaNode {
    SchemaNode::mapping(vec![
        SchemaNode::string().named("foo"),
        SchemaNode::string().named("bar"),
    ])
    .named("body")
    .with_type_name("Body")
}

fn request_schema() -> SchemaNode {
    SchemaNode::mapping(vec![
        body_schema(),
        SchemaNode::mapping(vec![SchemaNode::string().named("foo").optional()])
            .named("querystring"),
    ])
    .with_type_name("RequestSchema")
}

fn generate(services: Vec<Service>, config: GeneratorConfig) -> Result<Value, AppError> {
    SwaggerGenerator::new(services, config).generate()
}

#[test]
fn test_minimal_document() {
    let service = Service::new("ping", "/ping").with_view(
        "GET",
        ViewRef::named("ping"),
        ViewArgs::default().with_renderer("json"),
    );
    let doc = generate(vec![service], GeneratorConfig::new("IceCreamAPI", "4.2")).unwrap();

    assert_eq!(
        doc,
        json!({
            "swagger": "2.0",
            "info": {"title": "IceCreamAPI", "version": "4.2"},
            "basePath": "/",
            "paths": {
                "/ping": {
                    "get": {
                        "responses": {"default": {"description": "UNDOCUMENTED RESPONSE"}},
                        "produces": ["application/json"]
                    }
                }
            }
        })
    );
}

#[test]
fn test_ignored_methods() {
    let service = Service::new("ping", "/ping")
        .with_view("HEAD", ViewRef::named("head"), ViewArgs::default())
        .with_view("options", ViewRef::named("options"), ViewArgs::default())
        .with_view("GET", ViewRef::named("get"), ViewArgs::default());
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    let item = doc["paths"]["/ping"].as_object().unwrap();
    assert_eq!(item.keys().collect::<Vec<_>>(), ["get"]);
}

#[test]
fn test_body_parameter_referenced_at_depth_one() {
    let service = Service::new("bodies", "/bodies").with_view(
        "POST",
        ViewRef::named("post"),
        ViewArgs::default().with_schema(request_schema()),
    );
    let config = GeneratorConfig::default().with_def_ref_depth(1);
    let doc = generate(vec![service], config).unwrap();

    let params = &doc["paths"]["/bodies"]["post"]["parameters"];
    assert_eq!(
        params[0],
        json!({
            "name": "body",
            "in": "body",
            "required": true,
            "schema": {"$ref": "#/definitions/Body"}
        })
    );
    assert_eq!(
        params[1],
        json!({"name": "foo", "in": "query", "required": false, "type": "string"})
    );
    assert_eq!(
        doc["definitions"],
        json!({
            "Body": {
                "type": "object",
                "title": "Body",
                "properties": {
                    "foo": {"type": "string", "title": "Foo"},
                    "bar": {"type": "string", "title": "Bar"}
                },
                "required": ["foo", "bar"]
            }
        })
    );
}

#[test]
fn test_inline_depth_has_no_definitions() {
    let service = Service::new("bodies", "/bodies").with_view(
        "POST",
        ViewRef::named("post"),
        ViewArgs::default().with_schema(request_schema()),
    );
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert!(doc.get("definitions").is_none());
    assert_eq!(
        doc["paths"]["/bodies"]["post"]["parameters"][0]["schema"]["type"],
        json!("object")
    );
}

#[test]
fn test_body_pipeline_transformer() {
    let body = SchemaNode::mapping(vec![SchemaNode::integer().named("count")])
        .with_type_name("Counter");
    let service = Service::new("counters", "/counters").with_view(
        "PUT",
        ViewRef::named("put"),
        ViewArgs::default()
            .with_schema(body)
            .with_validator(ValidatorPipeline::Body),
    );
    let config = GeneratorConfig::default().with_def_ref_depth(-1);
    let doc = generate(vec![service], config).unwrap();

    let param = &doc["paths"]["/counters"]["put"]["parameters"][0];
    assert_eq!(param["in"], json!("body"));
    assert_eq!(param["schema"], json!({"$ref": "#/definitions/Counter"}));
}

#[test]
fn test_custom_schema_transformer_runs_after_builtin() {
    let service = Service::new("search", "/search").with_view(
        "GET",
        ViewRef::named("search"),
        ViewArgs::default().with_schema(SchemaNode::mapping(vec![])),
    );
    let add_query = Arc::new(|schema: SchemaNode, _args: &ViewArgs| {
        schema.push(
            SchemaNode::mapping(vec![SchemaNode::string().named("q")]).named("querystring"),
        )
    });
    let doc = SwaggerGenerator::new(vec![service], GeneratorConfig::default())
        .with_schema_transformer(add_query)
        .generate()
        .unwrap();
    assert_eq!(
        doc["paths"]["/search"]["get"]["parameters"],
        json!([{"name": "q", "in": "query", "required": true, "type": "string"}])
    );
}

#[test]
fn test_path_parameters_and_subpath() {
    let service = Service::new("files", "/files/{owner}/*subpath").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert_eq!(
        doc["paths"]["/files/{owner}/{subpath}"]["parameters"],
        json!([
            {"name": "owner", "in": "path", "type": "string", "required": true},
            {"name": "subpath", "in": "path", "type": "string", "required": true}
        ])
    );
}

#[test]
fn test_parameter_references() {
    let service = Service::new("users", "/users/{id}").with_view(
        "POST",
        ViewRef::named("post"),
        ViewArgs::default().with_schema(request_schema()),
    );
    let config = GeneratorConfig::default().with_param_ref(true);
    let doc = generate(vec![service], config).unwrap();

    let item = &doc["paths"]["/users/{id}"];
    assert_eq!(item["parameters"], json!([{"$ref": "#/parameters/id"}]));
    assert_eq!(
        item["post"]["parameters"],
        json!([{"$ref": "#/parameters/Body"}, {"$ref": "#/parameters/foo"}])
    );
    let registered: Vec<&String> = doc["parameters"].as_object().unwrap().keys().collect();
    assert_eq!(registered, ["id", "Body", "foo"]);
}

#[test]
fn test_response_schemas() {
    let ok = SchemaNode::mapping(vec![SchemaNode::mapping(vec![
        SchemaNode::string().named("id"),
    ])
    .named("body")
    .with_type_name("User")])
    .with_type_name("UserResponse")
    .described("Return the user");
    let service = Service::new("users", "/users").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default().with_response("200", ok),
    );
    let config = GeneratorConfig::default()
        .with_def_ref_depth(-1)
        .with_resp_ref(true);
    let doc = generate(vec![service], config).unwrap();

    assert_eq!(
        doc["paths"]["/users"]["get"]["responses"],
        json!({"200": {"$ref": "#/responses/UserResponse"}})
    );
    assert_eq!(
        doc["responses"]["UserResponse"],
        json!({"description": "Return the user", "schema": {"$ref": "#/definitions/User"}})
    );
    assert!(doc["definitions"].get("User").is_some());
}

#[test]
fn test_response_without_description() {
    let service = Service::new("users", "/users").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default()
            .with_response("200", SchemaNode::mapping(vec![]).described("Fine"))
            .with_response("404", SchemaNode::mapping(vec![])),
    );
    let err = generate(vec![service], GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, AppError::MissingDescription(status) if status == "404"));
}

#[test]
fn test_ignored_content_type_view_skipped() {
    let service = Service::new("things", "/x")
        .with_view(
            "PUT",
            ViewRef::named("put_json"),
            ViewArgs::default().with_content_types(["application/json"]),
        )
        .with_view(
            "PUT",
            ViewRef::named("put_xml"),
            ViewArgs::default().with_content_types(["text/xml"]),
        );
    let config = GeneratorConfig::default().with_ignore_ctypes(["text/xml"]);
    let doc = generate(vec![service], config).unwrap();
    assert_eq!(doc["paths"]["/x"]["put"]["consumes"], json!(["application/json"]));
}

#[test]
fn test_duplicate_operation() {
    let service = Service::new("things", "/x")
        .with_view(
            "PUT",
            ViewRef::named("put_json"),
            ViewArgs::default().with_content_types(["application/json"]),
        )
        .with_view(
            "put",
            ViewRef::named("put_again"),
            ViewArgs::default().with_content_types(["application/json"]),
        );
    let err = generate(vec![service], GeneratorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AppError::DuplicateOperation { ref method, ref path } if method == "put" && path == "/x"
    ));
}

#[test]
fn test_dynamic_content_type_dropped() {
    let mut args = ViewArgs::default();
    args.content_type = Some(vec![
        ContentType::Dynamic {
            dynamic: "is_json".into(),
        },
        ContentType::from("application/json"),
    ]);
    let service = Service::new("things", "/x").with_view("POST", ViewRef::named("post"), args);
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert_eq!(doc["paths"]["/x"]["post"]["consumes"], json!(["application/json"]));
}

#[test]
fn test_xml_renderer() {
    let service = Service::new("feed", "/feed").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default().with_renderer("xml"),
    );
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert_eq!(doc["paths"]["/feed"]["get"]["produces"], json!(["text/xml"]));
}

#[test]
fn test_tags() {
    let klass = ViewClass {
        name: "Users".into(),
        docstring: Some("\n    User management.\n    ".into()),
        ..Default::default()
    };
    let users = Service::new("users", "/users")
        .with_tags(["users"])
        .with_klass(klass)
        .with_view(
            "GET",
            ViewRef::named("get"),
            ViewArgs::default().with_tags(json!(["admin", "users"]).into()),
        )
        .with_view("POST", ViewRef::named("post"), ViewArgs::default());
    let pets = Service::new("pets", "/pets/{id}").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );

    let mut config = GeneratorConfig::default();
    config.tags_from_path = true;
    let doc = generate(vec![users, pets], config).unwrap();

    assert_eq!(doc["paths"]["/users"]["get"]["tags"], json!(["users", "admin"]));
    assert_eq!(doc["paths"]["/users"]["post"]["tags"], json!(["users"]));
    assert_eq!(doc["paths"]["/pets/{id}"]["get"]["tags"], json!(["pets"]));
    assert_eq!(
        doc["tags"],
        json!([
            {"name": "users", "description": "User management."},
            {"name": "admin"},
            {"name": "pets"}
        ])
    );
}

#[test]
fn test_invalid_tags() {
    let service = Service::new("users", "/users").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default().with_tags(json!("users").into()),
    );
    let err = generate(vec![service], GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, AppError::InvalidTags(_)));
}

#[test]
fn test_operation_ids_and_security() {
    let service = Service::new("users", "/users")
        .with_view("GET", ViewRef::named("get"), ViewArgs::default())
        .with_view(
            "POST",
            ViewRef::named("post"),
            ViewArgs::default()
                .with_operation_id(json!("createUser").into())
                .with_security(json!([]).into()),
        );
    let config = GeneratorConfig::default()
        .with_default_op_ids(Provider::dynamic(|service, method| {
            json!(format!("{method}_{}", service.name))
        }))
        .with_default_security(json!([{"api_key": []}]).into());
    let doc = generate(vec![service], config).unwrap();

    let get = &doc["paths"]["/users"]["get"];
    assert_eq!(get["operationId"], json!("get_users"));
    assert_eq!(get["security"], json!([{"api_key": []}]));
    let post = &doc["paths"]["/users"]["post"];
    assert_eq!(post["operationId"], json!("createUser"));
    assert_eq!(post["security"], json!([]));
}

#[test]
fn test_invalid_security() {
    let service = Service::new("users", "/users").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );
    let config = GeneratorConfig::default().with_default_security(json!({"api_key": []}).into());
    let err = generate(vec![service], config).unwrap_err();
    assert!(matches!(err, AppError::InvalidSecurity(_)));
}

#[test]
fn test_summary_docstrings() {
    let klass = ViewClass {
        name: "Users".into(),
        docstring: None,
        methods: [("collection_get".to_string(), "List users.".to_string())]
            .into_iter()
            .collect(),
    };
    let service = Service::new("users", "/users")
        .with_klass(klass)
        .with_view(
            "GET",
            ViewRef::named("collection_get"),
            ViewArgs::default(),
        )
        .with_view(
            "POST",
            ViewRef::named("create").with_docstring("\n    Create a user.\n    "),
            ViewArgs::default(),
        );

    let config = GeneratorConfig::default().with_summary_docstrings(true);
    let doc = generate(vec![service.clone()], config).unwrap();
    assert_eq!(doc["paths"]["/users"]["get"]["summary"], json!("List users."));
    assert_eq!(doc["paths"]["/users"]["post"]["summary"], json!("Create a user."));

    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert!(doc["paths"]["/users"]["post"].get("summary").is_none());
}

#[test]
fn test_base_document_merged() {
    let mut config = GeneratorConfig::new("API", "1");
    config.base_path = "/api/v1".into();
    config.info.insert("contact".into(), json!({"name": "Ops"}));
    config.swagger = json!({
        "host": "example.org",
        "info": {"description": "Base"},
        "tags": [{"name": "existing"}]
    })
    .as_object()
    .cloned()
    .unwrap();
    config.default_tags = Some(json!(["existing", "new"]).into());

    let service = Service::new("ping", "/ping").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );
    let doc = generate(vec![service], config).unwrap();

    assert_eq!(doc["host"], json!("example.org"));
    assert_eq!(doc["basePath"], json!("/api/v1"));
    assert_eq!(
        doc["info"],
        json!({"description": "Base", "contact": {"name": "Ops"}, "title": "API", "version": "1"})
    );
    assert_eq!(doc["tags"], json!([{"name": "existing"}, {"name": "new"}]));
}

#[test]
fn test_custom_kind_through_generator() {
    let money = SchemaNode::new("money".to_string().into()).named("price");
    let schema = SchemaNode::mapping(vec![
        SchemaNode::mapping(vec![money]).named("querystring"),
    ]);
    let service = Service::new("items", "/items").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default().with_schema(schema.clone()),
    );

    let err = generate(vec![service.clone()], GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, AppError::UnsupportedType(kind) if kind == "money"));

    let converter = TypeConverter::new().with_custom(
        "money",
        |_node: &SchemaNode, _: &TypeConverter| -> swagdoc_core::AppResult<swagdoc_core::SchemaObject> {
            Ok(json!({"type": "number", "format": "decimal"})
                .as_object()
                .cloned()
                .unwrap_or_default())
        },
    );
    let doc = SwaggerGenerator::new(vec![service], GeneratorConfig::default())
        .with_type_converter(converter)
        .generate()
        .unwrap();
    assert_eq!(
        doc["paths"]["/items"]["get"]["parameters"][0],
        json!({"name": "price", "in": "query", "required": true, "type": "number", "format": "decimal"})
    );
}

#[test]
fn test_validators_reach_parameters() {
    let schema = SchemaNode::mapping(vec![SchemaNode::mapping(vec![SchemaNode::string()
        .named("color")
        .with_validator(Validator::one_of(["red", "blue"]))])
    .named("querystring")]);
    let service = Service::new("paint", "/paint").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default().with_schema(schema),
    );
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert_eq!(
        doc["paths"]["/paint"]["get"]["parameters"][0]["enum"],
        json!(["red", "blue"])
    );
}

#[test]
fn test_generate_swagger_spec_helper() {
    let service = Service::new("ping", "/ping").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );
    let doc = generate_swagger_spec(vec![service], "Helper", "0.1", GeneratorConfig::default())
        .unwrap();
    assert_eq!(doc["info"], json!({"title": "Helper", "version": "0.1"}));
}

#[test]
fn test_duplicate_operation_across_services() {
    let json_put = Service::new("x-json", "/x").with_view(
        "PUT",
        ViewRef::named("put_json"),
        ViewArgs::default()
            .with_renderer("json")
            .with_content_types(["application/json"]),
    );
    let text_put = Service::new("x-text", "/x").with_view(
        "PUT",
        ViewRef::named("put_text"),
        ViewArgs::default().with_content_types(["text/plain"]),
    );
    let err = generate(vec![json_put, text_put], GeneratorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AppError::DuplicateOperation { method, path } if method == "put" && path == "/x"
    ));
}

#[test]
fn test_services_sharing_path_merge_methods() {
    let reader = Service::new("reader", "/items/{id}").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );
    let writer = Service::new("writer", "/items/{id}").with_view(
        "DELETE",
        ViewRef::named("delete"),
        ViewArgs::default(),
    );
    let doc = generate(vec![reader, writer], GeneratorConfig::default()).unwrap();

    let item = doc["paths"]["/items/{id}"].as_object().unwrap();
    assert_eq!(
        item.keys().collect::<Vec<_>>(),
        vec!["parameters", "get", "delete"]
    );
    assert_eq!(
        item["parameters"],
        json!([{"name": "id", "in": "path", "type": "string", "required": true}])
    );
}

#[test]
fn test_invalid_default_tags() {
    let service = || {
        Service::new("users", "/users").with_view("GET", ViewRef::named("get"), ViewArgs::default())
    };

    let config = GeneratorConfig::default().with_default_tags(json!("users").into());
    let err = generate(vec![service()], config).unwrap_err();
    assert!(matches!(err, AppError::InvalidTags(_)));

    let config = GeneratorConfig::default()
        .with_default_tags(Provider::dynamic(|service, _method| json!(service.name)));
    let err = generate(vec![service()], config).unwrap_err();
    assert!(matches!(err, AppError::InvalidTags(_)));

    let config = GeneratorConfig::default().with_default_tags(json!(["users", 7]).into());
    let err = generate(vec![service()], config).unwrap_err();
    assert!(matches!(err, AppError::InvalidTags(tag) if tag == "7"));
}

#[test]
fn test_format_shorthands_imply_validators() {
    let schema = SchemaNode::mapping(vec![SchemaNode::mapping(vec![
        SchemaNode::string().named("id").with_format("uuid"),
        SchemaNode::string().named("blob").with_format("binary"),
        SchemaNode::string()
            .named("ref")
            .with_format("uuid")
            .with_validator(Validator::length(Some(36), Some(36))),
    ])
    .named("querystring")]);
    let service = Service::new("blobs", "/blobs").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default().with_schema(schema),
    );
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    let params = &doc["paths"]["/blobs"]["get"]["parameters"];

    assert_eq!(params[0]["format"], json!("uuid"));
    assert_eq!(params[0]["pattern"], json!(Validator::Uuid.pattern().unwrap()));
    assert_eq!(params[1]["format"], json!("binary"));
    assert_eq!(params[1]["pattern"], json!(Validator::FileUri.pattern().unwrap()));
    assert_eq!(params[2]["format"], json!("uuid"));
    assert!(params[2].get("pattern").is_none());
    assert_eq!(params[2]["minLength"], json!(36));
}

#[test]
fn test_bare_subpath_marker() {
    let service = Service::new("static", "/static/*").with_view(
        "GET",
        ViewRef::named("get"),
        ViewArgs::default(),
    );
    let doc = generate(vec![service], GeneratorConfig::default()).unwrap();
    assert_eq!(
        doc["paths"]["/static/{subpath}"]["parameters"],
        json!([{"name": "subpath", "in": "path", "type": "string", "required": true}])
    );
}
