#![deny(missing_docs)]

//! # Serve Command
//!
//! Generates the document once and serves it with a Swagger UI explorer:
//!
//! - `GET /api-explorer/swagger.json`: the document.
//! - `GET /api-explorer`: the explorer page.

use std::net::TcpListener;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use serde_json::Value;
use tracing::info;

use crate::error::CliResult;
use crate::generate::{build_document, SourceArgs};

/// URL of the served document.
pub const SWAGGER_JSON_PATH: &str = "/api-explorer/swagger.json";

const EXPLORER_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "{spec_url}", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Manifest, configuration and overrides.
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Address to listen on.
    #[clap(long, env = "SWAGDOC_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,
}

/// Immutable state shared by the workers.
struct Explorer {
    document: String,
    page: String,
}

impl Explorer {
    fn new(document: &Value) -> Self {
        let title = document["info"]["title"]
            .as_str()
            .filter(|t| !t.is_empty())
            .unwrap_or("API explorer");
        Self {
            document: document.to_string(),
            page: EXPLORER_PAGE
                .replace("{title}", &escape_html(title))
                .replace("{spec_url}", SWAGGER_JSON_PATH),
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[get("/api-explorer/swagger.json")]
async fn swagger_json(explorer: web::Data<Explorer>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(explorer.document.clone())
}

#[get("/api-explorer")]
async fn explorer_page(explorer: web::Data<Explorer>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(explorer.page.clone())
}

fn configure(explorer: web::Data<Explorer>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(explorer.clone())
            .service(swagger_json)
            .service(explorer_page);
    }
}

/// Builds the server for `document` on `listener`.
pub fn build_server(
    listener: TcpListener,
    document: &Value,
) -> std::io::Result<actix_web::dev::Server> {
    let explorer = web::Data::new(Explorer::new(document));
    let routes = configure(explorer);
    Ok(HttpServer::new(move || App::new().configure(routes.clone()))
        .listen(listener)?
        .run())
}

/// Executes the serve command. Blocks until the server stops.
pub fn execute(args: &ServeArgs) -> CliResult<()> {
    let document = build_document(&args.source)?;
    let listener = TcpListener::bind(&args.bind)?;
    info!(bind = %args.bind, path = SWAGGER_JSON_PATH, "serving swagger document");

    actix_web::rt::System::new().block_on(async move { build_server(listener, &document)?.await })?;
    Ok(())
}
