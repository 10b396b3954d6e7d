#![deny(missing_docs)]

//! # Generate Command
//!
//! Loads a service manifest and a generator configuration, then writes the
//! Swagger document to a file or stdout.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use swagdoc_core::{AppError, GeneratorConfig, ServiceManifest, SwaggerGenerator};
use tracing::info;

use crate::error::{CliError, CliResult};

/// Serialization of the generated document.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Where the document comes from, shared by every command that builds one.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Service manifest (YAML or JSON).
    #[clap(long, short)]
    pub manifest: PathBuf,

    /// Generator configuration file (YAML or JSON).
    #[clap(long, short, env = "SWAGDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Definition reference depth: 0 inline, N bounded, negative unbounded.
    #[clap(long, env = "SWAGDOC_DEF_REF_DEPTH", allow_negative_numbers = true)]
    pub def_ref_depth: Option<i32>,

    /// Move parameters into `#/parameters/`.
    #[clap(long)]
    pub param_ref: bool,

    /// Move responses into `#/responses/`.
    #[clap(long)]
    pub resp_ref: bool,

    /// API title, overriding the configuration.
    #[clap(long)]
    pub title: Option<String>,

    /// API version, overriding the configuration.
    #[clap(long)]
    pub api_version: Option<String>,
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Manifest, configuration and overrides.
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Output file. Prints to stdout when omitted.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Builds the configuration: file values first, command line flags on top.
pub fn load_config(source: &SourceArgs) -> CliResult<GeneratorConfig> {
    let mut config = GeneratorConfig::load_or_default(source.config.as_deref())?;
    if let Some(depth) = source.def_ref_depth {
        config.def_ref_depth = depth;
    }
    // Flags can only switch references on
    config.param_ref |= source.param_ref;
    config.resp_ref |= source.resp_ref;
    if let Some(title) = &source.title {
        config.title = title.clone();
    }
    if let Some(version) = &source.api_version {
        config.version = version.clone();
    }
    Ok(config)
}

/// Generates the document described by `source`.
pub fn build_document(source: &SourceArgs) -> CliResult<Value> {
    if !source.manifest.exists() {
        return Err(CliError::General(format!(
            "Manifest not found: {:?}",
            source.manifest
        )));
    }
    let manifest = ServiceManifest::load(&source.manifest)?;
    let config = load_config(source)?;
    info!(
        services = manifest.services.len(),
        manifest = %source.manifest.display(),
        "loaded manifest"
    );
    Ok(SwaggerGenerator::new(manifest.services, config).generate()?)
}

/// Serializes `document` in `format`.
pub fn render(document: &Value, format: OutputFormat) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(document).map_err(AppError::from)?,
        OutputFormat::Yaml => serde_yaml::to_string(document).map_err(AppError::from)?,
    };
    Ok(rendered)
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let document = build_document(&args.source)?;
    let rendered = render(&document, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            info!(output = %path.display(), "wrote swagger document");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"
services:
  - name: users
    path: /users/{id}
    definitions:
      - method: POST
        view: create
        args:
          renderer: json
          validators: [colander_body_validator]
          schema:
            type: mapping
            type_name: User
            children:
              - { name: email, type: string, format: email }
"#;

    fn source(manifest: &Path) -> SourceArgs {
        SourceArgs {
            manifest: manifest.to_path_buf(),
            config: None,
            def_ref_depth: None,
            param_ref: false,
            resp_ref: false,
            title: None,
            api_version: None,
        }
    }

    #[test]
    fn test_execute_writes_json() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("services.yaml");
        fs::write(&manifest, MANIFEST).unwrap();
        let output = dir.path().join("out/swagger.json");

        let mut src = source(&manifest);
        src.def_ref_depth = Some(-1);
        src.title = Some("Users".into());
        let args = GenerateArgs {
            source: src,
            output: Some(output.clone()),
            format: OutputFormat::Json,
        };
        execute(&args).unwrap();

        let doc: Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(doc["info"]["title"], json!("Users"));
        assert_eq!(
            doc["paths"]["/users/{id}"]["post"]["parameters"][0]["schema"],
            json!({"$ref": "#/definitions/User"})
        );
        assert_eq!(
            doc["definitions"]["User"]["properties"]["email"]["format"],
            json!("email")
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("swagdoc.yaml");
        fs::write(
            &config_path,
            "title: From file\nversion: \"3\"\ndef_ref_depth: 0\nresp_ref: true\n",
        )
        .unwrap();

        let mut src = source(Path::new("unused.yaml"));
        src.config = Some(config_path);
        src.def_ref_depth = Some(2);
        src.api_version = Some("4".into());

        let config = load_config(&src).unwrap();
        assert_eq!(config.title, "From file");
        assert_eq!(config.version, "4");
        assert_eq!(config.def_ref_depth, 2);
        assert!(config.resp_ref);
        assert!(!config.param_ref);
    }

    #[test]
    fn test_render_yaml() {
        let rendered = render(&json!({"swagger": "2.0"}), OutputFormat::Yaml).unwrap();
        assert_eq!(rendered.trim(), "swagger: '2.0'");
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let err = build_document(&source(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(format!("{}", err).contains("Manifest not found"));
    }

    #[test]
    fn test_generation_error_surfaces() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("services.yaml");
        fs::write(
            &manifest,
            r#"
services:
  - path: /x
    definitions:
      - { method: PUT, view: a }
      - { method: PUT, view: b }
"#,
        )
        .unwrap();
        let err = build_document(&source(&manifest)).unwrap_err();
        assert!(matches!(
            err,
            CliError::App(AppError::DuplicateOperation { .. })
        ));
    }
}
