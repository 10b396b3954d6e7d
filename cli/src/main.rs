#![deny(missing_docs)]

//! # Swagdoc CLI
//!
//! Command Line Interface for the Swagger 2.0 generator.
//!
//! Supported Commands:
//! - `generate`: Service manifest -> Swagger document (JSON or YAML).
//! - `serve`: Same document, served with an API explorer page.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;
#[cfg(feature = "server")]
mod serve;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Swagger 2.0 generator for schema-annotated services")]
struct Cli {
    /// Log debug output to stderr. `RUST_LOG` takes precedence.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the Swagger document for a service manifest.
    Generate(generate::GenerateArgs),
    /// Serve the Swagger document and an API explorer over HTTP.
    #[cfg(feature = "server")]
    Serve(serve::ServeArgs),
}

/// Logs go to stderr so a document printed to stdout stays parseable.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        #[cfg(feature = "server")]
        Commands::Serve(args) => serve::execute(args)?,
    }

    Ok(())
}
