//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every conversion failure is fatal to the generation call that raised it;
//! nothing here is retried internally.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// An object schema reached the definition registry without a usable name.
    #[from(ignore)]
    #[display("Schema needs a title to be referenced (type '{_0}')")]
    MissingTitle(String),

    /// A parameter location outside of path/query/header/body.
    #[from(ignore)]
    #[display("No parameter converter for location '{_0}'")]
    UnsupportedLocation(String),

    /// A schema kind with no registered converter and no default converter.
    #[from(ignore)]
    #[display("No type converter for schema kind '{_0}'")]
    UnsupportedType(String),

    /// Two views for the same method survived content-type filtering.
    #[from(ignore)]
    #[display(
        "Swagger doesn't support multiple views for a same method ({method} {path}). You may ignore one."
    )]
    DuplicateOperation {
        /// Lower-cased HTTP method.
        method: String,
        /// Service path template.
        path: String,
    },

    /// A tags value that is not a list.
    #[from(ignore)]
    #[display("tags should be a list or callable, got {_0}")]
    InvalidTags(String),

    /// A security value that is not a list.
    #[from(ignore)]
    #[display("security should be a list or callable, got {_0}")]
    InvalidSecurity(String),

    /// A response schema without a description.
    #[from(ignore)]
    #[display("Responses must have a description (status '{_0}')")]
    MissingDescription(String),

    /// A string schema with an inconsistent `format`/`pattern` shorthand.
    #[from(ignore)]
    #[display("Invalid string format specification: {_0}")]
    InvalidFormatSpecification(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Wrapper for YAML (de)serialization errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
