#![deny(missing_docs)]

//! # String Shorthands
//!
//! Resolves the `format` / `pattern` hints of string nodes into a canonical
//! `format` keyword plus the validator the hint implies.

use crate::error::{AppError, AppResult};
use crate::schema::{SchemaNode, Validator};

/// Formats with extended handling. Each may imply a validator.
fn known_format(format: &str) -> Option<Option<Validator>> {
    let implied = match format {
        // officials
        "email" => Some(Validator::Email),
        "url" => Some(Validator::Url),
        "date" | "date-time" | "password" => None,
        "binary" | "byte" => Some(Validator::FileUri),
        // common but unofficial
        "time" | "hostname" => None,
        "uuid" => Some(Validator::Uuid),
        "file" => Some(Validator::FileUri),
        _ => return None,
    };
    Some(implied)
}

/// Outcome of resolving a string node's shorthand hints.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct StringShorthand {
    /// Value of the `format` keyword, if any.
    pub format: Option<String>,
    /// Validator to use when the node carries none.
    pub implied_validator: Option<Validator>,
}

/// Resolves `format` and `pattern` on a string node.
///
/// An explicit validator on the node always suppresses the implied one.
pub(crate) fn resolve_shorthand(node: &SchemaNode) -> AppResult<StringShorthand> {
    let format = node.format.as_deref().filter(|f| !f.is_empty());
    let pattern = node.pattern.as_deref().filter(|p| !p.is_empty());
    let has_validator = node.validator.is_some();

    if format.is_none() && pattern.is_none() {
        return Ok(StringShorthand::default());
    }

    if let Some(lowered) = format.map(str::to_ascii_lowercase) {
        if let Some(implied) = known_format(&lowered) {
            return Ok(StringShorthand {
                format: Some(lowered),
                implied_validator: if has_validator { None } else { implied },
            });
        }
    }

    match (format, pattern) {
        (Some("pattern"), None) => Err(AppError::InvalidFormatSpecification(format!(
            "string schema '{}' with 'pattern' format is missing 'pattern' definition",
            node.name
        ))),
        (_, Some(pattern)) => {
            // Patterns follow ECMA 262 and are written out unchecked.
            // A pattern is never written out as a string format
            Ok(StringShorthand {
                format: None,
                implied_validator: if has_validator {
                    None
                } else {
                    Some(Validator::regex(pattern))
                },
            })
        }
        // Any other format is left as is
        (other, None) => Ok(StringShorthand {
            format: other.map(str::to_string),
            implied_validator: None,
        }),
    }
}
