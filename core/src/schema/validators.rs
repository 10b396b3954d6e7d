#![deny(missing_docs)]

//! # Validators
//!
//! Validator descriptions attached to schema nodes. Only the parameters that
//! matter for documentation are kept; the runtime checks themselves belong to
//! the validation library.

use serde::Deserialize;
use serde_json::{Number, Value};

/// Pattern of the built-in e-mail validator.
pub const EMAIL_PATTERN: &str =
    r"(?i)^[A-Z0-9._%!#$%&'*+\-/=?^_`{|}~()]+@[A-Z0-9._\-]+\.[A-Z]{2,}$";

/// Pattern of the built-in URL validator.
pub const URL_PATTERN: &str = r"(?i)^(?:https?|ftp)://[^\s/$.?#].[^\s]*$";

/// Pattern of the built-in UUID validator.
pub const UUID_PATTERN: &str =
    r"^(?:urn:uuid:)?\{?[a-f0-9]{8}(?:-?[a-f0-9]{4}){3}-?[a-f0-9]{12}\}?$";

/// Pattern of the built-in file URI validator.
pub const FILE_URI_PATTERN: &str = r"^file://(?:[^/?#\s]*)(?:/[^?#\s]*)$";

/// A validator attached to a [`SchemaNode`](super::SchemaNode).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// Bounds on string length or item count.
    Length {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<u64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<u64>,
    },
    /// Bounds on a numeric value.
    Range {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<Number>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<Number>,
    },
    /// Value must be one of `choices`.
    OneOf {
        /// Accepted values, in declaration order.
        choices: Vec<Value>,
    },
    /// Value must match a regular expression.
    Regex {
        /// Raw pattern source.
        pattern: String,
    },
    /// Built-in e-mail address validator.
    Email,
    /// Built-in URL validator.
    Url,
    /// Built-in UUID validator.
    Uuid,
    /// Built-in file URI validator.
    FileUri,
    /// Every sub-validator must pass.
    All {
        /// Sub-validators, in order.
        validators: Vec<Validator>,
    },
    /// A validator the documentation layer knows nothing about.
    #[serde(other)]
    Unrecognized,
}

impl Validator {
    /// Shorthand for a [`Validator::Length`].
    pub fn length(min: Option<u64>, max: Option<u64>) -> Self {
        Validator::Length { min, max }
    }

    /// Shorthand for a [`Validator::Range`].
    pub fn range(min: Option<impl Into<Number>>, max: Option<impl Into<Number>>) -> Self {
        Validator::Range {
            min: min.map(Into::into),
            max: max.map(Into::into),
        }
    }

    /// Shorthand for a [`Validator::OneOf`].
    pub fn one_of<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Validator::OneOf {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Shorthand for a [`Validator::Regex`].
    pub fn regex(pattern: impl Into<String>) -> Self {
        Validator::Regex {
            pattern: pattern.into(),
        }
    }

    /// Shorthand for a [`Validator::All`].
    pub fn all(validators: Vec<Validator>) -> Self {
        Validator::All { validators }
    }

    /// The regular expression behind a regex-like validator.
    ///
    /// `None` for validators that are not regex based.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Validator::Regex { pattern } => Some(pattern),
            Validator::Email => Some(EMAIL_PATTERN),
            Validator::Url => Some(URL_PATTERN),
            Validator::Uuid => Some(UUID_PATTERN),
            Validator::FileUri => Some(FILE_URI_PATTERN),
            _ => None,
        }
    }
}
