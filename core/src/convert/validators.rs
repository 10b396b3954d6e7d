#![deny(missing_docs)]

//! # Validator Conversion
//!
//! Maps validators onto Swagger constraint keywords.
//!
//! Each schema type accepts an ordered list of [`ValidatorRule`]s. The first
//! rule that recognizes a validator produces its keywords; a conjunction
//! ([`Validator::All`]) merges the keywords of all of its members in order.
//! Validators no rule recognizes contribute nothing.

use crate::convert::SchemaObject;
use crate::schema::Validator;
use serde_json::{json, Value};

/// A single validator-to-keyword mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorRule {
    /// `Length` into the given minimum/maximum keywords.
    Length {
        /// Keyword for the lower bound (`minLength` / `minItems`).
        min_key: &'static str,
        /// Keyword for the upper bound (`maxLength` / `maxItems`).
        max_key: &'static str,
    },
    /// `Range` into `minimum` / `maximum`.
    Range,
    /// `OneOf` into `enum`.
    OneOf,
    /// Regex-like validators into `pattern`, or `format` for e-mail and URL.
    Regex,
}

/// Rules for string schemas.
pub const STRING_RULES: &[ValidatorRule] = &[
    ValidatorRule::Length {
        min_key: "minLength",
        max_key: "maxLength",
    },
    ValidatorRule::Regex,
    ValidatorRule::OneOf,
];

/// Rules for integer and number schemas.
pub const NUMBER_RULES: &[ValidatorRule] = &[ValidatorRule::Range, ValidatorRule::OneOf];

/// Rules for array schemas.
pub const ARRAY_RULES: &[ValidatorRule] = &[ValidatorRule::Length {
    min_key: "minItems",
    max_key: "maxItems",
}];

impl ValidatorRule {
    /// Returns the keywords for `validator`, or `None` if this rule does not apply.
    pub fn apply(&self, validator: &Validator) -> Option<SchemaObject> {
        match (self, validator) {
            (ValidatorRule::Length { min_key, max_key }, Validator::Length { min, max }) => {
                let mut converted = SchemaObject::new();
                if let Some(max) = max {
                    converted.insert(max_key.to_string(), json!(max));
                }
                if let Some(min) = min {
                    converted.insert(min_key.to_string(), json!(min));
                }
                Some(converted)
            }
            (ValidatorRule::Range, Validator::Range { min, max }) => {
                let mut converted = SchemaObject::new();
                if let Some(max) = max {
                    converted.insert("maximum".into(), Value::Number(max.clone()));
                }
                if let Some(min) = min {
                    converted.insert("minimum".into(), Value::Number(min.clone()));
                }
                Some(converted)
            }
            (ValidatorRule::OneOf, Validator::OneOf { choices }) => {
                let mut converted = SchemaObject::new();
                converted.insert("enum".into(), Value::Array(choices.clone()));
                Some(converted)
            }
            (ValidatorRule::Regex, Validator::Email) => Some(single("format", "email")),
            (ValidatorRule::Regex, Validator::Url) => Some(single("format", "url")),
            (ValidatorRule::Regex, other) => other.pattern().map(|p| single("pattern", p)),
            _ => None,
        }
    }
}

fn single(key: &str, value: &str) -> SchemaObject {
    let mut converted = SchemaObject::new();
    converted.insert(key.to_string(), Value::String(value.to_string()));
    converted
}

/// Converts `validator` using `rules`.
///
/// Conjunctions are expanded first; otherwise the first matching rule wins.
pub fn convert_validator(validator: &Validator, rules: &[ValidatorRule]) -> SchemaObject {
    if let Validator::All { validators } = validator {
        let mut converted = SchemaObject::new();
        for sub in validators {
            // Later validators override earlier keys
            converted.extend(convert_validator(sub, rules));
        }
        return converted;
    }

    rules
        .iter()
        .find_map(|rule| rule.apply(validator))
        .unwrap_or_default()
}
