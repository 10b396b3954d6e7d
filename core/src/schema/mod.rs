#![deny(missing_docs)]

//! # Schema Nodes
//!
//! The input side of the converter: a typed, validator-annotated tree that
//! describes a request or response payload.
//!
//! Nodes are plain data. They can be built in code through the builder methods
//! on [`SchemaNode`] or deserialized from a YAML/JSON service manifest:
//!
//! ```yaml
//! name: body
//! type: mapping
//! type_name: BodySchema
//! children:
//!   - { name: id, type: string }
//!   - { name: level, type: integer, validator: { kind: range, min: 1, max: 9 } }
//! ```
//!
//! The converter never mutates a node. Values it derives (titles for body
//! parameters, synthesized array titles) are passed alongside the node instead.

pub mod validators;

pub use validators::Validator;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// The declared type of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum SchemaKind {
    /// `true` / `false`.
    Boolean,
    /// Free-form text, optionally refined by `format` / `pattern`.
    String,
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Number,
    /// Calendar date (`format: date`).
    Date,
    /// Timestamp (`format: date-time`).
    DateTime,
    /// Time of day (`format: time`).
    Time,
    /// Named properties (JSON object).
    Mapping,
    /// Homogeneous list (JSON array) with exactly one item node.
    Sequence,
    /// Any other type, resolved through a custom converter.
    Custom(String),
}

impl SchemaKind {
    /// The name used to look up custom converters for this kind.
    pub fn name(&self) -> &str {
        match self {
            SchemaKind::Boolean => "boolean",
            SchemaKind::String => "string",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::Date => "date",
            SchemaKind::DateTime => "datetime",
            SchemaKind::Time => "time",
            SchemaKind::Mapping => "mapping",
            SchemaKind::Sequence => "sequence",
            SchemaKind::Custom(name) => name,
        }
    }
}

impl From<String> for SchemaKind {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => SchemaKind::Boolean,
            "string" | "str" => SchemaKind::String,
            "integer" | "int" => SchemaKind::Integer,
            "number" | "float" | "decimal" => SchemaKind::Number,
            "date" => SchemaKind::Date,
            "datetime" | "date-time" => SchemaKind::DateTime,
            "time" => SchemaKind::Time,
            "mapping" | "object" => SchemaKind::Mapping,
            "sequence" | "array" => SchemaKind::Sequence,
            _ => SchemaKind::Custom(raw),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a mapping treats properties it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Unknown properties are silently dropped.
    #[default]
    Ignore,
    /// Unknown properties are rejected.
    Raise,
    /// Unknown properties are kept (`additionalProperties: {}`).
    Preserve,
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaNode {
    /// Property key or parameter name. Empty for anonymous nodes.
    #[serde(default)]
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    /// Name of the declared schema type (e.g. `BodySchema`).
    #[serde(default)]
    pub type_name: Option<String>,
    /// Explicit display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default value. `Some(Value::Null)` is an explicit `null` default.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub default: Option<Value>,
    /// Example value, only emitted when explicitly set.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub example: Option<Value>,
    /// Whether the value must be present.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Ordered children (properties of a mapping, the item of a sequence).
    #[serde(default)]
    pub children: Vec<SchemaNode>,
    /// Attached validator.
    #[serde(default)]
    pub validator: Option<Validator>,
    /// Shorthand string format hint (e.g. `email`, `uuid`).
    #[serde(default)]
    pub format: Option<String>,
    /// Shorthand string pattern hint.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Unknown property policy for mappings.
    #[serde(default)]
    pub unknown: UnknownPolicy,
}

fn default_required() -> bool {
    true
}

/// Distinguishes an explicit `null` from an absent key.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SchemaNode {
    /// Creates an anonymous, required node of the given kind.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            name: String::new(),
            kind,
            type_name: None,
            title: None,
            description: None,
            default: None,
            example: None,
            required: true,
            children: Vec::new(),
            validator: None,
            format: None,
            pattern: None,
            unknown: UnknownPolicy::default(),
        }
    }

    /// A string node.
    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    /// An integer node.
    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer)
    }

    /// A floating point node.
    pub fn number() -> Self {
        Self::new(SchemaKind::Number)
    }

    /// A boolean node.
    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    /// A date node.
    pub fn date() -> Self {
        Self::new(SchemaKind::Date)
    }

    /// A date-time node.
    pub fn datetime() -> Self {
        Self::new(SchemaKind::DateTime)
    }

    /// A time node.
    pub fn time() -> Self {
        Self::new(SchemaKind::Time)
    }

    /// A mapping with the given ordered properties.
    pub fn mapping(children: Vec<SchemaNode>) -> Self {
        let mut node = Self::new(SchemaKind::Mapping);
        node.children = children;
        node
    }

    /// A sequence whose items are described by `item`.
    pub fn sequence(item: SchemaNode) -> Self {
        let mut node = Self::new(SchemaKind::Sequence);
        node.children = vec![item];
        node
    }

    /// Sets the node name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the declared schema type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets an explicit title.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the example value.
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Marks the node as optional (may be dropped).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attaches a validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the shorthand string format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the shorthand string pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Accepts undeclared properties.
    pub fn preserve_unknown(mut self) -> Self {
        self.unknown = UnknownPolicy::Preserve;
        self
    }

    /// Appends a child node.
    pub fn push(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    /// Finds a direct child by name.
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// The title shown in documentation.
    ///
    /// An explicit title wins; otherwise the name is turned into a title
    /// (`my_precious` becomes `My Precious`). Anonymous untitled nodes have none.
    pub fn display_title(&self) -> Option<String> {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return Some(title.to_string());
        }
        if self.name.is_empty() {
            return None;
        }
        Some(title_case(&self.name.replace('_', " ")))
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub(crate) fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_boundary = true;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }
    out
}
