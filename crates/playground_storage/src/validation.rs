//! Structural validation of hand-edited configuration JSON.
//!
//! The expected shape is a small declarative schema walked once per document. Each object is
//! checked in two phases: every present field's own kind first, then the contents of nested
//! objects and record arrays. The first violation ends the walk.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{deserialize_config, MessageConfig, SerializedMessageConfig};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// First structural problem found in a configuration document.
pub enum SchemaViolation {
    /// The text is not JSON; carries the parser's message.
    #[error("{0}")]
    Syntax(String),
    /// The document root is not a JSON object.
    #[error("Configuration must be a JSON object")]
    NotAnObject,
    /// A field holds the wrong kind of value.
    #[error("Field '{path}' must be {expected}")]
    WrongKind {
        /// Dotted field path.
        path: String,
        /// Human-readable expected kind.
        expected: &'static str,
    },
    /// A URL field holds something that is not an absolute URL.
    #[error("Field '{path}' must be a valid URL")]
    InvalidUrl {
        /// Dotted field path.
        path: String,
    },
    /// A directory record lacks a non-empty `id` or `name`.
    #[error("{label} at index {index} must have a non-empty '{field}' field")]
    MissingRecordField {
        /// Dotted path of the collection.
        path: String,
        /// Display label of one record, for example `User`.
        label: &'static str,
        /// Position of the offending record.
        index: usize,
        /// Missing or empty field.
        field: &'static str,
    },
    /// The document passed the structural checks but does not decode into a configuration.
    #[error("{0}")]
    Shape(String),
}

impl SchemaViolation {
    /// Dotted path of the offending field, when the violation is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::WrongKind { path, .. }
            | Self::InvalidUrl { path }
            | Self::MissingRecordField { path, .. } => Some(path),
            Self::Syntax(_) | Self::NotAnObject | Self::Shape(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Outcome of [`validate_config_json`], shaped for display next to the editor.
pub struct ValidationReport {
    /// `true` when every present field passed.
    pub valid: bool,
    /// Message describing the first violation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<&Result<T, SchemaViolation>> for ValidationReport {
    fn from(result: &Result<T, SchemaViolation>) -> Self {
        match result {
            Ok(_) => Self {
                valid: true,
                error: None,
            },
            Err(violation) => Self {
                valid: false,
                error: Some(violation.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
    OptionalOrNull,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    String,
    Url,
    Timestamp,
    Boolean,
    Object(&'static [FieldRule]),
    Records { label: &'static str },
}

impl Kind {
    fn expected(self) -> &'static str {
        match self {
            Self::String | Self::Url => "a string",
            Self::Timestamp => "a string (ISO date) or null",
            Self::Boolean => "a boolean",
            Self::Object(_) => "an object",
            Self::Records { .. } => "an array",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FieldRule {
    name: &'static str,
    presence: Presence,
    kind: Kind,
}

const fn field(name: &'static str, presence: Presence, kind: Kind) -> FieldRule {
    FieldRule {
        name,
        presence,
        kind,
    }
}

const RECORD_FIELDS: [&str; 2] = ["id", "name"];

const DATA_SCHEMA: &[FieldRule] = &[
    field("users", Presence::Optional, Kind::Records { label: "User" }),
    field("channels", Presence::Optional, Kind::Records { label: "Channel" }),
    field(
        "user_groups",
        Presence::Optional,
        Kind::Records {
            label: "User group",
        },
    ),
];

const CONFIG_SCHEMA: &[FieldRule] = &[
    field("name", Presence::Required, Kind::String),
    field("logo", Presence::Optional, Kind::Url),
    field("time", Presence::OptionalOrNull, Kind::Timestamp),
    field("showBlockKitDebug", Presence::Optional, Kind::Boolean),
    field("unstyled", Presence::Optional, Kind::Boolean),
    field("withoutWrapper", Presence::Optional, Kind::Boolean),
    field("enableCustomUserHook", Presence::Optional, Kind::Boolean),
    field("data", Presence::OptionalOrNull, Kind::Object(DATA_SCHEMA)),
];

/// Returns `true` for an empty string or an absolute URL.
pub fn is_valid_url(raw: &str) -> bool {
    raw.is_empty() || url::Url::parse(raw).is_ok()
}

fn wrong_kind(path: &str, kind: Kind) -> SchemaViolation {
    SchemaViolation::WrongKind {
        path: path.to_string(),
        expected: kind.expected(),
    }
}

fn check_own_kind(value: &Value, kind: Kind, path: &str) -> Result<(), SchemaViolation> {
    let matches = match kind {
        Kind::String | Kind::Timestamp => value.is_string(),
        Kind::Url => {
            let Some(raw) = value.as_str() else {
                return Err(wrong_kind(path, kind));
            };
            if !is_valid_url(raw) {
                return Err(SchemaViolation::InvalidUrl {
                    path: path.to_string(),
                });
            }
            true
        }
        Kind::Boolean => value.is_boolean(),
        Kind::Object(_) => value.is_object(),
        Kind::Records { .. } => value.is_array(),
    };
    if matches {
        Ok(())
    } else {
        Err(wrong_kind(path, kind))
    }
}

fn has_non_empty_string(record: &Value, field: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| !value.is_empty())
}

fn check_contents(value: &Value, kind: Kind, path: &str) -> Result<(), SchemaViolation> {
    match (kind, value) {
        (Kind::Object(rules), Value::Object(object)) => walk(object, rules, path),
        (Kind::Records { label }, Value::Array(records)) => {
            for (index, record) in records.iter().enumerate() {
                if let Some(field) = RECORD_FIELDS
                    .into_iter()
                    .find(|field| !has_non_empty_string(record, field))
                {
                    return Err(SchemaViolation::MissingRecordField {
                        path: path.to_string(),
                        label,
                        index,
                        field,
                    });
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn walk(
    object: &Map<String, Value>,
    rules: &[FieldRule],
    prefix: &str,
) -> Result<(), SchemaViolation> {
    let mut present = Vec::with_capacity(rules.len());
    for rule in rules {
        let path = if prefix.is_empty() {
            rule.name.to_string()
        } else {
            format!("{prefix}.{}", rule.name)
        };
        let value = match (object.get(rule.name), rule.presence) {
            (None, Presence::Required) => return Err(wrong_kind(&path, rule.kind)),
            (None, _) | (Some(Value::Null), Presence::OptionalOrNull) => continue,
            (Some(value), _) => value,
        };
        check_own_kind(value, rule.kind, &path)?;
        present.push((rule.kind, value, path));
    }
    for (kind, value, path) in present {
        check_contents(value, kind, &path)?;
    }
    Ok(())
}

/// Parses `text` and checks it against the configuration schema.
///
/// # Errors
///
/// Returns the syntax error or the first structural violation.
pub fn check_config_json(text: &str) -> Result<Value, SchemaViolation> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| SchemaViolation::Syntax(err.to_string()))?;
    let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;
    walk(object, CONFIG_SCHEMA, "")?;
    Ok(value)
}

/// Validates hand-edited configuration JSON.
pub fn validate_config_json(text: &str) -> ValidationReport {
    ValidationReport::from(&check_config_json(text))
}

/// Validates `text` and decodes it into an in-memory configuration.
///
/// # Errors
///
/// Returns [`SchemaViolation::Shape`] when a structurally valid document still does not decode,
/// for example an unknown `theme`.
pub fn parse_config_json(text: &str) -> Result<MessageConfig, SchemaViolation> {
    let value = check_config_json(text)?;
    let serialized: SerializedMessageConfig =
        serde_json::from_value(value).map_err(|err| SchemaViolation::Shape(err.to_string()))?;
    Ok(deserialize_config(serialized))
}
