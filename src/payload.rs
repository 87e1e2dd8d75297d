//! Secret payloads as returned by the store.
//!
//! The store hands back loosely typed JSON per field. [`SecretValue`] narrows
//! that down to the three cases selection cares about.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// All fields stored under one path, ordered by field name.
pub type SecretPayload = BTreeMap<String, SecretValue>;

/// A single field value within a [`SecretPayload`].
#[derive(Debug, Clone, PartialEq)]
pub enum SecretValue {
    String(String),
    Null,
    /// Anything that is not a plain string: numbers, booleans, arrays, objects.
    Other(Value),
}

impl SecretValue {
    /// Human-readable shape of the value, used in type-mismatch errors.
    pub fn kind(&self) -> ValueKind {
        match self {
            SecretValue::String(_) => ValueKind::String,
            SecretValue::Null => ValueKind::Null,
            SecretValue::Other(Value::Bool(_)) => ValueKind::Boolean,
            SecretValue::Other(Value::Number(_)) => ValueKind::Number,
            SecretValue::Other(Value::Array(_)) => ValueKind::Array,
            SecretValue::Other(Value::Object(_)) => ValueKind::Object,
            // Other is never built from a string or null
            SecretValue::Other(Value::String(_)) => ValueKind::String,
            SecretValue::Other(Value::Null) => ValueKind::Null,
        }
    }
}

impl From<Value> for SecretValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => SecretValue::String(s),
            Value::Null => SecretValue::Null,
            other => SecretValue::Other(other),
        }
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        SecretValue::String(value.to_string())
    }
}

/// Shape of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Null,
    Boolean,
    Number,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Converts a JSON object into a payload. Non-object input yields an empty payload.
pub fn payload_from_json(data: Value) -> SecretPayload {
    match data {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, SecretValue::from(v)))
            .collect(),
        _ => SecretPayload::new(),
    }
}
