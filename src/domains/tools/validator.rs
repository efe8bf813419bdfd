//! Argument validation against a [`Schema`].
//!
//! Validation walks the schema and the raw value together and stops at the
//! first failure. On success it yields a [`ValidatedInput`]: a normalized copy
//! of the arguments with defaults applied and undeclared fields dropped.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::{Presence, Schema, join_path};

/// The first mismatch found between a value and its schema.
///
/// `field` is a dotted path from the root (`location.lat`, `items[2]`); the
/// root itself is reported as `arguments`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("missing required field '{field}' (expected {expected})")]
    Missing { field: String, expected: String },

    #[error("invalid value for '{field}': expected {expected}")]
    Invalid { field: String, expected: String },
}

impl ValidationFailure {
    fn missing(path: &str, schema: &Schema) -> Self {
        Self::Missing {
            field: display_path(path),
            expected: schema.expected(),
        }
    }

    fn invalid(path: &str, schema: &Schema) -> Self {
        Self::Invalid {
            field: display_path(path),
            expected: schema.expected(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field, .. } | Self::Invalid { field, .. } => field,
        }
    }

    pub fn expected(&self) -> &str {
        match self {
            Self::Missing { expected, .. } | Self::Invalid { expected, .. } => expected,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "arguments".to_string()
    } else {
        path.to_string()
    }
}

/// Arguments that passed validation against a tool's input schema.
///
/// Only [`validate`] constructs this type, so a handler holding one never sees
/// unchecked input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput(Value);

impl ValidatedInput {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Deserialize the normalized arguments into a typed parameter struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }
}

/// Validate `raw` against `schema`.
///
/// Explicit `null` is treated as an absent field. Numbers match `integer`
/// schemas when they carry no fractional part, so `7.0` is accepted as `7`.
pub fn validate(schema: &Schema, raw: &Value) -> Result<ValidatedInput, ValidationFailure> {
    check_value(schema, raw, "").map(ValidatedInput)
}

/// Floats in `[I64_LOWER, I64_UPPER)` convert to `i64` without saturating.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn check_value(schema: &Schema, raw: &Value, path: &str) -> Result<Value, ValidationFailure> {
    match schema {
        Schema::String(s) => {
            let text = raw
                .as_str()
                .ok_or_else(|| ValidationFailure::invalid(path, schema))?;
            if let Some(min) = s.min_length {
                if text.chars().count() < min {
                    return Err(ValidationFailure::invalid(path, schema));
                }
            }
            Ok(raw.clone())
        }
        Schema::Number(s) => {
            let n = raw
                .as_f64()
                .filter(|n| n.is_finite())
                .ok_or_else(|| ValidationFailure::invalid(path, schema))?;
            let out_of_range = s.min.is_some_and(|min| n < min) || s.max.is_some_and(|max| n > max);
            if out_of_range || (s.integer && n.fract() != 0.0) {
                return Err(ValidationFailure::invalid(path, schema));
            }
            if s.integer && !(raw.is_i64() || raw.is_u64()) {
                // 16.0 becomes 16 so typed integer parameters deserialize.
                if !(I64_LOWER..I64_UPPER).contains(&n) {
                    return Err(ValidationFailure::invalid(path, schema));
                }
                return Ok(Value::from(n as i64));
            }
            Ok(raw.clone())
        }
        Schema::Boolean(_) => match raw {
            Value::Bool(_) => Ok(raw.clone()),
            _ => Err(ValidationFailure::invalid(path, schema)),
        },
        Schema::Enum(s) => match raw.as_str() {
            Some(choice) if s.choices.iter().any(|c| c == choice) => Ok(raw.clone()),
            _ => Err(ValidationFailure::invalid(path, schema)),
        },
        Schema::Object(s) => {
            let map = raw
                .as_object()
                .ok_or_else(|| ValidationFailure::invalid(path, schema))?;
            let mut normalized = Map::new();
            for field in &s.fields {
                let field_path = join_path(path, &field.name);
                match map.get(&field.name).filter(|v| !v.is_null()) {
                    Some(value) => {
                        let checked = check_value(&field.schema, value, &field_path)?;
                        normalized.insert(field.name.clone(), checked);
                    }
                    None => match &field.presence {
                        Presence::Required => {
                            return Err(ValidationFailure::missing(&field_path, &field.schema));
                        }
                        Presence::Optional {
                            default: Some(default),
                        } => {
                            normalized.insert(field.name.clone(), default.clone());
                        }
                        Presence::Optional { default: None } => {}
                    },
                }
            }
            Ok(Value::Object(normalized))
        }
        Schema::Array(s) => {
            let items = raw
                .as_array()
                .ok_or_else(|| ValidationFailure::invalid(path, schema))?;
            if s.min_items.is_some_and(|min| items.len() < min) {
                return Err(ValidationFailure::invalid(path, schema));
            }
            items
                .iter()
                .enumerate()
                .map(|(i, item)| check_value(&s.element, item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}
