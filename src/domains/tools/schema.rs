//! Declarative value schemas.
//!
//! A [`Schema`] describes the shape of a JSON value: primitive kinds, string
//! enums, objects with required or defaulted fields, and arrays. The same
//! description drives argument validation (see [`super::validator`]) and the
//! JSON Schema advertised to clients in `tools/list`.
//!
//! Schemas are assembled with small builders:
//!
//! ```rust
//! use toolkit_mcp_server::domains::tools::Schema;
//!
//! let schema: Schema = Schema::object()
//!     .required("latitude", Schema::number().range(-90.0, 90.0))
//!     .optional_with_default("forecastDays", Schema::integer().range(1.0, 16.0), 7)
//!     .into();
//! assert!(schema.check().is_ok());
//! ```

use rmcp::model::JsonObject;
use serde_json::Value;
use std::collections::HashSet;

use super::validator::validate;

/// A recursive description of a JSON value's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Enum(EnumSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
}

/// A JSON string, optionally with a minimum length in characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub description: Option<String>,
    pub min_length: Option<usize>,
}

/// A JSON number with optional inclusive bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub description: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Only numbers without a fractional part are accepted.
    pub integer: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub description: Option<String>,
}

/// A JSON string restricted to a fixed set of literals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumSchema {
    pub description: Option<String>,
    pub choices: Vec<String>,
}

/// A JSON object with fields kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub description: Option<String>,
    pub element: Box<Schema>,
    pub min_items: Option<usize>,
}

/// A named member of an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub presence: Presence,
}

/// Whether an object field must be supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    /// Absent values take `default` when one is declared, otherwise stay absent.
    Optional { default: Option<Value> },
}

impl Schema {
    pub fn string() -> StringSchema {
        StringSchema::default()
    }

    pub fn number() -> NumberSchema {
        NumberSchema::default()
    }

    pub fn integer() -> NumberSchema {
        NumberSchema {
            integer: true,
            ..NumberSchema::default()
        }
    }

    pub fn boolean() -> BooleanSchema {
        BooleanSchema::default()
    }

    pub fn enumeration<I, S>(choices: I) -> EnumSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumSchema {
            description: None,
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    pub fn array(element: impl Into<Schema>) -> ArraySchema {
        ArraySchema {
            description: None,
            element: Box::new(element.into()),
            min_items: None,
        }
    }

    /// The human-readable description attached to this node, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            Schema::String(s) => s.description.as_deref(),
            Schema::Number(s) => s.description.as_deref(),
            Schema::Boolean(s) => s.description.as_deref(),
            Schema::Enum(s) => s.description.as_deref(),
            Schema::Object(s) => s.description.as_deref(),
            Schema::Array(s) => s.description.as_deref(),
        }
    }

    /// Describe the accepted shape, as used in validation messages.
    pub fn expected(&self) -> String {
        match self {
            Schema::String(s) => match s.min_length {
                Some(n) if n > 0 => format!("string of at least {} character(s)", n),
                _ => "string".to_string(),
            },
            Schema::Number(s) => {
                let kind = if s.integer { "integer" } else { "number" };
                match (s.min, s.max) {
                    (Some(min), Some(max)) => format!("{} between {} and {}", kind, min, max),
                    (Some(min), None) => format!("{} of at least {}", kind, min),
                    (None, Some(max)) => format!("{} of at most {}", kind, max),
                    (None, None) => kind.to_string(),
                }
            }
            Schema::Boolean(_) => "boolean".to_string(),
            Schema::Enum(s) => format!("one of: {}", s.choices.join(", ")),
            Schema::Object(_) => "object".to_string(),
            Schema::Array(s) => match s.min_items {
                Some(n) if n > 0 => {
                    format!("array of {} with at least {} item(s)", s.element.expected(), n)
                }
                _ => format!("array of {}", s.element.expected()),
            },
        }
    }

    /// Check the structural invariants of this schema.
    ///
    /// Field names within one object must be unique, enum choices must be
    /// non-empty and pairwise distinct, numeric bounds must be ordered, and
    /// every declared default must itself satisfy its field schema.
    pub fn check(&self) -> Result<(), String> {
        self.check_at("")
    }

    fn check_at(&self, path: &str) -> Result<(), String> {
        let at = |msg: String| {
            if path.is_empty() {
                msg
            } else {
                format!("{} (at '{}')", msg, path)
            }
        };

        match self {
            Schema::String(_) | Schema::Boolean(_) => Ok(()),
            Schema::Number(s) => match (s.min, s.max) {
                (Some(min), Some(max)) if min > max => {
                    Err(at(format!("minimum {} exceeds maximum {}", min, max)))
                }
                _ => Ok(()),
            },
            Schema::Enum(s) => {
                if s.choices.is_empty() {
                    return Err(at("enum declares no choices".to_string()));
                }
                let mut seen = HashSet::new();
                for choice in &s.choices {
                    if !seen.insert(choice.as_str()) {
                        return Err(at(format!("duplicate enum choice '{}'", choice)));
                    }
                }
                Ok(())
            }
            Schema::Object(s) => {
                let mut seen = HashSet::new();
                for field in &s.fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(at(format!("duplicate field '{}'", field.name)));
                    }
                    let field_path = join_path(path, &field.name);
                    field.schema.check_at(&field_path)?;
                    if let Presence::Optional {
                        default: Some(default),
                    } = &field.presence
                    {
                        validate(&field.schema, default).map_err(|failure| {
                            format!("default for '{}' is invalid: {}", field_path, failure)
                        })?;
                    }
                }
                Ok(())
            }
            Schema::Array(s) => s.element.check_at(&format!("{}[]", path)),
        }
    }

    /// Render this schema as a JSON Schema object for MCP tool listings.
    pub fn to_json_schema(&self) -> JsonObject {
        let mut out = JsonObject::new();
        match self {
            Schema::String(s) => {
                out.insert("type".into(), "string".into());
                if let Some(n) = s.min_length {
                    out.insert("minLength".into(), n.into());
                }
            }
            Schema::Number(s) => {
                let kind = if s.integer { "integer" } else { "number" };
                out.insert("type".into(), kind.into());
                if let Some(min) = s.min {
                    out.insert("minimum".into(), number_value(min));
                }
                if let Some(max) = s.max {
                    out.insert("maximum".into(), number_value(max));
                }
            }
            Schema::Boolean(_) => {
                out.insert("type".into(), "boolean".into());
            }
            Schema::Enum(s) => {
                out.insert("type".into(), "string".into());
                out.insert(
                    "enum".into(),
                    Value::Array(s.choices.iter().cloned().map(Value::String).collect()),
                );
            }
            Schema::Object(s) => {
                let mut properties = JsonObject::new();
                let mut required = Vec::new();
                for field in &s.fields {
                    let mut property = field.schema.to_json_schema();
                    match &field.presence {
                        Presence::Required => required.push(Value::String(field.name.clone())),
                        Presence::Optional {
                            default: Some(default),
                        } => {
                            property.insert("default".into(), default.clone());
                        }
                        Presence::Optional { default: None } => {}
                    }
                    properties.insert(field.name.clone(), Value::Object(property));
                }
                out.insert("type".into(), "object".into());
                out.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    out.insert("required".into(), Value::Array(required));
                }
            }
            Schema::Array(s) => {
                out.insert("type".into(), "array".into());
                out.insert("items".into(), Value::Object(s.element.to_json_schema()));
                if let Some(n) = s.min_items {
                    out.insert("minItems".into(), n.into());
                }
            }
        }
        if let Some(description) = self.description() {
            out.insert("description".into(), description.into());
        }
        out
    }
}

/// Integral bounds render as JSON integers so `integer` schemas read naturally.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

pub(super) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

impl StringSchema {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }
}

impl NumberSchema {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }
}

impl BooleanSchema {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl EnumSchema {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ObjectSchema {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field the caller must supply.
    pub fn required(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema: schema.into(),
            presence: Presence::Required,
        });
        self
    }

    /// Add a field that may be omitted and has no default.
    pub fn optional(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema: schema.into(),
            presence: Presence::Optional { default: None },
        });
        self
    }

    /// Add a field that takes `default` when omitted.
    pub fn optional_with_default(
        mut self,
        name: impl Into<String>,
        schema: impl Into<Schema>,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema: schema.into(),
            presence: Presence::Optional {
                default: Some(default.into()),
            },
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl ArraySchema {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = Some(min_items);
        self
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::String(s)
    }
}

impl From<NumberSchema> for Schema {
    fn from(s: NumberSchema) -> Self {
        Schema::Number(s)
    }
}

impl From<BooleanSchema> for Schema {
    fn from(s: BooleanSchema) -> Self {
        Schema::Boolean(s)
    }
}

impl From<EnumSchema> for Schema {
    fn from(s: EnumSchema) -> Self {
        Schema::Enum(s)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(s: ObjectSchema) -> Self {
        Schema::Object(s)
    }
}

impl From<ArraySchema> for Schema {
    fn from(s: ArraySchema) -> Self {
        Schema::Array(s)
    }
}
