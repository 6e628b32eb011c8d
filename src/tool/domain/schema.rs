//! Declarative input schemas and the validator that gates handler execution.
//!
//! A schema maps field names to [`FieldSchema`] constraints. Validation
//! collects every violation rather than stopping at the first one, so callers
//! see all offending fields in a single response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::fmt;

use super::SchemaDefinitionError;

/// How a schema treats argument keys it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Undeclared keys are dropped from the validated arguments.
    #[default]
    Strip,
    /// Undeclared keys are reported as violations.
    Reject,
    /// Undeclared keys are copied through untouched.
    Passthrough,
}

/// Value kind accepted by a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part.
    Integer,
    /// JSON boolean.
    Boolean,
    /// String drawn from a closed set of options.
    Enum(Vec<String>),
    /// Homogeneous JSON array.
    Array(Box<FieldSchema>),
    /// Nested object with its own schema.
    Object(InputSchema),
}

impl FieldKind {
    const fn expected(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// Constraint descriptor for a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    kind: FieldKind,
    description: Option<String>,
    optional: bool,
    default: Option<Value>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl FieldSchema {
    const fn of_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            description: None,
            optional: false,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    /// A required string field.
    #[must_use]
    pub const fn string() -> Self {
        Self::of_kind(FieldKind::String)
    }

    /// A required numeric field.
    #[must_use]
    pub const fn number() -> Self {
        Self::of_kind(FieldKind::Number)
    }

    /// A required integral numeric field.
    #[must_use]
    pub const fn integer() -> Self {
        Self::of_kind(FieldKind::Integer)
    }

    /// A required boolean field.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::of_kind(FieldKind::Boolean)
    }

    /// A required string field restricted to `options`.
    #[must_use]
    pub fn enumeration(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::of_kind(FieldKind::Enum(options.into_iter().map(Into::into).collect()))
    }

    /// A required array whose elements satisfy `item`.
    #[must_use]
    pub fn array(item: Self) -> Self {
        Self::of_kind(FieldKind::Array(Box::new(item)))
    }

    /// A required nested object validated by `schema`.
    #[must_use]
    pub const fn object(schema: InputSchema) -> Self {
        Self::of_kind(FieldKind::Object(schema))
    }

    /// Attaches a human-readable description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the field as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Supplies a value used when the field is absent.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets an inclusive lower bound for numeric fields.
    #[must_use]
    pub const fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets an inclusive upper bound for numeric fields.
    #[must_use]
    pub const fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Returns the field kind.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns whether the field may be omitted.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }

    fn to_json_schema(&self) -> Value {
        let mut rendered = match &self.kind {
            FieldKind::String => json!({"type": "string"}),
            FieldKind::Number => json!({"type": "number"}),
            FieldKind::Integer => json!({"type": "integer"}),
            FieldKind::Boolean => json!({"type": "boolean"}),
            FieldKind::Enum(options) => json!({"type": "string", "enum": options}),
            FieldKind::Array(item) => json!({"type": "array", "items": item.to_json_schema()}),
            FieldKind::Object(schema) => schema.to_json_schema(),
        };
        if let Value::Object(object) = &mut rendered {
            if let Some(minimum) = self.minimum {
                object.insert("minimum".to_owned(), json!(minimum));
            }
            if let Some(maximum) = self.maximum {
                object.insert("maximum".to_owned(), json!(maximum));
            }
            if let Some(default) = &self.default {
                object.insert("default".to_owned(), default.clone());
            }
            if let Some(description) = &self.description {
                object.insert(
                    "description".to_owned(),
                    Value::String(description.clone()),
                );
            }
        }
        rendered
    }

    fn check_definition(&self, path: &str) -> Result<(), SchemaDefinitionError> {
        let is_numeric = matches!(self.kind, FieldKind::Number | FieldKind::Integer);
        if !is_numeric && (self.minimum.is_some() || self.maximum.is_some()) {
            return Err(SchemaDefinitionError::BoundsOnNonNumericField(
                path.to_owned(),
            ));
        }
        if let (Some(minimum), Some(maximum)) = (self.minimum, self.maximum)
            && minimum > maximum
        {
            return Err(SchemaDefinitionError::InvertedBounds(path.to_owned()));
        }

        match &self.kind {
            FieldKind::Enum(options) if options.is_empty() => {
                return Err(SchemaDefinitionError::EmptyEnum(path.to_owned()));
            }
            FieldKind::Array(item) => item.check_definition(&format!("{path}[]"))?,
            FieldKind::Object(schema) => schema.check_definition_at(Some(path))?,
            _ => {}
        }

        if let Some(default) = &self.default {
            let mut violations = Vec::new();
            let mut segments = vec![path.to_owned()];
            if self
                .check_value(default, &mut segments, &mut violations)
                .is_none()
                || !violations.is_empty()
            {
                return Err(SchemaDefinitionError::InvalidDefault(path.to_owned()));
            }
        }
        Ok(())
    }

    fn check_value(
        &self,
        value: &Value,
        path: &mut Vec<String>,
        violations: &mut Vec<SchemaViolation>,
    ) -> Option<Value> {
        match &self.kind {
            FieldKind::String => {
                if value.is_string() {
                    Some(value.clone())
                } else {
                    violations.push(type_mismatch(path, &self.kind, value));
                    None
                }
            }
            FieldKind::Boolean => {
                if value.is_boolean() {
                    Some(value.clone())
                } else {
                    violations.push(type_mismatch(path, &self.kind, value));
                    None
                }
            }
            FieldKind::Number | FieldKind::Integer => self.check_number(value, path, violations),
            FieldKind::Enum(options) => check_enum(options, value, path, violations),
            FieldKind::Array(item) => {
                let Some(elements) = value.as_array() else {
                    violations.push(type_mismatch(path, &self.kind, value));
                    return None;
                };
                let mut accepted = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    path.push(index.to_string());
                    if let Some(checked) = item.check_value(element, path, violations) {
                        accepted.push(checked);
                    }
                    path.pop();
                }
                Some(Value::Array(accepted))
            }
            FieldKind::Object(schema) => {
                let Some(object) = value.as_object() else {
                    violations.push(type_mismatch(path, &self.kind, value));
                    return None;
                };
                Some(Value::Object(schema.check_object(object, path, violations)))
            }
        }
    }

    fn check_number(
        &self,
        value: &Value,
        path: &[String],
        violations: &mut Vec<SchemaViolation>,
    ) -> Option<Value> {
        let Some(number) = value.as_f64() else {
            violations.push(type_mismatch(path, &FieldKind::Number, value));
            return None;
        };
        let mut accepted = true;
        let mut integral = None;
        if matches!(self.kind, FieldKind::Integer) {
            if value.is_i64() || value.is_u64() || number.fract() == 0.0 {
                integral = integral_value(value, number);
                if integral.is_none() {
                    let message = if number < 0.0 {
                        format!("Number must be greater than or equal to {}", i64::MIN)
                    } else {
                        format!("Number must be less than or equal to {}", i64::MAX)
                    };
                    violations.push(SchemaViolation::new(path.to_vec(), message));
                    accepted = false;
                }
            } else {
                violations.push(SchemaViolation::new(
                    path.to_vec(),
                    "Expected integer, received float",
                ));
                accepted = false;
            }
        }
        if let Some(minimum) = self.minimum
            && number < minimum
        {
            violations.push(SchemaViolation::new(
                path.to_vec(),
                format!(
                    "Number must be greater than or equal to {}",
                    format_bound(minimum)
                ),
            ));
            accepted = false;
        }
        if let Some(maximum) = self.maximum
            && number > maximum
        {
            violations.push(SchemaViolation::new(
                path.to_vec(),
                format!(
                    "Number must be less than or equal to {}",
                    format_bound(maximum)
                ),
            ));
            accepted = false;
        }
        if !accepted {
            return None;
        }
        Some(integral.map_or_else(|| value.clone(), Value::from))
    }
}

/// Reads an integral JSON number as `i64`, if it fits.
fn integral_value(value: &Value, number: f64) -> Option<i64> {
    if value.is_f64() {
        number.to_string().parse().ok()
    } else {
        value.as_i64()
    }
}

fn check_enum(
    options: &[String],
    value: &Value,
    path: &[String],
    violations: &mut Vec<SchemaViolation>,
) -> Option<Value> {
    let expected = options
        .iter()
        .map(|option| format!("'{option}'"))
        .collect::<Vec<_>>()
        .join(" | ");
    match value.as_str() {
        Some(received) if options.iter().any(|option| option == received) => Some(value.clone()),
        Some(received) => {
            violations.push(SchemaViolation::new(
                path.to_vec(),
                format!("Invalid enum value. Expected {expected}, received '{received}'"),
            ));
            None
        }
        None => {
            violations.push(SchemaViolation::new(
                path.to_vec(),
                format!("Expected {expected}, received {}", json_type_name(value)),
            ));
            None
        }
    }
}

fn type_mismatch(path: &[String], kind: &FieldKind, value: &Value) -> SchemaViolation {
    SchemaViolation::new(
        path.to_vec(),
        format!(
            "Expected {}, received {}",
            kind.expected(),
            json_type_name(value)
        ),
    )
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 9_007_199_254_740_992.0 {
        format!("{bound:.0}")
    } else {
        bound.to_string()
    }
}

/// Ordered mapping from field name to constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<(String, FieldSchema)>,
    unknown_fields: UnknownFieldPolicy,
}

impl InputSchema {
    /// Creates a schema with no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field constraint.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.push((name.into(), schema));
        self
    }

    /// Sets the policy for undeclared keys.
    #[must_use]
    pub const fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Returns declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the schema declares no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks that the schema itself is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDefinitionError`] for duplicate or empty field names,
    /// empty enums, misplaced or inverted bounds, and defaults that violate
    /// their own field.
    pub fn check_definition(&self) -> Result<(), SchemaDefinitionError> {
        self.check_definition_at(None)
    }

    fn check_definition_at(&self, parent: Option<&str>) -> Result<(), SchemaDefinitionError> {
        let mut seen = HashSet::new();
        for (name, field) in &self.fields {
            let path = parent.map_or_else(|| name.clone(), |prefix| format!("{prefix}.{name}"));
            if name.trim().is_empty() {
                return Err(SchemaDefinitionError::EmptyFieldName(
                    parent.unwrap_or_default().to_owned(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaDefinitionError::DuplicateField(path));
            }
            field.check_definition(&path)?;
        }
        Ok(())
    }

    /// Validates a raw argument bag.
    ///
    /// A missing (`null`) bag is treated as an empty object. Every violation
    /// is collected.
    ///
    /// # Errors
    ///
    /// Returns the list of [`SchemaViolation`]s when any field fails its
    /// constraint.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedArgs, Vec<SchemaViolation>> {
        let empty = Map::new();
        let object = match raw {
            Value::Null => &empty,
            Value::Object(object) => object,
            other => {
                return Err(vec![SchemaViolation::new(
                    Vec::new(),
                    format!("Expected object, received {}", json_type_name(other)),
                )]);
            }
        };

        let mut violations = Vec::new();
        let mut path = Vec::new();
        let checked = self.check_object(object, &mut path, &mut violations);
        if violations.is_empty() {
            Ok(ValidatedArgs(checked))
        } else {
            Err(violations)
        }
    }

    fn check_object(
        &self,
        object: &Map<String, Value>,
        path: &mut Vec<String>,
        violations: &mut Vec<SchemaViolation>,
    ) -> Map<String, Value> {
        let mut checked = Map::new();
        for (name, field) in &self.fields {
            path.push(name.clone());
            match object.get(name) {
                None | Some(Value::Null) => {
                    if let Some(default) = &field.default {
                        checked.insert(name.clone(), default.clone());
                    } else if !field.optional {
                        violations.push(SchemaViolation::new(path.clone(), "Required"));
                    }
                }
                Some(value) => {
                    if let Some(accepted) = field.check_value(value, path, violations) {
                        checked.insert(name.clone(), accepted);
                    }
                }
            }
            path.pop();
        }

        for (key, value) in object {
            if self.fields.iter().any(|(name, _)| name == key) {
                continue;
            }
            match self.unknown_fields {
                UnknownFieldPolicy::Strip => {}
                UnknownFieldPolicy::Passthrough => {
                    checked.insert(key.clone(), value.clone());
                }
                UnknownFieldPolicy::Reject => violations.push(SchemaViolation::new(
                    path.clone(),
                    format!("Unrecognized key '{key}'"),
                )),
            }
        }
        checked
    }

    /// Renders the schema as a JSON Schema object for tool discovery.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, field)| !field.is_optional())
            .map(|(name, _)| name.as_str())
            .collect();

        let mut rendered = json!({"type": "object", "properties": properties});
        if let Value::Object(object) = &mut rendered {
            if !required.is_empty() {
                object.insert("required".to_owned(), json!(required));
            }
            if self.unknown_fields == UnknownFieldPolicy::Reject {
                object.insert("additionalProperties".to_owned(), Value::Bool(false));
            }
        }
        rendered
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// Path segments from the argument root to the offending value.
    pub path: Vec<String>,
    /// Human-readable reason.
    pub message: String,
}

impl SchemaViolation {
    /// Creates a violation at `path`.
    #[must_use]
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Returns the dotted path, e.g. `uncertainties.0.description`.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            formatter.write_str(&self.message)
        } else {
            write!(formatter, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// Argument bag that has passed schema validation.
///
/// Only [`InputSchema::validate`] produces values of this type, so handlers
/// never observe unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    /// Returns a validated field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the validated fields.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Decodes the validated fields into a typed input.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the typed input disagrees with the
    /// declared schema.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0))
    }
}
