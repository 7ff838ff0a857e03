use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::entities::option_fields::OptionField;
use crate::errors::{ErrorCode, FieldError, SchemaValidationError};

/// Pulls typed fields out of an untrusted JSON object one at a time,
/// recording a [`FieldError`] per missing or mistyped field instead of
/// stopping at the first one.
pub struct FieldReader<'a> {
    schema: &'static str,
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(schema: &'static str, value: &'a Value) -> Result<Self, SchemaValidationError> {
        match value.as_object() {
            Some(object) => Ok(FieldReader {
                schema,
                object,
                errors: Vec::new(),
            }),
            None => Err(SchemaValidationError::malformed(
                schema,
                format!("Expected a JSON object, found {}", json_kind(value)),
            )),
        }
    }

    /// Absent or `null` is reported as `required`.
    pub fn required<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        match self.object.get(field) {
            None | Some(Value::Null) => {
                self.errors.push(FieldError::required(field));
                None
            }
            Some(value) => self.parse(field, value),
        }
    }

    /// Absent or `null` yields `None`.
    pub fn optional<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        match self.object.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.parse(field, value),
        }
    }

    /// Absent yields `default()`; a present value, `null` included, must parse as `T`.
    pub fn defaulted<T, F>(&mut self, field: &str, default: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.object.get(field) {
            None => Some(default()),
            Some(value) => self.parse(field, value),
        }
    }

    /// Tri-state read: absent → `Unchanged`, `null` → `SetToNull`.
    pub fn patch<T: DeserializeOwned>(&mut self, field: &str) -> OptionField<T> {
        match self.object.get(field) {
            None => OptionField::Unchanged,
            Some(Value::Null) => OptionField::SetToNull,
            Some(value) => match self.parse(field, value) {
                Some(v) => OptionField::SetToValue(v),
                None => OptionField::Unchanged,
            },
        }
    }

    pub fn into_error(self) -> SchemaValidationError {
        SchemaValidationError::new(self.schema, self.errors)
    }

    pub fn finish(self) -> Result<(), SchemaValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    fn parse<T: DeserializeOwned>(&mut self, field: &str, value: &Value) -> Option<T> {
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(FieldError::new(field, ErrorCode::InvalidType, e.to_string()));
                None
            }
        }
    }
}

/// Keys of `value` that are not listed in `known`, as `unknown_field` errors.
pub fn unknown_fields(value: &Value, known: &[&str]) -> Vec<FieldError> {
    value
        .as_object()
        .map(|object| {
            object
                .keys()
                .filter(|key| !known.contains(&key.as_str()))
                .map(|key| FieldError::new(key.as_str(), ErrorCode::UnknownField, "Unknown field"))
                .collect()
        })
        .unwrap_or_default()
}

/// Parses a raw request body into a JSON value.
pub fn parse_body(schema: &'static str, raw: &str) -> Result<Value, SchemaValidationError> {
    serde_json::from_str(raw)
        .map_err(|e| SchemaValidationError::malformed(schema, format!("Invalid JSON: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
