use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Machine-readable reason attached to every [`FieldError`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    #[display("required")]
    Required,

    #[display("invalid_type")]
    InvalidType,

    #[display("invalid_value")]
    InvalidValue,

    #[display("unknown_field")]
    UnknownField,

    #[display("inconsistent")]
    Inconsistent,

    #[display("malformed")]
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field, or `$` for the payload as a whole.
    #[schema(examples("start_year"))]
    pub field: String,
    pub code: ErrorCode,
    #[schema(examples("expected an integer year"))]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, ErrorCode::Required, "Field is required")
    }
}

/// Raised whenever untrusted input does not satisfy a schema.
///
/// Every problem found in one payload is collected, so a client can fix all
/// of them in a single round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaValidationError {
    pub schema: &'static str,
    pub errors: Vec<FieldError>,
}

impl SchemaValidationError {
    pub fn new(schema: &'static str, errors: Vec<FieldError>) -> Self {
        SchemaValidationError { schema, errors }
    }

    pub fn single(schema: &'static str, error: FieldError) -> Self {
        Self::new(schema, vec![error])
    }

    /// Body was not valid JSON, or not a JSON object.
    pub fn malformed(schema: &'static str, message: impl Into<String>) -> Self {
        Self::single(schema, FieldError::new("$", ErrorCode::Malformed, message))
    }

    pub fn from_validation(schema: &'static str, errors: ValidationErrors) -> Self {
        let mut error: SchemaValidationError = errors.into();
        error.schema = schema;
        error
    }

    /// `Ok` when `errors` is empty, otherwise an error carrying all of them.
    pub fn ensure_empty(schema: &'static str, errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::new(schema, errors))
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    pub fn find(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.errors.iter()
            .map(|e| format!("{}:{}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} validation error: {}", self.schema, messages)
    }
}

impl std::error::Error for SchemaValidationError {}

impl ResponseError for SchemaValidationError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(ValidationErrorBody::from(self))
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<ValidationErrors> for SchemaValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = Vec::new();
        collect_validation_errors(None, &errors, &mut field_errors);
        // HashMap iteration order is unstable
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));
        SchemaValidationError::new("unknown", field_errors)
    }
}

fn collect_validation_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut Vec<FieldError>,
) {
    for (field, kind) in errors.errors() {
        // Base fields are flattened on the wire, so nested paths are not exposed.
        let name = match prefix {
            Some(p) if *field == "base" => p.to_string(),
            Some(p) => format!("{p}.{field}"),
            None if *field == "base" => String::new(),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldError {
                    field: name.clone(),
                    code: ErrorCode::InvalidValue,
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => {
                let nested = (!name.is_empty()).then_some(name.as_str());
                collect_validation_errors(nested, inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let path = format!("{name}[{index}]");
                    collect_validation_errors(Some(&path), inner, out);
                }
            }
        }
    }
}

/// JSON body returned to HTTP clients for a rejected payload.
#[derive(Debug, Serialize, ToSchema)]
#[schema(examples(json!({
    "error": "Validation failed",
    "schema": "EducationCreate",
    "details": [
        {"field": "start_year", "code": "invalid_type", "message": "expected an integer year"}
    ]
})))]
pub struct ValidationErrorBody {
    pub error: String,
    pub schema: String,
    pub details: Vec<FieldError>,
}

impl From<&SchemaValidationError> for ValidationErrorBody {
    fn from(err: &SchemaValidationError) -> Self {
        ValidationErrorBody {
            error: "Validation failed".to_string(),
            schema: err.schema.to_string(),
            details: err.errors.clone(),
        }
    }
}
