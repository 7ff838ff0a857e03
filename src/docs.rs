use once_cell::sync::Lazy;
use serde_json::Value;
use utoipa::OpenApi;

use crate::entities::{
    education::{EducationBase, EducationCreate, EducationRead, EducationUpdate},
    employment::{EmploymentBase, EmploymentCreate, EmploymentRead, EmploymentUpdate},
};
use crate::errors::{ErrorCode, FieldError, ValidationErrorBody};

/// OpenAPI components for every shape, for API documentation tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Person History Schemas",
        description = "Education and employment records belonging to a person"
    ),
    components(schemas(
        EducationBase,
        EducationCreate,
        EducationUpdate,
        EducationRead,
        EmploymentBase,
        EmploymentCreate,
        EmploymentUpdate,
        EmploymentRead,
        ErrorCode,
        FieldError,
        ValidationErrorBody,
    ))
)]
pub struct SchemaDoc;

static OPENAPI_JSON: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(SchemaDoc::openapi()).unwrap_or_else(|e| {
        tracing::error!("Failed to render OpenAPI document: {}", e);
        Value::Null
    })
});

/// The full OpenAPI document as JSON.
pub fn openapi_json() -> &'static Value {
    &OPENAPI_JSON
}

/// A single component schema, e.g. `component_schema("EducationRead")`.
pub fn component_schema(name: &str) -> Option<&'static Value> {
    OPENAPI_JSON
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.get(name))
}
