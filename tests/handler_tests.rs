mod test_utils;

use actix_web::{body::to_bytes, http::StatusCode, ResponseError};
use chrono::{DateTime, Utc};
use mockall::mock;
use person_history_schemas::{
    errors::ValidationErrorBody,
    providers::{Clock, IdGenerator},
    settings::{AppEnvironment, SchemaSettings},
    DefaultSchemaHandler, EducationCreate, EducationRead, EmploymentCreate, EmploymentRead,
    ErrorCode, Record, Schema, SchemaHandler, SchemaValidationError,
};
use serde_json::{json, Value};
use std::str::FromStr;
use test_records::*;
use test_utils::*;
use uuid::Uuid;

mock! {
    pub Ids {}

    impl IdGenerator for Ids {
        fn generate(&self) -> Uuid;
    }
}

mock! {
    pub Time {}

    impl Clock for Time {
        fn now(&self) -> DateTime<Utc>;
    }
}

#[test]
fn promote_asks_each_provider_once() {
    let id = Uuid::parse_str("aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa").unwrap();
    let mut ids = MockIds::new();
    ids.expect_generate().times(1).return_const(id);
    let mut clock = MockTime::new();
    clock.expect_now().times(1).return_const(created_at());
    let handler = SchemaHandler::new(ids, clock, SchemaSettings::default());

    let create = EmploymentCreate::from_json_str(&employment_payload().to_string()).unwrap();
    let read: EmploymentRead = handler.promote(create);

    assert_eq!(read.id(), id);
    assert_eq!(read.created_at, created_at());
}

#[test]
fn read_skips_id_generator_when_id_is_supplied() {
    let mut ids = MockIds::new();
    ids.expect_generate().never();
    let mut clock = MockTime::new();
    clock.expect_now().return_const(created_at());
    let handler = SchemaHandler::new(ids, clock, SchemaSettings::default());
    let payload = with(education_payload(), "id", json!("bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb"));

    let read: EducationRead = handler.read(&payload).unwrap();

    assert_eq!(read.id.to_string(), "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb");
}

#[test]
fn default_handler_generates_random_ids() {
    let handler = DefaultSchemaHandler::default();
    let create = EducationCreate::from_json(&education_payload()).unwrap();

    let first: EducationRead = handler.promote(create.clone());
    let second: EducationRead = handler.promote(create);

    assert_ne!(first.id, second.id);
    assert_eq!(first.id.get_version_num(), 4);
}

#[test]
fn validate_str_reports_malformed_body() {
    let err = test_handler()
        .validate_str::<EducationCreate>("not json at all")
        .unwrap_err();

    assert_eq!(err.schema, "EducationCreate");
    assert_eq!(err.errors[0].code, ErrorCode::Malformed);
}

#[test]
fn validate_str_accepts_valid_body() {
    let raw = employment_payload().to_string();

    let create: EmploymentCreate = test_handler().validate_str(&raw).unwrap();

    assert_eq!(create.base.organization, "Amazon");
}

#[test]
fn error_display_lists_fields() {
    let err = EducationCreate::from_json(&json!({})).unwrap_err();

    let text = err.to_string();

    assert!(text.starts_with("EducationCreate validation error:"));
    assert!(text.contains("institution:Field is required"));
    assert_eq!(err.errors.len(), 4);
}

#[test]
fn error_maps_to_bad_request() {
    let err = SchemaValidationError::malformed("EmploymentCreate", "Invalid JSON");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn error_response_body_names_offending_fields() {
    let payload = with(education_payload(), "start_year", json!("not-a-year"));
    let err = EducationCreate::from_json(&payload).unwrap_err();

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(value["error"], "Validation failed");
    assert_eq!(value["schema"], "EducationCreate");
    assert_eq!(value["details"][0]["field"], "start_year");
    assert_eq!(value["details"][0]["code"], "invalid_type");
}

#[test]
fn error_body_mirrors_error() {
    let err = EducationCreate::from_json(&without(education_payload(), "degree")).unwrap_err();

    let body = ValidationErrorBody::from(&err);

    assert_eq!(body.details, err.errors);
    assert_eq!(body.schema, "EducationCreate");
}

#[test]
fn settings_default_is_permissive() {
    let settings = SchemaSettings::default();

    assert_eq!(settings.env, AppEnvironment::Development);
    assert!(!settings.enforce_chronology);
    assert!(!settings.reject_unknown_fields);
}

#[test]
fn settings_read_from_toml() {
    let settings = SchemaSettings::from_toml_str(
        "env = \"production\"\nenforce_chronology = true\n",
    )
    .unwrap();

    assert_eq!(settings.env, AppEnvironment::Production);
    assert!(settings.enforce_chronology);
    assert!(!settings.reject_unknown_fields);
}

#[test]
fn environment_names_parse_case_insensitively() {
    assert_eq!(AppEnvironment::from_str("Testing").unwrap(), AppEnvironment::Testing);
    assert_eq!(AppEnvironment::Production.to_string(), "production");
    assert!(AppEnvironment::from_str("staging").is_err());
}
