mod test_utils;

use chrono::NaiveDate;
use person_history_schemas::{
    EmploymentCreate, EmploymentRead, EmploymentUpdate, ErrorCode, OptionField, Schema,
};
use serde_json::json;
use test_records::*;
use test_utils::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn amazon_internship_validates_and_promotes_unchanged() {
    let handler = test_handler();
    let payload = employment_payload();

    let create: EmploymentCreate = handler.validate(&payload).unwrap();
    let read: EmploymentRead = handler.promote(create);
    let value = serde_json::to_value(&read).unwrap();

    for field in ["person_id", "organization", "position", "start_date", "end_date", "is_current"] {
        assert_eq!(value[field], payload[field], "{field} changed");
    }
    assert_eq!(value["id"], json!("00000000-0000-0000-0000-000000000001"));
    assert_eq!(value["created_at"], json!("2025-05-10T12:00:00Z"));
    assert_eq!(value["updated_at"], json!("2025-05-10T12:00:00Z"));
}

#[test]
fn create_rejects_each_missing_required_field() {
    for field in ["person_id", "organization", "position", "start_date"] {
        let err = EmploymentCreate::from_json(&without(employment_payload(), field)).unwrap_err();

        assert_eq!(err.schema, "EmploymentCreate");
        assert_eq!(err.find(field).map(|e| e.code), Some(ErrorCode::Required), "{field}");
    }
}

#[test]
fn create_defaults_optional_fields() {
    let payload = without(without(employment_payload(), "end_date"), "is_current");

    let create = EmploymentCreate::from_json(&payload).unwrap();

    assert_eq!(create.base.end_date, None);
    assert!(!create.base.is_current);
    assert_eq!(create.base.start_date, date(2025, 5, 1));
}

#[test]
fn create_rejects_null_is_current() {
    let payload = with(employment_payload(), "is_current", json!(null));

    let err = EmploymentCreate::from_json(&payload).unwrap_err();

    assert_eq!(err.find("is_current").unwrap().code, ErrorCode::InvalidType);
}

#[test]
fn create_rejects_badly_formatted_dates() {
    let payload = with(
        with(employment_payload(), "start_date", json!("05/01/2025")),
        "end_date",
        json!("2025-02-30"),
    );

    let err = EmploymentCreate::from_json(&payload).unwrap_err();

    assert_eq!(err.find("start_date").unwrap().code, ErrorCode::InvalidType);
    assert_eq!(err.find("end_date").unwrap().code, ErrorCode::InvalidType);
}

#[test]
fn create_accepts_early_start_date() {
    let payload = with(employment_payload(), "start_date", json!("1800-01-01"));

    let create = EmploymentCreate::from_json(&payload).unwrap();

    assert_eq!(create.base.start_date, date(1800, 1, 1));
}

#[test]
fn create_accepts_long_position() {
    let position = "p".repeat(300);
    let payload = with(employment_payload(), "position", json!(position));

    let create = EmploymentCreate::from_json(&payload).unwrap();

    assert_eq!(create.base.position, position);
}

#[test]
fn create_rejects_empty_position() {
    let payload = with(employment_payload(), "position", json!(""));

    let err = EmploymentCreate::from_json(&payload).unwrap_err();

    let found = err.find("position").unwrap();
    assert_eq!(found.code, ErrorCode::InvalidValue);
    assert_eq!(found.message, "Position must not be empty");
}

#[test]
fn empty_update_is_valid_and_unset() {
    let update = EmploymentUpdate::from_json(&json!({})).unwrap();

    assert!(update.is_empty());
    assert_eq!(update, EmploymentUpdate::default());
    assert_eq!(update.is_current, None);
    assert!(update.end_date.is_unchanged());
}

#[test]
fn update_reads_documented_examples() {
    let ended = EmploymentUpdate::from_json(&json!({"end_date": "2025-08-31", "is_current": false})).unwrap();
    let promoted = EmploymentUpdate::from_json(&json!({"position": "Software Engineer", "is_current": true})).unwrap();

    assert_eq!(ended.end_date, OptionField::SetToValue(date(2025, 8, 31)));
    assert_eq!(ended.is_current, Some(false));
    assert_eq!(promoted.position.as_deref(), Some("Software Engineer"));
    assert!(promoted.end_date.is_unchanged());
}

#[test]
fn update_rejects_mistyped_is_current() {
    let err = EmploymentUpdate::from_json(&json!({"is_current": "yes"})).unwrap_err();

    assert_eq!(err.find("is_current").unwrap().code, ErrorCode::InvalidType);
}

#[test]
fn read_round_trips_through_json() {
    let read: EmploymentRead = test_handler().read(&employment_payload()).unwrap();

    let text = serde_json::to_string(&read).unwrap();
    let back = EmploymentRead::from_json_str(&text).unwrap();
    let parsed: EmploymentRead = serde_json::from_str(&text).unwrap();

    assert_eq!(back, read);
    assert_eq!(parsed, read);
    assert_eq!(back.base.organization, "Amazon");
    assert_eq!(back.base.position, "Software Engineering Intern");
    assert_eq!(back.base.start_date, date(2025, 5, 1));
    assert_eq!(back.base.end_date, Some(date(2025, 8, 31)));
    assert!(!back.base.is_current);
}

#[test]
fn read_defaults_are_unique_per_call() {
    let handler = test_handler();

    let first: EmploymentRead = handler.read(&employment_payload()).unwrap();
    let second: EmploymentRead = handler.read(&employment_payload()).unwrap();

    assert_eq!(first.id, nth_id(1));
    assert_eq!(second.id, nth_id(2));
}

#[test]
fn apply_marks_job_current_and_clears_end_date() {
    let mut read: EmploymentRead = test_handler().read(&employment_payload()).unwrap();
    let update = EmploymentUpdate::from_json(&json!({
        "position": "Software Engineer",
        "end_date": null,
        "is_current": true
    }))
    .unwrap();

    strict_later().apply(&mut read, update).unwrap();

    assert_eq!(read.base.position, "Software Engineer");
    assert_eq!(read.base.end_date, None);
    assert!(read.base.is_current);
    assert_eq!(read.updated_at, later());
    assert_eq!(read.created_at, created_at());
}

#[test]
fn strict_apply_rejects_current_job_with_end_date() {
    let mut read: EmploymentRead = test_handler().read(&employment_payload()).unwrap();
    let before = read.clone();
    let update = EmploymentUpdate::from_json(&json!({"is_current": true})).unwrap();

    let err = strict_later().apply(&mut read, update).unwrap_err();

    assert_eq!(err.find("is_current").unwrap().code, ErrorCode::Inconsistent);
    assert_eq!(read, before);
}

#[test]
fn chronology_flags_both_invariants() {
    let payload = with(
        with(employment_payload(), "end_date", json!("2025-04-30")),
        "is_current",
        json!(true),
    );

    let create = EmploymentCreate::from_json(&payload).unwrap();
    let err = create.check_chronology().unwrap_err();

    assert!(err.has_field("end_date"));
    assert!(err.has_field("is_current"));
}

#[test]
fn update_chronology_checks_only_carried_fields() {
    let contradictory = EmploymentUpdate::from_json(&json!({"end_date": "2025-08-31", "is_current": true})).unwrap();
    let alone = EmploymentUpdate::from_json(&json!({"end_date": "2025-08-31"})).unwrap();

    assert!(contradictory.check_chronology().is_err());
    assert!(alone.check_chronology().is_ok());
}

#[test]
fn strict_handler_rejects_unknown_fields() {
    let payload = with(employment_payload(), "salary", json!(100_000));

    let err = strict_handler().validate::<EmploymentCreate>(&payload).unwrap_err();
    let lenient = test_handler().validate::<EmploymentCreate>(&payload);

    assert_eq!(err.find("salary").unwrap().code, ErrorCode::UnknownField);
    assert!(lenient.is_ok());
}

fn strict_later() -> TestHandler {
    handler_at(later(), person_history_schemas::settings::SchemaSettings::strict())
}
