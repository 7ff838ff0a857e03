#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use person_history_schemas::{
    providers::{FixedClock, IdGenerator},
    settings::SchemaSettings,
    SchemaHandler,
};
use uuid::Uuid;

/// Hands out `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Uuid::from_u128(n as u128)
    }
}

pub type TestHandler = SchemaHandler<SequentialIds, FixedClock>;

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap()
}

pub fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 15, 15, 30, 0).unwrap()
}

pub fn test_handler() -> TestHandler {
    handler_at(created_at(), SchemaSettings::default())
}

pub fn strict_handler() -> TestHandler {
    handler_at(created_at(), SchemaSettings::strict())
}

pub fn handler_at(now: DateTime<Utc>, settings: SchemaSettings) -> TestHandler {
    SchemaHandler::new(SequentialIds::default(), FixedClock(now), settings)
}

pub fn nth_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}
