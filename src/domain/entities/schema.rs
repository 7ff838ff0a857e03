use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::SchemaValidationError;
use crate::infrastructure::providers::{Clock, IdGenerator};
use crate::utils::json_fields::parse_body;

/// A named, validated JSON contract.
pub trait Schema: Serialize + Sized {
    const NAME: &'static str;

    /// Every key the wire form may carry.
    const FIELDS: &'static [&'static str];

    /// Builds the shape from untrusted JSON, checking presence, types and
    /// declared constraints.
    fn from_json(value: &Value) -> Result<Self, SchemaValidationError>;

    fn from_json_str(raw: &str) -> Result<Self, SchemaValidationError> {
        let value = parse_body(Self::NAME, raw)?;
        Self::from_json(&value)
    }

    /// Cross-field rules (date ordering and the like). Not part of
    /// `from_json`; callers opt in.
    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        Ok(())
    }
}

/// Server-side representation tying together the Create and Update shapes
/// of one record type.
pub trait Record: Schema + Clone {
    type Create: Schema;
    type Update: Schema;

    /// Like [`Schema::from_json`], with `id` and timestamps defaulted from
    /// the given providers when absent.
    fn from_json_with(
        value: &Value,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Self, SchemaValidationError>;

    fn from_create(create: Self::Create, id: Uuid, now: DateTime<Utc>) -> Self;

    /// Merges a sparse patch and refreshes `updated_at` when anything was set.
    fn apply(&mut self, update: Self::Update, now: DateTime<Utc>);

    fn id(&self) -> Uuid;
}
