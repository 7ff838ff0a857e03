use serde_json::Value;

use crate::entities::schema::{Record, Schema};
use crate::errors::SchemaValidationError;
use crate::providers::{Clock, IdGenerator, SystemClock, UuidV4Generator};
use crate::settings::SchemaSettings;
use crate::utils::json_fields::{parse_body, unknown_fields};

/// Entry point for the request-handling layer: validates payloads, promotes
/// Create payloads to Read representations and applies patches, using the
/// injected ID generator and clock.
pub struct SchemaHandler<I, C>
where
    I: IdGenerator,
    C: Clock,
{
    pub ids: I,
    pub clock: C,
    pub settings: SchemaSettings,
}

pub type DefaultSchemaHandler = SchemaHandler<UuidV4Generator, SystemClock>;

impl Default for DefaultSchemaHandler {
    fn default() -> Self {
        SchemaHandler::new(UuidV4Generator, SystemClock, SchemaSettings::default())
    }
}

impl<I, C> SchemaHandler<I, C>
where
    I: IdGenerator,
    C: Clock,
{
    pub fn new(ids: I, clock: C, settings: SchemaSettings) -> Self {
        SchemaHandler {
            ids,
            clock,
            settings,
        }
    }

    /// Validates a JSON value against `T`, applying the configured
    /// unknown-field and chronology rules.
    pub fn validate<T: Schema>(&self, value: &Value) -> Result<T, SchemaValidationError> {
        self.reject_unknown::<T>(value)
            .and_then(|_| T::from_json(value))
            .and_then(|parsed| self.enforce_chronology(parsed))
            .inspect_err(|e| log_rejection(T::NAME, e))
    }

    pub fn validate_str<T: Schema>(&self, raw: &str) -> Result<T, SchemaValidationError> {
        let value = parse_body(T::NAME, raw).inspect_err(|e| log_rejection(T::NAME, e))?;
        self.validate(&value)
    }

    /// Builds a Read representation, filling in missing `id` and timestamps
    /// from this handler's providers.
    pub fn read<R: Record>(&self, value: &Value) -> Result<R, SchemaValidationError> {
        self.reject_unknown::<R>(value)
            .and_then(|_| R::from_json_with(value, &self.ids, &self.clock))
            .and_then(|parsed| self.enforce_chronology(parsed))
            .inspect_err(|e| log_rejection(R::NAME, e))
    }

    /// Turns an already validated Create payload into a fresh record.
    pub fn promote<R: Record>(&self, create: R::Create) -> R {
        let record = R::from_create(create, self.ids.generate(), self.clock.now());
        tracing::trace!(schema = R::NAME, id = %record.id(), "Record promoted");
        record
    }

    /// Applies `update` to `record`. When chronology enforcement is on and
    /// the merged result breaks it, `record` is left untouched.
    pub fn apply<R: Record>(&self, record: &mut R, update: R::Update) -> Result<(), SchemaValidationError> {
        let mut patched = record.clone();
        patched.apply(update, self.clock.now());
        if self.settings.enforce_chronology {
            patched
                .check_chronology()
                .inspect_err(|e| log_rejection(R::NAME, e))?;
        }
        tracing::trace!(schema = R::NAME, id = %patched.id(), "Patch applied");
        *record = patched;
        Ok(())
    }

    fn reject_unknown<T: Schema>(&self, value: &Value) -> Result<(), SchemaValidationError> {
        if !self.settings.reject_unknown_fields {
            return Ok(());
        }
        SchemaValidationError::ensure_empty(T::NAME, unknown_fields(value, T::FIELDS))
    }

    fn enforce_chronology<T: Schema>(&self, parsed: T) -> Result<T, SchemaValidationError> {
        if self.settings.enforce_chronology {
            parsed.check_chronology()?;
        }
        Ok(parsed)
    }
}

fn log_rejection(schema: &str, error: &SchemaValidationError) {
    tracing::debug!(
        schema,
        fields = ?error.fields().collect::<Vec<_>>(),
        "Payload rejected: {}",
        error
    );
}
