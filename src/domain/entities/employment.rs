use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{EMPLOYMENT_CREATE, EMPLOYMENT_READ, EMPLOYMENT_UPDATE, MIN_TEXT_LENGTH},
    entities::{
        option_fields::{OptionField, PatchDate},
        schema::{Record, Schema},
    },
    errors::{ErrorCode, FieldError, SchemaValidationError},
    providers::{Clock, IdGenerator, SystemClock, UuidV4Generator},
    utils::json_fields::FieldReader,
};

const BASE_FIELDS: &[&str] = &[
    "person_id", "organization", "position", "start_date", "end_date", "is_current",
];
const READ_FIELDS: &[&str] = &[
    "id", "person_id", "organization", "position", "start_date", "end_date", "is_current",
    "created_at", "updated_at",
];

// ───── Shared Field Contract ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(examples(json!({
    "person_id": "11111111-1111-4111-8111-111111111111",
    "organization": "Amazon",
    "position": "Software Engineering Intern",
    "start_date": "2025-05-01",
    "end_date": "2025-08-31",
    "is_current": false
})))]
pub struct EmploymentBase {
    /// ID of the person associated with this employment record.
    #[schema(examples("11111111-1111-4111-8111-111111111111"))]
    pub person_id: Uuid,

    /// Name of the employing organization.
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Organization must not be empty"))]
    #[schema(examples("Amazon"))]
    pub organization: String,

    /// Job title or role held.
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Position must not be empty"))]
    #[schema(examples("Software Engineering Intern"))]
    pub position: String,

    /// Employment start date.
    #[schema(examples("2025-05-01"))]
    pub start_date: NaiveDate,

    /// Employment end date (if applicable).
    #[serde(default)]
    #[schema(examples("2025-08-31"))]
    pub end_date: Option<NaiveDate>,

    /// Whether this is the person's current job.
    #[serde(default)]
    #[schema(examples(true))]
    pub is_current: bool,
}

impl EmploymentBase {
    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let person_id = reader.required("person_id");
        let organization = reader.required("organization");
        let position = reader.required("position");
        let start_date = reader.required("start_date");
        let end_date = reader.optional("end_date");
        let is_current = reader.defaulted("is_current", || false);

        Some(EmploymentBase {
            person_id: person_id?,
            organization: organization?,
            position: position?,
            start_date: start_date?,
            end_date,
            is_current: is_current?,
        })
    }

    fn chronology_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(end) = self.end_date {
            if end < self.start_date {
                errors.push(FieldError::new(
                    "end_date",
                    ErrorCode::Inconsistent,
                    "end_date must not be before start_date",
                ));
            }
            if self.is_current {
                errors.push(FieldError::new(
                    "is_current",
                    ErrorCode::Inconsistent,
                    "A current job cannot have an end_date",
                ));
            }
        }
        errors
    }
}

// ───── Input Payloads ───────────────────────────────────────────────

/// Creation payload for an Employment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(examples(json!({
    "person_id": "11111111-1111-4111-8111-111111111111",
    "organization": "Amazon",
    "position": "Software Engineering Intern",
    "start_date": "2025-05-01",
    "end_date": "2025-08-31",
    "is_current": false
})))]
pub struct EmploymentCreate {
    #[serde(flatten)]
    #[validate(nested)]
    pub base: EmploymentBase,
}

impl From<EmploymentBase> for EmploymentCreate {
    fn from(base: EmploymentBase) -> Self {
        EmploymentCreate { base }
    }
}

impl Schema for EmploymentCreate {
    const NAME: &'static str = EMPLOYMENT_CREATE;
    const FIELDS: &'static [&'static str] = BASE_FIELDS;

    fn from_json(value: &Value) -> Result<Self, SchemaValidationError> {
        let mut reader = FieldReader::new(Self::NAME, value)?;
        let Some(base) = EmploymentBase::read(&mut reader) else {
            return Err(reader.into_error());
        };
        reader.finish()?;

        let create = EmploymentCreate { base };
        create
            .validate()
            .map_err(|e| SchemaValidationError::from_validation(Self::NAME, e))?;
        Ok(create)
    }

    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        SchemaValidationError::ensure_empty(Self::NAME, self.base.chronology_errors())
    }
}

/// Partial update for an Employment; supply only fields to change.
///
/// `end_date: null` clears the end date. `null` elsewhere counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
#[schema(examples(
    json!({"end_date": "2025-08-31", "is_current": false}),
    json!({"position": "Software Engineer", "is_current": true})
))]
pub struct EmploymentUpdate {
    /// ID of the person associated with this employment record.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(examples("11111111-1111-4111-8111-111111111111"))]
    pub person_id: Option<Uuid>,

    /// Name of the employing organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Organization must not be empty"))]
    #[schema(examples("Amazon"))]
    pub organization: Option<String>,

    /// Job title or role held.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Position must not be empty"))]
    #[schema(examples("Software Engineer"))]
    pub position: Option<String>,

    /// Employment start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(examples("2025-05-01"))]
    pub start_date: Option<NaiveDate>,

    /// Employment end date; `null` clears it.
    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[schema(value_type = Option<NaiveDate>, examples("2025-08-31"))]
    pub end_date: PatchDate,

    /// Whether this is the person's current job.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(examples(false))]
    pub is_current: Option<bool>,
}

impl EmploymentUpdate {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.person_id.is_none()
            && self.organization.is_none()
            && self.position.is_none()
            && self.start_date.is_none()
            && self.end_date.is_unchanged()
            && self.is_current.is_none()
    }
}

impl Schema for EmploymentUpdate {
    const NAME: &'static str = EMPLOYMENT_UPDATE;
    const FIELDS: &'static [&'static str] = BASE_FIELDS;

    fn from_json(value: &Value) -> Result<Self, SchemaValidationError> {
        let mut reader = FieldReader::new(Self::NAME, value)?;
        let update = EmploymentUpdate {
            person_id: reader.optional("person_id"),
            organization: reader.optional("organization"),
            position: reader.optional("position"),
            start_date: reader.optional("start_date"),
            end_date: reader.patch("end_date"),
            is_current: reader.optional("is_current"),
        };
        reader.finish()?;

        update
            .validate()
            .map_err(|e| SchemaValidationError::from_validation(Self::NAME, e))?;
        Ok(update)
    }

    /// Only checks what the patch itself carries.
    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        let mut errors = Vec::new();
        if let Some(end) = self.end_date.value_ref() {
            if matches!(self.start_date, Some(start) if *end < start) {
                errors.push(FieldError::new(
                    "end_date",
                    ErrorCode::Inconsistent,
                    "end_date must not be before start_date",
                ));
            }
            if self.is_current == Some(true) {
                errors.push(FieldError::new(
                    "is_current",
                    ErrorCode::Inconsistent,
                    "A current job cannot have an end_date",
                ));
            }
        }
        SchemaValidationError::ensure_empty(Self::NAME, errors)
    }
}

// ───── API Response Model ───────────────────────────────────────────

/// Server representation returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(examples(json!({
    "id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa",
    "person_id": "11111111-1111-4111-8111-111111111111",
    "organization": "Amazon",
    "position": "Software Engineering Intern",
    "start_date": "2025-05-01",
    "end_date": "2025-08-31",
    "is_current": false,
    "created_at": "2025-05-10T12:00:00Z",
    "updated_at": "2025-05-15T15:30:00Z"
})))]
pub struct EmploymentRead {
    /// Unique identifier of the employment record.
    #[schema(examples("aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa"))]
    pub id: Uuid,

    #[serde(flatten)]
    #[validate(nested)]
    pub base: EmploymentBase,

    /// When the record was created (UTC).
    #[schema(examples("2025-05-10T12:00:00Z"))]
    pub created_at: DateTime<Utc>,

    /// When the record was last modified (UTC).
    #[schema(examples("2025-05-15T15:30:00Z"))]
    pub updated_at: DateTime<Utc>,
}

impl Schema for EmploymentRead {
    const NAME: &'static str = EMPLOYMENT_READ;
    const FIELDS: &'static [&'static str] = READ_FIELDS;

    fn from_json(value: &Value) -> Result<Self, SchemaValidationError> {
        Self::from_json_with(value, &UuidV4Generator, &SystemClock)
    }

    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        SchemaValidationError::ensure_empty(Self::NAME, self.base.chronology_errors())
    }
}

impl Record for EmploymentRead {
    type Create = EmploymentCreate;
    type Update = EmploymentUpdate;

    fn from_json_with(
        value: &Value,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Self, SchemaValidationError> {
        let mut reader = FieldReader::new(Self::NAME, value)?;
        let now = clock.now();
        let id = reader.defaulted("id", || ids.generate());
        let base = EmploymentBase::read(&mut reader);
        let created_at = reader.defaulted("created_at", || now);
        let updated_at = reader.defaulted("updated_at", || now);

        let (Some(id), Some(base), Some(created_at), Some(updated_at)) =
            (id, base, created_at, updated_at)
        else {
            return Err(reader.into_error());
        };
        reader.finish()?;

        let read = EmploymentRead { id, base, created_at, updated_at };
        read.validate()
            .map_err(|e| SchemaValidationError::from_validation(Self::NAME, e))?;
        Ok(read)
    }

    fn from_create(create: EmploymentCreate, id: Uuid, now: DateTime<Utc>) -> Self {
        EmploymentRead {
            id,
            base: create.base,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, update: EmploymentUpdate, now: DateTime<Utc>) {
        if update.is_empty() {
            return;
        }
        let EmploymentUpdate {
            person_id,
            organization,
            position,
            start_date,
            end_date,
            is_current,
        } = update;

        if let Some(person_id) = person_id {
            self.base.person_id = person_id;
        }
        if let Some(organization) = organization {
            self.base.organization = organization;
        }
        if let Some(position) = position {
            self.base.position = position;
        }
        if let Some(start_date) = start_date {
            self.base.start_date = start_date;
        }
        end_date.apply_to(&mut self.base.end_date);
        if let Some(is_current) = is_current {
            self.base.is_current = is_current;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
