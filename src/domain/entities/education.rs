use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{EDUCATION_CREATE, EDUCATION_READ, EDUCATION_UPDATE, MIN_TEXT_LENGTH},
    entities::{
        option_fields::{OptionField, PatchYear},
        schema::{Record, Schema},
    },
    errors::{ErrorCode, FieldError, SchemaValidationError},
    providers::{Clock, IdGenerator, SystemClock, UuidV4Generator},
    utils::json_fields::FieldReader,
};

const BASE_FIELDS: &[&str] = &["person_id", "institution", "degree", "start_year", "end_year"];
const READ_FIELDS: &[&str] = &[
    "id", "person_id", "institution", "degree", "start_year", "end_year", "created_at", "updated_at",
];

// ───── Shared Field Contract ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(examples(json!({
    "person_id": "22222222-2222-4222-8222-222222222222",
    "institution": "Columbia University",
    "degree": "B.A. in Computer Science",
    "start_year": 2022,
    "end_year": 2026
})))]
pub struct EducationBase {
    /// ID of the person associated with this education record.
    #[schema(examples("22222222-2222-4222-8222-222222222222"))]
    pub person_id: Uuid,

    /// Name of the educational institution.
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Institution must not be empty"))]
    #[schema(examples("Columbia University"))]
    pub institution: String,

    /// Degree or program pursued.
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Degree must not be empty"))]
    #[schema(examples("B.A. in Computer Science"))]
    pub degree: String,

    /// Year studies began.
    #[schema(examples(2022))]
    pub start_year: i32,

    /// Year studies ended (if applicable).
    #[serde(default)]
    #[schema(examples(2026))]
    pub end_year: Option<i32>,
}

impl EducationBase {
    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let person_id = reader.required("person_id");
        let institution = reader.required("institution");
        let degree = reader.required("degree");
        let start_year = reader.required("start_year");
        let end_year = reader.optional("end_year");

        Some(EducationBase {
            person_id: person_id?,
            institution: institution?,
            degree: degree?,
            start_year: start_year?,
            end_year,
        })
    }

    fn chronology_errors(&self) -> Vec<FieldError> {
        match self.end_year {
            Some(end) if end < self.start_year => vec![FieldError::new(
                "end_year",
                ErrorCode::Inconsistent,
                "end_year must not be before start_year",
            )],
            _ => Vec::new(),
        }
    }
}

// ───── Input Payloads ───────────────────────────────────────────────

/// Creation payload for an Education.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(examples(json!({
    "person_id": "22222222-2222-4222-8222-222222222222",
    "institution": "Columbia University",
    "degree": "B.A. in Computer Science",
    "start_year": 2022,
    "end_year": 2026
})))]
pub struct EducationCreate {
    #[serde(flatten)]
    #[validate(nested)]
    pub base: EducationBase,
}

impl From<EducationBase> for EducationCreate {
    fn from(base: EducationBase) -> Self {
        EducationCreate { base }
    }
}

impl Schema for EducationCreate {
    const NAME: &'static str = EDUCATION_CREATE;
    const FIELDS: &'static [&'static str] = BASE_FIELDS;

    fn from_json(value: &Value) -> Result<Self, SchemaValidationError> {
        let mut reader = FieldReader::new(Self::NAME, value)?;
        let Some(base) = EducationBase::read(&mut reader) else {
            return Err(reader.into_error());
        };
        reader.finish()?;

        let create = EducationCreate { base };
        create
            .validate()
            .map_err(|e| SchemaValidationError::from_validation(Self::NAME, e))?;
        Ok(create)
    }

    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        SchemaValidationError::ensure_empty(Self::NAME, self.base.chronology_errors())
    }
}

/// Partial update for an Education; supply only fields to change.
///
/// Absent fields are left unchanged. `end_year: null` clears the end year;
/// `null` on any other field counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
#[schema(examples(json!({"end_year": 2026}), json!({"degree": "M.S. in Computer Science"})))]
pub struct EducationUpdate {
    /// ID of the person associated with this education record.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(examples("22222222-2222-4222-8222-222222222222"))]
    pub person_id: Option<Uuid>,

    /// Name of the educational institution.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Institution must not be empty"))]
    #[schema(examples("Columbia University"))]
    pub institution: Option<String>,

    /// Degree or program pursued.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = MIN_TEXT_LENGTH, message = "Degree must not be empty"))]
    #[schema(examples("M.S. in Computer Science"))]
    pub degree: Option<String>,

    /// Year studies began.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(examples(2022))]
    pub start_year: Option<i32>,

    /// Year studies ended; `null` clears it.
    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[schema(value_type = Option<i32>, examples(2026))]
    pub end_year: PatchYear,
}

impl EducationUpdate {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.person_id.is_none()
            && self.institution.is_none()
            && self.degree.is_none()
            && self.start_year.is_none()
            && self.end_year.is_unchanged()
    }
}

impl Schema for EducationUpdate {
    const NAME: &'static str = EDUCATION_UPDATE;
    const FIELDS: &'static [&'static str] = BASE_FIELDS;

    fn from_json(value: &Value) -> Result<Self, SchemaValidationError> {
        let mut reader = FieldReader::new(Self::NAME, value)?;
        let update = EducationUpdate {
            person_id: reader.optional("person_id"),
            institution: reader.optional("institution"),
            degree: reader.optional("degree"),
            start_year: reader.optional("start_year"),
            end_year: reader.patch("end_year"),
        };
        reader.finish()?;

        update
            .validate()
            .map_err(|e| SchemaValidationError::from_validation(Self::NAME, e))?;
        Ok(update)
    }

    /// Only checks the ordering when the patch carries both years.
    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        match (self.start_year, self.end_year.value_ref()) {
            (Some(start), Some(end)) if *end < start => Err(SchemaValidationError::single(
                Self::NAME,
                FieldError::new("end_year", ErrorCode::Inconsistent, "end_year must not be before start_year"),
            )),
            _ => Ok(()),
        }
    }
}

// ───── API Response Model ───────────────────────────────────────────

/// Server representation returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(examples(json!({
    "id": "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb",
    "person_id": "22222222-2222-4222-8222-222222222222",
    "institution": "Columbia University",
    "degree": "B.A. in Computer Science",
    "start_year": 2022,
    "end_year": 2026,
    "created_at": "2025-05-10T12:00:00Z",
    "updated_at": "2025-05-15T15:30:00Z"
})))]
pub struct EducationRead {
    /// Unique identifier of the education record.
    #[schema(examples("bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb"))]
    pub id: Uuid,

    #[serde(flatten)]
    #[validate(nested)]
    pub base: EducationBase,

    /// When the record was created (UTC).
    #[schema(examples("2025-05-10T12:00:00Z"))]
    pub created_at: DateTime<Utc>,

    /// When the record was last modified (UTC).
    #[schema(examples("2025-05-15T15:30:00Z"))]
    pub updated_at: DateTime<Utc>,
}

impl Schema for EducationRead {
    const NAME: &'static str = EDUCATION_READ;
    const FIELDS: &'static [&'static str] = READ_FIELDS;

    fn from_json(value: &Value) -> Result<Self, SchemaValidationError> {
        Self::from_json_with(value, &UuidV4Generator, &SystemClock)
    }

    fn check_chronology(&self) -> Result<(), SchemaValidationError> {
        SchemaValidationError::ensure_empty(Self::NAME, self.base.chronology_errors())
    }
}

impl Record for EducationRead {
    type Create = EducationCreate;
    type Update = EducationUpdate;

    fn from_json_with(
        value: &Value,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Self, SchemaValidationError> {
        let mut reader = FieldReader::new(Self::NAME, value)?;
        let now = clock.now();
        let id = reader.defaulted("id", || ids.generate());
        let base = EducationBase::read(&mut reader);
        let created_at = reader.defaulted("created_at", || now);
        let updated_at = reader.defaulted("updated_at", || now);

        let (Some(id), Some(base), Some(created_at), Some(updated_at)) =
            (id, base, created_at, updated_at)
        else {
            return Err(reader.into_error());
        };
        reader.finish()?;

        let read = EducationRead { id, base, created_at, updated_at };
        read.validate()
            .map_err(|e| SchemaValidationError::from_validation(Self::NAME, e))?;
        Ok(read)
    }

    fn from_create(create: EducationCreate, id: Uuid, now: DateTime<Utc>) -> Self {
        EducationRead {
            id,
            base: create.base,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, update: EducationUpdate, now: DateTime<Utc>) {
        if update.is_empty() {
            return;
        }
        let EducationUpdate { person_id, institution, degree, start_year, end_year } = update;

        if let Some(person_id) = person_id {
            self.base.person_id = person_id;
        }
        if let Some(institution) = institution {
            self.base.institution = institution;
        }
        if let Some(degree) = degree {
            self.base.degree = degree;
        }
        if let Some(start_year) = start_year {
            self.base.start_year = start_year;
        }
        end_year.apply_to(&mut self.base.end_year);
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
