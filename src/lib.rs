mod domain;
mod infrastructure;
pub mod constants;
pub mod docs;
pub mod errors;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{providers, utils};

pub use entities::education::{EducationBase, EducationCreate, EducationRead, EducationUpdate};
pub use entities::employment::{EmploymentBase, EmploymentCreate, EmploymentRead, EmploymentUpdate};
pub use entities::option_fields::OptionField;
pub use entities::schema::{Record, Schema};
pub use errors::{ErrorCode, FieldError, SchemaValidationError};
pub use use_cases::schemas::{DefaultSchemaHandler, SchemaHandler};
