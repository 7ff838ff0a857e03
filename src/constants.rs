// ───── Field constraints ─────────────────────────────────────────────
pub const MIN_TEXT_LENGTH: u64 = 1;

// ───── Schema names ──────────────────────────────────────────────────
pub const EDUCATION_CREATE: &str = "EducationCreate";
pub const EDUCATION_UPDATE: &str = "EducationUpdate";
pub const EDUCATION_READ: &str = "EducationRead";
pub const EMPLOYMENT_CREATE: &str = "EmploymentCreate";
pub const EMPLOYMENT_UPDATE: &str = "EmploymentUpdate";
pub const EMPLOYMENT_READ: &str = "EmploymentRead";
