pub mod education;
pub mod employment;
pub mod option_fields;
pub mod schema;
