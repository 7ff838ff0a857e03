pub mod json_fields;
