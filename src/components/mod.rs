pub mod comment;
pub mod templates;
pub mod triage;
