pub mod loader;
pub mod models;
pub mod options;

pub use models::{OneOrMany, Section, TriageConfig};
pub use options::Options;
