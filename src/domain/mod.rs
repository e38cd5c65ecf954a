pub mod event;
pub mod models;
pub mod repo;

pub use event::{ItemKind, TriageEvent};
pub use models::{Evaluation, LabelDecision, PlannedComment};
pub use repo::RepoRef;
