//! Application layer - Use cases and orchestration

pub mod evaluate;
pub mod list_tags;

pub use evaluate::{EvaluateTagService, TagOutcome};
pub use list_tags::list_tags;
