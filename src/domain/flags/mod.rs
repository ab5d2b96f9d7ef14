//! Flag system

pub mod handlers;
pub mod memory;
pub mod tracker;

// Re-export main types
pub use handlers::{register_flag_handlers, FLAG_EXPIRATION_TAG, FLAG_IS_EXPIRED_TAG, LIST_FLAGS_TAG};
pub use memory::MemoryFlagTracker;
pub use tracker::{FlagRecord, FlagTracker, Flaggable};
