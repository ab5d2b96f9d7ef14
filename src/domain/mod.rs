//! Domain layer - Flags, tags and the values they produce

pub mod flags;
pub mod holder;
pub mod tags;
pub mod time;
pub mod value;
pub mod warnings;

pub use flags::{FlagTracker, Flaggable, MemoryFlagTracker};
pub use holder::{FlagHolder, TagObject};
pub use time::{Clock, DurationValue, ManualClock, SystemClock, Timestamp};
pub use value::Value;
pub use warnings::{WarningRegistry, WarningSettings};
