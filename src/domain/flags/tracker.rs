//! Flag store contract

use crate::domain::time::Timestamp;
use crate::domain::value::Value;

/// A stored flag: a value plus an optional expiration instant
#[derive(Debug, Clone, PartialEq)]
pub struct FlagRecord {
    pub value: Value,
    /// `None` means the flag never expires
    pub expires_at: Option<Timestamp>,
}

impl FlagRecord {
    pub fn new(value: Value, expires_at: Option<Timestamp>) -> Self {
        FlagRecord { value, expires_at }
    }

    /// A record is expired from its expiration instant onward
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Per-object store of named, expiring flags
///
/// Keys are compared exactly (case-sensitive). A missing or expired flag is
/// a normal outcome, never an error. Implementations must be safe to share
/// between threads; a write that completes before a read of the same key
/// must be visible to that read.
pub trait FlagTracker: Send + Sync {
    /// Current value of the flag, or `None` if it is absent or expired
    fn get_flag_value(&self, key: &str) -> Option<Value>;

    /// Stored expiration of the flag, even if that instant has passed
    ///
    /// `None` if there is no record for the key or it never expires.
    fn get_flag_expiration_time(&self, key: &str) -> Option<Timestamp>;

    /// Keys of all live (unexpired) flags
    fn list_all_flags(&self) -> Vec<String>;

    /// Create or overwrite a flag
    fn set_flag(&self, key: &str, value: Value, expiration: Option<Timestamp>);

    /// Delete a flag outright. Returns true if a record was removed.
    fn remove_flag(&self, key: &str) -> bool;

    /// True if [`get_flag_value`](Self::get_flag_value) would return a value
    fn has_flag(&self, key: &str) -> bool {
        self.get_flag_value(key).is_some()
    }
}

/// An object that owns flags
pub trait Flaggable {
    fn flag_tracker(&self) -> &dyn FlagTracker;
}
