//! In-memory flag tracker

use crate::domain::flags::tracker::{FlagRecord, FlagTracker};
use crate::domain::time::{Clock, Timestamp};
use crate::domain::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Default)]
struct FlagMap {
    /// Keys in insertion order
    order: Vec<String>,
    records: HashMap<String, FlagRecord>,
}

impl FlagMap {
    fn remove(&mut self, key: &str) -> bool {
        if self.records.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }
}

/// Flag tracker backed by a locked map
///
/// Expired records stay in the map until overwritten, removed or purged;
/// every read skips them, so they behave as absent.
pub struct MemoryFlagTracker {
    clock: Arc<dyn Clock>,
    flags: RwLock<FlagMap>,
}

impl fmt::Debug for MemoryFlagTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFlagTracker")
            .field("flags", &*self.flags.read())
            .finish_non_exhaustive()
    }
}

impl MemoryFlagTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        MemoryFlagTracker {
            clock,
            flags: RwLock::new(FlagMap::default()),
        }
    }

    /// Physically drop expired records. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut flags = self.flags.write();
        let expired: Vec<String> = flags
            .order
            .iter()
            .filter(|key| flags.records[key.as_str()].is_expired_at(now))
            .cloned()
            .collect();
        for key in &expired {
            flags.remove(key);
        }
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "purged expired flags");
        }
        expired.len()
    }

    /// Number of stored records, expired ones included
    pub fn stored_len(&self) -> usize {
        self.flags.read().records.len()
    }
}

impl FlagTracker for MemoryFlagTracker {
    fn get_flag_value(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        self.flags
            .read()
            .records
            .get(key)
            .filter(|record| !record.is_expired_at(now))
            .map(|record| record.value.clone())
    }

    fn get_flag_expiration_time(&self, key: &str) -> Option<Timestamp> {
        self.flags.read().records.get(key)?.expires_at
    }

    fn list_all_flags(&self) -> Vec<String> {
        let now = self.clock.now();
        let flags = self.flags.read();
        flags
            .order
            .iter()
            .filter(|key| !flags.records[key.as_str()].is_expired_at(now))
            .cloned()
            .collect()
    }

    fn set_flag(&self, key: &str, value: Value, expiration: Option<Timestamp>) {
        let mut flags = self.flags.write();
        if !flags.records.contains_key(key) {
            flags.order.push(key.to_string());
        }
        flags
            .records
            .insert(key.to_string(), FlagRecord::new(value, expiration));
        tracing::trace!(flag = key, expires = ?expiration, "flag set");
    }

    fn remove_flag(&self, key: &str) -> bool {
        self.flags.write().remove(key)
    }
}
