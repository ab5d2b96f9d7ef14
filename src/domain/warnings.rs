//! Rate-limited, suppressible diagnostics
//!
//! Warnings are declared as static [`WarningSpec`]s next to the code that fires
//! them. A [`WarningRegistry`] holds the mutable state for each one (when it
//! last fired, how often it was emitted or suppressed) and decides on every
//! fire whether the warning actually reaches the log.
//!
//! The registry is an ordinary value: callers share it through an `Arc` and
//! hand it to every tag evaluation, so tests can build a fresh one, reset it,
//! or drive it with a [`ManualClock`](crate::domain::time::ManualClock).

use crate::domain::time::{Clock, Timestamp};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// How a warning is throttled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Fires on every call
    Standard,
    /// Marks a legacy form; throttled per [`DeprecationPolicy`]
    Deprecation,
    /// Fires at most once per cooldown window
    Slow,
}

/// Static description of a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningSpec {
    pub id: &'static str,
    pub kind: WarningKind,
    pub message: &'static str,
}

impl WarningSpec {
    pub const fn standard(id: &'static str, message: &'static str) -> Self {
        WarningSpec {
            id,
            kind: WarningKind::Standard,
            message,
        }
    }

    pub const fn deprecation(id: &'static str, message: &'static str) -> Self {
        WarningSpec {
            id,
            kind: WarningKind::Deprecation,
            message,
        }
    }

    pub const fn slow(id: &'static str, message: &'static str) -> Self {
        WarningSpec {
            id,
            kind: WarningKind::Slow,
            message,
        }
    }
}

/// How often deprecation warnings are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationPolicy {
    /// Every call
    Always,
    /// First call only, for the lifetime of the registry
    Once,
    /// Once per slow-warning cooldown window
    #[default]
    Throttled,
}

/// Warning behavior, loaded as the `[warnings]` table of the settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningSettings {
    pub enabled: bool,
    pub slow_cooldown_secs: u64,
    pub deprecations: DeprecationPolicy,
}

impl Default for WarningSettings {
    fn default() -> Self {
        WarningSettings {
            enabled: true,
            slow_cooldown_secs: 10,
            deprecations: DeprecationPolicy::Throttled,
        }
    }
}

impl WarningSettings {
    fn cooldown_millis(&self) -> i64 {
        i64::try_from(self.slow_cooldown_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Default)]
struct WarningState {
    last_fired: Option<Timestamp>,
    emitted: u64,
    suppressed: u64,
}

#[derive(Debug)]
struct WarningEntry {
    spec: WarningSpec,
    state: Mutex<WarningState>,
}

/// Per-warning counters, as returned by [`WarningRegistry::report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningReport {
    pub id: &'static str,
    pub kind: WarningKind,
    pub emitted: u64,
    pub suppressed: u64,
}

/// Shared collection of warning states
pub struct WarningRegistry {
    settings: WarningSettings,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<&'static str, Arc<WarningEntry>>>,
}

impl std::fmt::Debug for WarningRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarningRegistry")
            .field("settings", &self.settings)
            .field("warnings", &self.entries.read().len())
            .finish()
    }
}

impl WarningRegistry {
    pub fn new(settings: WarningSettings, clock: Arc<dyn Clock>) -> Self {
        WarningRegistry {
            settings,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &WarningSettings {
        &self.settings
    }

    /// Register a warning ahead of its first fire. Re-registering is a no-op.
    pub fn register(&self, spec: WarningSpec) {
        self.entry(spec);
    }

    /// Fire a warning. Returns true if it was emitted, false if suppressed.
    ///
    /// The emit decision and the state update happen under one lock, so
    /// concurrent fires inside a window cannot both be emitted.
    pub fn warn(&self, spec: &WarningSpec, script: Option<&str>) -> bool {
        let entry = self.entry(*spec);
        let now = self.clock.now();

        let emit = {
            let mut state = entry.state.lock();
            let emit = self.should_emit(spec.kind, &state, now);
            if emit {
                state.last_fired = Some(now);
                state.emitted += 1;
            } else {
                state.suppressed += 1;
            }
            emit
        };

        if emit {
            tracing::warn!(
                warning = spec.id,
                script = script.unwrap_or("<none>"),
                "{}",
                spec.message
            );
        } else {
            tracing::trace!(warning = spec.id, "warning suppressed");
        }
        emit
    }

    fn should_emit(&self, kind: WarningKind, state: &WarningState, now: Timestamp) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let outside_window = |last: Option<Timestamp>| match last {
            None => true,
            Some(last) => {
                now.millis().saturating_sub(last.millis()) >= self.settings.cooldown_millis()
            }
        };
        match kind {
            WarningKind::Standard => true,
            WarningKind::Slow => outside_window(state.last_fired),
            WarningKind::Deprecation => match self.settings.deprecations {
                DeprecationPolicy::Always => true,
                DeprecationPolicy::Once => state.emitted == 0,
                DeprecationPolicy::Throttled => outside_window(state.last_fired),
            },
        }
    }

    fn entry(&self, spec: WarningSpec) -> Arc<WarningEntry> {
        if let Some(entry) = self.entries.read().get(spec.id) {
            return Arc::clone(entry);
        }
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(spec.id).or_insert_with(|| {
            Arc::new(WarningEntry {
                spec,
                state: Mutex::new(WarningState::default()),
            })
        }))
    }

    /// How many times the warning was emitted
    pub fn emitted(&self, id: &str) -> u64 {
        self.entries
            .read()
            .get(id)
            .map_or(0, |entry| entry.state.lock().emitted)
    }

    /// How many fires of the warning were swallowed
    pub fn suppressed(&self, id: &str) -> u64 {
        self.entries
            .read()
            .get(id)
            .map_or(0, |entry| entry.state.lock().suppressed)
    }

    /// Counters for every known warning, sorted by id
    pub fn report(&self) -> Vec<WarningReport> {
        let mut reports: Vec<WarningReport> = self
            .entries
            .read()
            .values()
            .map(|entry| {
                let state = entry.state.lock();
                WarningReport {
                    id: entry.spec.id,
                    kind: entry.spec.kind,
                    emitted: state.emitted,
                    suppressed: state.suppressed,
                }
            })
            .collect();
        reports.sort_by_key(|r| r.id);
        reports
    }

    /// Forget all suppression state and counters
    pub fn reset(&self) {
        for entry in self.entries.read().values() {
            *entry.state.lock() = WarningState::default();
        }
    }
}
