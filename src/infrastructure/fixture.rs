//! Flag fixtures: a TOML description of an object and its flags
//!
//! ```toml
//! name = "npc"
//!
//! [[flag]]
//! key = "score"
//! value = 42
//!
//! [[flag]]
//! key = "temp"
//! value = "x"
//! expires_in_secs = 10
//! ```

use crate::domain::time::{Clock, Timestamp};
use crate::domain::{FlagHolder, FlagTracker, Value};
use crate::error::{FlagTagError, Result};
use chrono::Duration;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_NAME: &str = "fixture";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    name: Option<String>,
    #[serde(default, rename = "flag")]
    flags: Vec<FlagEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlagEntry {
    key: String,
    value: toml::Value,
    expires: Option<toml::Value>,
    expires_in_secs: Option<i64>,
}

/// Load a fixture file into a new [`FlagHolder`]
pub fn load_fixture(path: &Path, clock: Arc<dyn Clock>) -> Result<FlagHolder> {
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FlagTagError::Fixture(format!("file not found: {}", path.display()))
        } else {
            FlagTagError::Io(e)
        }
    })?;
    fixture_from_toml(&contents, clock)
}

/// Build a [`FlagHolder`] from fixture TOML text
pub fn fixture_from_toml(contents: &str, clock: Arc<dyn Clock>) -> Result<FlagHolder> {
    let file: FixtureFile =
        toml::from_str(contents).map_err(|e| FlagTagError::Fixture(e.to_string()))?;

    let now = clock.now();
    let holder = FlagHolder::new(
        file.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        clock,
    );

    for entry in file.flags {
        if entry.key.is_empty() {
            return Err(FlagTagError::Fixture("flag key must not be empty".to_string()));
        }
        let expiration = expiration_of(&entry, now)?;
        let value = value_from_toml(entry.value)
            .map_err(|reason| FlagTagError::Fixture(format!("flag '{}': {}", entry.key, reason)))?;
        holder.flags().set_flag(&entry.key, value, expiration);
    }

    tracing::debug!(
        object = holder.name(),
        flags = holder.flags().stored_len(),
        "loaded flag fixture"
    );
    Ok(holder)
}

fn expiration_of(entry: &FlagEntry, now: Timestamp) -> Result<Option<Timestamp>> {
    match (&entry.expires, entry.expires_in_secs) {
        (Some(_), Some(_)) => Err(FlagTagError::Fixture(format!(
            "flag '{}': use either expires or expires_in_secs, not both",
            entry.key
        ))),
        (Some(expires), None) => {
            let text = match expires {
                toml::Value::String(s) => s.clone(),
                toml::Value::Datetime(dt) => dt.to_string(),
                other => other.to_string(),
            };
            Timestamp::parse(&text).map(Some).ok_or_else(|| {
                FlagTagError::Fixture(format!(
                    "flag '{}': expires must be an RFC 3339 instant, got {}",
                    entry.key, text
                ))
            })
        }
        (None, Some(secs)) => Duration::try_seconds(secs)
            .map(|span| Some(now.plus(span)))
            .ok_or_else(|| {
                FlagTagError::Fixture(format!(
                    "flag '{}': expires_in_secs out of range",
                    entry.key
                ))
            }),
        (None, None) => Ok(None),
    }
}

/// Convert a TOML value into a flag value
fn value_from_toml(value: toml::Value) -> std::result::Result<Value, String> {
    match value {
        toml::Value::Boolean(b) => Ok(Value::Boolean(b)),
        toml::Value::Integer(i) => Ok(Value::Integer(i)),
        toml::Value::Float(f) => Ok(Value::Decimal(f)),
        toml::Value::String(s) => Ok(Value::Element(s)),
        toml::Value::Datetime(dt) => Timestamp::parse(&dt.to_string())
            .map(Value::Time)
            .ok_or_else(|| format!("datetime {} has no offset", dt)),
        toml::Value::Array(items) => items
            .into_iter()
            .map(value_from_toml)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List),
        toml::Value::Table(_) => Err("tables are not supported as flag values".to_string()),
    }
}
