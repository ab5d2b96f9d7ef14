//! Configuration management

use crate::domain::warnings::WarningSettings;
use crate::error::{FlagTagError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that can switch warnings off ("off", "0", "false")
pub const WARNINGS_ENV: &str = "FLAGTAG_WARNINGS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub warnings: WarningSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FlagTagError::Config(format!("Settings file not found: {}", path.display()))
            } else {
                FlagTagError::Io(e)
            }
        })?;
        Self::from_toml(&contents)
    }

    /// Parse settings from TOML text; missing fields take their defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| FlagTagError::Config(format!("Failed to parse settings: {}", e)))
    }

    /// Load from `path` if given, else defaults, then apply the environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::load(path)?,
            None => Settings::default(),
        };
        settings.apply_env(std::env::var(WARNINGS_ENV).ok().as_deref());
        Ok(settings)
    }

    /// Apply the value of [`WARNINGS_ENV`], if set
    fn apply_env(&mut self, warnings: Option<&str>) {
        if let Some(value) = warnings {
            match value.trim().to_lowercase().as_str() {
                "off" | "0" | "false" => self.warnings.enabled = false,
                "on" | "1" | "true" => self.warnings.enabled = true,
                other => tracing::warn!("Ignoring unrecognized {}={}", WARNINGS_ENV, other),
            }
        }
    }
}
