//! Error types for flagtag

use thiserror::Error;

/// Main error type for flagtag
///
/// Tag evaluation itself never fails with this type: a tag that cannot be
/// answered yields no value plus a diagnostic. These errors cover the
/// surrounding plumbing (parsing, fixtures, configuration, I/O).
#[derive(Debug, Error)]
pub enum FlagTagError {
    #[error("Invalid tag '{input}': {reason} (at position {position})")]
    Parse {
        input: String,
        position: usize,
        reason: String,
    },

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl FlagTagError {
    /// Build a parse error for `input` at byte `position`
    pub fn parse(input: &str, position: usize, reason: impl Into<String>) -> Self {
        FlagTagError::Parse {
            input: input.to_string(),
            position,
            reason: reason.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FlagTagError::Fixture(_) => 2,
            FlagTagError::Parse { .. } => 3,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            FlagTagError::Parse { .. } => {
                format!(
                    "{}\n\n\
                    Tag syntax:\n\
                    • Segments are separated by dots: has_flag[score]\n\
                    • Segment names use letters and underscores only\n\
                    • Inputs go in brackets, which must be balanced: flag[my_flag]\n\
                    • The whole tag may be wrapped in angle brackets: <flag[score]>",
                    self
                )
            }
            FlagTagError::Fixture(msg) => {
                format!(
                    "Fixture error: {}\n\n\
                    Expected format:\n\
                    [[flag]]\n\
                    key = \"score\"\n\
                    value = 42\n\
                    expires_in_secs = 10   # optional",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using FlagTagError
pub type Result<T> = std::result::Result<T, FlagTagError>;
