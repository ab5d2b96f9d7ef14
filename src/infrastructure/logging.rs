//! Logging setup
//!
//! Warnings and tag diagnostics are emitted through `tracing`. The binary
//! installs a compact stderr subscriber; library users bring their own.

use crate::error::{FlagTagError, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default level: warnings only, or debug when verbose
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Build the filter from `RUST_LOG`, falling back to the default level
pub fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy()
}

/// Install the global subscriber, writing to stderr
///
/// Fails if a global subscriber is already set.
pub fn init(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_env_filter(verbose))
        .with(
            layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| FlagTagError::Logging(e.to_string()))
}
