//! Infrastructure layer - Settings, fixtures and logging

pub mod config;
pub mod fixture;
pub mod logging;

pub use config::Settings;
pub use fixture::{fixture_from_toml, load_fixture};
