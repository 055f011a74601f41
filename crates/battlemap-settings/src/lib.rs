//! Battlemap Settings Crate
//!
//! Editor configuration: drawing defaults, undo history limits and where
//! maps are kept, loaded from TOML or JSON.

pub mod config;
pub mod error;

pub use config::{Config, DrawingSettings, HistorySettings, PersistenceSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
