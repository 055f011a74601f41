//! Editor configuration for Battlemap
//!
//! Configuration is organized into sections:
//! - Drawing defaults (color, stroke width, eraser and text sizes)
//! - Undo history limits
//! - Map file persistence
//!
//! Files are JSON or TOML, chosen by extension. Every section has defaults,
//! so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Drawing defaults for new shapes and tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// ARGB color for new strokes
    pub default_color: u32,
    /// Stroke width for new shapes, in world units
    pub default_stroke_width: f64,
    /// Eraser radius, in world units
    pub eraser_radius: f64,
    /// Text size for new labels, in screen units
    pub default_text_size: f64,
    /// Extra reach of hit tests, in world units
    pub hit_tolerance: f64,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            default_color: 0xFF00_0000,
            default_stroke_width: 0.05,
            eraser_radius: 0.25,
            default_text_size: 18.0,
            hit_tolerance: 0.1,
        }
    }
}

/// Undo history limits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo steps per history; unbounded when absent
    pub max_undo_depth: Option<usize>,
}

/// Where and how maps are saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Extension given to new map files, without the dot
    pub map_extension: String,
    /// Directory new maps are saved to; the platform data directory when absent
    pub data_directory: Option<PathBuf>,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            map_extension: "map".to_string(),
            data_directory: None,
        }
    }
}

impl PersistenceSettings {
    /// The configured data directory, or `<data_dir>/battlemap`.
    pub fn resolved_data_directory(&self) -> Option<PathBuf> {
        self.data_directory
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("battlemap")))
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub drawing: DrawingSettings,
    pub history: HistorySettings,
    pub persistence: PersistenceSettings,
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/battlemap/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("battlemap").join("config.toml"))
            .ok_or_else(|| ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = format_of(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let drawing = &self.drawing;
        let positive = [
            ("drawing.default_stroke_width", drawing.default_stroke_width),
            ("drawing.eraser_radius", drawing.eraser_radius),
            ("drawing.default_text_size", drawing.default_text_size),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::out_of_range(key, value));
            }
        }

        if !(drawing.hit_tolerance.is_finite() && drawing.hit_tolerance >= 0.0) {
            return Err(ConfigError::out_of_range(
                "drawing.hit_tolerance",
                drawing.hit_tolerance,
            ));
        }

        if self.history.max_undo_depth == Some(0) {
            return Err(ConfigError::out_of_range("history.max_undo_depth", 0));
        }

        let extension = &self.persistence.map_extension;
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::out_of_range(
                "persistence.map_extension",
                extension,
            ));
        }

        Ok(())
    }
}
