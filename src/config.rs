//! Configuration file support for FLT.
//!
//! User preferences are stored as JSON in the platform config directory
//! (`~/.config/flt/flt-config.json` on Linux).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DRAG_THRESHOLD, DEFAULT_SCALE_STEP, HIT_MARGIN};
use crate::model::InteractionController;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Parse a case-insensitive level name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(name))
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Pointer travel before a press becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,

    /// Pen width of the marker and outline hit regions
    #[serde(default = "default_hit_margin")]
    pub hit_margin: f64,

    /// Factor of one scale-up step (scale-down uses the inverse)
    #[serde(default = "default_scale_step")]
    pub scale_step: f64,

    /// Folder of the last opened model file
    #[serde(default)]
    pub last_model_dir: Option<PathBuf>,
}

fn default_drag_threshold() -> f64 {
    DEFAULT_DRAG_THRESHOLD
}

fn default_hit_margin() -> f64 {
    HIT_MARGIN
}

fn default_scale_step() -> f64 {
    DEFAULT_SCALE_STEP
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            drag_threshold: default_drag_threshold(),
            hit_margin: default_hit_margin(),
            scale_step: default_scale_step(),
            last_model_dir: None,
        }
    }
}

impl UserPreferences {
    /// Interaction controller configured from these preferences.
    pub fn interaction(&self) -> InteractionController {
        InteractionController::new(self.drag_threshold, self.hit_margin)
    }

    /// Remember the folder of a model file that was just opened or saved.
    /// Returns true if the remembered folder changed.
    pub fn remember_model_path(&mut self, path: &Path) -> bool {
        let dir = path.parent().map(Path::to_path_buf);
        if self.last_model_dir == dir {
            return false;
        }
        self.last_model_dir = dir;
        true
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "flt-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("flt").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("flt")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from `path`.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Try to load configuration from the default path.
    pub fn load_from_default_path() -> Option<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = AppConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config.preferences, UserPreferences::default());

        let config =
            AppConfig::from_json(r#"{"version": 1, "preferences": {"log_level": "debug"}}"#)
                .unwrap();
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
        assert_eq!(config.preferences.hit_margin, HIT_MARGIN);
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = AppConfig::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(LogLevel::from_name("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("loud"), None);
        assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(AppConfig::default_filename());

        let mut config = AppConfig::new();
        config.preferences.drag_threshold = 8.0;
        assert!(config
            .preferences
            .remember_model_path(Path::new("/faces/model.json")));
        assert!(!config
            .preferences
            .remember_model_path(Path::new("/faces/other.json")));
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.preferences, config.preferences);
        assert_eq!(
            loaded.preferences.last_model_dir,
            Some(PathBuf::from("/faces"))
        );
    }

    #[test]
    fn test_load_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flt-config.json");
        assert!(AppConfig::load_from(&path).is_none());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load_from(&path).is_none());
    }

    #[test]
    fn test_interaction_uses_preferences() {
        use crate::format::ModelSchema;
        use crate::model::{LandmarkModel, Point, PointerEvent};

        let config = AppConfig::from_json(
            r#"{"version": 1, "preferences": {"drag_threshold": 20.0, "hit_margin": 4.0}}"#,
        )
        .unwrap();
        let mut ctl = config.preferences.interaction();
        assert_eq!(ctl.drag_threshold(), 20.0);
        assert_eq!(ctl.hit_margin(), 4.0);

        let mut model: LandmarkModel = LandmarkModel::default();
        model
            .load(ModelSchema::from_groups([(
                "eye",
                vec![Point::new(10.0, 20.0), Point::new(10.0, 120.0)],
            )]))
            .unwrap();

        // Eight units beside a marker: a hit with the default margin only.
        assert!(model.hit_test(Point::new(18.0, 20.0), HIT_MARGIN).is_some());
        assert!(!ctl.handle(&mut model, PointerEvent::Pressed(Point::new(18.0, 20.0))));

        // A 10-unit move stays below the configured threshold.
        ctl.handle(&mut model, PointerEvent::Pressed(Point::new(10.0, 20.0)));
        ctl.handle(&mut model, PointerEvent::Moved(Point::new(20.0, 20.0)));
        assert!(!ctl.state().is_dragging());
        ctl.handle(&mut model, PointerEvent::Moved(Point::new(35.0, 20.0)));
        assert!(ctl.state().is_dragging());
    }
}
