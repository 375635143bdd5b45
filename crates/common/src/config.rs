//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StorylineError, StorylineResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Editing engine defaults.
    #[serde(default)]
    pub editor: EditorDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied when a new editing session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Project frame rate used for frame stepping and frame snapping.
    pub frame_rate: f64,

    /// Maximum number of snapshots kept in the undo history.
    pub history_limit: usize,

    /// Snap radius in screen pixels. Converted to seconds using the
    /// current zoom (pixels per second).
    pub snap_threshold_px: f64,

    /// Whether the playhead is offered as a snap candidate.
    pub snap_to_playhead: bool,

    /// Whether dragged values lock onto frame boundaries first.
    pub frame_snap: bool,

    /// Output aspect ratio, e.g. "16:9" or "9:16".
    pub aspect_ratio: String,

    /// Volume given to background music clips created from scenes.
    pub default_music_volume: f64,

    /// Offset between co-incident assets of one scene (seconds).
    pub asset_stagger_secs: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "storyline=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            history_limit: 50,
            snap_threshold_px: 10.0,
            snap_to_playhead: true,
            frame_snap: false,
            aspect_ratio: "16:9".to_string(),
            default_music_volume: 0.5,
            asset_stagger_secs: 0.1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl EditorDefaults {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> StorylineResult<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(StorylineError::config(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if self.history_limit == 0 {
            return Err(StorylineError::config("history_limit must be at least 1"));
        }
        if !self.snap_threshold_px.is_finite() || self.snap_threshold_px < 0.0 {
            return Err(StorylineError::config(format!(
                "snap_threshold_px must be non-negative, got {}",
                self.snap_threshold_px
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> StorylineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StorylineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.editor.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> StorylineResult<()> {
        self.save_to(config_file_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> StorylineResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("storyline").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_defaults() {
        let defaults = EditorDefaults::default();
        assert!((defaults.frame_rate - 30.0).abs() < 1e-9);
        assert_eq!(defaults.history_limit, 50);
        assert!((defaults.snap_threshold_px - 10.0).abs() < 1e-9);
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"editor":{"frame_rate":24.0}}"#).unwrap();
        assert!((config.editor.frame_rate - 24.0).abs() < 1e-9);
        assert_eq!(config.editor.history_limit, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let defaults = EditorDefaults {
            history_limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            defaults.validate(),
            Err(StorylineError::Config { .. })
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("storyline_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.editor.frame_rate = 25.0;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!((loaded.editor.frame_rate - 25.0).abs() < 1e-9);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = AppConfig::load_from("/nonexistent/storyline/config.json").unwrap_err();
        assert!(matches!(err, StorylineError::FileNotFound { .. }));
    }
}
