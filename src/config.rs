//! Session configuration
//!
//! Every section carries `#[serde(default)]`, so a config file only has to
//! name the values it changes. Defaults reproduce the arcade cabinet build:
//! a 420x380 screen at 60 fps with the stock effect intensities.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::effects::EffectParameters;
use crate::error::GameError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub effects: EffectsConfig,
    pub puzzle: PuzzleConfig,
    pub timing: TimingConfig,
    pub controls: ControlsConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    /// Logical framebuffer size; the window is `window_scale` times larger
    pub width: u32,
    pub height: u32,
    pub window_scale: u32,
    pub fps: u32,
    pub vsync: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Access Tuner".to_string(),
            width: 420,
            height: 380,
            window_scale: 2,
            fps: 60,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Static density on the "NO SIGNAL" screen
    pub idle_noise: f64,
    /// Intensities restored when a session starts
    pub baseline: EffectParameters,
    pub bloom_threshold: u8,
    pub bloom_factor: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            idle_noise: 0.4,
            baseline: EffectParameters::default(),
            bloom_threshold: 200,
            bloom_factor: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Target windows are fractions of the bar width
    pub max_range_length: f64,
    pub min_range_length: f64,
    /// Indicator width in pixels
    pub marker_width: i32,
    /// Milliseconds the indicator needs to advance one pixel
    pub marker_ms_per_px: u64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            max_range_length: 0.3,
            min_range_length: 0.1,
            marker_width: 10,
            marker_ms_per_px: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub cooldown_ms: u64,
    pub granted_hold_ms: u64,
    pub denied_hold_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 200,
            granted_hold_ms: 3000,
            denied_hold_ms: 500,
        }
    }
}

/// Key names use SDL scancode names ("Return", "Space", "Escape", "F")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub start_key: String,
    pub action_key: String,
    pub quit_key: String,
    pub fps_key: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            start_key: "Return".to_string(),
            action_key: "Space".to_string(),
            quit_key: "Escape".to_string(),
            fps_key: "F".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub sounds_dir: PathBuf,
    pub ambient: String,
    pub glitches: [String; 2],
    pub confirm: String,
    pub glitch_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sounds_dir: PathBuf::from("assets/sounds"),
            ambient: "static.wav".to_string(),
            glitches: ["glitch.wav".to_string(), "glitch_2.wav".to_string()],
            confirm: "blip.wav".to_string(),
            glitch_volume: 0.1,
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the layout or the range generator cannot work with
    pub fn validate(&self) -> Result<(), GameError> {
        let puzzle = &self.puzzle;
        if !(0.0 < puzzle.min_range_length
            && puzzle.min_range_length < puzzle.max_range_length
            && puzzle.max_range_length < 1.0)
        {
            return Err(GameError::InvalidConfig(format!(
                "range lengths must satisfy 0 < min ({}) < max ({}) < 1",
                puzzle.min_range_length, puzzle.max_range_length
            )));
        }
        if puzzle.marker_width <= 0 {
            return Err(GameError::InvalidConfig("marker_width must be positive".to_string()));
        }
        let display = &self.display;
        if display.width < 100 || display.height < 100 {
            return Err(GameError::InvalidConfig(format!(
                "screen {}x{} is too small, need at least 100x100",
                display.width, display.height
            )));
        }
        Ok(())
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| GameError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_json(r#"{ "timing": { "cooldown_ms": 350 } }"#).unwrap();
        assert_eq!(config.timing.cooldown_ms, 350);
        assert_eq!(config.timing.denied_hold_ms, 500);
        assert_eq!(config.display.width, 420);
        assert_eq!(config.effects.bloom_threshold, 200);
    }

    #[test]
    fn test_baseline_intensities_override() {
        let json = r#"{ "effects": { "baseline": { "noise": 0.001, "shift": 0.5 } } }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.effects.baseline.noise, 0.001);
        assert_eq!(config.effects.baseline.shift, 0.5);
        assert_eq!(config.effects.baseline.dropout, 0.0005);
    }

    #[test]
    fn test_json_survives_save_format() {
        let mut config = Config::default();
        config.audio.enabled = false;
        config.puzzle.marker_width = 14;
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed = Config::from_json(&json).unwrap();
        assert!(!parsed.audio.enabled);
        assert_eq!(parsed.puzzle.marker_width, 14);
    }

    #[test]
    fn test_validate_rejects_inverted_range_lengths() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.puzzle.min_range_length = 0.4;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
        config.puzzle.min_range_length = 0.1;
        config.puzzle.max_range_length = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::load("/nonexistent/access-tuner.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/access-tuner.json"));
    }
}
