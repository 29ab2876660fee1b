use crate::control::gesture::DEFAULT_DEAD_ZONE;
use crate::control::speed::{DEFAULT_LONG_PRESS_SPEED, DEFAULT_SPEEDS};
use crate::error::{CueSyncError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Which parser a file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Captions,
    Transcript,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Captions => write!(f, "captions"),
            TrackKind::Transcript => write!(f, "transcript"),
        }
    }
}

impl std::str::FromStr for TrackKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "captions" | "subtitles" => Ok(TrackKind::Captions),
            "transcript" => Ok(TrackKind::Transcript),
            _ => Err(format!(
                "Unknown track kind: {}. Use 'captions' or 'transcript'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Srt,
    Vtt,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Use 'srt', 'vtt', or 'json'",
                s
            )),
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Drag distance before a gesture is assigned to an axis.
    pub dead_zone: f32,
    /// Speed applied while long-pressing.
    pub long_press_speed: f32,
    /// Jump made by a double tap, in milliseconds.
    pub double_tap_seek_ms: u64,
    /// Speed presets, in cycling order.
    pub available_speeds: Vec<f32>,
    /// Playback clock period used by `play`.
    pub tick_interval_ms: u64,
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
            long_press_speed: DEFAULT_LONG_PRESS_SPEED,
            double_tap_seek_ms: 15_000,
            available_speeds: DEFAULT_SPEEDS.to_vec(),
            tick_interval_ms: 200,
            default_format: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                match Self::from_toml(&contents) {
                    Ok(file_config) => config = file_config,
                    Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Override fields from `CUESYNC_*` environment variables.
    fn apply_env(&mut self) {
        if let Ok(dead_zone) = std::env::var("CUESYNC_DEAD_ZONE") {
            if let Ok(d) = dead_zone.parse() {
                self.dead_zone = d;
            }
        }
        if let Ok(speed) = std::env::var("CUESYNC_LONG_PRESS_SPEED") {
            if let Ok(s) = speed.parse() {
                self.long_press_speed = s;
            }
        }
        if let Ok(tick) = std::env::var("CUESYNC_TICK_INTERVAL_MS") {
            if let Ok(t) = tick.parse() {
                self.tick_interval_ms = t;
            }
        }
        if let Ok(format) = std::env::var("CUESYNC_DEFAULT_FORMAT") {
            if let Ok(f) = format.parse() {
                self.default_format = f;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dead_zone.is_finite() || self.dead_zone < 0.0 {
            return Err(CueSyncError::Config(
                "dead_zone must be zero or greater".to_string(),
            ));
        }

        if !is_valid_speed(self.long_press_speed) {
            return Err(CueSyncError::Config(
                "long_press_speed must be greater than 0".to_string(),
            ));
        }

        if self.available_speeds.is_empty() {
            return Err(CueSyncError::Config(
                "available_speeds must list at least one speed".to_string(),
            ));
        }

        if let Some(speed) = self.available_speeds.iter().find(|s| !is_valid_speed(**s)) {
            return Err(CueSyncError::Config(format!(
                "available_speeds contains invalid speed {}",
                speed
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(CueSyncError::Config(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cuesync").join("config.toml"))
    }
}

fn is_valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_kind_parsing() {
        assert_eq!("captions".parse::<TrackKind>().unwrap(), TrackKind::Captions);
        assert_eq!("Subtitles".parse::<TrackKind>().unwrap(), TrackKind::Captions);
        assert_eq!("TRANSCRIPT".parse::<TrackKind>().unwrap(), TrackKind::Transcript);
        assert!("lyrics".parse::<TrackKind>().is_err());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("srt".parse::<OutputFormat>().unwrap(), OutputFormat::Srt);
        assert_eq!("vtt".parse::<OutputFormat>().unwrap(), OutputFormat::Vtt);
        assert_eq!("WebVTT".parse::<OutputFormat>().unwrap(), OutputFormat::Vtt);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("txt".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Srt.extension(), "srt");
        assert_eq!(OutputFormat::Vtt.extension(), "vtt");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dead_zone, 20.0);
        assert_eq!(config.long_press_speed, 2.5);
        assert_eq!(config.double_tap_seek_ms, 15_000);
        assert_eq!(config.available_speeds.len(), 8);
        assert_eq!(config.tick_interval_ms, 200);
        assert_eq!(config.default_format, OutputFormat::Srt);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("dead_zone = 12.5\ndefault_format = \"vtt\"\n").unwrap();
        assert_eq!(config.dead_zone, 12.5);
        assert_eq!(config.default_format, OutputFormat::Vtt);
        assert_eq!(config.tick_interval_ms, 200);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("dead_zone = \"wide\""),
            Err(CueSyncError::Toml(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.dead_zone = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.available_speeds.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.available_speeds.push(0.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.long_press_speed = f32::NAN;
        assert!(config.validate().is_err());
    }
}
