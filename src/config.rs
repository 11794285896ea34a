//! Settings for the chordsheet CLI
//!
//! Sources, highest priority first:
//! 1. Command-line arguments (`--bpm`, `--no-color`)
//! 2. TOML settings file (`--config` or `CHORDSHEET_CONFIG`)
//! 3. Built-in defaults
//!
//! Every table and field in the file is optional.

use anyhow::{Context, Result};
use chordsheet_core::types::tempo::{Bpm, DEFAULT_BPM};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub metronome: MetronomeSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

/// Click track configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetronomeSettings {
    /// Tempo used when no song is loaded
    pub bpm: u32,
    /// Pitch of the click in Hz
    pub click_frequency: f32,
    /// Length of the click envelope in milliseconds
    pub click_duration_ms: u32,
    /// Output gain (0.0-1.0)
    pub volume: f32,
    /// Play the audible click
    pub sound: bool,
    /// Print a flash on every beat
    pub visual: bool,
}

impl MetronomeSettings {
    pub fn bpm(&self) -> Bpm {
        Bpm::new(self.bpm)
    }
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        MetronomeSettings {
            bpm: DEFAULT_BPM,
            click_frequency: 880.0,
            click_duration_ms: 50,
            volume: 1.0,
            sound: true,
            visual: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Highlight chords and section labels
    pub color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings { color: true }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid settings file")
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// Read settings from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Default `tracing` filter directive for this crate
    pub fn log_filter(&self) -> String {
        format!("chordsheet={}", self.logging.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.metronome.click_frequency, 880.0);
        assert_eq!(settings.metronome.click_duration_ms, 50);
        assert!(settings.display.color);
    }

    #[test]
    fn test_partial_tables() {
        let settings = Settings::from_toml_str(
            r#"
            [metronome]
            bpm = 72
            visual = false

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(settings.metronome.bpm().get(), 72);
        assert!(!settings.metronome.visual);
        assert!(settings.metronome.sound);
        assert_eq!(settings.log_filter(), "chordsheet=debug");
    }

    #[test]
    fn test_out_of_range_bpm_is_clamped_on_use() {
        let settings = Settings::from_toml_str("[metronome]\nbpm = 1000").unwrap();
        assert_eq!(settings.metronome.bpm().get(), Bpm::MAX);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(Settings::from_toml_str("[metronome]\nbpm = \"fast\"").is_err());
    }
}
