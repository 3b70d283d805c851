//! # Configuration
//!
//! Every tunable constant of the engine, with defaults matching the reference behavior.
//!
//! ## YAML Format
//! All keys are optional and kebab-case. Omitted keys keep their defaults.
//! ```yaml
//! tuning: Drop_D            # preset name, or a list of six pitches, string 1 first
//! min-pitch: 40
//! max-pitch: 88
//! default-bpm: 120
//! filter:
//!   coincidence-window: 0.05
//!   perfect-velocity-ratio: 0.8
//! fingering:
//!   max-fret: 20
//!   high-fret-threshold: 12
//! quantize:
//!   grids: [0.25, 0.3333333333333333, 0.16666666666666666, 0.125]
//!   legato-threshold: 1.0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::TabError;
use crate::tuning::Tuning;

/// Harmonic-artifact and noise filtering (all times in seconds)
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Notes starting within this window of a group's first note join the group
    pub coincidence_window: f64,
    /// Octave and fifth intervals above the root (semitones)
    pub perfect_intervals: Vec<i32>,
    /// Perfect-interval members quieter than this fraction of the root are dropped
    pub perfect_velocity_ratio: f64,
    /// Major-third equivalents above the root (semitones)
    pub third_intervals: Vec<i32>,
    pub third_velocity_ratio: f64,
    /// Notes shorter than this are dropped
    pub min_duration: f64,
    /// Notes above this pitch and quieter than `noise_velocity` are treated as noise
    pub noise_pitch: i32,
    pub noise_velocity: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            coincidence_window: 0.05,
            perfect_intervals: vec![12, 24, 7, 19],
            perfect_velocity_ratio: 0.8,
            third_intervals: vec![4, 16],
            third_velocity_ratio: 0.5,
            min_duration: 0.05,
            noise_pitch: 75,
            noise_velocity: 0.3,
        }
    }
}

/// Cost model for fret selection
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct FingeringConfig {
    pub max_fret: u8,
    /// Frets above this cost `(fret - threshold) * multiplier` extra
    pub high_fret_threshold: u8,
    pub high_fret_multiplier: u32,
}

impl Default for FingeringConfig {
    fn default() -> Self {
        Self {
            max_fret: 20,
            high_fret_threshold: 12,
            high_fret_multiplier: 2,
        }
    }
}

/// Beat grid, chord grouping and legato settings (all values in beats)
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct QuantizeConfig {
    /// Candidate grid spacings, evaluated in order; ties keep the earlier spacing
    pub grids: Vec<f64>,
    /// Length given to events that quantize to zero or negative length
    pub min_length: f64,
    /// Events whose quantized starts differ by less than this form one chord
    pub chord_tolerance: f64,
    /// Gaps shorter than this are absorbed into the previous group
    pub legato_threshold: f64,
    /// Gaps longer than this become explicit rests in typeset output
    pub rest_threshold: f64,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            grids: vec![1.0 / 4.0, 1.0 / 3.0, 1.0 / 6.0, 1.0 / 8.0],
            min_length: 1.0 / 8.0,
            chord_tolerance: 0.01,
            legato_threshold: 1.0,
            rest_threshold: 0.05,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionConfig {
    pub tuning: Tuning,
    /// Detector notes outside [min_pitch, max_pitch] are discarded at ingestion
    pub min_pitch: i32,
    pub max_pitch: i32,
    /// Duration given to notes whose end does not follow their start (seconds)
    pub min_note_duration: f64,
    /// Tempo used when no estimate accompanies the notes
    pub default_bpm: f64,
    pub filter: FilterConfig,
    pub fingering: FingeringConfig,
    pub quantize: QuantizeConfig,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::standard(),
            min_pitch: 40,
            max_pitch: 88,
            min_note_duration: 0.05,
            default_bpm: 120.0,
            filter: FilterConfig::default(),
            fingering: FingeringConfig::default(),
            quantize: QuantizeConfig::default(),
        }
    }
}

/// Tuning as written in YAML: a preset name or an explicit pitch list
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawTuning {
    Name(String),
    Pitches(Vec<i32>),
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawConfig {
    pub tuning: Option<RawTuning>,
    pub min_pitch: Option<i32>,
    pub max_pitch: Option<i32>,
    pub min_note_duration: Option<f64>,
    pub default_bpm: Option<f64>,
    pub filter: Option<FilterConfig>,
    pub fingering: Option<FingeringConfig>,
    pub quantize: Option<QuantizeConfig>,
}

impl TranscriptionConfig {
    /// Parse and validate a YAML configuration document.
    pub fn from_yaml_str(content: &str) -> Result<Self, TabError> {
        // An empty document deserializes to unit, not a map
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| TabError::ConfigError(e.to_string()))?
        };

        let defaults = Self::default();
        let tuning = match raw.tuning {
            Some(RawTuning::Name(name)) => Tuning::from_name(&name)
                .ok_or_else(|| TabError::ConfigError(format!("Unknown tuning: {}", name)))?,
            Some(RawTuning::Pitches(pitches)) => Tuning::from_pitches("custom", &pitches)?,
            None => defaults.tuning,
        };

        let config = Self {
            tuning,
            min_pitch: raw.min_pitch.unwrap_or(defaults.min_pitch),
            max_pitch: raw.max_pitch.unwrap_or(defaults.max_pitch),
            min_note_duration: raw.min_note_duration.unwrap_or(defaults.min_note_duration),
            default_bpm: raw.default_bpm.unwrap_or(defaults.default_bpm),
            filter: raw.filter.unwrap_or(defaults.filter),
            fingering: raw.fingering.unwrap_or(defaults.fingering),
            quantize: raw.quantize.unwrap_or(defaults.quantize),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TabError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Check the settings for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), TabError> {
        if self.min_pitch > self.max_pitch {
            return Err(TabError::ConfigError(format!(
                "min-pitch ({}) is above max-pitch ({})",
                self.min_pitch, self.max_pitch
            )));
        }
        if !(self.default_bpm.is_finite() && self.default_bpm > 0.0) {
            return Err(TabError::ConfigError(format!(
                "default-bpm must be positive, got {}",
                self.default_bpm
            )));
        }
        if !(self.min_note_duration > 0.0) {
            return Err(TabError::ConfigError(
                "min-note-duration must be positive".to_string(),
            ));
        }
        if self.quantize.grids.is_empty() {
            return Err(TabError::ConfigError(
                "quantize.grids must list at least one spacing".to_string(),
            ));
        }
        if let Some(g) = self.quantize.grids.iter().find(|g| !(g.is_finite() && **g > 0.0)) {
            return Err(TabError::ConfigError(format!(
                "quantize.grids entries must be positive, got {}",
                g
            )));
        }
        if !(self.quantize.min_length > 0.0) {
            return Err(TabError::ConfigError(
                "quantize.min-length must be positive".to_string(),
            ));
        }
        if self.fingering.high_fret_threshold > self.fingering.max_fret {
            return Err(TabError::ConfigError(format!(
                "fingering.high-fret-threshold ({}) exceeds max-fret ({})",
                self.fingering.high_fret_threshold, self.fingering.max_fret
            )));
        }
        Ok(())
    }

    /// Tempo to use for a result: its own estimate when present and usable
    pub fn effective_bpm(&self, bpm: Option<f64>) -> f64 {
        match bpm {
            Some(b) if b.is_finite() && b > 0.0 => b,
            _ => self.default_bpm,
        }
    }
}
