//! # Public API
//!
//! Entry points that run the whole tablature pipeline.
//!
//! ## Pipeline
//! 1. Ingestion - repair malformed notes, drop pitches outside the configured bounds
//! 2. Note filter - remove harmonic artifacts and noise
//! 3. Fingering - assign (string, fret) positions
//! 4. Encoding - any of the `notation` encoders; the LilyPond encoder also quantizes
//!    and groups the events into chords
//!
//! ## Typical Usage
//!
//! ```rust
//! use tabgen::{transcribe_notes, to_text, Note};
//!
//! let notes = vec![
//!     Note::new(0.0, 0.5, 40, 0.9),
//!     Note::new(0.5, 1.0, 45, 0.9),
//! ];
//!
//! let tab = transcribe_notes(&notes, Some(120.0));
//! assert_eq!(tab.events.len(), 2);
//! println!("{}", to_text(&tab));
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust
//! use tabgen::{Note, Transcriber, TranscriptionConfig};
//!
//! let config = TranscriptionConfig::from_yaml_str("tuning: Drop_D\nmin-pitch: 38")?;
//! let transcriber = Transcriber::new(config);
//!
//! let tab = transcriber.transcribe(&[Note::new(0.0, 1.0, 38, 1.0)], None);
//! assert_eq!(tab.events[0].string, 6);
//! assert_eq!(tab.events[0].fret, 0);
//! # Ok::<(), tabgen::TabError>(())
//! ```

use crate::config::TranscriptionConfig;
use crate::error::TabError;
use crate::filter::filter_notes;
use crate::fingering::assign_positions;
use crate::notation::lilypond;
use crate::quantize;
use crate::types::{ChordGroup, Note, RawNote, TabResult};

/// Runs transcriptions with one configuration.
///
/// Holds no state between calls, so one instance can serve any number of
/// independent transcriptions.
#[derive(Debug, Clone, Default)]
pub struct Transcriber {
    config: TranscriptionConfig,
}

impl Transcriber {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    /// Repair detector notes and drop those outside the playable pitch bounds.
    pub fn ingest(&self, notes: &[Note]) -> Vec<Note> {
        notes
            .iter()
            .filter(|n| {
                let in_range = (self.config.min_pitch..=self.config.max_pitch).contains(&n.pitch);
                if !in_range {
                    log::debug!("ignoring out-of-range pitch {} at {:.3}s", n.pitch, n.start);
                }
                in_range
            })
            .filter_map(|n| {
                let repaired = n.normalized(self.config.min_note_duration);
                match repaired {
                    None => log::debug!("ignoring note with non-finite timing: {:?}", n),
                    Some(r) if r != *n => log::debug!("repaired note {:?} -> {:?}", n, r),
                    Some(_) => {}
                }
                repaired
            })
            .collect()
    }

    /// Turn detector notes into positioned tablature.
    ///
    /// `bpm` is the tempo estimate that accompanies the notes, if any; it is stored on
    /// the result for the encoders.
    pub fn transcribe(&self, notes: &[Note], bpm: Option<f64>) -> TabResult {
        let ingested = self.ingest(notes);
        let filtered = filter_notes(&ingested, &self.config.filter);
        let events = assign_positions(&filtered, &self.config.tuning, &self.config.fingering);

        log::info!(
            "transcribed {} notes into {} tab events ({} after ingestion, {} after filtering)",
            notes.len(),
            events.len(),
            ingested.len(),
            filtered.len()
        );

        TabResult::from_tab_events(events, bpm)
    }

    /// Quantize a result and group it into chords.
    pub fn arrange(&self, result: &TabResult) -> Vec<ChordGroup> {
        quantize::arrange(result, &self.config)
    }

    /// LilyPond source for a result, using this transcriber's tuning and grid.
    pub fn to_lilypond(&self, result: &TabResult, title: Option<&str>) -> Result<String, TabError> {
        lilypond::to_lilypond(result, &self.config, title)
    }
}

/// Transcribe with the default configuration (standard tuning).
pub fn transcribe_notes(notes: &[Note], bpm: Option<f64>) -> TabResult {
    Transcriber::default().transcribe(notes, bpm)
}

/// LilyPond source with the default configuration.
///
/// # Errors
/// Returns [`TabError::NothingToEncode`] for a result without events.
pub fn to_lilypond(result: &TabResult, title: Option<&str>) -> Result<String, TabError> {
    Transcriber::default().to_lilypond(result, title)
}

/// Parse a detector note list: a JSON array of objects or `[start, end, pitch, velocity]`
/// tuples.
pub fn parse_notes(content: &str) -> Result<Vec<Note>, TabError> {
    let raw: Vec<RawNote> =
        serde_json::from_str(content).map_err(|e| TabError::InputError(e.to_string()))?;
    Ok(raw.into_iter().map(Note::from).collect())
}
