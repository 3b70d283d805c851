//! # Core Types
//!
//! Data carried between the stages of the tablature engine.
//!
//! ## Lifecycle
//! ```text
//! Note (from the pitch detector)
//!   └── filter::filter_notes          -> Vec<Note> (time-ascending)
//!         └── fingering::assign_positions -> Vec<TabEvent>
//!               └── TabResult { events, bpm }
//!                     ├── notation::ascii / structured / svg
//!                     └── quantize::arrange -> Vec<ChordGroup>
//!                           └── notation::lilypond
//! ```
//!
//! No value is mutated once the stage that produced it has finished; every stage
//! builds a fresh collection for the next one.
//!
//! ## Units
//! - `Note` and `TabEvent` times are in **seconds**
//! - `QuantizedEvent` and `ChordGroup` times are in **beats**
//! - Strings are numbered 1-6, string 1 being the highest-pitched

use serde::{Deserialize, Serialize};

/// A note produced by the external pitch detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub start: f64,
    pub end: f64,
    pub pitch: i32, // MIDI note number
    pub velocity: f64,
}

impl Note {
    pub fn new(start: f64, end: f64, pitch: i32, velocity: f64) -> Self {
        Self {
            start,
            end,
            pitch,
            velocity,
        }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Repair a detector note so downstream stages can rely on `end > start`.
    ///
    /// - Negative start clamps to 0
    /// - `end <= start` becomes `start + min_duration`
    /// - Velocity clamps into [0, 1]
    /// - Non-finite timestamps cannot be repaired and yield `None`
    pub fn normalized(self, min_duration: f64) -> Option<Note> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return None;
        }

        let start = self.start.max(0.0);
        let end = if self.end <= start {
            start + min_duration
        } else {
            self.end
        };
        let velocity = if self.velocity.is_finite() {
            self.velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(Note {
            start,
            end,
            pitch: self.pitch,
            velocity,
        })
    }
}

/// Raw note for JSON deserialization.
///
/// The detector emits either keyed objects or bare `[start, end, pitch, velocity]` tuples.
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(untagged)]
pub enum RawNote {
    Keyed {
        start: f64,
        end: f64,
        pitch: i32,
        #[serde(default = "default_velocity")]
        velocity: f64,
    },
    Tuple(f64, f64, i32, f64),
}

fn default_velocity() -> f64 {
    1.0
}

impl From<RawNote> for Note {
    fn from(raw: RawNote) -> Self {
        match raw {
            RawNote::Keyed {
                start,
                end,
                pitch,
                velocity,
            } => Note::new(start, end, pitch, velocity),
            RawNote::Tuple(start, end, pitch, velocity) => Note::new(start, end, pitch, velocity),
        }
    }
}

/// A note placed on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabEvent {
    pub string: u8, // 1 (high E in standard tuning) to 6
    pub fret: u8,   // 0 = open string
    pub start: f64,
    pub end: f64,
}

/// Final tablature handed to the encoders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabResult {
    pub events: Vec<TabEvent>,
    pub bpm: Option<f64>,
}

impl TabResult {
    /// Build a result from already-positioned events.
    ///
    /// Events are kept in time order; a stable sort keeps equal-start events in the
    /// order they were given.
    pub fn from_tab_events(events: Vec<TabEvent>, bpm: Option<f64>) -> Self {
        let mut events = events;
        events.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { events, bpm }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in ascending start order without touching `self`
    pub fn sorted_events(&self) -> Vec<TabEvent> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.start.total_cmp(&b.start));
        events
    }
}

/// A tab event with its timing snapped to the beat grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedEvent {
    pub start_beats: f64,
    pub end_beats: f64,
    pub pitch: i32,
    pub source_event: TabEvent,
}

impl QuantizedEvent {
    pub fn string(&self) -> u8 {
        self.source_event.string
    }
}

/// Events that sound together.
///
/// All members start within the chord tolerance of `start_beats`; `end_beats` is the
/// longest member's end, possibly extended by legato correction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordGroup {
    pub start_beats: f64,
    pub end_beats: f64,
    pub members: Vec<QuantizedEvent>,
}

impl ChordGroup {
    pub fn length_beats(&self) -> f64 {
        self.end_beats - self.start_beats
    }

    pub fn is_chord(&self) -> bool {
        self.members.len() > 1
    }
}
