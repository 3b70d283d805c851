//! # LilyPond Source Generation
//!
//! Writes a `.ly` score with a standard staff and a tab staff sharing one music
//! expression, ready for the `lilypond` program (see `render`).
//!
//! ## Token Rules
//! - One token per chord group from `quantize::arrange`
//! - Single note: `<pitch><duration>\<string>`, e.g. `e,4\6`
//! - Chord: `<<pitch>\<string> ...><duration>`, e.g. `<e,\6 b,\5>4`
//! - Rest: `r<duration>` for the lead-in and for every gap left after legato correction
//!   longer than `rest_threshold`
//! - Durations are the nearest of whole to thirty-second; equal distances pick the
//!   longer value
//! - Eight tokens per line
//!
//! ## Pitch Spelling
//! Sharps only (`c cis d dis e f fis g gis a ais b`). The unmarked octave is MIDI 48-59;
//! each `'` raises and each `,` lowers by an octave, so MIDI 40 is `e,` and 64 is `e'`.

use crate::config::TranscriptionConfig;
use crate::error::TabError;
use crate::quantize::{arrange, gap_between};
use crate::tuning::Tuning;
use crate::types::{ChordGroup, TabResult};

pub const LILYPOND_VERSION: &str = "2.24.0";

/// Tokens per line of the music block
const TOKENS_PER_LINE: usize = 8;

const PITCH_NAMES: [&str; 12] = [
    "c", "cis", "d", "dis", "e", "f", "fis", "g", "gis", "a", "ais", "b",
];

/// Note values available for duration tokens, longest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteValue {
    pub const ALL: [NoteValue; 6] = [
        NoteValue::Whole,
        NoteValue::Half,
        NoteValue::Quarter,
        NoteValue::Eighth,
        NoteValue::Sixteenth,
        NoteValue::ThirtySecond,
    ];

    /// Length in quarter-note beats
    pub fn beats(&self) -> f64 {
        match self {
            NoteValue::Whole => 4.0,
            NoteValue::Half => 2.0,
            NoteValue::Quarter => 1.0,
            NoteValue::Eighth => 0.5,
            NoteValue::Sixteenth => 0.25,
            NoteValue::ThirtySecond => 0.125,
        }
    }

    pub fn lilypond_token(&self) -> &'static str {
        match self {
            NoteValue::Whole => "1",
            NoteValue::Half => "2",
            NoteValue::Quarter => "4",
            NoteValue::Eighth => "8",
            NoteValue::Sixteenth => "16",
            NoteValue::ThirtySecond => "32",
        }
    }

    /// Closest note value to a length in beats
    pub fn nearest(beats: f64) -> NoteValue {
        let mut best = NoteValue::Whole;
        let mut best_error = f64::INFINITY;
        for value in NoteValue::ALL {
            let error = (value.beats() - beats).abs();
            if error < best_error {
                best = value;
                best_error = error;
            }
        }
        best
    }
}

/// LilyPond absolute pitch name for a MIDI note
pub fn pitch_name(pitch: i32) -> String {
    let name = PITCH_NAMES[pitch.rem_euclid(12) as usize];
    let octave = pitch.div_euclid(12) - 4;

    let mut spelled = name.to_string();
    if octave > 0 {
        spelled.push_str(&"'".repeat(octave as usize));
    } else if octave < 0 {
        spelled.push_str(&",".repeat(octave.unsigned_abs() as usize));
    }
    spelled
}

fn rest_token(beats: f64) -> String {
    format!("r{}", NoteValue::nearest(beats).lilypond_token())
}

fn group_token(group: &ChordGroup) -> String {
    let duration = NoteValue::nearest(group.length_beats()).lilypond_token();

    if group.is_chord() {
        let pitches: Vec<String> = group
            .members
            .iter()
            .map(|m| format!("{}\\{}", pitch_name(m.pitch), m.string()))
            .collect();
        format!("<{}>{}", pitches.join(" "), duration)
    } else {
        let member = &group.members[0];
        format!("{}{}\\{}", pitch_name(member.pitch), duration, member.string())
    }
}

/// Token sequence for arranged groups, rests included.
pub fn music_tokens(groups: &[ChordGroup], rest_threshold: f64) -> Vec<String> {
    let mut tokens = Vec::with_capacity(groups.len() + 1);

    if let Some(first) = groups.first() {
        if first.start_beats > rest_threshold {
            tokens.push(rest_token(first.start_beats));
        }
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            let gap = gap_between(&groups[i - 1], group);
            if gap > rest_threshold {
                tokens.push(rest_token(gap));
            }
        }
        tokens.push(group_token(group));
    }

    tokens
}

/// `\stringTuning` chord for the tab staff, lowest string first
fn string_tuning(tuning: &Tuning) -> String {
    let pitches: Vec<String> = tuning
        .strings_low_to_high()
        .map(|(_, open)| pitch_name(open))
        .collect();
    format!("\\stringTuning <{}>", pitches.join(" "))
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Generate LilyPond source for a result.
///
/// # Errors
/// Returns [`TabError::NothingToEncode`] when the result has no playable events.
pub fn to_lilypond(
    result: &TabResult,
    config: &TranscriptionConfig,
    title: Option<&str>,
) -> Result<String, TabError> {
    let groups = arrange(result, config);
    if groups.is_empty() {
        return Err(TabError::NothingToEncode);
    }

    let bpm = config.effective_bpm(result.bpm).round().max(1.0) as u32;
    let tokens = music_tokens(&groups, config.quantize.rest_threshold);

    let mut ly = String::new();

    ly.push_str(&format!("\\version \"{}\"\n\n", LILYPOND_VERSION));

    ly.push_str("\\header {\n");
    if let Some(title) = title {
        ly.push_str(&format!("  title = \"{}\"\n", escape_string(title)));
    }
    ly.push_str("  tagline = ##f\n");
    ly.push_str("}\n\n");

    ly.push_str("music = {\n");
    ly.push_str(&format!("  \\tempo 4 = {}\n", bpm));
    for line in tokens.chunks(TOKENS_PER_LINE) {
        ly.push_str(&format!("  {}\n", line.join(" ")));
    }
    ly.push_str("}\n\n");

    ly.push_str("\\score {\n");
    ly.push_str("  <<\n");
    ly.push_str("    \\new Staff {\n");
    ly.push_str("      \\clef \"treble_8\"\n");
    ly.push_str("      \\music\n");
    ly.push_str("    }\n");
    ly.push_str("    \\new TabStaff \\with {\n");
    ly.push_str(&format!(
        "      stringTunings = {}\n",
        string_tuning(&config.tuning)
    ));
    ly.push_str("    } {\n");
    ly.push_str("      \\music\n");
    ly.push_str("    }\n");
    ly.push_str("  >>\n");
    ly.push_str("  \\layout { }\n");
    ly.push_str("  \\midi { }\n");
    ly.push_str("}\n");

    log::info!(
        "generated LilyPond source: {} groups, {} tokens",
        groups.len(),
        tokens.len()
    );
    Ok(ly)
}
