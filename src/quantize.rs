//! # Rhythm Quantizer & Grouper
//!
//! Converts positioned tab events from seconds to a grid of beats, clusters events that
//! start together into chord groups, and closes short rests left by detection jitter.
//!
//! ## Pipeline
//! 1. `seconds * bpm / 60` gives beats
//! 2. Start and end are snapped independently. Every candidate grid spacing is tried and
//!    the closest grid point over all of them wins, so a triplet-ish onset lands on 1/3
//!    while a straight one lands on 1/4 or 1/8. A quantized end that does not follow its
//!    start is pushed to `start + min_length`
//! 3. Events sorted by start are swept once; an event joins the current group while its
//!    start is within `chord_tolerance` of the group's first start
//! 4. A group ends when its longest member ends
//! 5. Legato: a positive gap shorter than `legato_threshold` is absorbed by extending the
//!    earlier group to the next group's start. Longer gaps stay as rests
//!
//! ## Known Limitation
//! Overlapping groups (a long note still ringing when the next group starts) are not
//! split into voices. The gap is treated as zero: no rest, and no shortening of the
//! earlier group.

use crate::config::{QuantizeConfig, TranscriptionConfig};
use crate::tuning::Tuning;
use crate::types::{ChordGroup, QuantizedEvent, TabEvent, TabResult};

pub fn seconds_to_beats(seconds: f64, bpm: f64) -> f64 {
    seconds * bpm / 60.0
}

/// Snap a beat value to the nearest point across all grid spacings.
///
/// Spacings are tried in order and a later spacing only wins with a strictly smaller
/// error, which makes snapping idempotent.
pub fn snap_to_grid(beats: f64, grids: &[f64]) -> f64 {
    let mut best = beats;
    let mut best_error = f64::INFINITY;

    for &grid in grids {
        let snapped = (beats / grid).round() * grid;
        let error = (snapped - beats).abs();
        if error < best_error {
            best = snapped;
            best_error = error;
        }
    }

    best
}

/// Quantize one event already converted to a pitch.
pub fn quantize_event(event: &TabEvent, pitch: i32, bpm: f64, config: &QuantizeConfig) -> QuantizedEvent {
    let start_beats = snap_to_grid(seconds_to_beats(event.start, bpm), &config.grids);
    let mut end_beats = snap_to_grid(seconds_to_beats(event.end, bpm), &config.grids);
    if end_beats <= start_beats {
        end_beats = start_beats + config.min_length;
    }

    QuantizedEvent {
        start_beats,
        end_beats,
        pitch,
        source_event: *event,
    }
}

/// Quantize every event and sort the result by quantized start.
///
/// Events whose string does not exist in `tuning` have no pitch and are skipped.
pub fn quantize_events(
    events: &[TabEvent],
    tuning: &Tuning,
    bpm: f64,
    config: &QuantizeConfig,
) -> Vec<QuantizedEvent> {
    let mut quantized: Vec<QuantizedEvent> = events
        .iter()
        .filter_map(|event| match tuning.pitch_at(event.string, event.fret) {
            Some(pitch) => Some(quantize_event(event, pitch, bpm, config)),
            None => {
                log::warn!(
                    "skipping event on string {} which tuning {} does not have",
                    event.string,
                    tuning.name()
                );
                None
            }
        })
        .collect();

    quantized.sort_by(|a, b| a.start_beats.total_cmp(&b.start_beats));
    quantized
}

/// Cluster start-sorted events into chord groups.
pub fn group_chords(events: &[QuantizedEvent], tolerance: f64) -> Vec<ChordGroup> {
    let mut groups: Vec<ChordGroup> = Vec::new();
    let mut members: Vec<QuantizedEvent> = Vec::new();

    for &event in events {
        match members.first() {
            Some(anchor) if event.start_beats - anchor.start_beats >= tolerance => {
                groups.push(close_group(std::mem::take(&mut members)));
                members.push(event);
            }
            _ => members.push(event),
        }
    }

    if !members.is_empty() {
        groups.push(close_group(members));
    }

    groups
}

fn close_group(members: Vec<QuantizedEvent>) -> ChordGroup {
    let start_beats = members[0].start_beats;
    let end_beats = members
        .iter()
        .map(|m| m.end_beats)
        .fold(f64::NEG_INFINITY, f64::max);

    ChordGroup {
        start_beats,
        end_beats,
        members,
    }
}

/// Extend each group over a short rest before the next group.
pub fn apply_legato(groups: &[ChordGroup], threshold: f64) -> Vec<ChordGroup> {
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let mut group = group.clone();
            if let Some(next) = groups.get(i + 1) {
                let gap = next.start_beats - group.end_beats;
                if gap > 0.0 && gap < threshold {
                    group.end_beats = next.start_beats;
                }
            }
            group
        })
        .collect()
}

/// Gap between two consecutive groups, with overlap counted as no gap.
pub fn gap_between(previous: &ChordGroup, next: &ChordGroup) -> f64 {
    (next.start_beats - previous.end_beats).max(0.0)
}

/// Run the full quantize, group and legato pass over a result.
pub fn arrange(result: &TabResult, config: &TranscriptionConfig) -> Vec<ChordGroup> {
    let bpm = config.effective_bpm(result.bpm);
    let quantized = quantize_events(&result.events, &config.tuning, bpm, &config.quantize);
    let groups = group_chords(&quantized, config.quantize.chord_tolerance);
    let groups = apply_legato(&groups, config.quantize.legato_threshold);

    log::debug!(
        "arranged {} events into {} groups at {} bpm",
        quantized.len(),
        groups.len(),
        bpm
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(string: u8, fret: u8, start: f64, end: f64) -> TabEvent {
        TabEvent {
            string,
            fret,
            start,
            end,
        }
    }

    fn group(start: f64, end: f64) -> ChordGroup {
        ChordGroup {
            start_beats: start,
            end_beats: end,
            members: vec![QuantizedEvent {
                start_beats: start,
                end_beats: end,
                pitch: 40,
                source_event: event(6, 0, start / 2.0, end / 2.0),
            }],
        }
    }

    #[test]
    fn test_seconds_to_beats() {
        assert_eq!(seconds_to_beats(1.0, 120.0), 2.0);
        assert_eq!(seconds_to_beats(0.5, 60.0), 0.5);
    }

    #[test]
    fn test_snap_picks_closest_grid() {
        let grids = QuantizeConfig::default().grids;
        assert_eq!(snap_to_grid(0.26, &grids), 0.25);
        assert!((snap_to_grid(0.32, &grids) - 1.0 / 3.0).abs() < 1e-12);
        assert!((snap_to_grid(0.17, &grids) - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(snap_to_grid(0.13, &grids), 0.125);
        assert_eq!(snap_to_grid(2.0, &grids), 2.0);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let grids = QuantizeConfig::default().grids;
        for i in 0..400 {
            let beats = i as f64 * 0.0137;
            let once = snap_to_grid(beats, &grids);
            assert_eq!(snap_to_grid(once, &grids), once, "beat value {}", beats);
        }
    }

    #[test]
    fn test_zero_length_event_gets_min_length() {
        let config = QuantizeConfig::default();
        let q = quantize_event(&event(6, 0, 1.0, 1.01), 40, 120.0, &config);
        assert_eq!(q.start_beats, 2.0);
        assert_eq!(q.end_beats, 2.125);
    }

    #[test]
    fn test_near_simultaneous_events_form_chord() {
        let config = QuantizeConfig::default();
        let events = vec![
            event(6, 0, 0.0, 0.5),
            event(5, 2, 0.004, 0.75),
            event(4, 2, 0.5, 1.0),
        ];
        let quantized = quantize_events(&events, &Tuning::standard(), 120.0, &config);
        let groups = group_chords(&quantized, config.chord_tolerance);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[0].members[1].pitch, 47);
        assert_eq!(groups[0].end_beats, 1.5);
        assert!(groups[0].is_chord());
        assert_eq!(groups[1].start_beats, 1.0);
    }

    #[test]
    fn test_event_exactly_one_tolerance_later_starts_a_group() {
        let at = |start: f64| QuantizedEvent {
            start_beats: start,
            end_beats: start + 1.0,
            pitch: 40,
            source_event: event(6, 0, 0.0, 0.5),
        };

        let groups = group_chords(&[at(0.0), at(0.01)], 0.01);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].start_beats, 0.01);

        let groups = group_chords(&[at(0.0), at(0.009)], 0.01);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_legato_fills_short_gap() {
        let groups = vec![group(0.0, 1.0), group(1.4, 2.0)];
        let result = apply_legato(&groups, 1.0);
        assert_eq!(result[0].end_beats, 1.4);
        assert_eq!(gap_between(&result[0], &result[1]), 0.0);
    }

    #[test]
    fn test_legato_keeps_long_rest() {
        let groups = vec![group(0.0, 1.0), group(2.2, 3.0)];
        let result = apply_legato(&groups, 1.0);
        assert_eq!(result[0].end_beats, 1.0);
        assert!((gap_between(&result[0], &result[1]) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_is_clamped_not_corrected() {
        let groups = vec![group(0.0, 2.0), group(1.0, 1.5)];
        let result = apply_legato(&groups, 1.0);
        assert_eq!(result[0].end_beats, 2.0);
        assert_eq!(gap_between(&result[0], &result[1]), 0.0);
    }

    #[test]
    fn test_arrange_uses_default_bpm() {
        let result = TabResult::from_tab_events(
            vec![event(6, 0, 0.0, 0.5), event(5, 0, 0.7, 1.0)],
            None,
        );
        let groups = arrange(&result, &TranscriptionConfig::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].start_beats, 0.0);
        // 0.7s at 120 bpm is 1.4 beats, closest grid point 11/8
        assert_eq!(groups[1].start_beats, 1.375);
        // the 3/8-beat rest is absorbed
        assert_eq!(groups[0].end_beats, groups[1].start_beats);
    }
}
