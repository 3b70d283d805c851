//! # Note Filter
//!
//! Removes detector artifacts from a raw note stream before fingering.
//!
//! ## Algorithm
//! 1. Sort notes by start time
//! 2. Cluster notes into simultaneity groups: a note joins the current group while its
//!    start is less than `coincidence_window` after the group's first note
//! 3. Inside each group of two or more notes, the lowest pitch is the root and always
//!    survives. Members a perfect interval above it (octave, fifth, and their compounds)
//!    quieter than `perfect_velocity_ratio * root` are overtones; members a major third
//!    (or tenth) above quieter than `third_velocity_ratio * root` are dropped the same way
//! 4. Every survivor shorter than `min_duration`, or high (`> noise_pitch`) and quiet
//!    (`< noise_velocity`), is dropped
//!
//! The output is time-ascending; notes sharing a start come out lowest pitch first.

use crate::config::FilterConfig;
use crate::types::Note;

/// Slack on the minimum-duration check, so a note repaired to exactly the minimum
/// survives whatever its start time
const DURATION_EPSILON: f64 = 1e-9;

/// Clean a note stream of harmonic artifacts and short or noisy notes.
pub fn filter_notes(notes: &[Note], config: &FilterConfig) -> Vec<Note> {
    if notes.is_empty() {
        return Vec::new();
    }

    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let groups = group_simultaneous(&sorted, config.coincidence_window);

    let mut survivors: Vec<Note> = groups
        .into_iter()
        .flat_map(|group| remove_harmonics(group, config))
        .filter(|note| !is_noise(note, config))
        .collect();

    survivors.sort_by(|a, b| a.start.total_cmp(&b.start));

    log::debug!(
        "note filter kept {} of {} notes",
        survivors.len(),
        notes.len()
    );
    survivors
}

/// Split time-sorted notes into simultaneity groups anchored on each group's first note.
fn group_simultaneous(sorted: &[Note], window: f64) -> Vec<Vec<Note>> {
    let mut groups: Vec<Vec<Note>> = Vec::new();
    let mut current: Vec<Note> = Vec::new();

    for &note in sorted {
        match current.first() {
            Some(anchor) if note.start - anchor.start >= window => {
                groups.push(std::mem::take(&mut current));
                current.push(note);
            }
            _ => current.push(note),
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Drop the overtones of a group's root. Single-note groups pass through untouched.
fn remove_harmonics(mut group: Vec<Note>, config: &FilterConfig) -> Vec<Note> {
    if group.len() < 2 {
        return group;
    }

    group.sort_by_key(|n| n.pitch);
    let root = group[0];

    group
        .into_iter()
        .enumerate()
        .filter(|(i, note)| {
            if *i == 0 {
                return true;
            }
            let interval = note.pitch - root.pitch;
            if config.perfect_intervals.contains(&interval)
                && note.velocity < config.perfect_velocity_ratio * root.velocity
            {
                log::debug!(
                    "dropping harmonic artifact: pitch {} at {:.3}s (+{} over {})",
                    note.pitch,
                    note.start,
                    interval,
                    root.pitch
                );
                return false;
            }
            if config.third_intervals.contains(&interval)
                && note.velocity < config.third_velocity_ratio * root.velocity
            {
                log::debug!(
                    "dropping harmonic artifact: pitch {} at {:.3}s (+{} over {})",
                    note.pitch,
                    note.start,
                    interval,
                    root.pitch
                );
                return false;
            }
            true
        })
        .map(|(_, note)| note)
        .collect()
}

fn is_noise(note: &Note, config: &FilterConfig) -> bool {
    note.duration() < config.min_duration - DURATION_EPSILON
        || (note.pitch > config.noise_pitch && note.velocity < config.noise_velocity)
}
