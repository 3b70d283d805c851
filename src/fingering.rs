//! # Fingering Optimizer
//!
//! Places each note on a (string, fret) position with a greedy, single-pass cost model
//! that tracks where the fretting hand currently sits.
//!
//! ## Cost Model
//! For a note of pitch `P`, every string whose open pitch `O` satisfies
//! `0 <= P - O <= max_fret` is a candidate at fret `P - O`. Each candidate costs
//! `fret_distance + high_fret_penalty`:
//! - `fret_distance` is 0 for open strings and while the hand has not moved yet
//!   (hand position 0), otherwise `|fret - hand|`
//! - `high_fret_penalty` is `max(0, fret - high_fret_threshold) * high_fret_multiplier`
//!
//! ## Tie-Break
//! Candidates are enumerated from string 6 to string 1. Among equal costs the lower fret
//! wins, so an open string beats the same pitch fretted on a thicker string; any
//! remaining tie keeps the first candidate in enumeration order.
//!
//! ## Hand Position
//! The hand starts at 0. Choosing a fretted position moves the hand to that fret;
//! choosing an open string leaves it where it was. The position is threaded through
//! the fold as an explicit accumulator and never outlives one call.

use crate::config::FingeringConfig;
use crate::tuning::Tuning;
use crate::types::{Note, TabEvent};

/// Fret the hand is currently anchored at (0 = not yet placed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandPosition(pub u8);

impl HandPosition {
    /// Hand position after playing `fret`
    pub fn after(self, fret: u8) -> Self {
        if fret > 0 {
            HandPosition(fret)
        } else {
            self
        }
    }
}

/// A playable position for one pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub string: u8,
    pub fret: u8,
}

/// Every position that sounds `pitch`, strings 6 to 1.
pub fn candidates(pitch: i32, tuning: &Tuning, max_fret: u8) -> Vec<Candidate> {
    tuning
        .strings_low_to_high()
        .filter_map(|(string, open)| {
            let fret = pitch - open;
            if (0..=max_fret as i32).contains(&fret) {
                Some(Candidate {
                    string,
                    fret: fret as u8,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Cost of moving to `fret` from `hand`.
pub fn position_cost(fret: u8, hand: HandPosition, config: &FingeringConfig) -> u32 {
    let distance = if fret == 0 || hand.0 == 0 {
        0
    } else {
        (fret as i32 - hand.0 as i32).unsigned_abs()
    };
    let penalty =
        fret.saturating_sub(config.high_fret_threshold) as u32 * config.high_fret_multiplier;
    distance + penalty
}

/// Cheapest position for `pitch`, or `None` when no string can play it.
pub fn choose_position(
    pitch: i32,
    hand: HandPosition,
    tuning: &Tuning,
    config: &FingeringConfig,
) -> Option<Candidate> {
    let mut best: Option<(u32, Candidate)> = None;

    for candidate in candidates(pitch, tuning, config.max_fret) {
        let cost = position_cost(candidate.fret, hand, config);
        let better = match best {
            None => true,
            Some((best_cost, best_candidate)) => {
                (cost, candidate.fret) < (best_cost, best_candidate.fret)
            }
        };
        if better {
            best = Some((cost, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// Place one note and return the hand position that follows it.
///
/// Unplayable notes yield no event and leave the hand untouched.
pub fn place_note(
    note: &Note,
    hand: HandPosition,
    tuning: &Tuning,
    config: &FingeringConfig,
) -> (Option<TabEvent>, HandPosition) {
    match choose_position(note.pitch, hand, tuning, config) {
        Some(Candidate { string, fret }) => (
            Some(TabEvent {
                string,
                fret,
                start: note.start,
                end: note.end,
            }),
            hand.after(fret),
        ),
        None => {
            log::debug!(
                "dropping unplayable pitch {} at {:.3}s for tuning {}",
                note.pitch,
                note.start,
                tuning.name()
            );
            (None, hand)
        }
    }
}

/// Assign every note (already time-ordered) to a fretboard position.
pub fn assign_positions(notes: &[Note], tuning: &Tuning, config: &FingeringConfig) -> Vec<TabEvent> {
    let (events, _) = notes.iter().fold(
        (Vec::with_capacity(notes.len()), HandPosition::default()),
        |(mut events, hand), note| {
            let (event, hand) = place_note(note, hand, tuning, config);
            events.extend(event);
            (events, hand)
        },
    );

    log::debug!(
        "fingering placed {} of {} notes",
        events.len(),
        notes.len()
    );
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(events: &[TabEvent]) -> Vec<(u8, u8)> {
        events.iter().map(|e| (e.string, e.fret)).collect()
    }

    #[test]
    fn test_open_strings_scenario() {
        let notes = vec![Note::new(0.0, 0.5, 40, 0.9), Note::new(0.5, 1.0, 45, 0.9)];
        let tuning = Tuning::standard();
        let config = FingeringConfig::default();

        let (first, hand) = place_note(&notes[0], HandPosition::default(), &tuning, &config);
        assert_eq!(hand, HandPosition(0));
        let (second, hand) = place_note(&notes[1], hand, &tuning, &config);
        assert_eq!(hand, HandPosition(0));

        assert_eq!((first.unwrap().string, first.unwrap().fret), (6, 0));
        assert_eq!((second.unwrap().string, second.unwrap().fret), (5, 0));
        assert_eq!(positions(&assign_positions(&notes, &tuning, &config)), vec![(6, 0), (5, 0)]);
    }

    #[test]
    fn test_candidates_enumerate_six_to_one() {
        let c = candidates(64, &Tuning::standard(), 20);
        let strings: Vec<u8> = c.iter().map(|c| c.string).collect();
        assert_eq!(strings, vec![5, 4, 3, 2, 1]);
        assert_eq!(c[0].fret, 19);
        assert_eq!(c[4].fret, 0);
    }

    #[test]
    fn test_unplayable_note_is_dropped() {
        let notes = vec![Note::new(0.0, 0.5, 30, 0.9), Note::new(0.5, 1.0, 90, 0.9)];
        let events = assign_positions(&notes, &Tuning::standard(), &FingeringConfig::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_drop_d_reaches_low_d() {
        let notes = vec![Note::new(0.0, 0.5, 38, 0.9)];
        let events = assign_positions(&notes, &Tuning::drop_d(), &FingeringConfig::default());
        assert_eq!(positions(&events), vec![(6, 0)]);
    }

    #[test]
    fn test_position_cost() {
        let config = FingeringConfig::default();
        assert_eq!(position_cost(7, HandPosition(0), &config), 0);
        assert_eq!(position_cost(0, HandPosition(9), &config), 0);
        assert_eq!(position_cost(7, HandPosition(5), &config), 2);
        assert_eq!(position_cost(15, HandPosition(0), &config), 6);
        assert_eq!(position_cost(15, HandPosition(14), &config), 7);
    }

    #[test]
    fn test_hand_position_follows_fretted_notes() {
        let tuning = Tuning::standard();
        let config = FingeringConfig::default();

        // B4 (71): hand at 0, distance is free, lowest fret wins: string 1 fret 7
        let (event, hand) = place_note(&Note::new(0.0, 0.5, 71, 0.9), HandPosition(0), &tuning, &config);
        assert_eq!(event.map(|e| (e.string, e.fret)), Some((1, 7)));
        assert_eq!(hand, HandPosition(7));

        // E4 (64) from hand 7: string 1 open costs 0 and leaves the hand in place
        let (event, hand) = place_note(&Note::new(0.5, 1.0, 64, 0.9), hand, &tuning, &config);
        assert_eq!(event.map(|e| (e.string, e.fret)), Some((1, 0)));
        assert_eq!(hand, HandPosition(7));

        // C4 (60) from hand 7: string 3 fret 5 (cost 2) beats string 2 fret 1 (cost 6)
        // and string 4 fret 10 (cost 3)
        let (event, hand) = place_note(&Note::new(1.0, 1.5, 60, 0.9), hand, &tuning, &config);
        assert_eq!(event.map(|e| (e.string, e.fret)), Some((3, 5)));
        assert_eq!(hand, HandPosition(5));
    }

    #[test]
    fn test_high_fret_penalty_pushes_toward_lower_position() {
        let tuning = Tuning::standard();
        let config = FingeringConfig::default();

        // B4 (71) from hand 14: string 1 fret 7 costs 7, string 2 fret 12 costs 2,
        // string 3 fret 16 costs 2 + 8 = 10
        let choice = choose_position(71, HandPosition(14), &tuning, &config).unwrap();
        assert_eq!(choice, Candidate { string: 2, fret: 12 });
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let notes: Vec<Note> = (0..32)
            .map(|i| Note::new(i as f64 * 0.25, i as f64 * 0.25 + 0.2, 40 + (i * 7) % 36, 0.8))
            .collect();
        let tuning = Tuning::standard();
        let config = FingeringConfig::default();

        let first = assign_positions(&notes, &tuning, &config);
        for _ in 0..5 {
            assert_eq!(assign_positions(&notes, &tuning, &config), first);
        }
        assert!(first.iter().all(|e| (1..=6).contains(&e.string) && e.fret <= 20));
    }

    #[test]
    fn test_preserves_note_timing() {
        let notes = vec![Note::new(0.25, 0.75, 52, 0.9)];
        let events = assign_positions(&notes, &Tuning::standard(), &FingeringConfig::default());
        assert_eq!(events[0].start, 0.25);
        assert_eq!(events[0].end, 0.75);
    }
}
