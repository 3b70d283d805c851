//! Integration tests for the tablature engine
//!
//! Tests the full pipeline from detector notes to each output format.

use pretty_assertions::assert_eq;
use tabgen::{
    from_json, parse_notes, to_json, to_lilypond, to_text, transcribe_notes, Note, TabError,
    TabResult, Transcriber, TranscriptionConfig,
};

fn positions(tab: &TabResult) -> Vec<(u8, u8)> {
    tab.events.iter().map(|e| (e.string, e.fret)).collect()
}

#[test]
fn test_open_string_scenario() {
    let notes = vec![Note::new(0.0, 0.5, 40, 0.9), Note::new(0.5, 1.0, 45, 0.9)];
    let tab = transcribe_notes(&notes, Some(120.0));

    assert_eq!(positions(&tab), vec![(6, 0), (5, 0)]);
    assert_eq!(tab.bpm, Some(120.0));
}

#[test]
fn test_empty_input() {
    let tab = transcribe_notes(&[], None);

    assert_eq!(to_text(&tab), "(no notes)");
    assert_eq!(from_json(&to_json(&tab).unwrap()).unwrap(), tab);
    assert!(matches!(to_lilypond(&tab, None), Err(TabError::NothingToEncode)));
}

#[test]
fn test_harmonic_artifacts_do_not_reach_the_tab() {
    let notes = vec![
        Note::new(0.0, 1.0, 45, 1.0),
        Note::new(0.02, 1.0, 57, 0.5), // octave overtone
        Note::new(0.01, 1.0, 52, 0.9), // fifth, loud enough to be played
    ];
    let tab = transcribe_notes(&notes, Some(120.0));

    // A2 on the open fifth string, E3 on string 4 fret 2
    assert_eq!(positions(&tab), vec![(5, 0), (4, 2)]);
}

#[test]
fn test_frets_and_strings_stay_in_range() {
    let notes: Vec<Note> = (0..120)
        .map(|i| {
            let start = i as f64 * 0.2;
            Note::new(start, start + 0.15, 30 + (i * 5) % 70, 0.4 + (i % 6) as f64 * 0.1)
        })
        .collect();
    let tab = transcribe_notes(&notes, Some(100.0));

    assert!(!tab.events.is_empty());
    for event in &tab.events {
        assert!((1..=6).contains(&event.string));
        assert!(event.fret <= 20);
    }
    assert_eq!(transcribe_notes(&notes, Some(100.0)), tab);
}

#[test]
fn test_riff_to_lilypond() {
    let json = r#"[
        [0.0, 0.24, 40, 0.9],
        [0.25, 0.49, 43, 0.9],
        [0.5, 0.74, 45, 0.9],
        [1.5, 2.0, 40, 0.9],
        [1.5, 2.0, 47, 0.9],
        [1.5, 2.0, 52, 0.85]
    ]"#;
    let notes = parse_notes(json).unwrap();
    let tab = transcribe_notes(&notes, Some(120.0));

    assert_eq!(positions(&tab), vec![(6, 0), (6, 3), (5, 0), (6, 0), (5, 2), (4, 2)]);

    let ly = to_lilypond(&tab, Some("Riff")).unwrap();
    // Eighths snapped over the detector gaps, a half rest, then the power chord
    assert!(ly.contains("  e,8\\6 g,8\\6 a,8\\5 r2 <e,\\6 b,\\5 e\\4>4\n"), "{}", ly);
    assert!(ly.contains("title = \"Riff\""));
    assert!(ly.contains("\\tempo 4 = 120"));
}

#[test]
fn test_structured_round_trip_through_pipeline() {
    let notes = vec![
        Note::new(0.013, 0.377, 50, 0.7),
        Note::new(0.41, 0.93, 55, 0.8),
        Note::new(1.1, 1.7, 62, 0.9),
    ];
    let tab = transcribe_notes(&notes, Some(91.5));
    let decoded = from_json(&to_json(&tab).unwrap()).unwrap();

    assert_eq!(decoded, tab);
}

#[test]
fn test_drop_d_config() {
    let config = TranscriptionConfig::from_yaml_str("tuning: Drop_D\nmin-pitch: 38").unwrap();
    let transcriber = Transcriber::new(config);
    let tab = transcriber.transcribe(&[Note::new(0.0, 1.0, 38, 1.0), Note::new(1.0, 2.0, 45, 1.0)], None);

    assert_eq!(positions(&tab), vec![(6, 0), (5, 0)]);

    let ly = transcriber.to_lilypond(&tab, None).unwrap();
    assert!(ly.contains("\\stringTuning <d, a, d g b e'>"));
}

#[test]
fn test_line_tab_text() {
    let notes = vec![
        Note::new(0.0, 0.5, 40, 0.9),
        Note::new(0.5, 1.0, 47, 0.9),
        Note::new(1.0, 1.5, 64, 0.9),
    ];
    let tab = transcribe_notes(&notes, None);

    let expected = "\
1|-----0
2|------
3|------
4|------
5|---2--
6|-0----";
    assert_eq!(to_text(&tab), expected);
}
