use crate::tuning::STRING_COUNT;
use crate::types::TabResult;

/// Returned for a result with no events
pub const NO_NOTES: &str = "(no notes)";

/// Render a result as plain-text tab, string 1 on top.
///
/// Each event takes one two-character column: the fret number padded with `-` on the
/// string it is played on, `--` on every other string. Time only sets column order,
/// not spacing.
pub fn to_text(result: &TabResult) -> String {
    if result.is_empty() {
        return NO_NOTES.to_string();
    }

    let events = result.sorted_events();
    let mut rows: Vec<String> = (1..=STRING_COUNT)
        .map(|s| {
            let mut row = String::with_capacity(2 + events.len() * 2);
            row.push_str(&format!("{}|", s));
            row
        })
        .collect();

    for event in &events {
        for (i, row) in rows.iter_mut().enumerate() {
            if i + 1 == event.string as usize {
                row.push_str(&format!("{:->2}", event.fret));
            } else {
                row.push_str("--");
            }
        }
    }

    rows.join("\n")
}
