//! Standalone SVG tab diagram.
//!
//! Six string lines with each event's fret number placed along the x axis in proportion
//! to its start time. It needs no external renderer, at the cost of carrying no rhythm.

use crate::tuning::STRING_COUNT;
use crate::types::TabResult;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 400.0;
const LEFT_MARGIN: f64 = 80.0;
const RIGHT_MARGIN: f64 = 40.0;
const TOP: f64 = 80.0;
const STRING_SPACING: f64 = 50.0;

fn string_y(string: u8) -> f64 {
    TOP + (string as f64 - 1.0) * STRING_SPACING
}

/// Render a result as an SVG document.
///
/// An empty result still yields the bare six-string staff.
pub fn to_svg(result: &TabResult) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(&format!(
        "  <rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        WIDTH, HEIGHT
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"40\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"20\">Guitar TAB</text>\n",
        WIDTH / 2.0
    ));

    for s in 1..=STRING_COUNT as u8 {
        let y = string_y(s);
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"black\" stroke-width=\"1\"/>\n",
            LEFT_MARGIN,
            WIDTH - RIGHT_MARGIN,
            y = y
        ));
        svg.push_str(&format!(
            "  <text x=\"10\" y=\"{}\" font-family=\"sans-serif\" font-size=\"14\">Str {}</text>\n",
            y + 5.0,
            s
        ));
    }

    let max_start = result
        .events
        .iter()
        .map(|e| e.start)
        .fold(0.0_f64, f64::max);
    let span = if max_start > 0.0 { max_start } else { 1.0 };
    let usable = WIDTH - LEFT_MARGIN - RIGHT_MARGIN - 20.0;

    for event in result.sorted_events() {
        if event.string == 0 || event.string as usize > STRING_COUNT {
            continue;
        }
        let x = LEFT_MARGIN + 10.0 + (event.start / span) * usable;
        let y = string_y(event.string);
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"monospace\" font-size=\"16\" stroke=\"white\" stroke-width=\"4\" paint-order=\"stroke\">{}</text>\n",
            x, y, event.fret
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TabEvent;

    #[test]
    fn test_empty_result_draws_staff() {
        let svg = to_svg(&TabResult::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<line").count(), 6);
        assert!(svg.contains(">Str 6</text>"));
    }

    #[test]
    fn test_fret_numbers_are_placed_by_time() {
        let result = TabResult {
            events: vec![
                TabEvent { string: 6, fret: 0, start: 0.0, end: 0.5 },
                TabEvent { string: 2, fret: 15, start: 2.0, end: 2.5 },
            ],
            bpm: None,
        };
        let svg = to_svg(&result);

        assert!(svg.contains("<text x=\"90.0\" y=\"330\""));
        assert!(svg.contains("<text x=\"950.0\" y=\"130\""));
        assert!(svg.contains(">15</text>"));
    }
}
