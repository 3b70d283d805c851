//! Structured (JSON) form of a tab result.
//!
//! ```json
//! { "events": [ {"string": 6, "fret": 0, "start": 0.0, "end": 0.5} ], "bpm": 120.0 }
//! ```
//!
//! Floats are written with enough digits to parse back to the same bits, so
//! `from_json(&to_json(r)?)? == r` for every result `to_json` accepts.

use crate::error::TabError;
use crate::tuning::STRING_COUNT;
use crate::types::TabResult;

/// Highest fret a decoded event may use
pub const MAX_FRET: u8 = 20;

/// Serialize a result, pretty-printed.
///
/// # Errors
/// Returns [`TabError::OutputError`] when a time or the tempo could not be read back.
pub fn to_json(result: &TabResult) -> Result<String, TabError> {
    check_encodable(result).map_err(TabError::OutputError)?;
    serde_json::to_string_pretty(result).map_err(|e| TabError::OutputError(e.to_string()))
}

/// Serialize a result to a JSON value for embedding in larger documents.
pub fn to_json_value(result: &TabResult) -> Result<serde_json::Value, TabError> {
    check_encodable(result).map_err(TabError::OutputError)?;
    serde_json::to_value(result).map_err(|e| TabError::OutputError(e.to_string()))
}

/// Parse a result back, keeping event order as written.
pub fn from_json(content: &str) -> Result<TabResult, TabError> {
    let result: TabResult =
        serde_json::from_str(content).map_err(|e| TabError::InputError(e.to_string()))?;

    for (i, event) in result.events.iter().enumerate() {
        if event.string == 0 || event.string as usize > STRING_COUNT {
            return Err(TabError::InputError(format!(
                "event {} is on string {}, expected 1-{}",
                i, event.string, STRING_COUNT
            )));
        }
        if event.fret > MAX_FRET {
            return Err(TabError::InputError(format!(
                "event {} is at fret {}, expected 0-{}",
                i, event.fret, MAX_FRET
            )));
        }
    }
    check_encodable(&result).map_err(TabError::InputError)?;

    Ok(result)
}

/// JSON has no non-finite numbers, so such values would come back as `null`.
fn check_encodable(result: &TabResult) -> Result<(), String> {
    if let Some(i) = result
        .events
        .iter()
        .position(|e| !e.start.is_finite() || !e.end.is_finite())
    {
        return Err(format!("event {} has a non-finite time", i));
    }
    match result.bpm {
        Some(bpm) if !(bpm.is_finite() && bpm > 0.0) => {
            Err(format!("bpm must be a positive number, got {}", bpm))
        }
        _ => Ok(()),
    }
}
