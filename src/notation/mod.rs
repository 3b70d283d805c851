//! # Notation Encoders
//!
//! Independent, side-effect-free encoders over one immutable [`TabResult`].
//!
//! ## Sub-modules
//! - `ascii` - plain-text line tab, one row per string
//! - `structured` - lossless JSON form with a decoder
//! - `lilypond` - typeset score source (standard staff + tab staff)
//! - `svg` - standalone SVG diagram
//!
//! ## Empty Results
//! Text and JSON encoders accept empty results (`"(no notes)"` and an empty event list).
//! The LilyPond encoder refuses them with [`TabError::NothingToEncode`], since an
//! empty score is not a useful artifact.

pub mod ascii;
pub mod lilypond;
pub mod structured;
pub mod svg;

pub use ascii::{to_text, NO_NOTES};
pub use lilypond::{pitch_name, NoteValue};
pub use structured::{from_json, to_json, to_json_value};
pub use svg::to_svg;

use crate::config::TranscriptionConfig;
use crate::error::TabError;
use crate::types::TabResult;

/// Output formats understood by [`encode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationFormat {
    Text,
    Json,
    Lilypond,
    Svg,
}

impl NotationFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "ascii" => Some(NotationFormat::Text),
            "json" => Some(NotationFormat::Json),
            "lilypond" | "ly" => Some(NotationFormat::Lilypond),
            "svg" => Some(NotationFormat::Svg),
            _ => None,
        }
    }

    /// Guess a format from an output file's extension
    pub fn from_extension(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            NotationFormat::Text => "txt",
            NotationFormat::Json => "json",
            NotationFormat::Lilypond => "ly",
            NotationFormat::Svg => "svg",
        }
    }
}

/// Encode a result in the given format.
pub fn encode(
    result: &TabResult,
    format: NotationFormat,
    config: &TranscriptionConfig,
    title: Option<&str>,
) -> Result<String, TabError> {
    match format {
        NotationFormat::Text => Ok(to_text(result)),
        NotationFormat::Json => to_json(result),
        NotationFormat::Lilypond => lilypond::to_lilypond(result, config, title),
        NotationFormat::Svg => Ok(to_svg(result)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_format_names() {
        assert_eq!(NotationFormat::from_str("LY"), Some(NotationFormat::Lilypond));
        assert_eq!(NotationFormat::from_str("ascii"), Some(NotationFormat::Text));
        assert_eq!(NotationFormat::from_str("pdf"), None);
        assert_eq!(
            NotationFormat::from_extension(Path::new("out/tab.json")),
            Some(NotationFormat::Json)
        );
        assert_eq!(NotationFormat::Lilypond.extension(), "ly");
    }

    #[test]
    fn test_encode_empty_result() {
        let config = TranscriptionConfig::default();
        let empty = TabResult::default();

        assert_eq!(encode(&empty, NotationFormat::Text, &config, None).unwrap(), NO_NOTES);
        assert!(encode(&empty, NotationFormat::Json, &config, None).is_ok());
        assert!(encode(&empty, NotationFormat::Svg, &config, None).is_ok());
        assert!(matches!(
            encode(&empty, NotationFormat::Lilypond, &config, None),
            Err(TabError::NothingToEncode)
        ));
    }
}
