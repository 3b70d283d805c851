pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod fingering;
pub mod notation;
pub mod quantize;
pub mod render;
pub mod tuning;
pub mod types;

pub use api::{parse_notes, to_lilypond, transcribe_notes, Transcriber};
pub use config::{FilterConfig, FingeringConfig, QuantizeConfig, TranscriptionConfig};
pub use error::TabError;
pub use notation::{encode, from_json, to_json, to_svg, to_text, NotationFormat};
pub use tuning::Tuning;
pub use types::*;
