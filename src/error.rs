//! # Error Types
//!
//! This module defines the error type shared by every stage of the tablature engine.
//!
//! Per-note problems (unplayable pitches, zero-length notes, harmonic artifacts) never
//! reach this type: the stage that finds them drops or clamps the note and moves on.
//! Only whole-pipeline conditions are surfaced to the caller.
//!
//! ## Error Types
//! - `NothingToEncode` - The typeset encoder was handed a result with no events
//! - `ConfigError` - Invalid YAML configuration or out-of-range settings
//! - `InputError` - Note or structured-tab input that could not be decoded
//! - `OutputError` - A result that cannot be written in the requested form
//! - `RendererNotFound` / `UnsupportedFormat` / `RenderFailed` - External renderer problems
//! - `Io` - Filesystem failures
//!
//! ## Usage
//! ```rust
//! use tabgen::{to_lilypond, TabError, TabResult};
//!
//! let empty = TabResult::default();
//! match to_lilypond(&empty, None) {
//!     Ok(source) => println!("{}", source),
//!     Err(TabError::NothingToEncode) => eprintln!("No notes survived transcription"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// The typeset-music encoder received an empty result.
    ///
    /// An empty score is not a valid artifact, unlike the empty line-tab text.
    ///
    /// # Example
    /// ```
    /// # use tabgen::TabError;
    /// let err = TabError::NothingToEncode;
    /// assert_eq!(err.to_string(), "Nothing to encode: the tablature has no events");
    /// ```
    #[error("Nothing to encode: the tablature has no events")]
    NothingToEncode,

    /// Invalid configuration.
    ///
    /// Occurs when a YAML config fails to parse or holds values the engine cannot use
    /// (a tuning that is not strictly descending, an empty quantization grid, ...).
    ///
    /// # Example
    /// ```
    /// # use tabgen::TabError;
    /// let err = TabError::ConfigError("Unknown tuning: Open_G".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: Unknown tuning: Open_G");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Note or structured-tab input that could not be decoded.
    #[error("Invalid input: {0}")]
    InputError(String),

    /// A result that cannot be encoded, such as one holding a non-finite time or tempo.
    ///
    /// # Example
    /// ```
    /// # use tabgen::TabError;
    /// let err = TabError::OutputError("bpm is NaN".to_string());
    /// assert_eq!(err.to_string(), "Cannot encode output: bpm is NaN");
    /// ```
    #[error("Cannot encode output: {0}")]
    OutputError(String),

    /// The external score renderer is not installed or not on `PATH`.
    #[error("Renderer '{program}' not found; install it or set an explicit path")]
    RendererNotFound { program: String },

    /// The requested render target has an extension the renderer cannot produce.
    #[error("Unsupported render format '{0}' (expected .svg, .png or .pdf)")]
    UnsupportedFormat(String),

    /// The renderer ran but exited unsuccessfully.
    #[error("Renderer exited with {status}: {stderr}")]
    RenderFailed { status: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
