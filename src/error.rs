//! # Error Types
//!
//! This module defines all error types for the pianola engine.
//!
//! ## Error Types
//! - `InvalidNoteFormat` - a note token that is not `letter [#|b] octave`
//! - `MalformedMelodyText` - line-based melody text without its two header lines
//! - `MalformedMelodyJson` - JSON melody that does not deserialize
//! - `ResourceLoadFailure` - a melody file that could not be fetched
//! - `MissingRenderTarget` - the notation renderer has no region with that id
//! - `Config` - invalid keyboard configuration
//!
//! Skipped lines in the line-based format are not errors; they are reported
//! as [`SkippedLine`] warnings and parsing continues.
//!
//! ## Usage
//! ```rust
//! use pianola::{parse_line_melody, PianolaError};
//!
//! match parse_line_melody("C Major") {
//!     Ok(melody) => println!("{} notes", melody.notes.len()),
//!     Err(PianolaError::MalformedMelodyText { lines }) => {
//!         eprintln!("only {} header line(s)", lines);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PianolaError {
    /// A note token did not match `letter [accidental] octave-digits`.
    ///
    /// # Example
    /// ```
    /// # use pianola::PianolaError;
    /// let err = PianolaError::InvalidNoteFormat { note: "H9".to_string() };
    /// assert_eq!(err.to_string(), "Invalid note format: 'H9'");
    /// ```
    #[error("Invalid note format: '{note}'")]
    InvalidNoteFormat { note: String },

    /// Line-based melody text needs a key line and a time signature line.
    ///
    /// # Example
    /// ```
    /// # use pianola::PianolaError;
    /// let err = PianolaError::MalformedMelodyText { lines: 1 };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Text melody must have at least key and time signature (found 1 line(s))"
    /// );
    /// ```
    #[error("Text melody must have at least key and time signature (found {lines} line(s))")]
    MalformedMelodyText { lines: usize },

    /// JSON melody file could not be deserialized.
    #[error("Invalid melody JSON: {0}")]
    MalformedMelodyJson(#[from] serde_json::Error),

    /// Fetching a melody resource failed.
    #[error("Failed to load '{path}': {message}")]
    ResourceLoadFailure { path: String, message: String },

    /// The renderer has no target region with this id.
    #[error("Render target '{0}' not found")]
    MissingRenderTarget(String),

    /// Invalid keyboard configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A note line that was skipped while parsing the line-based melody format.
///
/// `line` is 1-indexed and counts only the non-empty lines of the input,
/// so the key line is 1 and the time signature line is 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
}
