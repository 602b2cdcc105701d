//! # Melody Files
//!
//! A [`Melody`] is the in-memory form of a melody file: parallel note and
//! duration tokens plus optional header metadata.
//!
//! ## Formats
//!
//! ### JSON
//! ```text
//! { "title": "Ode", "key": "C Major", "timeSignature": "4/4",
//!   "notes": ["E4", "E4", "F4"], "durations": ["4n", "4n", "4n"] }
//! ```
//!
//! ### Line-based text (`.txt`)
//! ```text
//! C Major        <- key
//! 4/4            <- time signature
//! C4:4n          <- note:duration, one per line
//! rest:2n
//! ```
//! Blank lines are ignored. A note line that does not split into exactly two
//! parts on `:` is skipped with a warning and parsing continues.
//!
//! Tokens are kept as text. Malformed notes and unknown duration codes are
//! tolerated here and degrade to defaults when encoded or played.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{PianolaError, SkippedLine};
use crate::io::ResourceLoader;

/// Duration used when a melody has fewer durations than notes
pub const DEFAULT_DURATION: &str = "4n";

/// An ordered melody with optional header metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Melody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_signature: Option<String>,
    pub notes: Vec<String>,
    #[serde(default)]
    pub durations: Vec<String>,
}

impl Melody {
    /// Build a melody from note and duration tokens.
    pub fn new<N, D>(notes: N, durations: D) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            notes: notes.into_iter().map(Into::into).collect(),
            durations: durations.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_time_signature(mut self, time_signature: impl Into<String>) -> Self {
        self.time_signature = Some(time_signature.into());
        self
    }

    /// Parse the JSON melody format.
    pub fn from_json(text: &str) -> Result<Self, PianolaError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Duration token for note `i`, `4n` when the durations list is short.
    pub fn duration_at(&self, i: usize) -> &str {
        self.durations
            .get(i)
            .map(String::as_str)
            .unwrap_or(DEFAULT_DURATION)
    }

    /// Note tokens paired with their durations
    pub fn events(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.notes
            .iter()
            .enumerate()
            .map(move |(i, note)| (note.as_str(), self.duration_at(i)))
    }
}

/// Result of parsing the line-based format, including skipped lines
#[derive(Debug, Clone, PartialEq)]
pub struct LineMelody {
    pub melody: Melody,
    pub skipped: Vec<SkippedLine>,
}

/// Parse the line-based melody format.
///
/// # Example
/// ```
/// use pianola::parse_line_melody;
///
/// let melody = parse_line_melody("C Major\n4/4\nC4:4n\nrest:2n\nbadline\nE4:8n").unwrap();
/// assert_eq!(melody.notes, vec!["C4", "rest", "E4"]);
/// assert_eq!(melody.durations, vec!["4n", "2n", "8n"]);
/// ```
///
/// # Errors
/// Returns [`PianolaError::MalformedMelodyText`] if fewer than two non-empty
/// lines are present.
pub fn parse_line_melody(text: &str) -> Result<Melody, PianolaError> {
    parse_line_melody_with_report(text).map(|parsed| parsed.melody)
}

/// Parse the line-based format and report the lines that were skipped.
pub fn parse_line_melody_with_report(text: &str) -> Result<LineMelody, PianolaError> {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(PianolaError::MalformedMelodyText { lines: lines.len() });
    }

    let mut melody = Melody {
        key: Some(lines[0].to_string()),
        time_signature: Some(lines[1].to_string()),
        ..Melody::default()
    };
    let mut skipped = Vec::new();

    for (i, line) in lines.iter().enumerate().skip(2) {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() != 2 {
            warn!("Skipping invalid line: {}", line);
            skipped.push(SkippedLine {
                line: i + 1,
                text: line.to_string(),
            });
            continue;
        }
        melody.notes.push(parts[0].trim().to_string());
        melody.durations.push(parts[1].trim().to_string());
    }

    Ok(LineMelody { melody, skipped })
}

/// Load a melody through `loader`. Paths ending in `.txt` use the line-based
/// format; everything else is read as JSON.
pub fn load_melody(loader: &dyn ResourceLoader, path: &str) -> Result<Melody, PianolaError> {
    let text = loader.fetch(path)?;
    if path.ends_with(".txt") {
        parse_line_melody(&text)
    } else {
        Melody::from_json(&text)
    }
}

/// The C major scale from C4 to C5 in eighth notes.
pub fn scale_melody() -> Melody {
    Melody::new(
        ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"],
        std::iter::repeat("8n").take(8),
    )
    .with_title("C Major Scale")
}
