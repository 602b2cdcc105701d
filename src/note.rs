//! # Note Codec
//!
//! Parsing of note names (`C4`, `F#3`, `Bb5`, `rest`) and their conversion to
//! ABC notation pitch symbols and to pitch indices.
//!
//! ## Note Text Format
//! ```text
//! note   := "rest" | letter accidental? digits
//! letter := A | B | C | D | E | F | G        (uppercase only)
//! accidental := "#" | "b"
//! ```
//!
//! ## ABC Octave Mapping
//! | octave | symbol      |
//! |--------|-------------|
//! | 2      | `C,,`       |
//! | 3      | `C,`        |
//! | 4      | `C`         |
//! | 5      | `c`         |
//! | 6      | `c'`        |
//! | other  | `C` (falls back to octave 4) |
//!
//! Sharps are prefixed with `^`, flats with `_`. A rest is `z`.
//!
//! ## Pitch Index
//! `octave * 12 + semitone` with C=0 .. B=11. Only naturals and sharps have an
//! index; this matches the note names used by the keyboard layout.

use std::fmt;
use std::str::FromStr;

use crate::error::PianolaError;

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }

    /// Semitone offset from C
    pub fn semitone(&self) -> u32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }
}

/// Accidentals written in note text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp, // #
    Flat,  // b
}

impl Accidental {
    /// ABC prefix for this accidental
    pub fn abc_prefix(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "^",
            Accidental::Flat => "_",
        }
    }
}

/// A pitched note: letter, accidental and octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub name: NoteName,
    pub accidental: Accidental,
    pub octave: u32,
}

impl Pitch {
    pub fn new(name: NoteName, accidental: Accidental, octave: u32) -> Self {
        Self {
            name,
            accidental,
            octave,
        }
    }

    /// Pitch index used to order and compare keys.
    ///
    /// Flats have no index: the keyboard names its black keys with sharps and
    /// `A#`/`Bb` style aliases are not resolved. Huge octaves saturate at
    /// `u32::MAX`, above every key of the layout.
    pub fn index(&self) -> Option<u32> {
        let offset = match self.accidental {
            Accidental::Natural => self.name.semitone(),
            Accidental::Sharp => self.name.semitone() + 1,
            Accidental::Flat => return None,
        };
        Some(self.octave.saturating_mul(12).saturating_add(offset))
    }

    /// ABC notation symbol, e.g. `^c'` for C#6.
    pub fn to_abc(&self) -> String {
        let upper = self.name.as_char();
        let lower = upper.to_ascii_lowercase();
        // Octaves outside 2..=6 use the octave 4 spelling
        let symbol = match self.octave {
            6 => format!("{}'", lower),
            5 => lower.to_string(),
            3 => format!("{},", upper),
            2 => format!("{},,", upper),
            _ => upper.to_string(),
        };
        format!("{}{}", self.accidental.abc_prefix(), symbol)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let acc = match self.accidental {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        };
        write!(f, "{}{}{}", self.name.as_char(), acc, self.octave)
    }
}

/// A note token: either a pitch or the `rest` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    Rest,
    Pitched(Pitch),
}

impl Note {
    pub const REST: &'static str = "rest";

    /// Parse a note token such as `C4`, `F#3`, `Bb5` or `rest`.
    ///
    /// # Example
    /// ```
    /// use pianola::note::{Accidental, Note, NoteName, Pitch};
    ///
    /// let note = Note::parse("F#3").unwrap();
    /// assert_eq!(note, Note::Pitched(Pitch::new(NoteName::F, Accidental::Sharp, 3)));
    /// assert_eq!(Note::parse("rest").unwrap(), Note::Rest);
    /// assert!(Note::parse("f#3").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, PianolaError> {
        if text == Self::REST {
            return Ok(Note::Rest);
        }
        let invalid = || PianolaError::InvalidNoteFormat {
            note: text.to_string(),
        };

        let mut chars = text.chars();
        let name = chars.next().and_then(NoteName::from_char).ok_or_else(invalid)?;
        let rest = chars.as_str();

        let (accidental, digits) = match rest.chars().next() {
            Some('#') => (Accidental::Sharp, &rest[1..]),
            Some('b') => (Accidental::Flat, &rest[1..]),
            _ => (Accidental::Natural, rest),
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        // any digit run is an octave; overlong ones saturate
        let octave = digits.bytes().fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        });

        Ok(Note::Pitched(Pitch::new(name, accidental, octave)))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Note::Rest)
    }

    pub fn pitch(&self) -> Option<&Pitch> {
        match self {
            Note::Rest => None,
            Note::Pitched(p) => Some(p),
        }
    }

    /// ABC notation symbol; a rest is `z`.
    pub fn to_abc(&self) -> String {
        match self {
            Note::Rest => "z".to_string(),
            Note::Pitched(p) => p.to_abc(),
        }
    }

    pub fn index(&self) -> Option<u32> {
        self.pitch().and_then(Pitch::index)
    }
}

impl FromStr for Note {
    type Err = PianolaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Rest => f.write_str(Note::REST),
            Note::Pitched(p) => p.fmt(f),
        }
    }
}

/// Convert a note token to its ABC pitch symbol.
///
/// # Example
/// ```
/// use pianola::to_notation_pitch;
///
/// assert_eq!(to_notation_pitch("C4").unwrap(), "C");
/// assert_eq!(to_notation_pitch("Bb5").unwrap(), "_b");
/// assert_eq!(to_notation_pitch("rest").unwrap(), "z");
/// ```
///
/// # Errors
/// Returns [`PianolaError::InvalidNoteFormat`] for malformed tokens.
pub fn to_notation_pitch(note: &str) -> Result<String, PianolaError> {
    Note::parse(note).map(|n| n.to_abc())
}

/// Pitch index of a note token, or `None` if it has no index.
///
/// `None` plays the role of the "not found" sentinel: as a range start it
/// sorts below every real key, as a range end it admits none.
pub fn pitch_index(note: &str) -> Option<u32> {
    Note::parse(note).ok().and_then(|n| n.index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octave_casing() {
        for letter in ["C", "D", "E", "F", "G", "A", "B"] {
            let lower = letter.to_lowercase();
            assert_eq!(to_notation_pitch(&format!("{}4", letter)).unwrap(), letter);
            assert_eq!(to_notation_pitch(&format!("{}5", letter)).unwrap(), lower);
            assert_eq!(
                to_notation_pitch(&format!("{}6", letter)).unwrap(),
                format!("{}'", lower)
            );
            assert_eq!(
                to_notation_pitch(&format!("{}3", letter)).unwrap(),
                format!("{},", letter)
            );
            assert_eq!(
                to_notation_pitch(&format!("{}2", letter)).unwrap(),
                format!("{},,", letter)
            );
        }
    }

    #[test]
    fn test_accidental_prefixes() {
        assert_eq!(to_notation_pitch("C#4").unwrap(), "^C");
        assert_eq!(to_notation_pitch("Eb5").unwrap(), "_e");
        assert_eq!(to_notation_pitch("F#3").unwrap(), "^F,");
        assert_eq!(to_notation_pitch("Ab6").unwrap(), "_a'");
    }

    #[test]
    fn test_out_of_range_octave_uses_octave_four() {
        assert_eq!(to_notation_pitch("C7").unwrap(), "C");
        assert_eq!(to_notation_pitch("G1").unwrap(), "G");
        assert_eq!(to_notation_pitch("A0").unwrap(), "A");
        assert_eq!(to_notation_pitch("D#12").unwrap(), "^D");
    }

    #[test]
    fn test_rest() {
        assert_eq!(to_notation_pitch("rest").unwrap(), "z");
        assert!(Note::parse("rest").unwrap().is_rest());
        assert!(Note::parse("Rest").is_err());
    }

    #[test]
    fn test_invalid_notes() {
        for bad in ["", "C", "H4", "c4", "C#", "Cx4", "C4 ", " C4", "C-1", "C4.5"] {
            match Note::parse(bad) {
                Err(PianolaError::InvalidNoteFormat { note }) => assert_eq!(note, bad),
                other => panic!("expected InvalidNoteFormat for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["C4", "F#3", "Bb5", "rest", "A10"] {
            assert_eq!(Note::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_pitch_index() {
        assert_eq!(pitch_index("C0"), Some(0));
        assert_eq!(pitch_index("C4"), Some(48));
        assert_eq!(pitch_index("C#4"), Some(49));
        assert_eq!(pitch_index("B4"), Some(59));
        assert_eq!(pitch_index("C5"), Some(60));
        assert_eq!(pitch_index("A#2"), Some(34));
    }

    #[test]
    fn test_pitch_index_missing() {
        assert_eq!(pitch_index("Bb4"), None);
        assert_eq!(pitch_index("rest"), None);
        assert_eq!(pitch_index("nope"), None);
    }

    #[test]
    fn test_huge_octave_saturates() {
        let note = Note::parse("C99999999999").unwrap();
        assert_eq!(note.pitch().map(|p| p.octave), Some(u32::MAX));
        assert_eq!(pitch_index("C99999999999"), Some(u32::MAX));
        assert_eq!(to_notation_pitch("D99999999999").unwrap(), "D");
    }
}
