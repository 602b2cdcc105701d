//! # ABC Notation Output
//!
//! Encodes a [`Melody`] as an ABC notation document for the notation renderer.
//!
//! ## Document Layout
//! ```text
//! X:1             <- reference number, always 1
//! T:Ode to Joy    <- only when the melody has a title
//! K:C             <- key, "C" when missing or unrecognized
//! M:4/4           <- only when the melody has a time signature
//! L:1/4           <- default note length is a quarter note
//! |E E F G |      <- every note in one measure line
//! ```
//!
//! Each note is its pitch symbol followed by its length suffix and a space.
//! Output is a pure function of the melody.

use log::warn;

use crate::duration::to_notation_duration;
use crate::melody::Melody;
use crate::note::Note;

/// Pitch symbol used when a note token cannot be parsed
const FALLBACK_PITCH: &str = "C";

/// Convert a Melody to an ABC notation document.
///
/// # Example
/// ```
/// use pianola::{to_abc, Melody};
///
/// let melody = Melody::new(["C4", "E4", "G4"], ["4n", "4n", "4n"])
///     .with_key("C Major")
///     .with_time_signature("4/4");
/// assert_eq!(to_abc(&melody), "X:1\nK:C\nM:4/4\nL:1/4\n|C E G |\n");
/// ```
pub fn to_abc(melody: &Melody) -> String {
    let mut abc = String::new();

    abc.push_str("X:1\n");
    if let Some(title) = non_empty(&melody.title) {
        abc.push_str(&format!("T:{}\n", title));
    }
    let key = non_empty(&melody.key).map_or_else(|| "C".to_string(), abc_key);
    abc.push_str(&format!("K:{}\n", key));
    if let Some(time_signature) = non_empty(&melody.time_signature) {
        abc.push_str(&format!("M:{}\n", time_signature));
    }
    abc.push_str("L:1/4\n");

    abc.push('|');
    for (note, duration) in melody.events() {
        abc.push_str(&note_to_abc(note));
        abc.push_str(to_notation_duration(duration));
        abc.push(' ');
    }
    abc.push_str("|\n");

    abc
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn note_to_abc(note: &str) -> String {
    match Note::parse(note) {
        Ok(n) => n.to_abc(),
        Err(e) => {
            warn!("{}, writing '{}' instead", e, FALLBACK_PITCH);
            FALLBACK_PITCH.to_string()
        }
    }
}

/// ABC key field from a free-text key such as `"A Minor"` or `"Bb major"`.
///
/// Reads a tonic letter (any case) with an optional `#` and an optional `b`,
/// skips whitespace, then looks for `major` or `minor` in any case. Minor
/// keys get an `m` suffix. Text that does not start with a tonic gives `C`.
///
/// ```
/// use pianola::abc::abc_key;
///
/// assert_eq!(abc_key("A Minor"), "Am");
/// assert_eq!(abc_key("Bb major"), "Bb");
/// assert_eq!(abc_key("F#minor"), "F#m");
/// assert_eq!(abc_key("Dorian"), "D");
/// assert_eq!(abc_key("whatever"), "C");
/// ```
pub fn abc_key(key: &str) -> String {
    let mut chars = key.chars().peekable();

    let tonic = match chars.next() {
        Some(c) if ('A'..='G').contains(&c.to_ascii_uppercase()) => c,
        _ => return "C".to_string(),
    };
    let mut note = tonic.to_string();
    if let Some(&'#') = chars.peek() {
        note.push('#');
        chars.next();
    }
    if let Some(&c) = chars.peek() {
        if c.eq_ignore_ascii_case(&'b') {
            note.push(c);
            chars.next();
        }
    }
    while chars.peek().map_or(false, |c| c.is_whitespace()) {
        chars.next();
    }

    let mode: String = chars.take(5).collect();
    if mode.eq_ignore_ascii_case("minor") {
        note.push('m');
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_document() {
        let melody = Melody::new(["C4", "E4", "G4"], ["4n", "4n", "4n"])
            .with_key("C Major")
            .with_time_signature("4/4");
        let abc = to_abc(&melody);
        let lines: Vec<&str> = abc.lines().collect();
        assert_eq!(lines, vec!["X:1", "K:C", "M:4/4", "L:1/4", "|C E G |"]);
    }

    #[test]
    fn test_title_and_header_order() {
        let melody = Melody::new(["A4"], ["2n"])
            .with_title("Little Tune")
            .with_key("A minor")
            .with_time_signature("3/4");
        assert_eq!(
            to_abc(&melody),
            "X:1\nT:Little Tune\nK:Am\nM:3/4\nL:1/4\n|A2 |\n"
        );
    }

    #[test]
    fn test_defaults_without_metadata() {
        let melody = Melody::new(["C4"], ["4n"]);
        assert_eq!(to_abc(&melody), "X:1\nK:C\nL:1/4\n|C |\n");

        let blank = Melody::new(["C4"], ["4n"])
            .with_title("")
            .with_key("")
            .with_time_signature("");
        assert_eq!(to_abc(&blank), "X:1\nK:C\nL:1/4\n|C |\n");
    }

    #[test]
    fn test_empty_melody() {
        assert_eq!(to_abc(&Melody::default()), "X:1\nK:C\nL:1/4\n||\n");
    }

    #[test]
    fn test_durations_and_octaves() {
        let melody = Melody::new(
            ["C3", "D#5", "rest", "Bb6", "G2", "E4"],
            ["1n", "8n", "2n.", "16n.", "4n.", "8n."],
        );
        let abc = to_abc(&melody);
        assert!(abc.ends_with("|C,4 ^d/2 z3 _b'3/8 G,,3/2 E3/4 |\n"));
    }

    #[test]
    fn test_invalid_note_and_missing_duration_fall_back() {
        let melody = Melody::new(["X9", "D4", "E4"], ["8n", "bogus"]);
        assert!(to_abc(&melody).ends_with("|C/2 D E |\n"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let melody = Melody::new(["C4", "D4"], ["4n", "8n"]).with_key("G Major");
        assert_eq!(to_abc(&melody), to_abc(&melody.clone()));
    }

    #[test]
    fn test_key_variants() {
        assert_eq!(abc_key("C Major"), "C");
        assert_eq!(abc_key("c major"), "c");
        assert_eq!(abc_key("D MINOR"), "Dm");
        assert_eq!(abc_key("Eb Minor"), "Ebm");
        assert_eq!(abc_key("Cm"), "C");
        assert_eq!(abc_key(" C Major"), "C");
        assert_eq!(abc_key("H Major"), "C");
        assert_eq!(abc_key("G"), "G");
    }
}
