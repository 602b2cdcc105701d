//! # Keyboard Layout
//!
//! The fixed piano layout, range filtering and key geometry.
//!
//! ## Layout
//! Octaves 2 through 8, each laid out as
//! ```text
//! C C# D D# E F F# G G# A A# B
//! W B  W B  W W B  W B  W B  W
//! ```
//! so keys are in ascending pitch order.
//!
//! ## Geometry
//! White keys are 40px wide and sit side by side. A black key is 28px wide and
//! centred on the boundary after the white key to its left, so its left edge is
//! `whites_before * 40 - 14`. A key counts as visible in a [`Viewport`] only
//! when both of its edges are inside it.

use std::ops::RangeInclusive;

use crate::note::{Accidental, Note, NoteName, Pitch};

pub const LAYOUT_OCTAVES: RangeInclusive<u32> = 2..=8;

pub const WHITE_KEY_WIDTH: f64 = 40.0;
pub const BLACK_KEY_WIDTH: f64 = 28.0;
const BLACK_KEY_OFFSET: f64 = 14.0;

const WHITE_NOTES: [NoteName; 7] = [
    NoteName::C,
    NoteName::D,
    NoteName::E,
    NoteName::F,
    NoteName::G,
    NoteName::A,
    NoteName::B,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    White,
    Black,
}

/// A key of the virtual keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub pitch: Pitch,
    pub kind: KeyKind,
}

impl Key {
    pub fn note(&self) -> Note {
        Note::Pitched(self.pitch)
    }

    /// Pitch index; layout keys are naturals and sharps so this always exists.
    pub fn index(&self) -> u32 {
        self.pitch.index().unwrap_or_default()
    }

    pub fn is_white(&self) -> bool {
        self.kind == KeyKind::White
    }
}

/// Every key from C2 to B8 in ascending pitch order.
pub fn full_layout() -> Vec<Key> {
    let mut keys = Vec::with_capacity(LAYOUT_OCTAVES.clone().count() * 12);
    for octave in LAYOUT_OCTAVES {
        for name in WHITE_NOTES {
            keys.push(Key {
                pitch: Pitch::new(name, Accidental::Natural, octave),
                kind: KeyKind::White,
            });
            if !matches!(name, NoteName::E | NoteName::B) {
                keys.push(Key {
                    pitch: Pitch::new(name, Accidental::Sharp, octave),
                    kind: KeyKind::Black,
                });
            }
        }
    }
    keys
}

/// Keys whose pitch index lies in `[index(start), index(end)]`.
///
/// A `start` without a pitch index puts no lower bound on the range; an `end`
/// without one selects nothing.
///
/// # Example
/// ```
/// use pianola::layout::{keys_in_range, KeyKind};
///
/// let keys = keys_in_range("C4", "C5");
/// assert_eq!(keys.len(), 13);
/// assert_eq!(keys.iter().filter(|k| k.kind == KeyKind::Black).count(), 5);
/// ```
pub fn keys_in_range(start: &str, end: &str) -> Vec<Key> {
    let start_idx = crate::note::pitch_index(start);
    let end_idx = match crate::note::pitch_index(end) {
        Some(idx) => idx,
        None => return Vec::new(),
    };

    full_layout()
        .into_iter()
        .filter(|key| {
            let idx = key.index();
            start_idx.map_or(true, |s| idx >= s) && idx <= end_idx
        })
        .collect()
}

/// Split keys into (white, black), keeping their order.
pub fn split_by_kind(keys: &[Key]) -> (Vec<Key>, Vec<Key>) {
    keys.iter().partition(|k| k.is_white())
}

/// A key with its horizontal position on the keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedKey {
    pub key: Key,
    pub left: f64,
}

impl PlacedKey {
    pub fn width(&self) -> f64 {
        match self.key.kind {
            KeyKind::White => WHITE_KEY_WIDTH,
            KeyKind::Black => BLACK_KEY_WIDTH,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width()
    }
}

/// Position keys left to right.
pub fn place_keys(keys: &[Key]) -> Vec<PlacedKey> {
    let mut whites = 0u32;
    keys.iter()
        .map(|&key| {
            let left = match key.kind {
                KeyKind::White => {
                    let left = f64::from(whites) * WHITE_KEY_WIDTH;
                    whites += 1;
                    left
                }
                KeyKind::Black => f64::from(whites) * WHITE_KEY_WIDTH - BLACK_KEY_OFFSET,
            };
            PlacedKey { key, left }
        })
        .collect()
}

/// Total width taken by the white keys
pub fn keyboard_width(placed: &[PlacedKey]) -> f64 {
    placed.iter().filter(|p| p.key.is_white()).count() as f64 * WHITE_KEY_WIDTH
}

/// Left edge of `note`'s key, used to scroll a start note to the left edge.
pub fn scroll_offset_for(placed: &[PlacedKey], note: &Note) -> Option<f64> {
    placed
        .iter()
        .find(|p| p.key.note() == *note)
        .map(|p| p.left)
}

/// The visible horizontal window of a scrolled keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_left: f64,
    pub width: f64,
}

impl Viewport {
    pub fn new(scroll_left: f64, width: f64) -> Self {
        Self { scroll_left, width }
    }

    /// Whether both edges of the key are inside the viewport
    pub fn contains(&self, placed: &PlacedKey) -> bool {
        placed.left >= self.scroll_left && placed.right() <= self.scroll_left + self.width
    }

    /// Fully visible keys, in their original order
    pub fn visible_keys(&self, placed: &[PlacedKey]) -> Vec<Key> {
        placed
            .iter()
            .filter(|p| self.contains(p))
            .map(|p| p.key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(keys: &[Key]) -> Vec<String> {
        keys.iter().map(|k| k.pitch.to_string()).collect()
    }

    #[test]
    fn test_full_layout() {
        let keys = full_layout();
        assert_eq!(keys.len(), 7 * 12);
        assert_eq!(keys.first().unwrap().pitch.to_string(), "C2");
        assert_eq!(keys.last().unwrap().pitch.to_string(), "B8");
        assert!(keys.windows(2).all(|w| w[0].index() < w[1].index()));
    }

    #[test]
    fn test_c4_to_c5() {
        let keys = keys_in_range("C4", "C5");
        assert_eq!(
            names(&keys),
            vec![
                "C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A4", "A#4", "B4", "C5"
            ]
        );
        let (white, black) = split_by_kind(&keys);
        assert_eq!(
            names(&white),
            vec!["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]
        );
        assert_eq!(names(&black), vec!["C#4", "D#4", "F#4", "G#4", "A#4"]);
    }

    #[test]
    fn test_range_edges() {
        assert_eq!(names(&keys_in_range("C#4", "D#4")), vec!["C#4", "D4", "D#4"]);
        assert_eq!(names(&keys_in_range("B8", "B8")), vec!["B8"]);
        assert!(keys_in_range("C5", "C4").is_empty());
        assert!(keys_in_range("C0", "B1").is_empty());
    }

    #[test]
    fn test_malformed_bounds() {
        // no lower bound
        let keys = keys_in_range("bogus", "D2");
        assert_eq!(names(&keys), vec!["C2", "C#2", "D2"]);
        // flats have no index either
        assert_eq!(keys_in_range("Bb7", "C#2").len(), 2);
        // no upper bound selects nothing
        assert!(keys_in_range("C4", "bogus").is_empty());
    }

    #[test]
    fn test_geometry() {
        let placed = place_keys(&keys_in_range("C4", "E4"));
        let lefts: Vec<f64> = placed.iter().map(|p| p.left).collect();
        // C4 C#4 D4 D#4 E4
        assert_eq!(lefts, vec![0.0, 26.0, 40.0, 66.0, 80.0]);
        assert_eq!(placed[1].right(), 54.0);
        assert_eq!(keyboard_width(&placed), 120.0);
    }

    #[test]
    fn test_viewport_requires_full_visibility() {
        let placed = place_keys(&keys_in_range("C4", "B4"));
        let viewport = Viewport::new(40.0, 120.0);
        // D4 [40,80], D#4 [66,94], E4 [80,120], F4 [120,160]; C#4 [26,54] starts too early
        assert_eq!(names(&viewport.visible_keys(&placed)), vec!["D4", "D#4", "E4", "F4"]);
    }

    #[test]
    fn test_scroll_offset() {
        let placed = place_keys(&keys_in_range("C2", "C8"));
        let c4 = Note::parse("C4").unwrap();
        assert_eq!(scroll_offset_for(&placed, &c4), Some(14.0 * WHITE_KEY_WIDTH));
        assert_eq!(scroll_offset_for(&placed, &Note::Rest), None);
    }

    #[test]
    fn test_huge_end_octave_reaches_top() {
        let keys = keys_in_range("C4", "C99999999999");
        assert_eq!(keys.len(), 60);
        assert_eq!(keys.last().unwrap().pitch.to_string(), "B8");
    }
}
