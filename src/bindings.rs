//! Computer-keyboard bindings for the visible piano keys.
//!
//! White keys take the home row `a s d f g h j k l ; '` and black keys the row
//! above it, `w e r t y u i o p [ ]`, both assigned left to right. A table is
//! always rebuilt from scratch when the visible keys change.

use std::collections::BTreeMap;

use crate::layout::{split_by_kind, Key, PlacedKey, Viewport};
use crate::note::Pitch;

pub const WHITE_KEY_BINDINGS: [char; 11] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';', '\''];
pub const BLACK_KEY_BINDINGS: [char; 11] = ['w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']'];

/// Mapping from an input character to the key it plays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    bindings: BTreeMap<char, Pitch>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pitch bound to `input`. Lookup is case-insensitive.
    pub fn get(&self, input: char) -> Option<&Pitch> {
        self.bindings.get(&input.to_ascii_lowercase())
    }

    /// Uppercase label to draw on the key for `pitch`, if it is bound.
    pub fn label_for(&self, pitch: &Pitch) -> Option<char> {
        self.bindings
            .iter()
            .find(|(_, p)| *p == pitch)
            .map(|(c, _)| c.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Pitch)> {
        self.bindings.iter().map(|(c, p)| (*c, p))
    }

    /// Bindings for the keys that are fully visible in `viewport`.
    pub fn for_viewport(placed: &[PlacedKey], viewport: &Viewport) -> Self {
        let visible = viewport.visible_keys(placed);
        Self::for_keys(&visible)
    }

    /// Bindings for an ascending run of keys of both kinds.
    pub fn for_keys(keys: &[Key]) -> Self {
        let (white, black) = split_by_kind(keys);
        assign_bindings(&white, &black)
    }
}

/// Zip the binding alphabets with the visible white and black keys.
///
/// Keys past the eleventh of either kind stay unbound.
pub fn assign_bindings(white: &[Key], black: &[Key]) -> BindingTable {
    let mut bindings = BTreeMap::new();
    for (c, key) in WHITE_KEY_BINDINGS.iter().zip(white) {
        bindings.insert(*c, key.pitch);
    }
    for (c, key) in BLACK_KEY_BINDINGS.iter().zip(black) {
        bindings.insert(*c, key.pitch);
    }
    BindingTable { bindings }
}
