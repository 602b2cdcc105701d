//! Several keyboards on one page.
//!
//! All keyboards of a group share a [`HighlightBus`], so a note played on any
//! of them lights the same key everywhere. Computer-keyboard input goes to the
//! active keyboard only; the first keyboard added is active until another one
//! is clicked or selected.

use log::debug;

use super::{Collaborators, HighlightBus, Keyboard};
use crate::config::KeyboardConfig;
use crate::error::PianolaError;
use crate::note::Pitch;
use crate::playback::Ended;

#[derive(Default)]
pub struct KeyboardGroup {
    bus: HighlightBus,
    keyboards: Vec<Keyboard>,
    active: usize,
}

impl KeyboardGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keyboard on the group's bus. Returns its index.
    pub fn add(
        &mut self,
        id: impl Into<String>,
        config: KeyboardConfig,
        collaborators: Collaborators,
    ) -> Result<usize, PianolaError> {
        let keyboard = Keyboard::with_bus(id, config, collaborators, self.bus.clone())?;
        self.keyboards.push(keyboard);
        Ok(self.keyboards.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.keyboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyboards.is_empty()
    }

    pub fn keyboard(&self, index: usize) -> Option<&Keyboard> {
        self.keyboards.get(index)
    }

    pub fn keyboard_mut(&mut self, index: usize) -> Option<&mut Keyboard> {
        self.keyboards.get_mut(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        (self.active < self.keyboards.len()).then_some(self.active)
    }

    pub fn active(&self) -> Option<&Keyboard> {
        self.keyboards.get(self.active)
    }

    /// Make `index` the keyboard that receives key presses.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.keyboards.len() {
            return false;
        }
        if index != self.active {
            debug!("active keyboard is now '{}'", self.keyboards[index].id());
        }
        self.active = index;
        true
    }

    /// Route a key press to the active keyboard.
    pub fn press(&mut self, input: char) -> bool {
        let handled = match self.keyboards.get_mut(self.active) {
            Some(keyboard) => keyboard.press(input),
            None => false,
        };
        self.sync_all();
        handled
    }

    pub fn release(&mut self, input: char) -> bool {
        let handled = match self.keyboards.get_mut(self.active) {
            Some(keyboard) => keyboard.release(input),
            None => false,
        };
        self.sync_all();
        handled
    }

    /// Press a key with the pointer; the clicked keyboard becomes active.
    pub fn click(&mut self, index: usize, pitch: Pitch) -> bool {
        if !self.set_active(index) {
            return false;
        }
        self.keyboards[index].play_note(pitch);
        self.sync_all();
        true
    }

    /// Pointer released or left the key.
    pub fn unclick(&mut self, index: usize, pitch: Pitch) -> bool {
        match self.keyboards.get_mut(index) {
            Some(keyboard) => keyboard.stop_note(pitch),
            None => return false,
        }
        self.sync_all();
        true
    }

    /// Tick every keyboard. Ended sessions are tagged with their keyboard.
    pub fn tick(&mut self, now: u64) -> Vec<(usize, Ended)> {
        let mut ended = Vec::new();
        for (i, keyboard) in self.keyboards.iter_mut().enumerate() {
            ended.extend(keyboard.tick(now).into_iter().map(|e| (i, e)));
        }
        ended
    }

    /// Earliest deadline across all keyboards
    pub fn next_deadline(&self) -> Option<u64> {
        self.keyboards.iter().filter_map(Keyboard::next_deadline).min()
    }

    pub fn sync_all(&mut self) {
        for keyboard in &mut self.keyboards {
            keyboard.sync_highlights();
        }
    }
}
