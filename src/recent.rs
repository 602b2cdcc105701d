//! Recently played notes, shown as live sheet music.

use std::collections::VecDeque;

use crate::melody::{Melody, DEFAULT_DURATION};
use crate::note::Pitch;

/// Capacity of the live sheet under an embedded keyboard
pub const KEYBOARD_RECENT_CAPACITY: usize = 8;
/// Capacity of the live sheet above the floating piano
pub const FLOATING_RECENT_CAPACITY: usize = 12;

/// FIFO of the last `capacity` notes played; the oldest is evicted first.
#[derive(Debug, Clone)]
pub struct RecentNotes {
    notes: VecDeque<Pitch>,
    capacity: usize,
}

impl RecentNotes {
    pub fn new(capacity: usize) -> Self {
        Self {
            notes: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, pitch: Pitch) {
        self.notes.push_back(pitch);
        while self.notes.len() > self.capacity {
            self.notes.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pitch> {
        self.notes.iter()
    }

    /// The buffered notes as a melody of quarter notes
    pub fn to_melody(&self) -> Melody {
        Melody::new(
            self.notes.iter().map(|p| p.to_string()),
            self.notes.iter().map(|_| DEFAULT_DURATION),
        )
    }
}
