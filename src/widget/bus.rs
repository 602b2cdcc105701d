//! Broadcast channel for key highlights shared between keyboard instances.
//!
//! A note pressed on one keyboard lights the same key on every keyboard that
//! shows it. Each keyboard subscribes once and drains its receiver when it
//! syncs; subscribers whose receiver was dropped are pruned on publish.
//!
//! The bus also counts who holds each note down, so a note held on several
//! keyboards sounds once and goes dark only when the last one lets go.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::note::Pitch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightEvent {
    On(Pitch),
    Off(Pitch),
}

#[derive(Debug, Clone, Default)]
pub struct HighlightBus {
    subscribers: Rc<RefCell<Vec<Sender<HighlightEvent>>>>,
    holders: Rc<RefCell<HashMap<Pitch, usize>>>,
}

impl HighlightBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<HighlightEvent> {
        let (tx, rx) = channel();
        self.subscribers.borrow_mut().push(tx);
        rx
    }

    pub fn publish(&self, event: HighlightEvent) {
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Add a holder of `pitch`. Returns `true` if nobody held it before.
    pub fn hold(&self, pitch: Pitch) -> bool {
        let mut holders = self.holders.borrow_mut();
        let count = holders.entry(pitch).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Drop a holder of `pitch`. Returns `true` if that was the last one.
    pub fn let_go(&self, pitch: Pitch) -> bool {
        let mut holders = self.holders.borrow_mut();
        match holders.get_mut(&pitch) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                holders.remove(&pitch);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, pitch: &Pitch) -> bool {
        self.holders.borrow().contains_key(pitch)
    }
}
