//! Playback type definitions

use std::cell::Cell;
use std::rc::Rc;

use crate::note::Pitch;

/// Lifecycle of a playback session
///
/// `Idle -> Playing -> (Idle | Cancelled)`. A session that runs to the end
/// returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Cancelled,
}

/// Identifies a playback session within its transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// One note of a session: the pitch to sound (`None` for a rest) and how long
/// to wait before the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub pitch: Option<Pitch>,
    pub millis: u64,
}

/// What a session asks for after being resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Wake the session again at this time (milliseconds)
    Suspended { wake_at: u64 },
    /// The session is done and in this terminal state
    Finished(PlaybackState),
}

/// A session that reached a terminal state during a transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ended {
    pub id: SessionId,
    pub label: String,
    pub state: PlaybackState,
}

/// Shared cancellation flag checked by a session at each resume point.
///
/// Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Receiver of the audible and visible effects of playback
pub trait PlaybackSink {
    /// Sound `pitch` for `millis` and highlight its key.
    fn strike(&mut self, pitch: &Pitch, millis: u64);
    /// Remove the highlight from `pitch`'s key.
    fn release(&mut self, pitch: &Pitch);
}
