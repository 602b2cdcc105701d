//! # Playback Module
//!
//! Melody autoplay as cooperative, cancellable sessions.
//!
//! ## Purpose
//! A melody is played one note at a time: strike the note, highlight its key,
//! wait for the note's duration, remove the highlight, continue. Waiting must
//! not block keyboard input or other melody buttons, so a session never
//! sleeps. It suspends with a wake-up time and is resumed by whoever drives
//! the clock.
//!
//! ## Sub-modules
//! - `types` - PlaybackState, Step, CancelToken, PlaybackSink
//! - `engine` - PlaybackSession and Transport
//!
//! ## State Machine
//! ```text
//! Idle --start--> Playing --last step--> Idle
//!                    |
//!                    +--cancel--> Cancelled
//! ```
//! Cancellation is cooperative: a [`CancelToken`] is checked each time a
//! session resumes. Cancelling through the session or the transport also
//! clears the session's key highlight at once.
//!
//! ## One Melody at a Time
//! [`Transport`] owns the "currently playing" slot. Starting a melody while
//! another plays cancels the old one and hands the slot to the new one
//! immediately; the old session lingers in a retiring list until its pending
//! suspension ends.
//!
//! ## Example
//! ```rust
//! use pianola::note::Pitch;
//! use pianola::playback::{steps_for_melody, PlaybackSink, PlaybackState, Transport};
//! use pianola::Melody;
//!
//! #[derive(Default)]
//! struct Lit(Vec<Pitch>);
//!
//! impl PlaybackSink for Lit {
//!     fn strike(&mut self, pitch: &Pitch, _millis: u64) {
//!         self.0.push(*pitch);
//!     }
//!     fn release(&mut self, pitch: &Pitch) {
//!         self.0.retain(|p| p != pitch);
//!     }
//! }
//!
//! let melody = Melody::new(["C4", "E4"], ["4n", "4n"]);
//! let mut transport = Transport::new();
//! let mut lit = Lit::default();
//!
//! let id = transport.start("demo", steps_for_melody(&melody, 120), 0, &mut lit);
//! assert_eq!(transport.state_of(id), Some(PlaybackState::Playing));
//! assert_eq!(transport.next_deadline(), Some(500));
//!
//! let ended = transport.tick(1000, &mut lit);
//! assert_eq!(ended[0].state, PlaybackState::Idle);
//! assert!(lit.0.is_empty());
//! ```

mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{steps_for_melody, PlaybackSession, Transport};
pub use types::{CancelToken, Ended, PlaybackSink, PlaybackState, Resume, SessionId, Step};
