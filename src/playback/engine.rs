//! Playback sessions and the transport that schedules them
//!
//! A session is a suspendable walk over its steps. Nothing here sleeps: a
//! suspended session records the time it wants to be woken, and the
//! transport resumes it from [`Transport::tick`] once that time has passed.

use log::{debug, trace, warn};

use super::types::{CancelToken, Ended, PlaybackSink, PlaybackState, Resume, SessionId, Step};
use crate::duration::duration_millis;
use crate::melody::Melody;
use crate::note::{Note, Pitch};

/// Turn a melody into playback steps at `tempo`.
///
/// Rests and note tokens that do not parse keep their time but make no sound.
pub fn steps_for_melody(melody: &Melody, tempo: u32) -> Vec<Step> {
    melody
        .events()
        .map(|(note, duration)| {
            let pitch = match Note::parse(note) {
                Ok(Note::Pitched(p)) => Some(p),
                Ok(Note::Rest) => None,
                Err(e) => {
                    warn!("{}, playing it as a rest", e);
                    None
                }
            };
            Step {
                pitch,
                millis: duration_millis(duration, tempo),
            }
        })
        .collect()
}

/// A single run through a sequence of steps
#[derive(Debug)]
pub struct PlaybackSession {
    id: SessionId,
    label: String,
    steps: Vec<Step>,
    cursor: usize,
    state: PlaybackState,
    token: CancelToken,
    sounding: Option<Pitch>,
    wake_at: Option<u64>,
}

impl PlaybackSession {
    pub fn new(id: SessionId, label: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id,
            label: label.into(),
            steps,
            cursor: 0,
            state: PlaybackState::Idle,
            token: CancelToken::new(),
            sounding: None,
            wake_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// A handle that cancels this session at its next resume point
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn wake_at(&self) -> Option<u64> {
        self.wake_at
    }

    /// Number of steps begun so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn is_due(&self, now: u64) -> bool {
        self.wake_at.map_or(true, |w| w <= now)
    }

    /// Begin playing at `now`: the first step sounds immediately.
    pub fn start(&mut self, now: u64, sink: &mut dyn PlaybackSink) -> Resume {
        debug!("session {} '{}' playing", self.id.0, self.label);
        self.state = PlaybackState::Playing;
        self.resume(now, sink)
    }

    /// Continue after a suspension that ended at `now`.
    ///
    /// Releases the previous step's highlight, then either stops (cancelled
    /// or out of steps) or strikes the next step and suspends again.
    pub fn resume(&mut self, now: u64, sink: &mut dyn PlaybackSink) -> Resume {
        if let Some(pitch) = self.sounding.take() {
            sink.release(&pitch);
        }
        self.wake_at = None;

        if self.token.is_cancelled() {
            self.state = PlaybackState::Cancelled;
            return Resume::Finished(self.state);
        }
        if self.state != PlaybackState::Playing {
            return Resume::Finished(self.state);
        }

        let step = match self.steps.get(self.cursor) {
            Some(step) => *step,
            None => {
                debug!("session {} '{}' finished", self.id.0, self.label);
                self.state = PlaybackState::Idle;
                return Resume::Finished(self.state);
            }
        };
        self.cursor += 1;

        if let Some(pitch) = step.pitch {
            trace!("session {} strikes {}", self.id.0, pitch);
            sink.strike(&pitch, step.millis);
            self.sounding = Some(pitch);
        }

        let wake_at = now + step.millis;
        self.wake_at = Some(wake_at);
        Resume::Suspended { wake_at }
    }

    /// Signal cancellation and clear this session's highlight right away.
    ///
    /// The session still exits at its next resume point.
    pub fn cancel(&mut self, sink: &mut dyn PlaybackSink) {
        self.token.cancel();
        if let Some(pitch) = self.sounding.take() {
            sink.release(&pitch);
        }
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Cancelled;
        }
        debug!("session {} '{}' cancelled", self.id.0, self.label);
    }

    fn ended(&self) -> Ended {
        Ended {
            id: self.id,
            label: self.label.clone(),
            state: self.state,
        }
    }
}

/// Schedules playback sessions, allowing at most one to own the
/// "currently playing" slot.
///
/// Starting a session cancels the current one. The cancelled session moves to
/// a retiring list and is dropped once its pending suspension ends; the new
/// session owns the slot immediately.
#[derive(Debug, Default)]
pub struct Transport {
    current: Option<PlaybackSession>,
    retiring: Vec<PlaybackSession>,
    next_id: u64,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&PlaybackSession> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the session playing now carries `label`
    pub fn is_current(&self, label: &str) -> bool {
        self.current.as_ref().map_or(false, |s| s.label == label)
    }

    /// Cancelled sessions that have not yet reached their resume point
    pub fn retiring(&self) -> &[PlaybackSession] {
        &self.retiring
    }

    /// State of a session still known to the transport
    pub fn state_of(&self, id: SessionId) -> Option<PlaybackState> {
        self.current
            .iter()
            .chain(self.retiring.iter())
            .find(|s| s.id == id)
            .map(PlaybackSession::state)
    }

    /// Cancel whatever is playing and start `steps` at `now`.
    pub fn start(
        &mut self,
        label: impl Into<String>,
        steps: Vec<Step>,
        now: u64,
        sink: &mut dyn PlaybackSink,
    ) -> SessionId {
        self.stop(sink);

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let mut session = PlaybackSession::new(id, label, steps);
        if let Resume::Suspended { .. } = session.start(now, sink) {
            self.current = Some(session);
        }
        id
    }

    /// Stop the session labelled `label` if it is the one playing, otherwise
    /// start `steps` in its place. Returns the id of a newly started session.
    pub fn toggle(
        &mut self,
        label: &str,
        steps: Vec<Step>,
        now: u64,
        sink: &mut dyn PlaybackSink,
    ) -> Option<SessionId> {
        if self.is_current(label) {
            self.stop(sink);
            return None;
        }
        Some(self.start(label, steps, now, sink))
    }

    /// Cancel the current session. Returns `false` if nothing was playing.
    pub fn stop(&mut self, sink: &mut dyn PlaybackSink) -> bool {
        match self.current.take() {
            Some(mut session) => {
                session.cancel(sink);
                self.retiring.push(session);
                true
            }
            None => false,
        }
    }

    /// Earliest time any session wants to be resumed
    pub fn next_deadline(&self) -> Option<u64> {
        self.current
            .iter()
            .chain(self.retiring.iter())
            .filter_map(PlaybackSession::wake_at)
            .min()
    }

    /// Resume every session whose suspension has ended by `now`.
    ///
    /// Steps due before `now` are replayed at their scheduled times, so a
    /// late tick does not stretch the melody.
    pub fn tick(&mut self, now: u64, sink: &mut dyn PlaybackSink) -> Vec<Ended> {
        let mut ended = Vec::new();

        let (due, waiting): (Vec<_>, Vec<_>) =
            self.retiring.drain(..).partition(|s| s.is_due(now));
        self.retiring = waiting;
        for mut session in due {
            let at = session.wake_at.unwrap_or(now);
            session.resume(at, sink);
            ended.push(session.ended());
        }

        while let Some(session) = self.current.as_mut() {
            let wake_at = match session.wake_at {
                Some(w) if w <= now => w,
                _ => break,
            };
            if let Resume::Finished(_) = session.resume(wake_at, sink) {
                if let Some(done) = self.current.take() {
                    ended.push(done.ended());
                }
            }
        }

        ended
    }
}
