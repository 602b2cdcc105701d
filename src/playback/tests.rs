use super::*;
use crate::melody::{scale_melody, Melody};
use crate::note::{Note, Pitch};

/// Records strikes and keeps the set of lit keys
#[derive(Default)]
struct Recorder {
    struck: Vec<(String, u64)>,
    lit: Vec<Pitch>,
}

impl PlaybackSink for Recorder {
    fn strike(&mut self, pitch: &Pitch, millis: u64) {
        self.struck.push((pitch.to_string(), millis));
        self.lit.push(*pitch);
    }

    fn release(&mut self, pitch: &Pitch) {
        self.lit.retain(|p| p != pitch);
    }
}

impl Recorder {
    fn lit_names(&self) -> Vec<String> {
        self.lit.iter().map(|p| p.to_string()).collect()
    }

    fn struck_names(&self) -> Vec<&str> {
        self.struck.iter().map(|(n, _)| n.as_str()).collect()
    }
}

fn pitch(text: &str) -> Pitch {
    *Note::parse(text).unwrap().pitch().unwrap()
}

#[test]
fn test_steps_for_melody() {
    let melody = Melody::new(["C4", "rest", "nope", "G#3"], ["4n", "2n", "8n"]);
    let steps = steps_for_melody(&melody, 120);
    assert_eq!(
        steps,
        vec![
            Step { pitch: Some(pitch("C4")), millis: 500 },
            Step { pitch: None, millis: 1000 },
            Step { pitch: None, millis: 250 },
            Step { pitch: Some(pitch("G#3")), millis: 500 },
        ]
    );
}

#[test]
fn test_session_lifecycle() {
    let steps = steps_for_melody(&Melody::new(["C4", "D4"], ["8n", "4n"]), 120);
    let mut session = PlaybackSession::new(SessionId(7), "two notes", steps);
    let mut rec = Recorder::default();
    assert_eq!(session.state(), PlaybackState::Idle);

    assert_eq!(session.start(0, &mut rec), Resume::Suspended { wake_at: 250 });
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(rec.lit_names(), vec!["C4"]);

    assert_eq!(session.resume(250, &mut rec), Resume::Suspended { wake_at: 750 });
    assert_eq!(rec.lit_names(), vec!["D4"]);

    assert_eq!(
        session.resume(750, &mut rec),
        Resume::Finished(PlaybackState::Idle)
    );
    assert!(rec.lit.is_empty());
    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(rec.struck, vec![("C4".to_string(), 250), ("D4".to_string(), 500)]);
}

#[test]
fn test_rests_are_silent_but_take_time() {
    let steps = steps_for_melody(&Melody::new(["rest", "E4"], ["2n", "4n"]), 120);
    let mut transport = Transport::new();
    let mut rec = Recorder::default();

    transport.start("rest first", steps, 0, &mut rec);
    assert!(rec.struck.is_empty());
    assert_eq!(transport.next_deadline(), Some(1000));

    transport.tick(999, &mut rec);
    assert!(rec.struck.is_empty());

    transport.tick(1000, &mut rec);
    assert_eq!(rec.struck_names(), vec!["E4"]);
}

#[test]
fn test_transport_runs_to_completion() {
    let mut transport = Transport::new();
    let mut rec = Recorder::default();
    let id = transport.start("scale", steps_for_melody(&scale_melody(), 120), 0, &mut rec);

    // eight eighth notes at 120 bpm: 2000ms
    let ended = transport.tick(1999, &mut rec);
    assert!(ended.is_empty());
    assert_eq!(rec.struck.len(), 8);
    assert_eq!(rec.lit_names(), vec!["C5"]);

    let ended = transport.tick(2000, &mut rec);
    assert_eq!(
        ended,
        vec![Ended {
            id,
            label: "scale".to_string(),
            state: PlaybackState::Idle
        }]
    );
    assert!(!transport.is_playing());
    assert!(rec.lit.is_empty());
    assert_eq!(transport.next_deadline(), None);
}

#[test]
fn test_late_tick_keeps_schedule() {
    let steps = steps_for_melody(&Melody::new(["C4", "D4", "E4"], ["4n", "4n", "4n"]), 120);
    let mut transport = Transport::new();
    let mut rec = Recorder::default();
    transport.start("late", steps, 0, &mut rec);

    // woken late: the second note still counts from 500, the third is due at 1000
    transport.tick(700, &mut rec);
    assert_eq!(rec.struck_names(), vec!["C4", "D4"]);
    assert_eq!(transport.next_deadline(), Some(1000));
}

#[test]
fn test_starting_new_melody_cancels_running_one() {
    let mut transport = Transport::new();
    let mut rec = Recorder::default();

    let melody_a = Melody::new(["C4", "D4", "E4", "F4"], ["2n", "2n", "2n", "2n"]);
    let a = transport.start("a", steps_for_melody(&melody_a, 120), 0, &mut rec);
    transport.tick(1000, &mut rec);
    assert_eq!(rec.lit_names(), vec!["D4"]);

    // B starts mid-way through A's second note
    let melody_b = Melody::new(["G4", "A4"], ["4n", "4n"]);
    let b = transport.start("b", steps_for_melody(&melody_b, 120), 1200, &mut rec);

    assert_eq!(transport.state_of(a), Some(PlaybackState::Cancelled));
    assert_eq!(transport.state_of(b), Some(PlaybackState::Playing));
    assert_eq!(transport.current().map(|s| s.id()), Some(b));
    // A's highlight is gone, only B's first note is lit
    assert_eq!(rec.lit_names(), vec!["G4"]);
    assert_eq!(transport.retiring().len(), 1);

    // B's next note (1700) comes before A's pending wake-up (2000)
    assert_eq!(transport.next_deadline(), Some(1700));
    let ended = transport.tick(1700, &mut rec);
    assert!(ended.is_empty());
    assert_eq!(rec.lit_names(), vec!["A4"]);

    // A exits at its resume point without striking anything else
    let ended = transport.tick(2000, &mut rec);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].id, a);
    assert_eq!(ended[0].state, PlaybackState::Cancelled);
    assert!(transport.retiring().is_empty());
    assert_eq!(rec.struck_names(), vec!["C4", "D4", "G4", "A4"]);
}

#[test]
fn test_toggle_same_label_stops() {
    let mut transport = Transport::new();
    let mut rec = Recorder::default();
    let steps = || steps_for_melody(&scale_melody(), 120);

    let first = transport.toggle("scale", steps(), 0, &mut rec);
    assert!(first.is_some());
    assert!(transport.is_current("scale"));

    let second = transport.toggle("scale", steps(), 100, &mut rec);
    assert_eq!(second, None);
    assert!(!transport.is_playing());
    assert!(rec.lit.is_empty());
    assert_eq!(transport.state_of(first.unwrap()), Some(PlaybackState::Cancelled));
}

#[test]
fn test_token_cancels_at_next_resume_point() {
    let steps = steps_for_melody(&Melody::new(["C4", "D4"], ["4n", "4n"]), 120);
    let mut transport = Transport::new();
    let mut rec = Recorder::default();
    let id = transport.start("token", steps, 0, &mut rec);

    let token = transport.current().unwrap().token();
    token.cancel();
    assert!(token.is_cancelled());
    // signalled, not preempted: the key stays lit until the session resumes
    assert_eq!(rec.lit_names(), vec!["C4"]);

    let ended = transport.tick(500, &mut rec);
    assert_eq!(ended[0].id, id);
    assert_eq!(ended[0].state, PlaybackState::Cancelled);
    assert!(rec.lit.is_empty());
    assert_eq!(rec.struck_names(), vec!["C4"]);
}

#[test]
fn test_empty_melody_finishes_immediately() {
    let mut transport = Transport::new();
    let mut rec = Recorder::default();
    transport.start("empty", Vec::new(), 0, &mut rec);
    assert!(!transport.is_playing());
    assert_eq!(transport.next_deadline(), None);
}

#[test]
fn test_stop_without_session() {
    let mut transport = Transport::new();
    let mut rec = Recorder::default();
    assert!(!transport.stop(&mut rec));
}
