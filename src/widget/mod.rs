//! # Keyboard Widget
//!
//! One keyboard instance and everything it owns: its keys and their
//! computer-keyboard bindings, held-down notes, key highlights, the recent
//! notes shown as live sheet music, and the melody currently autoplaying.
//!
//! ## Modes
//! - **Embedded**: shows `start..=end`; bindings follow that range.
//! - **Floating**: shows C2..C8 and scrolls; bindings follow the viewport and
//!   are rebuilt on every [`Keyboard::set_viewport`].
//!
//! ## Highlights
//! Notes played by hand are broadcast on a [`HighlightBus`], so keyboards
//! that share a bus light the same keys. A note held on several keyboards
//! sounds once and stays lit until the last of them lets go. Autoplay
//! highlights stay on the keyboard that plays the melody.
//!
//! ## Time
//! The widget never sleeps. Drive it with [`Keyboard::tick`] and use
//! [`Keyboard::next_deadline`] to know when the next tick is due.
//!
//! ## Render Targets
//! - `{id}-live-sheet` for the live sheet
//! - `{id}-sheet-{n}` for the preview of melody `n`

pub mod bus;
pub mod group;

use std::collections::HashSet;
use std::sync::mpsc::Receiver;

use log::{debug, error};

pub use bus::{HighlightBus, HighlightEvent};
pub use group::KeyboardGroup;

use crate::abc::to_abc;
use crate::bindings::BindingTable;
use crate::config::{KeyboardConfig, KeyboardMode, MelodyEntry};
use crate::error::PianolaError;
use crate::io::{DisplayOptions, NotationRenderer, ResourceLoader, Synth};
use crate::layout::{keyboard_width, keys_in_range, place_keys, scroll_offset_for, Key, PlacedKey, Viewport};
use crate::melody::{load_melody, scale_melody, Melody};
use crate::note::{Note, Pitch};
use crate::playback::{steps_for_melody, Ended, PlaybackSink, SessionId, Transport};
use crate::recent::RecentNotes;

/// Session label of the built-in scale
pub const SCALE_LABEL: &str = "Play C Major Scale";

const FLOATING_START: &str = "C2";
const FLOATING_END: &str = "C8";

/// External services a keyboard talks to
pub struct Collaborators {
    pub synth: Box<dyn Synth>,
    pub renderer: Box<dyn NotationRenderer>,
    pub loader: Box<dyn ResourceLoader>,
}

/// Everything playback touches, kept apart from the transport so both can be
/// borrowed at once.
struct Output {
    synth: Box<dyn Synth>,
    renderer: Box<dyn NotationRenderer>,
    recent: RecentNotes,
    record_autoplay: bool,
    live_sheet: Option<(String, DisplayOptions)>,
    autoplay_lit: HashSet<Pitch>,
    shared_lit: HashSet<Pitch>,
    shown: HashSet<Pitch>,
    bus: HighlightBus,
    inbox: Receiver<HighlightEvent>,
}

impl Output {
    fn note_played(&mut self, pitch: Pitch) {
        self.recent.push(pitch);
        self.refresh_live_sheet();
    }

    fn refresh_live_sheet(&mut self) {
        let (target, options) = match &self.live_sheet {
            Some(sheet) => sheet,
            None => return,
        };
        let result = if self.recent.is_empty() {
            self.renderer.clear(target)
        } else {
            let document = to_abc(&self.recent.to_melody());
            self.renderer.render(target, &document, options)
        };
        if let Err(e) = result {
            error!("Live sheet not updated: {}", e);
        }
    }

    fn sync(&mut self) {
        while let Ok(event) = self.inbox.try_recv() {
            match event {
                HighlightEvent::On(pitch) => {
                    if self.shown.contains(&pitch) {
                        self.shared_lit.insert(pitch);
                    }
                }
                HighlightEvent::Off(pitch) => {
                    self.shared_lit.remove(&pitch);
                }
            }
        }
    }
}

impl PlaybackSink for Output {
    fn strike(&mut self, pitch: &Pitch, millis: u64) {
        self.synth.play_tone(pitch, millis);
        self.autoplay_lit.insert(*pitch);
        if self.record_autoplay {
            self.note_played(*pitch);
        }
    }

    fn release(&mut self, pitch: &Pitch) {
        self.autoplay_lit.remove(pitch);
    }
}

/// A keyboard instance
pub struct Keyboard {
    id: String,
    config: KeyboardConfig,
    keys: Vec<Key>,
    placed: Vec<PlacedKey>,
    bindings: BindingTable,
    held: HashSet<Pitch>,
    transport: Transport,
    loader: Box<dyn ResourceLoader>,
    output: Output,
}

impl Keyboard {
    /// Create a keyboard with a private highlight bus.
    pub fn new(
        id: impl Into<String>,
        config: KeyboardConfig,
        collaborators: Collaborators,
    ) -> Result<Self, PianolaError> {
        Self::with_bus(id, config, collaborators, HighlightBus::new())
    }

    /// Create a keyboard that shares highlights over `bus`.
    ///
    /// With `show_sheet_music`, the configured melodies are loaded and their
    /// previews rendered; a melody that fails to load is logged and skipped.
    pub fn with_bus(
        id: impl Into<String>,
        config: KeyboardConfig,
        collaborators: Collaborators,
        bus: HighlightBus,
    ) -> Result<Self, PianolaError> {
        config.validate()?;
        let id = id.into();

        let (keys, bindings) = match config.mode {
            KeyboardMode::Embedded => {
                let keys = keys_in_range(&config.start, &config.end);
                let bindings = BindingTable::for_keys(&keys);
                (keys, bindings)
            }
            KeyboardMode::Floating => (
                keys_in_range(FLOATING_START, FLOATING_END),
                BindingTable::new(),
            ),
        };
        let placed = place_keys(&keys);

        let live_sheet = if config.show_live_sheet {
            let options = match config.mode {
                KeyboardMode::Embedded => DisplayOptions::LIVE_SHEET,
                KeyboardMode::Floating => DisplayOptions::FLOATING_LIVE_SHEET,
            };
            Some((format!("{}-live-sheet", id), options))
        } else {
            None
        };

        let inbox = bus.subscribe();
        let output = Output {
            synth: collaborators.synth,
            renderer: collaborators.renderer,
            recent: RecentNotes::new(config.recent_capacity),
            record_autoplay: config.mode == KeyboardMode::Floating,
            live_sheet,
            autoplay_lit: HashSet::new(),
            shared_lit: HashSet::new(),
            shown: keys.iter().map(|k| k.pitch).collect(),
            bus,
            inbox,
        };

        debug!("keyboard '{}' shows {} keys", id, keys.len());

        let mut keyboard = Self {
            id,
            config,
            keys,
            placed,
            bindings,
            held: HashSet::new(),
            transport: Transport::new(),
            loader: collaborators.loader,
            output,
        };
        if let (KeyboardMode::Floating, Some(width)) =
            (keyboard.config.mode, keyboard.config.viewport_width)
        {
            let scroll_left = keyboard.start_scroll_offset().unwrap_or(0.0);
            keyboard.set_viewport(&Viewport::new(scroll_left, width));
        }
        if keyboard.config.show_sheet_music {
            keyboard.render_sheet_previews();
        }
        Ok(keyboard)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Keys shown, in ascending pitch order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn placed_keys(&self) -> &[PlacedKey] {
        &self.placed
    }

    pub fn width(&self) -> f64 {
        keyboard_width(&self.placed)
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Label drawn on `pitch`'s key
    pub fn label_for(&self, pitch: &Pitch) -> Option<char> {
        self.bindings.label_for(pitch)
    }

    pub fn melodies(&self) -> &[MelodyEntry] {
        &self.config.melodies
    }

    /// Scroll position that puts the start note at the left edge (floating
    /// mode only).
    pub fn start_scroll_offset(&self) -> Option<f64> {
        if self.config.mode != KeyboardMode::Floating {
            return None;
        }
        let note = Note::parse(&self.config.start).ok()?;
        scroll_offset_for(&self.placed, &note)
    }

    /// Rebuild the bindings for the keys fully visible in `viewport`.
    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.bindings = BindingTable::for_viewport(&self.placed, viewport);
        debug!(
            "keyboard '{}' rebound {} keys at scroll {}",
            self.id,
            self.bindings.len(),
            viewport.scroll_left
        );
    }

    /// Handle a key press. Returns `false` if `input` is not bound.
    pub fn press(&mut self, input: char) -> bool {
        match self.bindings.get(input).copied() {
            Some(pitch) => {
                self.play_note(pitch);
                true
            }
            None => false,
        }
    }

    /// Handle a key release. Returns `false` if `input` is not bound.
    pub fn release(&mut self, input: char) -> bool {
        match self.bindings.get(input).copied() {
            Some(pitch) => {
                self.stop_note(pitch);
                true
            }
            None => false,
        }
    }

    /// Start sounding `pitch` until [`Keyboard::stop_note`].
    ///
    /// A note already held here does nothing. A note held on another keyboard
    /// of the same bus is joined: it is not struck again, and it keeps
    /// sounding until every holder has let go.
    pub fn play_note(&mut self, pitch: Pitch) {
        if !self.held.insert(pitch) {
            return;
        }
        if !self.output.bus.hold(pitch) {
            return;
        }
        self.output.synth.start_tone(&pitch);
        self.output.bus.publish(HighlightEvent::On(pitch));
        self.output.sync();
        self.output.note_played(pitch);
    }

    pub fn stop_note(&mut self, pitch: Pitch) {
        if !self.held.remove(&pitch) {
            return;
        }
        if !self.output.bus.let_go(pitch) {
            return;
        }
        self.output.synth.stop_tone(&pitch);
        self.output.bus.publish(HighlightEvent::Off(pitch));
        self.output.sync();
    }

    pub fn is_held(&self, pitch: &Pitch) -> bool {
        self.held.contains(pitch)
    }

    /// Apply highlight changes broadcast by other keyboards.
    pub fn sync_highlights(&mut self) {
        self.output.sync();
    }

    pub fn is_highlighted(&self, pitch: &Pitch) -> bool {
        self.output.autoplay_lit.contains(pitch) || self.output.shared_lit.contains(pitch)
    }

    /// Highlighted keys in ascending pitch order
    pub fn highlighted(&self) -> Vec<Pitch> {
        self.keys
            .iter()
            .map(|k| k.pitch)
            .filter(|p| self.is_highlighted(p))
            .collect()
    }

    pub fn recent(&self) -> &RecentNotes {
        &self.output.recent
    }

    /// Forget the recent notes and blank the live sheet.
    pub fn clear_recent(&mut self) {
        self.output.recent.clear();
        self.output.refresh_live_sheet();
    }

    /// Play or stop configured melody `index`.
    ///
    /// If that melody is already playing it is stopped and `Ok(None)` is
    /// returned. Otherwise the melody is loaded and started, cancelling any
    /// other melody. A melody without notes stops the running one and also
    /// yields `Ok(None)`. A load failure is logged and returned, and leaves
    /// the current playback untouched.
    pub fn play_melody(
        &mut self,
        index: usize,
        now: u64,
    ) -> Result<Option<SessionId>, PianolaError> {
        let path = match self.config.melodies.get(index) {
            Some(entry) => entry.path.clone(),
            None => {
                return Err(PianolaError::Config(format!(
                    "keyboard '{}' has no melody {}",
                    self.id, index
                )))
            }
        };

        if self.transport.is_current(&path) {
            self.transport.stop(&mut self.output);
            return Ok(None);
        }

        let melody = load_melody(self.loader.as_ref(), &path).map_err(|e| {
            error!("Error loading melody: {}", e);
            e
        })?;
        Ok(self.play(path, &melody, now))
    }

    /// Play or stop the built-in C major scale.
    pub fn play_scale(&mut self, now: u64) -> Option<SessionId> {
        let steps = steps_for_melody(&scale_melody(), self.config.tempo);
        self.transport
            .toggle(SCALE_LABEL, steps, now, &mut self.output)
    }

    /// Start `melody` under `label`, cancelling whatever is playing.
    ///
    /// Returns `None` if the melody finished at once (it has no steps).
    pub fn play(
        &mut self,
        label: impl Into<String>,
        melody: &Melody,
        now: u64,
    ) -> Option<SessionId> {
        let steps = steps_for_melody(melody, self.config.tempo);
        let id = self.transport.start(label, steps, now, &mut self.output);
        self.transport.is_playing().then_some(id)
    }

    /// Cancel the running melody. Returns `false` if nothing was playing.
    pub fn stop_playback(&mut self) -> bool {
        self.transport.stop(&mut self.output)
    }

    pub fn playback(&self) -> &Transport {
        &self.transport
    }

    /// Label of the melody playing now
    pub fn now_playing(&self) -> Option<&str> {
        self.transport.current().map(|s| s.label())
    }

    /// Resume playback due by `now` and pick up broadcast highlights.
    pub fn tick(&mut self, now: u64) -> Vec<Ended> {
        let ended = self.transport.tick(now, &mut self.output);
        self.output.sync();
        ended
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.transport.next_deadline()
    }

    /// Render the sheet music preview of every configured melody. Returns
    /// how many previews were rendered.
    pub fn render_sheet_previews(&mut self) -> usize {
        let mut rendered = 0;
        for (i, entry) in self.config.melodies.iter().enumerate() {
            let melody = match load_melody(self.loader.as_ref(), &entry.path) {
                Ok(melody) => melody,
                Err(e) => {
                    error!("Error loading melody: {}", e);
                    continue;
                }
            };
            let target = format!("{}-sheet-{}", self.id, i);
            match self
                .output
                .renderer
                .render(&target, &to_abc(&melody), &DisplayOptions::MELODY_PREVIEW)
            {
                Ok(()) => rendered += 1,
                Err(e) => error!("Sheet music not rendered: {}", e),
            }
        }
        rendered
    }
}
