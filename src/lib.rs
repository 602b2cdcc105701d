pub mod abc;
pub mod bindings;
pub mod config;
pub mod duration;
pub mod error;
pub mod io;
pub mod layout;
pub mod melody;
pub mod note;
pub mod playback;
pub mod recent;
pub mod widget;

pub use abc::to_abc;
pub use bindings::BindingTable;
pub use config::{KeyboardConfig, KeyboardMode, MelodyEntry};
pub use duration::to_notation_duration;
pub use error::*;
pub use melody::{load_melody, parse_line_melody, Melody};
pub use note::{pitch_index, to_notation_pitch, Note, Pitch};
pub use widget::{Collaborators, Keyboard, KeyboardGroup};

/// Convert line-based melody text to an ABC document.
/// This is the main entry point for the melody format used on disk.
pub fn compile_line_melody(text: &str) -> Result<String, PianolaError> {
    let melody = parse_line_melody(text)?;
    Ok(to_abc(&melody))
}

/// Convert a JSON melody to an ABC document.
pub fn compile_json_melody(text: &str) -> Result<String, PianolaError> {
    let melody = Melody::from_json(text)?;
    Ok(to_abc(&melody))
}
