//! # Keyboard Configuration
//!
//! Options for a keyboard instance, readable from YAML (or JSON, which YAML
//! accepts) with kebab-case keys.
//!
//! ```yaml
//! height: 180
//! start: C3
//! end: C6
//! show-live-sheet: true
//! melodies:
//!   - path: /assets/motifs/ode.json
//!     label: Ode to Joy
//! ```
//!
//! | field             | default |
//! |-------------------|---------|
//! | `height`          | 150     |
//! | `start`           | `C4`    |
//! | `end`             | `B5`    |
//! | `melodies`        | empty   |
//! | `show-sheet-music`| false   |
//! | `show-live-sheet` | false   |
//! | `recent-capacity` | 8       |
//! | `tempo`           | 120     |
//! | `mode`            | embedded|

use log::warn;
use serde::Deserialize;

use crate::duration::DEFAULT_TEMPO;
use crate::error::PianolaError;
use crate::note::pitch_index;
use crate::recent::{FLOATING_RECENT_CAPACITY, KEYBOARD_RECENT_CAPACITY};

/// How the keyboard is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardMode {
    /// Inline keyboard showing only `start..=end`; bindings follow the range
    #[default]
    Embedded,
    /// Scrollable full-range piano; `start` is the initial scroll position
    /// and bindings follow the viewport
    Floating,
}

/// A melody offered as a play button
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MelodyEntry {
    pub path: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl MelodyEntry {
    /// Button text: the label, or the path when there is none
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct KeyboardConfig {
    pub height: u32,
    pub start: String,
    pub end: String,
    pub melodies: Vec<MelodyEntry>,
    pub show_sheet_music: bool,
    pub show_live_sheet: bool,
    pub recent_capacity: usize,
    pub tempo: u32,
    pub mode: KeyboardMode,
    /// Visible width of the floating piano, used to bind keys right after
    /// construction. Without it bindings wait for the first viewport.
    pub viewport_width: Option<f64>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            height: 150,
            start: "C4".to_string(),
            end: "B5".to_string(),
            melodies: Vec::new(),
            show_sheet_music: false,
            show_live_sheet: false,
            recent_capacity: KEYBOARD_RECENT_CAPACITY,
            tempo: DEFAULT_TEMPO,
            mode: KeyboardMode::Embedded,
            viewport_width: None,
        }
    }
}

impl KeyboardConfig {
    /// Preset for the floating piano: full C2..C8 range, live sheet on.
    pub fn floating() -> Self {
        Self {
            height: 180,
            start: "C4".to_string(),
            end: "C8".to_string(),
            show_live_sheet: true,
            recent_capacity: FLOATING_RECENT_CAPACITY,
            mode: KeyboardMode::Floating,
            ..Self::default()
        }
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml(text: &str) -> Result<Self, PianolaError> {
        let config: KeyboardConfig =
            serde_yaml::from_str(text).map_err(|e| PianolaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the keyboard cannot work with.
    ///
    /// Range notes without a pitch index are accepted with a warning: they
    /// keep their lenient range semantics (see [`crate::layout::keys_in_range`]).
    pub fn validate(&self) -> Result<(), PianolaError> {
        if self.height == 0 {
            return Err(PianolaError::Config("height must be positive".to_string()));
        }
        if self.tempo == 0 {
            return Err(PianolaError::Config("tempo must be positive".to_string()));
        }
        if self.recent_capacity == 0 {
            return Err(PianolaError::Config(
                "recent-capacity must be positive".to_string(),
            ));
        }
        for (field, note) in [("start", &self.start), ("end", &self.end)] {
            if pitch_index(note).is_none() {
                warn!("{} note '{}' is not a keyboard note", field, note);
            }
        }
        if let Some(width) = self.viewport_width {
            if width.is_nan() || width <= 0.0 {
                return Err(PianolaError::Config(
                    "viewport-width must be positive".to_string(),
                ));
            }
        }
        if let Some(entry) = self.melodies.iter().find(|m| m.path.is_empty()) {
            return Err(PianolaError::Config(format!(
                "melody '{}' is missing a path",
                entry.display_label()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeyboardConfig::default();
        assert_eq!(config.height, 150);
        assert_eq!(config.start, "C4");
        assert_eq!(config.end, "B5");
        assert!(config.melodies.is_empty());
        assert!(!config.show_sheet_music);
        assert!(!config.show_live_sheet);
        assert_eq!(config.recent_capacity, 8);
        assert_eq!(config.tempo, 120);
        assert_eq!(config.mode, KeyboardMode::Embedded);
        assert_eq!(config.viewport_width, None);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
height: 180
start: C3
end: C6
show-live-sheet: true
melodies:
  - path: /assets/motifs/ode.json
    label: Ode to Joy
  - path: /assets/motifs/scale.txt
"#;
        let config = KeyboardConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.height, 180);
        assert_eq!(config.start, "C3");
        assert_eq!(config.end, "C6");
        assert!(config.show_live_sheet);
        assert!(!config.show_sheet_music);
        assert_eq!(config.melodies.len(), 2);
        assert_eq!(config.melodies[0].display_label(), "Ode to Joy");
        assert_eq!(config.melodies[1].display_label(), "/assets/motifs/scale.txt");
    }

    #[test]
    fn test_from_json_text() {
        let config =
            KeyboardConfig::from_yaml(r#"{"mode": "floating", "start": "A3"}"#).unwrap();
        assert_eq!(config.mode, KeyboardMode::Floating);
        assert_eq!(config.start, "A3");
        assert_eq!(config.end, "B5");
    }

    #[test]
    fn test_viewport_width() {
        let config = KeyboardConfig::from_yaml("mode: floating\nviewport-width: 480").unwrap();
        assert_eq!(config.viewport_width, Some(480.0));
        assert!(matches!(
            KeyboardConfig::from_yaml("viewport-width: 0"),
            Err(PianolaError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            KeyboardConfig::from_yaml("height: 0"),
            Err(PianolaError::Config(_))
        ));
        assert!(matches!(
            KeyboardConfig::from_yaml("height: tall"),
            Err(PianolaError::Config(_))
        ));
        assert!(matches!(
            KeyboardConfig::from_yaml("melodies:\n  - path: ''\n    label: Empty"),
            Err(PianolaError::Config(_))
        ));
    }

    #[test]
    fn test_floating_preset() {
        let config = KeyboardConfig::floating();
        assert_eq!(config.mode, KeyboardMode::Floating);
        assert_eq!(config.recent_capacity, 12);
        assert_eq!(config.end, "C8");
        assert!(config.validate().is_ok());
    }
}
