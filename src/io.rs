//! Collaborator interfaces: tone synthesis, notation rendering and resource
//! fetching. The engine only talks to these traits; implementations live with
//! the host (a browser bridge, a terminal front end, or a test double).

use std::fs;
use std::path::PathBuf;

use crate::error::PianolaError;
use crate::note::Pitch;

/// Sound synthesis engine
pub trait Synth {
    /// Sound `pitch` for `millis` milliseconds, then release it.
    fn play_tone(&mut self, pitch: &Pitch, millis: u64);
    /// Start sounding `pitch` until [`Synth::stop_tone`].
    fn start_tone(&mut self, pitch: &Pitch);
    fn stop_tone(&mut self, pitch: &Pitch);
}

/// Display options handed to the notation renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub scale: f32,
    pub staff_width: u32,
}

impl DisplayOptions {
    /// Live sheet under an embedded keyboard
    pub const LIVE_SHEET: DisplayOptions = DisplayOptions {
        scale: 0.6,
        staff_width: 300,
    };
    /// Live sheet above the floating piano
    pub const FLOATING_LIVE_SHEET: DisplayOptions = DisplayOptions {
        scale: 0.65,
        staff_width: 600,
    };
    /// Sheet music preview of a melody
    pub const MELODY_PREVIEW: DisplayOptions = DisplayOptions {
        scale: 0.7,
        staff_width: 450,
    };
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            scale: 0.8,
            staff_width: 500,
        }
    }
}

/// Notation rendering engine
pub trait NotationRenderer {
    /// Render an ABC `document` into the region named `target`.
    ///
    /// Returns [`PianolaError::MissingRenderTarget`] if there is no such region.
    fn render(
        &mut self,
        target: &str,
        document: &str,
        options: &DisplayOptions,
    ) -> Result<(), PianolaError>;

    /// Empty the region named `target`.
    fn clear(&mut self, target: &str) -> Result<(), PianolaError>;
}

/// Source of melody files
pub trait ResourceLoader {
    fn fetch(&self, path: &str) -> Result<String, PianolaError>;
}

/// Loads resources from a directory on disk. Leading `/` in paths is
/// resolved against the root, the way site-absolute asset paths are.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceLoader for FsLoader {
    fn fetch(&self, path: &str) -> Result<String, PianolaError> {
        let full = self.root.join(path.trim_start_matches('/'));
        fs::read_to_string(&full).map_err(|e| PianolaError::ResourceLoadFailure {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_loader_reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("pianola-fs-loader-{}", std::process::id()));
        fs::create_dir_all(dir.join("motifs")).unwrap();
        fs::write(dir.join("motifs/tune.txt"), "C Major\n4/4\nC4:4n\n").unwrap();

        let loader = FsLoader::new(&dir);
        let text = loader.fetch("/motifs/tune.txt").unwrap();
        assert!(text.starts_with("C Major"));

        match loader.fetch("motifs/missing.json") {
            Err(PianolaError::ResourceLoadFailure { path, .. }) => {
                assert_eq!(path, "motifs/missing.json")
            }
            other => panic!("expected ResourceLoadFailure, got {:?}", other),
        }

        fs::remove_dir_all(&dir).unwrap();
    }
}
