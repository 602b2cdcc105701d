use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::{debug, info};

use pianola::io::{DisplayOptions, FsLoader, NotationRenderer, Synth};
use pianola::layout::keys_in_range;
use pianola::{
    load_melody, to_abc, BindingTable, Collaborators, Keyboard, KeyboardConfig, PianolaError,
    Pitch,
};

#[derive(Parser)]
#[command(name = "pianola", about = "Piano keyboard and melody tools")]
#[command(version)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a melody (.txt or .json) to ABC notation
    Abc {
        file: PathBuf,

        /// Write the document here instead of stdout
        output: Option<PathBuf>,
    },

    /// List the keys of a keyboard range and their bindings
    Keys {
        #[arg(long, default_value = "C4")]
        start: String,

        #[arg(long, default_value = "B5")]
        end: String,
    },

    /// Play a melody in real time, logging each note
    Play {
        file: PathBuf,

        /// Override tempo (BPM)
        #[arg(long)]
        tempo: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Logger not initialised: {}", e);
    }

    let result = match cli.command {
        Command::Abc { file, output } => abc(&file, output.as_deref()),
        Command::Keys { start, end } => {
            keys(&start, &end);
            Ok(())
        }
        Command::Play { file, tempo } => play(&file, tempo),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Split a path into a loader rooted at its directory and the file name.
fn loader_for(file: &Path) -> (FsLoader, String) {
    let root = file.parent().unwrap_or_else(|| Path::new("."));
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (FsLoader::new(root), name)
}

fn abc(file: &Path, output: Option<&Path>) -> Result<(), PianolaError> {
    let (loader, name) = loader_for(file);
    let document = to_abc(&load_melody(&loader, &name)?);

    match output {
        Some(path) => {
            fs::write(path, &document).map_err(|e| PianolaError::ResourceLoadFailure {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            eprintln!("Wrote ABC to {}", path.display());
        }
        None => print!("{}", document),
    }
    Ok(())
}

fn keys(start: &str, end: &str) {
    let keys = keys_in_range(start, end);
    let bindings = BindingTable::for_keys(&keys);
    for key in &keys {
        let label = bindings
            .label_for(&key.pitch)
            .map_or_else(String::new, |c| c.to_string());
        let kind = if key.is_white() { "white" } else { "black" };
        println!("{:<4} {:<6} {}", key.pitch.to_string(), kind, label);
    }
}

/// Logs tones instead of sounding them
struct LogSynth;

impl Synth for LogSynth {
    fn play_tone(&mut self, pitch: &Pitch, millis: u64) {
        info!("{} for {}ms", pitch, millis);
    }

    fn start_tone(&mut self, pitch: &Pitch) {
        info!("{} down", pitch);
    }

    fn stop_tone(&mut self, pitch: &Pitch) {
        info!("{} up", pitch);
    }
}

struct LogRenderer;

impl NotationRenderer for LogRenderer {
    fn render(
        &mut self,
        target: &str,
        document: &str,
        _options: &DisplayOptions,
    ) -> Result<(), PianolaError> {
        debug!("{}:\n{}", target, document);
        Ok(())
    }

    fn clear(&mut self, target: &str) -> Result<(), PianolaError> {
        debug!("{} cleared", target);
        Ok(())
    }
}

fn play(file: &Path, tempo: Option<u32>) -> Result<(), PianolaError> {
    let (loader, name) = loader_for(file);
    let melody = load_melody(&loader, &name)?;

    let mut config = KeyboardConfig {
        show_live_sheet: true,
        ..KeyboardConfig::default()
    };
    if let Some(t) = tempo {
        config.tempo = t;
    }
    let collaborators = Collaborators {
        synth: Box::new(LogSynth),
        renderer: Box::new(LogRenderer),
        loader: Box::new(loader),
    };
    let mut keyboard = Keyboard::new("cli", config, collaborators)?;

    let title = melody.title.clone().unwrap_or(name);
    info!("Playing '{}': {} notes", title, melody.len());

    let clock = Instant::now();
    keyboard.play(title, &melody, 0);
    while let Some(deadline) = keyboard.next_deadline() {
        let now = clock.elapsed().as_millis() as u64;
        if deadline > now {
            thread::sleep(Duration::from_millis(deadline - now));
        }
        keyboard.tick(clock.elapsed().as_millis() as u64);
    }
    Ok(())
}
