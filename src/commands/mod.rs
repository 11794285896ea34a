//! Command registry for session commands
//!
//! Every line typed at the session prompt is matched against registered
//! prefixes, longest first.

pub mod general;
pub mod sheet;
pub mod tempo;

use crate::audio::metronome::spawn_flash_printer;
use crate::audio::Metronome;
use crate::config::Settings;
use chordsheet_core::types::tempo::{Bpm, TapTempo};
use chordsheet_core::SheetView;
use std::path::PathBuf;
use std::thread::JoinHandle;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, nothing to print
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the session
    Exit,
    /// No registered command matches the input
    NotACommand,
    /// Error occurred
    Error(String),
    /// Watch a file for changes
    Watch(PathBuf),
}

/// Session state passed to command handlers
pub struct CommandContext {
    pub settings: Settings,
    /// Song on the music stand, if any
    pub view: Option<SheetView>,
    /// File the current song was loaded from
    pub source: Option<PathBuf>,
    /// Session tempo
    pub bpm: Bpm,
    pub taps: TapTempo,
    /// Opened on first use of `click`
    pub metronome: Option<Metronome>,
    /// Beat flash printer while the click runs with visual on
    pub flash_printer: Option<JoinHandle<()>>,
}

impl CommandContext {
    pub fn new(settings: Settings) -> Self {
        let bpm = settings.metronome.bpm();
        Self {
            settings,
            view: None,
            source: None,
            bpm,
            taps: TapTempo::new(),
            metronome: None,
            flash_printer: None,
        }
    }

    /// Put a song on the stand; the session tempo follows the song
    pub fn open_song(&mut self, view: SheetView, source: Option<PathBuf>) {
        self.set_bpm(view.bpm());
        self.view = Some(view);
        self.source = source;
    }

    pub fn set_bpm(&mut self, bpm: Bpm) {
        self.bpm = bpm;
        if let Some(metronome) = &self.metronome {
            metronome.set_bpm(bpm);
        }
    }

    /// The loaded song, or the error message shown when there is none
    pub fn view_mut(&mut self) -> Result<&mut SheetView, CommandResult> {
        self.view
            .as_mut()
            .ok_or_else(|| CommandResult::Error("No song loaded. Use 'load <file>'".to_string()))
    }

    /// The metronome, opening the output device the first time
    pub fn metronome(&mut self) -> anyhow::Result<&Metronome> {
        if self.metronome.is_none() {
            let metronome = Metronome::spawn(&self.settings.metronome, self.bpm)?;
            self.metronome = Some(metronome);
        }
        self.metronome
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Metronome unavailable"))
    }

    /// Start the click at the session tempo; true when it was already running
    pub fn start_click(&mut self) -> anyhow::Result<bool> {
        let bpm = self.bpm;
        let visual = self.settings.metronome.visual;
        let metronome = self.metronome()?;
        metronome.set_bpm(bpm);
        if metronome.is_running() {
            return Ok(true);
        }

        // Stop drops every subscriber, so each start needs its own
        let printer = visual.then(|| spawn_flash_printer(metronome.subscribe()));
        metronome.start();
        self.flash_printer = printer;
        Ok(false)
    }

    /// Stop the click; false when it was not running
    pub fn stop_click(&mut self) -> bool {
        let stopped = match &self.metronome {
            Some(metronome) if metronome.is_running() => {
                metronome.stop();
                true
            }
            _ => false,
        };
        self.join_flash_printer();
        stopped
    }

    /// Turn the beat flash on or off, also for a click already running
    pub fn set_visual(&mut self, enabled: bool) {
        self.settings.metronome.visual = enabled;
        let Some(metronome) = self.metronome.as_ref().filter(|m| m.is_running()) else {
            return;
        };
        if enabled {
            if self.flash_printer.is_none() {
                self.flash_printer = Some(spawn_flash_printer(metronome.subscribe()));
            }
        } else {
            metronome.clear_subscribers();
            self.join_flash_printer();
        }
    }

    fn join_flash_printer(&mut self) {
        if let Some(printer) = self.flash_printer.take() {
            let _ = printer.join();
        }
    }

    pub fn color(&self) -> bool {
        self.settings.display.color
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        let input = input.trim();
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Transposition
    registry.register("up", sheet::cmd_up);
    registry.register("+", sheet::cmd_up);
    registry.register("down", sheet::cmd_down);
    registry.register("-", sheet::cmd_down);
    registry.register("reset", sheet::cmd_reset);
    registry.register("offset", sheet::cmd_offset);
    registry.register("key", sheet::cmd_key);

    // Sheet
    registry.register("show", sheet::cmd_show);
    registry.register("respell", sheet::cmd_respell);
    registry.register("load", sheet::cmd_load);
    registry.register("save", sheet::cmd_save);
    registry.register("watch", sheet::cmd_watch);

    // Tempo tools
    registry.register("tempo", tempo::cmd_tempo);
    registry.register("click", tempo::cmd_click);
    registry.register("sound", tempo::cmd_sound);
    registry.register("visual", tempo::cmd_visual);
    registry.register("tap", tempo::cmd_tap);
    registry.register("listen", tempo::cmd_listen);

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}
