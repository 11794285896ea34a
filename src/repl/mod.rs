//! Interactive session over a song sheet

use crate::commands::sheet::render_view;
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::config::Settings;
use crate::repl::watcher::{is_content_change, FileWatcher};
use crate::song_file::load_song;
use anyhow::{anyhow, Context, Result};
use chordsheet_core::SheetView;
use colored::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::Event;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use std::thread;

pub mod watcher;

/// Types of events the session loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Interactive session
pub struct Repl {
    editor: Option<DefaultEditor>,
    registry: CommandRegistry,
    ctx: CommandContext,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    tx_watcher: Sender<notify::Result<Event>>,
    rx_watcher: Receiver<notify::Result<Event>>,

    // File watcher
    watcher: Option<FileWatcher>,
}

impl Repl {
    /// Create a session, optionally with a song already on the stand
    pub fn new(settings: Settings, song: Option<&Path>) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        let mut ctx = CommandContext::new(settings);

        if let Some(path) = song {
            let loaded = load_song(path)?;
            ctx.open_song(SheetView::new(loaded), Some(path.to_path_buf()));
        }

        let (tx_input, rx_input) = unbounded();
        let (tx_watcher, rx_watcher) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            registry: create_registry(),
            ctx,
            tx_input,
            rx_input,
            tx_watcher,
            rx_watcher,
            watcher: None,
        })
    }

    /// Start the session loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎵".bright_yellow(),
            "Chordsheet".bright_cyan().bold()
        );
        println!(
            "Try: {}, {}, {}",
            "load <file>".cyan(),
            "up 2".cyan(),
            "click".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        if let Some(view) = &self.ctx.view {
            println!("{}\n", render_view(view, self.ctx.color()));
        }

        // Move editor to thread
        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow!("Session is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "chordsheet>".bright_magenta().bold());
            let readline = editor.readline(&prompt);

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if line.is_empty() {
                            continue;
                        }
                        if !self.handle_line(&line) {
                            println!("{} 🎵", "Goodbye!".bright_cyan());
                            break;
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                        println!("{} 🎵", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },

                recv(self.rx_watcher) -> msg => match msg {
                    Ok(Ok(event)) => {
                        if is_content_change(&event.kind) {
                            for path in event.paths {
                                self.reload(&path);
                            }
                        }
                    }
                    Ok(Err(e)) => println!("{} Watch error: {}", "Error:".red(), e),
                    Err(_) => break, // Channel closed
                }
            }
        }

        Ok(())
    }

    /// Run one command line; false when the session should end
    fn handle_line(&mut self, line: &str) -> bool {
        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => return false,
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::Watch(path) => self.watch(path),
            CommandResult::NotACommand => {
                println!(
                    "{} Unknown command '{}'. Type '{}' for a list.",
                    "Error:".bright_red().bold(),
                    line,
                    "help".bright_green()
                );
            }
        }
        true
    }

    fn watch(&mut self, path: PathBuf) {
        // Initialize watcher if needed
        if self.watcher.is_none() {
            match FileWatcher::new(self.tx_watcher.clone()) {
                Ok(w) => self.watcher = Some(w),
                Err(e) => {
                    println!("{} Failed to create watcher: {}", "Error:".red(), e);
                    return;
                }
            }
        }

        if let Some(w) = &mut self.watcher {
            // Only the latest song file is watched
            match w.follow(&path) {
                Ok(()) => println!(
                    "{} Watching {} for changes...",
                    "👀".bright_cyan(),
                    path.display().to_string().bright_green()
                ),
                Err(e) => println!(
                    "{} Failed to watch {}: {}",
                    "Error:".red(),
                    path.display(),
                    e
                ),
            }
        }
    }

    /// Re-read a changed song file, keeping the current offset
    fn reload(&mut self, path: &Path) {
        println!(
            "{} File changed: {}",
            "⚡".bright_yellow(),
            path.display()
        );
        match load_song(path) {
            Ok(song) => {
                tracing::debug!(path = %path.display(), "reloaded song");
                match &mut self.ctx.view {
                    Some(view) => view.replace_song(song),
                    None => self
                        .ctx
                        .open_song(SheetView::new(song), Some(path.to_path_buf())),
                }
                if let Some(view) = &self.ctx.view {
                    println!("{}", render_view(view, self.ctx.color()));
                }
            }
            Err(e) => println!("{} {:#}", "Error:".red(), e),
        }
    }
}

/// Convenience function to start a session
pub fn start(settings: Settings, song: Option<&Path>) -> Result<()> {
    let mut repl = Repl::new(settings, song)?;
    repl.run()
}
