//! # Chordsheet
//!
//! Command-line companion for a church music team: open a song's
//! lyrics-and-chords sheet, move it to another key, and keep time with a
//! metronome, tap tempo or microphone tempo detection.
//!
//! The musical logic lives in `chordsheet-core`; this crate adds file
//! handling, audio and the interactive session.
//!
//! ## Modules
//!
//! - `audio`: click synthesis, the lookahead metronome thread and
//!   microphone listening through `cpal`.
//! - `commands`: the session command registry and its handlers.
//! - `config`: TOML settings.
//! - `repl`: the interactive session and file watching.
//! - `song_file`: loading songs and saving transposed sheets.

pub mod audio;
pub mod commands;
pub mod config;
pub mod repl;
pub mod song_file;

pub use crate::config::Settings;
pub use crate::song_file::{load_song, save_sheet};
pub use chordsheet_core::{display_key, transpose_sheet, SheetView, Song};
