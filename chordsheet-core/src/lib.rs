//! # Chordsheet Core
//!
//! WASM-compatible core library for chordsheet: chord transposition over
//! lyrics-and-chords performance sheets, song records, and tempo helpers.
//! Pure functions only; no audio or file I/O.
//!
//! ## Features
//!
//! - **serde**: Enable (de)serialization of songs and spans
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//! - **colored**: Enable colored terminal output (disabled in WASM)
//!
//! ## Example
//!
//! ```
//! use chordsheet_core::{display_key, transpose_sheet};
//!
//! let sheet = "G        Em7\nThe splendor of the King";
//! assert_eq!(transpose_sheet(sheet, 2), "A        F#m7\nThe splendor of the King");
//! assert_eq!(display_key("C", 2).unwrap().to_string(), "D");
//! ```

pub mod error;
pub mod sheet;
pub mod types;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::TransposeError;
pub use sheet::{highlight_spans, respell_sheet, transpose_sheet, HighlightSpan, SheetView};
pub use types::{
    display_key, resolve_pitch_class, transpose_chord_symbol, Bpm, ChordSymbol, Key, PitchClass,
    Song,
};
