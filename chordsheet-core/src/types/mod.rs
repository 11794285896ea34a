// chordsheet-core/src/types/mod.rs

pub mod chord;
pub mod key;
pub mod pitch;
pub mod song;
pub mod tempo;

pub use chord::{transpose_chord_symbol, ChordSymbol};
pub use key::{display_key, Key, Mode};
pub use pitch::{resolve_pitch_class, PitchClass, SHARP_NAMES};
pub use song::{Category, Song};
pub use tempo::{bpm_from_tempo_label, BeatGrid, Bpm, ScheduledBeat, TapTempo, TempoDetector};
