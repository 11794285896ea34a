pub mod click;
pub mod listen;
pub mod metronome;
pub mod output;

pub use click::{ClickSound, ClickVoice};
pub use listen::listen;
pub use metronome::{BeatFlash, Metronome};
