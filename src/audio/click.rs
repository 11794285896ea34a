//! Metronome click voice
//!
//! A short sine burst whose gain decays exponentially to [`SILENCE`] over the
//! click duration.

use crate::config::MetronomeSettings;
use std::f32::consts::PI;

/// Gain the envelope reaches at the end of a click
pub const SILENCE: f32 = 0.001;

/// Parameters shared by every click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSound {
    pub frequency: f32,
    /// Envelope length in seconds
    pub duration: f32,
    pub volume: f32,
}

impl ClickSound {
    pub fn from_settings(settings: &MetronomeSettings) -> Self {
        ClickSound {
            frequency: settings.click_frequency,
            duration: settings.click_duration_ms as f32 / 1000.0,
            volume: settings.volume.clamp(0.0, 1.0),
        }
    }
}

impl Default for ClickSound {
    fn default() -> Self {
        ClickSound::from_settings(&MetronomeSettings::default())
    }
}

/// One sounding click
pub struct ClickVoice {
    frequency: f32,
    phase: f32,
    sample_rate: f32,
    volume: f32,
    gain: f32,
    decay: f32,
    position: u32,
    length: u32,
}

impl ClickVoice {
    pub fn new(sound: ClickSound, sample_rate: f32) -> Self {
        let length = ((sound.duration * sample_rate).round() as u32).max(1);
        ClickVoice {
            frequency: sound.frequency,
            phase: 0.0,
            sample_rate,
            volume: sound.volume,
            gain: 1.0,
            // Per-sample multiplier that lands on SILENCE after `length` samples
            decay: SILENCE.powf(1.0 / length as f32),
            position: 0,
            length,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.length
    }

    /// Envelope gain of the next sample
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }

        let value = (2.0 * PI * self.phase).sin() * self.gain * self.volume;

        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        self.gain *= self.decay;
        self.position += 1;

        value
    }
}
