//! Tempo helpers shared by the metronome and the song view
//!
//! Everything here is pure arithmetic over timestamps the caller supplies, so
//! it runs unchanged in WebAssembly and in tests. The native metronome feeds
//! these types with its audio clock.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Tempo assumed when a song carries no usable tempo label
pub const DEFAULT_BPM: u32 = 120;

/// Beats per minute, clamped to the range a metronome accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bpm(u32);

impl Bpm {
    pub const MIN: u32 = 20;
    pub const MAX: u32 = 300;

    /// Create a tempo, clamping into `MIN..=MAX`
    pub fn new(bpm: u32) -> Self {
        Bpm(bpm.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Nudge the tempo by `delta` beats per minute, re-clamping
    pub fn step(self, delta: i32) -> Bpm {
        let raw = (self.0 as i64 + delta as i64).clamp(0, u32::MAX as i64);
        Bpm::new(raw as u32)
    }

    pub fn seconds_per_beat(self) -> f64 {
        60.0 / self.0 as f64
    }

    pub fn beat_duration(self) -> Duration {
        Duration::from_secs_f64(self.seconds_per_beat())
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Bpm(DEFAULT_BPM)
    }
}

impl fmt::Display for Bpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}

/// Pull a tempo out of a free-text label such as `"76 BPM"` or `"Slow - 60"`.
///
/// The first run of ASCII digits wins. Missing labels, labels without digits
/// and digit runs that overflow fall back to [`DEFAULT_BPM`]. The value is not
/// clamped here; wrap it in [`Bpm::new`] for playback.
pub fn bpm_from_tempo_label(label: Option<&str>) -> u32 {
    let Some(label) = label else {
        return DEFAULT_BPM;
    };

    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().unwrap_or(DEFAULT_BPM)
}

/// Tap-tempo estimator: two taps less than [`TapTempo::MAX_INTERVAL`] apart
/// set the tempo from their interval.
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    last_tap: Option<Instant>,
}

impl TapTempo {
    pub const MAX_INTERVAL: Duration = Duration::from_millis(2000);

    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap; returns the new tempo when the previous tap is recent
    pub fn tap(&mut self, at: Instant) -> Option<Bpm> {
        let tempo = self.last_tap.and_then(|last| {
            let interval = at.saturating_duration_since(last);
            if interval.is_zero() || interval >= Self::MAX_INTERVAL {
                return None;
            }
            let bpm = (60.0 / interval.as_secs_f64()).round();
            Some(Bpm::new(bpm.min(u32::MAX as f64) as u32))
        });
        self.last_tap = Some(at);
        tempo
    }

    /// Forget the previous tap
    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}

/// Estimates tempo from a stream of amplitude levels (e.g. a microphone).
///
/// A peak is a level above [`TempoDetector::PEAK_THRESHOLD`] that arrives
/// more than [`TempoDetector::MIN_PEAK_GAP`] after the previous peak. The last
/// [`TempoDetector::WINDOW`] peaks are kept; once at least
/// [`TempoDetector::MIN_PEAKS`] are present their mean spacing gives the
/// tempo, which is only reported inside `MIN_BPM < bpm < MAX_BPM`.
#[derive(Debug, Clone, Default)]
pub struct TempoDetector {
    peaks: VecDeque<Instant>,
    detected: Option<u32>,
}

impl TempoDetector {
    /// Normalized level (0.0-1.0) a sample must exceed to count as a peak
    pub const PEAK_THRESHOLD: f32 = 45.0 / 128.0;
    pub const MIN_PEAK_GAP: Duration = Duration::from_millis(200);
    pub const WINDOW: usize = 8;
    pub const MIN_PEAKS: usize = 4;
    pub const MIN_BPM: u32 = 40;
    pub const MAX_BPM: u32 = 250;

    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one level reading taken at `at`; returns the latest estimate
    pub fn observe(&mut self, at: Instant, level: f32) -> Option<u32> {
        if level.abs() <= Self::PEAK_THRESHOLD {
            return self.detected;
        }

        if let Some(&last) = self.peaks.back() {
            if at.saturating_duration_since(last) <= Self::MIN_PEAK_GAP {
                return self.detected;
            }
        }

        self.peaks.push_back(at);
        if self.peaks.len() > Self::WINDOW {
            self.peaks.pop_front();
        }

        if self.peaks.len() >= Self::MIN_PEAKS {
            if let (Some(&first), Some(&last)) = (self.peaks.front(), self.peaks.back()) {
                let span = last.saturating_duration_since(first).as_secs_f64();
                let mean = span / (self.peaks.len() - 1) as f64;
                if mean > 0.0 {
                    let bpm = (60.0 / mean).round() as u32;
                    if bpm > Self::MIN_BPM && bpm < Self::MAX_BPM {
                        self.detected = Some(bpm);
                    }
                }
            }
        }

        self.detected
    }

    /// Latest estimate without feeding a new reading
    pub fn detected(&self) -> Option<u32> {
        self.detected
    }

    /// Number of peaks currently held in the window
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    pub fn reset(&mut self) {
        self.peaks.clear();
        self.detected = None;
    }
}

/// A click booked on the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledBeat {
    /// Beat count since the grid started (0-indexed)
    pub number: u64,
    /// Audio-clock time of the beat in seconds
    pub time: f64,
}

/// Lookahead beat grid.
///
/// A timer calls [`BeatGrid::due`] with "audio clock now + lookahead"; every
/// beat falling before that horizon is handed out exactly once, so clicks can
/// be placed on exact sample positions even though the timer itself jitters.
#[derive(Debug, Clone)]
pub struct BeatGrid {
    next_time: f64,
    next_number: u64,
    bpm: Bpm,
}

impl BeatGrid {
    /// Delay between starting the grid and its first beat, in seconds
    pub const START_DELAY: f64 = 0.05;

    /// Start a grid whose first beat lands shortly after `now`
    pub fn start(now: f64, bpm: Bpm) -> Self {
        BeatGrid {
            next_time: now + Self::START_DELAY,
            next_number: 0,
            bpm,
        }
    }

    /// Change tempo; takes effect from the next beat interval
    pub fn set_bpm(&mut self, bpm: Bpm) {
        self.bpm = bpm;
    }

    pub fn bpm(&self) -> Bpm {
        self.bpm
    }

    /// Audio-clock time of the next unscheduled beat
    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    /// Take every beat that falls before `horizon`
    pub fn due(&mut self, horizon: f64) -> Vec<ScheduledBeat> {
        let mut beats = Vec::new();
        while self.next_time < horizon {
            beats.push(ScheduledBeat {
                number: self.next_number,
                time: self.next_time,
            });
            self.next_time += self.bpm.seconds_per_beat();
            self.next_number += 1;
        }
        beats
    }
}
