//! Lookahead metronome
//!
//! A dedicated thread owns the output stream and wakes every [`LOOKAHEAD`].
//! On each wake it books every beat that falls within [`SCHEDULE_AHEAD`] of
//! the audio clock, so clicks land on exact frames even though the thread's
//! own timing jitters. Beat flashes are broadcast to subscribers.

use crate::audio::click::ClickSound;
use crate::audio::output::ClickOutput;
use crate::config::MetronomeSettings;
use anyhow::{anyhow, Context, Result};
use chordsheet_core::types::tempo::{BeatGrid, Bpm};
use colored::*;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often the scheduler wakes
pub const LOOKAHEAD: Duration = Duration::from_millis(25);

/// How far past the audio clock beats are booked, in seconds
pub const SCHEDULE_AHEAD: f64 = 0.1;

/// A beat as seen by the visual indicator
#[derive(Debug, Clone, Copy)]
pub struct BeatFlash {
    /// Beat count since start (0-indexed)
    pub number: u64,
    /// Wall-clock moment the click sounds
    pub at: Instant,
}

#[derive(Debug)]
enum MetronomeCommand {
    Start,
    Stop,
    SetBpm(Bpm),
    SetSound(bool),
    AddSubscriber(Sender<BeatFlash>),
    ClearSubscribers,
    Shutdown,
}

/// Handle to the metronome thread
pub struct Metronome {
    bpm: Arc<AtomicU32>,
    running: Arc<AtomicBool>,
    command_tx: Sender<MetronomeCommand>,
    thread: Option<JoinHandle<()>>,
}

impl Metronome {
    /// Open the output device and start the (idle) scheduler thread
    pub fn spawn(settings: &MetronomeSettings, bpm: Bpm) -> Result<Self> {
        let sound = ClickSound::from_settings(settings);
        let sound_enabled = settings.sound;

        let bpm_atomic = Arc::new(AtomicU32::new(bpm.get()));
        let running = Arc::new(AtomicBool::new(false));
        let (command_tx, command_rx) = bounded(64);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let bpm_clone = bpm_atomic.clone();
        let running_clone = running.clone();

        // cpal streams are not Send, so the stream is opened on the thread that owns it
        let thread = thread::Builder::new()
            .name("metronome".to_string())
            .spawn(move || {
                let output = match ClickOutput::new(sound, sound_enabled) {
                    Ok(output) => {
                        let _ = ready_tx.send(Ok(()));
                        output
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                MetronomeThread::new(output, bpm_clone, running_clone, command_rx).run();
            })
            .context("Failed to spawn metronome thread")?;

        let ready = ready_rx
            .recv()
            .map_err(|_| anyhow!("Metronome thread exited during startup"));
        if let Err(e) = ready.and_then(|r| r) {
            let _ = thread.join();
            return Err(e);
        }

        Ok(Metronome {
            bpm: bpm_atomic,
            running,
            command_tx,
            thread: Some(thread),
        })
    }

    /// Receive a flash for every booked beat; the channel closes on stop
    pub fn subscribe(&self) -> Receiver<BeatFlash> {
        let (tx, rx) = unbounded();
        let _ = self.command_tx.send(MetronomeCommand::AddSubscriber(tx));
        rx
    }

    /// Drop every subscriber; their receivers disconnect
    pub fn clear_subscribers(&self) {
        let _ = self.command_tx.send(MetronomeCommand::ClearSubscribers);
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
        let _ = self.command_tx.send(MetronomeCommand::Start);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.command_tx.send(MetronomeCommand::Stop);
    }

    /// Start or stop; returns whether the metronome is now running
    pub fn toggle(&self) -> bool {
        if self.is_running() {
            self.stop();
            false
        } else {
            self.start();
            true
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn set_bpm(&self, bpm: Bpm) {
        self.bpm.store(bpm.get(), Ordering::Relaxed);
        let _ = self.command_tx.send(MetronomeCommand::SetBpm(bpm));
    }

    pub fn bpm(&self) -> Bpm {
        Bpm::new(self.bpm.load(Ordering::Relaxed))
    }

    pub fn set_sound(&self, enabled: bool) {
        let _ = self.command_tx.send(MetronomeCommand::SetSound(enabled));
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        let _ = self.command_tx.send(MetronomeCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

struct MetronomeThread {
    output: ClickOutput,
    bpm: Arc<AtomicU32>,
    running: Arc<AtomicBool>,
    command_rx: Receiver<MetronomeCommand>,
    subscribers: Vec<Sender<BeatFlash>>,
    grid: Option<BeatGrid>,
}

impl MetronomeThread {
    fn new(
        output: ClickOutput,
        bpm: Arc<AtomicU32>,
        running: Arc<AtomicBool>,
        command_rx: Receiver<MetronomeCommand>,
    ) -> Self {
        Self {
            output,
            bpm,
            running,
            command_rx,
            subscribers: Vec::new(),
            grid: None,
        }
    }

    fn run(&mut self) {
        loop {
            match self.command_rx.recv_timeout(LOOKAHEAD) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.schedule_due();
        }
        tracing::debug!("metronome thread stopped");
    }

    fn handle_command(&mut self, cmd: MetronomeCommand) -> bool {
        match cmd {
            MetronomeCommand::Start => {
                if self.grid.is_none() {
                    let bpm = Bpm::new(self.bpm.load(Ordering::Relaxed));
                    self.grid = Some(BeatGrid::start(self.output.current_time(), bpm));
                    tracing::info!(%bpm, "metronome started");
                }
                self.running.store(true, Ordering::Relaxed);
            }
            MetronomeCommand::Stop => {
                if self.grid.take().is_some() {
                    tracing::info!("metronome stopped");
                }
                self.subscribers.clear();
                self.running.store(false, Ordering::Relaxed);
            }
            MetronomeCommand::SetBpm(bpm) => {
                if let Some(grid) = &mut self.grid {
                    grid.set_bpm(bpm);
                }
                tracing::debug!(%bpm, "metronome tempo changed");
            }
            MetronomeCommand::SetSound(enabled) => {
                self.output.set_sound(enabled);
            }
            MetronomeCommand::AddSubscriber(tx) => {
                self.subscribers.push(tx);
            }
            MetronomeCommand::ClearSubscribers => {
                self.subscribers.clear();
            }
            MetronomeCommand::Shutdown => {
                self.running.store(false, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    fn schedule_due(&mut self) {
        let Some(grid) = &mut self.grid else {
            return;
        };

        let now = self.output.current_time();
        let wall_now = Instant::now();
        for beat in grid.due(now + SCHEDULE_AHEAD) {
            if let Err(e) = self.output.schedule_click(beat.time) {
                tracing::warn!("dropping beat {}: {}", beat.number, e);
                continue;
            }
            let flash = BeatFlash {
                number: beat.number,
                at: wall_now + Duration::from_secs_f64((beat.time - now).max(0.0)),
            };
            self.subscribers.retain(|tx| tx.send(flash).is_ok());
            tracing::trace!(beat = beat.number, time = beat.time, "beat booked");
        }
    }
}

/// Print a pulsing indicator for each flash until the channel closes
pub fn run_flash_printer(flashes: Receiver<BeatFlash>) {
    let mut stdout = std::io::stdout();
    for flash in flashes {
        let wait = flash.at.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        let _ = write!(stdout, "\r{} {:<6}", "●".bright_yellow().bold(), flash.number + 1);
        let _ = stdout.flush();
        thread::sleep(Duration::from_millis(80));
        let _ = write!(stdout, "\r{} {:<6}", "○".dimmed(), flash.number + 1);
        let _ = stdout.flush();
    }
}

/// Spawn [`run_flash_printer`] on its own thread
pub fn spawn_flash_printer(flashes: Receiver<BeatFlash>) -> JoinHandle<()> {
    thread::spawn(move || run_flash_printer(flashes))
}
