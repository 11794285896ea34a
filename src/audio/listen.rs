//! Microphone tempo detection
//!
//! Each input buffer is reduced to its peak level and fed to a
//! [`TempoDetector`]; the detector decides what counts as a beat.

use anyhow::{anyhow, Result};
use chordsheet_core::types::tempo::TempoDetector;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// Default listening window
pub const DEFAULT_LISTEN: Duration = Duration::from_secs(8);

/// Listen to the default input device and report the detected tempo
pub fn listen(duration: Duration) -> Result<Option<u32>> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;
    let config = device.default_input_config()?;

    let sample_format = config.sample_format();
    let config: StreamConfig = config.into();

    let (level_tx, level_rx) = unbounded();
    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, level_tx)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, level_tx)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, level_tx)?,
        _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
    };
    stream
        .play()
        .map_err(|e| anyhow!("Failed to start input stream: {}", e))?;
    tracing::info!(seconds = duration.as_secs_f32(), "listening for tempo");

    let mut detector = TempoDetector::new();
    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match level_rx.recv_timeout(remaining) {
            Ok(level) => {
                let previous = detector.detected();
                let estimate = detector.observe(Instant::now(), level);
                if let Some(bpm) = estimate.filter(|_| estimate != previous) {
                    tracing::debug!(bpm, peaks = detector.peak_count(), "tempo estimate");
                }
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(anyhow!("Input stream stopped unexpectedly"));
            }
        }
    }

    drop(stream);
    Ok(detector.detected())
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    level_tx: Sender<f32>,
) -> Result<Stream>
where
    T: Sample + SizedSample + Send + 'static,
    f32: FromSample<T>,
{
    let err_fn = |err| tracing::error!("an error occurred on the input audio stream: {}", err);

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let _ = level_tx.send(peak_level(data));
            },
            err_fn,
            None,
        )
        .map_err(|e| anyhow!("Failed to build input stream: {}", e))?;

    Ok(stream)
}

/// Largest absolute sample in a buffer, 0.0-1.0
fn peak_level<T>(data: &[T]) -> f32
where
    T: Sample,
    f32: FromSample<T>,
{
    data.iter()
        .map(|&s| <f32 as Sample>::from_sample(s).abs())
        .fold(0.0, f32::max)
}
