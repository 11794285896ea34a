use crate::audio::click::{ClickSound, ClickVoice};
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Output stream that plays clicks at exact frame positions.
///
/// The frame counter advanced by the audio callback is the clock every click
/// is scheduled against.
pub struct ClickOutput {
    stream: Stream,
    sample_rate: u32,
    frames: Arc<AtomicU64>,
    sound_enabled: Arc<AtomicBool>,
    schedule_tx: Sender<u64>,
}

impl ClickOutput {
    pub fn new(sound: ClickSound, sound_enabled: bool) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();
        let sample_rate = config.sample_rate.0;

        let frames = Arc::new(AtomicU64::new(0));
        let enabled = Arc::new(AtomicBool::new(sound_enabled));
        let (schedule_tx, schedule_rx) = unbounded();

        let shared = StreamShared {
            sound,
            frames: frames.clone(),
            enabled: enabled.clone(),
            schedule_rx,
        };
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, shared)?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, shared)?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, shared)?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };

        let output = ClickOutput {
            stream,
            sample_rate,
            frames,
            sound_enabled: enabled,
            schedule_tx,
        };
        output.play()?;
        tracing::debug!(sample_rate, ?sample_format, "click output started");
        Ok(output)
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        shared: StreamShared,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0 as f32;
        let StreamShared {
            sound,
            frames,
            enabled,
            schedule_rx,
        } = shared;

        let mut pending: Vec<u64> = Vec::with_capacity(16);
        let mut voices: Vec<ClickVoice> = Vec::with_capacity(4);

        let err_fn = |err| tracing::error!("an error occurred on the output audio stream: {}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    pending.extend(schedule_rx.try_iter());
                    let mut frame = frames.load(Ordering::Relaxed);

                    for out in data.chunks_mut(channels) {
                        let mut i = 0;
                        while i < pending.len() {
                            if pending[i] <= frame {
                                pending.swap_remove(i);
                                if enabled.load(Ordering::Relaxed) {
                                    voices.push(ClickVoice::new(sound, sample_rate));
                                }
                            } else {
                                i += 1;
                            }
                        }

                        let mut summed_value = 0.0;
                        for voice in voices.iter_mut() {
                            summed_value += voice.next_sample();
                        }

                        let value: T = cpal::Sample::from_sample(summed_value.clamp(-1.0, 1.0));
                        for sample in out.iter_mut() {
                            *sample = value;
                        }
                        frame += 1;
                    }

                    voices.retain(|v| !v.is_finished());
                    frames.store(frame, Ordering::Relaxed);
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio clock in seconds
    pub fn current_time(&self) -> f64 {
        self.frames.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }

    /// Queue a click at an audio-clock time; past times play immediately
    pub fn schedule_click(&self, time: f64) -> Result<()> {
        let frame = (time.max(0.0) * self.sample_rate as f64).round() as u64;
        self.schedule_tx
            .send(frame)
            .map_err(|_| anyhow!("Output stream is gone"))
    }

    /// Mute or unmute clicks without disturbing the clock
    pub fn set_sound(&self, enabled: bool) {
        self.sound_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn play(&self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| anyhow!("Failed to play stream: {}", e))
    }
}

/// State moved into the audio callback
struct StreamShared {
    sound: ClickSound,
    frames: Arc<AtomicU64>,
    enabled: Arc<AtomicBool>,
    schedule_rx: Receiver<u64>,
}
