//! Audio sidetone key.
//!
//! The cpal stream is not `Send`, so it lives on a dedicated thread that parks
//! until the key is dropped. Key state crosses threads through an atomic.

use std::f32::consts::TAU;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};

use super::Key;

/// Envelope ramp length; avoids clicks on key transitions.
const RAMP_SECONDS: f32 = 0.005;
const AMPLITUDE: f32 = 0.4;

pub struct BeepKey {
    keyed: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    audio_thread: Option<thread::JoinHandle<()>>,
}

impl BeepKey {
    /// Starts a sidetone on the default output device.
    ///
    /// # Errors
    /// Returns an error if no output device is available or the stream fails to start.
    pub fn start(tone_hz: f32) -> Result<Self> {
        let keyed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);

        let thread_keyed = Arc::clone(&keyed);
        let thread_shutdown = Arc::clone(&shutdown);
        let audio_thread = thread::Builder::new()
            .name("rekl-sidetone".into())
            .spawn(move || {
                let stream = match open_stream(tone_hz, thread_keyed) {
                    Ok(stream) => stream,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                while !thread_shutdown.load(Ordering::Acquire) {
                    thread::park();
                }
                drop(stream);
            })
            .context("Failed to spawn sidetone thread")?;

        ready_rx
            .recv()
            .context("Sidetone thread exited before starting")??;
        tracing::info!(tone_hz, "started sidetone key");

        Ok(Self {
            keyed,
            shutdown,
            audio_thread: Some(audio_thread),
        })
    }
}

fn open_stream(tone_hz: f32, keyed: Arc<AtomicBool>) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No audio output device available"))?;
    let supported = device
        .default_output_config()
        .context("Failed to query default output config")?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, tone_hz, keyed)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, tone_hz, keyed)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, tone_hz, keyed)?,
        other => anyhow::bail!("Unsupported output sample format: {other:?}"),
    };
    stream.play().context("Failed to start audio stream")?;
    Ok(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tone_hz: f32,
    keyed: Arc<AtomicBool>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = usize::from(config.channels);
    let mut tone = Tone::new(tone_hz, sample_rate);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let on = keyed.load(Ordering::Relaxed);
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(tone.next_sample(on));
                    frame.fill(value);
                }
            },
            |err| tracing::warn!(error = %err, "sidetone stream error"),
            None,
        )
        .context("Failed to build output stream")
}

/// Sine oscillator with a linear attack/release envelope.
struct Tone {
    phase: f32,
    phase_step: f32,
    gain: f32,
    gain_step: f32,
}

impl Tone {
    fn new(tone_hz: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_step: TAU * tone_hz / sample_rate,
            gain: 0.0,
            gain_step: 1.0 / (RAMP_SECONDS * sample_rate).max(1.0),
        }
    }

    fn next_sample(&mut self, on: bool) -> f32 {
        let target = if on { 1.0 } else { 0.0 };
        if self.gain < target {
            self.gain = (self.gain + self.gain_step).min(target);
        } else if self.gain > target {
            self.gain = (self.gain - self.gain_step).max(target);
        }
        let sample = self.phase.sin() * self.gain * AMPLITUDE;
        self.phase = (self.phase + self.phase_step) % TAU;
        sample
    }
}

impl Key for BeepKey {
    fn name(&self) -> &'static str {
        "beep"
    }

    fn down(&self) -> io::Result<()> {
        self.keyed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn up(&self) -> io::Result<()> {
        self.keyed.store(false, Ordering::Relaxed);
        Ok(())
    }
}

impl Drop for BeepKey {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.audio_thread.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_ramps_up_and_down() {
        let mut tone = Tone::new(700.0, 1000.0);
        // 5 ms ramp at 1 kHz = 5 samples.
        for _ in 0..5 {
            tone.next_sample(true);
        }
        assert!((tone.gain - 1.0).abs() < 1e-4);
        for _ in 0..5 {
            tone.next_sample(false);
        }
        assert!(tone.gain.abs() < 1e-4);
    }

    #[test]
    fn test_silent_when_released() {
        let mut tone = Tone::new(700.0, 48_000.0);
        for _ in 0..100 {
            assert!(tone.next_sample(false).abs() < f32::EPSILON);
        }
    }
}
