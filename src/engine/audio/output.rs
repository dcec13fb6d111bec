//! cpal-backed audio player.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::engine::audio::{AudioPlayer, Mixer, Playback, PlaybackHandle, SoundBank};
use crate::error::{GameError, Result};
use crate::game::catalog::Item;

/// Sample rate used when there is no output device to ask
pub const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// Sound bank plus a mixer feeding the default output device.
///
/// Without a usable device the engine keeps running silently: sounds
/// still load and handles are still issued.
pub struct AudioEngine {
    bank: SoundBank,
    mixer: Arc<Mutex<Mixer>>,
    stream: Option<cpal::Stream>,
    released: bool,
}

impl AudioEngine {
    /// Open the default output device
    pub fn new(max_streams: usize) -> Self {
        match open_output(max_streams) {
            Ok((stream, mixer, sample_rate)) => Self {
                bank: SoundBank::new(sample_rate),
                mixer,
                stream: Some(stream),
                released: false,
            },
            Err(e) => {
                warn!("{}; continuing without sound", e);
                Self::silent(max_streams, FALLBACK_SAMPLE_RATE)
            }
        }
    }

    /// An engine with no output stream
    pub fn silent(max_streams: usize, sample_rate: u32) -> Self {
        Self {
            bank: SoundBank::new(sample_rate),
            mixer: Arc::new(Mutex::new(Mixer::new(max_streams, sample_rate))),
            stream: None,
            released: false,
        }
    }

    pub fn is_audible(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn is_playing(&self, handle: PlaybackHandle) -> bool {
        self.mixer.lock().is_active(handle)
    }
}

impl AudioPlayer for AudioEngine {
    fn prepare(&mut self, item: &Item) {
        if self.released {
            warn!("prepare({}) after audio release ignored", item.name);
            return;
        }
        if self.bank.prepare(item.sound) {
            debug!("Loading sound for {}: {}", item.name, item.sound);
        }
    }

    fn play(&mut self, item: &Item, playback: Playback) -> Option<PlaybackHandle> {
        if self.released {
            warn!("play({}) after audio release ignored", item.name);
            return None;
        }
        let Some(samples) = self.bank.get(item.sound) else {
            debug!("No sound available for {}", item.name);
            return None;
        };
        Some(self.mixer.lock().start(samples, playback))
    }

    fn stop(&mut self, handle: PlaybackHandle) {
        self.mixer.lock().stop(handle);
    }

    fn poll(&mut self) {
        if !self.released {
            self.bank.poll();
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        // dropping the stream stops the callback before the voices go
        self.stream.take();
        self.mixer.lock().clear();
        self.bank.clear();
        self.released = true;
        info!("Audio released");
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.release();
    }
}

fn open_output(max_streams: usize) -> Result<(cpal::Stream, Arc<Mutex<Mixer>>, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| GameError::AudioDevice("no audio output device found".to_string()))?;
    let config = device
        .default_output_config()
        .map_err(|e| GameError::AudioDevice(format!("failed to get audio config: {}", e)))?;

    let sample_rate = config.sample_rate().0;
    info!(
        "Audio: {} @ {}Hz, {} channels",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        sample_rate,
        config.channels()
    );

    let mixer = Arc::new(Mutex::new(Mixer::new(max_streams, sample_rate)));
    let stream_config: cpal::StreamConfig = config.clone().into();
    let shared = Arc::clone(&mixer);
    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, shared),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, shared),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, shared),
        other => Err(GameError::AudioDevice(format!(
            "unsupported sample format {:?}",
            other
        ))),
    }?;
    stream
        .play()
        .map_err(|e| GameError::AudioDevice(format!("failed to start audio stream: {}", e)))?;

    Ok((stream, mixer, sample_rate))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch: Vec<f32> = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                mixer.lock().render(&mut scratch, channels);
                for (out, &sample) in data.iter_mut().zip(scratch.iter()) {
                    *out = T::from_sample(sample);
                }
            },
            |err| warn!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| GameError::AudioDevice(format!("failed to build audio stream: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::audio::SoundStatus;
    use crate::game::catalog::Catalog;
    use std::time::{Duration, Instant};

    fn ready_engine(item: &Item) -> AudioEngine {
        let mut engine = AudioEngine::silent(5, 8_000);
        engine.prepare(item);
        let deadline = Instant::now() + Duration::from_secs(10);
        while engine.bank().status(item.sound) != Some(SoundStatus::Ready) {
            assert!(Instant::now() < deadline, "sound never loaded");
            std::thread::sleep(Duration::from_millis(5));
            engine.poll();
        }
        engine
    }

    #[test]
    fn play_before_loaded_has_no_handle() {
        let catalog = Catalog::builtin().unwrap();
        let mut engine = AudioEngine::silent(5, 8_000);
        // nothing prepared at all
        assert!(engine.play(&catalog.items()[0], Playback::FULL).is_none());
    }

    #[test]
    fn play_and_stop_once_loaded() {
        let catalog = Catalog::builtin().unwrap();
        let item = &catalog.items()[1];
        let mut engine = ready_engine(item);
        let handle = engine.play(item, Playback::FULL).unwrap();
        assert!(engine.is_playing(handle));
        engine.stop(handle);
        assert!(!engine.is_playing(handle));
        engine.stop(handle);
    }

    #[test]
    fn release_is_idempotent_and_blocks_play() {
        let catalog = Catalog::builtin().unwrap();
        let item = &catalog.items()[0];
        let mut engine = ready_engine(item);
        let handle = engine.play(item, Playback::FULL).unwrap();
        engine.release();
        engine.release();
        assert!(engine.is_released());
        assert!(!engine.is_playing(handle));
        assert!(engine.play(item, Playback::FULL).is_none());
        assert!(engine.bank().is_empty());
    }

    #[test]
    fn dropping_mid_playback_releases_voices() {
        let catalog = Catalog::builtin().unwrap();
        let item = &catalog.items()[2];
        let mixer = {
            let mut engine = ready_engine(item);
            engine.play(item, Playback::FULL).unwrap();
            engine.play(item, Playback::AMBIENT).unwrap();
            let mixer = Arc::clone(&engine.mixer);
            assert_eq!(mixer.lock().active_count(), 2);
            mixer
        };
        assert_eq!(mixer.lock().active_count(), 0);
        // only the test's handle is left
        assert_eq!(Arc::strong_count(&mixer), 1);
    }

    #[test]
    fn drop_after_release_does_not_release_again() {
        let catalog = Catalog::builtin().unwrap();
        let item = &catalog.items()[0];
        let mut engine = ready_engine(item);
        engine.play(item, Playback::FULL).unwrap();
        engine.release();
        let mixer = Arc::clone(&engine.mixer);
        // a voice started behind the engine's back stays put if Drop is a no-op
        mixer.lock().start(vec![0.0f32; 64].into(), Playback::FULL);
        drop(engine);
        assert_eq!(mixer.lock().active_count(), 1);
    }
}
