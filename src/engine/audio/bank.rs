//! Decoded sounds, loaded in the background.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::engine::audio::synth;
use crate::error::{GameError, Result};
use crate::game::catalog::SoundSource;

/// Where a sound is in its loading lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundStatus {
    Pending,
    Ready,
    Failed,
}

enum Slot {
    Pending,
    Ready(Arc<[f32]>),
    Failed,
}

type Loaded = (SoundSource, Result<Vec<f32>>);

/// Mono `f32` sounds at the output sample rate, keyed by source
pub struct SoundBank {
    sample_rate: u32,
    slots: HashMap<SoundSource, Slot>,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
}

impl SoundBank {
    pub fn new(sample_rate: u32) -> Self {
        let (tx, rx) = unbounded();
        Self {
            sample_rate,
            slots: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Schedule `source` for loading unless it is already known.
    /// Returns whether a load was started.
    pub fn prepare(&mut self, source: SoundSource) -> bool {
        if self.slots.contains_key(&source) {
            return false;
        }
        self.slots.insert(source, Slot::Pending);
        let tx = self.tx.clone();
        let sample_rate = self.sample_rate;
        rayon::spawn(move || {
            let result = load(source, sample_rate);
            tx.send((source, result)).ok();
        });
        true
    }

    /// Call this every frame to receive finished loads
    pub fn poll(&mut self) -> usize {
        let mut finished = 0;
        while let Ok((source, result)) = self.rx.try_recv() {
            // a load that outlived `clear` is dropped
            let Some(slot) = self.slots.get_mut(&source) else {
                continue;
            };
            *slot = match result {
                Ok(samples) => {
                    debug!("Sound ready: {} ({} samples)", source, samples.len());
                    Slot::Ready(samples.into())
                }
                Err(e) => {
                    warn!("Sound unavailable, playing silently: {}", e);
                    Slot::Failed
                }
            };
            finished += 1;
        }
        finished
    }

    pub fn get(&self, source: SoundSource) -> Option<Arc<[f32]>> {
        match self.slots.get(&source) {
            Some(Slot::Ready(samples)) => Some(Arc::clone(samples)),
            _ => None,
        }
    }

    pub fn status(&self, source: SoundSource) -> Option<SoundStatus> {
        self.slots.get(&source).map(|slot| match slot {
            Slot::Pending => SoundStatus::Pending,
            Slot::Ready(_) => SoundStatus::Ready,
            Slot::Failed => SoundStatus::Failed,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

fn load(source: SoundSource, sample_rate: u32) -> Result<Vec<f32>> {
    match source {
        SoundSource::Synth(instrument) => Ok(synth::render(instrument, sample_rate)),
        SoundSource::File(path) => decode_wav(path, sample_rate),
    }
}

/// Decode a WAV file to mono at `sample_rate`
pub fn decode_wav(path: &str, sample_rate: u32) -> Result<Vec<f32>> {
    let fail = |reason: String| GameError::SoundDecode {
        path: path.to_string(),
        reason,
    };
    let mut reader = hound::WavReader::open(path).map_err(|e| fail(e.to_string()))?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| fail(e.to_string()))?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| fail(e.to_string()))?
        }
    };
    let channels = spec.channels.max(1) as usize;
    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();
    if mono.is_empty() {
        return Err(fail("no samples".to_string()));
    }
    Ok(resample(&mono, spec.sample_rate, sample_rate))
}

/// Linear-interpolation resample
fn resample(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
    if from == to || from == 0 || samples.len() < 2 {
        return samples.to_vec();
    }
    let ratio = from as f64 / to as f64;
    let len = ((samples.len() as f64) / ratio).floor() as usize;
    (0..len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let index = pos.floor() as usize;
            let frac = (pos - index as f64) as f32;
            let a = samples[index.min(samples.len() - 1)];
            let b = samples[(index + 1).min(samples.len() - 1)];
            a + (b - a) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::Instrument;
    use std::time::{Duration, Instant};

    fn wait_until_loaded(bank: &mut SoundBank, source: SoundSource) -> SoundStatus {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            bank.poll();
            match bank.status(source) {
                Some(SoundStatus::Pending) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(5))
                }
                Some(status) => return status,
                None => panic!("{} was never prepared", source),
            }
        }
    }

    #[test]
    fn prepare_is_idempotent() {
        let mut bank = SoundBank::new(22_050);
        let bell = SoundSource::Synth(Instrument::Bell);
        assert!(bank.prepare(bell));
        assert!(!bank.prepare(bell));
        assert_eq!(wait_until_loaded(&mut bank, bell), SoundStatus::Ready);
        let first = bank.get(bell).unwrap();

        assert!(!bank.prepare(bell));
        bank.poll();
        assert_eq!(bank.len(), 1);
        assert!(Arc::ptr_eq(&first, &bank.get(bell).unwrap()));
    }

    #[test]
    fn missing_file_is_remembered_as_failed() {
        let mut bank = SoundBank::new(44_100);
        let missing = SoundSource::File("does/not/exist.wav");
        bank.prepare(missing);
        assert_eq!(wait_until_loaded(&mut bank, missing), SoundStatus::Failed);
        assert!(bank.get(missing).is_none());
        assert!(!bank.prepare(missing));
    }

    #[test]
    fn decodes_stereo_int_wav_to_mono_at_output_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..1000 {
            writer.write_sample(i16::MAX / 2).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let mono = decode_wav(path.to_str().unwrap(), 44_100).unwrap();
        assert!((1995..=2000).contains(&mono.len()), "len {}", mono.len());
        assert!(mono.iter().all(|s| (s - 0.25).abs() < 0.01));
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![0.0, 0.5, 1.0];
        assert_eq!(resample(&samples, 48_000, 48_000), samples);
    }
}
