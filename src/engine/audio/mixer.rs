//! Fixed-size voice pool mixed into the output buffer.

use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;

use crate::engine::audio::{Playback, PlaybackHandle};

/// Fade applied when a playback is cut short, to avoid a click
const CUT_FADE_SAMPLES: usize = 256;

struct Voice {
    handle: PlaybackHandle,
    samples: Arc<[f32]>,
    cursor: usize,
    end: usize,
    volume: f32,
    fade_from: usize,
}

impl Voice {
    fn next_sample(&mut self) -> f32 {
        let mut gain = self.volume;
        if self.cursor >= self.fade_from {
            let remaining = self.end - self.cursor;
            gain *= remaining as f32 / CUT_FADE_SAMPLES as f32;
        }
        let sample = self.samples[self.cursor] * gain;
        self.cursor += 1;
        sample
    }

    fn finished(&self) -> bool {
        self.cursor >= self.end
    }
}

/// At most `max_voices` sounds at once; starting one more evicts the oldest
pub struct Mixer {
    voices: VecDeque<Voice>,
    max_voices: usize,
    sample_rate: u32,
    next_handle: u64,
}

impl Mixer {
    pub fn new(max_voices: usize, sample_rate: u32) -> Self {
        Self {
            voices: VecDeque::with_capacity(max_voices),
            max_voices: max_voices.max(1),
            sample_rate,
            next_handle: 1,
        }
    }

    pub fn start(&mut self, samples: Arc<[f32]>, playback: Playback) -> PlaybackHandle {
        if self.voices.len() >= self.max_voices {
            if let Some(oldest) = self.voices.pop_front() {
                debug!("Voice pool full, dropping playback {:?}", oldest.handle);
            }
        }
        let handle = PlaybackHandle(self.next_handle);
        self.next_handle += 1;

        let end = match playback.max_duration {
            Some(limit) => {
                let limit = (limit.as_secs_f64() * self.sample_rate as f64) as usize;
                limit.min(samples.len())
            }
            None => samples.len(),
        };
        let fade_from = if end < samples.len() {
            end.saturating_sub(CUT_FADE_SAMPLES)
        } else {
            usize::MAX
        };
        self.voices.push_back(Voice {
            handle,
            samples,
            cursor: 0,
            end,
            volume: playback.volume,
            fade_from,
        });
        handle
    }

    /// Returns whether the playback was still running
    pub fn stop(&mut self, handle: PlaybackHandle) -> bool {
        let before = self.voices.len();
        self.voices.retain(|v| v.handle != handle);
        self.voices.len() != before
    }

    pub fn is_active(&self, handle: PlaybackHandle) -> bool {
        self.voices.iter().any(|v| v.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.voices.len()
    }

    pub fn clear(&mut self) {
        self.voices.clear();
    }

    /// Overwrite `out` (interleaved, `channels` wide) with the mix of every
    /// voice, dropping voices that run out
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        out.fill(0.0);
        for frame in out.chunks_mut(channels) {
            let mut sum = 0.0f32;
            for voice in self.voices.iter_mut().filter(|v| !v.finished()) {
                sum += voice.next_sample();
            }
            let sum = sum.clamp(-1.0, 1.0);
            frame.iter_mut().for_each(|s| *s = sum);
        }
        self.voices.retain(|v| !v.finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tone(len: usize, level: f32) -> Arc<[f32]> {
        vec![level; len].into()
    }

    #[test]
    fn full_pool_evicts_oldest() {
        let mut mixer = Mixer::new(2, 1000);
        let a = mixer.start(tone(100, 0.1), Playback::FULL);
        let b = mixer.start(tone(100, 0.1), Playback::FULL);
        let c = mixer.start(tone(100, 0.1), Playback::FULL);
        assert!(!mixer.is_active(a));
        assert!(mixer.is_active(b));
        assert!(mixer.is_active(c));
        assert_eq!(mixer.active_count(), 2);
    }

    #[test]
    fn stop_is_a_no_op_for_unknown_or_finished() {
        let mut mixer = Mixer::new(5, 1000);
        let a = mixer.start(tone(4, 0.5), Playback::FULL);
        assert!(!mixer.stop(PlaybackHandle(999)));
        let mut out = [0.0; 8];
        mixer.render(&mut out, 1);
        assert!(!mixer.is_active(a));
        assert!(!mixer.stop(a));
    }

    #[test]
    fn render_sums_voices_into_every_channel_and_clips() {
        let mut mixer = Mixer::new(5, 1000);
        mixer.start(tone(3, 0.25), Playback::FULL);
        mixer.start(tone(3, 0.5), Playback::FULL);
        let mut out = [9.0; 8];
        mixer.render(&mut out, 2);
        assert_eq!(out, [0.75, 0.75, 0.75, 0.75, 0.75, 0.75, 0.0, 0.0]);

        mixer.start(tone(2, 0.8), Playback::FULL);
        mixer.start(tone(2, 0.8), Playback::FULL);
        let mut out = [0.0; 2];
        mixer.render(&mut out, 1);
        assert_eq!(out, [1.0, 1.0]);
    }

    #[test]
    fn max_duration_and_volume_apply() {
        let mut mixer = Mixer::new(5, 1000);
        let playback = Playback {
            volume: 0.5,
            max_duration: Some(Duration::from_millis(10)),
        };
        mixer.start(tone(1000, 1.0), playback);
        let mut out = vec![0.0; 20];
        mixer.render(&mut out, 1);
        assert_eq!(mixer.active_count(), 0);
        assert!(out[..10].iter().all(|&s| s > 0.0 && s <= 0.5));
        assert!(out[10..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn handles_are_unique() {
        let mut mixer = Mixer::new(1, 1000);
        let a = mixer.start(tone(1, 0.1), Playback::FULL);
        let b = mixer.start(tone(1, 0.1), Playback::FULL);
        assert_ne!(a, b);
    }
}
