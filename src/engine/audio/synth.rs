//! Built-in instrument sounds, rendered once at load time.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::catalog::Instrument;

/// Peak level every rendered sound is normalized to
const PEAK: f32 = 0.8;

/// Render a mono sample buffer for `instrument` at `sample_rate`
pub fn render(instrument: Instrument, sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate as f32;
    let mut samples = match instrument {
        Instrument::Tambourine => tambourine(sr),
        Instrument::GuitarScratch => guitar_scratch(sr),
        Instrument::Drum => drum(sr),
        Instrument::Bell => bell(sr),
    };
    normalize(&mut samples);
    samples
}

fn seconds(sr: f32, s: f32) -> usize {
    (sr * s) as usize
}

// three jingle hits of high-passed noise
fn tambourine(sr: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(0x7A3B);
    let mut out = vec![0.0; seconds(sr, 0.45)];
    for (hit, gain) in [(0.0, 1.0), (0.09, 0.6), (0.17, 0.45)] {
        let start = seconds(sr, hit);
        let mut prev = 0.0f32;
        for (i, sample) in out[start..].iter_mut().enumerate() {
            let t = i as f32 / sr;
            let noise: f32 = rng.gen_range(-1.0..1.0);
            let high = noise - prev;
            prev = noise;
            *sample += high * gain * (-t * 28.0).exp();
        }
    }
    out
}

// Karplus-Strong strum over an open chord with a pick scrape up front
fn guitar_scratch(sr: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(0x6D17);
    let mut out = vec![0.0; seconds(sr, 1.2)];
    for (n, freq) in [110.0f32, 164.81, 220.0, 277.18].into_iter().enumerate() {
        let start = seconds(sr, 0.018 * n as f32);
        let period = (sr / freq).round().max(2.0) as usize;
        let mut line: Vec<f32> = (0..period).map(|_| rng.gen_range(-1.0..1.0)).collect();
        for (i, sample) in out[start..].iter_mut().enumerate() {
            let j = i % period;
            let next = line[(j + 1) % period];
            let value = line[j];
            line[j] = 0.996 * 0.5 * (value + next);
            *sample += value * 0.5;
        }
    }
    let scrape = seconds(sr, 0.06);
    for (i, sample) in out.iter_mut().take(scrape).enumerate() {
        let t = i as f32 / sr;
        *sample += rng.gen_range(-0.4f32..0.4) * (1.0 - t / 0.06);
    }
    out
}

// sine with a falling pitch
fn drum(sr: f32) -> Vec<f32> {
    let len = seconds(sr, 0.4);
    let mut phase = 0.0f32;
    (0..len)
        .map(|i| {
            let t = i as f32 / sr;
            let freq = 50.0 + 110.0 * (-t * 18.0).exp();
            phase = (phase + freq / sr) % 1.0;
            (phase * TAU).sin() * (-t * 9.0).exp()
        })
        .collect()
}

// inharmonic partials with independent decays
fn bell(sr: f32) -> Vec<f32> {
    let partials = [(880.0f32, 1.0f32, 2.5f32), (2428.8, 0.5, 4.0), (4752.0, 0.25, 6.0)];
    (0..seconds(sr, 1.5))
        .map(|i| {
            let t = i as f32 / sr;
            partials
                .iter()
                .map(|&(freq, gain, decay)| (TAU * freq * t).sin() * gain * (-t * decay).exp())
                .sum::<f32>()
        })
        .collect()
}

fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > 0.0 {
        let gain = PEAK / peak;
        samples.iter_mut().for_each(|s| *s *= gain);
    }
}
