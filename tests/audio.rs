mod common;

use std::time::{Duration, Instant};

use bbtouch::engine::audio::{AudioEngine, AudioPlayer, Playback, SoundStatus};
use bbtouch::game::catalog::{Catalog, Instrument, Item, SoundSource};
use common::{item, GREEN, RED};

fn wait_ready(engine: &mut AudioEngine, items: &[Item]) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        engine.poll();
        if items
            .iter()
            .all(|i| engine.bank().status(i.sound) == Some(SoundStatus::Ready))
        {
            return;
        }
        assert!(Instant::now() < deadline, "sounds never loaded");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn prepare_is_idempotent() {
    let bell = item("bell", GREEN, Instrument::Bell);
    let mut engine = AudioEngine::silent(5, 8_000);
    engine.prepare(&bell);
    engine.prepare(&bell);
    wait_ready(&mut engine, std::slice::from_ref(&bell));
    engine.prepare(&bell);
    assert_eq!(engine.bank().len(), 1);
    assert_eq!(engine.bank().status(bell.sound), Some(SoundStatus::Ready));
}

#[test]
fn oldest_voice_is_evicted_past_the_stream_limit() {
    let catalog = Catalog::builtin().unwrap();
    let mut engine = AudioEngine::silent(2, 8_000);
    for item in catalog.items() {
        engine.prepare(item);
    }
    wait_ready(&mut engine, catalog.items());

    let first = engine.play(&catalog.items()[0], Playback::FULL).unwrap();
    let second = engine.play(&catalog.items()[1], Playback::FULL).unwrap();
    let third = engine.play(&catalog.items()[2], Playback::AMBIENT).unwrap();
    assert!(!engine.is_playing(first));
    assert!(engine.is_playing(second));
    assert!(engine.is_playing(third));
}

#[test]
fn missing_wav_fails_without_sound() {
    let broken = Item {
        sound: SoundSource::File("/nonexistent/boom.wav"),
        ..item("boom", RED, Instrument::Drum)
    };
    let mut engine = AudioEngine::silent(5, 8_000);
    engine.prepare(&broken);
    let deadline = Instant::now() + Duration::from_secs(10);
    while engine.bank().status(broken.sound) == Some(SoundStatus::Pending) {
        assert!(Instant::now() < deadline, "load never finished");
        std::thread::sleep(Duration::from_millis(5));
        engine.poll();
    }
    assert_eq!(engine.bank().status(broken.sound), Some(SoundStatus::Failed));
    assert!(engine.play(&broken, Playback::FULL).is_none());
}
