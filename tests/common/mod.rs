#![allow(dead_code)]

use bbtouch::engine::audio::{AudioPlayer, Playback, PlaybackHandle};
use bbtouch::game::catalog::{Catalog, Color, Instrument, Item, SoundSource};

/// Records every call and tracks which handles are still sounding
#[derive(Default)]
pub struct RecordingAudio {
    next: u64,
    pub prepared: Vec<&'static str>,
    pub played: Vec<(&'static str, Playback, PlaybackHandle)>,
    pub stopped: Vec<PlaybackHandle>,
    pub playing: Vec<PlaybackHandle>,
    pub released: usize,
}

impl AudioPlayer for RecordingAudio {
    fn prepare(&mut self, item: &Item) {
        if !self.prepared.contains(&item.name) {
            self.prepared.push(item.name);
        }
    }

    fn play(&mut self, item: &Item, playback: Playback) -> Option<PlaybackHandle> {
        if self.released > 0 {
            return None;
        }
        self.next += 1;
        let handle = PlaybackHandle(self.next);
        self.played.push((item.name, playback, handle));
        self.playing.push(handle);
        Some(handle)
    }

    fn stop(&mut self, handle: PlaybackHandle) {
        self.stopped.push(handle);
        self.playing.retain(|h| *h != handle);
    }

    fn release(&mut self) {
        self.playing.clear();
        self.released += 1;
    }
}

pub fn item(name: &'static str, argb: u32, instrument: Instrument) -> Item {
    Item {
        name,
        image: None,
        color: Color::from_argb(argb),
        sound: SoundSource::Synth(instrument),
    }
}

pub const GREEN: u32 = 0xFF00FF00;
pub const RED: u32 = 0xFFFF0000;

/// Two items: A (green) then B (red)
pub fn green_red() -> Catalog {
    Catalog::new(vec![
        item("A", GREEN, Instrument::Tambourine),
        item("B", RED, Instrument::Drum),
    ])
    .unwrap()
}

/// An audio player whose sounds never become available
#[derive(Default)]
pub struct MutedAudio {
    pub play_calls: usize,
}

impl AudioPlayer for MutedAudio {
    fn prepare(&mut self, _item: &Item) {}

    fn play(&mut self, _item: &Item, _playback: Playback) -> Option<PlaybackHandle> {
        self.play_calls += 1;
        None
    }

    fn stop(&mut self, _handle: PlaybackHandle) {}

    fn release(&mut self) {}
}
