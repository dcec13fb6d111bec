//! Audio playback
//! Sound loading, voice mixing and the cpal output stream.

pub mod bank;
pub mod mixer;
pub mod output;
pub mod player;
pub mod synth;

pub use bank::{SoundBank, SoundStatus};
pub use mixer::Mixer;
pub use output::AudioEngine;
pub use player::{AudioPlayer, Playback, PlaybackHandle};
