use std::time::Duration;

use crate::game::catalog::Item;

/// Opaque reference to one in-flight playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(pub u64);

/// How loud and how long a triggered sound plays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Linear gain, 1.0 = as recorded
    pub volume: f32,
    /// Cut the sound after this long; `None` plays it to the end
    pub max_duration: Option<Duration>,
}

impl Playback {
    pub const FULL: Playback = Playback { volume: 1.0, max_duration: None };

    /// Quiet, clipped variant for sounds fired while dragging
    pub const AMBIENT: Playback = Playback {
        volume: 0.35,
        max_duration: Some(Duration::from_millis(250)),
    };
}

/// Short sound effects keyed by catalog item.
///
/// `play` returns `None` when the item has no sound right now (still
/// loading, failed to load, or the player was released); callers carry on
/// without sound.
pub trait AudioPlayer {
    /// Start loading the item's sound. Repeated calls are no-ops.
    fn prepare(&mut self, item: &Item);

    fn play(&mut self, item: &Item, playback: Playback) -> Option<PlaybackHandle>;

    /// Stop a playback if it is still running; unknown handles are ignored
    fn stop(&mut self, handle: PlaybackHandle);

    /// Pick up finished background loads; called once per frame
    fn poll(&mut self) {}

    /// Free every audio resource. Safe to call more than once.
    fn release(&mut self);
}
