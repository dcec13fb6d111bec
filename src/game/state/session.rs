//! Per-session interaction state.

use glam::{Vec2, Vec4};

use crate::engine::audio::PlaybackHandle;
use crate::game::animation::Animated;
use crate::game::catalog::{Color, ItemId};

/// Below this, a color change is invisible at 8 bits per channel
const COLOR_THRESHOLD: f32 = 1.0 / 256.0;
/// Sub-pixel position differences are invisible
const POSITION_THRESHOLD: f32 = 0.5;
const SCALE_THRESHOLD: f32 = 0.001;

/// Where the tap bounce sequence currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BouncePhase {
    Idle,
    /// Scale heading for the peak, background showing the pulse color
    Rising,
    /// Scale heading back to 1.0
    Settling,
}

/// Everything that changes while playing; reset on every launch
pub struct Session {
    pub current: ItemId,
    pub background: Animated<Vec4>,
    pub position: Animated<Vec2>,
    pub scale: Animated<f32>,
    pub bounce: BouncePhase,
    pub active_playback: Option<PlaybackHandle>,
}

impl Session {
    pub fn new(current: ItemId, position: Vec2) -> Self {
        Self {
            current,
            background: Animated::new(Color::WHITE.to_vec4(), COLOR_THRESHOLD),
            position: Animated::new(position, POSITION_THRESHOLD),
            scale: Animated::new(1.0, SCALE_THRESHOLD),
            bounce: BouncePhase::Idle,
            active_playback: None,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.background.step(dt);
        self.position.step(dt);
        self.scale.step(dt);
    }

    pub fn is_moving(&self) -> bool {
        !(self.background.is_settled() && self.position.is_settled() && self.scale.is_settled())
    }
}
