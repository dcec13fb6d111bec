//! Game parameters with units and documented semantics.
//!
//! All tunables live here so the controller, gesture recognizer and audio
//! engine never carry magic numbers of their own. Distances are logical
//! pixels (physical pixels divided by the window scale factor).

use crate::engine::audio::Playback;
use crate::error::{GameError, Result};
use crate::game::animation::Spring;

/// How a drag is measured when deciding whether it was a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAxis {
    /// Only the horizontal component counts
    Horizontal,
    /// Straight-line distance in any direction
    Any,
}

impl SwipeAxis {
    /// Magnitude of an accumulated drag `(dx, dy)` along this axis
    pub fn magnitude(self, drag: glam::Vec2) -> f32 {
        match self {
            SwipeAxis::Horizontal => drag.x.abs(),
            SwipeAxis::Any => drag.length(),
        }
    }
}

/// Everything tunable about the game
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Icon edge length (logical px)
    pub icon_size: f32,

    /// Movement (logical px) after which a press stops being a tap
    /// 8 matches the usual platform touch slop
    pub touch_slop: f32,

    /// Drag magnitude (logical px) a release must exceed to count as a swipe
    pub swipe_threshold: f32,

    /// Which drag component is compared against the threshold
    pub swipe_axis: SwipeAxis,

    /// One drag sample in this many plays an ambient sound
    pub drag_sound_odds: u32,

    /// Scale the bounce heads for before settling back to 1.0
    pub bounce_peak: f32,

    /// Opacity of the background pulse in the item color
    pub pulse_alpha: f32,

    /// Spring used for relocation (slow, no overshoot)
    pub move_spring: Spring,

    /// Spring used for the rising half of the bounce (overshoots)
    pub bounce_spring: Spring,

    /// Spring used for settling back and for color fades
    pub settle_spring: Spring,

    /// Simultaneous sound playbacks before the oldest is dropped
    pub max_streams: usize,

    /// Playback used for sounds triggered while dragging
    pub ambient: Playback,

    /// Window title
    pub window_title: String,

    /// Initial window size (logical px)
    pub window_size: (u32, u32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            icon_size: 150.0,
            touch_slop: 8.0,
            swipe_threshold: 100.0,
            swipe_axis: SwipeAxis::Horizontal,
            drag_sound_odds: 15,
            bounce_peak: 1.3,
            pulse_alpha: 0.1,
            move_spring: Spring::LOW_STIFFNESS,
            bounce_spring: Spring::MEDIUM_BOUNCY,
            settle_spring: Spring::DEFAULT,
            max_streams: 5,
            ambient: Playback::AMBIENT,
            window_title: "BB Touch".to_string(),
            window_size: (480, 800),
        }
    }
}

impl GameConfig {
    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.icon_size > 0.0) {
            return Err(GameError::Config(format!(
                "icon size must be > 0, got {}",
                self.icon_size
            )));
        }
        if !(self.swipe_threshold > 0.0) || self.touch_slop < 0.0 {
            return Err(GameError::Config(format!(
                "gesture thresholds must be positive (slop {}, swipe {})",
                self.touch_slop, self.swipe_threshold
            )));
        }
        if self.drag_sound_odds == 0 {
            return Err(GameError::Config("drag sound odds must be >= 1".to_string()));
        }
        if !(self.bounce_peak > 1.0) {
            return Err(GameError::Config(format!(
                "bounce peak must be > 1.0, got {}",
                self.bounce_peak
            )));
        }
        if !(self.pulse_alpha > 0.0 && self.pulse_alpha <= 1.0) {
            return Err(GameError::Config(format!(
                "pulse alpha must be in (0, 1], got {}",
                self.pulse_alpha
            )));
        }
        if self.max_streams == 0 {
            return Err(GameError::Config("max streams must be >= 1".to_string()));
        }
        for spring in [self.move_spring, self.bounce_spring, self.settle_spring] {
            if !(spring.stiffness > 0.0 && spring.damping_ratio > 0.0) {
                return Err(GameError::Config(format!("invalid spring {:?}", spring)));
            }
        }
        Ok(())
    }
}
