//! Frame timing and FPS reporting.

use std::time::{Duration, Instant};

use log::debug;

/// Longest frame step handed to the simulation; a stall does not jump
pub const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

pub struct FrameClock {
    last_frame: Instant,
    last_fps_print: Instant,
    frame_count: u32,
    last_fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            last_fps_print: now,
            frame_count: 0,
            last_fps: 0,
        }
    }

    /// Time since the previous tick, capped at `MAX_FRAME_STEP`
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = now.saturating_duration_since(self.last_frame).min(MAX_FRAME_STEP);
        self.last_frame = now;
        self.frame_count += 1;

        if now.saturating_duration_since(self.last_fps_print).as_secs_f32() >= 1.0 {
            self.last_fps = self.frame_count;
            self.frame_count = 0;
            self.last_fps_print = now;
            debug!("FPS: {}", self.last_fps);
        }
        dt
    }

    pub fn fps(&self) -> u32 {
        self.last_fps
    }
}
