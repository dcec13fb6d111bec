//! Spring-driven animated values.
//!
//! Each animated property stores its own value, velocity and target.
//! Retargeting only overwrites the target and spring, so whatever drives
//! the animation always reads the newest target on the next tick.

use std::ops::{Add, Mul, Sub};

use glam::{Vec2, Vec4};

/// Largest integration step; longer frames are split into sub-steps
const MAX_STEP_S: f32 = 0.004;

/// Values a spring can move: vector-like with a length
pub trait Animatable:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
    fn magnitude(self) -> f32;
}

impl Animatable for f32 {
    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl Animatable for Vec2 {
    fn magnitude(self) -> f32 {
        self.length()
    }
}

impl Animatable for Vec4 {
    fn magnitude(self) -> f32 {
        self.length()
    }
}

/// Unit-mass damped oscillator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// 1.0 = critically damped (no overshoot), below 1.0 bounces
    pub damping_ratio: f32,
    /// Spring constant (1/s²); higher is faster
    pub stiffness: f32,
}

impl Spring {
    pub const DEFAULT: Spring = Spring { damping_ratio: 1.0, stiffness: 1500.0 };
    pub const LOW_STIFFNESS: Spring = Spring { damping_ratio: 1.0, stiffness: 200.0 };
    pub const MEDIUM_BOUNCY: Spring = Spring { damping_ratio: 0.5, stiffness: 1500.0 };

    fn step<T: Animatable>(&self, value: T, velocity: T, target: T, dt: f32) -> (T, T) {
        let damping = 2.0 * self.damping_ratio * self.stiffness.sqrt();
        let accel = (target - value) * self.stiffness - velocity * damping;
        let velocity = velocity + accel * dt;
        (value + velocity * dt, velocity)
    }
}

/// A value that springs toward its target
#[derive(Debug, Clone, Copy)]
pub struct Animated<T> {
    value: T,
    velocity: T,
    target: T,
    spring: Spring,
    threshold: f32,
    settled: bool,
}

impl<T: Animatable> Animated<T> {
    /// At rest at `value`; `threshold` is the distance below which motion
    /// is no longer visible
    pub fn new(value: T, threshold: f32) -> Self {
        Self {
            value,
            velocity: value * 0.0,
            target: value,
            spring: Spring::DEFAULT,
            threshold,
            settled: true,
        }
    }

    /// Head for `target` from the current value and velocity
    pub fn animate_to(&mut self, target: T, spring: Spring) {
        self.target = target;
        self.spring = spring;
        self.settled = false;
    }

    /// Jump to `value` and stop
    pub fn snap_to(&mut self, value: T) {
        self.value = value;
        self.target = value;
        self.velocity = value * 0.0;
        self.settled = true;
    }

    /// Apply `f` to both the current value and the target
    pub fn constrain(&mut self, f: impl Fn(T) -> T) {
        self.value = f(self.value);
        self.target = f(self.target);
    }

    pub fn step(&mut self, dt: f32) {
        if self.settled || dt <= 0.0 {
            return;
        }
        let steps = (dt / MAX_STEP_S).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            let (value, velocity) = self.spring.step(self.value, self.velocity, self.target, h);
            self.value = value;
            self.velocity = velocity;
        }
        let displacement = (self.target - self.value).magnitude();
        if displacement < self.threshold && self.velocity.magnitude() < self.threshold * 10.0 {
            self.snap_to(self.target);
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}
