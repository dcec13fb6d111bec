//! Input handling module
//! Turns mouse and touch events into tap and drag gestures.

pub mod handler;

pub use handler::{Gesture, InputHandler};
