//! Library entry point for the toddler tap game.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;

// Re-export main types for convenience
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use game::App;
