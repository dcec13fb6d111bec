//! Engine module containing audio, graphics, input, and window management.

pub mod audio;
pub mod graphics;
pub mod input;
pub mod window;

// Re-export commonly used types
pub use audio::{AudioEngine, AudioPlayer};
pub use graphics::Renderer;
pub use input::{Gesture, InputHandler};
pub use window::WindowManager;
