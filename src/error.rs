//! Error types for game setup.
//!
//! Only startup paths return these. Once the screen is up, gesture handling
//! never fails: missing sounds and images degrade silently and are logged.

/// Error type for everything that can go wrong while bringing the game up
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// The catalog has no items to show
    #[error("Item catalog is empty")]
    EmptyCatalog,

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No usable audio output device or stream
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// A sound could not be decoded
    #[error("Failed to decode sound {path}: {reason}")]
    SoundDecode { path: String, reason: String },

    /// An icon image could not be decoded
    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),

    /// Window or event loop creation failed
    #[error("Window error: {0}")]
    Window(String),

    /// GPU surface, adapter or device setup failed
    #[error("Graphics error: {0}")]
    Graphics(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for game setup operations
pub type Result<T> = std::result::Result<T, GameError>;
