//! Game-specific logic and features.

pub mod animation;
pub mod app;
pub mod catalog;
pub mod controller;
pub mod state;

// Re-export commonly used types
pub use app::App;
pub use catalog::{Catalog, Color, Item, ItemId};
pub use controller::{Controller, FrameSnapshot, InteractionState};
