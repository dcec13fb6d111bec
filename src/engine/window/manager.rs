//! Window management implementation.

use std::sync::Arc;

use glam::Vec2;
use log::{error, info};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::error::{GameError, Result};

#[derive(Default)]
pub struct WindowManager {
    window: Option<Arc<Window>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
        size: (u32, u32),
    ) -> Result<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(size.0, size.1));
        let window = event_loop.create_window(attributes).map_err(|e| {
            error!("Failed to create window: {:?}", e);
            GameError::Window(e.to_string())
        })?;
        info!("[window] Created {:?} at scale {}", window.inner_size(), window.scale_factor());

        let window = Arc::new(window);
        self.window = Some(window.clone());
        Ok(window)
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    /// Drawable area in logical pixels, zero before the window exists
    pub fn logical_size(&self) -> Vec2 {
        match &self.window {
            Some(window) => {
                let size = window.inner_size().to_logical::<f32>(window.scale_factor());
                Vec2::new(size.width, size.height)
            }
            None => Vec2::ZERO,
        }
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
