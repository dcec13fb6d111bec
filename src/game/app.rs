use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use crate::config::GameConfig;
use crate::engine::audio::AudioEngine;
use crate::engine::graphics::Renderer;
use crate::engine::input::{Gesture, InputHandler};
use crate::engine::window::WindowManager;
use crate::game::catalog::Catalog;
use crate::game::controller::Controller;
use crate::game::state::FrameClock;

pub type GameController = Controller<AudioEngine, StdRng>;

/// Owns the window and wires winit events into the controller
pub struct App {
    config: GameConfig,
    catalog: Catalog,
    window_manager: WindowManager,
    renderer: Option<Renderer>,
    controller: Option<GameController>,
    input_handler: InputHandler,
    clock: FrameClock,
}

impl App {
    pub fn new(config: GameConfig, catalog: Catalog) -> Self {
        let input_handler = InputHandler::new(config.touch_slop);
        Self {
            config,
            catalog,
            window_manager: WindowManager::new(),
            renderer: None,
            controller: None,
            input_handler,
            clock: FrameClock::new(),
        }
    }

    fn dispatch(&mut self, gesture: Option<Gesture>) {
        if let (Some(gesture), Some(controller)) = (gesture, self.controller.as_mut()) {
            controller.handle_gesture(gesture);
        }
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick();
        let screen = self.window_manager.logical_size();
        let (Some(controller), Some(renderer)) = (self.controller.as_mut(), self.renderer.as_mut()) else {
            return;
        };
        controller.advance(dt);
        match renderer.render(&controller.frame(), screen) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of GPU memory");
            }
            Err(e) => warn!("Render error: {:?}", e),
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(controller) = self.controller.as_mut() {
            controller.shutdown();
        }
        event_loop.exit();
    }

    fn on_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(new_size);
        }
        let screen = self.window_manager.logical_size();
        if let Some(controller) = self.controller.as_mut() {
            controller.set_screen_size(screen);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_manager.window().is_some() {
            return;
        }
        let window = match self.window_manager.create_window(
            event_loop,
            &self.config.window_title,
            self.config.window_size,
        ) {
            Ok(window) => window,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(window, &self.catalog)) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let audio = AudioEngine::new(self.config.max_streams);
        info!("Audio output {}", if audio.is_audible() { "open" } else { "silent" });
        let controller = Controller::new(
            self.catalog.clone(),
            audio,
            StdRng::from_entropy(),
            self.config.clone(),
            self.window_manager.logical_size(),
        );
        info!("Ready: showing {}", controller.current_item().name);

        self.renderer = Some(renderer);
        self.controller = Some(controller);
        self.clock = FrameClock::new();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let scale_factor = self.window_manager.scale_factor();
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.shutdown(event_loop);
                }
            }
            WindowEvent::Resized(new_size) => self.on_resize(new_size),
            WindowEvent::ScaleFactorChanged { .. } => {
                let screen = self.window_manager.logical_size();
                if let Some(controller) = self.controller.as_mut() {
                    controller.set_screen_size(screen);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::MouseInput { state, button, .. } => {
                let gesture = self.input_handler.handle_mouse_button(button, state);
                self.dispatch(gesture);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let gesture = self.input_handler.handle_cursor_moved(position, scale_factor);
                self.dispatch(gesture);
            }
            WindowEvent::Touch(touch) => {
                let gesture = self.input_handler.handle_touch(&touch, scale_factor);
                self.dispatch(gesture);
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                let gesture = self.input_handler.cancel_mouse();
                self.dispatch(gesture);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.window_manager.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(controller) = self.controller.as_mut() {
            controller.shutdown();
        }
        info!("Exiting at {} fps", self.clock.fps());
    }
}
