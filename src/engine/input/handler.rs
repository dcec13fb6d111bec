use glam::Vec2;
use log::debug;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase};

/// Pointer gestures the game reacts to, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Press and release without leaving the touch slop
    Tap { at: Vec2 },
    /// One movement sample of a drag in progress
    DragSample { at: Vec2, delta: Vec2 },
    /// Finger lifted after dragging; `total` is release minus press
    DragEnd { total: Vec2 },
    /// Drag abandoned without a release
    DragCancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pointer {
    Up,
    Pressed { id: u64, start: Vec2 },
    Dragging { id: u64, start: Vec2, last: Vec2 },
}

/// Mouse id; touches use their own ids
const MOUSE_ID: u64 = u64::MAX;

/// Turns mouse and single-finger touch events into gestures
pub struct InputHandler {
    pub touch_slop: f32,
    pointer: Pointer,
    cursor: Vec2,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            pointer: Pointer::Up,
            cursor: Vec2::ZERO,
        }
    }
}

impl InputHandler {
    pub fn new(touch_slop: f32) -> Self {
        Self {
            touch_slop,
            ..Self::default()
        }
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer != Pointer::Up
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<Gesture> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                self.press(MOUSE_ID, self.cursor);
                None
            }
            ElementState::Released => self.release(MOUSE_ID, self.cursor),
        }
    }

    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) -> Option<Gesture> {
        self.cursor = to_logical(position, scale_factor);
        self.motion(MOUSE_ID, self.cursor)
    }

    pub fn handle_touch(&mut self, touch: &Touch, scale_factor: f64) -> Option<Gesture> {
        let at = to_logical(touch.location, scale_factor);
        match touch.phase {
            TouchPhase::Started => {
                self.press(touch.id, at);
                None
            }
            TouchPhase::Moved => self.motion(touch.id, at),
            TouchPhase::Ended => self.release(touch.id, at),
            TouchPhase::Cancelled => self.cancel_pointer(touch.id),
        }
    }

    /// Cursor left the window or focus was lost.
    /// Touches only end through `TouchPhase::Cancelled`.
    pub fn cancel_mouse(&mut self) -> Option<Gesture> {
        self.cancel_pointer(MOUSE_ID)
    }

    pub fn press(&mut self, id: u64, at: Vec2) {
        // a second finger is ignored while the first is down
        if self.pointer == Pointer::Up {
            self.pointer = Pointer::Pressed { id, start: at };
        }
    }

    pub fn motion(&mut self, id: u64, at: Vec2) -> Option<Gesture> {
        match self.pointer {
            Pointer::Pressed { id: active, start } if active == id => {
                if at.distance(start) <= self.touch_slop {
                    return None;
                }
                debug!("Drag started at {:?}", start);
                self.pointer = Pointer::Dragging { id, start, last: at };
                Some(Gesture::DragSample { at, delta: at - start })
            }
            Pointer::Dragging { id: active, start, last } if active == id => {
                self.pointer = Pointer::Dragging { id, start, last: at };
                Some(Gesture::DragSample { at, delta: at - last })
            }
            _ => None,
        }
    }

    pub fn release(&mut self, id: u64, at: Vec2) -> Option<Gesture> {
        let gesture = match self.pointer {
            Pointer::Pressed { id: active, .. } if active == id => Gesture::Tap { at },
            Pointer::Dragging { id: active, start, .. } if active == id => {
                Gesture::DragEnd { total: at - start }
            }
            _ => return None,
        };
        self.pointer = Pointer::Up;
        debug!("Gesture: {:?}", gesture);
        Some(gesture)
    }

    fn cancel_pointer(&mut self, id: u64) -> Option<Gesture> {
        match self.pointer {
            Pointer::Pressed { id: active, .. } if active == id => {
                self.pointer = Pointer::Up;
                None
            }
            Pointer::Dragging { id: active, .. } if active == id => {
                self.pointer = Pointer::Up;
                debug!("Drag cancelled");
                Some(Gesture::DragCancel)
            }
            _ => None,
        }
    }
}

fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = position.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}
