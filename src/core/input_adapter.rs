use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, InputEvent, PointerEvent};

/// Adapter that turns Winit window events into pointer events
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    /// Currently pressed buttons
    pressed: HashSet<Button>,
    /// Last known pointer position (relative to window)
    pointer: Option<Vec2>,
    /// Touch contact currently acting as the primary button
    active_touch: Option<u64>,
    /// Primary pressed before any position was known; `Down` goes out with
    /// the first motion
    pending_down: bool,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent, returning the demo-level event it maps to
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Digit0 | KeyCode::Escape) => Some(InputEvent::Quit),
                    _ => None,
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = Self::mouse_button_to_button(*button)?;
                let pointer = match state {
                    ElementState::Pressed => self.press(button),
                    ElementState::Released => self.release(button),
                };
                pointer.map(InputEvent::Pointer)
            }
            WindowEvent::CursorMoved { position, .. } => self
                .cursor_moved(Vec2::new(position.x as f32, position.y as f32))
                .map(InputEvent::Pointer),
            WindowEvent::Touch(touch) => {
                let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.touch(touch.id, touch.phase, location).map(InputEvent::Pointer)
            }
            _ => None,
        }
    }

    /// Record a button press at the last known pointer position
    pub fn press(&mut self, button: Button) -> Option<PointerEvent> {
        let newly_pressed = self.pressed.insert(button);
        if button != Button::Primary || !newly_pressed {
            return None;
        }
        match self.pointer {
            Some(position) => Some(PointerEvent::down(position)),
            None => {
                self.pending_down = true;
                None
            }
        }
    }

    /// Record a button release at the last known pointer position
    pub fn release(&mut self, button: Button) -> Option<PointerEvent> {
        let was_pressed = self.pressed.remove(&button);
        if button != Button::Primary || !was_pressed {
            return None;
        }
        if std::mem::take(&mut self.pending_down) {
            return None;
        }
        Some(PointerEvent::up(self.pointer.unwrap_or(Vec2::ZERO)))
    }

    /// Record pointer motion
    pub fn cursor_moved(&mut self, position: Vec2) -> Option<PointerEvent> {
        self.pointer = Some(position);
        if std::mem::take(&mut self.pending_down) {
            return Some(PointerEvent::down(position));
        }
        Some(PointerEvent::moved(position, self.is_down(Button::Primary)))
    }

    /// Touch contacts drive the primary button; only the first contact counts
    pub fn touch(&mut self, id: u64, phase: TouchPhase, location: Vec2) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started => {
                if self.active_touch.is_some() {
                    return None;
                }
                self.active_touch = Some(id);
                self.pointer = Some(location);
                self.press(Button::Primary)
            }
            TouchPhase::Moved if self.active_touch == Some(id) => self.cursor_moved(location),
            TouchPhase::Ended | TouchPhase::Cancelled if self.active_touch == Some(id) => {
                self.active_touch = None;
                self.pointer = Some(location);
                self.release(Button::Primary)
            }
            _ => None,
        }
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    /// Get current pointer position (if available)
    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::Primary),
            MouseButton::Right => Some(Button::Secondary),
            _ => None,
        }
    }
}
