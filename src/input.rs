//! Pointer and keyboard state.
//!
//! The window feeds raw winit events in through [`Input::handle_event`]; the
//! frame loop reads the pointer back in normalized device coordinates and
//! the per-frame drag, scroll and key presses.
//!
//! The pointer is absent until the cursor first moves over the window, and
//! again after it leaves.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Pause / resume.
    Space,
    /// Quit.
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Convert a pixel position to normalized device coordinates (y up).
///
/// A zero-sized surface yields non-finite coordinates.
pub fn pixel_to_ndc(pixel: Vec2, size: (u32, u32)) -> Vec2 {
    let (w, h) = size;
    if w == 0 || h == 0 {
        return Vec2::NAN;
    }
    Vec2::new(
        pixel.x / w as f32 * 2.0 - 1.0,
        1.0 - pixel.y / h as f32 * 2.0,
    )
}

/// Input state for the current frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    mouse_held: HashSet<MouseButton>,

    /// Cursor position in pixels; `None` while outside the window.
    cursor: Option<Vec2>,
    drag_delta: Vec2,
    scroll_delta: f32,

    window_size: (u32, u32),
}

impl Input {
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    // ========== Queries ==========

    /// Whether a key went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Cursor position in pixels, if over the window.
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Pointer in normalized device coordinates, if over the window.
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        self.cursor.map(|pixel| pixel_to_ndc(pixel, self.window_size))
    }

    /// Cursor movement this frame while the left button was held, in pixels.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Wheel movement this frame in lines; positive is away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    // ========== Updates ==========

    /// Clear per-frame state. Call after the frame has consumed it.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    pub fn cursor_moved(&mut self, pixel: Vec2) {
        if let Some(previous) = self.cursor {
            if self.mouse_held(MouseButton::Left) {
                self.drag_delta += pixel - previous;
            }
        }
        self.cursor = Some(pixel);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
        self.mouse_held.clear();
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_held.insert(button);
        } else {
            self.mouse_held.remove(&button);
        }
    }

    pub fn key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // Auto-repeat does not count as a new press
            if self.keys_held.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn scroll(&mut self, lines: f32) {
        if lines.is_finite() {
            self.scroll_delta += lines;
        }
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key(KeyCode::from(code), event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.button(MouseButton::from(*button), *state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll(match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                });
            }
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new();
        assert!(!input.key_held(KeyCode::Space));

        input.key(KeyCode::Space, true);
        assert!(input.key_held(KeyCode::Space));
        assert!(input.key_pressed(KeyCode::Space));

        // Pressed is per frame, held persists
        input.begin_frame();
        input.key(KeyCode::Space, true);
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        input.key(KeyCode::Space, false);
        assert!(!input.key_held(KeyCode::Space));
    }

    #[test]
    fn test_pointer_ndc() {
        let mut input = Input::new();
        input.set_window_size(800, 600);
        assert_eq!(input.pointer_ndc(), None);

        input.cursor_moved(Vec2::new(400.0, 300.0));
        assert_eq!(input.pointer_ndc(), Some(Vec2::ZERO));

        input.cursor_moved(Vec2::new(800.0, 0.0));
        assert_eq!(input.pointer_ndc(), Some(Vec2::new(1.0, 1.0)));

        input.cursor_left();
        assert_eq!(input.pointer_ndc(), None);
    }

    #[test]
    fn test_zero_window_gives_unusable_pointer() {
        let mut input = Input::new();
        input.set_window_size(0, 0);
        input.cursor_moved(Vec2::new(10.0, 10.0));
        assert!(!input.pointer_ndc().unwrap().is_finite());
    }

    #[test]
    fn test_drag_only_while_held() {
        let mut input = Input::new();
        input.cursor_moved(Vec2::new(10.0, 10.0));
        input.cursor_moved(Vec2::new(20.0, 10.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.button(MouseButton::Left, true);
        input.cursor_moved(Vec2::new(30.0, 15.0));
        input.cursor_moved(Vec2::new(35.0, 15.0));
        assert_eq!(input.drag_delta(), Vec2::new(15.0, 5.0));

        input.begin_frame();
        assert_eq!(input.drag_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut input = Input::new();
        input.scroll(1.0);
        input.scroll(0.5);
        input.scroll(f32::NAN);
        assert_eq!(input.scroll_delta(), 1.5);
    }
}
