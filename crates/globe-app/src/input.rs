//! Frame-coherent pointer state for the orbit controls.
//!
//! Window events are folded in through the `on_*` methods as they arrive;
//! the controls read the accumulated drag and scroll once per frame and
//! [`PointerState::clear_transients`] resets them.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixel scroll is normalized so roughly this many pixels count as one wheel step.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Vec2,
    rotate_drag: Vec2,
    pan_drag: Vec2,
    scroll: f32,
    left_pressed: bool,
    right_pressed: bool,
    cursor_in_window: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `CursorMoved`: movement while a button is held becomes drag.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        let delta = new_pos - self.position;
        self.position = new_pos;
        if self.left_pressed {
            self.rotate_drag += delta;
        } else if self.right_pressed {
            self.pan_drag += delta;
        }
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.left_pressed = pressed,
            MouseButton::Right => self.right_pressed = pressed,
            _ => {}
        }
    }

    /// `MouseWheel`: positive is away from the user (zoom in).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => self.scroll += y,
            MouseScrollDelta::PixelDelta(pos) => self.scroll += (pos.y / PIXELS_PER_LINE) as f32,
        }
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    /// Leaving the window ends any drag, since the release may never arrive.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.left_pressed = false;
        self.right_pressed = false;
    }

    /// Left-drag distance this frame in physical pixels.
    pub fn rotate_drag(&self) -> Vec2 {
        self.rotate_drag
    }

    /// Right-drag distance this frame in physical pixels.
    pub fn pan_drag(&self) -> Vec2 {
        self.pan_drag
    }

    /// Wheel steps this frame.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }

    pub fn clear_transients(&mut self) {
        self.rotate_drag = Vec2::ZERO;
        self.pan_drag = Vec2::ZERO;
        self.scroll = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_motion_without_button_is_not_drag() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(10.0, 10.0);
        pointer.on_cursor_moved(50.0, 30.0);
        assert_eq!(pointer.rotate_drag(), Vec2::ZERO);
        assert_eq!(pointer.pan_drag(), Vec2::ZERO);
        assert_eq!(pointer.position(), Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_left_drag_accumulates() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(100.0, 100.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(110.0, 95.0);
        pointer.on_cursor_moved(120.0, 90.0);
        assert_eq!(pointer.rotate_drag(), Vec2::new(20.0, -10.0));
        pointer.on_button(MouseButton::Left, ElementState::Released);
        pointer.on_cursor_moved(200.0, 200.0);
        assert_eq!(pointer.rotate_drag(), Vec2::new(20.0, -10.0));
    }

    #[test]
    fn test_right_drag_pans() {
        let mut pointer = PointerState::new();
        pointer.on_button(MouseButton::Right, ElementState::Pressed);
        pointer.on_cursor_moved(5.0, 0.0);
        assert_eq!(pointer.pan_drag(), Vec2::new(5.0, 0.0));
        assert_eq!(pointer.rotate_drag(), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_line_and_pixel() {
        let mut pointer = PointerState::new();
        pointer.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        pointer.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0)));
        assert!((pointer.scroll() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear_transients_keeps_buttons() {
        let mut pointer = PointerState::new();
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(3.0, 4.0);
        pointer.on_scroll(MouseScrollDelta::LineDelta(0.0, -2.0));
        pointer.clear_transients();
        assert_eq!(pointer.rotate_drag(), Vec2::ZERO);
        assert_eq!(pointer.scroll(), 0.0);
        pointer.on_cursor_moved(4.0, 4.0);
        assert_eq!(pointer.rotate_drag(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_leaving_window_ends_drag() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_entered();
        assert!(pointer.is_cursor_in_window());
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_left();
        pointer.on_cursor_moved(30.0, 30.0);
        assert_eq!(pointer.rotate_drag(), Vec2::ZERO);
        assert!(!pointer.is_cursor_in_window());
    }
}
