//! Window input adapter
//!
//! `CameraInput` plays the part of a viewer widget's mouse and keyboard
//! callbacks: it remembers which button is dragging, where the pointer was and
//! which movement keys are held, and turns that into camera calls. Only
//! [`CameraInput::handle_window_event`] knows about `winit`; everything else
//! works on plain pixel coordinates so hosts with another toolkit can call it
//! directly.

use std::time::Instant;

use cloudview_core::{Point2d, Point3d};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::camera::InteractiveCamera;
use crate::navigation::{NavigationKey, NavigationKeys};
use crate::viewport::Viewport;

/// Fraction of the viewport height one wheel notch counts as when zooming.
const WHEEL_ZOOM_FRACTION: f64 = 0.05;

/// Pixels per wheel notch for devices reporting pixel deltas.
const PIXELS_PER_WHEEL_LINE: f64 = 100.0;

/// What a held pointer button does while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Rotate about the center, or mouse-look in navigation mode
    Rotate,
    /// Zoom towards or away from the center
    Zoom,
    /// Move the 3D cursor
    Cursor,
}

/// Default button bindings: left rotates, right zooms, middle moves the cursor
pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Rotate),
        MouseButton::Right => Some(PointerButton::Zoom),
        MouseButton::Middle => Some(PointerButton::Cursor),
        _ => None,
    }
}

/// Default movement key bindings
pub fn navigation_key(code: KeyCode) -> Option<NavigationKey> {
    match code {
        KeyCode::KeyW => Some(NavigationKey::Forward),
        KeyCode::KeyS => Some(NavigationKey::Backward),
        KeyCode::KeyA => Some(NavigationKey::Left),
        KeyCode::KeyD => Some(NavigationKey::Right),
        KeyCode::KeyE => Some(NavigationKey::Up),
        KeyCode::KeyQ => Some(NavigationKey::Down),
        _ => None,
    }
}

fn to_point(position: PhysicalPosition<f64>) -> Point2d {
    Point2d::new(position.x, position.y)
}

/// Pointer and keyboard state driving an [`InteractiveCamera`]
#[derive(Debug, Clone)]
pub struct CameraInput {
    last_pointer: Option<Point2d>,
    dragging: Option<PointerButton>,
    keys: NavigationKeys,
    shift: bool,
    cursor: Point3d,
}

impl CameraInput {
    pub fn new() -> Self {
        Self {
            last_pointer: None,
            dragging: None,
            keys: NavigationKeys::new(),
            shift: false,
            cursor: Point3d::origin(),
        }
    }

    /// Position of the 3D cursor in world coordinates
    pub fn cursor(&self) -> Point3d {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Point3d) {
        self.cursor = cursor;
    }

    pub fn held_keys(&self) -> &NavigationKeys {
        &self.keys
    }

    /// Shift switches cursor drags to move along the view direction
    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Window resized; zero sizes (minimized windows) are ignored
    pub fn resized(&mut self, camera: &mut InteractiveCamera, width: u32, height: u32) -> bool {
        match Viewport::with_size(width, height) {
            Ok(viewport) => {
                camera.set_viewport(viewport);
                true
            }
            Err(e) => {
                log::debug!("ignoring resize: {e}");
                false
            }
        }
    }

    /// Start a drag; the first button pressed wins until it is released
    pub fn pointer_pressed(&mut self, button: PointerButton) {
        if self.dragging.is_none() {
            self.dragging = Some(button);
        }
    }

    pub fn pointer_released(&mut self, button: PointerButton) {
        if self.dragging == Some(button) {
            self.dragging = None;
        }
    }

    /// Pointer moved to `position` (pixels); returns true if the camera or
    /// cursor changed
    pub fn pointer_moved(&mut self, camera: &mut InteractiveCamera, position: Point2d) -> bool {
        let Some(prev) = self.last_pointer.replace(position) else {
            return false;
        };
        match self.dragging {
            Some(PointerButton::Rotate) if camera.mode().is_examiner() => {
                camera.mouse_drag(prev, position, false);
                true
            }
            Some(PointerButton::Rotate) => {
                camera.mouse_look(prev, position);
                true
            }
            Some(PointerButton::Zoom) => {
                camera.mouse_drag(prev, position, true);
                true
            }
            Some(PointerButton::Cursor) => {
                match camera.mouse_move_point(&self.cursor, &(position - prev), self.shift) {
                    Ok(cursor) => {
                        self.cursor = cursor;
                        true
                    }
                    Err(e) => {
                        log::warn!("cursor not moved: {e}");
                        false
                    }
                }
            }
            None => false,
        }
    }

    /// Pointer left the window; the next move starts a fresh drag segment
    pub fn pointer_left(&mut self) {
        self.last_pointer = None;
    }

    /// Wheel turned by `lines` notches (positive away from the user).
    ///
    /// Examiner modes zoom in; navigation mode changes speed instead.
    pub fn wheel(&mut self, camera: &mut InteractiveCamera, lines: f64) -> bool {
        if lines == 0.0 {
            return false;
        }
        if camera.mode().is_examiner() {
            let height = f64::from(camera.viewport().height());
            let travel = -lines * WHEEL_ZOOM_FRACTION * height;
            camera.mouse_drag(Point2d::origin(), Point2d::new(0.0, travel), true);
        } else if lines > 0.0 {
            camera.navigate_faster();
        } else {
            camera.navigate_slower();
        }
        true
    }

    /// A movement key went down or up
    pub fn key_changed(&mut self, key: NavigationKey, pressed: bool) {
        if pressed {
            self.keys.press(key);
        } else {
            self.keys.release(key);
        }
    }

    /// Forget held keys and drags, e.g. when focus is lost
    pub fn reset(&mut self) {
        self.keys.clear();
        self.dragging = None;
        self.last_pointer = None;
    }

    /// Per-frame update; integrates navigation movement while in navigation mode
    pub fn frame(&mut self, camera: &mut InteractiveCamera, now: Instant) {
        if !camera.mode().is_examiner() {
            camera.update_navigation(&self.keys, now);
        }
    }

    /// Feed a `winit` window event; returns true if the camera needs redrawing
    pub fn handle_window_event(
        &mut self,
        camera: &mut InteractiveCamera,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::Resized(size) => self.resized(camera, size.width, size.height),
            WindowEvent::Focused(false) => {
                self.reset();
                false
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_shift(modifiers.state().shift_key());
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(*button) {
                    match state {
                        ElementState::Pressed => self.pointer_pressed(button),
                        ElementState::Released => self.pointer_released(button),
                    }
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(camera, to_point(*position))
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_left();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(*y),
                    MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_WHEEL_LINE,
                };
                self.wheel(camera, lines)
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => {
                if let Some(key) = navigation_key(*code) {
                    self.key_changed(key, *state == ElementState::Pressed);
                }
                false
            }
            _ => false,
        }
    }
}

impl Default for CameraInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraMode;
    use approx::assert_relative_eq;
    use std::time::Duration;
    use winit::dpi::PhysicalSize;

    fn setup() -> (CameraInput, InteractiveCamera) {
        let mut input = CameraInput::new();
        let mut camera = InteractiveCamera::new();
        assert!(input.resized(&mut camera, 800, 600));
        (input, camera)
    }

    #[test]
    fn test_bindings() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Rotate));
        assert_eq!(pointer_button(MouseButton::Back), None);
        assert_eq!(navigation_key(KeyCode::KeyE), Some(NavigationKey::Up));
        assert_eq!(navigation_key(KeyCode::KeyQ), Some(NavigationKey::Down));
        assert_eq!(navigation_key(KeyCode::Space), None);
    }

    #[test]
    fn test_resize_event_sets_viewport_and_ignores_minimize() {
        let (mut input, mut camera) = setup();
        let resized = WindowEvent::Resized(PhysicalSize::new(1024, 768));
        assert!(input.handle_window_event(&mut camera, &resized));
        assert_eq!(camera.viewport(), Viewport::with_size(1024, 768).unwrap());
        let minimized = WindowEvent::Resized(PhysicalSize::new(0, 0));
        assert!(!input.handle_window_event(&mut camera, &minimized));
        assert_eq!(camera.viewport().width(), 1024);
    }

    #[test]
    fn test_move_without_button_does_nothing() {
        let (mut input, mut camera) = setup();
        let before = camera.rotation();
        assert!(!input.pointer_moved(&mut camera, Point2d::new(10.0, 10.0)));
        assert!(!input.pointer_moved(&mut camera, Point2d::new(50.0, 10.0)));
        assert_eq!(camera.rotation(), before);
    }

    #[test]
    fn test_rotate_drag_in_examiner_mode() {
        let (mut input, mut camera) = setup();
        input.pointer_moved(&mut camera, Point2d::new(100.0, 100.0));
        input.pointer_pressed(PointerButton::Rotate);
        assert!(input.pointer_moved(&mut camera, Point2d::new(300.0, 100.0)));
        assert_relative_eq!(camera.rotation().angle(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_drag_in_navigation_mode_looks_around() {
        let (mut input, mut camera) = setup();
        camera.set_mode(CameraMode::Navigation);
        input.pointer_moved(&mut camera, Point2d::new(100.0, 100.0));
        input.pointer_pressed(PointerButton::Rotate);
        input.pointer_moved(&mut camera, Point2d::new(90.0, 110.0));
        assert_relative_eq!(camera.yaw(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(camera.pitch(), -2.0, epsilon = 1e-12);
        assert_eq!(camera.rotation(), cloudview_core::UnitQuaterniond::identity());
    }

    #[test]
    fn test_first_button_owns_the_drag() {
        let (mut input, mut camera) = setup();
        input.pointer_moved(&mut camera, Point2d::new(400.0, 300.0));
        input.pointer_pressed(PointerButton::Zoom);
        input.pointer_pressed(PointerButton::Rotate);
        input.pointer_moved(&mut camera, Point2d::new(400.0, 360.0));
        assert_eq!(camera.rotation(), cloudview_core::UnitQuaterniond::identity());
        assert!(camera.distance() > 5.0);
        input.pointer_released(PointerButton::Rotate);
        input.pointer_released(PointerButton::Zoom);
        assert!(!input.pointer_moved(&mut camera, Point2d::new(400.0, 300.0)));
    }

    #[test]
    fn test_cursor_drag_moves_cursor_not_camera() {
        let (mut input, mut camera) = setup();
        input.pointer_moved(&mut camera, Point2d::new(400.0, 300.0));
        input.pointer_pressed(PointerButton::Cursor);
        assert!(input.pointer_moved(&mut camera, Point2d::new(480.0, 300.0)));
        let cursor = input.cursor();
        assert!(cursor.x > 0.0);
        assert_relative_eq!(cursor.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(cursor.z, 0.0, epsilon = 1e-6);
        assert_eq!(camera.distance(), 5.0);
    }

    #[test]
    fn test_cursor_at_eye_stays_put() {
        let (mut input, mut camera) = setup();
        let eye = camera.position();
        input.set_cursor(eye);
        input.pointer_moved(&mut camera, Point2d::new(400.0, 300.0));
        input.pointer_pressed(PointerButton::Cursor);
        assert!(!input.pointer_moved(&mut camera, Point2d::new(480.0, 300.0)));
        assert_eq!(input.cursor(), eye);
    }

    #[test]
    fn test_wheel_zooms_examiner_and_changes_speed_in_navigation() {
        let (mut input, mut camera) = setup();
        assert!(input.wheel(&mut camera, 1.0));
        assert_relative_eq!(camera.distance(), 5.0 * (-3.0f64 * 0.05).exp(), epsilon = 1e-12);

        camera.set_mode(CameraMode::Navigation);
        input.wheel(&mut camera, 1.0);
        assert_eq!(camera.speed(), 5.0);
        input.wheel(&mut camera, -2.0);
        assert_eq!(camera.speed(), 2.0);
        assert!(!input.wheel(&mut camera, 0.0));
    }

    #[test]
    fn test_frame_flies_only_in_navigation_mode() {
        let (mut input, mut camera) = setup();
        input.key_changed(NavigationKey::Forward, true);
        let start = Instant::now();
        input.frame(&mut camera, start);
        input.frame(&mut camera, start + Duration::from_millis(100));
        assert_eq!(camera.center(), Point3d::origin());

        camera.set_mode(CameraMode::Navigation);
        input.frame(&mut camera, start + Duration::from_millis(200));
        input.frame(&mut camera, start + Duration::from_millis(300));
        assert_relative_eq!(camera.position(), Point3d::new(0.2, 0.0, 0.0), epsilon = 1e-9);

        input.handle_window_event(&mut camera, &WindowEvent::Focused(false));
        assert!(input.held_keys().is_empty());
    }
}
