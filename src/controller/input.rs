/// Platform-agnostic input handling system
use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Touchpads report pixels, wheels report lines.
const PIXELS_PER_LINE: f64 = 40.0;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Keyboard events
    KeyDown(KeyCode),
    KeyUp(KeyCode),

    // Mouse events
    CursorMoved { x: f64, y: f64 },
    MouseButton { button: MouseButton, pressed: bool },
    Scroll { delta_y: f32 },

    // Window events
    FocusLost,
}

impl InputEvent {
    /// Key presses, button presses and scrolls. Releases, cursor motion and
    /// focus loss only ever clear or track state.
    pub fn is_press(&self) -> bool {
        matches!(
            self,
            InputEvent::KeyDown(_) | InputEvent::MouseButton { pressed: true, .. } | InputEvent::Scroll { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// What the camera should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    Orbit { dx: f32, dy: f32 },
    Pan { dx: f32, dy: f32 },
    Zoom(f32),
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub quit: Vec<KeyCode>,
    pub pan_modifier: KeyCode,
    pub toggle_wireframe: KeyCode,
    pub toggle_overlay: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: vec![KeyCode::Escape, KeyCode::KeyQ],
            pan_modifier: KeyCode::ShiftLeft,
            toggle_wireframe: KeyCode::KeyG,
            toggle_overlay: KeyCode::F1,
        }
    }
}

/// Key table, mouse state and the exit request.
pub struct InputState {
    pub bindings: KeyBindings,
    pub pressed_keys: HashSet<KeyCode>,
    pub middle_mouse: bool,
    /// `None` until the first cursor sample arrives.
    pub last_cursor: Option<(f64, f64)>,
    pub should_exit: bool,
    pub wireframe_mode: bool,
    pub show_overlay: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::default())
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed_keys: HashSet::new(),
            middle_mouse: false,
            last_cursor: None,
            should_exit: false,
            wireframe_mode: false,
            show_overlay: false,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) -> Option<CameraAction> {
        match event {
            InputEvent::KeyDown(code) => {
                self.pressed_keys.insert(*code);

                if self.bindings.quit.iter().any(|k| self.pressed_keys.contains(k)) {
                    // honoured at the top of the next frame
                    self.should_exit = true;
                }
                if *code == self.bindings.toggle_wireframe {
                    self.toggle_wireframe();
                }
                if *code == self.bindings.toggle_overlay {
                    self.toggle_overlay();
                }
                None
            }
            InputEvent::KeyUp(code) => {
                self.pressed_keys.remove(code);
                None
            }
            InputEvent::CursorMoved { x, y } => {
                let (last_x, last_y) = self.last_cursor.unwrap_or((*x, *y));
                let dx = (x - last_x) as f32;
                let dy = (last_y - y) as f32;
                self.last_cursor = Some((*x, *y));

                if !self.middle_mouse {
                    return None;
                }
                if self.is_key_pressed(self.bindings.pan_modifier) {
                    Some(CameraAction::Pan { dx, dy })
                } else {
                    Some(CameraAction::Orbit { dx, dy })
                }
            }
            InputEvent::MouseButton { button: MouseButton::Middle, pressed } => {
                self.middle_mouse = *pressed;
                None
            }
            InputEvent::MouseButton { .. } => None,
            InputEvent::Scroll { delta_y } => Some(CameraAction::Zoom(*delta_y)),
            InputEvent::FocusLost => {
                self.clear_keys();
                self.middle_mouse = false;
                None
            }
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn toggle_wireframe(&mut self) {
        self.wireframe_mode = !self.wireframe_mode;
    }

    pub fn toggle_overlay(&mut self) {
        self.show_overlay = !self.show_overlay;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate a winit window event. Events the demo ignores map to `None`.
pub fn from_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
            ..
        } => Some(match state {
            ElementState::Pressed => InputEvent::KeyDown(*code),
            ElementState::Released => InputEvent::KeyUp(*code),
        }),
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: (*button).into(),
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let delta_y = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
            };
            Some(InputEvent::Scroll { delta_y })
        }
        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_middle(input: &mut InputState) {
        input.process_event(&InputEvent::MouseButton { button: MouseButton::Middle, pressed: true });
    }

    #[test]
    fn test_key_table_is_last_write_wins() {
        let mut input = InputState::new();
        let sequence = [
            InputEvent::KeyDown(KeyCode::KeyA),
            InputEvent::KeyDown(KeyCode::KeyA),
            InputEvent::KeyUp(KeyCode::KeyB),
            InputEvent::KeyUp(KeyCode::KeyA),
            InputEvent::KeyDown(KeyCode::KeyB),
        ];
        for event in &sequence {
            input.process_event(event);
        }

        assert!(!input.is_key_pressed(KeyCode::KeyA));
        assert!(input.is_key_pressed(KeyCode::KeyB));

        input.process_event(&InputEvent::KeyUp(KeyCode::KeyA));
        assert!(!input.is_key_pressed(KeyCode::KeyA), "releasing twice must stay released");
    }

    #[test]
    fn test_quit_keys_set_exit_flag_for_good() {
        for quit in [KeyCode::Escape, KeyCode::KeyQ] {
            let mut input = InputState::new();
            assert!(!input.should_exit);

            input.process_event(&InputEvent::KeyDown(quit));
            assert!(input.should_exit, "{quit:?} should request exit");

            let others = [
                InputEvent::KeyUp(quit),
                InputEvent::KeyDown(KeyCode::KeyW),
                InputEvent::CursorMoved { x: 3.0, y: 4.0 },
                InputEvent::MouseButton { button: MouseButton::Middle, pressed: true },
                InputEvent::Scroll { delta_y: 1.0 },
                InputEvent::FocusLost,
            ];
            for event in &others {
                input.process_event(event);
                assert!(input.should_exit, "exit flag cleared by {event:?}");
            }
        }
    }

    #[test]
    fn test_other_keys_do_not_request_exit() {
        let mut input = InputState::new();
        for code in [KeyCode::KeyW, KeyCode::ShiftLeft, KeyCode::Space] {
            input.process_event(&InputEvent::KeyDown(code));
        }
        assert!(!input.should_exit);
    }

    #[test]
    fn test_first_cursor_sample_has_no_delta() {
        let mut input = InputState::new();
        press_middle(&mut input);

        let action = input.process_event(&InputEvent::CursorMoved { x: 612.0, y: 95.0 });
        assert_eq!(action, Some(CameraAction::Orbit { dx: 0.0, dy: 0.0 }));
        assert_eq!(input.last_cursor, Some((612.0, 95.0)));
    }

    #[test]
    fn test_cursor_delta_inverts_y() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::CursorMoved { x: 100.0, y: 100.0 });
        press_middle(&mut input);

        let action = input.process_event(&InputEvent::CursorMoved { x: 110.0, y: 90.0 });
        assert_eq!(action, Some(CameraAction::Orbit { dx: 10.0, dy: 10.0 }));
    }

    #[test]
    fn test_cursor_tracked_without_middle_button() {
        let mut input = InputState::new();

        assert_eq!(input.process_event(&InputEvent::CursorMoved { x: 10.0, y: 10.0 }), None);
        assert_eq!(input.process_event(&InputEvent::CursorMoved { x: 500.0, y: 20.0 }), None);
        assert_eq!(input.last_cursor, Some((500.0, 20.0)));

        // no jump when the button goes down after a long unobserved move
        press_middle(&mut input);
        let action = input.process_event(&InputEvent::CursorMoved { x: 501.0, y: 20.0 });
        assert_eq!(action, Some(CameraAction::Orbit { dx: 1.0, dy: 0.0 }));

        input.process_event(&InputEvent::MouseButton { button: MouseButton::Middle, pressed: false });
        assert_eq!(input.process_event(&InputEvent::CursorMoved { x: 0.0, y: 0.0 }), None);
    }

    #[test]
    fn test_shift_turns_orbit_into_pan() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        press_middle(&mut input);
        input.process_event(&InputEvent::KeyDown(KeyCode::ShiftLeft));

        let action = input.process_event(&InputEvent::CursorMoved { x: -4.0, y: 2.0 });
        assert_eq!(action, Some(CameraAction::Pan { dx: -4.0, dy: -2.0 }));
    }

    #[test]
    fn test_other_buttons_leave_middle_flag_alone() {
        let mut input = InputState::new();
        press_middle(&mut input);
        input.process_event(&InputEvent::MouseButton { button: MouseButton::Left, pressed: false });
        input.process_event(&InputEvent::MouseButton { button: MouseButton::Right, pressed: true });
        assert!(input.middle_mouse);
    }

    #[test]
    fn test_scroll_forwards_zoom() {
        let mut input = InputState::new();
        assert_eq!(
            input.process_event(&InputEvent::Scroll { delta_y: -2.5 }),
            Some(CameraAction::Zoom(-2.5))
        );
    }

    #[test]
    fn test_toggles_and_focus_loss() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyG));
        input.process_event(&InputEvent::KeyDown(KeyCode::F1));
        assert!(input.wireframe_mode);
        assert!(input.show_overlay);

        press_middle(&mut input);
        input.process_event(&InputEvent::FocusLost);
        assert!(input.pressed_keys.is_empty());
        assert!(!input.middle_mouse);
        assert!(input.wireframe_mode, "focus loss must not reset toggles");
    }

    #[test]
    fn test_only_presses_count_as_presses() {
        assert!(InputEvent::KeyDown(KeyCode::KeyG).is_press());
        assert!(InputEvent::MouseButton { button: MouseButton::Middle, pressed: true }.is_press());
        assert!(InputEvent::Scroll { delta_y: 1.0 }.is_press());

        assert!(!InputEvent::KeyUp(KeyCode::KeyG).is_press());
        assert!(!InputEvent::MouseButton { button: MouseButton::Middle, pressed: false }.is_press());
        assert!(!InputEvent::CursorMoved { x: 1.0, y: 2.0 }.is_press());
        assert!(!InputEvent::FocusLost.is_press());
    }
}
