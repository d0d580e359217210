use std::collections::HashSet;
use std::time::{Duration, Instant};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller, InputEvent};

/// Second press within this window (and radius) is reported as a double click
const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);
const DOUBLE_CLICK_RADIUS: f32 = 4.0;
/// Pixel scroll deltas are normalised to lines with this factor
const PIXELS_PER_LINE: f32 = 20.0;

/// Translates winit window events into `InputEvent`s
///
/// Winit has no double-click event, so presses are classified here using
/// the time and cursor distance since the previous press of the same button.
#[derive(Debug, Clone, Default)]
pub struct WinitInputTranslator {
    cursor: Option<(f32, f32)>,
    last_press: Option<(Button, Instant, (f32, f32))>,
}

impl WinitInputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one window event; non-input events yield `None`
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                Some(Self::key_event(button, event.state, event.repeat))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = Self::mouse_button_to_button(*button)?;
                match state {
                    ElementState::Pressed => Some(self.classify_press(button, Instant::now())),
                    ElementState::Released => Some(InputEvent::Release(button)),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = Some((x, y));
                Some(InputEvent::CursorMoved { x, y })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match *delta {
                    MouseScrollDelta::LineDelta(dx, dy) => (dx, dy),
                    MouseScrollDelta::PixelDelta(p) => {
                        (p.x as f32 / PIXELS_PER_LINE, p.y as f32 / PIXELS_PER_LINE)
                    }
                };
                Some(InputEvent::Wheel { dx, dy })
            }
            _ => None,
        }
    }

    /// Record the cursor position without going through a winit event
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
    }

    /// Keyboard transition as an `InputEvent`; auto-repeats are kept and flagged
    pub fn key_event(button: Button, state: ElementState, repeat: bool) -> InputEvent {
        match state {
            ElementState::Pressed if repeat => InputEvent::Repeat(button),
            ElementState::Pressed => InputEvent::Press(button),
            ElementState::Released => InputEvent::Release(button),
        }
    }

    /// Classify a mouse press as `Press` or `DoubleClick`
    pub fn classify_press(&mut self, button: Button, at: Instant) -> InputEvent {
        let position = self.cursor.unwrap_or((0.0, 0.0));

        if let Some((last_button, last_at, last_pos)) = self.last_press {
            let dx = position.0 - last_pos.0;
            let dy = position.1 - last_pos.1;
            let close_enough = (dx * dx + dy * dy).sqrt() <= DOUBLE_CLICK_RADIUS;
            let quick_enough = at.saturating_duration_since(last_at) <= DOUBLE_CLICK_INTERVAL;

            if last_button == button && close_enough && quick_enough {
                // A third press starts a new sequence
                self.last_press = None;
                return InputEvent::DoubleClick(button);
            }
        }

        self.last_press = Some((button, at, position));
        InputEvent::Press(button)
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::KeyQ => Some(Button::KeyQ),
            KeyCode::KeyE => Some(Button::KeyE),
            KeyCode::Space => Some(Button::Space),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            KeyCode::Enter | KeyCode::NumpadEnter => Some(Button::Enter),
            KeyCode::Escape => Some(Button::Escape),
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::ArrowLeft => Some(Button::ArrowLeft),
            KeyCode::ArrowRight => Some(Button::ArrowRight),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }
}

/// Button, cursor and wheel state accumulated from `InputEvent`s
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    /// Wheel lines since last reset
    wheel_delta: (f32, f32),
    /// Double clicks since last reset
    double_clicks: Vec<Button>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Press(button) | InputEvent::Repeat(button) => {
                self.pressed_keys.insert(button);
            }
            InputEvent::DoubleClick(button) => {
                self.pressed_keys.insert(button);
                self.double_clicks.push(button);
            }
            InputEvent::Release(button) => {
                self.pressed_keys.remove(&button);
            }
            InputEvent::CursorMoved { x, y } => {
                if let Some((old_x, old_y)) = self.mouse_position {
                    self.mouse_delta.0 += x - old_x;
                    self.mouse_delta.1 += y - old_y;
                }
                self.mouse_position = Some((x, y));
            }
            InputEvent::Wheel { dx, dy } => {
                self.wheel_delta.0 += dx;
                self.wheel_delta.1 += dy;
            }
        }
    }

    /// Reset per-frame state (mouse delta, wheel, double clicks)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.wheel_delta = (0.0, 0.0);
        self.double_clicks.clear();
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    pub fn wheel_delta(&self) -> (f32, f32) {
        self.wheel_delta
    }

    pub fn double_clicked(&self, button: Button) -> bool {
        self.double_clicks.contains(&button)
    }
}

impl Controller for InputState {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit event construction requires internal fields that are not publicly
    // accessible, so decoding is tested through key_event and classify_press

    #[test]
    fn test_new_state_empty() {
        let state = InputState::new();
        assert!(!state.is_down(Button::KeyW));
        assert_eq!(state.mouse_delta(), (0.0, 0.0));
        assert_eq!(state.wheel_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_press_release() {
        let mut state = InputState::new();
        state.apply(&InputEvent::Press(Button::KeyW));
        state.apply(&InputEvent::Press(Button::KeyW));
        state.apply(&InputEvent::Press(Button::Space));

        assert!(state.is_down(Button::KeyW));
        assert!(state.is_down(Button::Space));

        state.apply(&InputEvent::Release(Button::KeyW));
        assert!(!state.is_down(Button::KeyW));
        assert!(state.is_down(Button::Space));
    }

    #[test]
    fn test_repeat_keeps_button_down() {
        let mut state = InputState::new();
        state.apply(&InputEvent::Press(Button::ArrowUp));
        state.apply(&InputEvent::Repeat(Button::ArrowUp));
        state.apply(&InputEvent::Repeat(Button::ArrowUp));
        assert!(state.is_down(Button::ArrowUp));

        state.apply(&InputEvent::Release(Button::ArrowUp));
        assert!(!state.is_down(Button::ArrowUp));
    }

    #[test]
    fn test_key_event_forwards_repeats() {
        assert_eq!(
            WinitInputTranslator::key_event(Button::ArrowUp, ElementState::Pressed, false),
            InputEvent::Press(Button::ArrowUp)
        );
        assert_eq!(
            WinitInputTranslator::key_event(Button::ArrowUp, ElementState::Pressed, true),
            InputEvent::Repeat(Button::ArrowUp)
        );
        assert_eq!(
            WinitInputTranslator::key_event(Button::ArrowUp, ElementState::Released, false),
            InputEvent::Release(Button::ArrowUp)
        );
    }

    #[test]
    fn test_cursor_delta_and_reset() {
        let mut state = InputState::new();
        state.apply(&InputEvent::CursorMoved { x: 100.0, y: 200.0 });
        state.apply(&InputEvent::CursorMoved { x: 110.0, y: 195.0 });
        state.apply(&InputEvent::Wheel { dx: 0.0, dy: 2.0 });

        assert_eq!(state.mouse_delta(), (10.0, -5.0));
        assert_eq!(state.wheel_delta(), (0.0, 2.0));

        state.reset_deltas();
        assert_eq!(state.mouse_delta(), (0.0, 0.0));
        assert_eq!(state.wheel_delta(), (0.0, 0.0));

        // Position is kept, so the next move measures from it
        state.apply(&InputEvent::CursorMoved { x: 111.0, y: 195.0 });
        assert_eq!(state.mouse_delta(), (1.0, 0.0));
    }

    #[test]
    fn test_double_click_marks_button_down() {
        let mut state = InputState::new();
        state.apply(&InputEvent::DoubleClick(Button::MouseLeft));
        assert!(state.is_down(Button::MouseLeft));
        assert!(state.double_clicked(Button::MouseLeft));

        state.apply(&InputEvent::Release(Button::MouseLeft));
        state.reset_deltas();
        assert!(!state.double_clicked(Button::MouseLeft));
    }

    #[test]
    fn test_classify_double_click() {
        let mut translator = WinitInputTranslator::new();
        let t0 = Instant::now();
        translator.set_cursor(50.0, 50.0);

        assert_eq!(
            translator.classify_press(Button::MouseLeft, t0),
            InputEvent::Press(Button::MouseLeft)
        );
        assert_eq!(
            translator.classify_press(Button::MouseLeft, t0 + Duration::from_millis(150)),
            InputEvent::DoubleClick(Button::MouseLeft)
        );
        // Third press starts over
        assert_eq!(
            translator.classify_press(Button::MouseLeft, t0 + Duration::from_millis(300)),
            InputEvent::Press(Button::MouseLeft)
        );
    }

    #[test]
    fn test_classify_slow_or_far_press() {
        let mut translator = WinitInputTranslator::new();
        let t0 = Instant::now();
        translator.set_cursor(10.0, 10.0);

        translator.classify_press(Button::MouseLeft, t0);
        assert_eq!(
            translator.classify_press(Button::MouseLeft, t0 + Duration::from_millis(900)),
            InputEvent::Press(Button::MouseLeft)
        );

        translator.set_cursor(40.0, 10.0);
        assert_eq!(
            translator.classify_press(Button::MouseLeft, t0 + Duration::from_millis(1000)),
            InputEvent::Press(Button::MouseLeft)
        );
    }

    #[test]
    fn test_classify_different_button() {
        let mut translator = WinitInputTranslator::new();
        let t0 = Instant::now();

        translator.classify_press(Button::MouseLeft, t0);
        assert_eq!(
            translator.classify_press(Button::MouseRight, t0 + Duration::from_millis(50)),
            InputEvent::Press(Button::MouseRight)
        );
    }
}
