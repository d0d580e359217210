/// Input button identifier - keyboard keys and mouse buttons share one space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    Space,
    Shift,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    MouseLeft,
    MouseRight,
    MouseMiddle,
}

impl Button {
    /// True for mouse buttons, false for keyboard keys
    pub fn is_mouse(self) -> bool {
        matches!(self, Button::MouseLeft | Button::MouseRight | Button::MouseMiddle)
    }
}

/// Raw input delivered to the engine, already decoded from the toolkit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Press(Button),
    /// Key auto-repeat while held; the button is already down
    Repeat(Button),
    Release(Button),
    DoubleClick(Button),
    /// Cursor position in physical pixels relative to the surface origin
    CursorMoved { x: f32, y: f32 },
    /// Scroll amount in lines
    Wheel { dx: f32, dy: f32 },
}

impl InputEvent {
    /// Button this event refers to, if any
    pub fn button(&self) -> Option<Button> {
        match *self {
            InputEvent::Press(b)
            | InputEvent::Repeat(b)
            | InputEvent::Release(b)
            | InputEvent::DoubleClick(b) => Some(b),
            InputEvent::CursorMoved { .. } | InputEvent::Wheel { .. } => None,
        }
    }
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;
}
