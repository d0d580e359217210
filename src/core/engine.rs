use super::controller::InputEvent;
use super::host::GraphicsContext;
use crate::frame::FrameInfo;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Engine callbacks driven by the render loop
///
/// `C` is the graphics context the engine draws with. It is current on the
/// calling thread for the duration of `init` and `update`.
pub trait Engine<C: GraphicsContext> {
    /// One-time setup, called after the context is first created
    fn init(&mut self, context: &mut C) -> Result<()>;

    /// Advance and draw one frame; return false to stop the loop
    fn update(&mut self, frame: &FrameInfo, context: &mut C) -> bool;

    /// Whether the engine wants more frames
    fn is_running(&self) -> bool;

    /// Ask the engine to stop; `is_running` reports false afterwards
    fn quit(&mut self);

    /// Raw input forwarded from the host
    fn handle_input(&mut self, _event: &InputEvent) {}
}
