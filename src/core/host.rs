use super::controller::InputEvent;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (minimised on some platforms)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Events the host delivers to the render-loop driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// A deferred redraw posted by `request_redraw` is being serviced
    UpdateRequest,
    /// The user or the platform asked the window to close
    Close,
    /// The surface became visible or was damaged
    Expose,
    /// The surface changed size
    Resize(WindowDimensions),
    /// Raw keyboard / mouse input
    Input(InputEvent),
}

/// Graphics context owned by the driver - make current, present, resize
pub trait GraphicsContext {
    /// Bind the context to this surface for the calls that follow
    fn make_current(&mut self) -> Result<()>;

    /// Present whatever was drawn since the last make-current
    fn swap_buffers(&mut self) -> Result<()>;

    /// Reconfigure the backing surface after a resize
    fn resize(&mut self, dimensions: WindowDimensions);

    /// Colour the next presented frame is cleared to (linear RGBA)
    fn set_clear_color(&mut self, rgba: [f64; 4]);
}

/// Windowing host the driver runs inside
///
/// Everything here is called from the owning event-loop thread.
pub trait WindowHost {
    type Context: GraphicsContext;

    /// Whether the surface is visible and can receive a frame
    fn is_exposed(&self) -> bool;

    /// Current surface size in physical pixels
    fn dimensions(&self) -> WindowDimensions;

    /// Post a single `HostEvent::UpdateRequest` to this thread's event queue
    fn post_update_request(&mut self);

    /// Create the graphics context for this surface
    fn create_context(&mut self) -> Result<Self::Context>;

    /// Close the window and stop delivering events
    fn close(&mut self);
}
