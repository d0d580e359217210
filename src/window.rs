use std::sync::Arc;

use log::warn;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use crate::core::{SurfaceContext, WindowDimensions, WindowHost};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// User events posted back to the winit event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    UpdateRequest,
}

/// Winit window as a render-loop host
///
/// Deferred redraws travel through the event loop as `DriverEvent` user
/// events, so they are serviced on the same thread after pending input.
pub struct WinitHost {
    window: Arc<Window>,
    proxy: EventLoopProxy<DriverEvent>,
    occluded: bool,
    closed: bool,
}

impl WinitHost {
    pub fn new(window: Arc<Window>, proxy: EventLoopProxy<DriverEvent>) -> Self {
        Self {
            window,
            proxy,
            occluded: false,
            closed: false,
        }
    }

    /// Track `WindowEvent::Occluded`
    pub fn set_occluded(&mut self, occluded: bool) {
        self.occluded = occluded;
    }

    /// Set once the driver closed the window; the app exits the loop
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl WindowHost for WinitHost {
    type Context = SurfaceContext;

    fn is_exposed(&self) -> bool {
        // Platforms that cannot tell report None; treat that as visible
        !self.closed
            && !self.occluded
            && self.window.is_minimized() != Some(true)
            && self.window.is_visible() != Some(false)
            && !self.dimensions().is_empty()
    }

    fn dimensions(&self) -> WindowDimensions {
        let size = self.window.inner_size();
        WindowDimensions::new(size.width, size.height)
    }

    fn post_update_request(&mut self) {
        if self.proxy.send_event(DriverEvent::UpdateRequest).is_err() {
            warn!("event loop already closed, dropping update request");
        }
    }

    fn create_context(&mut self) -> Result<SurfaceContext> {
        pollster::block_on(SurfaceContext::new(self.window.clone()))
    }

    fn close(&mut self) {
        self.closed = true;
        self.window.set_visible(false);
    }
}
