//! Render-loop driver
//!
//! Owns a lazily created graphics context, coalesces redraw requests into a
//! single deferred `UpdateRequest`, and calls the engine once per frame while
//! animating. Every method runs on the host's event-loop thread.

use log::{debug, info};

use super::controller::InputEvent;
use super::engine::Engine;
use super::host::{GraphicsContext, HostEvent, WindowDimensions, WindowHost};
use crate::frame::FrameIterator;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Mutable loop state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverState {
    /// A deferred redraw has been posted and not yet serviced
    pub update_pending: bool,
    /// Re-arm a redraw after each presented frame
    pub animating: bool,
    /// The context exists and the engine has been initialised
    pub context_created: bool,
}

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No frame rendered yet, no context
    Uninitialized,
    /// Initialised, nothing scheduled
    Idle,
    /// Initialised, a deferred redraw is queued
    RenderPending,
    /// Closed; no further frames
    Closing,
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub frames_presented: u64,
    pub updates: u64,
    pub redraw_requests_posted: u64,
    pub redraw_requests_coalesced: u64,
}

/// Drives an engine from a window host's event queue
pub struct RenderLoopDriver<H: WindowHost, E: Engine<H::Context>> {
    host: H,
    engine: E,
    context: Option<H::Context>,
    state: DriverState,
    /// A posted `UpdateRequest` has not come back through `handle_event` yet
    request_queued: bool,
    closing: bool,
    frames: FrameIterator,
    stats: DriverStats,
}

impl<H: WindowHost, E: Engine<H::Context>> RenderLoopDriver<H, E> {
    pub fn new(host: H, engine: E) -> Self {
        Self {
            host,
            engine,
            context: None,
            state: DriverState::default(),
            request_queued: false,
            closing: false,
            frames: FrameIterator::new(),
            stats: DriverStats::default(),
        }
    }

    /// Schedule a frame on the host queue unless one is already pending
    pub fn request_redraw(&mut self) {
        if self.closing {
            return;
        }

        if self.state.update_pending {
            self.stats.redraw_requests_coalesced += 1;
            debug!("redraw already pending, coalesced");
            return;
        }

        self.state.update_pending = true;

        // An expose or resize render can clear the flag while the earlier
        // request is still queued; that request serves this frame too
        if self.request_queued {
            self.stats.redraw_requests_coalesced += 1;
            return;
        }

        self.request_queued = true;
        self.stats.redraw_requests_posted += 1;
        self.host.post_update_request();
    }

    /// Render a frame immediately if the surface can take one
    pub fn render_now(&mut self) -> Result<()> {
        if self.closing || !self.host.is_exposed() {
            return Ok(());
        }

        self.state.update_pending = false;

        if self.context.is_none() {
            self.context = Some(self.host.create_context()?);
            info!("graphics context created");
        }
        let needs_initialize = !self.state.context_created;

        let Some(context) = self.context.as_mut() else {
            return Ok(());
        };

        context.make_current()?;

        if needs_initialize {
            self.engine.init(context)?;
            self.state.context_created = true;

            context.make_current()?;
            context.swap_buffers()?;
            self.stats.frames_presented += 1;
            // Frame timing starts with the first real frame, not construction
            self.frames = FrameIterator::new();
            info!("engine initialised");
        }

        let keep_running = if self.engine.is_running() {
            let frame = self.frames.next().unwrap_or_default();
            self.stats.updates += 1;
            self.engine.update(&frame, context)
        } else {
            false
        };

        if !keep_running {
            info!("engine stopped, closing window");
            self.close();
            return Ok(());
        }

        context.make_current()?;
        context.swap_buffers()?;
        self.stats.frames_presented += 1;

        if self.state.animating {
            self.request_redraw();
        }

        Ok(())
    }

    /// Start or stop the self-re-arming frame chain
    pub fn set_animating(&mut self, animating: bool) {
        self.state.animating = animating;

        if animating {
            self.request_redraw();
        }
    }

    /// Dispatch one host event
    pub fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::UpdateRequest => {
                self.request_queued = false;
                self.render_now()
            }
            HostEvent::Close => {
                self.engine.quit();
                self.close();
                Ok(())
            }
            HostEvent::Input(input) => {
                self.dispatch_input(&input);
                Ok(())
            }
            HostEvent::Expose => self.render_if_exposed(),
            HostEvent::Resize(dimensions) => self.resize(dimensions),
        }
    }

    fn dispatch_input(&mut self, input: &InputEvent) {
        if self.closing {
            return;
        }
        self.engine.handle_input(input);

        // A stopped engine is only noticed during a frame
        if !self.engine.is_running() {
            self.request_redraw();
        }
    }

    fn resize(&mut self, dimensions: WindowDimensions) -> Result<()> {
        if let Some(context) = self.context.as_mut() {
            if !dimensions.is_empty() {
                context.resize(dimensions);
            }
        }
        self.render_if_exposed()
    }

    fn render_if_exposed(&mut self) -> Result<()> {
        if self.host.is_exposed() {
            self.render_now()
        } else {
            Ok(())
        }
    }

    fn close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;
        self.state.update_pending = false;
        self.host.close();
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn phase(&self) -> LoopPhase {
        if self.closing {
            LoopPhase::Closing
        } else if !self.state.context_created {
            LoopPhase::Uninitialized
        } else if self.state.update_pending {
            LoopPhase::RenderPending
        } else {
            LoopPhase::Idle
        }
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn is_animating(&self) -> bool {
        self.state.animating
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn context(&self) -> Option<&H::Context> {
        self.context.as_ref()
    }
}
