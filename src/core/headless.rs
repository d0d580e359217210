use std::collections::VecDeque;

use log::debug;

use super::host::{GraphicsContext, HostEvent, WindowDimensions, WindowHost};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// In-process host with its own deferred event queue
///
/// Used for `--headless` runs, tests and benchmarks. Nothing is drawn; the
/// context only counts calls.
#[derive(Debug)]
pub struct HeadlessHost {
    queue: VecDeque<HostEvent>,
    exposed: bool,
    dimensions: WindowDimensions,
    closed: bool,
    contexts_created: usize,
    fail_context_creation: bool,
}

impl HeadlessHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            exposed: true,
            dimensions: WindowDimensions::new(width, height),
            closed: false,
            contexts_created: 0,
            fail_context_creation: false,
        }
    }

    /// Show or hide the surface
    pub fn set_exposed(&mut self, exposed: bool) {
        self.exposed = exposed;
    }

    /// Change the reported size; returns the matching resize event
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> HostEvent {
        self.dimensions = WindowDimensions::new(width, height);
        HostEvent::Resize(self.dimensions)
    }

    /// Make the next `create_context` call fail
    pub fn fail_context_creation(&mut self, fail: bool) {
        self.fail_context_creation = fail;
    }

    /// Queue an event as the windowing system would
    pub fn push_event(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    /// Pop the next queued event; `None` once closed or drained
    pub fn next_event(&mut self) -> Option<HostEvent> {
        if self.closed {
            return None;
        }
        self.queue.pop_front()
    }

    /// Number of queued events
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Number of queued `UpdateRequest`s
    pub fn pending_update_requests(&self) -> usize {
        self.queue
            .iter()
            .filter(|e| matches!(e, HostEvent::UpdateRequest))
            .count()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn contexts_created(&self) -> usize {
        self.contexts_created
    }
}

impl WindowHost for HeadlessHost {
    type Context = HeadlessContext;

    fn is_exposed(&self) -> bool {
        self.exposed && !self.closed && !self.dimensions.is_empty()
    }

    fn dimensions(&self) -> WindowDimensions {
        self.dimensions
    }

    fn post_update_request(&mut self) {
        self.queue.push_back(HostEvent::UpdateRequest);
    }

    fn create_context(&mut self) -> Result<HeadlessContext> {
        if self.fail_context_creation {
            return Err("headless context creation disabled".into());
        }
        self.contexts_created += 1;
        debug!(
            "headless context {}x{}",
            self.dimensions.width, self.dimensions.height
        );
        Ok(HeadlessContext::new(self.dimensions))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Context that records calls instead of drawing
#[derive(Debug, Clone)]
pub struct HeadlessContext {
    dimensions: WindowDimensions,
    make_current_calls: u64,
    presents: u64,
    resizes: u64,
    clear_color: [f64; 4],
}

impl HeadlessContext {
    pub fn new(dimensions: WindowDimensions) -> Self {
        Self {
            dimensions,
            make_current_calls: 0,
            presents: 0,
            resizes: 0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn dimensions(&self) -> WindowDimensions {
        self.dimensions
    }

    pub fn make_current_calls(&self) -> u64 {
        self.make_current_calls
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn resizes(&self) -> u64 {
        self.resizes
    }

    pub fn clear_color(&self) -> [f64; 4] {
        self.clear_color
    }
}

impl GraphicsContext for HeadlessContext {
    fn make_current(&mut self) -> Result<()> {
        self.make_current_calls += 1;
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn resize(&mut self, dimensions: WindowDimensions) {
        self.dimensions = dimensions;
        self.resizes += 1;
    }

    fn set_clear_color(&mut self, rgba: [f64; 4]) {
        self.clear_color = rgba;
    }
}
