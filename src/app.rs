use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use log::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::core::{
    DriverStats, Engine, HeadlessContext, HeadlessHost, HostEvent, RenderLoopDriver,
    SurfaceContext, WindowDimensions, WinitInputTranslator,
};
use crate::window::{DriverEvent, WinitHost};

/// Winit application: creates the window on resume and feeds the driver
pub struct App<E: Engine<SurfaceContext>> {
    config: Config,
    proxy: EventLoopProxy<DriverEvent>,
    engine: Option<E>,
    driver: Option<RenderLoopDriver<WinitHost, E>>,
    input: WinitInputTranslator,
    failure: Option<String>,
}

impl<E: Engine<SurfaceContext>> App<E> {
    pub fn new(config: Config, engine: E, proxy: EventLoopProxy<DriverEvent>) -> Self {
        Self {
            config,
            proxy,
            engine: Some(engine),
            driver: None,
            input: WinitInputTranslator::new(),
            failure: None,
        }
    }

    /// Driver stats, once the window exists
    pub fn stats(&self) -> Option<DriverStats> {
        self.driver.as_ref().map(|d| d.stats())
    }

    /// Error that stopped the loop, if any
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };

        if let Err(e) = driver.handle_event(event) {
            error!("render loop failed: {}", e);
            self.failure = Some(e.to_string());
            event_loop.exit();
            return;
        }

        if driver.host().is_closed() {
            info!(
                "window closed after {} frames",
                driver.stats().frames_presented
            );
            event_loop.exit();
        }
    }

    fn host_event(&mut self, event: &WindowEvent) -> Option<HostEvent> {
        match event {
            WindowEvent::CloseRequested => Some(HostEvent::Close),
            WindowEvent::Resized(size) => Some(HostEvent::Resize(WindowDimensions::new(
                size.width,
                size.height,
            ))),
            WindowEvent::RedrawRequested => Some(HostEvent::Expose),
            WindowEvent::Occluded(occluded) => {
                let driver = self.driver.as_mut()?;
                driver.host_mut().set_occluded(*occluded);
                (!occluded).then_some(HostEvent::Expose)
            }
            _ => self.input.translate(event).map(HostEvent::Input),
        }
    }
}

impl<E: Engine<SurfaceContext>> ApplicationHandler<DriverEvent> for App<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.driver.is_some() {
            return;
        }
        let Some(engine) = self.engine.take() else {
            return;
        };

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.width,
                    self.config.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {}", e);
                self.failure = Some(e.to_string());
                event_loop.exit();
                return;
            }
        };

        let host = WinitHost::new(window.clone(), self.proxy.clone());
        let mut driver = RenderLoopDriver::new(host, engine);
        driver.set_animating(self.config.animate);
        self.driver = Some(driver);

        // First expose arrives as RedrawRequested
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(host_event) = self.host_event(&event) {
            self.dispatch(event_loop, host_event);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: DriverEvent) {
        match event {
            DriverEvent::UpdateRequest => self.dispatch(event_loop, HostEvent::UpdateRequest),
        }
    }
}

/// Run the driver in a winit window until it closes
pub fn run_windowed<E: Engine<SurfaceContext>>(config: Config, engine: E) -> Result<()> {
    let event_loop = EventLoop::<DriverEvent>::with_user_event()
        .build()
        .map_err(|e| anyhow!("creating event loop: {}", e))?;
    // Deferred user events keep the loop busy while animating
    event_loop.set_control_flow(ControlFlow::Wait);

    let proxy = event_loop.create_proxy();
    let mut app = App::new(config, engine, proxy);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {}", e))?;

    if let Some(failure) = app.failure() {
        bail!("render loop stopped: {}", failure);
    }
    if let Some(stats) = app.stats() {
        info!("{:?}", stats);
    }
    Ok(())
}

/// Run the driver against the in-process headless host until it closes or
/// runs out of events
pub fn run_headless<E: Engine<HeadlessContext>>(config: &Config, engine: E) -> Result<DriverStats> {
    let host = HeadlessHost::new(config.width, config.height);
    let mut driver = RenderLoopDriver::new(host, engine);

    driver.host_mut().push_event(HostEvent::Expose);
    driver.set_animating(config.animate);

    while let Some(event) = driver.host_mut().next_event() {
        driver
            .handle_event(event)
            .map_err(|e| anyhow!("render loop failed: {}", e))?;
    }

    let stats = driver.stats();
    info!(
        "headless run finished: {} frames presented, {} updates",
        stats.frames_presented, stats.updates
    );
    Ok(stats)
}
