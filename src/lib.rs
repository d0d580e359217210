pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod demo;
pub mod frame;
pub mod window;

pub use crate::core::{
    DriverState, DriverStats, Engine, GraphicsContext, HeadlessContext, HeadlessHost, HostEvent,
    InputEvent, LoopPhase, RenderLoopDriver, WindowDimensions, WindowHost,
};
