pub mod controller;
pub mod driver;
pub mod engine;
pub mod gpu_context;
pub mod headless;
pub mod host;
pub mod input_adapter;
pub mod surface_context;

pub use controller::{Button, Controller, InputEvent};
pub use driver::{DriverState, DriverStats, LoopPhase, RenderLoopDriver};
pub use engine::Engine;
pub use gpu_context::GpuContext;
pub use headless::{HeadlessContext, HeadlessHost};
pub use host::{GraphicsContext, HostEvent, WindowDimensions, WindowHost};
pub use input_adapter::{InputState, WinitInputTranslator};
pub use surface_context::SurfaceContext;
