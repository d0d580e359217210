use std::sync::Arc;

use log::{debug, warn};
use wgpu::{Surface, SurfaceConfiguration, SurfaceTexture};
use winit::window::Window;

use super::gpu_context::GpuContext;
use super::host::{GraphicsContext, WindowDimensions};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Window surface used as the driver's graphics context
///
/// `make_current` acquires the next surface texture (once per frame) and
/// `swap_buffers` clears it to the current clear colour, submits and
/// presents.
pub struct SurfaceContext {
    gpu: GpuContext,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    frame: Option<SurfaceTexture>,
    clear_color: wgpu::Color,
}

impl SurfaceContext {
    /// Create a surface, device and queue for a window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or("surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);

        Ok(Self {
            gpu,
            surface,
            config,
            frame: None,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Next surface texture, or `None` when this frame should be skipped
    fn acquire(&mut self) -> Result<Option<SurfaceTexture>> {
        let error = match self.surface.get_current_texture() {
            Ok(texture) => return Ok(Some(texture)),
            Err(e) => e,
        };

        match recovery_for(&error) {
            SurfaceRecovery::SkipFrame => {
                debug!("surface texture timed out, skipping frame");
                Ok(None)
            }
            SurfaceRecovery::Reconfigure => {
                warn!("surface lost or outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.config);
                match self.surface.get_current_texture() {
                    Ok(texture) => Ok(Some(texture)),
                    Err(e) if recovery_for(&e) == SurfaceRecovery::Fatal => Err(e.into()),
                    Err(e) => {
                        debug!("surface still unavailable after reconfigure ({e}), skipping frame");
                        Ok(None)
                    }
                }
            }
            SurfaceRecovery::Fatal => Err(error.into()),
        }
    }
}

/// What to do when the surface refuses to hand out a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    /// Drop this frame; the next request tries again
    SkipFrame,
    /// Reconfigure the surface and retry once
    Reconfigure,
    Fatal,
}

fn recovery_for(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Timeout => SurfaceRecovery::SkipFrame,
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other => SurfaceRecovery::Fatal,
    }
}

impl GraphicsContext for SurfaceContext {
    fn make_current(&mut self) -> Result<()> {
        if self.frame.is_none() {
            self.frame = self.acquire()?;
        }
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        let Some(frame) = self.frame.take() else {
            debug!("no surface texture this frame, nothing to present");
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }

    fn resize(&mut self, dimensions: WindowDimensions) {
        // Any acquired texture belongs to the old configuration
        self.frame = None;
        self.config.width = dimensions.width.max(1);
        self.config.height = dimensions.height.max(1);
        self.surface.configure(self.gpu.device(), &self.config);
        debug!("surface resized to {}x{}", self.config.width, self.config.height);
    }

    fn set_clear_color(&mut self, rgba: [f64; 4]) {
        self.clear_color = wgpu::Color {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        };
    }
}
