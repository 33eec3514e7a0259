use glam::UVec2;

use super::framebuffer::Framebuffer;
use super::gpu_context::{GpuContext, WindowSurface};
use super::quad_pipeline::{QuadPipeline, TexturedQuad};
use crate::plane::{FramePresenter, PlaneError};

/// Presents a CPU-composited framebuffer on a window surface
///
/// This is the output stage of the software plane path: every frame is one
/// full texture upload followed by a fullscreen quad draw.
pub struct SurfaceRenderer {
    gpu: GpuContext,
    surface: WindowSurface,
    pipeline: QuadPipeline,
    quad: TexturedQuad,
}

impl SurfaceRenderer {
    pub fn new(gpu: GpuContext, surface: WindowSurface, viewport: UVec2) -> Self {
        let pipeline = QuadPipeline::new(gpu.device(), surface.format(), wgpu::BlendState::REPLACE);
        let quad = pipeline.create_quad(gpu.device(), viewport, "Software Framebuffer");
        Self {
            gpu,
            surface,
            pipeline,
            quad,
        }
    }

    /// Render raw pixel data to the surface
    pub fn render_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<(), PlaneError> {
        let expected = self.quad.size();
        if UVec2::new(width, height) != expected {
            return Err(PlaneError::Present(format!(
                "Pixel dimensions {}x{} don't match surface {}x{}",
                width, height, expected.x, expected.y
            )));
        }

        let expected_size = width as usize * height as usize * 4;
        if pixels.len() != expected_size {
            return Err(PlaneError::ContentSize {
                expected: expected_size,
                actual: pixels.len(),
            });
        }

        self.quad.upload(self.gpu.queue(), pixels);

        let frame = self
            .surface
            .acquire(self.gpu.device())
            .map_err(|e| PlaneError::Present(e.to_string()))?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Software Present Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Software Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.pipeline.draw(&mut pass, &self.quad);
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl FramePresenter for SurfaceRenderer {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), PlaneError> {
        let (width, height) = frame.dimensions();
        self.render_pixels(frame.pixels(), width, height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(self.gpu.device(), width, height);
    }
}
