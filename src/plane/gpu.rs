use glam::{IVec2, UVec2};

use super::device::{DeviceKind, PlaneDevice, PlaneState};
use super::error::PlaneError;
use super::PlaneId;
use crate::core::{Framebuffer, GpuContext, Placement, QuadPipeline, TexturedQuad, WindowSurface};

struct GpuPlane {
    quad: TexturedQuad,
    state: PlaneState,
}

/// Hardware-composited planes
///
/// Each plane owns a GPU texture and a placement uniform. Moving a plane
/// rewrites the 16 byte uniform; content changes are texture uploads. The
/// primary framebuffer is one more texture, re-uploaded only when its
/// revision changes.
pub struct GpuPlaneDevice {
    gpu: GpuContext,
    surface: WindowSurface,
    pipeline: QuadPipeline,
    viewport: UVec2,
    primary: TexturedQuad,
    primary_revision: Option<u64>,
    slots: Vec<Option<GpuPlane>>,
}

impl GpuPlaneDevice {
    pub fn new(gpu: GpuContext, surface: WindowSurface, viewport: UVec2, plane_count: usize) -> Self {
        let pipeline = QuadPipeline::new(
            gpu.device(),
            surface.format(),
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let primary = pipeline.create_quad(gpu.device(), viewport, "Primary Plane");
        log::info!("hardware plane device: {} planes", plane_count);
        Self {
            gpu,
            surface,
            pipeline,
            viewport,
            primary,
            primary_revision: None,
            slots: (0..plane_count).map(|_| None).collect(),
        }
    }
}

impl PlaneDevice for GpuPlaneDevice {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Hardware
    }

    fn plane_count(&self) -> usize {
        self.slots.len()
    }

    fn claim(&mut self, id: PlaneId, size: UVec2) -> Result<(), PlaneError> {
        let count = self.slots.len();
        let max = self.gpu.max_texture_size();
        if size.x > max || size.y > max {
            return Err(PlaneError::unavailable(
                id,
                format!("{}x{} exceeds the device limit of {}", size.x, size.y, max),
            ));
        }
        let slot = self
            .slots
            .get_mut(id.0 as usize)
            .ok_or_else(|| PlaneError::unavailable(id, format!("device exposes {} planes", count)))?;
        if slot.is_some() {
            return Err(PlaneError::unavailable(id, "already claimed"));
        }

        let label = format!("Overlay Plane {}", id.0);
        *slot = Some(GpuPlane {
            quad: self.pipeline.create_quad(self.gpu.device(), size, &label),
            state: PlaneState {
                position: IVec2::ZERO,
                size,
                z_order: 0,
                enabled: false,
            },
        });
        log::debug!("hardware plane {} claimed ({}x{})", id, size.x, size.y);
        Ok(())
    }

    fn release(&mut self, id: PlaneId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            slot.take();
        }
    }

    fn upload(&mut self, id: PlaneId, pixels: &[u8]) -> Result<(), PlaneError> {
        let plane = self
            .slots
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| PlaneError::unavailable(id, "not claimed"))?;
        let size = plane.quad.size();
        let expected = size.x as usize * size.y as usize * 4;
        if pixels.len() != expected {
            return Err(PlaneError::ContentSize {
                expected,
                actual: pixels.len(),
            });
        }
        plane.quad.upload(self.gpu.queue(), pixels);
        Ok(())
    }

    fn update(&mut self, id: PlaneId, state: PlaneState) {
        let placement = Placement::for_rect(state.position, state.size, self.viewport);
        if let Some(plane) = self.slots.get_mut(id.0 as usize).and_then(Option::as_mut) {
            plane.quad.place(self.gpu.queue(), placement);
            plane.state = state;
        }
    }

    fn present(&mut self, primary: &Framebuffer) -> Result<(), PlaneError> {
        if primary.size() != self.viewport {
            return Err(PlaneError::Present(format!(
                "primary is {:?}, viewport is {:?}",
                primary.size(),
                self.viewport
            )));
        }
        if self.primary_revision != Some(primary.revision()) {
            self.primary.upload(self.gpu.queue(), primary.pixels());
            self.primary_revision = Some(primary.revision());
        }

        let frame = self
            .surface
            .acquire(self.gpu.device())
            .map_err(|e| PlaneError::Present(e.to_string()))?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut visible: Vec<&GpuPlane> = self
            .slots
            .iter()
            .flatten()
            .filter(|plane| plane.state.enabled)
            .collect();
        visible.sort_by_key(|plane| plane.state.z_order);

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Plane Composite Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Plane Composite Pass"),
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

            self.pipeline.draw(&mut pass, &self.primary);
            for plane in visible {
                self.pipeline.draw(&mut pass, &plane.quad);
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(self.gpu.device(), width, height);
    }
}
