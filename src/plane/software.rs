use glam::{IVec2, UVec2};

use super::device::{DeviceKind, PlaneDevice, PlaneState};
use super::error::PlaneError;
use super::PlaneId;
use crate::core::Framebuffer;

/// Final output stage of the software path
pub trait FramePresenter {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), PlaneError>;

    fn resize(&mut self, _width: u32, _height: u32) {}
}

struct SoftPlane {
    state: PlaneState,
    pixels: Vec<u8>,
}

/// Plane device for displays without overlay hardware
///
/// Planes are kept as CPU buffers and blitted over the primary framebuffer in
/// z-order on every present that has something new to show.
pub struct SoftwarePlaneDevice {
    slots: Vec<Option<SoftPlane>>,
    output: Framebuffer,
    presenter: Option<Box<dyn FramePresenter>>,
    uploads: u64,
    composed_primary: Option<u64>,
    dirty: bool,
}

impl SoftwarePlaneDevice {
    /// Planes offered when nothing else is asked for; software has no real limit
    pub const DEFAULT_PLANES: usize = 16;

    /// A headless device composing into a `viewport` sized buffer
    pub fn new(viewport: UVec2, plane_count: usize) -> Self {
        Self {
            slots: (0..plane_count).map(|_| None).collect(),
            output: Framebuffer::new(viewport.x, viewport.y),
            presenter: None,
            uploads: 0,
            composed_primary: None,
            dirty: true,
        }
    }

    pub fn with_presenter(mut self, presenter: Box<dyn FramePresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Last composited frame
    pub fn frame(&self) -> &Framebuffer {
        &self.output
    }

    /// Number of buffer uploads received so far
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    pub fn claimed(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// State last applied to a plane, if claimed
    pub fn plane_state(&self, id: PlaneId) -> Option<PlaneState> {
        self.slot(id).map(|plane| plane.state)
    }

    fn slot(&self, id: PlaneId) -> Option<&SoftPlane> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: PlaneId) -> Option<&mut SoftPlane> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn compose(&mut self, primary: &Framebuffer) {
        self.output.copy_from(primary);

        let mut visible: Vec<(i32, usize)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref()
                    .filter(|plane| plane.state.enabled)
                    .map(|plane| (plane.state.z_order, i))
            })
            .collect();
        visible.sort_unstable();

        for (_, i) in visible {
            if let Some(plane) = &self.slots[i] {
                self.output
                    .blit(&plane.pixels, plane.state.size, plane.state.position);
            }
        }
    }
}

impl PlaneDevice for SoftwarePlaneDevice {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Software
    }

    fn plane_count(&self) -> usize {
        self.slots.len()
    }

    fn claim(&mut self, id: PlaneId, size: UVec2) -> Result<(), PlaneError> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(id.0 as usize)
            .ok_or_else(|| PlaneError::unavailable(id, format!("device exposes {} planes", count)))?;
        if slot.is_some() {
            return Err(PlaneError::unavailable(id, "already claimed"));
        }
        *slot = Some(SoftPlane {
            state: PlaneState {
                position: IVec2::ZERO,
                size,
                z_order: 0,
                enabled: false,
            },
            pixels: vec![0; size.x as usize * size.y as usize * 4],
        });
        log::debug!("software plane {} claimed ({}x{})", id, size.x, size.y);
        Ok(())
    }

    fn release(&mut self, id: PlaneId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            if slot.take().is_some() {
                self.dirty = true;
            }
        }
    }

    fn upload(&mut self, id: PlaneId, pixels: &[u8]) -> Result<(), PlaneError> {
        let plane = self
            .slot_mut(id)
            .ok_or_else(|| PlaneError::unavailable(id, "not claimed"))?;
        if plane.pixels.len() != pixels.len() {
            return Err(PlaneError::ContentSize {
                expected: plane.pixels.len(),
                actual: pixels.len(),
            });
        }
        plane.pixels.copy_from_slice(pixels);
        self.uploads += 1;
        self.dirty = true;
        Ok(())
    }

    fn update(&mut self, id: PlaneId, state: PlaneState) {
        if let Some(plane) = self.slot_mut(id) {
            plane.state = state;
            self.dirty = true;
        }
    }

    fn present(&mut self, primary: &Framebuffer) -> Result<(), PlaneError> {
        if !self.dirty && self.composed_primary == Some(primary.revision()) {
            return Ok(());
        }
        self.compose(primary);
        self.composed_primary = Some(primary.revision());
        self.dirty = false;

        match &mut self.presenter {
            Some(presenter) => presenter.present(&self.output),
            None => Ok(()),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
        // A reconfigured surface starts out blank
        self.dirty = true;
    }
}
