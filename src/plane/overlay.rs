use bitflags::bitflags;
use glam::{IVec2, UVec2};

use super::device::{PlaneDevice, PlaneState};
use super::error::PlaneError;
use super::PlaneId;
use crate::core::Rect;

bitflags! {
    /// Plane state not yet pushed to the device
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PlaneDirty: u8 {
        const GEOMETRY = 1 << 0;
        const CONTENT = 1 << 1;
        const ZORDER = 1 << 2;
        const ENABLED = 1 << 3;
    }
}

/// One overlay plane: buffer, geometry, z-order and enable state
///
/// Setters only record the change; the owning manager pushes dirty state to
/// the device on commit, so moving a plane every pointer event costs a
/// metadata write and never a buffer upload.
#[derive(Debug)]
pub struct OverlayPlane {
    name: String,
    id: PlaneId,
    size: UVec2,
    position: IVec2,
    z_order: i32,
    enabled: bool,
    pixels: Vec<u8>,
    dirty: PlaneDirty,
}

impl OverlayPlane {
    /// An unconfigured plane; call [`OverlayPlane::configure`] before use
    pub fn new(name: impl Into<String>, id: PlaneId) -> Self {
        Self {
            name: name.into(),
            id,
            size: UVec2::ZERO,
            position: IVec2::ZERO,
            z_order: 0,
            enabled: true,
            pixels: Vec::new(),
            dirty: PlaneDirty::empty(),
        }
    }

    /// Claim the physical plane and allocate a transparent `size` buffer
    pub fn configure<D: PlaneDevice + ?Sized>(
        &mut self,
        device: &mut D,
        size: UVec2,
        position: IVec2,
    ) -> Result<(), PlaneError> {
        device.claim(self.id, size)?;
        self.size = size;
        self.position = position;
        self.pixels = vec![0; size.x as usize * size.y as usize * 4];
        self.dirty = PlaneDirty::all();
        Ok(())
    }

    pub fn set_position(&mut self, position: IVec2) {
        if self.position != position {
            self.position = position;
            self.dirty |= PlaneDirty::GEOMETRY;
        }
    }

    /// Replace the plane's pixels; `pixels` must cover the whole plane
    pub fn set_content(&mut self, pixels: &[u8]) -> Result<(), PlaneError> {
        if pixels.len() != self.pixels.len() {
            return Err(PlaneError::ContentSize {
                expected: self.pixels.len(),
                actual: pixels.len(),
            });
        }
        self.pixels.copy_from_slice(pixels);
        self.dirty |= PlaneDirty::CONTENT;
        Ok(())
    }

    pub fn set_z_order(&mut self, z_order: i32) {
        if self.z_order != z_order {
            self.z_order = z_order;
            self.dirty |= PlaneDirty::ZORDER;
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.dirty |= PlaneDirty::ENABLED;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> PlaneId {
        self.id
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn dirty(&self) -> PlaneDirty {
        self.dirty
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.size.as_vec2())
    }

    pub fn state(&self) -> PlaneState {
        PlaneState {
            position: self.position,
            size: self.size,
            z_order: self.z_order,
            enabled: self.enabled,
        }
    }

    /// Push pending changes to the device
    pub(crate) fn flush<D: PlaneDevice + ?Sized>(&mut self, device: &mut D) -> Result<(), PlaneError> {
        if self.dirty.contains(PlaneDirty::CONTENT) {
            device.upload(self.id, &self.pixels)?;
        }
        if self
            .dirty
            .intersects(PlaneDirty::GEOMETRY | PlaneDirty::ZORDER | PlaneDirty::ENABLED)
        {
            device.update(self.id, self.state());
        }
        self.dirty = PlaneDirty::empty();
        Ok(())
    }

    pub(crate) fn release<D: PlaneDevice + ?Sized>(&mut self, device: &mut D) {
        device.release(self.id);
        self.dirty = PlaneDirty::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Framebuffer;
    use crate::plane::DeviceKind;

    #[derive(Default)]
    struct RecordingDevice {
        refuse: bool,
        claims: Vec<(PlaneId, UVec2)>,
        uploads: usize,
        updates: Vec<PlaneState>,
    }

    impl PlaneDevice for RecordingDevice {
        fn kind(&self) -> DeviceKind {
            DeviceKind::Software
        }
        fn plane_count(&self) -> usize {
            4
        }
        fn claim(&mut self, id: PlaneId, size: UVec2) -> Result<(), PlaneError> {
            if self.refuse {
                return Err(PlaneError::unavailable(id, "busy"));
            }
            self.claims.push((id, size));
            Ok(())
        }
        fn release(&mut self, _id: PlaneId) {}
        fn upload(&mut self, _id: PlaneId, _pixels: &[u8]) -> Result<(), PlaneError> {
            self.uploads += 1;
            Ok(())
        }
        fn update(&mut self, _id: PlaneId, state: PlaneState) {
            self.updates.push(state);
        }
        fn present(&mut self, _primary: &Framebuffer) -> Result<(), PlaneError> {
            Ok(())
        }
    }

    fn configured(device: &mut RecordingDevice) -> OverlayPlane {
        let mut plane = OverlayPlane::new("overlay0", PlaneId(1));
        plane
            .configure(device, UVec2::new(4, 2), IVec2::new(3, 5))
            .unwrap();
        plane
    }

    #[test]
    fn test_configure_claims_and_allocates() {
        let mut device = RecordingDevice::default();
        let plane = configured(&mut device);

        assert_eq!(device.claims, vec![(PlaneId(1), UVec2::new(4, 2))]);
        assert_eq!(plane.pixels().len(), 4 * 2 * 4);
        assert_eq!(plane.position(), IVec2::new(3, 5));
        assert_eq!(plane.dirty(), PlaneDirty::all());
    }

    #[test]
    fn test_configure_surfaces_hardware_unavailable() {
        let mut device = RecordingDevice {
            refuse: true,
            ..Default::default()
        };
        let mut plane = OverlayPlane::new("overlay0", PlaneId(0));
        let err = plane
            .configure(&mut device, UVec2::new(1, 1), IVec2::ZERO)
            .unwrap_err();
        assert!(matches!(err, PlaneError::HardwareUnavailable { .. }));
    }

    #[test]
    fn test_position_change_never_uploads() {
        let mut device = RecordingDevice::default();
        let mut plane = configured(&mut device);
        plane.flush(&mut device).unwrap();
        assert_eq!(device.uploads, 1);

        for x in 0..50 {
            plane.set_position(IVec2::new(x, 0));
            plane.flush(&mut device).unwrap();
        }
        assert_eq!(device.uploads, 1);
        assert_eq!(device.updates.last().unwrap().position, IVec2::new(49, 0));
    }

    #[test]
    fn test_same_position_is_not_dirty() {
        let mut device = RecordingDevice::default();
        let mut plane = configured(&mut device);
        plane.flush(&mut device).unwrap();

        plane.set_position(IVec2::new(3, 5));
        assert!(plane.dirty().is_empty());
    }

    #[test]
    fn test_set_content_checks_size() {
        let mut device = RecordingDevice::default();
        let mut plane = configured(&mut device);

        let err = plane.set_content(&[0; 3]).unwrap_err();
        assert!(matches!(err, PlaneError::ContentSize { expected: 32, actual: 3 }));

        plane.set_content(&[7; 32]).unwrap();
        assert!(plane.pixels().iter().all(|&b| b == 7));
        assert!(plane.dirty().contains(PlaneDirty::CONTENT));
    }

    #[test]
    fn test_metadata_setters_mark_dirty() {
        let mut device = RecordingDevice::default();
        let mut plane = configured(&mut device);
        plane.flush(&mut device).unwrap();

        plane.set_z_order(3);
        plane.set_enabled(false);
        assert_eq!(plane.dirty(), PlaneDirty::ZORDER | PlaneDirty::ENABLED);

        plane.flush(&mut device).unwrap();
        let state = *device.updates.last().unwrap();
        assert_eq!(state.z_order, 3);
        assert!(!state.enabled);
        assert_eq!(device.uploads, 1);
    }
}
