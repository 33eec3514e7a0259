use glam::{IVec2, UVec2};

use super::error::PlaneError;
use super::PlaneId;
use crate::core::Framebuffer;

/// Which compositing path a device implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Planes are scanned out / composited by the display hardware
    Hardware,
    /// Planes are blitted into one framebuffer on the CPU
    Software,
}

/// Geometry and visibility of a plane, without its pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneState {
    pub position: IVec2,
    pub size: UVec2,
    pub z_order: i32,
    pub enabled: bool,
}

/// Backend owning the physical planes
///
/// Geometry changes (`update`) are cheap metadata writes; `upload` replaces a
/// plane's whole buffer and is the expensive path.
pub trait PlaneDevice {
    fn kind(&self) -> DeviceKind;

    /// Number of physical planes this device exposes
    fn plane_count(&self) -> usize;

    /// Reserve a physical plane and allocate a `size` buffer for it
    fn claim(&mut self, id: PlaneId, size: UVec2) -> Result<(), PlaneError>;

    /// Give a claimed plane back; unknown ids are ignored
    fn release(&mut self, id: PlaneId);

    /// Replace a claimed plane's RGBA pixels
    fn upload(&mut self, id: PlaneId, pixels: &[u8]) -> Result<(), PlaneError>;

    /// Apply new geometry, z-order and visibility to a claimed plane
    fn update(&mut self, id: PlaneId, state: PlaneState);

    /// Show `primary` with every enabled plane composited above it
    fn present(&mut self, primary: &Framebuffer) -> Result<(), PlaneError>;

    /// The output window changed size
    fn resize(&mut self, _width: u32, _height: u32) {}
}

macro_rules! forward_plane_device {
    ($($ty:ty),*) => {$(
        impl<D: PlaneDevice + ?Sized> PlaneDevice for $ty {
            fn kind(&self) -> DeviceKind {
                (**self).kind()
            }

            fn plane_count(&self) -> usize {
                (**self).plane_count()
            }

            fn claim(&mut self, id: PlaneId, size: UVec2) -> Result<(), PlaneError> {
                (**self).claim(id, size)
            }

            fn release(&mut self, id: PlaneId) {
                (**self).release(id)
            }

            fn upload(&mut self, id: PlaneId, pixels: &[u8]) -> Result<(), PlaneError> {
                (**self).upload(id, pixels)
            }

            fn update(&mut self, id: PlaneId, state: PlaneState) {
                (**self).update(id, state)
            }

            fn present(&mut self, primary: &Framebuffer) -> Result<(), PlaneError> {
                (**self).present(primary)
            }

            fn resize(&mut self, width: u32, height: u32) {
                (**self).resize(width, height)
            }
        }
    )*};
}

forward_plane_device!(Box<D>, &mut D);
