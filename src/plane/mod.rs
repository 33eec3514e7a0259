//! Overlay planes: a fixed set of independently positioned surfaces that the
//! display composites on top of the primary framebuffer.

pub mod config;
pub mod device;
pub mod error;
pub mod gpu;
pub mod manager;
pub mod overlay;
pub mod software;

use std::fmt;

pub use config::{PlaneConfig, ScreenConfig};
pub use device::{DeviceKind, PlaneDevice, PlaneState};
pub use error::PlaneError;
pub use gpu::GpuPlaneDevice;
pub use manager::PlaneManager;
pub use overlay::{OverlayPlane, PlaneDirty};
pub use software::{FramePresenter, SoftwarePlaneDevice};

/// Physical plane identifier on the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub u32);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability to address one plane of a [`PlaneManager`]
///
/// Only the manager hands these out, and only for names it loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneHandle(usize);

impl PlaneHandle {
    pub(crate) fn new(slot: usize) -> Self {
        Self(slot)
    }

    pub(crate) fn slot(self) -> usize {
        self.0
    }
}
