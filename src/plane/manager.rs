use std::collections::HashMap;
use std::path::Path;

use super::config::ScreenConfig;
use super::device::{DeviceKind, PlaneDevice};
use super::error::PlaneError;
use super::overlay::OverlayPlane;
use super::PlaneHandle;
use crate::core::Framebuffer;

/// Registry of the overlay planes declared by the screen configuration
///
/// The manager is the only owner of the planes and of the device behind
/// them. After a successful load the set of names is fixed; everything else
/// addresses planes through [`PlaneHandle`]s it hands out.
pub struct PlaneManager<D: PlaneDevice = Box<dyn PlaneDevice>> {
    device: D,
    planes: Vec<OverlayPlane>,
    by_name: HashMap<String, usize>,
    loaded: bool,
}

impl<D: PlaneDevice> PlaneManager<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            planes: Vec::new(),
            by_name: HashMap::new(),
            loaded: false,
        }
    }

    /// Load the screen configuration at `path` and claim every plane in it.
    ///
    /// Returns false on any failure, leaving the manager unloaded and every
    /// plane released, so the caller can fall back to another device.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match ScreenConfig::load(path).and_then(|config| self.try_load_config(&config)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to set up planes from {}: {}", path.display(), e);
                false
            }
        }
    }

    /// As [`PlaneManager::load`], from an already parsed configuration
    pub fn load_config(&mut self, config: &ScreenConfig) -> bool {
        match self.try_load_config(config) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to set up planes: {}", e);
                false
            }
        }
    }

    /// Claim and configure every declared plane, all or nothing
    pub fn try_load_config(&mut self, config: &ScreenConfig) -> Result<(), PlaneError> {
        if self.loaded {
            return Err(PlaneError::AlreadyLoaded);
        }
        config.validate()?;

        let mut planes: Vec<OverlayPlane> = Vec::with_capacity(config.planes.len());
        for entry in &config.planes {
            let mut plane = OverlayPlane::new(entry.name.clone(), entry.id());
            if let Err(e) = plane.configure(&mut self.device, entry.size(), entry.position()) {
                for claimed in &mut planes {
                    claimed.release(&mut self.device);
                }
                return Err(e);
            }
            plane.set_z_order(entry.zpos);
            plane.set_enabled(entry.enabled);
            log::info!(
                "plane {:?} -> {} ({}x{} at {},{} z={})",
                entry.name,
                entry.id(),
                entry.width,
                entry.height,
                entry.x,
                entry.y,
                entry.zpos
            );
            planes.push(plane);
        }

        self.by_name = planes
            .iter()
            .enumerate()
            .map(|(slot, plane)| (plane.name().to_owned(), slot))
            .collect();
        self.planes = planes;
        self.loaded = true;
        log::info!(
            "{} planes loaded on {:?} device ({} available)",
            self.planes.len(),
            self.device.kind(),
            self.device.plane_count()
        );
        Ok(())
    }

    /// Look up a plane by logical name
    pub fn get(&self, name: &str) -> Result<&OverlayPlane, PlaneError> {
        let handle = self.handle(name)?;
        Ok(&self.planes[handle.slot()])
    }

    /// Capability handle for a loaded plane. Nothing is found before a load
    /// has succeeded.
    pub fn handle(&self, name: &str) -> Result<PlaneHandle, PlaneError> {
        if !self.loaded {
            return Err(PlaneError::NotFound(name.to_owned()));
        }
        self.by_name
            .get(name)
            .map(|&slot| PlaneHandle::new(slot))
            .ok_or_else(|| PlaneError::NotFound(name.to_owned()))
    }

    pub fn plane(&self, handle: PlaneHandle) -> &OverlayPlane {
        &self.planes[handle.slot()]
    }

    pub fn plane_mut(&mut self, handle: PlaneHandle) -> &mut OverlayPlane {
        &mut self.planes[handle.slot()]
    }

    /// Push pending plane changes to the device and show a frame
    pub fn commit(&mut self, primary: &Framebuffer) -> Result<(), PlaneError> {
        for plane in &mut self.planes {
            plane.flush(&mut self.device)?;
        }
        self.device.present(primary)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.device.resize(width, height);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of loaded planes
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Physical planes the device offers
    pub fn plane_count(&self) -> usize {
        self.device.plane_count()
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.device.kind()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.planes.iter().map(|plane| plane.name())
    }
}

impl<D: PlaneDevice> Drop for PlaneManager<D> {
    fn drop(&mut self) {
        for plane in &mut self.planes {
            plane.release(&mut self.device);
        }
    }
}
