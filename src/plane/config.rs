//! Screen configuration: which logical overlay names map to which physical
//! planes, with their size and initial geometry.
//!
//! ```json
//! { "planes": [ { "name": "overlay0", "index": 0, "width": 800, "height": 480, "zpos": 1 } ] }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glam::{IVec2, UVec2};
use serde::Deserialize;

use super::error::PlaneError;
use super::PlaneId;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenConfig {
    pub planes: Vec<PlaneConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaneConfig {
    pub name: String,
    /// Physical plane index on the display controller
    pub index: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub zpos: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PlaneConfig {
    pub fn id(&self) -> PlaneId {
        PlaneId(self.index)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

impl ScreenConfig {
    /// Read and validate a screen configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlaneError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PlaneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse and validate a screen configuration
    pub fn parse(text: &str) -> Result<Self, PlaneError> {
        let config: ScreenConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlaneError> {
        if self.planes.is_empty() {
            return Err(PlaneError::InvalidConfig("no planes declared".into()));
        }

        let mut names = HashSet::new();
        let mut indices = HashSet::new();
        for plane in &self.planes {
            if plane.name.is_empty() {
                return Err(PlaneError::InvalidConfig("plane with empty name".into()));
            }
            if !names.insert(plane.name.as_str()) {
                return Err(PlaneError::InvalidConfig(format!(
                    "plane name {:?} declared twice",
                    plane.name
                )));
            }
            if !indices.insert(plane.index) {
                return Err(PlaneError::InvalidConfig(format!(
                    "plane index {} declared twice",
                    plane.index
                )));
            }
            if plane.width == 0 || plane.height == 0 {
                return Err(PlaneError::InvalidConfig(format!(
                    "plane {:?} has zero size",
                    plane.name
                )));
            }
        }
        Ok(())
    }
}
