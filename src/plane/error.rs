use std::path::PathBuf;

use thiserror::Error;

use super::PlaneId;

#[derive(Debug, Error)]
pub enum PlaneError {
    /// The physical plane could not be claimed: out of range, already in use,
    /// too large for the device, or no device at all
    #[error("plane {id} unavailable: {reason}")]
    HardwareUnavailable { id: PlaneId, reason: String },

    /// Unknown logical name, or no screen configuration loaded yet
    #[error("no plane named {0:?}")]
    NotFound(String),

    #[error("planes are already loaded")]
    AlreadyLoaded,

    #[error("invalid screen configuration: {0}")]
    InvalidConfig(String),

    #[error("content is {actual} bytes, plane expects {expected}")]
    ContentSize { expected: usize, actual: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed screen configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("present failed: {0}")]
    Present(String),
}

impl PlaneError {
    pub fn unavailable(id: PlaneId, reason: impl Into<String>) -> Self {
        PlaneError::HardwareUnavailable {
            id,
            reason: reason.into(),
        }
    }
}
