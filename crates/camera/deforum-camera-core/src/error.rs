//! Error types for camera export

use serde::{Deserialize, Serialize};

/// Error type for sampling, encoding and export operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExportError {
    /// Camera name did not resolve to an object in the scene
    #[error("Camera not found: {name}")]
    CameraNotFound { name: String },

    /// Frame range is unusable for sampling
    #[error("Invalid frame range: {start} - {end}")]
    InvalidFrameRange { start: i32, end: i32 },

    /// Export configuration rejected
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Scene description rejected
    #[error("Invalid scene: {reason}")]
    InvalidScene { reason: String },

    /// Keyframe string could not be decoded
    #[error("Invalid keyframes at entry {entry}: {reason}")]
    InvalidKeyframes { entry: usize, reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// IO error
    #[error("IO error: {reason}")]
    IoError { reason: String },
}

impl ExportError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::CameraNotFound { .. } | Self::InvalidScene { .. } => "scene",
            Self::InvalidFrameRange { .. } | Self::InvalidConfig { .. } => "config",
            Self::InvalidKeyframes { .. } => "codec",
            Self::SerializationError { .. } => "serialization",
            Self::IoError { .. } => "io",
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
