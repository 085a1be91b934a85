//! Deforum Camera Core (host-agnostic)
//!
//! Turns per-frame world-space camera poses into frame-to-frame local deltas and encodes the
//! resulting series as Deforum keyframe strings (`0:(1.5),12:(0),`), a combined `cam_code`
//! tuple, JSON, or a raw per-change dump.
//!
//! Hosts plug in through `PoseSource` (random access) or `Timeline` (frame cursor). A JSON
//! `Scene` implementation of both is included for file-driven exports.

pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod pose;
pub mod render;
pub mod sampler;
pub mod scene;
pub mod series;
pub mod source;

// Re-exports for hosts
pub use codec::{decode_keyframes, encode_keyframes, encode_raw_frames, reconstruct_step, Keyframe};
pub use config::{CameraSelection, ExportConfig};
pub use error::ExportError;
pub use export::{
    cameras_to_string, cameras_to_string_scrubbed, export_to_path, write_camera_data,
    write_export, ExportRequest, NOTHING_SELECTED,
};
pub use pose::{DeltaSample, Pose};
pub use render::{render, RenderOptions};
pub use sampler::{sample_camera, sample_cameras, DEFAULT_TRANSLATION_SCALE};
pub use scene::{ObjectKind, PoseKey, Rotation, Scene, SceneObject};
pub use series::{Axis, CameraSeries, FrameRange};
pub use source::{PoseSource, Timeline, TimelineCursor};

/// Result type for camera export operations
pub type Result<T> = core::result::Result<T, ExportError>;
