//! Export configuration (the host-facing option panel, as data).

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::render::RenderOptions;
use crate::sampler::DEFAULT_TRANSLATION_SCALE;
use crate::series::FrameRange;
use crate::Result;

/// Which cameras an export covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSelection {
    /// The scene's active camera.
    #[default]
    Active,
    /// Selected objects that are cameras.
    Selected,
    /// Every camera in the scene.
    All,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub which_cams: CameraSelection,
    /// Falls back to the scene's start frame when unset.
    pub frame_start: Option<i32>,
    /// Falls back to the scene's end frame when unset.
    pub frame_end: Option<i32>,
    /// Scene units to Deforum translation units.
    pub translation_scale: f64,
    pub output_cam_code: bool,
    pub output_json: bool,
    pub output_raw_frames: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            which_cams: CameraSelection::Active,
            frame_start: None,
            frame_end: None,
            translation_scale: DEFAULT_TRANSLATION_SCALE,
            output_cam_code: false,
            output_json: false,
            output_raw_frames: true,
        }
    }
}

impl ExportConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.translation_scale.is_finite() {
            return Err(ExportError::InvalidConfig {
                reason: format!(
                    "translation_scale must be finite, got {}",
                    self.translation_scale
                ),
            });
        }
        if let (Some(start), Some(end)) = (self.frame_start, self.frame_end) {
            if end < start {
                return Err(ExportError::InvalidFrameRange { start, end });
            }
        }
        Ok(())
    }

    /// Resolve unset bounds against the host's animation range.
    pub fn frame_range(&self, host_start: i32, host_end: i32) -> Result<FrameRange> {
        let start = self.frame_start.unwrap_or(host_start);
        let end = self.frame_end.unwrap_or(host_end);
        if end < start {
            return Err(ExportError::InvalidFrameRange { start, end });
        }
        Ok(FrameRange::new(start, end))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            cam_code: self.output_cam_code,
            json: self.output_json,
            raw_frames: self.output_raw_frames,
        }
    }
}
