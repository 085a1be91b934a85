//! Named per-axis series produced by the sampler.

use serde::{Deserialize, Serialize};

use crate::pose::DeltaSample;

/// The six output channels, in emission order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    TranslationX,
    TranslationY,
    TranslationZ,
    #[serde(rename = "rotation_3d_x")]
    Rotation3dX,
    #[serde(rename = "rotation_3d_y")]
    Rotation3dY,
    #[serde(rename = "rotation_3d_z")]
    Rotation3dZ,
}

impl Axis {
    pub const ALL: [Axis; 6] = [
        Axis::TranslationX,
        Axis::TranslationY,
        Axis::TranslationZ,
        Axis::Rotation3dX,
        Axis::Rotation3dY,
        Axis::Rotation3dZ,
    ];

    /// Variable name used by the consuming notebook.
    pub fn name(self) -> &'static str {
        match self {
            Axis::TranslationX => "translation_x",
            Axis::TranslationY => "translation_y",
            Axis::TranslationZ => "translation_z",
            Axis::Rotation3dX => "rotation_3d_x",
            Axis::Rotation3dY => "rotation_3d_y",
            Axis::Rotation3dZ => "rotation_3d_z",
        }
    }
}

/// Half-open frame window `[start, end)` as the host reports it.
///
/// The first frame is the reference pose; one sample is produced per frame in
/// `start + 1 .. end`, so a window yields `end - start - 1` samples.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl FrameRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Number of frame transitions sampled.
    #[inline]
    pub fn transitions(&self) -> usize {
        (self.end as i64 - self.start as i64 - 1).max(0) as usize
    }

    /// Frames visited after the reference frame.
    pub fn sample_frames(&self) -> impl Iterator<Item = i32> {
        (self.start.saturating_add(1))..self.end
    }
}

/// Six delta series for one camera. Field order is the JSON key order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSeries {
    #[serde(skip)]
    pub camera: String,
    pub translation_x: Vec<f64>,
    pub translation_y: Vec<f64>,
    pub translation_z: Vec<f64>,
    pub rotation_3d_x: Vec<f64>,
    pub rotation_3d_y: Vec<f64>,
    pub rotation_3d_z: Vec<f64>,
}

impl CameraSeries {
    pub fn with_capacity(camera: impl Into<String>, capacity: usize) -> Self {
        Self {
            camera: camera.into(),
            translation_x: Vec::with_capacity(capacity),
            translation_y: Vec::with_capacity(capacity),
            translation_z: Vec::with_capacity(capacity),
            rotation_3d_x: Vec::with_capacity(capacity),
            rotation_3d_y: Vec::with_capacity(capacity),
            rotation_3d_z: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, d: &DeltaSample) {
        self.translation_x.push(d.tx);
        self.translation_y.push(d.ty);
        self.translation_z.push(d.tz);
        self.rotation_3d_x.push(d.rx);
        self.rotation_3d_y.push(d.ry);
        self.rotation_3d_z.push(d.rz);
    }

    pub fn len(&self) -> usize {
        self.translation_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translation_x.is_empty()
    }

    pub fn axis(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::TranslationX => &self.translation_x,
            Axis::TranslationY => &self.translation_y,
            Axis::TranslationZ => &self.translation_z,
            Axis::Rotation3dX => &self.rotation_3d_x,
            Axis::Rotation3dY => &self.rotation_3d_y,
            Axis::Rotation3dZ => &self.rotation_3d_z,
        }
    }

    /// Iterate `(axis, values)` in emission order.
    pub fn axes(&self) -> impl Iterator<Item = (Axis, &[f64])> + '_ {
        Axis::ALL.into_iter().map(move |a| (a, self.axis(a)))
    }
}
