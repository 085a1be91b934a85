//! Transform sampler: walks a frame range and turns consecutive poses into delta series.

use log::debug;

use crate::pose::DeltaSample;
use crate::series::{CameraSeries, FrameRange};
use crate::source::PoseSource;

/// Default conversion factor between scene units and Deforum translation units.
pub const DEFAULT_TRANSLATION_SCALE: f64 = 50.0;

/// Sample one camera over `range`.
///
/// The pose at `range.start` is the reference; each later frame is compared against the
/// frame before it (not against the reference), so the result is frame-to-frame motion.
pub fn sample_camera<S: PoseSource + ?Sized>(
    source: &mut S,
    camera: &str,
    range: FrameRange,
    translation_scale: f64,
) -> CameraSeries {
    let mut series = CameraSeries::with_capacity(camera, range.transitions());
    let mut old = source.world_pose(camera, range.start);
    for frame in range.sample_frames() {
        let new = source.world_pose(camera, frame);
        series.push(&DeltaSample::between(&old, &new, translation_scale));
        old = new;
    }
    debug!(
        "sampled '{}' over {} - {} ({} transitions)",
        camera,
        range.start,
        range.end,
        series.len()
    );
    series
}

/// Sample every camera independently, preserving caller order.
pub fn sample_cameras<S, C>(
    source: &mut S,
    cameras: &[C],
    range: FrameRange,
    translation_scale: f64,
) -> Vec<CameraSeries>
where
    S: PoseSource + ?Sized,
    C: AsRef<str>,
{
    cameras
        .iter()
        .map(|c| sample_camera(&mut *source, c.as_ref(), range, translation_scale))
        .collect()
}
