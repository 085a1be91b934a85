//! Pose providers consumed by the sampler.
//!
//! Two host shapes are supported:
//! - `PoseSource`: random access, `world_pose(camera, frame)`. Preferred.
//! - `Timeline`: a shared "current frame" cursor plus a read of the pose at that cursor.
//!   `TimelineCursor` adapts it to `PoseSource` and puts the cursor back when dropped.

use crate::pose::Pose;

/// Random-access pose provider.
///
/// Takes `&mut self` so cursor-backed hosts can be adapted; pure sources ignore it.
/// Implementations are trusted to resolve every (camera, frame) the sampler asks for.
pub trait PoseSource {
    fn world_pose(&mut self, camera: &str, frame: i32) -> Pose;
}

/// Host timeline with a single mutable frame cursor.
pub trait Timeline {
    fn current_frame(&self) -> i32;
    fn set_current_frame(&mut self, frame: i32);
    /// Pose of `camera` at the current cursor position.
    fn world_pose_current(&self, camera: &str) -> Pose;
}

/// Borrows a `Timeline` as a `PoseSource`, restoring the original cursor on drop.
pub struct TimelineCursor<'a, T: Timeline + ?Sized> {
    timeline: &'a mut T,
    original_frame: i32,
}

impl<'a, T: Timeline + ?Sized> TimelineCursor<'a, T> {
    pub fn new(timeline: &'a mut T) -> Self {
        let original_frame = timeline.current_frame();
        Self {
            timeline,
            original_frame,
        }
    }

    #[inline]
    pub fn original_frame(&self) -> i32 {
        self.original_frame
    }
}

impl<T: Timeline + ?Sized> PoseSource for TimelineCursor<'_, T> {
    fn world_pose(&mut self, camera: &str, frame: i32) -> Pose {
        if self.timeline.current_frame() != frame {
            self.timeline.set_current_frame(frame);
        }
        self.timeline.world_pose_current(camera)
    }
}

impl<T: Timeline + ?Sized> Drop for TimelineCursor<'_, T> {
    fn drop(&mut self) {
        self.timeline.set_current_frame(self.original_frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    struct Counter {
        frame: i32,
        moves: usize,
    }

    impl Timeline for Counter {
        fn current_frame(&self) -> i32 {
            self.frame
        }
        fn set_current_frame(&mut self, frame: i32) {
            self.frame = frame;
            self.moves += 1;
        }
        fn world_pose_current(&self, _camera: &str) -> Pose {
            Pose::from_translation(Vector3::new(self.frame as f64, 0.0, 0.0))
        }
    }

    #[test]
    fn cursor_reads_requested_frame_and_restores() {
        let mut tl = Counter { frame: 7, moves: 0 };
        {
            let mut cursor = TimelineCursor::new(&mut tl);
            assert_eq!(cursor.original_frame(), 7);
            assert_eq!(cursor.world_pose("cam", 3).translation.x, 3.0);
            assert_eq!(cursor.world_pose("cam", 4).translation.x, 4.0);
        }
        assert_eq!(tl.frame, 7);
        assert_eq!(tl.moves, 3);
    }
}
