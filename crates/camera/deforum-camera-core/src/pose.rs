//! World-space camera poses and the frame-to-frame deltas derived from them.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// World-space rigid transform of an object at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Build from a location and XYZ Euler angles in radians (Rz * Ry * Rx).
    pub fn from_euler_xyz(location: [f64; 3], euler: [f64; 3]) -> Self {
        Self {
            translation: Vector3::from(location),
            rotation: UnitQuaternion::from_euler_angles(euler[0], euler[1], euler[2]),
        }
    }

    /// Build from a location and a quaternion given as [x, y, z, w]. Normalizes.
    pub fn from_quaternion_xyzw(location: [f64; 3], q: [f64; 4]) -> Self {
        Self {
            translation: Vector3::from(location),
            rotation: UnitQuaternion::from_quaternion(Quaternion::new(q[3], q[0], q[1], q[2])),
        }
    }

    /// Rotation taking world-space vectors into this pose's local axes.
    #[inline]
    pub fn world_to_local(&self) -> UnitQuaternion<f64> {
        self.rotation.inverse()
    }
}

/// Per-transition camera motion in the downstream consumer's convention.
///
/// Translation is expressed in the *destination* pose's local axes and scaled; z is negated.
/// Rotation is the XYZ Euler decomposition (degrees) of `old⁻¹ · new` with y and z negated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaSample {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl DeltaSample {
    pub fn between(old: &Pose, new: &Pose, translation_scale: f64) -> Self {
        let pos_diff = new.translation - old.translation;
        let local = new.world_to_local() * pos_diff;

        let rot_diff = old.rotation.inverse() * new.rotation;
        let (rx, ry, rz) = euler_xyz(&rot_diff);

        Self {
            tx: translation_scale * local.x,
            ty: translation_scale * local.y,
            tz: -translation_scale * local.z,
            rx: rx.to_degrees(),
            ry: -ry.to_degrees(),
            rz: -rz.to_degrees(),
        }
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 6] {
        [self.tx, self.ty, self.tz, self.rx, self.ry, self.rz]
    }
}

/// XYZ Euler angles (radians) of `q`, choosing the smaller of the two equivalent solutions.
///
/// Away from gimbal lock every rotation has a second decomposition `(x ± π, π - y, z ± π)`.
/// The one with the smaller absolute sum wins; ties keep the principal solution.
fn euler_xyz(q: &UnitQuaternion<f64>) -> (f64, f64, f64) {
    let rot = q.to_rotation_matrix();
    let m = rot.matrix();
    let cy = m[(0, 0)].hypot(m[(1, 0)]);

    if cy <= 16.0 * f64::EPSILON {
        return ((-m[(1, 2)]).atan2(m[(1, 1)]), (-m[(2, 0)]).atan2(cy), 0.0);
    }

    let principal = (
        m[(2, 1)].atan2(m[(2, 2)]),
        (-m[(2, 0)]).atan2(cy),
        m[(1, 0)].atan2(m[(0, 0)]),
    );
    let flipped = (
        (-m[(2, 1)]).atan2(-m[(2, 2)]),
        (-m[(2, 0)]).atan2(-cy),
        (-m[(1, 0)]).atan2(-m[(0, 0)]),
    );
    let weight = |(x, y, z): (f64, f64, f64)| x.abs() + y.abs() + z.abs();
    if weight(principal) > weight(flipped) {
        flipped
    } else {
        principal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn still_camera_has_zero_delta() {
        let pose = Pose::from_euler_xyz([1.0, 2.0, 3.0], [0.3, -0.2, 0.9]);
        let d = DeltaSample::between(&pose, &pose, 50.0);
        for v in d.as_array() {
            assert_relative_eq!(v, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn translation_uses_destination_local_axes() {
        // Destination is yawed 90° about Z: world +X maps to local -Y.
        let old = Pose::identity();
        let new = Pose::from_euler_xyz([1.0, 0.0, 0.0], [0.0, 0.0, FRAC_PI_2]);
        let d = DeltaSample::between(&old, &new, 10.0);
        assert_relative_eq!(d.tx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.ty, -10.0, epsilon = 1e-9);
        assert_relative_eq!(d.tz, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.rz, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn large_pitch_prefers_smaller_euler_solution() {
        let turn = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 120f64.to_radians());
        let d = DeltaSample::between(&Pose::identity(), &Pose::new(Vector3::zeros(), turn), 1.0);
        assert_relative_eq!(d.rx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.ry, -120.0, epsilon = 1e-9);
        assert_relative_eq!(d.rz, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn gimbal_lock_puts_rotation_on_x() {
        let turn = UnitQuaternion::from_euler_angles(0.3, FRAC_PI_2, 0.0);
        let (x, y, z) = euler_xyz(&turn);
        assert_relative_eq!(x, 0.3, epsilon = 1e-6);
        assert_relative_eq!(y, FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn quaternion_constructor_matches_euler() {
        let half = (0.25f64).sin();
        let a = Pose::from_quaternion_xyzw([0.0; 3], [half, 0.0, 0.0, (0.25f64).cos()]);
        let b = Pose::from_euler_xyz([0.0; 3], [0.5, 0.0, 0.0]);
        assert_relative_eq!(a.rotation.angle_to(&b.rotation), 0.0, epsilon = 1e-12);
    }
}
