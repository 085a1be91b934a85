//! JSON scene description usable as a pose source.
//!
//! Model:
//! - A scene has an animation range, an optional active camera, a selection, and objects.
//! - Each object carries pose keys at integer frames (sorted on load).
//! - Between keys, location is linear and rotation is shortest-arc slerp; outside the keyed
//!   range the nearest key is held.
//!
//! `Scene` is both a random-access `PoseSource` and a cursor-based `Timeline`.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::warn;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::CameraSelection;
use crate::error::ExportError;
use crate::pose::Pose;
use crate::source::{PoseSource, Timeline};
use crate::Result;

const SLERP_EPSILON: f64 = 1e-9;

fn default_frame_start() -> i32 {
    1
}

fn default_frame_end() -> i32 {
    250
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Camera,
    Other,
}

/// Orientation of a pose key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rotation {
    /// XYZ Euler angles in radians.
    Euler([f64; 3]),
    /// Quaternion as [x, y, z, w].
    Quaternion([f64; 4]),
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Euler([0.0; 3])
    }
}

impl Rotation {
    pub fn to_unit_quaternion(self) -> UnitQuaternion<f64> {
        match self {
            Rotation::Euler([x, y, z]) => UnitQuaternion::from_euler_angles(x, y, z),
            Rotation::Quaternion([x, y, z, w]) => {
                UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
            }
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Rotation::Euler(v) => v.iter().all(|c| c.is_finite()),
            Rotation::Quaternion(v) => {
                v.iter().all(|c| c.is_finite()) && v.iter().any(|c| *c != 0.0)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseKey {
    pub frame: i32,
    pub location: [f64; 3],
    #[serde(default)]
    pub rotation: Rotation,
}

impl PoseKey {
    pub fn pose(&self) -> Pose {
        Pose::new(Vector3::from(self.location), self.rotation.to_unit_quaternion())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub kind: ObjectKind,
    pub keys: Vec<PoseKey>,
}

/// Entry of the keyframe JSON layout: `{ "<frame>": { "location": [..], "rotation": [..] } }`.
#[derive(Debug, Deserialize)]
struct ImportKey {
    location: [f64; 3],
    #[serde(default)]
    rotation: Rotation,
}

impl SceneObject {
    pub fn camera(name: impl Into<String>, keys: Vec<PoseKey>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Camera,
            keys,
        }
    }

    /// Build a camera from keyframe JSON keyed by frame number.
    pub fn from_keyframe_json(name: impl Into<String>, s: &str) -> Result<Self> {
        let raw: BTreeMap<String, ImportKey> = serde_json::from_str(s)?;
        let mut keys = Vec::with_capacity(raw.len());
        for (frame, key) in raw {
            let frame = frame
                .trim()
                .parse::<i32>()
                .map_err(|e| ExportError::InvalidScene {
                    reason: format!("keyframe '{frame}' is not an integer frame: {e}"),
                })?;
            keys.push(PoseKey {
                frame,
                location: key.location,
                rotation: key.rotation,
            });
        }
        keys.sort_by_key(|k| k.frame);
        let obj = Self::camera(name, keys);
        obj.validate()?;
        Ok(obj)
    }

    fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(ExportError::InvalidScene {
                reason: format!("object '{}' has no pose keys", self.name),
            });
        }
        for pair in self.keys.windows(2) {
            if pair[0].frame == pair[1].frame {
                return Err(ExportError::InvalidScene {
                    reason: format!(
                        "object '{}' has two keys at frame {}",
                        self.name, pair[0].frame
                    ),
                });
            }
        }
        if let Some(k) = self
            .keys
            .iter()
            .find(|k| !k.location.iter().all(|c| c.is_finite()) || !k.rotation.is_finite())
        {
            return Err(ExportError::InvalidScene {
                reason: format!(
                    "object '{}' has a non-finite key at frame {}",
                    self.name, k.frame
                ),
            });
        }
        Ok(())
    }

    /// Evaluate the world pose at `frame`. Keys must be sorted and non-empty.
    pub fn pose_at(&self, frame: i32) -> Pose {
        let keys = &self.keys;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Pose::identity(),
        };
        if frame <= first.frame {
            return first.pose();
        }
        if frame >= last.frame {
            return last.pose();
        }
        let hi = keys.partition_point(|k| k.frame <= frame);
        let (a, b) = (&keys[hi - 1], &keys[hi]);
        if a.frame == frame {
            return a.pose();
        }
        let t = (frame - a.frame) as f64 / (b.frame - a.frame) as f64;
        let (pa, pb) = (a.pose(), b.pose());
        let translation = pa.translation.lerp(&pb.translation, t);
        let rotation = pa
            .rotation
            .try_slerp(&pb.rotation, t, SLERP_EPSILON)
            .unwrap_or_else(|| pa.rotation.nlerp(&pb.rotation, t));
        Pose::new(translation, rotation)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "default_frame_start")]
    pub frame_start: i32,
    #[serde(default = "default_frame_end")]
    pub frame_end: i32,
    /// Timeline cursor; reads as `frame_start` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_frame: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_camera: Option<String>,
    #[serde(default)]
    pub selected: Vec<String>,
    pub objects: Vec<SceneObject>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Scene {
    pub fn new(frame_start: i32, frame_end: i32, objects: Vec<SceneObject>) -> Result<Self> {
        let mut scene = Self {
            frame_start,
            frame_end,
            current_frame: None,
            active_camera: None,
            selected: Vec::new(),
            objects,
            index: HashMap::new(),
        };
        scene.prepare()?;
        Ok(scene)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let mut scene: Self = serde_json::from_str(s)?;
        scene.prepare()?;
        Ok(scene)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sort keys, validate objects, and rebuild the name index.
    fn prepare(&mut self) -> Result<()> {
        self.index.clear();
        for (i, obj) in self.objects.iter_mut().enumerate() {
            obj.keys.sort_by_key(|k| k.frame);
            obj.validate()?;
            if self.index.insert(obj.name.clone(), i).is_some() {
                return Err(ExportError::InvalidScene {
                    reason: format!("duplicate object name '{}'", obj.name),
                });
            }
        }
        Ok(())
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.index.get(name).map(|&i| &self.objects[i])
    }

    fn is_camera(&self, name: &str) -> bool {
        self.object(name)
            .map_or(false, |o| o.kind == ObjectKind::Camera)
    }

    /// Names of the cameras covered by `selection`, in scene order for `All` and
    /// selection order for `Selected`. An unset active camera yields an empty list.
    pub fn resolve_cameras(&self, selection: CameraSelection) -> Result<Vec<String>> {
        match selection {
            CameraSelection::Active => match &self.active_camera {
                None => Ok(Vec::new()),
                Some(name) if self.is_camera(name) => Ok(vec![name.clone()]),
                Some(name) => Err(ExportError::CameraNotFound { name: name.clone() }),
            },
            CameraSelection::Selected => Ok(self
                .selected
                .iter()
                .filter(|n| self.is_camera(n))
                .cloned()
                .collect()),
            CameraSelection::All => Ok(self
                .objects
                .iter()
                .filter(|o| o.kind == ObjectKind::Camera)
                .map(|o| o.name.clone())
                .collect()),
        }
    }

    pub fn pose_of(&self, name: &str, frame: i32) -> Pose {
        match self.object(name) {
            Some(obj) => obj.pose_at(frame),
            None => {
                warn!("scene has no object '{}', using identity pose", name);
                Pose::identity()
            }
        }
    }
}

impl PoseSource for Scene {
    fn world_pose(&mut self, camera: &str, frame: i32) -> Pose {
        self.pose_of(camera, frame)
    }
}

impl Timeline for Scene {
    fn current_frame(&self) -> i32 {
        self.current_frame.unwrap_or(self.frame_start)
    }

    fn set_current_frame(&mut self, frame: i32) {
        self.current_frame = Some(frame);
    }

    fn world_pose_current(&self, camera: &str) -> Pose {
        self.pose_of(camera, self.current_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn key(frame: i32, x: f64, yaw: f64) -> PoseKey {
        PoseKey {
            frame,
            location: [x, 0.0, 0.0],
            rotation: Rotation::Euler([0.0, 0.0, yaw]),
        }
    }

    #[test]
    fn interpolates_between_keys_and_holds_outside() {
        let obj = SceneObject::camera("cam", vec![key(10, 0.0, 0.0), key(20, 10.0, 1.0)]);
        assert_relative_eq!(obj.pose_at(0).translation.x, 0.0);
        assert_relative_eq!(obj.pose_at(15).translation.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(obj.pose_at(15).rotation.euler_angles().2, 0.5, epsilon = 1e-12);
        assert_relative_eq!(obj.pose_at(99).translation.x, 10.0);
    }

    #[test]
    fn rotation_shapes_deserialize() {
        let e: Rotation = serde_json::from_str("[0.1, 0.2, 0.3]").unwrap();
        assert!(matches!(e, Rotation::Euler(_)));
        let q: Rotation = serde_json::from_str("[0, 0, 0, 1]").unwrap();
        assert!(matches!(q, Rotation::Quaternion(_)));
    }

    #[test]
    fn duplicate_names_rejected() {
        let objs = vec![
            SceneObject::camera("a", vec![key(1, 0.0, 0.0)]),
            SceneObject::camera("a", vec![key(1, 0.0, 0.0)]),
        ];
        assert!(matches!(
            Scene::new(1, 10, objs),
            Err(ExportError::InvalidScene { .. })
        ));
    }

    #[test]
    fn keyless_object_rejected() {
        let objs = vec![SceneObject::camera("a", vec![])];
        assert!(Scene::new(1, 10, objs).is_err());
    }

    #[test]
    fn zero_quaternion_rejected() {
        let objs = vec![SceneObject::camera(
            "a",
            vec![PoseKey {
                frame: 1,
                location: [0.0; 3],
                rotation: Rotation::Quaternion([0.0; 4]),
            }],
        )];
        assert!(Scene::new(1, 10, objs).is_err());
    }
}
