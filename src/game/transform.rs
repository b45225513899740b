//! Transform Components
//!
//! Two-tier transform system:
//! - Transform: Local position/rotation/scale (relative to parent)
//! - GlobalTransform: Composed world-space matrix
//!
//! Level nodes are composed once at load time
//! (GlobalTransform = parent.GlobalTransform * self.Transform); nothing
//! walks the hierarchy per frame.

use serde::{Serialize, Deserialize};
use crate::math::{Vec3, Mat4, mat4_identity, mat4_mul, mat4_from_trs, mat4_transform_point};
use super::bounds::Aabb;

/// Local transform relative to parent (or world if no parent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Position relative to parent
    pub position: Vec3,
    /// Rotation in euler angles (degrees)
    pub rotation: Vec3,
    /// Scale factor (uniform for simplicity)
    pub scale: f32,
}

impl Transform {
    /// Identity transform (origin, no rotation, scale 1)
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    /// Create transform at a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Convert to a 4x4 transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        mat4_from_trs(self.position, self.rotation, self.scale)
    }

    /// Heading around the Y axis, radians
    pub fn yaw(&self) -> f32 {
        self.rotation.y.to_radians()
    }

    /// Turn to face `target` without pitching or banking.
    ///
    /// Leaves the heading untouched when the target is directly above or
    /// below (no horizontal direction to face).
    pub fn look_toward(&mut self, target: Vec3) {
        if let Some(yaw) = yaw_toward(self.position, target) {
            self.rotation = Vec3::new(0.0, yaw.to_degrees(), 0.0);
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Heading (radians around +Y, zero facing +Z) from `from` toward `to`
pub fn yaw_toward(from: Vec3, to: Vec3) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx == 0.0 && dz == 0.0 {
        return None;
    }
    Some(dx.atan2(dz))
}

/// World-space transform, computed from hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform {
    /// The full 4x4 world transformation matrix
    matrix: Mat4,
}

impl GlobalTransform {
    pub fn identity() -> Self {
        Self { matrix: mat4_identity() }
    }

    /// Create from a local transform (for root nodes)
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            matrix: transform.to_matrix(),
        }
    }

    /// Compute child's global transform from parent's global and child's local
    pub fn from_parent_and_local(parent: &GlobalTransform, local: &Transform) -> Self {
        Self {
            matrix: mat4_mul(&parent.matrix, &local.to_matrix()),
        }
    }

    /// Get the world position (translation component)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.matrix[0][3], self.matrix[1][3], self.matrix[2][3])
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        mat4_transform_point(&self.matrix, point)
    }

    /// World-space bounds of a local-space box
    pub fn transform_aabb(&self, local: &Aabb) -> Aabb {
        local.transformed(&self.matrix)
    }
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_transform_position() {
        let gt = GlobalTransform::from_transform(&Transform::from_position(Vec3::new(5.0, 10.0, 15.0)));
        let pos = gt.position();

        assert!((pos.x - 5.0).abs() < 0.001);
        assert!((pos.y - 10.0).abs() < 0.001);
        assert!((pos.z - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_parent_child_transform_with_scale() {
        let parent = GlobalTransform::from_transform(&Transform {
            position: Vec3::new(100.0, 0.0, 0.0),
            rotation: Vec3::ZERO,
            scale: 5.0,
        });
        let child_local = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));

        let child_global = GlobalTransform::from_parent_and_local(&parent, &child_local);
        let pos = child_global.position();

        // Child offset is scaled by the parent: 100 + 2 * 5
        assert!((pos.x - 110.0).abs() < 0.001);
    }

    #[test]
    fn test_look_toward_is_horizontal() {
        let mut t = Transform::from_position(Vec3::new(0.0, 4.0, 0.0));
        t.look_toward(Vec3::new(1.0, 50.0, 0.0));
        assert!((t.yaw() - std::f32::consts::FRAC_PI_2).abs() < 0.0001);
        assert_eq!(t.rotation.x, 0.0);
        assert_eq!(t.rotation.z, 0.0);
    }

    #[test]
    fn test_look_toward_straight_up_keeps_heading() {
        let mut t = Transform::from_position(Vec3::ZERO);
        t.look_toward(Vec3::new(0.0, 0.0, -1.0));
        let before = t.rotation;
        t.look_toward(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(t.rotation, before);
    }
}
