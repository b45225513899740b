//! Spatial Bounds
//!
//! Axis-aligned bounding boxes and the squared-distance broad-phase test
//! used before exact box overlap checks.

use serde::{Deserialize, Serialize};
use crate::math::{Vec3, Mat4, mat4_transform_point};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of `size` (full extents) centered on `center`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Expand bounds to include a point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance from the center to any corner
    pub fn half_diagonal(&self) -> f32 {
        self.size().len() * 0.5
    }

    /// min <= max on every axis, all components finite
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Exact overlap test. Touching faces count as an intersection.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x || other.min.x > self.max.x
            || other.max.y < self.min.y || other.min.y > self.max.y
            || other.max.z < self.min.z || other.min.z > self.max.z)
    }

    /// World-space box enclosing this local box after `matrix` is applied
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut out = Aabb::new(
            mat4_transform_point(matrix, corners[0]),
            mat4_transform_point(matrix, corners[0]),
        );
        for corner in &corners[1..] {
            out.expand(mat4_transform_point(matrix, *corner));
        }
        out
    }
}

/// Broad-phase proximity test: is `point` within `radius` of `center`?
/// A point exactly at the radius is in reach.
///
/// Compares squared distances so no square root is taken per query.
pub fn within_reach(center: Vec3, point: Vec3, radius_sq: f32) -> bool {
    point.distance_squared(center) <= radius_sq
}
