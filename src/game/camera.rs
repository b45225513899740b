//! Camera pose and player follow camera
//!
//! The pose is written every frame by exactly one of: the follow camera
//! (player or free-camera mode) or the cinematic sequencer.

use crate::math::Vec3;

/// Camera position plus the point it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Look from `position` toward `position + direction`
    pub fn look_along(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            target: position + direction,
        }
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }
}

/// Orbit-style camera framing a target from a fixed distance.
///
/// Yaw 0 puts the camera on the +Z side of the target looking toward -Z;
/// positive pitch raises the camera above the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl FollowCamera {
    pub const PITCH_MIN: f32 = -1.4;
    pub const PITCH_MAX: f32 = 1.4;

    /// Derive orbit parameters from an existing camera position and target
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: offset.y.atan2(horizontal),
            distance: offset.len(),
        }
    }

    /// Rotate around the target, clamping pitch short of straight up/down
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(Self::PITCH_MIN, Self::PITCH_MAX);
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn pose(&self) -> CameraPose {
        let horizontal = self.distance * self.pitch.cos();
        let offset = Vec3::new(
            self.yaw.sin() * horizontal,
            self.distance * self.pitch.sin(),
            self.yaw.cos() * horizontal,
        );
        CameraPose::look_at(self.target + offset, self.target)
    }
}
