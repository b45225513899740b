//! Movement & Collision Resolver
//!
//! Binary accept/reject movement: the player moves by a fixed speed along the
//! requested direction unless the box at the proposed position overlaps an
//! obstacle, in which case it stays put for this frame. There is no sliding
//! or push-back.

use crate::math::Vec3;
use super::animation::AnimState;
use super::bounds::Aabb;
use super::obstacles::ObstacleRegistry;
use super::transform::yaw_toward;

/// Fixed character controller parameters
pub struct PlayerSettings;

impl PlayerSettings {
    /// Walk speed (units per second)
    pub const SPEED: f32 = 10.0;
    /// Full size of the player's collision box
    pub const SIZE: Vec3 = Vec3::new(3.0, 8.0, 3.0);
    /// Obstacles whose center is farther than this are skipped before the exact test
    pub const BROAD_PHASE_RADIUS: f32 = 20.0;
    /// Spawn position
    pub const START: Vec3 = Vec3::new(0.0, 4.0, 0.0);
}

/// Held movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Result of one resolver step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Committed position (unchanged on a crash or with no intent)
    pub position: Vec3,
    /// New heading in radians, present whenever movement was requested
    pub yaw: Option<f32>,
    pub anim: AnimState,
    /// The proposed move was rejected by an obstacle
    pub crashed: bool,
}

/// Camera-relative movement direction from held keys (not normalised; may be zero).
///
/// Forward is the camera view flattened onto the ground plane; right is
/// forward x up.
pub fn movement_intent(camera_forward: Vec3, keys: MoveKeys) -> Vec3 {
    let forward = camera_forward.flatten_xz();
    let right = forward.cross(Vec3::UP).normalize();

    let mut direction = Vec3::ZERO;
    if keys.forward { direction = direction + forward; }
    if keys.backward { direction = direction - forward; }
    if keys.right { direction = direction + right; }
    if keys.left { direction = direction - right; }
    direction
}

/// Compute the player's next position, heading, and animation state.
///
/// A zero `intent` means no movement was requested: the player idles in
/// place regardless of `dt`. Otherwise the player turns toward the intent
/// and walks, unless `collision_enabled` and the player box at the proposed
/// position overlaps an obstacle.
pub fn resolve_movement(
    dt: f32,
    intent: Vec3,
    position: Vec3,
    collision_enabled: bool,
    obstacles: &ObstacleRegistry,
) -> MoveOutcome {
    if intent.is_zero() {
        return MoveOutcome {
            position,
            yaw: None,
            anim: AnimState::Idle,
            crashed: false,
        };
    }

    let direction = intent.normalize();
    let yaw = yaw_toward(position, position + direction);
    let proposed = position + direction * (PlayerSettings::SPEED * dt);

    let crashed = collision_enabled && {
        let player_box = Aabb::from_center_size(proposed, PlayerSettings::SIZE);
        obstacles
            .first_hit(&player_box, PlayerSettings::BROAD_PHASE_RADIUS)
            .is_some()
    };

    MoveOutcome {
        position: if crashed { position } else { proposed },
        yaw,
        anim: AnimState::Walk,
        crashed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at_x(min_x: f32) -> ObstacleRegistry {
        let mut registry = ObstacleRegistry::new();
        registry.push(Aabb::new(Vec3::new(min_x, 0.0, -1.0), Vec3::new(min_x + 2.0, 10.0, 1.0)));
        registry
    }

    #[test]
    fn test_idle_never_moves() {
        let registry = wall_at_x(5.0);
        let start = Vec3::new(1.0, 4.0, 2.0);
        let mut position = start;
        for dt in [0.0, 0.016, 1.0, 1000.0] {
            let outcome = resolve_movement(dt, Vec3::ZERO, position, true, &registry);
            assert_eq!(outcome.anim, AnimState::Idle);
            assert_eq!(outcome.yaw, None);
            position = outcome.position;
        }
        assert_eq!(position, start);
    }

    #[test]
    fn test_free_move_commits_full_step() {
        let registry = ObstacleRegistry::new();
        let outcome = resolve_movement(0.5, Vec3::new(0.0, 0.0, -2.0), PlayerSettings::START, true, &registry);
        assert_eq!(outcome.anim, AnimState::Walk);
        assert!(!outcome.crashed);
        assert_eq!(outcome.position, Vec3::new(0.0, 4.0, -5.0));
    }

    #[test]
    fn test_crash_leaves_position_exactly_unchanged() {
        // Player box spans x in [-1.5, 1.5]; one step of 1 unit reaches x = 2.5
        let registry = wall_at_x(2.0);
        let start = PlayerSettings::START;
        let outcome = resolve_movement(0.1, Vec3::new(1.0, 0.0, 0.0), start, true, &registry);
        assert!(outcome.crashed);
        assert_eq!(outcome.position, start);
        assert_eq!(outcome.anim, AnimState::Walk);
    }

    #[test]
    fn test_crash_still_turns_player() {
        let registry = wall_at_x(2.0);
        let outcome = resolve_movement(0.1, Vec3::new(1.0, 0.0, 0.0), PlayerSettings::START, true, &registry);
        let yaw = outcome.yaw.unwrap();
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 0.0001);
    }

    #[test]
    fn test_collision_disabled_passes_through() {
        let registry = wall_at_x(2.0);
        let outcome = resolve_movement(0.1, Vec3::new(1.0, 0.0, 0.0), PlayerSettings::START, false, &registry);
        assert!(!outcome.crashed);
        assert!((outcome.position.x - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_broad_phase_boundary_still_detects_crash() {
        // Obstacle whose near face overlaps the proposed player box by 0.1
        // while its center sits just inside the broad-phase radius.
        let mut registry = ObstacleRegistry::new();
        let proposed_x = 1.0;
        let near_face = proposed_x + 1.4;
        let half_width = 19.9 - near_face;
        registry.push(Aabb::new(
            Vec3::new(near_face, 0.0, -1.0),
            Vec3::new(near_face + 2.0 * half_width, 8.0, 1.0),
        ));
        let center = registry.iter().next().unwrap().center();
        assert!((center.x - 19.9).abs() < 0.001);

        let outcome = resolve_movement(0.1, Vec3::new(1.0, 0.0, 0.0), PlayerSettings::START, true, &registry);
        assert!(outcome.crashed);
    }

    #[test]
    fn test_broad_phase_never_hides_big_overlaps() {
        // House-sized box far wider than the broad-phase radius
        let mut registry = ObstacleRegistry::new();
        registry.push(Aabb::new(Vec3::new(2.0, 0.0, -40.0), Vec3::new(80.0, 10.0, 40.0)));
        let outcome = resolve_movement(0.1, Vec3::new(1.0, 0.0, 0.0), PlayerSettings::START, true, &registry);
        assert!(outcome.crashed);
    }

    #[test]
    fn test_corner_contact_with_large_box_crashes() {
        // Step lands the player box at (1, 4, 0), touching the box only at a corner
        let mut registry = ObstacleRegistry::new();
        registry.push(Aabb::new(Vec3::new(2.5, 8.0, 1.5), Vec3::new(17.5, 48.0, 16.5)));
        let outcome = resolve_movement(0.1, Vec3::new(1.0, 0.0, 0.0), PlayerSettings::START, true, &registry);
        assert!(outcome.crashed);
        assert_eq!(outcome.position, PlayerSettings::START);
    }

    #[test]
    fn test_intent_is_normalized() {
        let registry = ObstacleRegistry::new();
        let outcome = resolve_movement(1.0, Vec3::new(3.0, 0.0, 4.0), Vec3::ZERO, true, &registry);
        assert!((outcome.position.len() - PlayerSettings::SPEED).abs() < 0.001);
    }

    #[test]
    fn test_movement_intent_camera_relative() {
        // Camera looking down -Z: forward = -Z, right = +X
        let forward = Vec3::new(0.0, -0.5, -1.0);
        let up = movement_intent(forward, MoveKeys { forward: true, ..Default::default() });
        assert!((up.z + 1.0).abs() < 0.0001);
        assert_eq!(up.y, 0.0);

        let right = movement_intent(forward, MoveKeys { right: true, ..Default::default() });
        assert!((right.x - 1.0).abs() < 0.0001);

        let none = movement_intent(forward, MoveKeys { forward: true, backward: true, ..Default::default() });
        assert!(none.is_zero());
    }
}
