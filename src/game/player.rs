//! Actors
//!
//! A skinned character placed in the world: transform, visibility, and its
//! own animation controller. Used for both the player-controlled avatar and
//! the stalker choreographed by cinematics.

use crate::math::Vec3;
use super::animation::{AnimState, AnimationClip, AnimationController};
use super::movement::{resolve_movement, MoveOutcome};
use super::obstacles::ObstacleRegistry;
use super::transform::Transform;

/// Clip names inside the shared character model
pub const WALK_CLIP: &str = "Myers|MM_WalkFT";
pub const IDLE_CLIP: &str = "Myers|MM_Idle";

#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub animation: AnimationController,
}

impl Actor {
    /// Actor at `position` with walk/idle bound from the model's clips
    pub fn new(name: &str, position: Vec3, clips: &[AnimationClip]) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::from_position(position),
            visible: true,
            animation: AnimationController::from_library(
                clips,
                &[(AnimState::Walk, WALK_CLIP), (AnimState::Idle, IDLE_CLIP)],
            ),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Place the actor and turn it toward `position + facing`
    pub fn place(&mut self, position: Vec3, facing: Vec3) {
        self.transform.position = position;
        self.transform.look_toward(position + facing);
    }

    /// One frame of player control.
    ///
    /// The mixer always advances. When `input_blocked` the resolver is not
    /// consulted and `None` is returned; otherwise the outcome is applied to
    /// the transform and animation state.
    pub fn update_player(
        &mut self,
        dt: f32,
        intent: Vec3,
        collision_enabled: bool,
        obstacles: &ObstacleRegistry,
        input_blocked: bool,
    ) -> Option<MoveOutcome> {
        self.animation.update(dt);
        if input_blocked {
            return None;
        }

        let outcome = resolve_movement(dt, intent, self.transform.position, collision_enabled, obstacles);
        self.animation.set_state(outcome.anim);
        if let Some(yaw) = outcome.yaw {
            self.transform.rotation = Vec3::new(0.0, yaw.to_degrees(), 0.0);
        }
        self.transform.position = outcome.position;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bounds::Aabb;

    fn clips() -> Vec<AnimationClip> {
        vec![
            AnimationClip { name: WALK_CLIP.to_string(), duration: 1.2 },
            AnimationClip { name: IDLE_CLIP.to_string(), duration: 3.0 },
        ]
    }

    #[test]
    fn test_walks_then_idles() {
        let mut actor = Actor::new("player", Vec3::new(0.0, 4.0, 0.0), &clips());
        let registry = ObstacleRegistry::new();

        actor.update_player(0.1, Vec3::new(0.0, 0.0, 1.0), true, &registry, false);
        assert_eq!(actor.animation.active(), Some(AnimState::Walk));
        assert!((actor.position().z - 1.0).abs() < 0.0001);

        actor.update_player(0.1, Vec3::ZERO, true, &registry, false);
        assert_eq!(actor.animation.active(), Some(AnimState::Idle));
        assert!((actor.position().z - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_blocked_input_skips_resolver() {
        let mut actor = Actor::new("player", Vec3::new(0.0, 4.0, 0.0), &clips());
        let registry = ObstacleRegistry::new();
        let outcome = actor.update_player(0.1, Vec3::new(1.0, 0.0, 0.0), true, &registry, true);
        assert!(outcome.is_none());
        assert_eq!(actor.position(), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(actor.animation.active(), Some(AnimState::Idle));
    }

    #[test]
    fn test_bump_turns_without_moving() {
        let mut actor = Actor::new("player", Vec3::new(0.0, 4.0, 0.0), &clips());
        let mut registry = ObstacleRegistry::new();
        registry.push(Aabb::new(Vec3::new(-1.0, 0.0, -3.0), Vec3::new(1.0, 10.0, -2.0)));

        let outcome = actor.update_player(0.1, Vec3::new(0.0, 0.0, -1.0), true, &registry, false).unwrap();
        assert!(outcome.crashed);
        assert_eq!(actor.position(), Vec3::new(0.0, 4.0, 0.0));
        assert!((actor.transform.rotation.y.abs() - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_place_faces_direction() {
        let mut actor = Actor::new("stalker", Vec3::ZERO, &[]);
        actor.place(Vec3::new(-34.0, 4.0, 4.35), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(actor.position(), Vec3::new(-34.0, 4.0, 4.35));
        assert!((actor.transform.rotation.y - 90.0).abs() < 0.001);
    }
}
