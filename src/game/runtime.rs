//! Game Runtime
//!
//! Top-level per-frame loop. One `tick` does, in order:
//!
//! 1. Discrete input (toggles, cinematic trigger), ignored during cinematics
//!    except for the skip
//! 2. Environment update (flickering lamp, siren)
//! 3. Cinematic completion check: hand control back once the sequencer idles
//! 4. Either the cinematic update, or player movement plus follow camera
//!
//! The completion check must come before step 4 so the frame a cinematic
//! ends is already a player frame.

use crate::input::{Action, InputSnapshot};
use crate::math::Vec3;
use crate::world::{LevelBuild, SceneryBox};
use super::camera::{CameraPose, FollowCamera};
use super::cinematic::{CinematicSequencer, ShotTable};
use super::environment::Environment;
use super::event::{CinematicEvent, Events, HudStatus};
use super::movement::{movement_intent, MoveOutcome, PlayerSettings};
use super::obstacles::ObstacleRegistry;
use super::player::Actor;

/// Camera orbit speed, radians per second at full deflection
pub const ORBIT_SPEED: f32 = 2.0;

/// Where the follow camera sits relative to the player at startup
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 60.0, 150.0);

/// Camera control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Follow camera tracks the player
    #[default]
    Player,
    /// Camera orbits freely; player input is blocked
    Free,
}

/// User-facing flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameFlags {
    pub collision_enabled: bool,
    pub camera_mode: CameraMode,
    /// Runtime's view of the cinematic; lags the sequencer by one frame on completion
    pub cinematic_mode: bool,
}

impl GameFlags {
    pub fn status(&self) -> HudStatus {
        HudStatus {
            collision_enabled: self.collision_enabled,
            free_camera: self.camera_mode == CameraMode::Free,
            cinematic_active: self.cinematic_mode,
        }
    }
}

impl Default for GameFlags {
    fn default() -> Self {
        Self {
            collision_enabled: true,
            camera_mode: CameraMode::Player,
            cinematic_mode: false,
        }
    }
}

/// Startup options from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeOptions {
    pub collision_enabled: bool,
    /// Override for the follow camera distance
    pub follow_distance: Option<f32>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            collision_enabled: true,
            follow_distance: None,
        }
    }
}

pub struct GameState {
    pub flags: GameFlags,
    pub player: Actor,
    pub stalker: Actor,
    pub camera: CameraPose,
    pub follow: FollowCamera,
    pub sequencer: CinematicSequencer,
    pub obstacles: ObstacleRegistry,
    pub environment: Environment,
    pub scenery: Vec<SceneryBox>,
    pub events: Events,
    /// Outcome of the last resolver call, for the debug overlay
    pub last_move: Option<MoveOutcome>,
}

impl GameState {
    pub fn new(level: LevelBuild, shots: ShotTable, options: RuntimeOptions) -> Self {
        let player = Actor::new("player", PlayerSettings::START, &level.actor_clips);
        let mut stalker = Actor::new("stalker", Vec3::ZERO, &level.actor_clips);
        // Stays out of sight until the first cinematic
        stalker.visible = false;

        let mut follow = FollowCamera::from_position(FOLLOW_OFFSET, Vec3::ZERO);
        if let Some(distance) = options.follow_distance {
            follow.distance = distance;
        }
        follow.set_target(player.position());

        let flags = GameFlags {
            collision_enabled: options.collision_enabled,
            ..GameFlags::default()
        };

        let mut events = Events::new();
        events.status.send(flags.status());

        Self {
            flags,
            camera: follow.pose(),
            follow,
            player,
            stalker,
            sequencer: CinematicSequencer::new(shots),
            obstacles: level.obstacles,
            environment: level.environment,
            scenery: level.scenery,
            events,
            last_move: None,
        }
    }

    pub fn is_cinematic(&self) -> bool {
        self.flags.cinematic_mode
    }

    /// Player input reaches the resolver this frame
    pub fn player_has_control(&self) -> bool {
        !self.flags.cinematic_mode && self.flags.camera_mode == CameraMode::Player
    }

    /// Run one frame
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) {
        for action in &input.pressed {
            self.handle_action(*action);
        }

        self.environment.update(dt);

        if self.is_cinematic() && !self.sequencer.is_active() {
            self.hand_back_control(false);
        }

        if self.is_cinematic() {
            self.sequencer.update(dt, &mut self.camera, &mut self.stalker);
            self.stalker.animation.update(dt);
        } else {
            self.update_player(dt, input);
        }
    }

    fn update_player(&mut self, dt: f32, input: &InputSnapshot) {
        let has_control = self.player_has_control();
        let intent = movement_intent(self.camera.forward(), input.move_keys);
        self.last_move = self.player.update_player(
            dt,
            intent,
            self.flags.collision_enabled,
            &self.obstacles,
            !has_control,
        );
        if self.last_move.is_some_and(|m| m.crashed) {
            log::trace!("{} blocked at {:?}", self.player.name, self.player.position());
        }

        let (yaw, pitch) = input.orbit;
        self.follow.orbit(yaw * ORBIT_SPEED * dt, pitch * ORBIT_SPEED * dt);
        if has_control {
            self.follow.set_target(self.player.position());
        }
        self.camera = self.follow.pose();
    }

    /// Apply a discrete action. While a cinematic plays only the skip is honoured,
    /// and only until the sequence has run out; completion is handed back by `tick`.
    pub fn handle_action(&mut self, action: Action) {
        if self.is_cinematic() {
            if action == Action::SkipCinematic && self.sequencer.is_active() {
                self.abort_cinematic();
            }
            return;
        }

        match action {
            Action::ToggleCollision => {
                self.flags.collision_enabled = !self.flags.collision_enabled;
                log::debug!("collision {}", if self.flags.collision_enabled { "on" } else { "off" });
            }
            Action::ToggleFreeCamera => {
                self.flags.camera_mode = match self.flags.camera_mode {
                    CameraMode::Player => CameraMode::Free,
                    CameraMode::Free => CameraMode::Player,
                };
                if self.flags.camera_mode == CameraMode::Player {
                    self.follow.set_target(self.player.position());
                }
            }
            Action::TriggerCinematic => {
                self.flags.cinematic_mode = true;
                self.sequencer.start(&mut self.stalker);
                self.events.cinematic.send(CinematicEvent::Started);
            }
            _ => return,
        }
        self.events.status.send(self.flags.status());
    }

    /// Stop a playing cinematic now and return control to the player
    pub fn abort_cinematic(&mut self) {
        if !self.is_cinematic() {
            return;
        }
        log::debug!(
            "skipping cinematic at {:?}, {:.0}% through the shot",
            self.sequencer.state(),
            self.sequencer.progress() * 100.0
        );
        self.sequencer.stop(&mut self.stalker);
        self.hand_back_control(true);
        self.camera = self.follow.pose();
    }

    fn hand_back_control(&mut self, aborted: bool) {
        self.flags.cinematic_mode = false;
        self.follow.set_target(self.player.position());
        self.events.cinematic.send(CinematicEvent::Finished {
            aborted,
            player_position: self.player.position(),
        });
        self.events.status.send(self.flags.status());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::{AnimState, AnimationClip};
    use crate::game::bounds::Aabb;
    use crate::game::cinematic::CinematicState;
    use crate::game::movement::MoveKeys;
    use crate::game::player::{IDLE_CLIP, WALK_CLIP};

    fn level() -> LevelBuild {
        LevelBuild {
            name: "test".to_string(),
            obstacles: ObstacleRegistry::new(),
            environment: Environment::new(),
            scenery: Vec::new(),
            actor_clips: vec![
                AnimationClip { name: WALK_CLIP.to_string(), duration: 1.2 },
                AnimationClip { name: IDLE_CLIP.to_string(), duration: 3.0 },
            ],
        }
    }

    fn game() -> GameState {
        GameState::new(level(), ShotTable::reference().unwrap(), RuntimeOptions::default())
    }

    fn forward() -> InputSnapshot {
        InputSnapshot::moving(MoveKeys { forward: true, ..Default::default() })
    }

    #[test]
    fn test_initial_state() {
        let g = game();
        assert_eq!(g.flags, GameFlags::default());
        assert_eq!(g.player.position(), PlayerSettings::START);
        assert!(!g.stalker.visible);
        assert_eq!(g.player.animation.active(), Some(AnimState::Idle));
        assert_eq!(g.events.status.last(), Some(&g.flags.status()));
        assert!((g.camera.position.distance(PlayerSettings::START + FOLLOW_OFFSET)) < 0.01);
    }

    #[test]
    fn test_walk_moves_player_away_from_camera() {
        let mut g = game();
        g.tick(0.1, &forward());
        // Camera starts on +Z looking toward -Z
        assert!((g.player.position().z + 1.0).abs() < 0.001);
        assert_eq!(g.player.animation.active(), Some(AnimState::Walk));
        assert_eq!(g.follow.target, g.player.position());
    }

    #[test]
    fn test_toggles_emit_status() {
        let mut g = game();
        g.events.clear_all();
        g.tick(0.016, &InputSnapshot::pressing(&[Action::ToggleCollision]));
        assert!(!g.flags.collision_enabled);
        assert!(!g.events.status.last().unwrap().collision_enabled);
        assert_eq!(g.events.status.drain().count(), 1);
    }

    #[test]
    fn test_collision_toggle_lets_player_through() {
        let mut level = level();
        level.obstacles.push(Aabb::new(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 10.0, -2.0)));
        let mut g = GameState::new(level, ShotTable::reference().unwrap(), RuntimeOptions::default());

        g.tick(0.1, &forward());
        assert_eq!(g.player.position(), PlayerSettings::START);
        assert!(g.last_move.unwrap().crashed);

        g.tick(0.1, &InputSnapshot { pressed: vec![Action::ToggleCollision], ..forward() });
        assert!(!g.last_move.unwrap().crashed);
        assert!(g.player.position().z < 0.0);
    }

    #[test]
    fn test_free_camera_blocks_movement() {
        let mut g = game();
        g.tick(0.016, &InputSnapshot::pressing(&[Action::ToggleFreeCamera]));
        assert_eq!(g.flags.camera_mode, CameraMode::Free);
        assert!(!g.player_has_control());

        g.tick(0.1, &forward());
        assert_eq!(g.player.position(), PlayerSettings::START);
        assert!(g.last_move.is_none());
    }

    #[test]
    fn test_leaving_free_camera_snaps_follow_target() {
        let mut g = game();
        g.tick(0.1, &forward());
        g.tick(0.016, &InputSnapshot::pressing(&[Action::ToggleFreeCamera]));
        g.follow.set_target(Vec3::new(100.0, 0.0, 100.0));
        g.handle_action(Action::ToggleFreeCamera);
        assert_eq!(g.follow.target, g.player.position());
    }

    #[test]
    fn test_cinematic_blocks_input_and_toggles() {
        let mut g = game();
        g.tick(0.016, &InputSnapshot::pressing(&[Action::TriggerCinematic]));
        assert!(g.is_cinematic());
        assert_eq!(g.sequencer.state(), CinematicState::PlayingShot(0));

        let before = g.player.position();
        let input = InputSnapshot {
            pressed: vec![Action::ToggleCollision, Action::ToggleFreeCamera],
            ..forward()
        };
        g.tick(0.1, &input);
        assert_eq!(g.player.position(), before);
        assert!(g.flags.collision_enabled);
        assert_eq!(g.flags.camera_mode, CameraMode::Player);
    }

    #[test]
    fn test_cinematic_drives_camera() {
        let mut g = game();
        g.handle_action(Action::TriggerCinematic);
        g.tick(4.0, &InputSnapshot::default());
        assert!((g.camera.position.x + 9.5).abs() < 0.001);
        assert!((g.camera.position.y - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_completion_hands_back_next_frame() {
        let mut g = game();
        g.handle_action(Action::TriggerCinematic);
        g.events.clear_all();

        let durations: Vec<f32> = g.sequencer.table().iter().map(|s| s.duration).collect();
        for duration in durations {
            g.tick(duration, &InputSnapshot::default());
        }
        // Sequencer finished during the last tick; runtime notices on the next
        assert!(!g.sequencer.is_active());
        assert!(g.is_cinematic());
        assert!(g.stalker.visible);

        g.tick(0.1, &forward());
        assert!(!g.is_cinematic());
        assert!(g.player.position().z < 0.0);
        assert_eq!(g.follow.target, g.player.position());
        assert!(matches!(
            g.events.cinematic.last(),
            Some(CinematicEvent::Finished { aborted: false, .. })
        ));
        assert!(!g.events.status.last().unwrap().cinematic_active);
    }

    #[test]
    fn test_abort_releases_control_immediately() {
        let mut g = game();
        g.handle_action(Action::TriggerCinematic);
        g.tick(1.0, &InputSnapshot::default());

        g.abort_cinematic();
        assert!(!g.is_cinematic());
        assert!(g.stalker.visible);
        assert_eq!(g.sequencer.state(), CinematicState::Idle);
        assert_eq!(g.camera, g.follow.pose());
        assert!(matches!(
            g.events.cinematic.last(),
            Some(CinematicEvent::Finished { aborted: true, .. })
        ));

        g.tick(0.1, &forward());
        assert!(g.player.position().z < 0.0);
    }

    #[test]
    fn test_skip_action_aborts() {
        let mut g = game();
        g.tick(0.016, &InputSnapshot::pressing(&[Action::SkipCinematic]));
        assert!(g.events.cinematic.last().is_none());

        g.handle_action(Action::TriggerCinematic);
        g.tick(0.5, &InputSnapshot::pressing(&[Action::SkipCinematic]));
        assert!(!g.is_cinematic());
        assert!(!g.sequencer.is_active());
    }

    #[test]
    fn test_skip_after_natural_end_is_not_an_abort() {
        let mut g = game();
        g.handle_action(Action::TriggerCinematic);
        let durations: Vec<f32> = g.sequencer.table().iter().map(|s| s.duration).collect();
        for duration in durations {
            g.tick(duration, &InputSnapshot::default());
        }
        g.events.clear_all();

        // Sequence already ran out; the skip arrives on the hand-back frame
        g.tick(0.016, &InputSnapshot::pressing(&[Action::SkipCinematic]));
        assert!(!g.is_cinematic());
        let events: Vec<_> = g.events.cinematic.drain().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CinematicEvent::Finished { aborted: false, .. }));
    }

    #[test]
    fn test_stalker_animates_during_cinematic() {
        let mut g = game();
        g.handle_action(Action::TriggerCinematic);
        for _ in 0..12 {
            g.tick(100.0, &InputSnapshot::default());
        }
        assert_eq!(g.sequencer.state(), CinematicState::PlayingShot(12));
        g.tick(1.0, &InputSnapshot::default());
        assert!(g.stalker.visible);
        assert_eq!(g.stalker.animation.active(), Some(AnimState::Walk));
        assert!(g.stalker.animation.weight(AnimState::Walk) > 0.99);
    }
}
