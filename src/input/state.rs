//! Input state management
//!
//! Polls keyboard (macroquad) and gamepad (gilrs) once per frame and folds
//! them into an `InputSnapshot`: plain data the runtime consumes, so game
//! logic never queries devices directly.

use macroquad::prelude::*;

use super::gamepad::{button, Gamepad};
use super::Action;
use crate::game::movement::MoveKeys;

/// Stick deflection that counts as a held direction
const STICK_THRESHOLD: f32 = 0.5;

/// Everything the runtime needs from input for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Discrete actions that went down this frame, in a fixed order
    pub pressed: Vec<Action>,
    pub move_keys: MoveKeys,
    /// Orbit rate, x = yaw and y = pitch, each in [-1, 1]
    pub orbit: (f32, f32),
}

#[cfg(test)]
impl InputSnapshot {
    /// Snapshot with only `actions` pressed
    pub fn pressing(actions: &[Action]) -> Self {
        Self {
            pressed: actions.to_vec(),
            ..Self::default()
        }
    }

    /// Snapshot with movement keys held
    pub fn moving(move_keys: MoveKeys) -> Self {
        Self {
            move_keys,
            ..Self::default()
        }
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

fn key_for(action: Action) -> KeyCode {
    match action {
        Action::ToggleCollision => KeyCode::P,
        Action::ToggleFreeCamera => KeyCode::C,
        Action::TriggerCinematic => KeyCode::L,
        Action::SkipCinematic => KeyCode::Escape,
        Action::MoveForward => KeyCode::W,
        Action::MoveBackward => KeyCode::S,
        Action::MoveLeft => KeyCode::A,
        Action::MoveRight => KeyCode::D,
        Action::OrbitLeft => KeyCode::Left,
        Action::OrbitRight => KeyCode::Right,
        Action::OrbitUp => KeyCode::Up,
        Action::OrbitDown => KeyCode::Down,
    }
}

fn button_for(action: Action) -> Option<u32> {
    match action {
        Action::ToggleCollision => Some(button::Y),
        Action::ToggleFreeCamera => Some(button::X),
        Action::TriggerCinematic => Some(button::START),
        Action::SkipCinematic => Some(button::B),
        Action::MoveForward => Some(button::DPAD_UP),
        Action::MoveBackward => Some(button::DPAD_DOWN),
        Action::MoveLeft => Some(button::DPAD_LEFT),
        Action::MoveRight => Some(button::DPAD_RIGHT),
        _ => None,
    }
}

/// Unified input state that handles both keyboard and gamepad
pub struct InputState {
    gamepad: Gamepad,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
        }
    }

    /// Check if action is currently held down
    pub fn action_down(&self, action: Action) -> bool {
        is_key_down(key_for(action)) || button_for(action).is_some_and(|b| self.gamepad.is_button_down(b))
    }

    /// Check if action was just pressed this frame
    pub fn action_pressed(&self, action: Action) -> bool {
        is_key_pressed(key_for(action)) || button_for(action).is_some_and(|b| self.gamepad.is_button_pressed(b))
    }

    /// Call once per frame
    pub fn poll(&mut self) -> InputSnapshot {
        self.gamepad.poll();

        let pressed = Action::DISCRETE
            .iter()
            .copied()
            .filter(|a| self.action_pressed(*a))
            .collect();

        let stick = self.gamepad.left_stick();
        let move_keys = MoveKeys {
            forward: self.action_down(Action::MoveForward) || stick.y > STICK_THRESHOLD,
            backward: self.action_down(Action::MoveBackward) || stick.y < -STICK_THRESHOLD,
            left: self.action_down(Action::MoveLeft) || stick.x < -STICK_THRESHOLD,
            right: self.action_down(Action::MoveRight) || stick.x > STICK_THRESHOLD,
        };

        let mut orbit = (0.0f32, 0.0f32);
        if self.action_down(Action::OrbitLeft) { orbit.0 -= 1.0; }
        if self.action_down(Action::OrbitRight) { orbit.0 += 1.0; }
        if self.action_down(Action::OrbitUp) { orbit.1 += 1.0; }
        if self.action_down(Action::OrbitDown) { orbit.1 -= 1.0; }

        let look = self.gamepad.right_stick();
        if look.length() > Vec2::new(orbit.0, orbit.1).length() {
            orbit = (look.x, look.y);
        }

        InputSnapshot { pressed, move_keys, orbit }
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
