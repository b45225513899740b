//! Game action definitions

/// All named intents the game reacts to
///
/// Keyboard / gamepad (Xbox layout):
/// - P / Y = toggle collision
/// - C / X = toggle free camera
/// - L / Start = play the cinematic
/// - Escape / B = skip the cinematic while it plays
/// - WASD / left stick = move
/// - Arrow keys / right stick = orbit the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Toggles (edge-triggered)
    ToggleCollision,
    ToggleFreeCamera,
    TriggerCinematic,
    SkipCinematic,

    // Movement (held)
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,

    // Camera orbit (held)
    OrbitLeft,
    OrbitRight,
    OrbitUp,
    OrbitDown,
}

impl Action {
    /// Actions that fire once per key-down rather than while held
    pub const DISCRETE: [Action; 4] = [
        Action::ToggleCollision,
        Action::ToggleFreeCamera,
        Action::TriggerCinematic,
        Action::SkipCinematic,
    ];
}
