//! Gamepad support
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: No gamepad; keyboard only

use macroquad::prelude::Vec2;

// Standard gamepad button indices (Xbox layout)
pub mod button {
    pub const B: u32 = 1;           // East
    pub const X: u32 = 2;           // West
    pub const Y: u32 = 3;           // North
    pub const START: u32 = 9;
    pub const DPAD_UP: u32 = 12;
    pub const DPAD_DOWN: u32 = 13;
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

/// Buttons down this frame and last frame, for edge detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonMasks {
    pub current: u32,
    pub previous: u32,
}

impl ButtonMasks {
    /// Shift the current mask into `previous` and store the new one
    pub fn advance(&mut self, mask: u32) {
        self.previous = self.current;
        self.current = mask;
    }

    pub fn is_down(&self, button: u32) -> bool {
        (self.current & (1 << button)) != 0
    }

    /// Down now, up last frame
    pub fn is_pressed(&self, button: u32) -> bool {
        self.is_down(button) && (self.previous & (1 << button)) == 0
    }
}

// ============================================================================
// WASM Implementation (keyboard only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    #[derive(Default)]
    pub struct Gamepad {
        masks: ButtonMasks,
    }

    impl Gamepad {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn is_button_down(&self, button: u32) -> bool {
            self.masks.is_down(button)
        }

        pub fn is_button_pressed(&self, button: u32) -> bool {
            self.masks.is_pressed(button)
        }

        pub fn left_stick(&self) -> Vec2 {
            Vec2::ZERO
        }

        pub fn right_stick(&self) -> Vec2 {
            Vec2::ZERO
        }
    }
}

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button as GilrsButton, Gilrs};

    pub struct Gamepad {
        /// `None` when the platform backend failed to start
        gilrs: Option<Gilrs>,
        deadzone: f32,
        masks: ButtonMasks,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    log::warn!("gamepad support unavailable: {}", e);
                    None
                }
            };
            Self {
                gilrs,
                deadzone: 0.15,
                masks: ButtonMasks::default(),
            }
        }

        /// Drain gilrs events and latch this frame's buttons. Call once per frame.
        pub fn poll(&mut self) {
            if let Some(gilrs) = self.gilrs.as_mut() {
                while gilrs.next_event().is_some() {}
            }
            let mask = self.button_mask();
            self.masks.advance(mask);
        }

        pub fn has_gamepad(&self) -> bool {
            self.active_gamepad().is_some()
        }

        fn active_gamepad(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, gp)| gp)
        }

        fn button_mask(&self) -> u32 {
            let Some(gp) = self.active_gamepad() else { return 0 };
            let mut mask = 0u32;

            if gp.is_pressed(GilrsButton::East) { mask |= 1 << super::button::B; }
            if gp.is_pressed(GilrsButton::West) { mask |= 1 << super::button::X; }
            if gp.is_pressed(GilrsButton::North) { mask |= 1 << super::button::Y; }
            if gp.is_pressed(GilrsButton::Start) { mask |= 1 << super::button::START; }
            if gp.is_pressed(GilrsButton::DPadUp) { mask |= 1 << super::button::DPAD_UP; }
            if gp.is_pressed(GilrsButton::DPadDown) { mask |= 1 << super::button::DPAD_DOWN; }
            if gp.is_pressed(GilrsButton::DPadLeft) { mask |= 1 << super::button::DPAD_LEFT; }
            if gp.is_pressed(GilrsButton::DPadRight) { mask |= 1 << super::button::DPAD_RIGHT; }

            mask
        }

        pub fn is_button_down(&self, button: u32) -> bool {
            self.masks.is_down(button)
        }

        pub fn is_button_pressed(&self, button: u32) -> bool {
            self.masks.is_pressed(button)
        }

        pub fn left_stick(&self) -> Vec2 {
            let Some(gp) = self.active_gamepad() else { return Vec2::ZERO };
            let x = gp.value(Axis::LeftStickX);
            let y = gp.value(Axis::LeftStickY);
            apply_deadzone(x, y, self.deadzone)
        }

        pub fn right_stick(&self) -> Vec2 {
            let Some(gp) = self.active_gamepad() else { return Vec2::ZERO };
            let x = gp.value(Axis::RightStickX);
            let y = gp.value(Axis::RightStickY);
            apply_deadzone(x, y, self.deadzone)
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Apply radial deadzone with linear rescaling
pub fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    // Rescale from deadzone..1.0 to 0.0..1.0
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}

// Re-export the platform-specific implementation
pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_only_on_first_frame() {
        let mut masks = ButtonMasks::default();
        masks.advance(1 << button::START);
        assert!(masks.is_pressed(button::START));
        masks.advance(1 << button::START);
        assert!(masks.is_down(button::START));
        assert!(!masks.is_pressed(button::START));
        masks.advance(0);
        masks.advance(1 << button::START);
        assert!(masks.is_pressed(button::START));
    }

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.0, 0.15), Vec2::ZERO);
        let full = apply_deadzone(1.0, 0.0, 0.15);
        assert!((full.x - 1.0).abs() < 0.0001);
    }
}
