//! HUD status text
//!
//! Redrawn from the latest `HudStatus` the runtime sent.

use macroquad::prelude::{draw_text, Color, GREEN, RED, YELLOW};

use crate::game::HudStatus;

const FONT_SIZE: f32 = 24.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 28.0;

pub fn status_lines(status: &HudStatus) -> Vec<&'static str> {
    if status.cinematic_active {
        return vec!["CINEMATIC MODE PLAYING..."];
    }
    vec![
        if status.collision_enabled { "COLLISION: ON (P)" } else { "COLLISION: OFF (P)" },
        if status.free_camera { "CAMERA: FREE (C)" } else { "CAMERA: PLAYER (C)" },
        "CINEMATIC: READY (L)",
    ]
}

pub fn status_color(status: &HudStatus) -> Color {
    if status.cinematic_active {
        YELLOW
    } else if status.collision_enabled {
        GREEN
    } else {
        RED
    }
}

pub fn draw_hud(status: &HudStatus) {
    let color = status_color(status);
    for (i, line) in status_lines(status).iter().enumerate() {
        draw_text(line, MARGIN, MARGIN + FONT_SIZE + i as f32 * LINE_HEIGHT, FONT_SIZE, color);
    }
}
