//! Scene presentation
//!
//! Draws the game state with macroquad's immediate-mode 3D: scenery boxes
//! tinted by category, both actors as boxes, and the environment lights as
//! small bulbs. Nothing here feeds back into the simulation.

use macroquad::prelude::{
    clear_background, draw_cube, draw_cube_wires, draw_line_3d, draw_sphere, draw_sphere_wires, set_camera,
    set_default_camera, Camera3D, Color,
};

use crate::game::animation::AnimState;
use crate::game::bounds::Aabb;
use crate::game::camera::CameraPose;
use crate::game::environment::{Environment, PointLight};
use crate::game::movement::PlayerSettings;
use crate::game::obstacles::NodeCategory;
use crate::game::player::Actor;
use crate::game::GameState;
use crate::math::Vec3;

/// Night fog colour, used as the clear colour
const BACKGROUND: Color = Color::new(0.067, 0.067, 0.067, 1.0);
const FIELD_OF_VIEW_DEG: f32 = 70.0;
const SIREN_BEAM_LENGTH: f32 = 5.0;
const STRIDE_BOB_HEIGHT: f32 = 0.4;
const BRIGHTEST_INTENSITY: f32 = 800.0;

fn mq(v: Vec3) -> macroquad::math::Vec3 {
    macroquad::math::vec3(v.x, v.y, v.z)
}

fn category_color(category: NodeCategory) -> Color {
    match category {
        NodeCategory::Ground => Color::new(0.16, 0.16, 0.18, 1.0),
        NodeCategory::Leaf | NodeCategory::Bush => Color::new(0.10, 0.28, 0.12, 1.0),
        NodeCategory::Tree => Color::new(0.30, 0.20, 0.12, 1.0),
        NodeCategory::House => Color::new(0.45, 0.42, 0.38, 1.0),
        NodeCategory::Fence => Color::new(0.55, 0.55, 0.50, 1.0),
        NodeCategory::Prop => Color::new(0.35, 0.35, 0.40, 1.0),
        NodeCategory::Other => Color::new(0.25, 0.25, 0.25, 1.0),
    }
}

/// Bulb colour, dimmed for lights weaker than a street light
fn light_color(light: &PointLight) -> Color {
    let [r, g, b] = light.color;
    let level = 0.35 + 0.65 * (light.intensity / BRIGHTEST_INTENSITY).clamp(0.0, 1.0);
    Color::new(r * level, g * level, b * level, 1.0)
}

fn draw_box(bounds: &Aabb, color: Color) {
    draw_cube(mq(bounds.center()), mq(bounds.size()), None, color);
}

/// Vertical bounce from the walk cycle, two steps per loop, scaled by the walk blend
fn stride_bob(actor: &Actor) -> f32 {
    let Some(walk) = actor.animation.action(AnimState::Walk) else {
        return 0.0;
    };
    let step = (walk.phase() * std::f32::consts::TAU * 2.0).sin().abs();
    step * STRIDE_BOB_HEIGHT * actor.animation.weight(AnimState::Walk)
}

fn draw_actor(actor: &Actor, color: Color) {
    if !actor.visible {
        return;
    }
    let center = actor.position() + Vec3::new(0.0, stride_bob(actor), 0.0);
    let body = Aabb::from_center_size(center, PlayerSettings::SIZE);
    draw_box(&body, color);

    // Nose marker showing the heading
    let yaw = actor.transform.yaw();
    let nose = center + Vec3::new(yaw.sin(), 2.0, yaw.cos()) * 2.0;
    draw_sphere(mq(nose), 0.5, None, color);
}

fn draw_environment(env: &Environment) {
    if env.has_broken_lamp() {
        let lamp = &env.broken_lamp.light;
        let bulb = if env.broken_lamp.is_lit() { light_color(lamp) } else { Color::new(0.13, 0.13, 0.13, 1.0) };
        draw_sphere(mq(lamp.position), 0.5, None, bulb);
    }

    for light in &env.street_lights {
        draw_sphere(mq(light.position), 0.25, None, light_color(light));
    }

    if let Some(siren) = &env.siren {
        let (red, blue) = siren.beams();
        let origin = siren.position;
        draw_line_3d(mq(origin), mq(origin + red * SIREN_BEAM_LENGTH), Color::new(1.0, 0.0, 0.0, 1.0));
        draw_line_3d(mq(origin), mq(origin + blue * SIREN_BEAM_LENGTH), Color::new(0.0, 0.0, 1.0, 1.0));
    }
}

fn camera_3d(pose: &CameraPose) -> Camera3D {
    Camera3D {
        position: mq(pose.position),
        target: mq(pose.target),
        up: macroquad::math::vec3(0.0, 1.0, 0.0),
        fovy: FIELD_OF_VIEW_DEG.to_radians(),
        ..Default::default()
    }
}

/// Draw one frame of the world. Leaves the default 2D camera set for the HUD.
pub fn draw_scene(game: &GameState, show_obstacles: bool) {
    clear_background(BACKGROUND);
    set_camera(&camera_3d(&game.camera));

    for scenery in &game.scenery {
        draw_box(&scenery.bounds, category_color(scenery.category));
    }

    if show_obstacles {
        let wire = if game.flags.collision_enabled {
            Color::new(0.0, 1.0, 0.0, 1.0)
        } else {
            Color::new(1.0, 0.0, 0.0, 1.0)
        };
        for obstacle in game.obstacles.iter() {
            let bounds = obstacle.bounds();
            draw_cube_wires(mq(bounds.center()), mq(bounds.size()), wire);
        }
        // Light reach
        for light in &game.environment.street_lights {
            draw_sphere_wires(mq(light.position), light.range, None, Color::new(1.0, 0.67, 0.0, 0.25));
        }
    }

    draw_environment(&game.environment);
    draw_actor(&game.player, Color::new(0.8, 0.8, 0.85, 1.0));
    draw_actor(&game.stalker, Color::new(0.05, 0.05, 0.05, 1.0));

    set_default_camera();
}
