//! World/environment update
//!
//! Animated scenery that runs first every frame, before the cinematic
//! completion check: the broken street lamp that flickers at random
//! intervals, and the police-car siren spinning on its lightbar. Also holds
//! the static street lights placed at level load.

use crate::math::Vec3;

/// Broken lamp brightness when lit
pub const FLICKER_ON_INTENSITY: f32 = 300.0;
/// Siren rotation speed, radians per second about Y
pub const SIREN_SPIN_RATE: f32 = 10.0;
/// Street light candidates closer than this to an existing light are merged into it
pub const STREET_LIGHT_MERGE_DISTANCE: f32 = 50.0;

/// Offset from the first lamp's world position to the broken light
pub const BROKEN_LAMP_OFFSET: Vec3 = Vec3::new(0.0, 14.0, -22.8);
/// Offset from the lightbar's world position to the siren
pub const SIREN_OFFSET: Vec3 = Vec3::new(2.0, -0.4, -2.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear RGB, 0..1
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which the light fades out
    pub range: f32,
}

impl PointLight {
    pub fn white(position: Vec3, intensity: f32, range: f32) -> Self {
        Self { position, color: [1.0, 1.0, 1.0], intensity, range }
    }

    /// Warm sodium-vapour street light
    pub fn sodium(position: Vec3) -> Self {
        Self { position, color: [1.0, 0.667, 0.0], intensity: 800.0, range: 60.0 }
    }
}

/// Light that toggles on/off after a random delay in [0.1, 1.0) seconds
#[derive(Debug, Clone)]
pub struct FlickerLight {
    pub light: PointLight,
    lit: bool,
    timer: f32,
    next_change: f32,
}

impl FlickerLight {
    pub fn new(position: Vec3) -> Self {
        Self {
            light: PointLight::white(position, FLICKER_ON_INTENSITY, 100.0),
            lit: true,
            timer: 0.0,
            next_change: 0.0,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Advance the timer; `roll` yields a uniform sample in [0, 1)
    pub fn update(&mut self, dt: f32, roll: &mut impl FnMut() -> f32) {
        self.timer += dt;
        if self.timer > self.next_change {
            self.timer = 0.0;
            self.next_change = 0.1 + roll() * 0.9;
            self.lit = !self.lit;
            self.light.intensity = if self.lit { FLICKER_ON_INTENSITY } else { 0.0 };
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirenSpinner {
    pub position: Vec3,
    /// Radians about Y
    pub angle: f32,
}

impl SirenSpinner {
    pub fn new(position: Vec3) -> Self {
        Self { position, angle: 0.0 }
    }

    pub fn update(&mut self, dt: f32) {
        self.angle = (self.angle + SIREN_SPIN_RATE * dt) % std::f32::consts::TAU;
    }

    /// Horizontal directions of the red and blue beams
    pub fn beams(&self) -> (Vec3, Vec3) {
        let red = Vec3::new(self.angle.cos(), 0.0, -self.angle.sin());
        (red, -red)
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub broken_lamp: FlickerLight,
    pub siren: Option<SirenSpinner>,
    pub street_lights: Vec<PointLight>,
    broken_lamp_placed: bool,
    /// Dedup keys of accepted street lights
    street_light_keys: Vec<Vec3>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            broken_lamp: FlickerLight::new(Vec3::ZERO),
            siren: None,
            street_lights: Vec::new(),
            broken_lamp_placed: false,
            street_light_keys: Vec::new(),
        }
    }

    /// Hang the broken light off the first lamp found. Later lamps are ignored.
    pub fn place_broken_lamp(&mut self, lamp_position: Vec3) -> bool {
        if self.broken_lamp_placed {
            return false;
        }
        self.broken_lamp.light.position = lamp_position + BROKEN_LAMP_OFFSET;
        self.broken_lamp_placed = true;
        true
    }

    pub fn has_broken_lamp(&self) -> bool {
        self.broken_lamp_placed
    }

    /// Mount the siren on the first lightbar found
    pub fn place_siren(&mut self, lightbar_position: Vec3) -> bool {
        if self.siren.is_some() {
            return false;
        }
        self.siren = Some(SirenSpinner::new(lightbar_position + SIREN_OFFSET));
        true
    }

    /// Add a street light unless one already exists near `key`.
    ///
    /// Lamp models are split into several meshes; `key` identifies the pole so
    /// each one is lit once.
    pub fn add_street_light(&mut self, key: Vec3, light: PointLight) -> bool {
        let merge_sq = STREET_LIGHT_MERGE_DISTANCE * STREET_LIGHT_MERGE_DISTANCE;
        if self.street_light_keys.iter().any(|k| k.distance_squared(key) < merge_sq) {
            return false;
        }
        self.street_light_keys.push(key);
        self.street_lights.push(light);
        true
    }

    /// Per-frame update using macroquad's global RNG for the flicker timing
    pub fn update(&mut self, dt: f32) {
        self.update_with(dt, &mut || macroquad::rand::gen_range(0.0f32, 1.0f32));
    }

    pub fn update_with(&mut self, dt: f32, roll: &mut impl FnMut() -> f32) {
        if let Some(siren) = self.siren.as_mut() {
            siren.update(dt);
        }
        self.broken_lamp.update(dt, roll);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
