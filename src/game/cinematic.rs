//! Cinematic Sequencer
//!
//! A fixed, ordered table of timed shots. While a sequence plays, each
//! `update` interpolates the camera for the current shot and places the
//! stalker according to that shot's choreography. Shots advance by elapsed
//! time, at most one boundary per update, and the sequence returns to idle
//! after the last shot.
//!
//! The shot table is authored in RON and validated once at startup; a bad
//! table is a startup error, never a per-frame one.

use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{lerp, Vec3};
use super::animation::AnimState;
use super::camera::CameraPose;
use super::player::Actor;

/// Reference sequence, embedded so the binary runs without asset files
const REFERENCE_SHOTS: &str = include_str!("../../assets/cinematic/shots.ron");

#[derive(Debug, Error)]
pub enum ShotTableError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    #[error("shot table is empty")]
    Empty,
    #[error("shot {index} ('{label}'): duration must be positive and finite, got {duration}")]
    InvalidDuration { index: usize, label: String, duration: f32 },
    #[error("shot {index} ('{label}'): orbit radius must be positive, got {radius}")]
    InvalidRadius { index: usize, label: String, radius: f32 },
    #[error("shot {index} ('{label}'): non-finite coordinate")]
    NonFinite { index: usize, label: String },
}

/// Where a linear shot looks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LookDirection {
    /// Same direction for the whole shot
    Fixed(Vec3),
    /// Direction interpolated from `from` to `to` over the shot
    Sweep { from: Vec3, to: Vec3 },
}

impl LookDirection {
    pub fn at(&self, progress: f32) -> Vec3 {
        match *self {
            LookDirection::Fixed(direction) => direction,
            LookDirection::Sweep { from, to } => from.lerp(to, progress),
        }
    }
}

/// Camera geometry for one shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotKind {
    /// Dolly from `start` to `end` looking along `look`
    Linear { start: Vec3, end: Vec3, look: LookDirection },
    /// Circle `center` at `radius`, `height` above it, always looking at it.
    /// Angles are radians in the XZ plane.
    Orbit {
        center: Vec3,
        radius: f32,
        height: f32,
        angle_start: f32,
        angle_end: f32,
    },
}

/// What the stalker does during a shot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Choreography {
    /// Stalker hidden
    #[default]
    None,
    /// Stalker walks the line `from` -> `to` over the shot
    StalkerWalk { from: Vec3, to: Vec3, facing: Vec3 },
    /// Stalker stands at `at`
    StalkerIdle { at: Vec3, facing: Vec3 },
}

impl Choreography {
    /// Place, show, and animate the stalker for `progress` through the shot
    pub fn apply(&self, progress: f32, stalker: &mut Actor) {
        match *self {
            Choreography::None => {
                stalker.visible = false;
            }
            Choreography::StalkerWalk { from, to, facing } => {
                stalker.visible = true;
                stalker.place(from.lerp(to, progress), facing);
                stalker.animation.set_state(AnimState::Walk);
            }
            Choreography::StalkerIdle { at, facing } => {
                stalker.visible = true;
                stalker.place(at, facing);
                stalker.animation.set_state(AnimState::Idle);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotDescriptor {
    #[serde(default)]
    pub label: String,
    /// Seconds
    pub duration: f32,
    pub kind: ShotKind,
    #[serde(default)]
    pub choreography: Choreography,
}

impl ShotDescriptor {
    /// Camera pose at `progress` in [0, 1]
    pub fn camera_pose(&self, progress: f32) -> CameraPose {
        match self.kind {
            ShotKind::Linear { start, end, look } => {
                CameraPose::look_along(start.lerp(end, progress), look.at(progress))
            }
            ShotKind::Orbit { center, radius, height, angle_start, angle_end } => {
                let angle = lerp(angle_start, angle_end, progress);
                let offset = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);
                CameraPose::look_at(center + offset, center)
            }
        }
    }

    fn points(&self) -> Vec<Vec3> {
        let mut points = match self.kind {
            ShotKind::Linear { start, end, look } => match look {
                LookDirection::Fixed(d) => vec![start, end, d],
                LookDirection::Sweep { from, to } => vec![start, end, from, to],
            },
            ShotKind::Orbit { center, .. } => vec![center],
        };
        match self.choreography {
            Choreography::None => {}
            Choreography::StalkerWalk { from, to, facing } => points.extend([from, to, facing]),
            Choreography::StalkerIdle { at, facing } => points.extend([at, facing]),
        }
        points
    }
}

/// Ordered, validated list of shots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotTable {
    shots: Vec<ShotDescriptor>,
}

impl ShotTable {
    /// Parse and validate a RON shot table
    pub fn from_ron_str(s: &str) -> Result<Self, ShotTableError> {
        let table: ShotTable = ron::from_str(s)?;
        table.validate()?;
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShotTableError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ShotTableError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_ron_str(&contents)?;
        log::info!("loaded {} shots ({:.1}s) from {}", table.len(), table.total_duration(), path.display());
        Ok(table)
    }

    /// The built-in town sequence
    pub fn reference() -> Result<Self, ShotTableError> {
        Self::from_ron_str(REFERENCE_SHOTS)
    }

    pub fn validate(&self) -> Result<(), ShotTableError> {
        if self.is_empty() {
            return Err(ShotTableError::Empty);
        }
        for (index, shot) in self.iter().enumerate() {
            if !(shot.duration.is_finite() && shot.duration > 0.0) {
                return Err(ShotTableError::InvalidDuration {
                    index,
                    label: shot.label.clone(),
                    duration: shot.duration,
                });
            }
            if let ShotKind::Orbit { radius, height, angle_start, angle_end, .. } = shot.kind {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ShotTableError::InvalidRadius {
                        index,
                        label: shot.label.clone(),
                        radius,
                    });
                }
                if ![height, angle_start, angle_end].iter().all(|v| v.is_finite()) {
                    return Err(ShotTableError::NonFinite { index, label: shot.label.clone() });
                }
            }
            if !shot.points().iter().all(|p| p.is_finite()) {
                return Err(ShotTableError::NonFinite { index, label: shot.label.clone() });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShotDescriptor> {
        self.shots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShotDescriptor> {
        self.shots.iter()
    }

    pub fn total_duration(&self) -> f32 {
        self.iter().map(|s| s.duration).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CinematicState {
    Idle,
    PlayingShot(usize),
}

/// Shot-by-shot state machine over a [`ShotTable`]
#[derive(Debug, Clone)]
pub struct CinematicSequencer {
    table: ShotTable,
    state: CinematicState,
    elapsed_in_shot: f32,
    progress: f32,
}

impl CinematicSequencer {
    pub fn new(table: ShotTable) -> Self {
        Self {
            table,
            state: CinematicState::Idle,
            elapsed_in_shot: 0.0,
            progress: 0.0,
        }
    }

    /// Begin at the first shot with the stalker hidden
    pub fn start(&mut self, stalker: &mut Actor) {
        self.state = CinematicState::PlayingShot(0);
        self.elapsed_in_shot = 0.0;
        self.progress = 0.0;
        stalker.visible = false;
        log::info!(
            "cinematic started: {} shots, {:.1}s",
            self.table.len(),
            self.table.total_duration()
        );
    }

    /// Advance by `dt`, writing the camera pose and stalker placement.
    ///
    /// Progress through a shot is clamped at 1, and at most one shot
    /// boundary is crossed per call no matter how large `dt` is. Does
    /// nothing while idle.
    pub fn update(&mut self, dt: f32, camera: &mut CameraPose, stalker: &mut Actor) -> CinematicState {
        let CinematicState::PlayingShot(index) = self.state else {
            return self.state;
        };
        let Some(shot) = self.table.get(index) else {
            self.stop(stalker);
            return self.state;
        };

        self.elapsed_in_shot += dt;
        let progress = (self.elapsed_in_shot / shot.duration).min(1.0);
        self.progress = progress;

        *camera = shot.camera_pose(progress);
        shot.choreography.apply(progress, stalker);

        if progress >= 1.0 {
            let next = index + 1;
            self.elapsed_in_shot = 0.0;
            if next < self.table.len() {
                log::debug!("cinematic shot {} -> {}", index, next);
                self.state = CinematicState::PlayingShot(next);
            } else {
                self.stop(stalker);
            }
        }
        self.state
    }

    /// End the sequence (natural completion or abort).
    ///
    /// The stalker is always left visible afterwards.
    pub fn stop(&mut self, stalker: &mut Actor) {
        if let CinematicState::PlayingShot(index) = self.state {
            log::info!("cinematic ended at shot {}", index);
        }
        self.state = CinematicState::Idle;
        self.elapsed_in_shot = 0.0;
        self.progress = 0.0;
        stalker.visible = true;
    }

    pub fn state(&self) -> CinematicState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, CinematicState::PlayingShot(_))
    }

    /// Progress the last update rendered its shot at, in [0, 1].
    ///
    /// Stays at 1 after an update that finished a shot, even though the
    /// state has already moved on to the next one. Reset to 0 by `start`
    /// and `stop`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[cfg(test)]
    pub fn elapsed_in_shot(&self) -> f32 {
        self.elapsed_in_shot
    }

    #[cfg(test)]
    pub fn table(&self) -> &ShotTable {
        &self.table
    }
}
