//! Actor Animation State
//!
//! Two-state (walk/idle) crossfade controller over named skinned-mesh clips.
//! Each actor owns its own controller over its own clip set.
//!
//! Missing clips are not an error: switching to a state with no bound clip
//! is a no-op and the actor keeps whatever it was playing.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Default crossfade duration between clips (seconds)
pub const CROSSFADE_SECONDS: f32 = 0.2;

/// Animation states an actor can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimState {
    Walk,
    Idle,
}

impl AnimState {
    pub fn label(self) -> &'static str {
        match self {
            AnimState::Walk => "walk",
            AnimState::Idle => "idle",
        }
    }
}

/// A named clip from an actor model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Loop length in seconds
    pub duration: f32,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Fade {
    fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state for one clip: looping time plus blend weight
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: AnimationClip,
    time: f32,
    weight: f32,
    playing: bool,
    fade: Option<Fade>,
}

impl ClipAction {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            weight: 0.0,
            playing: false,
            fade: None,
        }
    }

    /// Rewind to the start and cancel any fade in progress
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.fade = None;
        self
    }

    /// Ramp weight from 0 to 1 over `duration`
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.weight = 0.0;
        self.fade = Some(Fade { from: 0.0, to: 1.0, elapsed: 0.0, duration });
        self
    }

    /// Ramp weight from its current value to 0 over `duration`
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade { from: self.weight, to: 0.0, elapsed: 0.0, duration });
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.playing = true;
        self
    }

    /// Start at full weight with no fade
    fn play_immediately(&mut self) {
        self.reset();
        self.weight = 1.0;
        self.playing = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        if self.clip.duration > 0.0 {
            self.time = (self.time + dt) % self.clip.duration;
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            self.weight = fade.weight();
            if fade.done() {
                let finished = *fade;
                self.fade = None;
                // Fully faded out clips stop advancing
                if finished.to == 0.0 {
                    self.playing = false;
                }
            }
        }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Position within the loop in [0, 1)
    pub fn phase(&self) -> f32 {
        if self.clip.duration > 0.0 {
            self.time / self.clip.duration
        } else {
            0.0
        }
    }
}

/// Walk/idle crossfade controller
#[derive(Debug, Clone)]
pub struct AnimationController {
    actions: HashMap<AnimState, ClipAction>,
    active: Option<AnimState>,
    crossfade: f32,
}

impl AnimationController {
    /// Controller with no clips bound (every state switch is a no-op)
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
            active: None,
            crossfade: CROSSFADE_SECONDS,
        }
    }

    /// Bind states to clips looked up by name in `library`.
    ///
    /// Bindings whose clip is missing are skipped. If an idle clip is bound it
    /// starts playing at full weight, matching a freshly loaded model.
    pub fn from_library(library: &[AnimationClip], bindings: &[(AnimState, &str)]) -> Self {
        let mut controller = Self::empty();
        for (state, clip_name) in bindings {
            match library.iter().find(|clip| clip.name == *clip_name) {
                Some(clip) => {
                    controller.actions.insert(*state, ClipAction::new(clip.clone()));
                }
                None => {
                    log::warn!("animation clip '{}' not found; {} state disabled", clip_name, state.label());
                }
            }
        }

        if let Some(idle) = controller.actions.get_mut(&AnimState::Idle) {
            idle.play_immediately();
            controller.active = Some(AnimState::Idle);
        }
        controller
    }

    /// Switch to `state`, crossfading from the current clip.
    ///
    /// No-op if `state` is already active or has no clip bound.
    pub fn set_state(&mut self, state: AnimState) {
        if self.active == Some(state) || !self.actions.contains_key(&state) {
            return;
        }

        let crossfade = self.crossfade;
        if let Some(previous) = self.active.and_then(|s| self.actions.get_mut(&s)) {
            previous.fade_out(crossfade);
        }
        if let Some(next) = self.actions.get_mut(&state) {
            next.reset().fade_in(crossfade).play();
        }
        self.active = Some(state);
    }

    /// Advance every playing clip
    pub fn update(&mut self, dt: f32) {
        for action in self.actions.values_mut() {
            action.update(dt);
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<AnimState> {
        self.active
    }

    /// Current blend weight of a state's clip (0 when unbound)
    pub fn weight(&self, state: AnimState) -> f32 {
        self.actions.get(&state).map(|a| a.weight()).unwrap_or(0.0)
    }

    pub fn action(&self, state: AnimState) -> Option<&ClipAction> {
        self.actions.get(&state)
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::empty()
    }
}
