//! Game core
//!
//! Everything that runs per frame, plus the static data it runs against:
//! - Obstacles: append-only collision boxes derived once from the level
//! - Movement: binary accept/reject resolver for the player
//! - Animation: walk/idle crossfade per actor
//! - Cinematic: timed shot sequencer that drives the camera and the stalker
//! - Runtime: frame ordering and the flags that choose between the above
//!
//! Single-threaded; each piece of mutable state has exactly one writer per
//! frame step.

pub mod bounds;
pub mod transform;
pub mod obstacles;
pub mod animation;
pub mod movement;
pub mod player;
pub mod camera;
pub mod cinematic;
pub mod environment;
pub mod event;
pub mod runtime;

// Re-export main types
pub use cinematic::ShotTable;
pub use event::{CinematicEvent, HudStatus};
pub use runtime::{GameState, RuntimeOptions};
