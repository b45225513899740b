//! World module - static town level
//!
//! - Scene description: named node hierarchy plus standalone props
//! - One-time build into obstacles, environment, and scenery
//! - RON loading with validation limits

mod level;
mod scene;

pub use level::*;
pub use scene::*;
