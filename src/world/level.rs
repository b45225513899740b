//! Level loading
//!
//! Uses RON (Rusty Object Notation) for human-readable level files.
//! Every level is validated before use so a bad file fails at startup
//! rather than producing broken collision.

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::{LevelDescription, SceneNode};
use crate::game::transform::Transform;
use crate::math::Vec3;

/// Built-in town, embedded so the binary runs without asset files
const REFERENCE_LEVEL: &str = include_str!("../../assets/levels/town.ron");

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of nodes in a level
    pub const MAX_NODES: usize = 4096;
    /// Maximum number of standalone props
    pub const MAX_PROPS: usize = 256;
    /// Maximum number of animation clips on the character model
    pub const MAX_CLIPS: usize = 64;
    /// Maximum string length for node names
    pub const MAX_STRING_LEN: usize = 256;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Error type for level loading
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

fn is_valid_coord(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn is_valid_vec3(v: Vec3) -> bool {
    is_valid_coord(v.x) && is_valid_coord(v.y) && is_valid_coord(v.z)
}

fn validate_name(name: &str, context: &str) -> Result<(), String> {
    if name.len() > limits::MAX_STRING_LEN {
        return Err(format!("{}: name too long ({} > {})", context, name.len(), limits::MAX_STRING_LEN));
    }
    Ok(())
}

fn validate_transform(t: &Transform, context: &str) -> Result<(), String> {
    if !is_valid_vec3(t.position) || !is_valid_vec3(t.rotation) {
        return Err(format!("{}: invalid transform", context));
    }
    if !(is_valid_coord(t.scale) && t.scale > 0.0) {
        return Err(format!("{}: scale must be positive, got {}", context, t.scale));
    }
    Ok(())
}

fn validate_node(node: &SceneNode, index: usize) -> Result<(), String> {
    let context = format!("node {} '{}'", index, node.name);
    validate_name(&node.name, &context)?;

    // Parents must come first; this also rules out cycles
    if let Some(parent) = node.parent {
        if parent >= index {
            return Err(format!("{}: parent {} must precede the node", context, parent));
        }
    }

    validate_transform(&node.transform, &context)?;

    if let Some(bounds) = node.bounds {
        if !is_valid_vec3(bounds.min) || !is_valid_vec3(bounds.max) {
            return Err(format!("{}: invalid bounds", context));
        }
        if !bounds.is_valid() {
            return Err(format!("{}: bounds min exceeds max", context));
        }
    }
    Ok(())
}

/// Validate level data after deserialization
pub fn validate_level(level: &LevelDescription) -> Result<(), LevelError> {
    if level.nodes.len() > limits::MAX_NODES {
        return Err(LevelError::ValidationError(format!(
            "too many nodes ({} > {})", level.nodes.len(), limits::MAX_NODES
        )));
    }
    if level.props.len() > limits::MAX_PROPS {
        return Err(LevelError::ValidationError(format!(
            "too many props ({} > {})", level.props.len(), limits::MAX_PROPS
        )));
    }
    if level.actor_clips.len() > limits::MAX_CLIPS {
        return Err(LevelError::ValidationError(format!(
            "too many clips ({} > {})", level.actor_clips.len(), limits::MAX_CLIPS
        )));
    }

    validate_name(&level.name, "level").map_err(LevelError::ValidationError)?;
    validate_transform(&level.root, "root").map_err(LevelError::ValidationError)?;

    for (i, node) in level.nodes.iter().enumerate() {
        validate_node(node, i).map_err(LevelError::ValidationError)?;
    }

    for (i, prop) in level.props.iter().enumerate() {
        let context = format!("prop {} '{}'", i, prop.name);
        validate_name(&prop.name, &context).map_err(LevelError::ValidationError)?;
        let transform = Transform { position: prop.position, rotation: Vec3::ZERO, scale: prop.scale };
        validate_transform(&transform, &context).map_err(LevelError::ValidationError)?;
        if !prop.bounds.is_valid() || !is_valid_vec3(prop.bounds.min) || !is_valid_vec3(prop.bounds.max) {
            return Err(LevelError::ValidationError(format!("{}: invalid bounds", context)));
        }
    }

    for clip in &level.actor_clips {
        validate_name(&clip.name, "clip").map_err(LevelError::ValidationError)?;
        if !(clip.duration.is_finite() && clip.duration >= 0.0) {
            return Err(LevelError::ValidationError(format!(
                "clip '{}': invalid duration {}", clip.name, clip.duration
            )));
        }
    }

    Ok(())
}

/// Load a level from a RON file
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelDescription, LevelError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let level: LevelDescription = match ron::from_str(&contents) {
        Ok(l) => l,
        Err(e) => {
            log::error!("RON parse error in {}: {}", path.display(), e);
            let pos = e.position;
            // Show context around the error
            if let Some(line) = contents.lines().nth(pos.line.saturating_sub(1)) {
                log::error!("  Line {}: {}", pos.line, line.trim_end());
            }
            return Err(e.into());
        }
    };

    validate_level(&level)?;
    log::info!("loaded level '{}' from {}", level.name, path.display());
    Ok(level)
}

/// Load a level from a RON string (for embedded levels or testing)
pub fn load_level_from_str(s: &str) -> Result<LevelDescription, LevelError> {
    let level: LevelDescription = ron::from_str(s)?;
    validate_level(&level)?;
    Ok(level)
}

/// The built-in town
pub fn reference_level() -> Result<LevelDescription, LevelError> {
    load_level_from_str(REFERENCE_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::AnimationClip;
    use crate::game::bounds::Aabb;
    use crate::game::movement::PlayerSettings;
    use crate::game::player::{IDLE_CLIP, WALK_CLIP};

    #[test]
    fn test_reference_level_loads() {
        let level = reference_level().unwrap();
        assert_eq!(level.root.scale, 5.0);
        assert!(level.actor_clips.iter().any(|c| c.name == WALK_CLIP));
        assert!(level.actor_clips.iter().any(|c| c.name == IDLE_CLIP));

        let build = level.build();
        assert!(!build.obstacles.is_empty());
        assert!(build.environment.siren.is_some());
        assert!(!build.environment.street_lights.is_empty());
    }

    #[test]
    fn test_reference_level_spawn_is_clear() {
        let build = reference_level().unwrap().build();
        let spawn = Aabb::from_center_size(PlayerSettings::START, PlayerSettings::SIZE);
        assert!(build.obstacles.iter().all(|o| !o.bounds().intersects(&spawn)));
    }

    #[test]
    fn test_reference_level_drops_floating_sign() {
        let build = reference_level().unwrap().build();
        let sign = build.scenery.iter().find(|s| s.name == "House_02_Sign").unwrap();
        assert!(sign.bounds.min.y > 10.0);
        assert!(build.obstacles.iter().all(|o| o.bounds().min.y <= 10.0));
    }

    #[test]
    fn test_reference_level_includes_trash_can() {
        let build = reference_level().unwrap().build();
        let trash = build.scenery.iter().find(|s| s.name == "trash_can").unwrap();
        assert!(build.obstacles.iter().any(|o| *o.bounds() == trash.bounds));
    }

    #[test]
    fn test_rejects_forward_parent() {
        let ron = r#"(
            name: "bad",
            nodes: [
                (name: "a", parent: Some(1)),
                (name: "b"),
            ],
        )"#;
        let err = load_level_from_str(ron).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_self_parent_and_bad_scale() {
        let ron = r#"(name: "bad", nodes: [(name: "a", parent: Some(0))])"#;
        assert!(matches!(load_level_from_str(ron), Err(LevelError::ValidationError(_))));

        let ron = r#"(name: "bad", nodes: [(name: "a", transform: (scale: 0.0))])"#;
        assert!(matches!(load_level_from_str(ron), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let ron = r#"(name: "bad", nodes: [(
            name: "house",
            bounds: Some((min: (x: 1.0, y: 0.0, z: 0.0), max: (x: 0.0, y: 1.0, z: 1.0))),
        )])"#;
        assert!(matches!(load_level_from_str(ron), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(load_level_from_str("(name: "), Err(LevelError::ParseError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.ron");
        let level = LevelDescription {
            name: "tiny".to_string(),
            root: Transform::IDENTITY,
            nodes: Vec::new(),
            props: Vec::new(),
            actor_clips: vec![AnimationClip { name: IDLE_CLIP.to_string(), duration: 2.0 }],
        };
        fs::write(&path, ron::ser::to_string_pretty(&level, ron::ser::PrettyConfig::new()).unwrap()).unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded, level);

        assert!(matches!(load_level(dir.path().join("missing.ron")), Err(LevelError::IoError(_))));
    }
}
