//! Level scene description and one-time build
//!
//! A level is a flat list of named nodes, each referring to its parent by
//! index, plus standalone props placed directly in world space. Building a
//! level composes every node's world transform once, derives the obstacle
//! registry, and places the animated environment pieces. Nothing here runs
//! per frame.

use serde::{Deserialize, Serialize};

use crate::game::animation::AnimationClip;
use crate::game::bounds::Aabb;
use crate::game::environment::{Environment, PointLight};
use crate::game::obstacles::{classify_node_name, NodeCategory, ObstacleRegistry};
use crate::game::transform::{GlobalTransform, Transform};
use crate::math::Vec3;

/// Police-car lightbar: hidden, replaced by the siren
const LIGHTBAR_TAG: &str = "chapman73_lightbar";
/// Police-car clutter: hidden, never blocks
const COPSTUFF_TAG: &str = "chapman73_copstuff";
/// Nodes whose own name has this become the broken lamp (first one only)
const LAMP_TAG: &str = "lamp";
const PARK_LIGHT_TAG: &str = "parklight";

/// Street light bulb, in the lamp's local space
const STREET_LIGHT_LOCAL: Vec3 = Vec3::new(0.0, 3.8, 0.0);
/// Street light dedup key offset from the lamp's world pivot
const STREET_LIGHT_KEY_OFFSET: Vec3 = Vec3::new(0.0, 3.6, 0.0);

/// One node of the level hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Index of the parent node; must be lower than this node's own index
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub transform: Transform,
    /// Local-space mesh bounds. Nodes without bounds only group children.
    #[serde(default)]
    pub bounds: Option<Aabb>,
    /// Authored category; classified from the node and parent names when absent
    #[serde(default)]
    pub category: Option<NodeCategory>,
}

/// A model placed directly in the world (not part of the town hierarchy).
/// Its world box is used as an obstacle verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandaloneProp {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub bounds: Aabb,
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub name: String,
    /// Transform applied to the whole node hierarchy
    #[serde(default)]
    pub root: Transform,
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub props: Vec<StandaloneProp>,
    /// Clips available on the character model shared by the player and stalker
    #[serde(default)]
    pub actor_clips: Vec<AnimationClip>,
}

/// A visible box for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct SceneryBox {
    pub name: String,
    pub category: NodeCategory,
    pub bounds: Aabb,
}

/// Everything the runtime needs from a loaded level
#[derive(Debug, Clone)]
pub struct LevelBuild {
    pub name: String,
    pub obstacles: ObstacleRegistry,
    pub environment: Environment,
    pub scenery: Vec<SceneryBox>,
    pub actor_clips: Vec<AnimationClip>,
}

impl LevelDescription {
    /// World transform of every node, in node order.
    ///
    /// Assumes parents precede children (checked by level validation);
    /// a node pointing forward is treated as a root.
    pub fn world_transforms(&self) -> Vec<GlobalTransform> {
        let root = GlobalTransform::from_transform(&self.root);
        let mut globals: Vec<GlobalTransform> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let parent = node
                .parent
                .and_then(|p| globals.get(p))
                .copied()
                .unwrap_or(root);
            globals.push(GlobalTransform::from_parent_and_local(&parent, &node.transform));
        }
        globals
    }

    fn parent_name(&self, node: &SceneNode) -> &str {
        node.parent
            .and_then(|p| self.nodes.get(p))
            .map(|p| p.name.as_str())
            .unwrap_or("")
    }

    /// Derive obstacles, environment, and scenery
    pub fn build(&self) -> LevelBuild {
        let globals = self.world_transforms();
        let mut obstacles = ObstacleRegistry::new();
        let mut environment = Environment::new();
        let mut scenery = Vec::new();

        for (node, global) in self.nodes.iter().zip(&globals) {
            let Some(local_bounds) = node.bounds else {
                continue;
            };
            let name = node.name.to_lowercase();
            let pivot = global.position();

            if name.contains(LIGHTBAR_TAG) {
                if environment.place_siren(pivot) {
                    log::debug!("siren mounted on '{}'", node.name);
                }
                continue;
            }
            if name.contains(COPSTUFF_TAG) {
                continue;
            }

            let parent_name = self.parent_name(node);
            let full_name = format!("{} {}", name, parent_name.to_lowercase());

            let broken = name.contains(LAMP_TAG) && environment.place_broken_lamp(pivot);
            if broken {
                log::debug!("broken lamp at '{}'", node.name);
            } else if full_name.contains(LAMP_TAG) || full_name.contains(PARK_LIGHT_TAG) {
                let light = PointLight::sodium(global.transform_point(STREET_LIGHT_LOCAL));
                environment.add_street_light(pivot + STREET_LIGHT_KEY_OFFSET, light);
            }

            let category = node
                .category
                .unwrap_or_else(|| classify_node_name(&node.name, parent_name));
            let world_bounds = global.transform_aabb(&local_bounds);
            obstacles.push_node(category, world_bounds, pivot);
            scenery.push(SceneryBox {
                name: node.name.clone(),
                category,
                bounds: world_bounds,
            });
        }

        for prop in &self.props {
            let transform = Transform {
                position: prop.position,
                rotation: Vec3::ZERO,
                scale: prop.scale,
            };
            let world_bounds = GlobalTransform::from_transform(&transform).transform_aabb(&prop.bounds);
            obstacles.push(world_bounds);
            scenery.push(SceneryBox {
                name: prop.name.clone(),
                category: NodeCategory::Prop,
                bounds: world_bounds,
            });
        }

        log::info!(
            "level '{}': {} nodes, {} obstacles, {} street lights",
            self.name,
            self.nodes.len(),
            obstacles.len(),
            environment.street_lights.len()
        );

        LevelBuild {
            name: self.name.clone(),
            obstacles,
            environment,
            scenery,
            actor_clips: self.actor_clips.clone(),
        }
    }
}
