//! Obstacle Registry
//!
//! Static collidable boxes derived once from level geometry. The registry is
//! append-only: obstacles are never removed or mutated after they are added,
//! and anything appended later is immediately visible to queries.
//!
//! Derivation rules for a blocking node's world box:
//! 1. Reject boxes whose bottom floats above `FLOATING_HEIGHT`
//! 2. Set the top to `min.y + HEIGHT_CAP` so only ground-level geometry blocks
//! 3. Trees swap their canopy-dominated footprint for a square trunk around the pivot

use serde::{Deserialize, Serialize};
use crate::math::Vec3;
use super::bounds::{Aabb, within_reach};

/// Boxes starting above this height never block ground movement
pub const FLOATING_HEIGHT: f32 = 10.0;

/// Obstacles are at most this tall, measured from their bottom
pub const HEIGHT_CAP: f32 = 10.0;

/// Half width of the square trunk footprint substituted for trees
pub const TRUNK_HALF_WIDTH: f32 = 2.0;

/// Semantic category of a level node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Walkable surfaces (streets, driveways, pavement)
    Ground,
    /// Leaves and foliage cards
    Leaf,
    /// Bushes, hedges, shrubs
    Bush,
    House,
    Fence,
    /// Benches, swings, lamps, parked cars, trash cans
    Prop,
    Tree,
    /// Anything not matched by a keyword
    Other,
}

impl NodeCategory {
    /// Does geometry of this category stop the player?
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            NodeCategory::House | NodeCategory::Fence | NodeCategory::Prop | NodeCategory::Tree
        )
    }
}

const GROUND_KEYWORDS: &[&str] = &["street", "driveway", "pavement", "ground", "road"];
const LEAF_KEYWORDS: &[&str] = &["leaf", "leaves", "foliage"];
const BUSH_KEYWORDS: &[&str] = &["bush", "shrub"];
const TREE_KEYWORDS: &[&str] = &["tree", "log", "birch", "fir"];
const HOUSE_KEYWORDS: &[&str] = &["house"];
const FENCE_KEYWORDS: &[&str] = &["fence"];
const PROP_KEYWORDS: &[&str] = &["bench", "swings", "lamp", "chapman", "trash"];

fn mentions(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Classify a node by case-insensitive keyword match on its own name and its
/// parent's name.
///
/// Non-blocking categories win over blocking ones (a "tree_leaves" node is a
/// leaf, not a tree). Among blocking matches, tree wins so that the trunk
/// footprint rule applies.
pub fn classify_node_name(name: &str, parent_name: &str) -> NodeCategory {
    let full = format!("{} {}", name, parent_name).to_lowercase();

    if mentions(&full, GROUND_KEYWORDS) {
        NodeCategory::Ground
    } else if mentions(&full, LEAF_KEYWORDS) {
        NodeCategory::Leaf
    } else if mentions(&full, BUSH_KEYWORDS) {
        NodeCategory::Bush
    } else if mentions(&full, TREE_KEYWORDS) {
        NodeCategory::Tree
    } else if mentions(&full, HOUSE_KEYWORDS) {
        NodeCategory::House
    } else if mentions(&full, FENCE_KEYWORDS) {
        NodeCategory::Fence
    } else if mentions(&full, PROP_KEYWORDS) {
        NodeCategory::Prop
    } else {
        NodeCategory::Other
    }
}

/// Turn a node's world box into an obstacle box, or `None` if the node
/// should not block.
///
/// `pivot` is the node's world-space origin, used for the tree trunk.
pub fn derive_obstacle(category: NodeCategory, world_bounds: Aabb, pivot: Vec3) -> Option<Aabb> {
    if !category.is_blocking() {
        return None;
    }

    let mut bounds = world_bounds;

    if bounds.min.y > FLOATING_HEIGHT {
        return None;
    }

    bounds.max.y = bounds.min.y + HEIGHT_CAP;

    if category == NodeCategory::Tree {
        bounds.min.x = pivot.x - TRUNK_HALF_WIDTH;
        bounds.max.x = pivot.x + TRUNK_HALF_WIDTH;
        bounds.min.z = pivot.z - TRUNK_HALF_WIDTH;
        bounds.max.z = pivot.z + TRUNK_HALF_WIDTH;
    }

    Some(bounds)
}

/// Relative slack on the widened broad-phase reach
const REACH_SLACK: f32 = 1e-4;

/// A static collidable box with its center cached at creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    bounds: Aabb,
    center: Vec3,
    half_diagonal: f32,
}

impl Obstacle {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            center: bounds.center(),
            half_diagonal: bounds.half_diagonal(),
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Squared broad-phase radius against a query with the given half diagonal.
    ///
    /// At least `radius`; widened for obstacles large enough that their box
    /// could touch the query while their center is farther away.
    pub fn reach_sq(&self, radius: f32, query_half_diagonal: f32) -> f32 {
        // Boxes touching at a corner sit exactly at the half-diagonal sum;
        // the slack absorbs rounding in the two square roots.
        let touching = (self.half_diagonal + query_half_diagonal) * (1.0 + REACH_SLACK);
        let reach = radius.max(touching);
        reach * reach
    }
}

/// Append-only list of static obstacles
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a box as-is (no derivation rules applied)
    pub fn push(&mut self, bounds: Aabb) -> &Obstacle {
        self.obstacles.push(Obstacle::new(bounds));
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Apply the derivation rules and append the result, if any.
    /// Returns whether an obstacle was added.
    pub fn push_node(&mut self, category: NodeCategory, world_bounds: Aabb, pivot: Vec3) -> bool {
        match derive_obstacle(category, world_bounds, pivot) {
            Some(bounds) => {
                self.push(bounds);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Index of the first obstacle overlapping `query`, scanning in insertion
    /// order. Obstacles whose center is out of broad-phase reach of the query
    /// center are skipped without an exact test.
    pub fn first_hit(&self, query: &Aabb, broad_phase_radius: f32) -> Option<usize> {
        let query_center = query.center();
        let query_half_diagonal = query.half_diagonal();

        self.obstacles.iter().position(|obstacle| {
            let reach_sq = obstacle.reach_sq(broad_phase_radius, query_half_diagonal);
            within_reach(obstacle.center(), query_center, reach_sq)
                && query.intersects(&obstacle.bounds)
        })
    }
}
