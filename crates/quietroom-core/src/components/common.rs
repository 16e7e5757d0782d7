//! Spatial components shared by every entity kind.

use quietroom_logic::grid::{Tile, Vec2, TILE_SIZE};
use serde::{Deserialize, Serialize};

/// Walk speed in world pixels per second: four tiles per second.
pub const AVATAR_SPEED: f32 = TILE_SIZE * 4.0;

/// Position component - entity location in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub world: Vec2,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { world: Vec2::new(x, y) }
    }

    /// Position at the center of a tile.
    pub fn at_tile(tile: Tile) -> Self {
        Position { world: tile.center() }
    }

    /// Tile currently containing this position.
    pub fn tile(&self) -> Tile {
        Tile::from_world(self.world)
    }
}

/// Motion component - present only while the entity is walking.
///
/// Waypoints are world positions walked front to back at constant speed.
/// The component is removed when the last waypoint is reached; installing a
/// new one replaces the old motion wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub waypoints: Vec<Vec2>,
    /// Index of the next waypoint to reach.
    pub next: usize,
    /// Travel speed in pixels per second.
    pub speed: f32,
}

impl Motion {
    pub fn along(waypoints: Vec<Vec2>, speed: f32) -> Self {
        Motion { waypoints, next: 0, speed }
    }

    /// Single-waypoint motion straight to a world point.
    pub fn to_point(target: Vec2, speed: f32) -> Self {
        Motion { waypoints: vec![target], next: 0, speed }
    }
}

/// Avatar component - marks the player-controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub speed: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Avatar { speed: AVATAR_SPEED }
    }
}
