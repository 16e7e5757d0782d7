//! Tile/world coordinate conversion and the room walkability matrix.
//!
//! The room is a fixed grid of square tiles. Tile coordinates are integer
//! column/row pairs with the origin at the top-left; world coordinates are
//! pixels. A tile's world position is its *center*, so tile (2, 12) sits at
//! world (80.0, 400.0). Converting world to tile floors the division, which
//! also maps positions slightly outside the map to out-of-bounds tiles
//! rather than clamping them.
//!
//! [`RoomGrid`] is the boolean blocked matrix the path planner searches. Its
//! border ring is blocked at construction and there is no way to unblock a
//! cell, so paths can never leave the map.

use serde::{Deserialize, Serialize};

/// Edge length of one tile in world pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Standard room width in tiles.
pub const MAP_WIDTH: i32 = 20;

/// Standard room height in tiles.
pub const MAP_HEIGHT: i32 = 15;

/// Convert a tile index to the world coordinate of the cell center.
pub fn tile_to_world(tile: i32) -> f32 {
    tile as f32 * TILE_SIZE + TILE_SIZE / 2.0
}

/// Convert a world coordinate to the tile index containing it.
pub fn world_to_tile(world: f32) -> i32 {
    (world / TILE_SIZE).floor() as i32
}

/// 2D world-space vector (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn distance_squared(&self, other: &Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Vec2) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    pub fn normalize(&self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

/// Grid cell coordinate (column, row), origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Tile { x, y }
    }

    /// World position of this tile's center.
    pub fn center(&self) -> Vec2 {
        Vec2::new(tile_to_world(self.x), tile_to_world(self.y))
    }

    /// Tile containing the given world position.
    pub fn from_world(world: Vec2) -> Tile {
        Tile::new(world_to_tile(world.x), world_to_tile(world.y))
    }
}

/// Boolean walkability matrix for one room.
///
/// `true` means blocked. The outer ring is blocked at construction; furniture
/// footprints are blocked once during setup via [`RoomGrid::block`]. The grid
/// is never mutated while a path is being computed.
#[derive(Debug, Clone)]
pub struct RoomGrid {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl RoomGrid {
    /// Create a grid with every border cell blocked and the interior open.
    pub fn bordered(width: i32, height: i32) -> Self {
        let mut grid = RoomGrid {
            width,
            height,
            blocked: vec![false; (width * height) as usize],
        };
        for y in 0..height {
            for x in 0..width {
                if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
                    let idx = grid.index(x, y);
                    grid.blocked[idx] = true;
                }
            }
        }
        grid
    }

    /// Standard room dimensions ([`MAP_WIDTH`] x [`MAP_HEIGHT`]).
    pub fn standard() -> Self {
        RoomGrid::bordered(MAP_WIDTH, MAP_HEIGHT)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Mark a cell as blocked. Out-of-bounds tiles are ignored.
    pub fn block(&mut self, tile: Tile) {
        if self.in_bounds(tile.x, tile.y) {
            let idx = self.index(tile.x, tile.y);
            self.blocked[idx] = true;
        }
    }

    /// A cell is walkable when it is inside the map and not blocked.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.blocked[self.index(x, y)]
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }
}
