//! Furniture definitions: footprints, interaction anchors, and radii.
//!
//! A furniture piece occupies zero or more footprint tiles (wall-mounted
//! objects like windows occupy none) and exposes one or more anchor tiles
//! from which an agent can interact with it. Anchors are ordered with the
//! primary anchor first. `category` is opaque data carried through to
//! consumers; nothing in the simulation branches on it.

use serde::{Deserialize, Serialize};

use crate::grid::{Tile, Vec2};

/// Direction an agent would face while using an anchor. Advisory only;
/// scoring does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

/// A standing spot adjacent to (or on) a furniture piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
}

impl Anchor {
    pub fn tile(&self) -> Tile {
        Tile::new(self.x, self.y)
    }

    /// World position of the anchor tile's center.
    pub fn center(&self) -> Vec2 {
        self.tile().center()
    }
}

/// One interactive object in the room catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureDef {
    pub id: String,
    pub label: String,
    pub category: String,
    /// Footprint cells blocked in the walkability matrix. May be empty.
    pub tiles: Vec<Tile>,
    /// Interaction spots, primary first. Never empty in a valid catalog.
    pub anchors: Vec<Anchor>,
    /// Qualification radius in tile units for proximity scoring.
    pub radius: f32,
}

impl FurnitureDef {
    /// The preferred anchor, used for affordance placement.
    pub fn primary_anchor(&self) -> Option<&Anchor> {
        self.anchors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_anchor_is_first() {
        let def = FurnitureDef {
            id: "desk".into(),
            label: "Desk".into(),
            category: "desk".into(),
            tiles: vec![Tile::new(9, 6)],
            anchors: vec![
                Anchor { x: 9, y: 8, facing: Facing::Up },
                Anchor { x: 8, y: 7, facing: Facing::Right },
            ],
            radius: 1.6,
        };
        let primary = def.primary_anchor().unwrap();
        assert_eq!(primary.tile(), Tile::new(9, 8));
        assert_eq!(primary.facing, Facing::Up);
    }

    #[test]
    fn test_anchor_center() {
        let anchor = Anchor { x: 2, y: 3, facing: Facing::Down };
        assert_eq!(anchor.center(), Vec2::new(80.0, 112.0));
    }
}
