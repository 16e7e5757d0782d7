//! Furniture catalog: the room's data-driven contents.
//!
//! The catalog is loaded once from a JSON manifest and never mutated. The
//! manifest shipped with the crate lives at `data/room_catalog.json` in the
//! workspace root and describes the standard 20x15 room.

use quietroom_logic::furniture::FurnitureDef;
use quietroom_logic::grid::{MAP_HEIGHT, MAP_WIDTH};
use serde::{Deserialize, Serialize};

/// Manifest for the standard room, embedded at compile time.
const BUILTIN_MANIFEST: &str = include_str!("../../../data/room_catalog.json");

#[derive(Debug, Deserialize)]
struct RoomManifest {
    map: MapSpec,
    furniture: Vec<FurnitureDef>,
}

#[derive(Debug, Deserialize)]
struct MapSpec {
    width: i32,
    height: i32,
}

/// Validated, immutable furniture catalog plus the map it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    map_width: i32,
    map_height: i32,
    furniture: Vec<FurnitureDef>,
}

impl Catalog {
    /// Catalog with no furniture on the standard map. The state of a fresh
    /// engine before a room is set up.
    pub fn empty() -> Catalog {
        Catalog {
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            furniture: Vec::new(),
        }
    }

    /// Parse and validate a manifest.
    pub fn from_json(json: &str) -> Result<Catalog, CatalogError> {
        let manifest: RoomManifest = serde_json::from_str(json)?;
        Catalog::from_parts(manifest.map.width, manifest.map.height, manifest.furniture)
    }

    /// Build a catalog from already-parsed pieces, applying the same
    /// validation as [`Catalog::from_json`].
    pub fn from_parts(
        map_width: i32,
        map_height: i32,
        furniture: Vec<FurnitureDef>,
    ) -> Result<Catalog, CatalogError> {
        // A bordered map needs at least one interior cell.
        if map_width < 3 || map_height < 3 {
            return Err(CatalogError::BadMap { width: map_width, height: map_height });
        }

        let in_bounds = |x: i32, y: i32| x >= 0 && x < map_width && y >= 0 && y < map_height;
        for (i, def) in furniture.iter().enumerate() {
            if furniture[..i].iter().any(|other| other.id == def.id) {
                return Err(CatalogError::DuplicateId { id: def.id.clone() });
            }
            if def.anchors.is_empty() {
                return Err(CatalogError::MissingAnchors { id: def.id.clone() });
            }
            if !(def.radius > 0.0) {
                return Err(CatalogError::BadRadius { id: def.id.clone() });
            }
            let tiles_ok = def.tiles.iter().all(|t| in_bounds(t.x, t.y));
            let anchors_ok = def.anchors.iter().all(|a| in_bounds(a.x, a.y));
            if !tiles_ok || !anchors_ok {
                return Err(CatalogError::OutOfBounds { id: def.id.clone() });
            }
        }

        Ok(Catalog { map_width, map_height, furniture })
    }

    /// The catalog shipped with the crate: the standard room.
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Catalog::from_json(BUILTIN_MANIFEST)
    }

    pub fn map_width(&self) -> i32 {
        self.map_width
    }

    pub fn map_height(&self) -> i32 {
        self.map_height
    }

    pub fn furniture(&self) -> &[FurnitureDef] {
        &self.furniture
    }

    pub fn len(&self) -> usize {
        self.furniture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.furniture.is_empty()
    }
}

/// Errors from loading or validating a catalog manifest.
#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    BadMap { width: i32, height: i32 },
    DuplicateId { id: String },
    MissingAnchors { id: String },
    BadRadius { id: String },
    OutOfBounds { id: String },
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Manifest parse error: {}", e),
            CatalogError::BadMap { width, height } => {
                write!(f, "Map too small: {}x{}", width, height)
            }
            CatalogError::DuplicateId { id } => write!(f, "Duplicate furniture id: {}", id),
            CatalogError::MissingAnchors { id } => write!(f, "Furniture has no anchors: {}", id),
            CatalogError::BadRadius { id } => write!(f, "Non-positive radius on: {}", id),
            CatalogError::OutOfBounds { id } => {
                write!(f, "Furniture outside the map: {}", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {}
