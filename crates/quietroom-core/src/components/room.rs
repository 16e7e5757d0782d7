//! Components for the room's interactive furnishings.

use quietroom_logic::furniture::FurnitureDef;
use serde::{Deserialize, Serialize};

/// Interactable component - one catalog-defined furniture piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub def: FurnitureDef,
}

impl Interactable {
    pub fn new(def: FurnitureDef) -> Self {
        Interactable { def }
    }
}

/// PlantStage component - visual growth stage, driven by completed focus
/// sessions. Attached only to the plant furniture piece.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlantStage {
    pub stage: u8,
}
