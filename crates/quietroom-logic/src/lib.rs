//! Pure room-simulation logic for Quietroom.
//!
//! This crate contains the spatial and arbitration logic that is independent
//! of any engine or runtime. Functions take plain data and return results,
//! making them unit-testable and portable between the headless engine, CLI
//! tools, and any future frontend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`focus`] | Proximity scoring and the focus hysteresis/debounce machine |
//! | [`furniture`] | Furniture definitions: footprints, anchors, radii |
//! | [`grid`] | Tile/world conversion and the room walkability matrix |
//! | [`pathfinding`] | Deterministic 8-connected A* over the walkability matrix |

pub mod focus;
pub mod furniture;
pub mod grid;
pub mod pathfinding;
