//! Quietroom Core - Room Simulation Engine
//!
//! An ECS-based simulation of a small focus room: an avatar that walks a
//! tile grid, furniture the avatar can settle near, a session timer, a task
//! board, and a plant that grows as sessions complete.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: The avatar and each furniture piece
//! - **Components**: Pure data attached to entities (Position, Motion, Interactable, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Consumers poll [`engine::RoomEngine::drain_events`] each tick instead of
//! registering callbacks, so the engine never holds references into the host.
//!
//! # Example
//!
//! ```rust,no_run
//! use quietroom_core::prelude::*;
//! use quietroom_logic::grid::Tile;
//!
//! let mut engine = RoomEngine::standard().unwrap();
//! engine.request_move_to(Tile::new(9, 8));
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod catalog;
pub mod components;
pub mod engine;
pub mod events;
pub mod persistence;
pub mod systems;
pub mod tasks;
pub mod timer;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::components::*;
    pub use crate::engine::RoomEngine;
    pub use crate::events::{FocusTarget, RoomEvent};
    pub use crate::tasks::{TaskBoard, TaskStatus};
    pub use crate::timer::{SessionKind, SessionTimer, TimerPhase};
}
