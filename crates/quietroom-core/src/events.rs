//! Typed simulation events.
//!
//! Systems push events into the engine's queue during a tick; the embedding
//! application drains them afterward. Events are plain data, so consumers
//! never need to reach back into the world to interpret one.

use quietroom_logic::furniture::Anchor;
use quietroom_logic::grid::Vec2;
use serde::{Deserialize, Serialize};

use crate::timer::SessionKind;

/// The furniture piece an affordance should attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusTarget {
    pub id: String,
    pub label: String,
    /// Opaque catalog category, passed through untouched.
    pub category: String,
    /// Primary anchor, for positioning the affordance in the room.
    pub anchor: Anchor,
}

/// Everything the simulation reports outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomEvent {
    /// The avatar finished its motion at this world position.
    Arrived { position: Vec2 },
    /// A focused piece survived the debounce and is ready to present.
    FocusActionable { target: FocusTarget },
    /// Focus was lost or switched away; any presented affordance goes away.
    FocusCleared,
    /// A timer session ran to completion.
    SessionCompleted { kind: SessionKind },
    /// The plant advanced to a new growth stage.
    PlantGrew { stage: u8 },
}

/// FIFO event buffer, drained once per tick by the embedder.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<RoomEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue { pending: Vec::new() }
    }

    pub fn emit(&mut self, event: RoomEvent) {
        self.pending.push(event);
    }

    /// Take all pending events in emission order.
    pub fn drain(&mut self) -> Vec<RoomEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
