//! Plant growth driven by completed focus sessions.
//!
//! The plant advances through four visual stages: stage 1 at three
//! completed sessions, stage 2 at six, stage 3 at nine.

use hecs::World;

use crate::components::PlantStage;
use crate::events::{EventQueue, RoomEvent};

/// Growth stage for a completed-sessions count.
pub fn stage_for_sessions(completed: u32) -> u8 {
    if completed >= 9 {
        3
    } else if completed >= 6 {
        2
    } else if completed >= 3 {
        1
    } else {
        0
    }
}

/// Bring every plant to the stage implied by the session count, emitting
/// [`RoomEvent::PlantGrew`] only on an actual change.
pub fn growth_system(world: &mut World, completed_sessions: u32, events: &mut EventQueue) {
    let target = stage_for_sessions(completed_sessions);

    let mut updates: Vec<hecs::Entity> = Vec::new();
    for (entity, plant) in world.query::<&PlantStage>().iter() {
        if plant.stage != target {
            updates.push(entity);
        }
    }

    for entity in updates {
        if let Ok(mut plant) = world.get::<&mut PlantStage>(entity) {
            plant.stage = target;
        }
        events.emit(RoomEvent::PlantGrew { stage: target });
    }
}
