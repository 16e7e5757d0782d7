//! Per-tick focus arbitration over the room's interactables.
//!
//! Runs after the motion system, so it observes the avatar's position and
//! motion state as settled this tick. Scores every interactable against the
//! avatar, hands the best candidate to the [`FocusTracker`], and translates
//! the tracker's signals into room events.

use hecs::{Entity, World};
use quietroom_logic::focus::{self, FocusSignal, FocusTracker};
use quietroom_logic::grid::Vec2;

use crate::components::{Avatar, Interactable, Motion, Position};
use crate::events::{EventQueue, FocusTarget, RoomEvent};

/// Arbitrate focus for this tick. `dt_ms` is simulated milliseconds.
pub fn focus_system(
    world: &World,
    tracker: &mut FocusTracker<Entity>,
    events: &mut EventQueue,
    dt_ms: f32,
) {
    let mut avatar: Option<(Entity, Vec2)> = None;
    for (entity, (_, position)) in world.query::<(&Avatar, &Position)>().iter() {
        avatar = Some((entity, position.world));
        break;
    }
    let (avatar_entity, agent) = match avatar {
        Some(found) => found,
        None => return,
    };
    let moving = world.get::<&Motion>(avatar_entity).is_ok();

    let mut candidates: Vec<(Entity, f32)> = Vec::new();
    for (entity, interactable) in world.query::<&Interactable>().iter() {
        if let Some(score) = focus::object_score(agent, &interactable.def) {
            candidates.push((entity, score));
        }
    }
    let best = focus::best_candidate(candidates);

    for signal in tracker.advance(best, moving, dt_ms) {
        match signal {
            FocusSignal::Actionable(entity) => {
                if let Ok(interactable) = world.get::<&Interactable>(entity) {
                    let def = &interactable.def;
                    if let Some(anchor) = def.primary_anchor() {
                        events.emit(RoomEvent::FocusActionable {
                            target: FocusTarget {
                                id: def.id.clone(),
                                label: def.label.clone(),
                                category: def.category.clone(),
                                anchor: *anchor,
                            },
                        });
                    }
                }
            }
            FocusSignal::Cleared => events.emit(RoomEvent::FocusCleared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quietroom_logic::furniture::{Anchor, Facing, FurnitureDef};
    use quietroom_logic::grid::Tile;

    fn piece(id: &str, anchor_x: i32, anchor_y: i32, radius: f32) -> Interactable {
        Interactable::new(FurnitureDef {
            id: id.into(),
            label: id.into(),
            category: "test".into(),
            tiles: vec![],
            anchors: vec![Anchor { x: anchor_x, y: anchor_y, facing: Facing::Up }],
            radius,
        })
    }

    fn standing_avatar(world: &mut World, tile: Tile) -> Entity {
        world.spawn((Avatar::default(), Position::at_tile(tile)))
    }

    /// Tick the arbitration `ticks` times at a fixed 100 ms step.
    fn run_ticks(
        world: &World,
        tracker: &mut FocusTracker<Entity>,
        events: &mut EventQueue,
        ticks: u32,
    ) {
        for _ in 0..ticks {
            focus_system(world, tracker, events, 100.0);
        }
    }

    #[test]
    fn test_actionable_event_carries_catalog_data() {
        let mut world = World::new();
        let mut tracker = FocusTracker::new();
        let mut events = EventQueue::new();
        standing_avatar(&mut world, Tile::new(9, 8));
        world.spawn((piece("desk", 9, 8, 1.6),));

        // 150 ms of candidacy, then the 200 ms actionable delay.
        run_ticks(&world, &mut tracker, &mut events, 4);

        let drained = events.drain();
        assert_eq!(drained.len(), 1, "got {drained:?}");
        match &drained[0] {
            RoomEvent::FocusActionable { target } => {
                assert_eq!(target.id, "desk");
                assert_eq!(target.category, "test");
                assert_eq!(target.anchor.tile(), Tile::new(9, 8));
            }
            other => panic!("Expected FocusActionable, got {other:?}"),
        }
    }

    #[test]
    fn test_movement_clears_focus() {
        let mut world = World::new();
        let mut tracker = FocusTracker::new();
        let mut events = EventQueue::new();
        let avatar = standing_avatar(&mut world, Tile::new(9, 8));
        world.spawn((piece("desk", 9, 8, 1.6),));

        run_ticks(&world, &mut tracker, &mut events, 4);
        events.drain();

        // The avatar starts walking; focus must drop the same tick.
        world
            .insert_one(avatar, Motion::to_point(Vec2::new(300.0, 300.0), 128.0))
            .unwrap();
        focus_system(&world, &mut tracker, &mut events, 100.0);

        assert_eq!(events.drain(), vec![RoomEvent::FocusCleared]);
        assert_eq!(tracker.focused(), None);
    }

    #[test]
    fn test_empty_catalog_stays_quiet() {
        let mut world = World::new();
        let mut tracker: FocusTracker<Entity> = FocusTracker::new();
        let mut events = EventQueue::new();
        standing_avatar(&mut world, Tile::new(5, 5));

        run_ticks(&world, &mut tracker, &mut events, 20);

        assert!(events.is_empty());
        assert_eq!(tracker.focused(), None);
    }

    #[test]
    fn test_nearest_piece_wins() {
        let mut world = World::new();
        let mut tracker = FocusTracker::new();
        let mut events = EventQueue::new();
        standing_avatar(&mut world, Tile::new(5, 5));
        let near = world.spawn((piece("near", 5, 6, 3.0),));
        world.spawn((piece("far", 5, 8, 3.0),));

        run_ticks(&world, &mut tracker, &mut events, 2);

        assert_eq!(tracker.focused(), Some(near));
    }

    #[test]
    fn test_no_avatar_is_a_no_op() {
        let world = World::new();
        let mut tracker: FocusTracker<Entity> = FocusTracker::new();
        let mut events = EventQueue::new();

        focus_system(&world, &mut tracker, &mut events, 100.0);

        assert!(events.is_empty());
    }
}
