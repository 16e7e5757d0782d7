//! Waypoint-following motion at constant speed.
//!
//! Entities move while they carry a [`Motion`] component. Each tick an
//! entity advances `speed * dt` pixels along its waypoint chain; leftover
//! budget spills into the next leg, so travel time over a whole path equals
//! total distance divided by speed regardless of tick size. Reaching the
//! final waypoint snaps the entity onto it, removes the component, and
//! emits [`RoomEvent::Arrived`] exactly once.

use hecs::World;

use crate::components::{Motion, Position};
use crate::events::{EventQueue, RoomEvent};

/// Advance every moving entity by one tick.
pub fn motion_system(world: &mut World, events: &mut EventQueue, dt_seconds: f32) {
    // Collect phase: compute new states without mutating the world.
    let mut updates: Vec<(hecs::Entity, Position, Option<Motion>)> = Vec::with_capacity(16);

    for (entity, (position, motion)) in world.query::<(&Position, &Motion)>().iter() {
        let (new_position, new_motion) = advance_motion(position, motion, dt_seconds);
        updates.push((entity, new_position, new_motion));
    }

    // Apply phase.
    for (entity, new_position, new_motion) in updates {
        if let Ok(mut position) = world.get::<&mut Position>(entity) {
            *position = new_position;
        }
        match new_motion {
            Some(motion) => {
                if let Ok(mut slot) = world.get::<&mut Motion>(entity) {
                    *slot = motion;
                }
            }
            None => {
                let _ = world.remove_one::<Motion>(entity);
                events.emit(RoomEvent::Arrived { position: new_position.world });
            }
        }
    }
}

/// Pure single-entity step: the new position plus the remaining motion, or
/// `None` when the final waypoint was reached this tick.
fn advance_motion(
    position: &Position,
    motion: &Motion,
    dt_seconds: f32,
) -> (Position, Option<Motion>) {
    let mut current = position.world;
    let mut next = motion.next;
    let mut budget = motion.speed * dt_seconds;

    while next < motion.waypoints.len() {
        let target = motion.waypoints[next];
        let distance = current.distance(&target);
        if distance <= budget {
            // Consume the waypoint and spill the leftover into the next leg.
            current = target;
            budget -= distance;
            next += 1;
        } else {
            let direction = (target - current).normalize();
            current = current + direction * budget;
            break;
        }
    }

    let new_position = Position { world: current };
    if next >= motion.waypoints.len() {
        (new_position, None)
    } else {
        let mut remaining = motion.clone();
        remaining.next = next;
        (new_position, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quietroom_logic::grid::Vec2;

    fn spawn_mover(world: &mut World, from: Vec2, waypoints: Vec<Vec2>, speed: f32) -> hecs::Entity {
        world.spawn((
            Position { world: from },
            Motion::along(waypoints, speed),
        ))
    }

    // --- Arrival ---

    #[test]
    fn test_arrives_removes_motion_and_emits_once() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let entity = spawn_mover(
            &mut world,
            Vec2::new(16.0, 16.0),
            vec![Vec2::new(48.0, 16.0)],
            32.0,
        );

        motion_system(&mut world, &mut events, 1.0);

        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.world, Vec2::new(48.0, 16.0));
        drop(position);
        assert!(world.get::<&Motion>(entity).is_err(), "Motion should be removed");
        assert_eq!(
            events.drain(),
            vec![RoomEvent::Arrived { position: Vec2::new(48.0, 16.0) }]
        );

        // Further ticks are inert.
        motion_system(&mut world, &mut events, 1.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_partial_progress_keeps_motion() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let entity = spawn_mover(
            &mut world,
            Vec2::new(16.0, 16.0),
            vec![Vec2::new(116.0, 16.0)],
            32.0,
        );

        motion_system(&mut world, &mut events, 0.5);

        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.world, Vec2::new(32.0, 16.0));
        drop(position);
        assert!(world.get::<&Motion>(entity).is_ok());
        assert!(events.is_empty());
    }

    #[test]
    fn test_budget_spills_across_waypoints() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let entity = spawn_mover(
            &mut world,
            Vec2::new(16.0, 16.0),
            vec![Vec2::new(48.0, 16.0), Vec2::new(48.0, 48.0)],
            32.0,
        );

        // 48 px of budget: 32 finishes the first leg, 16 runs down the second.
        motion_system(&mut world, &mut events, 1.5);
        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.world, Vec2::new(48.0, 32.0));
        drop(position);
        assert!(events.is_empty());

        motion_system(&mut world, &mut events, 0.5);
        assert_eq!(
            events.drain(),
            vec![RoomEvent::Arrived { position: Vec2::new(48.0, 48.0) }]
        );
    }

    #[test]
    fn test_leading_zero_length_leg_consumed() {
        // Paths include the start tile; its leg has zero length and costs
        // no travel time.
        let mut world = World::new();
        let mut events = EventQueue::new();
        let entity = spawn_mover(
            &mut world,
            Vec2::new(16.0, 16.0),
            vec![Vec2::new(16.0, 16.0), Vec2::new(48.0, 16.0)],
            32.0,
        );

        motion_system(&mut world, &mut events, 1.0);
        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.world, Vec2::new(48.0, 16.0));
        drop(position);
        assert_eq!(events.drain().len(), 1);
    }

    #[test]
    fn test_never_arrives_early() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        // 128 px at 128 px/s: exactly one second of travel.
        spawn_mover(
            &mut world,
            Vec2::new(16.0, 16.0),
            vec![Vec2::new(144.0, 16.0)],
            128.0,
        );

        motion_system(&mut world, &mut events, 0.4);
        motion_system(&mut world, &mut events, 0.4);
        assert!(events.is_empty(), "arrived before the full travel time");
        motion_system(&mut world, &mut events, 0.2);
        assert_eq!(events.drain().len(), 1);
    }

    #[test]
    fn test_entities_without_motion_untouched() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let still = world.spawn((Position::new(16.0, 16.0),));

        motion_system(&mut world, &mut events, 1.0);

        let position = world.get::<&Position>(still).unwrap();
        assert_eq!(position.world, Vec2::new(16.0, 16.0));
        assert!(events.is_empty());
    }
}
