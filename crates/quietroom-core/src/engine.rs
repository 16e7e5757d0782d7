//! The room engine: owns the world and drives each simulation tick.
//!
//! Tick order inside [`RoomEngine::update`]:
//! 1. Resolve the pending navigation request, if any. Requests queued since
//!    the last tick are planned from the avatar's current tile; only the
//!    newest request survives.
//! 2. Motion: advance the avatar along its waypoints.
//! 3. Focus arbitration, observing position and motion as settled this tick.
//! 4. Session timer, and plant growth when a focus session completes.
//!
//! All timing derives from the `delta_seconds` passed to `update`, scaled by
//! the engine's time scale, so runs are deterministic under a fixed tick
//! sequence.

use hecs::{Entity, World};
use log::{debug, info};
use quietroom_logic::focus::FocusTracker;
use quietroom_logic::grid::{RoomGrid, Tile, Vec2};
use quietroom_logic::pathfinding::find_path;

use crate::catalog::{Catalog, CatalogError};
use crate::components::{Avatar, Interactable, Motion, PlantStage, Position, AVATAR_SPEED};
use crate::events::{EventQueue, RoomEvent};
use crate::persistence::{self, SaveError};
use crate::systems::{focus_system, growth_system, motion_system};
use crate::tasks::TaskBoard;
use crate::timer::{SessionKind, SessionTimer};

/// Tile the avatar spawns on in a fresh room.
pub const AVATAR_START: Tile = Tile { x: 2, y: 12 };

/// Complete simulation state for one room.
pub struct RoomEngine {
    pub world: World,
    /// Simulated seconds since the room was set up.
    pub sim_time: f64,
    pub timer: SessionTimer,
    pub tasks: TaskBoard,
    grid: RoomGrid,
    catalog: Catalog,
    avatar: Option<Entity>,
    pending_goal: Option<Tile>,
    focus: FocusTracker<Entity>,
    completed_sessions: u32,
    events: EventQueue,
    time_scale: f32,
}

impl RoomEngine {
    /// An engine with no room set up yet.
    pub fn new() -> Self {
        RoomEngine {
            world: World::new(),
            sim_time: 0.0,
            timer: SessionTimer::new(),
            tasks: TaskBoard::new(),
            grid: RoomGrid::standard(),
            catalog: Catalog::empty(),
            avatar: None,
            pending_goal: None,
            focus: FocusTracker::new(),
            completed_sessions: 0,
            events: EventQueue::new(),
            time_scale: 1.0,
        }
    }

    /// Engine running the standard room from the builtin catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        let mut engine = RoomEngine::new();
        engine.setup_room(Catalog::builtin()?);
        Ok(engine)
    }

    /// Replace the world with a fresh room built from `catalog`: walls and
    /// footprints blocked, furniture spawned, avatar at [`AVATAR_START`].
    pub fn setup_room(&mut self, catalog: Catalog) {
        let mut grid = RoomGrid::bordered(catalog.map_width(), catalog.map_height());
        for def in catalog.furniture() {
            for tile in &def.tiles {
                grid.block(*tile);
            }
        }

        let mut world = World::new();
        for def in catalog.furniture() {
            let entity = world.spawn((Interactable::new(def.clone()),));
            if def.id == "plant" {
                let _ = world.insert_one(entity, PlantStage::default());
            }
        }
        let avatar = world.spawn((Avatar::default(), Position::at_tile(AVATAR_START)));

        info!(
            "Room ready: {}x{} tiles, {} furniture pieces",
            catalog.map_width(),
            catalog.map_height(),
            catalog.len()
        );

        self.world = world;
        self.grid = grid;
        self.catalog = catalog;
        self.avatar = Some(avatar);
        self.pending_goal = None;
        self.focus.reset();
        self.events = EventQueue::new();
    }

    /// Advance the simulation by `delta_seconds` of real time.
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds * self.time_scale;
        self.sim_time += dt as f64;

        self.resolve_pending_navigation();
        motion_system(&mut self.world, &mut self.events, dt);
        focus_system(&self.world, &mut self.focus, &mut self.events, dt * 1000.0);

        if let Some(kind) = self.timer.tick(dt) {
            self.events.emit(RoomEvent::SessionCompleted { kind });
            if kind == SessionKind::Focus {
                self.completed_sessions += 1;
                growth_system(&mut self.world, self.completed_sessions, &mut self.events);
            }
        }
    }

    /// Queue a walk to `goal`. Returns false, changing nothing, when the
    /// goal lies outside the map. The path is planned on the next tick; a
    /// newer request replaces an unresolved one.
    pub fn request_move_to(&mut self, goal: Tile) -> bool {
        if !self.grid.in_bounds(goal.x, goal.y) {
            debug!("Rejected navigation outside the map: {:?}", goal);
            return false;
        }
        self.pending_goal = Some(goal);
        true
    }

    /// Cancel any motion and walk straight to a world point, ignoring the
    /// grid. Meant for trivial nudges within a tile.
    pub fn move_to_point(&mut self, target: Vec2) -> bool {
        let avatar = match self.avatar {
            Some(found) => found,
            None => return false,
        };
        let speed = self.avatar_speed();
        self.pending_goal = None;
        let _ = self.world.insert_one(avatar, Motion::to_point(target, speed));
        true
    }

    fn resolve_pending_navigation(&mut self) {
        let goal = match self.pending_goal.take() {
            Some(found) => found,
            None => return,
        };
        let avatar = match self.avatar {
            Some(found) => found,
            None => return,
        };
        let start = match self.world.get::<&Position>(avatar) {
            Ok(position) => position.tile(),
            Err(_) => return,
        };

        match find_path(&self.grid, start, goal) {
            Some(path) if path.len() > 1 => {
                let speed = self.avatar_speed();
                let waypoints: Vec<Vec2> = path.iter().map(|t| t.center()).collect();
                let _ = self.world.insert_one(avatar, Motion::along(waypoints, speed));
            }
            Some(_) => {
                // Already on the goal tile; nothing to walk.
            }
            None => debug!("No path from {:?} to {:?}", start, goal),
        }
    }

    fn avatar_speed(&self) -> f32 {
        self.avatar
            .and_then(|a| self.world.get::<&Avatar>(a).ok().map(|avatar| avatar.speed))
            .unwrap_or(AVATAR_SPEED)
    }

    // --- Queries ---

    pub fn is_moving(&self) -> bool {
        match self.avatar {
            Some(avatar) => self.world.get::<&Motion>(avatar).is_ok(),
            None => false,
        }
    }

    pub fn avatar_position(&self) -> Option<Vec2> {
        self.avatar
            .and_then(|a| self.world.get::<&Position>(a).ok().map(|p| p.world))
    }

    pub fn avatar_tile(&self) -> Option<Tile> {
        self.avatar_position().map(Tile::from_world)
    }

    /// Entity currently holding focus.
    pub fn focused(&self) -> Option<Entity> {
        self.focus.focused()
    }

    /// Catalog id of the focused furniture piece.
    pub fn focused_id(&self) -> Option<String> {
        self.focus.focused().and_then(|entity| {
            self.world
                .get::<&Interactable>(entity)
                .ok()
                .map(|i| i.def.id.clone())
        })
    }

    pub fn furniture_count(&self) -> usize {
        self.world.query::<&Interactable>().iter().count()
    }

    pub fn grid(&self) -> &RoomGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Take all events emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<RoomEvent> {
        self.events.drain()
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Speed up, slow down, or pause (0.0) the simulation.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    // --- Persistence ---

    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_room(
            writer,
            &self.world,
            self.sim_time,
            self.time_scale,
            self.completed_sessions,
            &self.timer,
            &self.tasks,
            &self.catalog,
        )
    }

    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = persistence::load_room(reader)?;

        let mut grid = RoomGrid::bordered(loaded.catalog.map_width(), loaded.catalog.map_height());
        for def in loaded.catalog.furniture() {
            for tile in &def.tiles {
                grid.block(*tile);
            }
        }

        self.world = loaded.world;
        self.sim_time = loaded.sim_time;
        self.time_scale = loaded.time_scale;
        self.completed_sessions = loaded.completed_sessions;
        self.timer = loaded.timer;
        self.tasks = loaded.tasks;
        self.catalog = loaded.catalog;
        self.grid = grid;

        // Derived and transient state is rebuilt, not loaded.
        self.avatar = None;
        for (entity, _) in self.world.query::<&Avatar>().iter() {
            self.avatar = Some(entity);
            break;
        }
        self.pending_goal = None;
        self.focus.reset();
        self.events = EventQueue::new();
        Ok(())
    }
}

impl Default for RoomEngine {
    fn default() -> Self {
        Self::new()
    }
}
