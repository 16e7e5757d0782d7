//! Save and load for the whole room simulation.
//!
//! Snapshots are versioned bincode. Every entity is flattened into a struct
//! of optional components; loading spawns them back and reattaches whatever
//! was present. Transient arbitration state (focus clocks, pending
//! navigation, undrained events) is deliberately not part of a snapshot and
//! resets on load.

use std::io::{Read, Write};

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::components::{Avatar, Interactable, Motion, PlantStage, Position};
use crate::tasks::TaskBoard;
use crate::timer::SessionTimer;

/// Bump when the snapshot layout changes incompatibly.
const SAVE_VERSION: u32 = 1;

/// Top-level snapshot written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub sim_time: f64,
    pub time_scale: f32,
    pub completed_sessions: u32,
    pub timer: SessionTimer,
    pub tasks: TaskBoard,
    pub catalog: Catalog,
    pub entities: Vec<SerializableEntity>,
}

/// One entity flattened into optional components.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SerializableEntity {
    pub position: Option<Position>,
    pub motion: Option<Motion>,
    pub avatar: Option<Avatar>,
    pub interactable: Option<Interactable>,
    pub plant_stage: Option<PlantStage>,
}

/// State rebuilt from a snapshot, handed back to the engine to apply.
pub struct LoadedRoom {
    pub world: World,
    pub sim_time: f64,
    pub time_scale: f32,
    pub completed_sessions: u32,
    pub timer: SessionTimer,
    pub tasks: TaskBoard,
    pub catalog: Catalog,
}

#[allow(clippy::too_many_arguments)]
pub fn save_room<W: Write>(
    writer: W,
    world: &World,
    sim_time: f64,
    time_scale: f32,
    completed_sessions: u32,
    timer: &SessionTimer,
    tasks: &TaskBoard,
    catalog: &Catalog,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time,
        time_scale,
        completed_sessions,
        timer: timer.clone(),
        tasks: tasks.clone(),
        catalog: catalog.clone(),
        entities: serialize_entities(world),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

pub fn load_room<R: Read>(reader: R) -> Result<LoadedRoom, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;
    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    for entity in save_data.entities {
        spawn_entity(&mut world, entity);
    }

    Ok(LoadedRoom {
        world,
        sim_time: save_data.sim_time,
        time_scale: save_data.time_scale,
        completed_sessions: save_data.completed_sessions,
        timer: save_data.timer,
        tasks: save_data.tasks,
        catalog: save_data.catalog,
    })
}

fn serialize_entities(world: &World) -> Vec<SerializableEntity> {
    let mut entities = Vec::new();
    for entity in world.iter() {
        let mut se = SerializableEntity::default();
        if let Some(c) = entity.get::<&Position>() {
            se.position = Some(*c);
        }
        if let Some(c) = entity.get::<&Motion>() {
            se.motion = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Avatar>() {
            se.avatar = Some(*c);
        }
        if let Some(c) = entity.get::<&Interactable>() {
            se.interactable = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&PlantStage>() {
            se.plant_stage = Some(*c);
        }
        entities.push(se);
    }
    entities
}

fn spawn_entity(world: &mut World, se: SerializableEntity) {
    let entity = world.spawn(());
    if let Some(c) = se.position {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.motion {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.avatar {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.interactable {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.plant_stage {
        let _ = world.insert_one(entity, c);
    }
}

/// Errors from writing or reading a snapshot.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "Save version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for SaveError {}
