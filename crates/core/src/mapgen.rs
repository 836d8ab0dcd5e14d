//! Procedural dungeon generation split into one submodule per pipeline stage.

pub mod carving;
pub mod connector;
pub mod grid;
pub mod model;
pub mod pathfinding;
pub mod rooms;
pub mod separation;
pub mod walls;

mod binding;
mod generator;
mod seed;

pub use carving::{CorridorTable, Door, DoorDirection, DoorTable, door_faces};
pub use connector::{SkipReason, SkippedConnection};
pub use generator::DungeonGenerator;
pub use grid::{Connection, GridBounds, GridTooLarge, MAX_GRID_TILES, TileGrid, TileNode};
pub use model::{GeneratedDungeon, GenerationReport};
pub use pathfinding::{Heuristic, PathError, TilePath, find_path};
pub use rooms::{Room, rooms_overlap};
pub use separation::SeparationOutcome;
pub use walls::{FloorPlacement, MeshPlan, WallPlacement, plan_meshes};

pub(crate) use seed::runtime_seed;

use crate::config::DungeonConfig;
use crate::dungeon::GenerateError;

/// Validates `config` and runs the pipeline once. Uses `config.seed`, or a fresh runtime seed
/// when none is set; the seed actually used is in the report.
pub fn generate_dungeon(
    config: &DungeonConfig,
) -> Result<(GeneratedDungeon, GenerationReport), GenerateError> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(runtime_seed);
    Ok(DungeonGenerator::new(config, seed).generate()?)
}
