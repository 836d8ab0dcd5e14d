//! Generation results: the dungeon handed to callers and the report of what degraded.

use xxhash_rust::xxh3::xxh3_64;

use crate::types::{CorridorId, TileId, TileKind};

use super::carving::{CorridorTable, Door, DoorTable};
use super::connector::SkippedConnection;
use super::grid::TileGrid;
use super::rooms::Room;
use super::separation::SeparationOutcome;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedDungeon {
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub corridors: CorridorTable,
    pub doors: DoorTable,
}

impl GeneratedDungeon {
    pub fn corridor(&self, id: CorridorId) -> Option<&[TileId]> {
        self.corridors.get(&id).map(Vec::as_slice)
    }

    pub fn door(&self, tile: TileId) -> Option<&Door> {
        self.doors.get(&tile)
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Stable byte encoding of the whole layout, for fingerprinting.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.grid.cols().to_le_bytes());
        bytes.extend(self.grid.rows().to_le_bytes());
        bytes.extend(self.grid.tile_size().to_le_bytes());
        let bounds = self.grid.bounds();
        for edge in [bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y] {
            bytes.extend(edge.to_le_bytes());
        }

        for tile in self.grid.tiles() {
            bytes.push(match tile.kind {
                TileKind::Empty => 0,
                TileKind::Room => 1,
                TileKind::Corridor => 2,
                TileKind::Door => 3,
            });
            for connection in &tile.connections {
                bytes.extend(connection.to.0.to_le_bytes());
                bytes.extend(connection.cost.to_le_bytes());
            }
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.id.0.to_le_bytes());
            bytes.extend(room.center.x.to_le_bytes());
            bytes.extend(room.center.y.to_le_bytes());
            bytes.extend(room.width.to_le_bytes());
            bytes.extend(room.height.to_le_bytes());
            bytes.extend((room.tiles.len() as u32).to_le_bytes());
            for tile in &room.tiles {
                bytes.extend(tile.0.to_le_bytes());
            }
        }

        bytes.extend((self.corridors.len() as u32).to_le_bytes());
        for (id, tiles) in &self.corridors {
            bytes.extend(id.0.to_le_bytes());
            bytes.extend((tiles.len() as u32).to_le_bytes());
            for tile in tiles {
                bytes.extend(tile.0.to_le_bytes());
            }
        }

        bytes.extend((self.doors.len() as u32).to_le_bytes());
        for door in self.doors.values() {
            bytes.extend(door.tile.0.to_le_bytes());
            bytes.extend(door.corridor.0.to_le_bytes());
            bytes.extend(door.direction.x.to_le_bytes());
            bytes.extend(door.direction.y.to_le_bytes());
        }

        bytes
    }
}

/// Non-fatal degradations collected during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Seed the room placer actually used.
    pub seed: u64,
    pub separation: SeparationOutcome,
    pub skipped_connections: Vec<SkippedConnection>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.separation.is_converged() && self.skipped_connections.is_empty()
    }
}
