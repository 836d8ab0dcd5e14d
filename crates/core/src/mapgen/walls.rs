//! Floor and wall placement derived from a generated dungeon, with no rendering attached.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, TileId, TileKind, Vec3};

use super::carving::door_faces;
use super::model::GeneratedDungeon;

const ROOM_IGNORES: &[TileKind] = &[TileKind::Room, TileKind::Door];
const CORRIDOR_IGNORES: &[TileKind] = &[TileKind::Corridor];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorPlacement {
    pub tile: TileId,
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    pub tile: TileId,
    pub facing: Direction,
    /// Midpoint of the tile edge the wall stands on.
    pub position: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPlan {
    pub floors: Vec<FloorPlacement>,
    pub walls: Vec<WallPlacement>,
}

/// Floors go on every room tile and every corridor tile. A corridor tile is a `Corridor`, or a
/// `Door` that no room owns. Walls are planned per tile side, in tile id order.
pub fn plan_meshes(dungeon: &GeneratedDungeon) -> MeshPlan {
    let room_tiles: BTreeSet<TileId> =
        dungeon.rooms.iter().flat_map(|room| room.tiles.iter().copied()).collect();
    let corridor_tiles: BTreeSet<TileId> = dungeon
        .grid
        .tiles()
        .iter()
        .filter(|tile| match tile.kind {
            TileKind::Corridor => true,
            TileKind::Door => !room_tiles.contains(&tile.id),
            TileKind::Empty | TileKind::Room => false,
        })
        .map(|tile| tile.id)
        .collect();

    let mut plan = MeshPlan::default();
    for tile in dungeon.grid.tiles() {
        let ignores = if room_tiles.contains(&tile.id) {
            ROOM_IGNORES
        } else if corridor_tiles.contains(&tile.id) {
            CORRIDOR_IGNORES
        } else {
            continue;
        };
        plan.floors.push(FloorPlacement { tile: tile.id, position: tile.position });
        plan_tile_walls(dungeon, tile.id, ignores, &mut plan.walls);
    }
    plan
}

fn plan_tile_walls(
    dungeon: &GeneratedDungeon,
    tile: TileId,
    ignores: &[TileKind],
    walls: &mut Vec<WallPlacement>,
) {
    let grid = &dungeon.grid;
    let Some(node) = grid.tile(tile) else {
        return;
    };

    for facing in Direction::ALL {
        let needs_wall = match grid.neighbor(tile, facing) {
            None => true,
            Some(neighbor) => {
                let neighbor_kind = grid.kind(neighbor).unwrap_or(TileKind::Empty);
                let door_opens_here = neighbor_kind == TileKind::Door
                    && door_faces(grid, &dungeon.doors, neighbor, tile);
                let door_opens_there = node.kind == TileKind::Door
                    && neighbor_kind == TileKind::Corridor
                    && door_faces(grid, &dungeon.doors, tile, neighbor);
                !ignores.contains(&neighbor_kind) && !door_opens_here && !door_opens_there
            }
        };
        if needs_wall {
            walls.push(WallPlacement {
                tile,
                facing,
                position: node.position + facing.world_offset() * (grid.tile_size() / 2.0),
            });
        }
    }
}
