//! Turns a found path into a corridor: reclassifies tiles, places doors, reprices edges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CorridorId, TileId, TileKind, Vec3};

use super::grid::TileGrid;

/// Axis deltas at or below this are treated as zero when snapping door directions.
const DIRECTION_EPSILON: f32 = 0.005;

pub type CorridorTable = BTreeMap<CorridorId, Vec<TileId>>;
pub type DoorTable = BTreeMap<TileId, Door>;

/// World-axis direction snapped to `{-1, 0, 1}` per component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorDirection {
    pub x: i8,
    pub y: i8,
}

impl DoorDirection {
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self { x: snap_axis(to.x - from.x), y: snap_axis(to.y - from.y) }
    }

    pub fn is_valid(self) -> bool {
        (-1..=1).contains(&self.x) && (-1..=1).contains(&self.y) && (self.x != 0 || self.y != 0)
    }

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(f32::from(self.x), f32::from(self.y), 0.0)
    }
}

fn snap_axis(delta: f32) -> i8 {
    if delta > DIRECTION_EPSILON {
        1
    } else if delta < -DIRECTION_EPSILON {
        -1
    } else {
        0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub tile: TileId,
    pub corridor: CorridorId,
    /// Points from the door tile into the corridor side it opens onto.
    pub direction: DoorDirection,
}

pub(crate) struct CarveContext<'a> {
    pub(crate) grid: &'a mut TileGrid,
    pub(crate) corridors: &'a mut CorridorTable,
    pub(crate) doors: &'a mut DoorTable,
    pub(crate) corridor_cost: f32,
}

/// Walks `path` in order and registers a new corridor.
///
/// Per tile, edges into neighboring corridor tiles are first repriced to the corridor cost in
/// both directions. Then the tile transitions on its kind:
/// - `Empty` becomes `Corridor`; with no door pending, the previous tile becomes the opening door.
/// - `Room` becomes the closing door when a door is pending.
/// - `Corridor` (carved earlier) opens a door on the previous tile when none is pending.
/// - `Door` flips the pending flag.
///
/// The corridor keeps every non-room tile it touched, doors included, in path order.
pub(crate) fn carve_corridor(context: &mut CarveContext<'_>, path: &[TileId]) -> CorridorId {
    let corridor_id = CorridorId(context.corridors.len() as u32);
    let mut corridor = Vec::new();
    let mut door_pending = false;
    let mut previous: Option<TileId> = None;

    for &tile in path {
        let Some(kind) = context.grid.kind(tile) else {
            continue;
        };
        reprice_corridor_links(context.grid, tile, context.corridor_cost);

        match kind {
            TileKind::Empty => {
                context.grid.set_kind(tile, TileKind::Corridor);
                if !door_pending {
                    if let Some(opening) = previous {
                        place_door(context, &mut corridor, corridor_id, opening, tile);
                    }
                    door_pending = true;
                }
            }
            TileKind::Room => {
                if door_pending {
                    if let Some(outside) = previous {
                        place_door(context, &mut corridor, corridor_id, tile, outside);
                    }
                    door_pending = false;
                }
            }
            TileKind::Corridor => {
                if !door_pending {
                    if let Some(opening) = previous {
                        place_door(context, &mut corridor, corridor_id, opening, tile);
                    }
                    door_pending = true;
                }
            }
            TileKind::Door => door_pending = !door_pending,
        }

        if context.grid.kind(tile) != Some(TileKind::Room) && corridor.last() != Some(&tile) {
            corridor.push(tile);
        }
        previous = Some(tile);
    }

    context.corridors.insert(corridor_id, corridor);
    corridor_id
}

fn place_door(
    context: &mut CarveContext<'_>,
    corridor: &mut Vec<TileId>,
    corridor_id: CorridorId,
    door_tile: TileId,
    facing_tile: TileId,
) {
    let (Some(door_position), Some(facing_position)) = (
        context.grid.tile(door_tile).map(|tile| tile.position),
        context.grid.tile(facing_tile).map(|tile| tile.position),
    ) else {
        return;
    };
    context.grid.set_kind(door_tile, TileKind::Door);
    // A door keeps the corridor and facing it was first opened with.
    context.doors.entry(door_tile).or_insert(Door {
        tile: door_tile,
        corridor: corridor_id,
        direction: DoorDirection::between(door_position, facing_position),
    });
    if corridor.last() != Some(&door_tile) {
        corridor.push(door_tile);
    }
}

fn reprice_corridor_links(grid: &mut TileGrid, tile: TileId, corridor_cost: f32) {
    let neighbors: Vec<TileId> = grid
        .tile(tile)
        .map(|node| node.connections.iter().map(|con| con.to).collect())
        .unwrap_or_default();
    for neighbor in neighbors {
        if grid.kind(neighbor) == Some(TileKind::Corridor) {
            grid.set_link_cost(tile, neighbor, corridor_cost);
        }
    }
}

/// True when `door_tile` holds a door whose direction points at `other_tile`.
pub fn door_faces(
    grid: &TileGrid,
    doors: &DoorTable,
    door_tile: TileId,
    other_tile: TileId,
) -> bool {
    let (Some(door), Some(door_node), Some(other_node)) =
        (doors.get(&door_tile), grid.tile(door_tile), grid.tile(other_tile))
    else {
        return false;
    };
    DoorDirection::between(door_node.position, other_node.position) == door.direction
}
