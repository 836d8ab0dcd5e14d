//! Marks the tiles under each room and prices room interiors.

use crate::types::{TileId, TileKind, Vec3};

use super::grid::TileGrid;
use super::rooms::Room;

/// Samples each room footprint at tile-size spacing from its own corner, so the tile count only
/// depends on the room size. Sampled tiles become `Room` and are recorded on the room. Edges
/// between two room tiles are repriced to `room_cost` in both directions.
pub(crate) fn bind_room_tiles(grid: &mut TileGrid, rooms: &mut [Room], room_cost: f32) {
    let tile_size = grid.tile_size();
    for room in rooms.iter_mut() {
        room.tiles.clear();
        let footprint = room.footprint();
        let cols = (room.width / tile_size).ceil() as u32;
        let rows = (room.height / tile_size).ceil() as u32;

        for row in 0..rows {
            for col in 0..cols {
                let sample = Vec3::new(
                    footprint.min_x() + (col as f32 + 0.5) * tile_size,
                    footprint.max_y() - (row as f32 + 0.5) * tile_size,
                    room.center.z,
                );
                let Some(id) = grid.tile_at_position(sample) else {
                    continue;
                };
                if room.tiles.contains(&id) {
                    continue;
                }
                grid.set_kind(id, TileKind::Room);
                room.tiles.push(id);
                reprice_room_links(grid, id, room_cost);
            }
        }
    }
}

fn reprice_room_links(grid: &mut TileGrid, id: TileId, room_cost: f32) {
    let room_neighbors: Vec<TileId> = grid
        .tile(id)
        .map(|tile| tile.connections.iter().map(|con| con.to).collect())
        .unwrap_or_default();
    for neighbor in room_neighbors {
        if grid.kind(neighbor) == Some(TileKind::Room) {
            grid.set_link_cost(id, neighbor, room_cost);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomId;

    fn bound(rooms: &mut [Room]) -> TileGrid {
        let mut grid = TileGrid::build(rooms, 600.0, 1.0).expect("small grid");
        bind_room_tiles(&mut grid, rooms, 550.0);
        grid
    }

    #[test]
    fn room_footprint_becomes_room_tiles() {
        let mut rooms = [Room::new(RoomId(0), Vec3::ZERO, 1200.0, 1200.0)];
        let grid = bound(&mut rooms);

        let mut tiles = rooms[0].tiles.clone();
        tiles.sort();
        assert_eq!(tiles, vec![TileId(27), TileId(28), TileId(35), TileId(36)]);
        assert_eq!(grid.count_kind(TileKind::Room), 4);
    }

    #[test]
    fn interior_edges_cost_room_price_both_ways_and_exits_stay_cheap() {
        let mut rooms = [Room::new(RoomId(0), Vec3::ZERO, 1200.0, 1200.0)];
        let grid = bound(&mut rooms);

        assert_eq!(grid.connection_cost(TileId(27), TileId(28)), Some(550.0));
        assert_eq!(grid.connection_cost(TileId(28), TileId(27)), Some(550.0));
        assert_eq!(grid.connection_cost(TileId(27), TileId(35)), Some(550.0));
        assert_eq!(grid.connection_cost(TileId(35), TileId(27)), Some(550.0));
        assert_eq!(grid.connection_cost(TileId(27), TileId(26)), Some(1.0));
        assert_eq!(grid.connection_cost(TileId(26), TileId(27)), Some(1.0));
    }

    #[test]
    fn unaligned_rooms_still_cover_whole_tile_count() {
        let mut rooms = [
            Room::new(RoomId(0), Vec3::new(130.0, -70.0, 0.0), 1800.0, 1200.0),
            Room::new(RoomId(1), Vec3::new(4000.0, 2500.0, 0.0), 600.0, 1800.0),
        ];
        let grid = bound(&mut rooms);

        assert_eq!(rooms[0].tiles.len(), 6);
        assert_eq!(rooms[1].tiles.len(), 3);
        for room in &rooms {
            for &id in &room.tiles {
                assert_eq!(grid.kind(id), Some(TileKind::Room));
            }
        }
    }

    #[test]
    fn rebinding_replaces_previous_tile_list() {
        let mut rooms = [Room::new(RoomId(0), Vec3::ZERO, 1200.0, 1200.0)];
        let mut grid = bound(&mut rooms);
        bind_room_tiles(&mut grid, &mut rooms, 550.0);
        assert_eq!(rooms[0].tiles.len(), 4);
    }
}
