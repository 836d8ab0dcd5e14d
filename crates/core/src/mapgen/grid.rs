//! Tile grid over the room bounding box and its weighted 4-neighbor graph.
//!
//! Tiles live in a dense row-major arena; every other structure refers to them by `TileId`.
//! Row 0 runs along the max-Y edge of the bounds, so increasing rows move toward negative Y.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Direction, TileId, TileKind, Vec3};

use super::rooms::Room;

/// Padding added around the room bounding box, in tiles.
pub const GRID_PADDING_TILES: f32 = 3.0;

/// Upper bound on the tiles a single grid may hold.
pub const MAX_GRID_TILES: u64 = 1 << 20;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("a {cols}x{rows} tile grid exceeds the limit of {MAX_GRID_TILES} tiles")]
pub struct GridTooLarge {
    pub cols: u64,
    pub rows: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: TileId,
    pub to: TileId,
    pub cost: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileNode {
    pub id: TileId,
    pub position: Vec3,
    pub kind: TileKind,
    /// At most one edge per in-bounds neighbor, in `Direction::ALL` order.
    pub connections: Vec<Connection>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl GridBounds {
    pub fn contains(&self, pos: Vec3) -> bool {
        self.min_x <= pos.x && pos.x <= self.max_x && self.min_y <= pos.y && pos.y <= self.max_y
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    tiles: Vec<TileNode>,
    cols: u32,
    rows: u32,
    tile_size: f32,
    bounds: GridBounds,
}

impl TileGrid {
    /// Builds the grid over the union of all room footprints plus padding. Every tile starts
    /// `Empty` with `empty_cost` edges to its in-bounds neighbors.
    ///
    /// Fails when the tile count would exceed [`MAX_GRID_TILES`].
    pub fn build(rooms: &[Room], tile_size: f32, empty_cost: f32) -> Result<Self, GridTooLarge> {
        let padding = tile_size * GRID_PADDING_TILES;
        let room_bounds = rooms_bounding_box(rooms);
        let min_x = room_bounds.min_x - padding;
        let max_y = room_bounds.max_y + padding;
        // Float to int casts saturate, so oversized extents land on u64::MAX and fail below.
        let cols = ((room_bounds.max_x + padding - min_x) / tile_size).ceil() as u64;
        let rows = ((max_y - (room_bounds.min_y - padding)) / tile_size).ceil() as u64;
        let too_large = GridTooLarge { cols, rows };
        if cols.checked_mul(rows).is_none_or(|count| count > MAX_GRID_TILES) {
            return Err(too_large);
        }
        let (Ok(cols), Ok(rows)) = (u32::try_from(cols), u32::try_from(rows)) else {
            return Err(too_large);
        };
        Ok(Self::with_origin(min_x, max_y, cols, rows, tile_size, empty_cost))
    }

    /// A `cols` x `rows` grid whose top-left corner (min X, max Y) sits at `(min_x, max_y)`.
    pub fn with_origin(
        min_x: f32,
        max_y: f32,
        cols: u32,
        rows: u32,
        tile_size: f32,
        empty_cost: f32,
    ) -> Self {
        // The far edges are derived so the bounds cover whole tiles exactly.
        let bounds = GridBounds {
            min_x,
            max_x: min_x + cols as f32 * tile_size,
            min_y: max_y - rows as f32 * tile_size,
            max_y,
        };

        let mut tiles = Vec::with_capacity(cols as usize * rows as usize);
        for row in 0..rows {
            for col in 0..cols {
                let position = Vec3::new(
                    bounds.min_x + (col as f32 + 0.5) * tile_size,
                    bounds.max_y - (row as f32 + 0.5) * tile_size,
                    0.0,
                );
                tiles.push(TileNode {
                    id: TileId(row * cols + col),
                    position,
                    kind: TileKind::Empty,
                    connections: Vec::with_capacity(4),
                });
            }
        }

        let mut grid = Self { tiles, cols, rows, tile_size, bounds };
        for index in 0..grid.tiles.len() {
            let from = TileId(index as u32);
            for direction in Direction::ALL {
                if let Some(to) = grid.neighbor(from, direction) {
                    grid.tiles[index].connections.push(Connection { from, to, cost: empty_cost });
                }
            }
        }
        grid
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn tiles(&self) -> &[TileNode] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: TileId) -> Option<&TileNode> {
        self.tiles.get(id.index())
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut TileNode> {
        self.tiles.get_mut(id.index())
    }

    pub fn kind(&self, id: TileId) -> Option<TileKind> {
        self.tile(id).map(|tile| tile.kind)
    }

    pub fn set_kind(&mut self, id: TileId, kind: TileKind) {
        if let Some(tile) = self.tile_mut(id) {
            tile.kind = kind;
        }
    }

    pub fn id_at(&self, col: i64, row: i64) -> Option<TileId> {
        if col < 0 || row < 0 || col >= i64::from(self.cols) || row >= i64::from(self.rows) {
            return None;
        }
        Some(TileId(row as u32 * self.cols + col as u32))
    }

    pub fn col_row(&self, id: TileId) -> (u32, u32) {
        (id.0 % self.cols, id.0 / self.cols)
    }

    pub fn neighbor(&self, id: TileId, direction: Direction) -> Option<TileId> {
        if self.cols == 0 {
            return None;
        }
        let (col, row) = self.col_row(id);
        let (dc, dr) = direction.grid_offset();
        self.id_at(i64::from(col) + i64::from(dc), i64::from(row) + i64::from(dr))
    }

    pub fn contains_position(&self, pos: Vec3) -> bool {
        self.bounds.contains(pos)
    }

    /// Tile under a world position, clamped onto the grid. `None` outside the bounds.
    pub fn tile_at_position(&self, pos: Vec3) -> Option<TileId> {
        if self.tiles.is_empty() || !self.contains_position(pos) {
            return None;
        }
        let col = ((pos.x - self.bounds.min_x) / self.tile_size).floor() as i64;
        let row = ((self.bounds.max_y - pos.y) / self.tile_size).floor() as i64;
        self.id_at(
            col.clamp(0, i64::from(self.cols) - 1),
            row.clamp(0, i64::from(self.rows) - 1),
        )
    }

    pub fn connection_cost(&self, from: TileId, to: TileId) -> Option<f32> {
        self.tile(from)?.connections.iter().find(|con| con.to == to).map(|con| con.cost)
    }

    /// Reprices the single edge `from -> to`. Returns `false` when no such edge exists.
    pub fn set_connection_cost(&mut self, from: TileId, to: TileId, cost: f32) -> bool {
        let Some(connection) = self
            .tile_mut(from)
            .and_then(|tile| tile.connections.iter_mut().find(|con| con.to == to))
        else {
            return false;
        };
        connection.cost = cost;
        true
    }

    /// Reprices both directions between two adjacent tiles.
    pub fn set_link_cost(&mut self, a: TileId, b: TileId, cost: f32) {
        self.set_connection_cost(a, b, cost);
        self.set_connection_cost(b, a, cost);
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind == kind).count()
    }
}

fn rooms_bounding_box(rooms: &[Room]) -> GridBounds {
    let origin = GridBounds { min_x: 0.0, max_x: 0.0, min_y: 0.0, max_y: 0.0 };
    let mut footprints = rooms.iter().map(Room::footprint);
    let Some(first) = footprints.next() else {
        return origin;
    };
    footprints.fold(
        GridBounds {
            min_x: first.min_x(),
            max_x: first.max_x(),
            min_y: first.min_y(),
            max_y: first.max_y(),
        },
        |bounds, footprint| GridBounds {
            min_x: bounds.min_x.min(footprint.min_x()),
            max_x: bounds.max_x.max(footprint.max_x()),
            min_y: bounds.min_y.min(footprint.min_y()),
            max_y: bounds.max_y.max(footprint.max_y()),
        },
    )
}
