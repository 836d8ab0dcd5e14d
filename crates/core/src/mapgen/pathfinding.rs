//! A* search over the directed, weighted tile graph.
//!
//! Records live in two maps (open and closed) keyed by tile id. The open frontier is an ordered
//! set of `(f, insertion order, tile)`, so the minimum-`f` record wins and ties go to the record
//! inserted first. Replaced open records leave stale frontier entries behind; those are skipped
//! on pop by comparing insertion order.

use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::SQRT_2;

use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::types::{HeuristicKind, TileId, Vec3};

use super::grid::{Connection, TileGrid};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("{0} is not part of the grid")]
    UnknownTile(TileId),
    #[error("no path from {start} to {goal}")]
    NoPathFound { start: TileId, goal: TileId },
    #[error("path from {start} to {goal} lost its predecessor at {reached}")]
    BrokenChain { start: TileId, goal: TileId, reached: TileId },
}

/// Distance estimate in cost units: tile distance times the cheapest step cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heuristic {
    pub kind: HeuristicKind,
    pub tile_size: f32,
    pub step_cost: f32,
}

impl Heuristic {
    pub fn new(kind: HeuristicKind, tile_size: f32, step_cost: f32) -> Self {
        Self { kind, tile_size, step_cost }
    }

    pub fn estimate(&self, from: Vec3, to: Vec3) -> f32 {
        let dx = ((to.x - from.x) / self.tile_size).abs();
        let dy = ((to.y - from.y) / self.tile_size).abs();
        let tiles = match self.kind {
            HeuristicKind::Manhattan => dx + dy,
            HeuristicKind::Euclidean => (dx * dx + dy * dy).sqrt(),
            // Squared distance. Overestimates beyond a couple of tiles, so searches go greedy.
            HeuristicKind::SqrtEuclidean => dx * dx + dy * dy,
            HeuristicKind::Octile => (SQRT_2 - 1.0) * dx.min(dy) + dx.max(dy),
            HeuristicKind::Chebyshev => dx.max(dy),
        };
        tiles * self.step_cost
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TilePath {
    /// Start to goal, both included.
    pub tiles: Vec<TileId>,
    /// Sum of the edge costs along `tiles`.
    pub cost: f32,
}

#[derive(Clone, Copy, Debug)]
struct NodeRecord {
    tile: TileId,
    incoming: Option<Connection>,
    cost_so_far: f32,
    estimated_total: f32,
    order: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: OrderedFloat<f32>,
    order: u64,
    tile: TileId,
}

pub fn find_path(
    grid: &TileGrid,
    start: TileId,
    goal: TileId,
    heuristic: &Heuristic,
) -> Result<TilePath, PathError> {
    let start_position = grid.tile(start).ok_or(PathError::UnknownTile(start))?.position;
    let goal_position = grid.tile(goal).ok_or(PathError::UnknownTile(goal))?.position;
    if start == goal {
        return Ok(TilePath { tiles: vec![start], cost: 0.0 });
    }

    let mut open = BTreeMap::new();
    let mut frontier = BTreeSet::new();
    let mut closed: BTreeMap<TileId, NodeRecord> = BTreeMap::new();
    let mut next_order = 0_u64;

    let start_estimate = heuristic.estimate(start_position, goal_position);
    open.insert(
        start,
        NodeRecord {
            tile: start,
            incoming: None,
            cost_so_far: 0.0,
            estimated_total: start_estimate,
            order: next_order,
        },
    );
    frontier.insert(OpenNode { f: OrderedFloat(start_estimate), order: next_order, tile: start });
    next_order += 1;

    while let Some(entry) = frontier.pop_first() {
        let Some(current) = open.get(&entry.tile).copied() else {
            continue;
        };
        if current.order != entry.order {
            continue;
        }
        open.remove(&entry.tile);

        if current.tile == goal {
            return reconstruct_path(grid, &closed, &open, current, start);
        }

        let Some(tile) = grid.tile(current.tile) else {
            continue;
        };
        for connection in &tile.connections {
            let Some(neighbor) = grid.tile(connection.to) else {
                continue;
            };
            let cost_so_far = current.cost_so_far + connection.cost;
            let estimated_total =
                cost_so_far + heuristic.estimate(neighbor.position, goal_position);

            if let Some(closed_record) = closed.get(&connection.to) {
                if estimated_total >= closed_record.estimated_total {
                    continue;
                }
                closed.remove(&connection.to);
            } else if let Some(open_record) = open.get(&connection.to) {
                if estimated_total >= open_record.estimated_total {
                    continue;
                }
            }

            open.insert(
                connection.to,
                NodeRecord {
                    tile: connection.to,
                    incoming: Some(*connection),
                    cost_so_far,
                    estimated_total,
                    order: next_order,
                },
            );
            frontier.insert(OpenNode {
                f: OrderedFloat(estimated_total),
                order: next_order,
                tile: connection.to,
            });
            next_order += 1;
        }

        closed.insert(current.tile, current);
    }

    Err(PathError::NoPathFound { start, goal })
}

/// Follows incoming connections back from the goal. Predecessors are looked up in the closed
/// set first; a reopened predecessor is found in the open set instead.
fn reconstruct_path(
    grid: &TileGrid,
    closed: &BTreeMap<TileId, NodeRecord>,
    open: &BTreeMap<TileId, NodeRecord>,
    goal_record: NodeRecord,
    start: TileId,
) -> Result<TilePath, PathError> {
    let goal = goal_record.tile;
    let mut tiles = vec![goal];
    let mut current = goal_record;

    while current.tile != start {
        let broken = PathError::BrokenChain { start, goal, reached: current.tile };
        if tiles.len() > grid.len() {
            return Err(broken);
        }
        let Some(incoming) = current.incoming else {
            return Err(broken);
        };
        let Some(previous) = closed.get(&incoming.from).or_else(|| open.get(&incoming.from))
        else {
            return Err(broken);
        };
        tiles.push(previous.tile);
        current = *previous;
    }
    tiles.reverse();

    let cost = tiles
        .windows(2)
        .map(|step| grid.connection_cost(step[0], step[1]).unwrap_or(0.0))
        .sum();
    Ok(TilePath { tiles, cost })
}
