//! Connects consecutive rooms with carved corridors.

use log::{debug, warn};
use thiserror::Error;

use crate::types::{CorridorId, RoomId, TileId};

use super::carving::{CarveContext, carve_corridor};
use super::pathfinding::{Heuristic, PathError, find_path};
use super::rooms::Room;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("room center is off the grid")]
    UnmappablePosition,
    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedConnection {
    pub from: RoomId,
    pub to: RoomId,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionReport {
    pub corridors: Vec<CorridorId>,
    pub skipped: Vec<SkippedConnection>,
}

/// Links `rooms[i]` to `rooms[i + 1]` for every `i`. Pairs that cannot be mapped or routed are
/// recorded and skipped; the remaining pairs still get corridors.
pub(crate) fn connect_rooms(
    context: &mut CarveContext<'_>,
    rooms: &[Room],
    heuristic: &Heuristic,
) -> ConnectionReport {
    let mut report = ConnectionReport::default();

    for pair in rooms.windows(2) {
        let (from_room, to_room) = (&pair[0], &pair[1]);
        let skip = |reason| SkippedConnection { from: from_room.id, to: to_room.id, reason };

        let (Some(start), Some(goal)) = (
            context.grid.tile_at_position(from_room.center),
            context.grid.tile_at_position(to_room.center),
        ) else {
            let reason = SkipReason::UnmappablePosition;
            warn!("skipping {} -> {}: {reason}", from_room.id, to_room.id);
            report.skipped.push(skip(reason));
            continue;
        };

        match find_path(context.grid, start, goal, heuristic) {
            Ok(path) => {
                let span = between_rooms(&path.tiles, from_room, to_room);
                let corridor = carve_corridor(context, span);
                debug!(
                    "connected {} -> {} with {} tiles at cost {}",
                    from_room.id,
                    to_room.id,
                    path.tiles.len(),
                    path.cost
                );
                report.corridors.push(corridor);
            }
            Err(error) => {
                warn!("skipping {} -> {}: {error}", from_room.id, to_room.id);
                report.skipped.push(skip(SkipReason::from(error)));
            }
        }
    }

    report
}

/// Clips a center-to-center path to the stretch from the last `from` tile before the first
/// `to` tile, up to and including that `to` tile. Room interiors are pricey, so A* tends to
/// skirt a room and re-enter it near the center; the clipped span crosses each room edge once.
fn between_rooms<'p>(path: &'p [TileId], from: &Room, to: &Room) -> &'p [TileId] {
    let end = path.iter().position(|tile| to.tiles.contains(tile)).unwrap_or(path.len());
    let end = end.min(path.len().saturating_sub(1));
    let start = path[..end].iter().rposition(|tile| from.tiles.contains(tile)).unwrap_or(0);
    path.get(start..=end).unwrap_or(path)
}
