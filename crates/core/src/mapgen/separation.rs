//! Iterative push-apart of overlapping rooms.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::types::Vec3;

use super::rooms::{Room, rooms_overlap};

/// Angle step for the fallback push direction; spreads coincident rooms around the circle.
const GOLDEN_ANGLE: f32 = 2.399_963_2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparationOutcome {
    Converged { passes: u32 },
    /// Pass cap reached; rooms hold the layout with the fewest overlapping rooms seen.
    Degenerate { passes: u32, overlapping_rooms: usize },
}

impl SeparationOutcome {
    pub fn is_converged(self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Moves room centers in tile-size steps until no two squared footprints, grown by one tile,
/// overlap. Sizes never change.
pub(crate) fn separate_rooms(
    rooms: &mut [Room],
    tile_size: f32,
    max_passes: u32,
) -> SeparationOutcome {
    let margin = tile_size;
    let mut remaining = count_overlapping_rooms(rooms, margin);
    let mut best = (remaining, centers(rooms));
    let mut passes = 0_u32;

    while remaining > 0 {
        if passes >= max_passes {
            let (overlapping_rooms, best_centers) = best;
            for (room, center) in rooms.iter_mut().zip(best_centers) {
                room.center = center;
            }
            warn!(
                "room separation did not converge after {passes} passes; \
                 {overlapping_rooms} rooms still overlap"
            );
            return SeparationOutcome::Degenerate { passes, overlapping_rooms };
        }

        separation_pass(rooms, tile_size, margin);
        passes += 1;
        remaining = count_overlapping_rooms(rooms, margin);
        if remaining < best.0 {
            best = (remaining, centers(rooms));
        }
    }

    debug!("separated {} rooms in {passes} passes", rooms.len());
    SeparationOutcome::Converged { passes }
}

/// One sweep over all rooms. Each room reacts to positions already updated earlier in the sweep.
fn separation_pass(rooms: &mut [Room], step: f32, margin: f32) {
    for current_index in 0..rooms.len() {
        let mut push = Vec3::ZERO;
        let mut overlap_count = 0_u32;
        for other_index in 0..rooms.len() {
            if other_index == current_index {
                continue;
            }
            if rooms_overlap(&rooms[current_index], &rooms[other_index], margin) {
                push += rooms[current_index].center - rooms[other_index].center;
                overlap_count += 1;
            }
        }
        if overlap_count == 0 {
            continue;
        }

        let average = push * (1.0 / overlap_count as f32);
        let planar = Vec3::new(average.x, average.y, 0.0);
        let direction = planar
            .try_normalize()
            .unwrap_or_else(|| fallback_direction(rooms[current_index].id.0));
        rooms[current_index].center += direction * step;
    }
}

fn fallback_direction(room_index: u32) -> Vec3 {
    let angle = room_index as f32 * GOLDEN_ANGLE;
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

pub(crate) fn count_overlapping_rooms(rooms: &[Room], margin: f32) -> usize {
    (0..rooms.len())
        .filter(|&index| {
            rooms
                .iter()
                .enumerate()
                .any(|(other, room)| other != index && rooms_overlap(&rooms[index], room, margin))
        })
        .count()
}

fn centers(rooms: &[Room]) -> Vec<Vec3> {
    rooms.iter().map(|room| room.center).collect()
}
