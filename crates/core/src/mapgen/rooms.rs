//! Room model and initial room placement.

use std::f32::consts::TAU;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::types::{RoomId, TileId, Vec3};

use super::seed::{range_f32, range_u32, unit_f32};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub width: f32,
    pub height: f32,
    pub center: Vec3,
    /// Grid tiles under this room, filled in by tile binding.
    pub tiles: Vec<TileId>,
}

impl Room {
    pub fn new(id: RoomId, center: Vec3, width: f32, height: f32) -> Self {
        Self { id, width, height, center, tiles: Vec::new() }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint { center: self.center, width: self.width, height: self.height }
    }
}

/// Axis-aligned rectangle centered on a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub fn min_x(self) -> f32 {
        self.center.x - self.width / 2.0
    }

    pub fn max_x(self) -> f32 {
        self.center.x + self.width / 2.0
    }

    pub fn min_y(self) -> f32 {
        self.center.y - self.height / 2.0
    }

    pub fn max_y(self) -> f32 {
        self.center.y + self.height / 2.0
    }

    /// Square box using the longer side on both axes.
    pub fn squared(self) -> Self {
        let side = self.width.max(self.height);
        Self { width: side, height: side, ..self }
    }

    pub fn expanded(self, margin: f32) -> Self {
        Self { width: self.width + margin, height: self.height + margin, ..self }
    }

    /// Strict intersection; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }
}

/// Overlap test used by separation: squared boxes grown by `margin`.
pub fn rooms_overlap(a: &Room, b: &Room, margin: f32) -> bool {
    a.footprint().squared().expanded(margin).intersects(&b.footprint().squared().expanded(margin))
}

/// Premade rooms first, then random rooms until `room_count` is reached. Ids follow list order.
pub(crate) fn place_rooms(config: &DungeonConfig, rng: &mut ChaCha8Rng) -> Vec<Room> {
    let target_room_count = config.room_count as usize;
    let mut rooms = Vec::with_capacity(target_room_count);

    for premade in config.premade_rooms.iter().take(target_room_count) {
        let id = RoomId(rooms.len() as u32);
        rooms.push(Room::new(id, premade.center, premade.width, premade.height));
    }

    while rooms.len() < target_room_count {
        let id = RoomId(rooms.len() as u32);
        let width = range_u32(rng, config.min_room_tiles, config.max_room_tiles) as f32
            * config.tile_size;
        let height = range_u32(rng, config.min_room_tiles, config.max_room_tiles) as f32
            * config.tile_size;
        let center = random_point_in_disk(rng, config.dungeon_center, config.dungeon_radius);
        rooms.push(Room::new(id, center, width, height));
    }

    rooms
}

/// Radius is drawn uniformly in `[1, radius]`, which clusters points toward the center
/// compared to an area-uniform sample.
fn random_point_in_disk(rng: &mut ChaCha8Rng, center: Vec3, radius: f32) -> Vec3 {
    let angle = unit_f32(rng) * TAU;
    let distance = range_f32(rng, 1.0, radius.max(1.0));
    Vec3::new(center.x + angle.cos() * distance, center.y + angle.sin() * distance, center.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PremadeRoom;
    use crate::mapgen::seed::layout_rng;

    #[test]
    fn placement_keeps_premade_rooms_first_and_fills_to_target() {
        let premade =
            PremadeRoom { center: Vec3::new(10.0, 20.0, 5.0), width: 1200.0, height: 600.0 };
        let config =
            DungeonConfig { room_count: 6, premade_rooms: vec![premade], ..Default::default() };
        let rooms = place_rooms(&config, &mut layout_rng(3));

        assert_eq!(rooms.len(), 6);
        assert_eq!(rooms[0].center, premade.center);
        assert_eq!(rooms[0].width, 1200.0);
        for (index, room) in rooms.iter().enumerate() {
            assert_eq!(room.id, RoomId(index as u32));
            assert!(room.tiles.is_empty());
        }
    }

    #[test]
    fn random_rooms_respect_size_range_and_disk() {
        let config = DungeonConfig {
            room_count: 200,
            dungeon_center: Vec3::new(1000.0, -500.0, 0.0),
            ..Default::default()
        };
        let rooms = place_rooms(&config, &mut layout_rng(17));
        let min = config.min_room_tiles as f32 * config.tile_size;
        let max = config.max_room_tiles as f32 * config.tile_size;

        for room in &rooms {
            assert!((min..=max).contains(&room.width));
            assert!((min..=max).contains(&room.height));
            assert_eq!(room.width % config.tile_size, 0.0);
            let offset = (room.center - config.dungeon_center).length();
            assert!(offset <= config.dungeon_radius + 1.0, "room escaped the disk: {offset}");
        }
    }

    #[test]
    fn overlap_uses_longest_side_and_margin() {
        let a = Room::new(RoomId(0), Vec3::ZERO, 600.0, 1800.0);
        // The raw rectangles are 500 apart on x, but squaring `a` stretches it to x = 900.
        let b = Room::new(RoomId(1), Vec3::new(1100.0, 0.0, 0.0), 600.0, 600.0);
        assert!(rooms_overlap(&a, &b, 0.0));

        let c = Room::new(RoomId(2), Vec3::new(1500.0, 0.0, 0.0), 1200.0, 1200.0);
        let d = Room::new(RoomId(3), Vec3::ZERO, 1200.0, 1200.0);
        assert!(!rooms_overlap(&c, &d, 0.0), "a 300 unit gap is not an overlap");
        assert!(rooms_overlap(&c, &d, 600.0));
    }
}
