//! Generation settings and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{HeuristicKind, Vec3};

/// A room fixed by the caller. Separation may still move it but never resizes it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PremadeRoom {
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Middle of the disk random room centers are drawn from.
    pub dungeon_center: Vec3,
    /// Disk radius; the finished dungeon may extend past it after separation.
    pub dungeon_radius: f32,
    /// Edge length of a tile, used for floors, walls and room sizing.
    pub tile_size: f32,
    pub min_room_tiles: u32,
    pub max_room_tiles: u32,
    /// Total rooms, premade ones included.
    pub room_count: u32,
    pub premade_rooms: Vec<PremadeRoom>,
    pub empty_tile_cost: f32,
    pub corridor_cost: f32,
    pub room_cost: f32,
    pub heuristic: HeuristicKind,
    pub debug_draw: bool,
    /// Fixed seed for reproducible layouts. `None` draws a fresh runtime seed per run.
    pub seed: Option<u64>,
    pub max_separation_passes: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            dungeon_center: Vec3::ZERO,
            dungeon_radius: 6000.0,
            tile_size: 600.0,
            min_room_tiles: 2,
            max_room_tiles: 8,
            room_count: 12,
            premade_rooms: Vec::new(),
            empty_tile_cost: 1.0,
            corridor_cost: 100.0,
            room_cost: 550.0,
            heuristic: HeuristicKind::Manhattan,
            debug_draw: false,
            seed: None,
            max_separation_passes: 1000,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    #[error("dungeon radius must be at least 1, got {0}")]
    InvalidRadius(f32),
    #[error("room tile range {min}..={max} is empty or starts at zero")]
    InvalidRoomTileRange { min: u32, max: u32 },
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidCost { name: &'static str, value: f32 },
    #[error("{premade} premade rooms exceed the room count of {room_count}")]
    TooManyPremadeRooms { premade: usize, room_count: u32 },
    #[error("premade room {index} has a non-positive extent")]
    DegeneratePremadeRoom { index: usize },
}

impl DungeonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if !(self.dungeon_radius.is_finite() && self.dungeon_radius >= 1.0) {
            return Err(ConfigError::InvalidRadius(self.dungeon_radius));
        }
        if self.min_room_tiles == 0 || self.min_room_tiles > self.max_room_tiles {
            return Err(ConfigError::InvalidRoomTileRange {
                min: self.min_room_tiles,
                max: self.max_room_tiles,
            });
        }
        for (name, value) in [
            ("empty_tile_cost", self.empty_tile_cost),
            ("corridor_cost", self.corridor_cost),
            ("room_cost", self.room_cost),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidCost { name, value });
            }
        }
        if self.premade_rooms.len() > self.room_count as usize {
            return Err(ConfigError::TooManyPremadeRooms {
                premade: self.premade_rooms.len(),
                room_count: self.room_count,
            });
        }
        if let Some(index) =
            self.premade_rooms.iter().position(|room| !(room.width > 0.0 && room.height > 0.0))
        {
            return Err(ConfigError::DegeneratePremadeRoom { index });
        }
        Ok(())
    }

    /// Cheapest per-step cost any edge can carry; scales the A* heuristic into cost units.
    pub fn min_step_cost(&self) -> f32 {
        self.empty_tile_cost.min(self.corridor_cost).min(self.room_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(DungeonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_inverted_room_tile_range() {
        let config = DungeonConfig { min_room_tiles: 5, max_room_tiles: 3, ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRoomTileRange { min: 5, max: 3 })
        );
    }

    #[test]
    fn validation_rejects_more_premade_rooms_than_room_count() {
        let room = PremadeRoom { center: Vec3::ZERO, width: 600.0, height: 600.0 };
        let config =
            DungeonConfig { room_count: 1, premade_rooms: vec![room, room], ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::TooManyPremadeRooms { .. })));
    }

    #[test]
    fn validation_rejects_nan_cost() {
        let config = DungeonConfig { corridor_cost: f32::NAN, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCost { name: "corridor_cost", .. })
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DungeonConfig =
            serde_json::from_str(r#"{ "room_count": 3, "seed": 7, "heuristic": "Octile" }"#)
                .expect("partial config should deserialize");
        assert_eq!(config.room_count, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.heuristic, HeuristicKind::Octile);
        assert_eq!(config.tile_size, 600.0);
    }
}
