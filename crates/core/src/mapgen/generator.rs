//! Dungeon generation orchestration: placement, separation, grid, binding, then connection.

use log::{debug, info};

use crate::config::DungeonConfig;
use crate::types::TileKind;

use super::binding::bind_room_tiles;
use super::carving::{CarveContext, CorridorTable, DoorTable};
use super::connector::connect_rooms;
use super::grid::{GridTooLarge, TileGrid};
use super::model::{GeneratedDungeon, GenerationReport};
use super::pathfinding::Heuristic;
use super::rooms::place_rooms;
use super::seed::layout_rng;
use super::separation::separate_rooms;

/// Runs the whole pipeline for one validated configuration and one resolved seed.
pub struct DungeonGenerator<'a> {
    config: &'a DungeonConfig,
    seed: u64,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(config: &'a DungeonConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fails only when the separated layout needs more tiles than one grid may hold.
    pub fn generate(&self) -> Result<(GeneratedDungeon, GenerationReport), GridTooLarge> {
        let config = self.config;
        let mut rng = layout_rng(self.seed);

        let mut rooms = place_rooms(config, &mut rng);
        debug!("placed {} rooms ({} premade)", rooms.len(), config.premade_rooms.len());

        let separation =
            separate_rooms(&mut rooms, config.tile_size, config.max_separation_passes);

        let mut grid = TileGrid::build(&rooms, config.tile_size, config.empty_tile_cost)?;
        debug!("built {}x{} tile grid", grid.cols(), grid.rows());

        bind_room_tiles(&mut grid, &mut rooms, config.room_cost);
        debug!("bound {} room tiles", grid.count_kind(TileKind::Room));

        let heuristic = Heuristic::new(config.heuristic, config.tile_size, config.min_step_cost());
        let mut corridors = CorridorTable::new();
        let mut doors = DoorTable::new();
        let connection = connect_rooms(
            &mut CarveContext {
                grid: &mut grid,
                corridors: &mut corridors,
                doors: &mut doors,
                corridor_cost: config.corridor_cost,
            },
            &rooms,
            &heuristic,
        );

        info!(
            "generated dungeon seed={} rooms={} corridors={} doors={} skipped={}",
            self.seed,
            rooms.len(),
            corridors.len(),
            doors.len(),
            connection.skipped.len()
        );

        let report = GenerationReport {
            seed: self.seed,
            separation,
            skipped_connections: connection.skipped,
        };
        Ok((GeneratedDungeon { grid, rooms, corridors, doors }, report))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use xxhash_rust::xxh3::xxh3_64;

    use super::*;
    use crate::config::PremadeRoom;
    use crate::types::Vec3;

    fn two_room_config() -> DungeonConfig {
        DungeonConfig {
            room_count: 2,
            premade_rooms: vec![
                PremadeRoom { center: Vec3::ZERO, width: 1200.0, height: 1200.0 },
                PremadeRoom { center: Vec3::new(3000.0, 0.0, 0.0), width: 1200.0, height: 1200.0 },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn two_premade_rooms_get_one_corridor_and_two_doors() {
        let config = two_room_config();
        let (dungeon, report) = DungeonGenerator::new(&config, 0).generate().expect("grid fits");

        assert!(report.is_clean(), "{report:?}");
        assert_eq!(dungeon.corridors.len(), 1);
        assert_eq!(dungeon.doors.len(), 2);
        assert_eq!(dungeon.grid.count_kind(TileKind::Door), 2);
        for room in &dungeon.rooms {
            let doors_in_room =
                room.tiles.iter().filter(|tile| dungeon.doors.contains_key(tile)).count();
            assert_eq!(doors_in_room, 1, "{} should have exactly one door", room.id);
        }
    }

    #[test]
    fn same_seed_produces_byte_identical_output() {
        let config = DungeonConfig::default();
        let (a, _) = DungeonGenerator::new(&config, 123_456).generate().expect("grid fits");
        let (b, _) = DungeonGenerator::new(&config, 123_456).generate().expect("grid fits");
        assert_eq!(xxh3_64(&a.canonical_bytes()), xxh3_64(&b.canonical_bytes()));
    }

    #[test]
    fn changing_seed_changes_output() {
        let config = DungeonConfig::default();
        let (a, _) = DungeonGenerator::new(&config, 1).generate().expect("grid fits");
        let (b, _) = DungeonGenerator::new(&config, 2).generate().expect("grid fits");
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn corridor_tiles_are_never_room_tiles() {
        let config = DungeonConfig { room_count: 8, ..Default::default() };
        let (dungeon, _) = DungeonGenerator::new(&config, 99).generate().expect("grid fits");
        for tiles in dungeon.corridors.values() {
            for &tile in tiles {
                assert_ne!(dungeon.grid.kind(tile), Some(TileKind::Room));
                assert_ne!(dungeon.grid.kind(tile), Some(TileKind::Empty));
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn every_door_has_a_valid_direction(seed in any::<u64>(), room_count in 2_u32..10) {
            let config = DungeonConfig { room_count, ..Default::default() };
            let (dungeon, _) = DungeonGenerator::new(&config, seed).generate().expect("grid fits");
            for (tile, door) in &dungeon.doors {
                prop_assert_eq!(*tile, door.tile);
                prop_assert!(door.direction.is_valid());
                prop_assert_eq!(dungeon.grid.kind(*tile), Some(TileKind::Door));
            }
        }
    }
}
