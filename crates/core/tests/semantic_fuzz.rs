use std::collections::BTreeSet;

use dungeon_core::mapgen::{SeparationOutcome, rooms_overlap};
use dungeon_core::{DungeonConfig, HeuristicKind, TileKind, generate_dungeon};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const HEURISTICS: [HeuristicKind; 5] = [
    HeuristicKind::Manhattan,
    HeuristicKind::Euclidean,
    HeuristicKind::SqrtEuclidean,
    HeuristicKind::Octile,
    HeuristicKind::Chebyshev,
];

fn random_config(layout_seed: u64, knob_seed: u64) -> DungeonConfig {
    let mut rng = ChaCha8Rng::seed_from_u64(knob_seed);
    let min_room_tiles = 1 + (rng.next_u64() % 3) as u32;
    DungeonConfig {
        seed: Some(layout_seed),
        room_count: 2 + (rng.next_u64() % 12) as u32,
        min_room_tiles,
        max_room_tiles: min_room_tiles + (rng.next_u64() % 6) as u32,
        dungeon_radius: 1000.0 + (rng.next_u64() % 8000) as f32,
        heuristic: HEURISTICS[rng.next_u64() as usize % HEURISTICS.len()],
        ..Default::default()
    }
}

fn check_invariants(config: &DungeonConfig) -> Result<(), String> {
    let (dungeon, report) = generate_dungeon(config).map_err(|err| err.to_string())?;
    let seed = report.seed;

    if let SeparationOutcome::Converged { .. } = report.separation {
        for (index, a) in dungeon.rooms.iter().enumerate() {
            for b in &dungeon.rooms[index + 1..] {
                if rooms_overlap(a, b, config.tile_size) {
                    return Err(format!("{} overlaps {} on seed {seed}", a.id, b.id));
                }
            }
        }
    }

    let allowed_costs = [config.empty_tile_cost, config.corridor_cost, config.room_cost];
    for tile in dungeon.grid.tiles() {
        for connection in &tile.connections {
            if !allowed_costs.contains(&connection.cost) {
                return Err(format!("{} has stray edge cost {}", tile.id, connection.cost));
            }
            if dungeon.grid.tile(connection.to).is_none() {
                return Err(format!("{} links off the grid on seed {seed}", tile.id));
            }
        }
    }

    let room_tiles: BTreeSet<_> =
        dungeon.rooms.iter().flat_map(|room| room.tiles.iter().copied()).collect();
    for (id, tiles) in &dungeon.corridors {
        for tile in tiles {
            match dungeon.grid.kind(*tile) {
                Some(TileKind::Corridor | TileKind::Door) => {}
                other => return Err(format!("corridor {id:?} holds {tile} of kind {other:?}")),
            }
        }
    }
    for (tile, door) in &dungeon.doors {
        if !door.direction.is_valid() {
            return Err(format!("door at {tile} has direction {:?}", door.direction));
        }
        if dungeon.grid.kind(*tile) != Some(TileKind::Door) {
            return Err(format!("door table entry {tile} is not a door tile"));
        }
    }
    if dungeon.grid.count_kind(TileKind::Room) > room_tiles.len() {
        return Err(format!("room-typed tiles outside any room on seed {seed}"));
    }

    let expected_pairs = dungeon.rooms.len().saturating_sub(1);
    if dungeon.corridors.len() + report.skipped_connections.len() != expected_pairs {
        return Err(format!(
            "{} corridors and {} skips for {expected_pairs} room pairs",
            dungeon.corridors.len(),
            report.skipped_connections.len()
        ));
    }

    Ok(())
}

#[test]
fn test_fuzz_generation_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(32));
    let seeds = (any::<u64>(), any::<u64>());

    runner
        .run(&seeds, |(layout_seed, knob_seed)| {
            check_invariants(&random_config(layout_seed, knob_seed))
                .map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("generation should preserve invariants across random configurations");
}
