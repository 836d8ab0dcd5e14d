use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::mapgen::rooms_overlap;
use dungeon_core::{DungeonConfig, HeuristicKind, TileKind, generate_dungeon};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting generation sweep from seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut degenerate_runs = 0_u32;
    let mut skipped_pairs = 0_usize;

    for run in 0..args.runs {
        let min_room_tiles = 1 + (rng.next_u64() % 4) as u32;
        let config = DungeonConfig {
            seed: Some(rng.next_u64()),
            room_count: 2 + (rng.next_u64() % 20) as u32,
            min_room_tiles,
            max_room_tiles: min_room_tiles + (rng.next_u64() % 8) as u32,
            dungeon_radius: 500.0 + (rng.next_u64() % 12_000) as f32,
            heuristic: choose(
                &mut rng,
                &[
                    HeuristicKind::Manhattan,
                    HeuristicKind::Euclidean,
                    HeuristicKind::SqrtEuclidean,
                    HeuristicKind::Octile,
                    HeuristicKind::Chebyshev,
                ],
            ),
            ..Default::default()
        };

        let (dungeon, report) = generate_dungeon(&config)?;
        if !report.separation.is_converged() {
            degenerate_runs += 1;
        }
        skipped_pairs += report.skipped_connections.len();

        // Assert invariants
        if report.separation.is_converged() {
            for (index, a) in dungeon.rooms.iter().enumerate() {
                for b in &dungeon.rooms[index + 1..] {
                    if rooms_overlap(a, b, config.tile_size) {
                        bail!("run {run} seed {}: {} overlaps {}", report.seed, a.id, b.id);
                    }
                }
            }
        }
        for (tile, door) in &dungeon.doors {
            if !door.direction.is_valid() || dungeon.grid.kind(*tile) != Some(TileKind::Door) {
                bail!("run {run} seed {}: bad door at {tile}", report.seed);
            }
        }
    }

    println!(
        "Sweep completed: {} runs, {} degenerate separations, {} skipped room pairs.",
        args.runs, degenerate_runs, skipped_pairs
    );
    Ok(())
}
