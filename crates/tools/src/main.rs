use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dungeon_core::{Dungeon, DungeonConfig, HeuristicKind};
use dungeon_tools::{DungeonDump, load_config, render_ascii, summarize};
use env_logger::{Builder, Env};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON dungeon configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the configured seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Overrides the configured room count
    #[arg(short, long)]
    rooms: Option<u32>,
    /// Overrides the configured A* heuristic
    #[arg(long, value_parser = parse_heuristic)]
    heuristic: Option<HeuristicKind>,
    /// Prints the tile map as text
    #[arg(short, long)]
    draw: bool,
    /// Writes the generated tiles, rooms, corridors and doors as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_heuristic(value: &str) -> Result<HeuristicKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "manhattan" => Ok(HeuristicKind::Manhattan),
        "euclidean" => Ok(HeuristicKind::Euclidean),
        "sqrt-euclidean" | "sqrteuclidean" => Ok(HeuristicKind::SqrtEuclidean),
        "octile" => Ok(HeuristicKind::Octile),
        "chebyshev" => Ok(HeuristicKind::Chebyshev),
        other => Err(format!("unknown heuristic: {other}")),
    }
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DungeonConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(rooms) = args.rooms {
        config.room_count = rooms;
    }
    if let Some(heuristic) = args.heuristic {
        config.heuristic = heuristic;
    }
    let draw = args.draw || config.debug_draw;

    let mut dungeon = Dungeon::new(config);
    dungeon.generate().context("Dungeon generation failed")?;
    let (Some(generated), Some(report)) = (dungeon.generated(), dungeon.last_report()) else {
        bail!("Generation finished without output");
    };
    info!("generated with seed {}", report.seed);

    print!("{}", summarize(generated, report));
    if draw {
        println!();
        print!("{}", render_ascii(generated));
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&DungeonDump::new(generated, report))
            .context("Failed to serialize dungeon")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    }

    Ok(())
}
