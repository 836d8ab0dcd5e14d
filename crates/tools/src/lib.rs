//! Helpers shared by the command-line tools: config loading and text diagnostics.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::mapgen::{Door, Room, SeparationOutcome, TileGrid};
use dungeon_core::{CorridorId, DungeonConfig, GeneratedDungeon, GenerationReport, TileId, TileKind};
use serde::Serialize;

/// Reads a JSON configuration. Missing fields take their defaults; the result is validated.
pub fn load_config(path: &Path) -> Result<DungeonConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: DungeonConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config JSON: {}", path.display()))?;
    config.validate().with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}

/// JSON-facing view of a generated dungeon.
#[derive(Serialize)]
pub struct DungeonDump<'a> {
    pub seed: u64,
    pub grid: &'a TileGrid,
    pub rooms: &'a [Room],
    pub corridors: Vec<CorridorDump<'a>>,
    pub doors: Vec<&'a Door>,
}

#[derive(Serialize)]
pub struct CorridorDump<'a> {
    pub id: CorridorId,
    pub tiles: &'a [TileId],
}

impl<'a> DungeonDump<'a> {
    pub fn new(dungeon: &'a GeneratedDungeon, report: &GenerationReport) -> Self {
        Self {
            seed: report.seed,
            grid: &dungeon.grid,
            rooms: &dungeon.rooms,
            corridors: dungeon
                .corridors
                .iter()
                .map(|(&id, tiles)| CorridorDump { id, tiles })
                .collect(),
            doors: dungeon.doors.values().collect(),
        }
    }
}

pub fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '.',
        TileKind::Room => '#',
        TileKind::Corridor => '+',
        TileKind::Door => 'D',
    }
}

/// One line per grid row, max-Y row first.
pub fn render_ascii(dungeon: &GeneratedDungeon) -> String {
    let cols = dungeon.grid.cols().max(1) as usize;
    let mut out = String::with_capacity(dungeon.grid.len() + dungeon.grid.rows() as usize);
    for row in dungeon.grid.tiles().chunks(cols) {
        out.extend(row.iter().map(|tile| tile_glyph(tile.kind)));
        out.push('\n');
    }
    out
}

pub fn summarize(dungeon: &GeneratedDungeon, report: &GenerationReport) -> String {
    let separation = match report.separation {
        SeparationOutcome::Converged { passes } => format!("converged after {passes} passes"),
        SeparationOutcome::Degenerate { passes, overlapping_rooms } => {
            format!("gave up after {passes} passes with {overlapping_rooms} rooms overlapping")
        }
    };
    let mut out = format!(
        "Seed: {}\nGrid: {}x{} tiles\nRooms: {}\nCorridors: {}\nDoors: {}\n\
         Fingerprint: {:016x}\nSeparation: {separation}\n",
        report.seed,
        dungeon.grid.cols(),
        dungeon.grid.rows(),
        dungeon.rooms.len(),
        dungeon.corridors.len(),
        dungeon.doors.len(),
        dungeon.fingerprint(),
    );
    for skipped in &report.skipped_connections {
        out.push_str(&format!("Skipped: {} -> {}: {}\n", skipped.from, skipped.to, skipped.reason));
    }
    out
}
