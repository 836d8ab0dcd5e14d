pub mod config;
pub mod dungeon;
pub mod mapgen;
pub mod types;

pub use config::{ConfigError, DungeonConfig, PremadeRoom};
pub use dungeon::{Dungeon, GenerateError, GenerationState};
pub use mapgen::{GeneratedDungeon, GenerationReport, generate_dungeon};
pub use types::*;
