//! A dungeon instance: owns its configuration and the most recent generation output.

use log::{info, warn};
use thiserror::Error;

use crate::config::{ConfigError, DungeonConfig};
use crate::mapgen::{
    DungeonGenerator, GeneratedDungeon, GenerationReport, GridTooLarge, MeshPlan, plan_meshes,
    runtime_seed,
};

/// `Generating` is only held inside [`Dungeon::generate`]. Since that takes `&mut self`, callers
/// never observe it; the guard rejects re-entry instead of queuing a second run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("a generation run is already in progress")]
    AlreadyGenerating,
    #[error("invalid dungeon configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error(transparent)]
    GridTooLarge(#[from] GridTooLarge),
}

#[derive(Debug)]
pub struct Dungeon {
    config: DungeonConfig,
    state: GenerationState,
    generated: Option<GeneratedDungeon>,
    last_report: Option<GenerationReport>,
}

impl Dungeon {
    pub fn new(config: DungeonConfig) -> Self {
        Self { config, state: GenerationState::Idle, generated: None, last_report: None }
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Replaces the configuration used by the next run. Existing output is kept until then.
    pub fn set_config(&mut self, config: DungeonConfig) {
        self.config = config;
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn generated(&self) -> Option<&GeneratedDungeon> {
        self.generated.as_ref()
    }

    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Clears prior output and rebuilds from the current configuration.
    ///
    /// A request made while a run is in progress is rejected without touching any state. An
    /// invalid configuration or an oversized grid leaves the instance reset and idle.
    pub fn generate(&mut self) -> Result<&GeneratedDungeon, GenerateError> {
        if self.state == GenerationState::Generating {
            warn!("ignoring generate request: a run is already in progress");
            return Err(GenerateError::AlreadyGenerating);
        }
        self.reset();
        self.config.validate()?;

        self.state = GenerationState::Generating;
        let seed = self.config.seed.unwrap_or_else(runtime_seed);
        let outcome = DungeonGenerator::new(&self.config, seed).generate();
        self.state = GenerationState::Idle;
        let (dungeon, report) = outcome?;

        if !report.is_clean() {
            warn!(
                "dungeon seed={seed} generated with degradations: separation={:?} skipped={}",
                report.separation,
                report.skipped_connections.len()
            );
        }
        info!("dungeon ready: {} tiles", dungeon.grid.len());
        self.last_report = Some(report);
        Ok(&*self.generated.insert(dungeon))
    }

    /// Drops the grid, rooms, corridors and doors of the last run.
    pub fn reset(&mut self) {
        if self.state == GenerationState::Generating {
            warn!("ignoring reset request: a run is in progress");
            return;
        }
        self.generated = None;
        self.last_report = None;
    }

    pub fn mesh_plan(&self) -> Option<MeshPlan> {
        self.generated.as_ref().map(plan_meshes)
    }
}

#[cfg(test)]
mod tests {
    use xxhash_rust::xxh3::xxh3_64;

    use super::*;
    use crate::config::PremadeRoom;
    use crate::types::Vec3;

    fn seeded(seed: u64) -> Dungeon {
        Dungeon::new(DungeonConfig { seed: Some(seed), room_count: 6, ..Default::default() })
    }

    fn counts(dungeon: &Dungeon) -> Option<(usize, usize, usize)> {
        dungeon.generated().map(|generated| {
            (generated.rooms.len(), generated.grid.len(), generated.corridors.len())
        })
    }

    #[test]
    fn request_during_a_run_is_rejected_and_changes_nothing() {
        let mut dungeon = seeded(5);
        dungeon.generate().expect("first run");
        let before = dungeon.generated().cloned();

        dungeon.state = GenerationState::Generating;
        assert_eq!(dungeon.generate().err(), Some(GenerateError::AlreadyGenerating));
        dungeon.reset();
        assert_eq!(dungeon.generated().cloned(), before);
        assert_eq!(dungeon.state(), GenerationState::Generating);
    }

    #[test]
    fn reset_then_generate_with_same_seed_is_identical() {
        let mut dungeon = seeded(77);
        let first = xxh3_64(&dungeon.generate().expect("first run").canonical_bytes());
        let first_counts = counts(&dungeon);

        dungeon.reset();
        assert!(dungeon.generated().is_none());
        assert!(dungeon.last_report().is_none());

        let second = xxh3_64(&dungeon.generate().expect("second run").canonical_bytes());
        assert_eq!(first, second);
        assert_eq!(first_counts, counts(&dungeon));
        assert_eq!(dungeon.state(), GenerationState::Idle);
    }

    #[test]
    fn invalid_config_reports_error_and_leaves_instance_reset() {
        let mut dungeon = seeded(1);
        dungeon.generate().expect("valid run");

        dungeon.set_config(DungeonConfig { min_room_tiles: 0, ..Default::default() });
        assert!(matches!(dungeon.generate(), Err(GenerateError::InvalidConfig(_))));
        assert!(dungeon.generated().is_none());
        assert_eq!(dungeon.state(), GenerationState::Idle);
    }

    #[test]
    fn oversized_grid_reports_error_and_returns_to_idle() {
        let room = |x: f32| PremadeRoom { center: Vec3::new(x, 0.0, 0.0), width: 1.0, height: 1.0 };
        let mut dungeon = Dungeon::new(DungeonConfig {
            seed: Some(3),
            tile_size: 0.1,
            room_count: 2,
            premade_rooms: vec![room(0.0), room(8000.0)],
            ..Default::default()
        });
        assert!(matches!(dungeon.generate(), Err(GenerateError::GridTooLarge(_))));
        assert!(dungeon.generated().is_none());
        assert!(dungeon.last_report().is_none());
        assert_eq!(dungeon.state(), GenerationState::Idle);
    }

    #[test]
    fn mesh_plan_follows_generated_output() {
        let mut dungeon = seeded(9);
        assert!(dungeon.mesh_plan().is_none());
        dungeon.generate().expect("valid run");
        let plan = dungeon.mesh_plan().expect("plan after generation");
        assert!(!plan.floors.is_empty());
        assert!(!plan.walls.is_empty());
    }
}
