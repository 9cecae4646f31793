#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn director responsible for pacing ghost spawn commands.
//!
//! The director accumulates simulated time from [`Event::TimeAdvanced`] and
//! emits at most one [`Command::SpawnGhost`] per frame once the level's spawn
//! interval has elapsed. The timer restarts from zero after every spawn, so
//! excess time is dropped rather than carried into the next interval.

use std::time::Duration;

use ghostlane_core::{
    Command, Event, GameStatus, GhostKind, LevelConfig, ProgressSnapshot, GRID_ROWS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rule used to pick the kind of each spawned ghost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpawnSelection {
    /// Uniformly random over the level's allowed kinds.
    #[default]
    Uniform,
    /// Harder kinds unlock as the spawned fraction of the quota grows,
    /// always restricted to the level's allowed kinds.
    Escalating,
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    selection: SpawnSelection,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided selection rule and seed.
    #[must_use]
    pub const fn new(selection: SpawnSelection, rng_seed: u64) -> Self {
        Self {
            selection,
            rng_seed,
        }
    }
}

/// Pure system that emits spawn commands while a level is playing.
#[derive(Debug)]
pub struct Spawning {
    selection: SpawnSelection,
    timer: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            selection: config.selection,
            timer: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Restarts the spawn timer, typically when a level is (re)initialised.
    pub fn reset(&mut self) {
        self.timer = Duration::ZERO;
    }

    /// Consumes events and the level's progress to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        progress: &ProgressSnapshot,
        level: &LevelConfig,
        out: &mut Vec<Command>,
    ) {
        if progress.status != GameStatus::Playing || progress.paused {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::LevelInitialized { .. } => self.reset(),
                _ => {}
            }
        }
        if accumulated.is_zero() {
            return;
        }

        self.timer = self.timer.saturating_add(accumulated);
        if self.timer < level.spawn_interval() || progress.spawned >= progress.quota {
            return;
        }
        self.timer = Duration::ZERO;

        let Some(kind) = self.select_kind(progress, &level.allowed_ghosts) else {
            return;
        };
        let row = self.rng.gen_range(0..GRID_ROWS);
        out.push(Command::SpawnGhost { row, kind });
    }

    fn select_kind(
        &mut self,
        progress: &ProgressSnapshot,
        allowed: &[GhostKind],
    ) -> Option<GhostKind> {
        let pool: Vec<GhostKind> = match self.selection {
            SpawnSelection::Uniform => allowed.to_vec(),
            SpawnSelection::Escalating => {
                let unlocked = escalation_tier(progress.spawned, progress.quota);
                let mixed: Vec<GhostKind> = allowed
                    .iter()
                    .copied()
                    .filter(|kind| unlocked.contains(kind))
                    .collect();
                if mixed.is_empty() {
                    allowed.to_vec()
                } else {
                    mixed
                }
            }
        };
        if pool.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..pool.len());
        pool.get(index).copied()
    }
}

/// Ghost kinds mixed in at the given stage of the quota.
fn escalation_tier(spawned: u32, quota: u32) -> &'static [GhostKind] {
    let progress = if quota == 0 {
        1.0
    } else {
        f64::from(spawned) / f64::from(quota)
    };
    if progress < 0.25 {
        &[GhostKind::Travesso]
    } else if progress < 0.5 {
        &[GhostKind::Travesso, GhostKind::Medroso]
    } else if progress < 0.75 {
        &[GhostKind::Medroso, GhostKind::Sonolento]
    } else {
        &[GhostKind::Sonolento, GhostKind::Poeira]
    }
}
