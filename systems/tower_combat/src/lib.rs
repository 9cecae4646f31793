#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns tower cooldowns and targeting data into commands.
//!
//! Every tower is handled by its role: shooters fire when they hold a target
//! and their cooldown has elapsed, energy towers produce on cooldown, and
//! robots crawl forward every frame.

use std::time::Duration;

use ghostlane_core::{
    frame_units, Command, GameStatus, TowerId, TowerRole, TowerSnapshot, TowerTarget, TowerView,
};

/// Tower combat system that queues behaviour commands for every tower.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits fire, produce and crawl commands for the current frame.
    ///
    /// `tower_targets` must be ordered by tower identifier, as produced by the
    /// targeting system. `now` is the simulated clock after this frame's tick.
    pub fn handle(
        &mut self,
        status: GameStatus,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        now: Duration,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        if status != GameStatus::Playing {
            return;
        }

        self.scratch.clear();
        let frames = frame_units(dt);

        for tower in towers.iter() {
            match tower.kind.role() {
                TowerRole::Shooter(_) => {
                    if has_target(tower_targets, tower.id) && tower.is_ready(now) {
                        self.scratch
                            .push(Command::FireProjectile { tower: tower.id });
                    }
                }
                TowerRole::Producer => {
                    if tower.is_ready(now) {
                        self.scratch
                            .push(Command::ProduceEnergy { tower: tower.id });
                    }
                }
                TowerRole::Blocker => {
                    if let Some(distance) = crawl_distance(tower, frames) {
                        self.scratch.push(Command::CrawlRobot {
                            tower: tower.id,
                            distance,
                        });
                    }
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn has_target(targets: &[TowerTarget], tower: TowerId) -> bool {
    targets
        .binary_search_by_key(&tower, |target| target.tower)
        .is_ok()
}

fn crawl_distance(tower: &TowerSnapshot, frames: f32) -> Option<f32> {
    let distance = tower.stats().crawl_speed * frames;
    (distance > 0.0).then_some(distance)
}
