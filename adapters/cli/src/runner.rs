//! Fixed-step headless driver for a single level.

use std::time::Duration;

use ghostlane_core::{Event, GameStatus};
use ghostlane_engine::{Completion, Simulation};

/// Bounds of a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunLimits {
    /// Simulated time advanced per frame.
    pub frame: Duration,
    /// Simulated time after which the run gives up.
    pub max_time: Duration,
}

/// Tallies gathered while the run was in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunTally {
    /// Frames advanced.
    pub frames: u64,
    /// Projectiles fired by towers.
    pub shots: u32,
    /// Ghosts that reached the house.
    pub leaks: u32,
    /// Melee exchanges between robots and ghosts.
    pub melee_exchanges: u32,
    /// Energy produced by generators.
    pub energy_produced: u32,
}

/// Final state reported once the run stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunReport {
    /// Status the level ended in; `Playing` means the time limit ran out.
    pub status: GameStatus,
    /// Simulated time that elapsed.
    pub elapsed: Duration,
    /// Ghosts spawned.
    pub spawned: u32,
    /// Ghosts defeated.
    pub defeated: u32,
    /// Level quota.
    pub quota: u32,
    /// Lives left.
    pub lives: u32,
    /// Energy left.
    pub energy: u32,
    /// Terminal report for the host, present only on victory.
    pub completion: Option<Completion>,
    /// Event tallies.
    pub tally: RunTally,
}

/// Advances `simulation` at a fixed step until it concludes or runs out of time.
pub(crate) fn run_to_conclusion(simulation: &mut Simulation, limits: RunLimits) -> RunReport {
    let mut tally = RunTally::default();
    let mut elapsed = Duration::ZERO;

    while !simulation.status().is_terminal() && elapsed < limits.max_time {
        simulation.advance_by(limits.frame);
        elapsed += limits.frame;
        tally.frames += 1;
        for event in simulation.drain_events() {
            match event {
                Event::ProjectileFired { .. } => tally.shots += 1,
                Event::GhostLeaked { .. } => tally.leaks += 1,
                Event::MeleeExchanged { .. } => tally.melee_exchanges += 1,
                Event::EnergyCredited {
                    amount,
                    source: ghostlane_core::EnergySource::Production,
                } => tally.energy_produced += amount,
                _ => {}
            }
        }
    }

    let progress = simulation.progress();
    RunReport {
        status: progress.status,
        elapsed: progress.elapsed,
        spawned: progress.spawned,
        defeated: progress.defeated,
        quota: progress.quota,
        lives: progress.lives,
        energy: progress.energy,
        completion: simulation.completion(),
        tally,
    }
}

#[cfg(test)]
mod tests {
    use ghostlane_core::{CellCoord, GhostKind, LevelConfig, TowerKind, UpgradeLevels};
    use ghostlane_engine::SimulationConfig;

    use super::*;

    fn start(config: LevelConfig) -> Simulation {
        let mut simulation = Simulation::new(SimulationConfig::default());
        simulation
            .initialize_level(config, UpgradeLevels::default())
            .expect("level is valid");
        simulation
    }

    fn level(hp_multiplier: f32, speed_multiplier: f32) -> LevelConfig {
        LevelConfig {
            id: 1,
            name: "Runner".to_owned(),
            total_ghosts_to_defeat: 3,
            spawn_interval_ms: 200,
            allowed_ghosts: vec![GhostKind::Medroso],
            hp_multiplier,
            speed_multiplier,
            initial_energy: 200,
        }
    }

    #[test]
    fn undefended_lanes_end_in_defeat() {
        let mut simulation = start(level(1.0, 40.0));
        let report = run_to_conclusion(
            &mut simulation,
            RunLimits {
                frame: Duration::from_millis(16),
                max_time: Duration::from_secs(60),
            },
        );

        assert_eq!(report.status, GameStatus::Defeat);
        assert_eq!(report.lives, 0);
        assert_eq!(report.tally.leaks, 3);
        assert_eq!(report.completion, None);
    }

    #[test]
    fn time_limit_stops_an_unfinished_level() {
        let mut simulation = start(level(1.0, 1.0));
        assert!(simulation
            .place_tower(TowerKind::Energy, CellCoord::new(0, 0))
            .is_ok());
        let report = run_to_conclusion(
            &mut simulation,
            RunLimits {
                frame: Duration::from_millis(20),
                max_time: Duration::from_millis(100),
            },
        );

        assert_eq!(report.status, GameStatus::Playing);
        assert_eq!(report.tally.frames, 5);
        assert_eq!(report.elapsed, Duration::from_millis(100));
    }
}
