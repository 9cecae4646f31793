use std::time::Duration;

use ghostlane_campaign::{Campaign, LevelGenerator};
use ghostlane_core::{CellCoord, Event, TowerKind, UpgradeLevels};
use ghostlane_engine::{Simulation, SimulationConfig, Snapshot};
use ghostlane_system_spawning::SpawnSelection;

#[derive(Clone, Copy, Debug)]
enum Step {
    Place(TowerKind, CellCoord),
    Remove(CellCoord),
    Activate(CellCoord),
    Advance(Duration),
    Pause(bool),
}

fn script() -> Vec<Step> {
    let mut steps = vec![
        Step::Place(TowerKind::Basic, CellCoord::new(0, 2)),
        Step::Place(TowerKind::Robot, CellCoord::new(2, 1)),
        Step::Place(TowerKind::Basic, CellCoord::new(4, 2)),
    ];
    for frame in 0..1_500u32 {
        steps.push(Step::Advance(Duration::from_millis(16 + u64::from(frame % 5))));
        match frame {
            300 => steps.push(Step::Place(TowerKind::Turbo, CellCoord::new(1, 3))),
            420 => steps.push(Step::Activate(CellCoord::new(1, 3))),
            600 => steps.push(Step::Pause(true)),
            640 => steps.push(Step::Pause(false)),
            900 => steps.push(Step::Remove(CellCoord::new(0, 2))),
            1_000 => steps.push(Step::Place(TowerKind::Mega, CellCoord::new(3, 4))),
            _ => {}
        }
    }
    steps
}

fn replay(seed: u64, selection: SpawnSelection) -> (Vec<Event>, Vec<Snapshot>) {
    let mut simulation = Simulation::new(SimulationConfig {
        seed,
        spawn_selection: selection,
    });
    let config = Campaign::new().level(3).expect("campaign has a third level");
    simulation
        .initialize_level(config, UpgradeLevels::default())
        .expect("campaign levels are valid");

    let mut snapshots = Vec::new();
    for step in script() {
        match step {
            Step::Place(kind, cell) => {
                let _ = simulation.place_tower(kind, cell);
            }
            Step::Remove(cell) => {
                let _ = simulation.remove_tower(cell);
            }
            Step::Activate(cell) => {
                let _ = simulation.activate_tower(cell);
            }
            Step::Advance(dt) => {
                simulation.advance_by(dt);
                snapshots.push(simulation.snapshot());
            }
            Step::Pause(paused) => simulation.set_paused(paused),
        }
    }
    (simulation.drain_events(), snapshots)
}

#[test]
fn same_seed_and_script_replay_identically() {
    let first = replay(2024, SpawnSelection::Uniform);
    let second = replay(2024, SpawnSelection::Uniform);

    assert_eq!(first.0, second.0, "event logs diverged");
    assert_eq!(first.1, second.1, "snapshots diverged");
    assert!(first
        .0
        .iter()
        .any(|event| matches!(event, Event::GhostSpawned { .. })));
}

#[test]
fn escalating_selection_replays_identically() {
    assert_eq!(
        replay(5, SpawnSelection::Escalating),
        replay(5, SpawnSelection::Escalating)
    );
}

#[test]
fn different_seeds_diverge() {
    let spawns = |seed: u64| -> Vec<Event> {
        replay(seed, SpawnSelection::Uniform)
            .0
            .into_iter()
            .filter(|event| matches!(event, Event::GhostSpawned { .. }))
            .collect()
    };
    assert_ne!(spawns(1), spawns(2));
}
