use std::time::Duration;

use ghostlane_core::{
    CellCoord, Command, GhostId, GhostKind, LevelConfig, TowerId, TowerKind, TowerTarget,
    UpgradeLevels,
};
use ghostlane_system_tower_targeting::TowerTargeting;
use ghostlane_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn deterministic_replay_tracks_lane_threats_until_paused() {
    let script = scripted_commands();
    let script_len = script.len();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.len(), script_len);

    // Right after the two spawns both ghosts sit at the entrance, out of reach.
    assert!(first[4].is_empty());

    let engaged = first
        .iter()
        .position(|targets| !targets.is_empty())
        .expect("ghosts eventually enter range");
    let assignment = first[engaged][0];
    assert_eq!(assignment.tower, TowerId::new(0));
    assert_eq!(
        assignment.ghost,
        GhostId::new(0),
        "equidistant ghosts resolve to the lower id"
    );

    let paused = first.last().expect("script is not empty");
    assert!(paused.is_empty(), "paused frames must not target");
}

fn replay(commands: Vec<Command>) -> Vec<Vec<TowerTarget>> {
    let mut world = World::new();
    let mut targeting = TowerTargeting::new();
    let mut assignments = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        let progress = query::progress(&world);
        let status = if progress.paused {
            ghostlane_core::GameStatus::Idle
        } else {
            progress.status
        };
        let mut current = Vec::new();
        targeting.handle(
            status,
            &query::tower_view(&world),
            &query::ghost_view(&world),
            &mut current,
        );
        assignments.push(current);
    }

    assignments
}

fn scripted_commands() -> Vec<Command> {
    let mut script = vec![
        Command::InitializeLevel {
            config: LevelConfig {
                id: 1,
                name: "Replay".to_owned(),
                total_ghosts_to_defeat: 2,
                spawn_interval_ms: 1_000,
                allowed_ghosts: vec![GhostKind::Sonolento],
                hp_multiplier: 1.0,
                speed_multiplier: 1.0,
                initial_energy: 100,
            },
            upgrades: UpgradeLevels::default(),
        },
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(2, 5),
        },
        Command::SpawnGhost {
            row: 2,
            kind: GhostKind::Sonolento,
        },
        Command::SpawnGhost {
            row: 2,
            kind: GhostKind::Sonolento,
        },
        Command::Tick { dt: FRAME },
    ];
    for _ in 0..400 {
        script.push(Command::AdvanceGhosts { dt: FRAME });
        script.push(Command::Tick { dt: FRAME });
    }
    script.push(Command::SetPaused { paused: true });
    script
}
