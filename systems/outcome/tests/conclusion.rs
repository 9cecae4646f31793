use std::time::Duration;

use ghostlane_core::{
    CellCoord, Command, Event, GameStatus, GhostKind, LevelConfig, TowerKind, UpgradeLevels,
    DEATH_WINDOW,
};
use ghostlane_system_outcome::OutcomeEvaluator;
use ghostlane_world::{self as world, query, World};

fn start(quota: u32) -> World {
    start_with_energy(quota, 0)
}

fn start_with_energy(quota: u32, initial_energy: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::InitializeLevel {
            config: LevelConfig {
                id: 1,
                name: "Outcome".to_owned(),
                total_ghosts_to_defeat: quota,
                spawn_interval_ms: 1_000,
                allowed_ghosts: vec![GhostKind::Medroso],
                hp_multiplier: 1.0,
                speed_multiplier: 100.0,
                initial_energy,
            },
            upgrades: UpgradeLevels::default(),
        },
        &mut events,
    );
    world
}

fn frame(world: &mut World, evaluator: &OutcomeEvaluator, events: &mut Vec<Event>) {
    let dt = Duration::from_millis(16);
    world::apply(world, Command::Tick { dt }, events);
    world::apply(world, Command::AdvanceGhosts { dt }, events);
    let mut commands = Vec::new();
    evaluator.handle(&query::progress(world), &mut commands);
    for command in commands {
        world::apply(world, command, events);
    }
}

#[test]
fn three_leaks_end_the_level_in_defeat_once() {
    let mut world = start(3);
    let evaluator = OutcomeEvaluator::new();
    let mut events = Vec::new();
    for row in 0..3 {
        world::apply(
            &mut world,
            Command::SpawnGhost {
                row,
                kind: GhostKind::Medroso,
            },
            &mut events,
        );
    }

    // Medroso at 100x speed crosses the lane in 10 frames.
    for _ in 0..20 {
        frame(&mut world, &evaluator, &mut events);
    }

    assert_eq!(query::status(&world), GameStatus::Defeat);
    let conclusions = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::StatusChanged {
                    to: GameStatus::Defeat,
                    ..
                }
            )
        })
        .count();
    assert_eq!(conclusions, 1);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::LevelCompleted { .. })));
}

#[test]
fn victory_waits_for_the_leak_window_to_clear() {
    let mut world = start(1);
    let evaluator = OutcomeEvaluator::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnGhost {
            row: 4,
            kind: GhostKind::Medroso,
        },
        &mut events,
    );

    for _ in 0..11 {
        frame(&mut world, &evaluator, &mut events);
    }
    assert_eq!(query::ledger(&world).lives(), 2);
    assert_eq!(query::status(&world), GameStatus::Playing);

    for _ in 0..40 {
        frame(&mut world, &evaluator, &mut events);
    }
    assert_eq!(query::status(&world), GameStatus::Victory);

    let completions: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::LevelCompleted {
                final_lives,
                max_lives,
            } => Some((*final_lives, *max_lives)),
            _ => None,
        })
        .collect();
    assert_eq!(completions, vec![(2, 3)]);

    let mut commands = Vec::new();
    evaluator.handle(&query::progress(&world), &mut commands);
    assert!(commands.is_empty(), "a concluded level must not conclude again");
}

#[test]
fn victory_lands_one_death_window_after_the_last_kill() {
    let mut world = start_with_energy(1, 100);
    let evaluator = OutcomeEvaluator::new();
    let mut events = Vec::new();
    let cell = CellCoord::new(4, 8);
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Robot,
            cell,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnGhost {
            row: 4,
            kind: GhostKind::Medroso,
        },
        &mut events,
    );
    let robot = query::tower_at(&world, cell).expect("robot placed").id;
    let ghost = query::ghost_view(&world).into_vec()[0].id;
    world::apply(
        &mut world,
        Command::EngageMelee {
            ghost,
            robot,
            damage_to_ghost: 1_000.0,
            damage_to_robot: 0.0,
        },
        &mut events,
    );
    assert_eq!(query::progress(&world).defeated, 1);
    let killed_at = query::elapsed(&world);

    // 16 ms frames: the window closes on the first frame at or past 450 ms.
    let frames_in_window = 28;
    for _ in 0..frames_in_window {
        frame(&mut world, &evaluator, &mut events);
    }
    assert_eq!(query::status(&world), GameStatus::Playing);
    assert_eq!(query::progress(&world).ghosts_remaining, 1);

    frame(&mut world, &evaluator, &mut events);
    assert_eq!(query::status(&world), GameStatus::Victory);
    let waited = query::elapsed(&world) - killed_at;
    assert!(waited >= DEATH_WINDOW);
    assert!(waited < DEATH_WINDOW + Duration::from_millis(16));
}
