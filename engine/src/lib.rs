#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven simulation engine for Ghostlane.
//!
//! [`Simulation`] owns the authoritative world and every decision system. A
//! host calls [`Simulation::advance`] once per rendered frame with a timestamp
//! measured from the start of the level; the engine converts it into a delta
//! and runs the frame pipeline:
//!
//! 1. tick the world clock, passive regeneration and particles,
//! 2. spawn director,
//! 3. tower targeting and tower behaviour,
//! 4. projectile movement and collisions,
//! 5. melee contacts and ghost movement,
//! 6. win/loss evaluation,
//! 7. invariant verification.
//!
//! Player requests are applied synchronously and answered with a `Result`.
//! Every world event is buffered until the host drains it.

mod clock;

use std::time::Duration;

use ghostlane_core::{
    ActivationError, CellCoord, Command, Event, GameStatus, GhostSnapshot, GhostView,
    LevelConfig, LevelConfigError, ParticleSnapshot, ParticleView, PlacementError,
    ProgressSnapshot, ProjectileSnapshot, ProjectileView, RemovalError, TowerId, TowerKind,
    TowerSnapshot, TowerTarget, TowerView, UpgradeLevels,
};
use ghostlane_system_melee::Melee;
use ghostlane_system_outcome::OutcomeEvaluator;
use ghostlane_system_spawning::{Config as SpawningConfig, SpawnSelection, Spawning};
use ghostlane_system_tower_combat::TowerCombat;
use ghostlane_system_tower_targeting::TowerTargeting;
use ghostlane_world::{self as world, invariants, query, World};
use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use clock::FrameClock;

/// Parameters fixed for the lifetime of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Seed every random stream is derived from.
    pub seed: u64,
    /// Rule the spawn director uses to pick ghost kinds.
    pub spawn_selection: SpawnSelection,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            spawn_selection: SpawnSelection::Uniform,
        }
    }
}

/// Owned copy of everything a renderer reads after a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Ledger, counters and lifecycle flags.
    pub progress: ProgressSnapshot,
    /// Towers ordered by identifier.
    pub towers: Vec<TowerSnapshot>,
    /// Ghosts ordered by identifier, lingering ones included.
    pub ghosts: Vec<GhostSnapshot>,
    /// Projectiles in flight ordered by identifier.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Cosmetic particles ordered by identifier.
    pub particles: Vec<ParticleSnapshot>,
}

/// Terminal report handed to the progression layer after a victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Lives left when the level was won.
    pub final_lives: u32,
    /// Lives the level started with.
    pub max_lives: u32,
}

/// Headless Ghostlane simulation.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    clock: FrameClock,
    spawning: Spawning,
    targeting: TowerTargeting,
    combat: TowerCombat,
    melee: Melee,
    outcome: OutcomeEvaluator,
    melee_rng: ChaCha8Rng,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates an idle simulation; call [`Simulation::initialize_level`] to start playing.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let mut seeder = ChaCha8Rng::seed_from_u64(config.seed);
        let spawn_seed: u64 = seeder.gen();
        let melee_seed: u64 = seeder.gen();

        Self {
            world: World::new(),
            clock: FrameClock::new(),
            spawning: Spawning::new(SpawningConfig::new(config.spawn_selection, spawn_seed)),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            melee: Melee::new(),
            outcome: OutcomeEvaluator::new(),
            melee_rng: ChaCha8Rng::seed_from_u64(melee_seed),
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Resets every collection, timer and counter and starts `config`.
    ///
    /// The host timestamp base restarts at zero.
    pub fn initialize_level(
        &mut self,
        config: LevelConfig,
        upgrades: UpgradeLevels,
    ) -> Result<(), LevelConfigError> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::InitializeLevel { config, upgrades },
            &mut events,
        );
        let rejection = events.iter().find_map(|event| match event {
            Event::LevelRejected { reason } => Some(*reason),
            _ => None,
        });
        self.events.append(&mut events);
        if let Some(reason) = rejection {
            return Err(reason);
        }
        self.restart_timers();
        Ok(())
    }

    /// Restarts the current level with the same configuration and upgrades.
    pub fn reset(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Reset, &mut events);
        if events
            .iter()
            .any(|event| matches!(event, Event::LevelInitialized { .. }))
        {
            self.restart_timers();
        }
        self.events.append(&mut events);
    }

    /// Pauses or resumes the simulation.
    pub fn set_paused(&mut self, paused: bool) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::SetPaused { paused }, &mut events);
        self.events.append(&mut events);
    }

    /// Runs one frame for the host timestamp `now`.
    ///
    /// The first timestamp after a level starts or resets only anchors the
    /// clock. Paused, idle and concluded simulations only record the
    /// timestamp, as does a call that repeats the previous timestamp.
    pub fn advance(&mut self, now: Duration) {
        let dt = self.clock.observe(now);
        self.run_if_playing(dt);
    }

    /// Runs one frame `dt` after the previously observed timestamp.
    pub fn advance_by(&mut self, dt: Duration) {
        let dt = self.clock.step(dt);
        self.run_if_playing(dt);
    }

    /// Builds a tower at `cell`, paying its cost from the ledger.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        let events = self.submit(Command::PlaceTower { kind, cell });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::InvalidState))
    }

    /// Sells the tower at `cell` and returns the refunded energy.
    pub fn remove_tower(&mut self, cell: CellCoord) -> Result<u32, RemovalError> {
        let events = self.submit(Command::RemoveTower { cell });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerRemoved { refund, .. } => Some(Ok(*refund)),
                Event::TowerRemovalRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(RemovalError::InvalidState))
    }

    /// Triggers the manual ability of the tower at `cell`.
    pub fn activate_tower(&mut self, cell: CellCoord) -> Result<(), ActivationError> {
        let events = self.submit(Command::ActivateTower { cell });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerActivated { .. } => Some(Ok(())),
                Event::TowerActivationRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(ActivationError::InvalidState))
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Ledger, counters and lifecycle flags.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        query::progress(&self.world)
    }

    /// Configuration of the loaded level, if any.
    #[must_use]
    pub fn level(&self) -> Option<&LevelConfig> {
        query::level(&self.world)
    }

    /// Spendable energy.
    #[must_use]
    pub fn energy(&self) -> u32 {
        query::ledger(&self.world).energy()
    }

    /// Lives left.
    #[must_use]
    pub fn lives(&self) -> u32 {
        query::ledger(&self.world).lives()
    }

    /// Towers on the grid.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Tower occupying `cell`, if any.
    #[must_use]
    pub fn tower_at(&self, cell: CellCoord) -> Option<TowerSnapshot> {
        query::tower_at(&self.world, cell)
    }

    /// Ghosts on the field, lingering ones included.
    #[must_use]
    pub fn ghosts(&self) -> GhostView {
        query::ghost_view(&self.world)
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Cosmetic particles.
    #[must_use]
    pub fn particles(&self) -> ParticleView {
        query::particle_view(&self.world)
    }

    /// Owned copy of the full query surface.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            progress: self.progress(),
            towers: self.towers().into_vec(),
            ghosts: self.ghosts().into_vec(),
            projectiles: self.projectiles().into_vec(),
            particles: self.particles().into_vec(),
        }
    }

    /// Terminal report of a won level, `None` until the level is won.
    #[must_use]
    pub fn completion(&self) -> Option<Completion> {
        if self.status() != GameStatus::Victory {
            return None;
        }
        let ledger = query::ledger(&self.world);
        Some(Completion {
            final_lives: ledger.lives(),
            max_lives: ledger.max_lives(),
        })
    }

    /// Removes and returns every event buffered since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn run_if_playing(&mut self, dt: Duration) {
        if dt.is_zero() {
            return;
        }
        let progress = query::progress(&self.world);
        if progress.status != GameStatus::Playing || progress.paused {
            return;
        }
        self.run_frame(dt);
    }

    fn restart_timers(&mut self) {
        self.clock.restart();
        self.spawning.reset();
        self.targets.clear();
    }

    /// Applies a single player command and returns the events it produced.
    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.events.extend(events.iter().cloned());
        events
    }

    fn run_frame(&mut self, dt: Duration) {
        let mut frame_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut frame_events);

        let progress = query::progress(&self.world);
        if let Some(level) = query::level(&self.world) {
            self.spawning
                .handle(&frame_events, &progress, level, &mut self.commands);
        }
        self.flush_commands(&mut frame_events);

        let status = query::status(&self.world);
        let towers = query::tower_view(&self.world);
        let ghosts = query::ghost_view(&self.world);
        self.targeting
            .handle(status, &towers, &ghosts, &mut self.targets);
        self.combat.handle(
            status,
            &towers,
            &self.targets,
            query::elapsed(&self.world),
            dt,
            &mut self.commands,
        );
        self.flush_commands(&mut frame_events);

        world::apply(
            &mut self.world,
            Command::AdvanceProjectiles { dt },
            &mut frame_events,
        );

        let towers = query::tower_view(&self.world);
        let ghosts = query::ghost_view(&self.world);
        self.melee.handle(
            status,
            &towers,
            &ghosts,
            dt,
            &mut self.melee_rng,
            &mut self.commands,
        );
        self.flush_commands(&mut frame_events);

        world::apply(&mut self.world, Command::AdvanceGhosts { dt }, &mut frame_events);

        self.outcome
            .handle(&query::progress(&self.world), &mut self.commands);
        self.flush_commands(&mut frame_events);

        if let Some(status) = frame_events.iter().find_map(|event| match event {
            Event::StatusChanged { to, .. } if to.is_terminal() => Some(*to),
            _ => None,
        }) {
            info!("level ended in {status:?}");
        }

        self.verify_invariants();
        self.events.append(&mut frame_events);
    }

    fn flush_commands(&mut self, frame_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, frame_events);
        }
    }

    fn verify_invariants(&mut self) {
        let violations = invariants::check(&self.world);
        if violations.is_empty() {
            return;
        }
        for violation in &violations {
            error!("world invariant violated: {violation}");
        }
        debug_assert!(
            violations.is_empty(),
            "world invariants violated: {violations:?}"
        );
        invariants::repair(&mut self.world);
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
