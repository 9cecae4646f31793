#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Ghostlane.
//!
//! The world owns every entity collection and the resource ledger. It is only
//! ever mutated through [`apply`], which validates each [`Command`] and
//! reports the outcome as [`Event`] values, including explicit rejections.

mod ghosts;
pub mod invariants;
mod ledger;
mod particles;
mod projectiles;
mod towers;

use std::time::Duration;

use ghostlane_core::{
    frame_units, ActivationError, CellCoord, Command, EnergySource, Event, GameStatus, GhostId,
    GhostStatus, LevelConfig, Outcome, PlacementError, ProjectileId, ProjectileKind,
    RemovalError, TowerId, TowerKind, TowerRole, UpgradeLevels, DEATH_WINDOW, ENERGY_PER_KILL,
    GHOST_ENTRY_X, GRID_ROWS, INITIAL_LIVES, LEAK_WINDOW,
};
use log::{debug, info, warn};

pub use ledger::Ledger;

use ghosts::{GhostState, Movement};
use particles::ParticleField;
use projectiles::ProjectileState;
use towers::TowerRegistry;

/// Represents the authoritative Ghostlane world state.
#[derive(Debug)]
pub struct World {
    status: GameStatus,
    paused: bool,
    level: Option<LevelConfig>,
    upgrades: UpgradeLevels,
    clock: Duration,
    ledger: Ledger,
    towers: TowerRegistry,
    ghosts: Vec<GhostState>,
    projectiles: Vec<ProjectileState>,
    particles: ParticleField,
    spawned: u32,
    defeated: u32,
    next_ghost_id: GhostId,
    next_projectile_id: ProjectileId,
}

impl World {
    /// Creates an idle world with no level loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: GameStatus::Idle,
            paused: false,
            level: None,
            upgrades: UpgradeLevels::default(),
            clock: Duration::ZERO,
            ledger: Ledger::new(0, INITIAL_LIVES),
            towers: TowerRegistry::new(),
            ghosts: Vec::new(),
            projectiles: Vec::new(),
            particles: ParticleField::new(),
            spawned: 0,
            defeated: 0,
            next_ghost_id: GhostId::new(0),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    fn is_running(&self) -> bool {
        self.status == GameStatus::Playing && !self.paused
    }

    fn quota(&self) -> u32 {
        self.level
            .as_ref()
            .map_or(0, |level| level.total_ghosts_to_defeat)
    }

    fn start(&mut self, config: LevelConfig, upgrades: UpgradeLevels, out_events: &mut Vec<Event>) {
        let previous = self.status;
        let level = config.id;
        let energy = config.initial_energy;
        *self = Self::new();
        self.ledger = Ledger::new(energy, INITIAL_LIVES);
        self.level = Some(config);
        self.upgrades = upgrades;
        self.status = GameStatus::Playing;

        info!(
            "level {level} initialised with {} energy and {} lives",
            self.ledger.energy(),
            self.ledger.lives()
        );
        out_events.push(Event::LevelInitialized {
            level,
            energy: self.ledger.energy(),
            lives: self.ledger.lives(),
        });
        if previous != GameStatus::Playing {
            out_events.push(Event::StatusChanged {
                from: previous,
                to: GameStatus::Playing,
            });
        }
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        id
    }

    fn fire(&mut self, tower_id: TowerId, kind: ProjectileKind, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let Some(tower) = self.towers.get_mut(tower_id) else {
            return;
        };
        tower.last_action = now;
        let stats = tower.kind.stats(tower.level);
        let row = tower.cell.row();
        let origin = tower.lane_position().get();

        let id = self.allocate_projectile_id();
        self.projectiles.push(ProjectileState::new(
            id,
            kind,
            tower_id,
            row,
            origin,
            stats.damage,
            stats.knockback,
        ));
        debug!("tower {} fired {kind:?} in lane {row}", tower_id.get());
        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower: tower_id,
            kind,
        });
    }

    fn defeat(&mut self, ghost_id: GhostId, out_events: &mut Vec<Event>) {
        let until = self.clock + DEATH_WINDOW;
        let Some(ghost) = self
            .ghosts
            .iter_mut()
            .find(|ghost| ghost.id == ghost_id && ghost.is_alive())
        else {
            return;
        };
        ghost.hp = ghost.hp.max(0.0);
        ghost.retire(GhostStatus::Dying, until);
        let (row, x) = (ghost.row, ghost.x);

        self.defeated = self.defeated.saturating_add(1);
        let reward = self.ledger.credit(ENERGY_PER_KILL);
        self.particles.burst(row, x, particles::DEATH_TINT, 8);

        debug!("ghost {} defeated in lane {row}", ghost_id.get());
        out_events.push(Event::GhostDefeated {
            ghost: ghost_id,
            reward,
        });
        out_events.push(Event::EnergyCredited {
            amount: reward,
            source: EnergySource::Kill,
        });
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), PlacementError> {
        if !self.is_running() {
            return Err(PlacementError::InvalidState);
        }
        if !cell.is_on_grid() {
            return Err(PlacementError::OutOfBounds);
        }
        if self.towers.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        let cost = kind.cost();
        if !self.ledger.spend(cost) {
            return Err(PlacementError::InsufficientEnergy);
        }

        let level = self.upgrades.level_for(kind);
        let Some(tower) = self.towers.insert(kind, cell, level, self.clock) else {
            let _ = self.ledger.credit(cost);
            return Err(PlacementError::Occupied);
        };
        self.particles
            .burst(cell.row(), cell.centre().get(), particles::BUILD_TINT, 8);

        debug!("placed {kind:?} tower {} at {cell:?}", tower.get());
        out_events.push(Event::EnergySpent { amount: cost });
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            cell,
            level,
        });
        Ok(())
    }

    fn remove_tower(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RemovalError> {
        if !self.is_running() {
            return Err(RemovalError::InvalidState);
        }
        if !cell.is_on_grid() {
            return Err(RemovalError::OutOfBounds);
        }
        let tower = self
            .towers
            .occupant(cell)
            .and_then(|id| self.towers.remove(id))
            .ok_or(RemovalError::MissingTower)?;

        let refund = self.ledger.credit(tower.kind.refund());
        self.particles
            .burst(cell.row(), cell.centre().get(), particles::SELL_TINT, 8);

        debug!("sold tower {} at {cell:?} for {refund}", tower.id.get());
        out_events.push(Event::TowerRemoved {
            tower: tower.id,
            cell,
            refund,
        });
        out_events.push(Event::EnergyCredited {
            amount: refund,
            source: EnergySource::Refund,
        });
        Ok(())
    }

    fn activate_tower(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActivationError> {
        if !self.is_running() {
            return Err(ActivationError::InvalidState);
        }
        let tower = self
            .towers
            .occupant(cell)
            .and_then(|id| self.towers.get(id))
            .ok_or(ActivationError::MissingTower)?;
        if tower.kind != TowerKind::Turbo {
            return Err(ActivationError::Unsupported);
        }
        if !tower.is_ready(self.clock) {
            return Err(ActivationError::CoolingDown);
        }

        let id = tower.id;
        self.fire(id, ProjectileKind::Wind, out_events);
        self.particles.burst(
            cell.row(),
            cell.centre().get(),
            particles::WIND_TINT,
            8,
        );
        out_events.push(Event::TowerActivated { tower: id });
        Ok(())
    }

    fn advance_ghosts(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let frames = frame_units(dt);

        let lethal: Vec<GhostId> = self
            .ghosts
            .iter()
            .filter(|ghost| ghost.is_alive() && ghost.hp <= 0.0)
            .map(|ghost| ghost.id)
            .collect();
        for ghost in lethal {
            self.defeat(ghost, out_events);
        }

        let robots: Vec<(u32, f32)> = self
            .towers
            .iter()
            .filter(|tower| tower.kind == TowerKind::Robot && tower.hp > 0.0)
            .map(|tower| (tower.cell.row(), tower.lane_position().get()))
            .collect();
        let leak_until = self.clock + LEAK_WINDOW;
        for ghost in self.ghosts.iter_mut().filter(|ghost| ghost.is_alive()) {
            let floor = robots
                .iter()
                .filter(|(row, x)| *row == ghost.row && *x < ghost.x)
                .map(|(_, x)| *x)
                .reduce(f32::max);
            if ghosts::step(ghost, frames, floor) == Movement::Moved {
                continue;
            }
            ghost.retire(GhostStatus::Leaking, leak_until);
            self.particles.burst(ghost.row, 0.0, particles::LEAK_TINT, 10);
            let fallen = self.ledger.lose_life();

            debug!("ghost {} breached lane {}", ghost.id.get(), ghost.row);
            out_events.push(Event::GhostLeaked { ghost: ghost.id });
            out_events.push(Event::LifeLost {
                remaining: self.ledger.lives(),
            });
            if fallen {
                info!("the last life was lost");
            }
        }

        let wrecked: Vec<TowerId> = self
            .towers
            .iter()
            .filter(|tower| {
                tower.kind == TowerKind::Robot
                    && (tower.hp <= 0.0 || tower.lane_position().get() > GHOST_ENTRY_X)
            })
            .map(|tower| tower.id)
            .collect();
        for id in wrecked {
            if let Some(robot) = self.towers.remove(id) {
                self.particles.burst(
                    robot.cell.row(),
                    robot.lane_position().get(),
                    particles::SELL_TINT,
                    8,
                );
                debug!("robot {} left the field", id.get());
                out_events.push(Event::TowerDestroyed {
                    tower: id,
                    cell: robot.cell,
                });
            }
        }

        for ghost in ghosts::sweep_expired(&mut self.ghosts, self.clock) {
            out_events.push(Event::GhostRemoved { ghost });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InitializeLevel { config, upgrades } => {
            if let Err(reason) = config.validate() {
                warn!("rejected level {}: {reason}", config.id);
                out_events.push(Event::LevelRejected { reason });
                return;
            }
            world.start(config, upgrades, out_events);
        }
        Command::Reset => match world.level.clone() {
            Some(config) => {
                info!("resetting level {}", config.id);
                let upgrades = world.upgrades;
                world.start(config, upgrades, out_events);
            }
            None => warn!("reset requested before any level was initialised"),
        },
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                info!("simulation {}", if paused { "paused" } else { "resumed" });
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::Tick { dt } => {
            if !world.is_running() {
                return;
            }
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            for ghost in &mut world.ghosts {
                ghost.blocked = false;
            }
            if let Some(amount) = world.ledger.accrue_passive(dt) {
                out_events.push(Event::EnergyCredited {
                    amount,
                    source: EnergySource::Passive,
                });
            }
            world.particles.decay(frame_units(dt));
        }
        Command::SpawnGhost { row, kind } => {
            if !world.is_running() || row >= GRID_ROWS {
                return;
            }
            let Some(level) = world.level.as_ref() else {
                return;
            };
            if world.spawned >= level.total_ghosts_to_defeat {
                warn!("spawn quota of {} already met", level.total_ghosts_to_defeat);
                return;
            }
            if !level.allowed_ghosts.contains(&kind) {
                warn!("{kind:?} is not allowed in level {}", level.id);
                return;
            }

            let hp = kind.base_hp() * level.hp_multiplier;
            let speed = kind.base_speed() * level.speed_multiplier;
            let id = world.next_ghost_id;
            world.next_ghost_id = GhostId::new(id.get().wrapping_add(1));
            world.spawned += 1;
            world.ghosts.push(GhostState {
                id,
                kind,
                row,
                x: GHOST_ENTRY_X,
                speed,
                hp,
                max_hp: hp,
                status: GhostStatus::Alive,
                blocked: false,
                remove_at: None,
            });
            debug!("spawned {kind:?} ghost {} in lane {row}", id.get());
            out_events.push(Event::GhostSpawned {
                ghost: id,
                row,
                kind,
            });
        }
        Command::FireProjectile { tower } => {
            if !world.is_running() {
                return;
            }
            let Some(state) = world.towers.get(tower) else {
                return;
            };
            let TowerRole::Shooter(kind) = state.kind.role() else {
                return;
            };
            if state.is_ready(world.clock) {
                world.fire(tower, kind, out_events);
            }
        }
        Command::ProduceEnergy { tower } => {
            if !world.is_running() {
                return;
            }
            let now = world.clock;
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };
            if state.kind.role() != TowerRole::Producer || !state.is_ready(now) {
                return;
            }
            state.last_action = now;
            let production = state.kind.stats(state.level).production;
            let (row, x) = (state.cell.row(), state.cell.centre().get());

            let amount = world.ledger.credit(production);
            world.particles.ring(row, x, particles::ENERGY_TINT);
            out_events.push(Event::EnergyCredited {
                amount,
                source: EnergySource::Production,
            });
        }
        Command::CrawlRobot { tower, distance } => {
            if !world.is_running() {
                return;
            }
            if let Some(robot) = world.towers.get_mut(tower) {
                if robot.kind == TowerKind::Robot && distance > 0.0 {
                    robot.lane_offset += distance;
                }
            }
        }
        Command::ActivateTower { cell } => {
            if let Err(reason) = world.activate_tower(cell, out_events) {
                warn!("activation at {cell:?} rejected: {reason}");
                out_events.push(Event::TowerActivationRejected { cell, reason });
            }
        }
        Command::AdvanceProjectiles { dt } => {
            if !world.is_running() {
                return;
            }
            let impacts =
                projectiles::advance(&mut world.projectiles, &mut world.ghosts, frame_units(dt));
            for impact in impacts {
                let tint = match impact.kind {
                    ProjectileKind::Plasma => particles::PLASMA_TINT,
                    ProjectileKind::Wind => particles::WIND_TINT,
                    ProjectileKind::Beam => particles::BEAM_TINT,
                };
                world.particles.burst(impact.row, impact.x, tint, 3);
                out_events.push(Event::GhostHit {
                    ghost: impact.ghost,
                    projectile: impact.projectile,
                    damage: impact.damage,
                    remaining_hp: impact.remaining_hp,
                });
                if impact.is_lethal() {
                    world.defeat(impact.ghost, out_events);
                }
            }
        }
        Command::EngageMelee {
            ghost,
            robot,
            damage_to_ghost,
            damage_to_robot,
        } => {
            if !world.is_running() {
                return;
            }
            let Some(tower) = world.towers.get_mut(robot) else {
                return;
            };
            if tower.kind != TowerKind::Robot {
                return;
            }
            let Some(target) = world
                .ghosts
                .iter_mut()
                .find(|candidate| candidate.id == ghost && candidate.is_targetable())
            else {
                return;
            };
            if target.row != tower.cell.row() {
                return;
            }

            target.blocked = true;
            let damage_to_ghost = damage_to_ghost.max(0.0);
            let damage_to_robot = damage_to_robot.max(0.0);
            target.take_damage(damage_to_ghost);
            tower.hp = (tower.hp - damage_to_robot).max(0.0);
            let lethal = target.hp <= 0.0;

            if damage_to_ghost > 0.0 || damage_to_robot > 0.0 {
                out_events.push(Event::MeleeExchanged {
                    ghost,
                    robot,
                    damage_to_ghost,
                    damage_to_robot,
                });
            }
            if lethal {
                world.defeat(ghost, out_events);
            }
        }
        Command::AdvanceGhosts { dt } => {
            if world.is_running() {
                world.advance_ghosts(dt, out_events);
            }
        }
        Command::ConcludeLevel { outcome } => {
            if world.status != GameStatus::Playing {
                return;
            }
            let to = outcome.status();
            world.status = to;
            info!(
                "level concluded with {outcome:?} after {:?}",
                world.clock
            );
            out_events.push(Event::StatusChanged {
                from: GameStatus::Playing,
                to,
            });
            if outcome == Outcome::Victory {
                out_events.push(Event::LevelCompleted {
                    final_lives: world.ledger.lives(),
                    max_lives: world.ledger.max_lives(),
                });
            }
        }
        Command::PlaceTower { kind, cell } => {
            if let Err(reason) = world.place_tower(kind, cell, out_events) {
                warn!("placement of {kind:?} at {cell:?} rejected: {reason}");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        }
        Command::RemoveTower { cell } => {
            if let Err(reason) = world.remove_tower(cell, out_events) {
                warn!("removal at {cell:?} rejected: {reason}");
                out_events.push(Event::TowerRemovalRejected { cell, reason });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use ghostlane_core::{
        CellCoord, GameStatus, GhostView, LevelConfig, ParticleView, ProgressSnapshot,
        ProjectileView, TowerSnapshot, TowerView, UpgradeLevels,
    };

    use super::{Ledger, World};

    /// Current lifecycle status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Reports whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Configuration of the loaded level, if any.
    #[must_use]
    pub fn level(world: &World) -> Option<&LevelConfig> {
        world.level.as_ref()
    }

    /// Upgrade tiers applied to newly placed towers.
    #[must_use]
    pub fn upgrades(world: &World) -> UpgradeLevels {
        world.upgrades
    }

    /// Simulated time since the level started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }

    /// Read-only access to the energy and lives ledger.
    #[must_use]
    pub fn ledger(world: &World) -> &Ledger {
        &world.ledger
    }

    /// Counters and flags describing level progress.
    #[must_use]
    pub fn progress(world: &World) -> ProgressSnapshot {
        ProgressSnapshot {
            status: world.status,
            paused: world.paused,
            energy: world.ledger.energy(),
            lives: world.ledger.lives(),
            max_lives: world.ledger.max_lives(),
            spawned: world.spawned,
            defeated: world.defeated,
            quota: world.quota(),
            ghosts_remaining: u32::try_from(world.ghosts.len()).unwrap_or(u32::MAX),
            elapsed: world.clock,
        }
    }

    /// Captures a read-only view of the towers on the grid.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Tower occupying `cell`, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerSnapshot> {
        world
            .towers
            .occupant(cell)
            .and_then(|id| world.towers.get(id))
            .map(|tower| tower.snapshot())
    }

    /// Captures a read-only view of every ghost, lingering ones included.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        GhostView::from_snapshots(world.ghosts.iter().map(|ghost| ghost.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the cosmetic particles.
    #[must_use]
    pub fn particle_view(world: &World) -> ParticleView {
        ParticleView::from_snapshots(world.particles.snapshots())
    }
}
