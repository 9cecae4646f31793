#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ghostlane simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Positions use two coordinate systems that are never conflated: a
//! [`CellCoord`] addresses the discrete placement grid, while a
//! [`LanePosition`] measures continuous motion as a percentage of lane width.

mod level;
mod stats;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use level::{InvalidTowerLevel, LevelConfig, LevelConfigError, TowerLevel, UpgradeLevels};
pub use stats::{GhostKind, GhostStatus, ProjectileKind, TowerKind, TowerRole, TowerStats};

/// Number of lanes on the battlefield.
pub const GRID_ROWS: u32 = 5;
/// Number of placement columns in every lane.
pub const GRID_COLUMNS: u32 = 9;
/// Width of a single grid column expressed in lane percent.
pub const CELL_WIDTH_PERCENT: f32 = 100.0 / GRID_COLUMNS as f32;

/// Lives granted at the start of every level.
pub const INITIAL_LIVES: u32 = 3;
/// Energy credited whenever a ghost is defeated.
pub const ENERGY_PER_KILL: u32 = 15;
/// Simulated time between two passive energy credits.
pub const PASSIVE_ENERGY_INTERVAL: Duration = Duration::from_millis(2_000);
/// Energy credited by each passive tick.
pub const PASSIVE_ENERGY_AMOUNT: u32 = 5;
/// Upper clamp for the energy balance.
pub const ENERGY_CEILING: u32 = 9_999;
/// Percentage of a tower's base cost returned on sale.
pub const REFUND_PERCENT: u32 = 50;

/// Reference frame length that per-frame speeds are expressed against.
pub const FRAME_UNIT: Duration = Duration::from_millis(16);

/// Lane position at which ghosts enter the field.
pub const GHOST_ENTRY_X: f32 = 100.0;
/// Lane position beyond which projectiles are discarded.
pub const FIELD_EXIT_X: f32 = 105.0;
/// Visual width of a ghost in lane percent.
pub const GHOST_HITBOX_WIDTH: f32 = 6.0;
/// Visual width of a projectile in lane percent.
pub const PROJECTILE_HITBOX_WIDTH: f32 = 3.0;
/// Maximum centre distance at which a projectile strikes a ghost.
pub const HIT_THRESHOLD: f32 = (GHOST_HITBOX_WIDTH + PROJECTILE_HITBOX_WIDTH) / 2.0;
/// Maximum centre distance at which a robot blocks a ghost.
pub const ROBOT_CONTACT_DISTANCE: f32 = 6.0;
/// Probability per frame unit that either side of a melee lands a strike.
pub const MELEE_STRIKE_CHANCE_PER_FRAME: f64 = 0.05;
/// Time a defeated ghost lingers before removal.
pub const DEATH_WINDOW: Duration = Duration::from_millis(450);
/// Time a leaking ghost lingers before removal.
pub const LEAK_WINDOW: Duration = Duration::from_millis(450);
/// Upper bound on simultaneously live particles.
pub const MAX_PARTICLES: usize = 256;

/// Converts a simulated delta into fractional frame units.
#[must_use]
pub fn frame_units(dt: Duration) -> f32 {
    (dt.as_secs_f64() / FRAME_UNIT.as_secs_f64()) as f32
}

/// Lifecycle state of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// No level has been initialised yet.
    Idle,
    /// A level is running.
    Playing,
    /// Every ghost in the quota was spawned and cleared.
    Victory,
    /// The player ran out of lives.
    Defeat,
}

impl GameStatus {
    /// Reports whether the status ends the level.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// Terminal result of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The level was cleared.
    Victory,
    /// The base fell.
    Defeat,
}

impl Outcome {
    /// Status the simulation enters for this outcome.
    #[must_use]
    pub const fn status(self) -> GameStatus {
        match self {
            Self::Victory => GameStatus::Victory,
            Self::Defeat => GameStatus::Defeat,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets every collection, timer and counter and starts the level.
    InitializeLevel {
        /// Parameters of the level to play.
        config: LevelConfig,
        /// Tiers new towers are built at.
        upgrades: UpgradeLevels,
    },
    /// Restarts the most recently initialised level.
    Reset,
    /// Freezes or resumes the simulation.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Advances the simulated clock, passive regeneration and particles.
    Tick {
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a ghost enter the provided lane.
    SpawnGhost {
        /// Lane the ghost enters.
        row: u32,
        /// Variety of ghost to spawn.
        kind: GhostKind,
    },
    /// Requests that a shooter tower fire at its lane.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
    },
    /// Requests that an energy tower deliver its production.
    ProduceEnergy {
        /// Tower that produces.
        tower: TowerId,
    },
    /// Moves a robot tower forward along its lane.
    CrawlRobot {
        /// Robot that crawls.
        tower: TowerId,
        /// Lane percentage to advance.
        distance: f32,
    },
    /// Player request to trigger a tower ability immediately.
    ActivateTower {
        /// Cell holding the tower.
        cell: CellCoord,
    },
    /// Moves every projectile and resolves collisions.
    AdvanceProjectiles {
        /// Simulated time that elapsed this frame.
        dt: Duration,
    },
    /// Blocks a ghost against a robot and applies the rolled strikes.
    EngageMelee {
        /// Ghost held in place.
        ghost: GhostId,
        /// Robot holding the ghost.
        robot: TowerId,
        /// Damage the robot deals to the ghost this frame.
        damage_to_ghost: f32,
        /// Damage the ghost deals to the robot this frame.
        damage_to_robot: f32,
    },
    /// Moves every unblocked ghost and resolves deaths and breaches.
    AdvanceGhosts {
        /// Simulated time that elapsed this frame.
        dt: Duration,
    },
    /// Ends the level with the provided outcome.
    ConcludeLevel {
        /// Terminal result to enter.
        outcome: Outcome,
    },
    /// Player request to build a tower.
    PlaceTower {
        /// Kind of tower to build.
        kind: TowerKind,
        /// Target cell.
        cell: CellCoord,
    },
    /// Player request to sell the tower in a cell.
    RemoveTower {
        /// Cell holding the tower to sell.
        cell: CellCoord,
    },
}

/// Reason energy entered the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnergySource {
    /// Periodic passive regeneration.
    Passive,
    /// Output of an energy tower.
    Production,
    /// Reward for defeating a ghost.
    Kill,
    /// Partial refund from selling a tower.
    Refund,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A level was initialised and is now playing.
    LevelInitialized {
        /// Identifier of the level.
        level: u32,
        /// Starting energy balance.
        energy: u32,
        /// Starting lives.
        lives: u32,
    },
    /// A level configuration was refused and nothing changed.
    LevelRejected {
        /// Validation failure.
        reason: LevelConfigError,
    },
    /// The pause flag changed.
    PauseChanged {
        /// New pause flag.
        paused: bool,
    },
    /// Simulated time advanced.
    TimeAdvanced {
        /// Duration of the advancement.
        dt: Duration,
    },
    /// A ghost entered the field.
    GhostSpawned {
        /// Identifier allocated to the ghost.
        ghost: GhostId,
        /// Lane it entered.
        row: u32,
        /// Its variety.
        kind: GhostKind,
    },
    /// A tower emitted a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Projectile variety.
        kind: ProjectileKind,
    },
    /// A tower ability was triggered manually.
    TowerActivated {
        /// Tower that was activated.
        tower: TowerId,
    },
    /// Energy was credited.
    EnergyCredited {
        /// Amount actually credited after clamping.
        amount: u32,
        /// Why the energy arrived.
        source: EnergySource,
    },
    /// Energy was spent.
    EnergySpent {
        /// Amount deducted.
        amount: u32,
    },
    /// A projectile struck a ghost.
    GhostHit {
        /// Ghost that was hit.
        ghost: GhostId,
        /// Projectile consumed by the hit.
        projectile: ProjectileId,
        /// Damage dealt.
        damage: f32,
        /// Ghost hp after the hit, floored at zero.
        remaining_hp: f32,
    },
    /// A robot and a ghost traded melee strikes.
    MeleeExchanged {
        /// Ghost involved.
        ghost: GhostId,
        /// Robot involved.
        robot: TowerId,
        /// Damage the ghost received.
        damage_to_ghost: f32,
        /// Damage the robot received.
        damage_to_robot: f32,
    },
    /// A ghost was defeated.
    GhostDefeated {
        /// Ghost that died.
        ghost: GhostId,
        /// Energy credited for the kill.
        reward: u32,
    },
    /// A ghost breached the base edge.
    GhostLeaked {
        /// Ghost that leaked.
        ghost: GhostId,
    },
    /// A life was lost.
    LifeLost {
        /// Lives left afterwards.
        remaining: u32,
    },
    /// A lingering ghost finished its window and left the world.
    GhostRemoved {
        /// Ghost that was removed.
        ghost: GhostId,
    },
    /// A tower was built.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Kind of tower.
        kind: TowerKind,
        /// Cell it occupies.
        cell: CellCoord,
        /// Tier it was built at.
        level: TowerLevel,
    },
    /// A placement request was refused and nothing changed.
    TowerPlacementRejected {
        /// Requested kind.
        kind: TowerKind,
        /// Requested cell.
        cell: CellCoord,
        /// Why the request failed.
        reason: PlacementError,
    },
    /// A tower was sold.
    TowerRemoved {
        /// Tower that was sold.
        tower: TowerId,
        /// Cell that was freed.
        cell: CellCoord,
        /// Energy refunded.
        refund: u32,
    },
    /// A removal request was refused and nothing changed.
    TowerRemovalRejected {
        /// Requested cell.
        cell: CellCoord,
        /// Why the request failed.
        reason: RemovalError,
    },
    /// An activation request was refused and nothing changed.
    TowerActivationRejected {
        /// Requested cell.
        cell: CellCoord,
        /// Why the request failed.
        reason: ActivationError,
    },
    /// A robot was destroyed or walked off the field.
    TowerDestroyed {
        /// Robot that was removed.
        tower: TowerId,
        /// Cell that was freed.
        cell: CellCoord,
    },
    /// The simulation status changed.
    StatusChanged {
        /// Previous status.
        from: GameStatus,
        /// New status.
        to: GameStatus,
    },
    /// The level was won; hosts compute rewards from this report.
    LevelCompleted {
        /// Lives left at the end of the level.
        final_lives: u32,
        /// Lives the level started with.
        max_lives: u32,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a ghost.
///
/// Identifiers increase with spawn order, so sorting by id yields creation
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u32);

impl ParticleId {
    /// Creates a new particle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based lane index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Reports whether the cell lies on the battlefield grid.
    #[must_use]
    pub const fn is_on_grid(&self) -> bool {
        self.row < GRID_ROWS && self.column < GRID_COLUMNS
    }

    /// Lane position of the cell's horizontal centre.
    #[must_use]
    pub fn centre(&self) -> LanePosition {
        LanePosition::new(self.column as f32 * CELL_WIDTH_PERCENT + CELL_WIDTH_PERCENT / 2.0)
    }
}

/// Continuous horizontal position inside a lane, in percent of lane width.
///
/// Ghosts enter at `100` and travel toward `0`; projectiles travel toward
/// increasing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct LanePosition(f32);

impl LanePosition {
    /// Creates a lane position from a raw percentage.
    #[must_use]
    pub const fn new(percent: f32) -> Self {
        Self(percent)
    }

    /// Raw percentage.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Absolute distance to another lane position.
    #[must_use]
    pub fn distance_to(&self, other: LanePosition) -> f32 {
        (self.0 - other.0).abs()
    }
}

/// Colour applied to a cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Creates a tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Shape of a cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Small fragment flying outward.
    Burst,
    /// Expanding ring left in place.
    Ring,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell the tower was built on.
    pub cell: CellCoord,
    /// Tier the tower was built at.
    pub level: TowerLevel,
    /// Simulated time of the tower's last action.
    pub last_action: Duration,
    /// Remaining durability.
    pub hp: f32,
    /// Durability at construction.
    pub max_hp: f32,
    /// Distance a robot has crawled forward from its cell.
    pub lane_offset: f32,
}

impl TowerSnapshot {
    /// Level-scaled stats of the tower.
    #[must_use]
    pub fn stats(&self) -> TowerStats {
        self.kind.stats(self.level)
    }

    /// Current lane position of the tower, including any crawl offset.
    #[must_use]
    pub fn lane_position(&self) -> LanePosition {
        LanePosition::new(self.cell.centre().get() + self.lane_offset)
    }

    /// Reports whether the tower's cooldown has elapsed at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Duration) -> bool {
        now.checked_sub(self.last_action)
            .map_or(false, |elapsed| elapsed >= self.stats().cooldown)
    }
}

/// Immutable representation of a single ghost's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSnapshot {
    /// Identifier allocated to the ghost.
    pub id: GhostId,
    /// Variety of the ghost.
    pub kind: GhostKind,
    /// Lane the ghost travels in.
    pub row: u32,
    /// Current position along the lane.
    pub position: LanePosition,
    /// Scaled speed in lane percent per frame unit.
    pub speed: f32,
    /// Remaining hit points.
    pub hp: f32,
    /// Scaled hit points at spawn.
    pub max_hp: f32,
    /// Lifecycle stage.
    pub status: GhostStatus,
    /// Whether a robot held the ghost in place this frame.
    pub blocked: bool,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Projectile variety.
    pub kind: ProjectileKind,
    /// Tower that fired the projectile.
    pub source: TowerId,
    /// Lane the projectile travels in.
    pub row: u32,
    /// Current position along the lane.
    pub position: LanePosition,
    /// Speed in lane percent per frame unit.
    pub speed: f32,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Push applied to the struck ghost.
    pub knockback: f32,
}

/// Immutable representation of a cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot {
    /// Identifier allocated to the particle.
    pub id: ParticleId,
    /// Shape of the particle.
    pub kind: ParticleKind,
    /// Horizontal position in lane percent.
    pub x: f32,
    /// Vertical position in field percent.
    pub y: f32,
    /// Per-frame displacement.
    pub velocity: (f32, f32),
    /// Remaining life in `(0, 1]`.
    pub life: f32,
    /// Colour of the particle.
    pub tint: Tint,
}

/// Counters and flags describing the progress of the running level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Current lifecycle status.
    pub status: GameStatus,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Spendable energy.
    pub energy: u32,
    /// Lives left.
    pub lives: u32,
    /// Lives the level started with.
    pub max_lives: u32,
    /// Ghosts created so far.
    pub spawned: u32,
    /// Ghosts defeated so far.
    pub defeated: u32,
    /// Ghosts that must be spawned and cleared.
    pub quota: u32,
    /// Ghosts still present in any state.
    pub ghosts_remaining: u32,
    /// Simulated time since the level started.
    pub elapsed: Duration,
}

/// Read-only snapshot describing all towers on the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all ghosts on the field.
#[derive(Clone, Debug, Default)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new ghost view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ghosts in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over ghosts that still take part in gameplay.
    pub fn alive(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots
            .iter()
            .filter(|ghost| ghost.status == GhostStatus::Alive)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<GhostSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectiles in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all live particles.
#[derive(Clone, Debug, Default)]
pub struct ParticleView {
    snapshots: Vec<ParticleSnapshot>,
}

impl ParticleView {
    /// Creates a new particle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ParticleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured particles in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ParticleSnapshot> {
        self.snapshots
    }
}

/// Target chosen for a shooter tower during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// Ghost selected as the nearest approaching threat.
    pub ghost: GhostId,
    /// Lane distance between tower and ghost.
    pub distance: f32,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The level is not playing or the simulation is paused.
    #[error("towers can only be placed while the level is playing")]
    InvalidState,
    /// The requested cell lies outside the grid.
    #[error("cell is outside the grid")]
    OutOfBounds,
    /// The requested cell already holds a tower.
    #[error("cell is already occupied")]
    Occupied,
    /// The ledger cannot cover the tower's cost.
    #[error("insufficient energy")]
    InsufficientEnergy,
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RemovalError {
    /// The level is not playing or the simulation is paused.
    #[error("towers can only be sold while the level is playing")]
    InvalidState,
    /// The requested cell lies outside the grid.
    #[error("cell is outside the grid")]
    OutOfBounds,
    /// No tower occupies the requested cell.
    #[error("no tower in cell")]
    MissingTower,
}

/// Reasons a manual tower activation may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ActivationError {
    /// The level is not playing or the simulation is paused.
    #[error("towers can only be activated while the level is playing")]
    InvalidState,
    /// No tower occupies the requested cell.
    #[error("no tower in cell")]
    MissingTower,
    /// The tower has no manual ability.
    #[error("tower has no manual ability")]
    Unsupported,
    /// The tower's cooldown has not elapsed yet.
    #[error("tower is cooling down")]
    CoolingDown,
}
