//! Static unit tables for towers, ghosts and projectiles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TowerLevel;

/// Types of towers that can be placed on the lane grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TowerKind {
    /// Cheap shooter firing plasma bolts down its lane.
    Basic,
    /// Rapid-fire fan whose gusts push ghosts back toward the entrance.
    Turbo,
    /// Melee blocker that crawls forward and wrestles ghosts it touches.
    Robot,
    /// Generator that periodically produces energy.
    Energy,
    /// Slow, heavy shooter firing long-range beams.
    Mega,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [TowerKind; 5] = [
        TowerKind::Basic,
        TowerKind::Turbo,
        TowerKind::Robot,
        TowerKind::Energy,
        TowerKind::Mega,
    ];

    /// Energy charged when the tower is placed.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 25,
            Self::Turbo => 50,
            Self::Robot => 40,
            Self::Energy => 60,
            Self::Mega => 100,
        }
    }

    /// Energy returned when the tower is sold back.
    ///
    /// The refund is a fixed percentage of the base cost, rounded down.
    #[must_use]
    pub const fn refund(self) -> u32 {
        self.cost() * crate::REFUND_PERCENT / 100
    }

    /// Behaviour family that drives the tower each frame.
    #[must_use]
    pub const fn role(self) -> TowerRole {
        match self {
            Self::Basic => TowerRole::Shooter(ProjectileKind::Plasma),
            Self::Turbo => TowerRole::Shooter(ProjectileKind::Wind),
            Self::Mega => TowerRole::Shooter(ProjectileKind::Beam),
            Self::Energy => TowerRole::Producer,
            Self::Robot => TowerRole::Blocker,
        }
    }

    /// Projectile emitted by the tower, if it shoots at all.
    #[must_use]
    pub const fn projectile(self) -> Option<ProjectileKind> {
        match self.role() {
            TowerRole::Shooter(kind) => Some(kind),
            TowerRole::Producer | TowerRole::Blocker => None,
        }
    }

    /// Resolves the level-scaled stat block for the tower.
    #[must_use]
    pub fn stats(self, level: TowerLevel) -> TowerStats {
        let step = f32::from(level.get() - 1);
        let step_ms = u64::from(level.get() - 1);
        match self {
            Self::Basic => TowerStats {
                damage: 10.0 + 5.0 * step,
                cooldown: Duration::from_millis(1_000u64.saturating_sub(100 * step_ms).max(200)),
                range_in_cells: 3.0,
                ..TowerStats::EMPTY
            },
            Self::Turbo => TowerStats {
                damage: 5.0 + 3.0 * step,
                cooldown: Duration::from_millis(200),
                range_in_cells: 2.0,
                knockback: 5.0 + 2.0 * step,
                ..TowerStats::EMPTY
            },
            Self::Robot => TowerStats {
                damage: 20.0 + 10.0 * step,
                hp: 100.0 + 50.0 * step,
                crawl_speed: 0.2 + 0.1 * step,
                ..TowerStats::EMPTY
            },
            Self::Energy => TowerStats {
                cooldown: Duration::from_millis(5_000u64.saturating_sub(500 * step_ms).max(2_000)),
                production: 10 + 5 * u32::from(level.get() - 1),
                ..TowerStats::EMPTY
            },
            Self::Mega => TowerStats {
                damage: 50.0 + 25.0 * step,
                cooldown: Duration::from_millis(2_000 - 200 * step_ms),
                range_in_cells: 4.0,
                ..TowerStats::EMPTY
            },
        }
    }
}

/// Behaviour family of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TowerRole {
    /// Fires the contained projectile kind at the nearest ghost in its lane.
    Shooter(ProjectileKind),
    /// Credits energy whenever its cooldown elapses.
    Producer,
    /// Blocks ghosts by contact and trades melee damage with them.
    Blocker,
}

/// Level-scaled parameters for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage dealt per projectile, or per melee strike for robots.
    pub damage: f32,
    /// Minimum simulated time between two actions.
    pub cooldown: Duration,
    /// Forward reach measured in grid cells.
    pub range_in_cells: f32,
    /// Lane percentage a hit pushes the ghost back toward the entrance.
    pub knockback: f32,
    /// Energy credited per production cycle.
    pub production: u32,
    /// Durability; only robots can be damaged.
    pub hp: f32,
    /// Lane percentage a robot crawls forward per frame unit.
    pub crawl_speed: f32,
}

impl TowerStats {
    const EMPTY: Self = Self {
        damage: 0.0,
        cooldown: Duration::ZERO,
        range_in_cells: 0.0,
        knockback: 0.0,
        production: 0,
        hp: 1.0,
        crawl_speed: 0.0,
    };

    /// Forward reach converted to lane percentage.
    #[must_use]
    pub fn range_percent(&self) -> f32 {
        self.range_in_cells * crate::CELL_WIDTH_PERCENT
    }
}

/// Ghost varieties that haunt the lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GhostKind {
    /// Cheeky all-rounder.
    Travesso,
    /// Fragile but fast.
    Medroso,
    /// Slow, heavily padded sleeper.
    Sonolento,
    /// Dust king with sturdy hp and a hard swing.
    Poeira,
}

impl GhostKind {
    /// Every ghost kind ordered from mildest to toughest.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Travesso,
        GhostKind::Medroso,
        GhostKind::Sonolento,
        GhostKind::Poeira,
    ];

    /// Unscaled movement speed in lane percent per frame unit.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::Travesso => 0.06,
            Self::Medroso => 0.1,
            Self::Sonolento => 0.03,
            Self::Poeira => 0.05,
        }
    }

    /// Unscaled hit points.
    #[must_use]
    pub const fn base_hp(self) -> f32 {
        match self {
            Self::Travesso => 50.0,
            Self::Medroso => 30.0,
            Self::Sonolento => 100.0,
            Self::Poeira => 60.0,
        }
    }

    /// Damage dealt to a robot on a successful melee strike.
    #[must_use]
    pub const fn melee_damage(self) -> f32 {
        match self {
            Self::Travesso => 5.0,
            Self::Medroso => 3.0,
            Self::Sonolento => 8.0,
            Self::Poeira => 6.0,
        }
    }
}

/// Lifecycle stage of a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostStatus {
    /// Moving and targetable.
    Alive,
    /// Defeated; lingers only for its death animation.
    Dying,
    /// Breached the base edge; lingers only for its exit animation.
    Leaking,
}

/// Projectile varieties fired by shooter towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Basic tower bolt.
    Plasma,
    /// Turbo tower gust.
    Wind,
    /// Mega tower beam.
    Beam,
}

impl ProjectileKind {
    /// Flight speed in lane percent per frame unit.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Plasma => 0.5,
            Self::Wind => 0.6,
            Self::Beam => 1.5,
        }
    }
}
