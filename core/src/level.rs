//! Level parameters and upgrade progression supplied by the host.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GhostKind, TowerKind};

/// Upgrade tier of a tower, bounded to `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TowerLevel(u8);

impl TowerLevel {
    /// Entry tier every tower starts from.
    pub const MIN: Self = Self(1);
    /// Highest reachable tier.
    pub const MAX: Self = Self(3);

    /// Creates a tower level, rejecting tiers outside `1..=3`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric tier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Tier following this one, or `None` at the cap.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl Default for TowerLevel {
    fn default() -> Self {
        Self::MIN
    }
}

/// Raised when a serialized tower level falls outside `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("tower level {0} is outside 1..=3")]
pub struct InvalidTowerLevel(pub u8);

impl TryFrom<u8> for TowerLevel {
    type Error = InvalidTowerLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidTowerLevel(value))
    }
}

impl From<TowerLevel> for u8 {
    fn from(level: TowerLevel) -> Self {
        level.get()
    }
}

/// Meta-progression tier purchased for each tower kind.
///
/// The simulation only reads these values when a tower is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    basic: TowerLevel,
    turbo: TowerLevel,
    robot: TowerLevel,
    energy: TowerLevel,
    mega: TowerLevel,
}

impl UpgradeLevels {
    /// Tier new towers of `kind` are built at.
    #[must_use]
    pub const fn level_for(&self, kind: TowerKind) -> TowerLevel {
        match kind {
            TowerKind::Basic => self.basic,
            TowerKind::Turbo => self.turbo,
            TowerKind::Robot => self.robot,
            TowerKind::Energy => self.energy,
            TowerKind::Mega => self.mega,
        }
    }

    /// Overrides the tier for `kind`.
    pub fn set(&mut self, kind: TowerKind, level: TowerLevel) {
        let slot = match kind {
            TowerKind::Basic => &mut self.basic,
            TowerKind::Turbo => &mut self.turbo,
            TowerKind::Robot => &mut self.robot,
            TowerKind::Energy => &mut self.energy,
            TowerKind::Mega => &mut self.mega,
        };
        *slot = level;
    }
}

/// Fully resolved parameters for a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Stable level identifier.
    pub id: u32,
    /// Display name shown by hosts.
    #[serde(default)]
    pub name: String,
    /// Number of ghosts that must be spawned and cleared to win.
    pub total_ghosts_to_defeat: u32,
    /// Simulated milliseconds between consecutive spawns.
    pub spawn_interval_ms: u64,
    /// Ghost kinds the spawn director may pick from.
    pub allowed_ghosts: Vec<GhostKind>,
    /// Factor applied to every spawned ghost's base hp.
    pub hp_multiplier: f32,
    /// Factor applied to every spawned ghost's base speed.
    pub speed_multiplier: f32,
    /// Energy available when the level starts.
    pub initial_energy: u32,
}

impl LevelConfig {
    /// Spawn pacing as a duration.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Rejects configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), LevelConfigError> {
        if self.total_ghosts_to_defeat == 0 {
            return Err(LevelConfigError::EmptyQuota);
        }
        if self.spawn_interval_ms == 0 {
            return Err(LevelConfigError::ZeroSpawnInterval);
        }
        if self.allowed_ghosts.is_empty() {
            return Err(LevelConfigError::EmptyRoster);
        }
        for (field, value) in [
            ("hp_multiplier", self.hp_multiplier),
            ("speed_multiplier", self.speed_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LevelConfigError::InvalidMultiplier { field, value });
            }
        }
        Ok(())
    }
}

/// Reasons a level configuration is refused.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LevelConfigError {
    /// The level asks for zero ghosts.
    #[error("level must require at least one ghost")]
    EmptyQuota,
    /// Spawns would happen every frame without pacing.
    #[error("spawn interval must be greater than zero")]
    ZeroSpawnInterval,
    /// No ghost kind is allowed to spawn.
    #[error("level must allow at least one ghost kind")]
    EmptyRoster,
    /// A scaling factor is zero, negative or not finite.
    #[error("{field} must be a positive finite number, got {value}")]
    InvalidMultiplier {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}
