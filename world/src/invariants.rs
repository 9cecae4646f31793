//! World invariants - sanity checks that detect simulation bugs.
//!
//! None of these should ever trigger. Callers decide whether a violation is
//! fatal; [`repair`] restores the numeric bounds when it is not.

use ghostlane_core::{
    CellCoord, GhostId, TowerId, ENERGY_CEILING, GRID_COLUMNS, MAX_PARTICLES,
};
use thiserror::Error;

use crate::World;

/// A broken world invariant.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InvariantViolation {
    /// The occupancy grid points at a tower that does not occupy the cell.
    #[error("cell {cell:?} is mapped to tower {tower:?} which does not occupy it")]
    OccupancyMismatch {
        /// Cell holding the stale entry.
        cell: CellCoord,
        /// Tower the grid points at.
        tower: TowerId,
    },
    /// The number of occupied cells differs from the number of towers.
    #[error("{occupied} occupied cells for {towers} towers")]
    OccupancyCount {
        /// Occupied grid cells.
        occupied: usize,
        /// Registered towers.
        towers: usize,
    },
    /// A tower's hp left `[0, max_hp]`.
    #[error("tower {tower:?} has hp {hp} outside [0, {max_hp}]")]
    TowerHp {
        /// Offending tower.
        tower: TowerId,
        /// Stored hp.
        hp: f32,
        /// Stored maximum.
        max_hp: f32,
    },
    /// A ghost's hp went negative or above its maximum.
    #[error("ghost {ghost:?} has hp {hp} outside [0, {max_hp}]")]
    GhostHp {
        /// Offending ghost.
        ghost: GhostId,
        /// Stored hp.
        hp: f32,
        /// Stored maximum.
        max_hp: f32,
    },
    /// A ghost with no hp left is still marked alive after a frame.
    #[error("ghost {ghost:?} is alive with hp {hp}")]
    UndeadGhost {
        /// Offending ghost.
        ghost: GhostId,
        /// Stored hp.
        hp: f32,
    },
    /// The energy balance exceeds the ceiling.
    #[error("energy {energy} exceeds the ceiling")]
    EnergyCeiling {
        /// Stored balance.
        energy: u32,
    },
    /// More lives than the level started with.
    #[error("{lives} lives exceed the starting {max_lives}")]
    Lives {
        /// Stored lives.
        lives: u32,
        /// Starting lives.
        max_lives: u32,
    },
    /// More ghosts spawned than the level allows.
    #[error("{spawned} ghosts spawned for a quota of {quota}")]
    SpawnQuota {
        /// Ghosts created.
        spawned: u32,
        /// Quota of the level.
        quota: u32,
    },
    /// The particle pool outgrew its bound.
    #[error("{count} particles exceed the pool bound")]
    ParticlePool {
        /// Live particles.
        count: usize,
    },
}

/// Checks all world invariants.
///
/// Returns the violations found, or an empty list if all invariants hold.
#[must_use]
pub fn check(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut occupied = 0;
    for (index, slot) in world.towers.occupancy().iter().enumerate() {
        let Some(tower) = *slot else {
            continue;
        };
        occupied += 1;
        let cell = CellCoord::new(index as u32 / GRID_COLUMNS, index as u32 % GRID_COLUMNS);
        if world.towers.get(tower).map(|state| state.cell) != Some(cell) {
            violations.push(InvariantViolation::OccupancyMismatch { cell, tower });
        }
    }
    if occupied != world.towers.len() {
        violations.push(InvariantViolation::OccupancyCount {
            occupied,
            towers: world.towers.len(),
        });
    }

    for tower in world.towers.iter() {
        if !(0.0..=tower.max_hp).contains(&tower.hp) {
            violations.push(InvariantViolation::TowerHp {
                tower: tower.id,
                hp: tower.hp,
                max_hp: tower.max_hp,
            });
        }
    }

    for ghost in &world.ghosts {
        if !(0.0..=ghost.max_hp).contains(&ghost.hp) {
            violations.push(InvariantViolation::GhostHp {
                ghost: ghost.id,
                hp: ghost.hp,
                max_hp: ghost.max_hp,
            });
        }
        if ghost.is_alive() && ghost.hp <= 0.0 {
            violations.push(InvariantViolation::UndeadGhost {
                ghost: ghost.id,
                hp: ghost.hp,
            });
        }
    }

    let ledger = &world.ledger;
    if ledger.energy() > ENERGY_CEILING {
        violations.push(InvariantViolation::EnergyCeiling {
            energy: ledger.energy(),
        });
    }
    if ledger.lives() > ledger.max_lives() {
        violations.push(InvariantViolation::Lives {
            lives: ledger.lives(),
            max_lives: ledger.max_lives(),
        });
    }

    let quota = world.quota();
    if world.level.is_some() && world.spawned > quota {
        violations.push(InvariantViolation::SpawnQuota {
            spawned: world.spawned,
            quota,
        });
    }

    if world.particles.len() > MAX_PARTICLES {
        violations.push(InvariantViolation::ParticlePool {
            count: world.particles.len(),
        });
    }

    violations
}

/// Clamps hp values and the ledger back into their valid ranges.
pub fn repair(world: &mut World) {
    for tower in world.towers.iter_mut() {
        tower.hp = tower.hp.clamp(0.0, tower.max_hp);
    }
    for ghost in &mut world.ghosts {
        ghost.hp = ghost.hp.clamp(0.0, ghost.max_hp);
    }
    world.ledger.clamp();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply;
    use ghostlane_core::{
        Command, GhostKind, LevelConfig, TowerKind, UpgradeLevels,
    };

    fn playing() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::InitializeLevel {
                config: LevelConfig {
                    id: 1,
                    name: String::new(),
                    total_ghosts_to_defeat: 2,
                    spawn_interval_ms: 1_000,
                    allowed_ghosts: vec![GhostKind::Poeira],
                    hp_multiplier: 1.0,
                    speed_multiplier: 1.0,
                    initial_energy: 200,
                },
                upgrades: UpgradeLevels::default(),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Robot,
                cell: CellCoord::new(3, 2),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnGhost {
                row: 3,
                kind: GhostKind::Poeira,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn healthy_world_has_no_violations() {
        assert!(check(&playing()).is_empty());
        assert!(check(&World::new()).is_empty());
    }

    #[test]
    fn corrupted_hp_is_reported_and_repaired() {
        let mut world = playing();
        world.ghosts[0].hp = -4.0;
        if let Some(tower) = world.towers.iter_mut().next() {
            tower.hp = tower.max_hp + 10.0;
        }

        let violations = check(&world);
        assert!(violations
            .iter()
            .any(|violation| matches!(violation, InvariantViolation::GhostHp { .. })));
        assert!(violations
            .iter()
            .any(|violation| matches!(violation, InvariantViolation::TowerHp { .. })));

        repair(&mut world);
        assert_eq!(world.ghosts[0].hp, 0.0);
        let remaining = check(&world);
        assert!(remaining
            .iter()
            .all(|violation| matches!(violation, InvariantViolation::UndeadGhost { .. })));
    }
}
