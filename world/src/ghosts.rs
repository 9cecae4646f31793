//! Ghost state and lane movement.

use std::time::Duration;

use ghostlane_core::{GhostId, GhostKind, GhostSnapshot, GhostStatus, LanePosition};

#[derive(Clone, Debug)]
pub(crate) struct GhostState {
    pub(crate) id: GhostId,
    pub(crate) kind: GhostKind,
    pub(crate) row: u32,
    pub(crate) x: f32,
    pub(crate) speed: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) status: GhostStatus,
    /// Set by melee engagement, cleared at the start of every frame.
    pub(crate) blocked: bool,
    /// Simulated time at which a dying or leaking ghost leaves the world.
    pub(crate) remove_at: Option<Duration>,
}

impl GhostState {
    pub(crate) fn is_alive(&self) -> bool {
        self.status == GhostStatus::Alive
    }

    /// Alive and still able to absorb damage.
    pub(crate) fn is_targetable(&self) -> bool {
        self.is_alive() && self.hp > 0.0
    }

    pub(crate) fn snapshot(&self) -> GhostSnapshot {
        GhostSnapshot {
            id: self.id,
            kind: self.kind,
            row: self.row,
            position: LanePosition::new(self.x),
            speed: self.speed,
            hp: self.hp,
            max_hp: self.max_hp,
            status: self.status,
            blocked: self.blocked,
        }
    }

    /// Subtracts damage; hp never drops below zero.
    pub(crate) fn take_damage(&mut self, damage: f32) {
        self.hp = (self.hp - damage).max(0.0);
    }

    /// Enters a terminal animation window.
    pub(crate) fn retire(&mut self, status: GhostStatus, until: Duration) {
        self.status = status;
        self.blocked = false;
        self.remove_at = Some(until);
    }
}

/// Outcome of moving a single ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Movement {
    /// The ghost stayed on the field.
    Moved,
    /// The ghost reached the base edge.
    Breached,
}

/// Moves an alive ghost toward the base unless a robot holds it.
///
/// The ghost never moves past `floor` in a single step; a robot standing
/// ahead in the lane supplies its position so a long frame cannot carry the
/// ghost through the robot's contact zone.
pub(crate) fn step(ghost: &mut GhostState, frames: f32, floor: Option<f32>) -> Movement {
    if !ghost.blocked {
        let next = ghost.x - ghost.speed * frames;
        ghost.x = floor.map_or(next, |floor| next.max(floor));
    }
    if ghost.x <= 0.0 {
        Movement::Breached
    } else {
        Movement::Moved
    }
}

/// Removes ghosts whose animation window elapsed, returning their ids.
pub(crate) fn sweep_expired(ghosts: &mut Vec<GhostState>, now: Duration) -> Vec<GhostId> {
    let mut removed = Vec::new();
    ghosts.retain(|ghost| match ghost.remove_at {
        Some(at) if at <= now => {
            removed.push(ghost.id);
            false
        }
        _ => true,
    });
    removed
}
