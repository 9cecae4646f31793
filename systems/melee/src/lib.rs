#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lane-block resolver that pairs ghosts with robots and rolls combat ticks.
//!
//! A ghost within contact distance of a robot in its lane is held in place
//! for the frame. Both sides then strike independently with a probability
//! that scales with the frame length. Randomness comes from the caller so
//! runs stay reproducible under a fixed seed.

use std::time::Duration;

use ghostlane_core::{
    frame_units, Command, GameStatus, GhostSnapshot, GhostView, TowerId, TowerKind,
    TowerSnapshot, TowerView, MELEE_STRIKE_CHANCE_PER_FRAME, ROBOT_CONTACT_DISTANCE,
};
use rand::Rng;

/// Melee system that reuses a robot workspace between frames.
#[derive(Debug, Default)]
pub struct Melee {
    robots: Vec<RobotWorkspace>,
}

impl Melee {
    /// Creates a new melee system with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one [`Command::EngageMelee`] for every ghost in contact with a robot.
    ///
    /// A contact where neither side strikes still produces a command with zero
    /// damage so the world blocks the ghost for the frame.
    pub fn handle<R>(
        &mut self,
        status: GameStatus,
        towers: &TowerView,
        ghosts: &GhostView,
        dt: Duration,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        if status != GameStatus::Playing {
            return;
        }

        self.prepare_robots(towers);
        if self.robots.is_empty() {
            return;
        }

        let chance = strike_chance(frame_units(dt));
        for ghost in ghosts.alive() {
            let Some(robot) = self.contact(ghost) else {
                continue;
            };

            let robot_strikes = rng.gen_bool(chance);
            let ghost_strikes = rng.gen_bool(chance);
            out.push(Command::EngageMelee {
                ghost: ghost.id,
                robot: robot.id,
                damage_to_ghost: if robot_strikes { robot.damage } else { 0.0 },
                damage_to_robot: if ghost_strikes {
                    ghost.kind.melee_damage()
                } else {
                    0.0
                },
            });
        }
    }

    fn prepare_robots(&mut self, towers: &TowerView) {
        self.robots.clear();
        self.robots.extend(
            towers
                .iter()
                .filter(|tower| tower.kind == TowerKind::Robot && tower.hp > 0.0)
                .map(RobotWorkspace::from),
        );
    }

    /// Lowest-id robot in the ghost's lane within contact distance.
    fn contact(&self, ghost: &GhostSnapshot) -> Option<&RobotWorkspace> {
        let x = ghost.position.get();
        self.robots
            .iter()
            .find(|robot| robot.row == ghost.row && (x - robot.x).abs() < ROBOT_CONTACT_DISTANCE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RobotWorkspace {
    id: TowerId,
    row: u32,
    x: f32,
    damage: f32,
}

impl From<&TowerSnapshot> for RobotWorkspace {
    fn from(tower: &TowerSnapshot) -> Self {
        Self {
            id: tower.id,
            row: tower.cell.row(),
            x: tower.lane_position().get(),
            damage: tower.stats().damage,
        }
    }
}

fn strike_chance(frames: f32) -> f64 {
    (MELEE_STRIKE_CHANCE_PER_FRAME * f64::from(frames)).clamp(0.0, 1.0)
}
