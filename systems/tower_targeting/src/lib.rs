#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! A shooter tower only ever engages alive ghosts in its own lane that are
//! still approaching, i.e. positioned past the tower toward the entrance, and
//! closer than the tower's range. The nearest such ghost wins; equal
//! distances resolve to the lower ghost identifier.

use ghostlane_core::{
    GameStatus, GhostId, GhostView, TowerId, TowerRole, TowerTarget, TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    ghost_workspace: Vec<GhostCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments, ordered by tower identifier.
    pub fn handle(
        &mut self,
        status: GameStatus,
        towers: &TowerView,
        ghosts: &GhostView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if status != GameStatus::Playing {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_ghost_workspace(ghosts);
        if self.ghost_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.ghost_workspace {
                if candidate.row != tower.row || candidate.x <= tower.x {
                    continue;
                }
                let distance = candidate.x - tower.x;
                if distance >= tower.range {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    ghost: candidate.id,
                };
                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    ghost: best_candidate.ghost,
                    distance: best_candidate.distance,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();

        for snapshot in towers.iter() {
            if !matches!(snapshot.kind.role(), TowerRole::Shooter(_)) {
                continue;
            }
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                row: snapshot.cell.row(),
                x: snapshot.lane_position().get(),
                range: snapshot.stats().range_percent(),
            });
        }
    }

    fn prepare_ghost_workspace(&mut self, ghosts: &GhostView) {
        self.ghost_workspace.clear();

        for snapshot in ghosts.alive() {
            self.ghost_workspace.push(GhostCandidate {
                id: snapshot.id,
                row: snapshot.row,
                x: snapshot.position.get(),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    row: u32,
    x: f32,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct GhostCandidate {
    id: GhostId,
    row: u32,
    x: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    ghost: GhostId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }
        self.ghost < other.ghost
    }
}

#[cfg(test)]
mod tests {
    use super::{TowerTarget, TowerTargeting};
    use ghostlane_core::{
        CellCoord, GameStatus, GhostId, GhostKind, GhostSnapshot, GhostStatus, GhostView,
        LanePosition, TowerId, TowerKind, TowerLevel, TowerSnapshot, TowerView,
        CELL_WIDTH_PERCENT,
    };
    use std::time::Duration;

    fn tower_snapshot(id: u32, kind: TowerKind, row: u32, column: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell: CellCoord::new(row, column),
            level: TowerLevel::MIN,
            last_action: Duration::ZERO,
            hp: 1.0,
            max_hp: 1.0,
            lane_offset: 0.0,
        }
    }

    fn ghost_snapshot(id: u32, row: u32, x: f32, status: GhostStatus) -> GhostSnapshot {
        GhostSnapshot {
            id: GhostId::new(id),
            kind: GhostKind::Travesso,
            row,
            position: LanePosition::new(x),
            speed: 0.06,
            hp: 50.0,
            max_hp: 50.0,
            status,
            blocked: false,
        }
    }

    fn centre(column: u32) -> f32 {
        CellCoord::new(0, column).centre().get()
    }

    #[test]
    fn targets_nearest_ghost_ahead_in_lane() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, 2, 0)]);
        let ghosts = GhostView::from_snapshots(vec![
            ghost_snapshot(5, 2, centre(0) + 25.0, GhostStatus::Alive),
            ghost_snapshot(6, 2, centre(0) + 10.0, GhostStatus::Alive),
        ]);

        let mut out = Vec::new();
        system.handle(GameStatus::Playing, &towers, &ghosts, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(1));
        assert_eq!(out[0].ghost, GhostId::new(6));
        assert!((out[0].distance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn ghosts_behind_tower_or_in_other_lanes_are_ignored() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, 1, 4)]);
        let ghosts = GhostView::from_snapshots(vec![
            ghost_snapshot(1, 1, centre(4) - 2.0, GhostStatus::Alive),
            ghost_snapshot(2, 0, centre(4) + 2.0, GhostStatus::Alive),
        ]);

        let mut out = Vec::new();
        system.handle(GameStatus::Playing, &towers, &ghosts, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn range_scales_with_tower_kind() {
        let mut system = TowerTargeting::new();
        let distance = 3.5 * CELL_WIDTH_PERCENT;
        let ghosts = GhostView::from_snapshots(vec![ghost_snapshot(
            1,
            0,
            centre(0) + distance,
            GhostStatus::Alive,
        )]);

        let mut out = Vec::new();
        let basic = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, 0, 0)]);
        system.handle(GameStatus::Playing, &basic, &ghosts, &mut out);
        assert!(out.is_empty(), "basic towers reach three cells");

        let mega = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Mega, 0, 0)]);
        system.handle(GameStatus::Playing, &mega, &ghosts, &mut out);
        assert_eq!(out.len(), 1, "mega towers reach four cells");
    }

    #[test]
    fn smaller_ghost_id_is_preferred_when_distances_match() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Turbo, 3, 2)]);
        let ghosts = GhostView::from_snapshots(vec![
            ghost_snapshot(20, 3, centre(2) + 8.0, GhostStatus::Alive),
            ghost_snapshot(10, 3, centre(2) + 8.0, GhostStatus::Alive),
        ]);

        let mut out = Vec::new();
        system.handle(GameStatus::Playing, &towers, &ghosts, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ghost, GhostId::new(10));
    }

    #[test]
    fn lingering_ghosts_are_not_targeted() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, 0, 0)]);
        let ghosts = GhostView::from_snapshots(vec![
            ghost_snapshot(1, 0, centre(0) + 5.0, GhostStatus::Dying),
            ghost_snapshot(2, 0, centre(0) + 6.0, GhostStatus::Leaking),
        ]);

        let mut out = Vec::new();
        system.handle(GameStatus::Playing, &towers, &ghosts, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn non_shooters_never_receive_targets() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower_snapshot(1, TowerKind::Energy, 0, 0),
            tower_snapshot(2, TowerKind::Robot, 0, 1),
        ]);
        let ghosts = GhostView::from_snapshots(vec![ghost_snapshot(
            1,
            0,
            centre(1) + 3.0,
            GhostStatus::Alive,
        )]);

        let mut out = Vec::new();
        system.handle(GameStatus::Playing, &towers, &ghosts, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn terminal_status_clears_output() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, 0, 0)]);
        let ghosts = GhostView::from_snapshots(vec![ghost_snapshot(
            1,
            0,
            centre(0) + 5.0,
            GhostStatus::Alive,
        )]);

        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            ghost: GhostId::new(99),
            distance: 0.0,
        }];
        system.handle(GameStatus::Victory, &towers, &ghosts, &mut out);
        assert!(out.is_empty());
    }
}
