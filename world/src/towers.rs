//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use ghostlane_core::{
    CellCoord, LanePosition, TowerId, TowerKind, TowerLevel, TowerSnapshot, GRID_COLUMNS,
    GRID_ROWS,
};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell the tower was built on.
    pub(crate) cell: CellCoord,
    /// Tier resolved from the upgrade levels at placement.
    pub(crate) level: TowerLevel,
    /// Simulated time of the last fire or production.
    pub(crate) last_action: Duration,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    /// Forward crawl distance, only ever non-zero for robots.
    pub(crate) lane_offset: f32,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            level: self.level,
            last_action: self.last_action,
            hp: self.hp,
            max_hp: self.max_hp,
            lane_offset: self.lane_offset,
        }
    }

    pub(crate) fn lane_position(&self) -> LanePosition {
        self.snapshot().lane_position()
    }

    pub(crate) fn is_ready(&self, now: Duration) -> bool {
        self.snapshot().is_ready(now)
    }
}

/// Registry that stores towers, manages identifier allocation and keeps the
/// occupancy grid in sync with the stored entries.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    occupancy: Vec<Option<TowerId>>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            occupancy: vec![None; (GRID_ROWS * GRID_COLUMNS) as usize],
            next_tower_id: TowerId::new(0),
        }
    }

    /// Tower occupying `cell`, if any.
    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        index(cell).and_then(|index| self.occupancy.get(index).copied().flatten())
    }

    /// Builds a tower on a vacant cell.
    ///
    /// Returns `None` when the cell is off the grid or already taken.
    pub(crate) fn insert(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        level: TowerLevel,
        now: Duration,
    ) -> Option<TowerId> {
        let slot = index(cell)?;
        if self.occupancy.get(slot).copied().flatten().is_some() {
            return None;
        }

        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));

        let max_hp = kind.stats(level).hp;
        let state = TowerState {
            id,
            kind,
            cell,
            level,
            last_action: now,
            hp: max_hp,
            max_hp,
            lane_offset: 0.0,
        };
        let _ = self.entries.insert(id, state);
        self.occupancy[slot] = Some(id);
        Some(id)
    }

    /// Removes a tower and frees its cell.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        let state = self.entries.remove(&id)?;
        if let Some(slot) = index(state.cell).and_then(|index| self.occupancy.get_mut(index)) {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        Some(state)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Raw occupancy cells in row-major order.
    pub(crate) fn occupancy(&self) -> &[Option<TowerId>] {
        &self.occupancy
    }
}

fn index(cell: CellCoord) -> Option<usize> {
    if !cell.is_on_grid() {
        return None;
    }
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(GRID_COLUMNS).ok()?;
    Some(row * width + column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.next_tower_id.get(), 0);
        assert!(registry.occupancy().iter().all(Option::is_none));
    }

    #[test]
    fn insert_rejects_occupied_and_off_grid_cells() {
        let mut registry = TowerRegistry::new();
        let cell = CellCoord::new(2, 3);
        let first = registry.insert(TowerKind::Basic, cell, TowerLevel::MIN, Duration::ZERO);
        assert_eq!(first, Some(TowerId::new(0)));
        assert_eq!(
            registry.insert(TowerKind::Mega, cell, TowerLevel::MIN, Duration::ZERO),
            None
        );
        assert_eq!(
            registry.insert(
                TowerKind::Basic,
                CellCoord::new(GRID_ROWS, 0),
                TowerLevel::MIN,
                Duration::ZERO
            ),
            None
        );
        assert_eq!(registry.occupant(cell), first);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_frees_the_cell() {
        let mut registry = TowerRegistry::new();
        let cell = CellCoord::new(0, 0);
        let id = registry
            .insert(TowerKind::Robot, cell, TowerLevel::MIN, Duration::ZERO)
            .expect("vacant cell");
        let removed = registry.remove(id).expect("tower present");
        assert_eq!(removed.cell, cell);
        assert_eq!(registry.occupant(cell), None);
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn robots_start_with_level_scaled_hp() {
        let mut registry = TowerRegistry::new();
        let level = TowerLevel::new(2).expect("valid level");
        let id = registry
            .insert(TowerKind::Robot, CellCoord::new(1, 1), level, Duration::ZERO)
            .expect("vacant cell");
        let robot = registry.get(id).expect("tower present");
        assert!((robot.max_hp - 150.0).abs() < f32::EPSILON);
        assert!((robot.hp - robot.max_hp).abs() < f32::EPSILON);
    }
}
