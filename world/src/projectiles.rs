//! Projectile flight and lane-aligned hit resolution.

use ghostlane_core::{
    GhostId, LanePosition, ProjectileId, ProjectileKind, ProjectileSnapshot, TowerId,
    FIELD_EXIT_X, HIT_THRESHOLD,
};

use crate::ghosts::GhostState;

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) source: TowerId,
    pub(crate) row: u32,
    pub(crate) x: f32,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) knockback: f32,
    spent: bool,
}

impl ProjectileState {
    pub(crate) fn new(
        id: ProjectileId,
        kind: ProjectileKind,
        source: TowerId,
        row: u32,
        x: f32,
        damage: f32,
        knockback: f32,
    ) -> Self {
        Self {
            id,
            kind,
            source,
            row,
            x,
            speed: kind.speed(),
            damage,
            knockback,
            spent: false,
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            source: self.source,
            row: self.row,
            position: LanePosition::new(self.x),
            speed: self.speed,
            damage: self.damage,
            knockback: self.knockback,
        }
    }
}

/// Record of a projectile striking a ghost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Impact {
    pub(crate) projectile: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) ghost: GhostId,
    pub(crate) row: u32,
    pub(crate) x: f32,
    pub(crate) damage: f32,
    pub(crate) remaining_hp: f32,
}

impl Impact {
    pub(crate) fn is_lethal(&self) -> bool {
        self.remaining_hp <= 0.0
    }
}

/// Advances every projectile by `frames` frame units and resolves hits.
///
/// Flight is split into sub-steps no longer than the hit threshold so fast
/// projectiles cannot tunnel through a ghost on a long frame. Each projectile
/// strikes at most one ghost, checked in creation order. Struck projectiles
/// and projectiles past the field edge are removed after the pass.
pub(crate) fn advance(
    projectiles: &mut Vec<ProjectileState>,
    ghosts: &mut [GhostState],
    frames: f32,
) -> Vec<Impact> {
    let mut impacts = Vec::new();

    for projectile in projectiles.iter_mut() {
        let distance = projectile.speed * frames;
        let steps = (distance / HIT_THRESHOLD).ceil().max(1.0) as u32;
        let stride = distance / steps as f32;

        for _ in 0..steps {
            projectile.x += stride;
            if let Some(impact) = strike(projectile, ghosts) {
                impacts.push(impact);
                projectile.spent = true;
                break;
            }
        }

        if projectile.x >= FIELD_EXIT_X {
            projectile.spent = true;
        }
    }

    projectiles.retain(|projectile| !projectile.spent);
    impacts
}

fn strike(projectile: &ProjectileState, ghosts: &mut [GhostState]) -> Option<Impact> {
    let ghost = ghosts.iter_mut().find(|ghost| {
        ghost.row == projectile.row
            && ghost.is_targetable()
            && (ghost.x - projectile.x).abs() < HIT_THRESHOLD
    })?;

    ghost.take_damage(projectile.damage);
    ghost.x += projectile.knockback;

    Some(Impact {
        projectile: projectile.id,
        kind: projectile.kind,
        ghost: ghost.id,
        row: ghost.row,
        x: ghost.x,
        damage: projectile.damage,
        remaining_hp: ghost.hp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostlane_core::{GhostKind, GhostStatus};

    fn ghost(id: u32, row: u32, x: f32, hp: f32) -> GhostState {
        GhostState {
            id: GhostId::new(id),
            kind: GhostKind::Travesso,
            row,
            x,
            speed: 0.06,
            hp,
            max_hp: hp,
            status: GhostStatus::Alive,
            blocked: false,
            remove_at: None,
        }
    }

    fn bolt(id: u32, row: u32, x: f32, damage: f32) -> ProjectileState {
        ProjectileState::new(
            ProjectileId::new(id),
            ProjectileKind::Plasma,
            TowerId::new(0),
            row,
            x,
            damage,
            0.0,
        )
    }

    #[test]
    fn projectile_hits_only_one_ghost() {
        let mut ghosts = vec![ghost(0, 1, 30.0, 50.0), ghost(1, 1, 30.5, 50.0)];
        let mut projectiles = vec![bolt(0, 1, 29.0, 10.0)];

        let impacts = advance(&mut projectiles, &mut ghosts, 1.0);

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].ghost, GhostId::new(0));
        assert!(projectiles.is_empty());
        assert!((ghosts[0].hp - 40.0).abs() < f32::EPSILON);
        assert!((ghosts[1].hp - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn projectiles_ignore_other_lanes_and_leave_the_field() {
        let mut ghosts = vec![ghost(0, 2, 104.0, 50.0)];
        let mut projectiles = vec![bolt(0, 1, 104.9, 10.0)];

        let impacts = advance(&mut projectiles, &mut ghosts, 1.0);

        assert!(impacts.is_empty());
        assert!(projectiles.is_empty());
    }

    #[test]
    fn long_frames_do_not_tunnel_through_ghosts() {
        let mut ghosts = vec![ghost(0, 0, 50.0, 100.0)];
        let mut projectiles = vec![ProjectileState::new(
            ProjectileId::new(0),
            ProjectileKind::Beam,
            TowerId::new(0),
            0,
            20.0,
            50.0,
            0.0,
        )];

        let impacts = advance(&mut projectiles, &mut ghosts, 40.0);

        assert_eq!(impacts.len(), 1);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn lethal_hit_spares_followup_projectiles() {
        let mut ghosts = vec![ghost(0, 0, 30.0, 10.0)];
        let mut projectiles = vec![bolt(0, 0, 29.0, 15.0), bolt(1, 0, 29.0, 15.0)];

        let impacts = advance(&mut projectiles, &mut ghosts, 1.0);

        assert_eq!(impacts.len(), 1);
        assert!(impacts[0].is_lethal());
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].id, ProjectileId::new(1));
    }

    #[test]
    fn knockback_pushes_ghost_toward_entrance() {
        let mut ghosts = vec![ghost(0, 0, 30.0, 50.0)];
        let mut projectiles = vec![ProjectileState::new(
            ProjectileId::new(0),
            ProjectileKind::Wind,
            TowerId::new(0),
            0,
            29.0,
            5.0,
            5.0,
        )];

        let impacts = advance(&mut projectiles, &mut ghosts, 1.0);

        assert_eq!(impacts.len(), 1);
        assert!((ghosts[0].x - 35.0).abs() < 1e-4);
    }
}
