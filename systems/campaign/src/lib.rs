#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign data and meta-progression rules that live outside the simulation.
//!
//! The simulation only ever consumes resolved [`LevelConfig`] values. This
//! crate produces them through a swappable [`LevelGenerator`] and provides
//! the pure reward and upgrade functions a host applies to terminal reports.

mod progression;

use ghostlane_core::{GhostKind, LevelConfig};

pub use progression::{completion_reward, purchase_upgrade, upgrade_cost, UpgradeError};

/// Source of fully resolved level configurations.
pub trait LevelGenerator {
    /// Configuration of the level with the provided one-based index.
    fn level(&self, index: u32) -> Option<LevelConfig>;

    /// Number of levels the generator offers.
    fn level_count(&self) -> u32;
}

/// Built-in five level campaign with difficulty growing per level.
#[derive(Clone, Copy, Debug, Default)]
pub struct Campaign;

const DIFFICULTIES: [&str; 5] = ["Easy", "Medium", "Hard", "Very Hard", "Nightmare"];

const ROSTER: [GhostKind; 4] = [
    GhostKind::Travesso,
    GhostKind::Medroso,
    GhostKind::Sonolento,
    GhostKind::Poeira,
];

impl Campaign {
    /// Creates the built-in campaign.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LevelGenerator for Campaign {
    fn level(&self, index: u32) -> Option<LevelConfig> {
        let name = DIFFICULTIES.get(usize::try_from(index.checked_sub(1)?).ok()?)?;
        let step = index - 1;
        let unlocked = ROSTER.len().min(usize::try_from(index).ok()?);

        Some(LevelConfig {
            id: index,
            name: (*name).to_owned(),
            total_ghosts_to_defeat: 12 + 4 * step,
            spawn_interval_ms: 2_800u64.saturating_sub(300 * u64::from(step)).max(1_200),
            allowed_ghosts: ROSTER[..unlocked].to_vec(),
            hp_multiplier: 1.0 + 0.25 * step as f32,
            speed_multiplier: 1.0 + 0.1 * step as f32,
            initial_energy: 50 + 10 * step,
        })
    }

    fn level_count(&self) -> u32 {
        DIFFICULTIES.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_one_based_and_bounded() {
        let campaign = Campaign::new();
        assert_eq!(campaign.level_count(), 5);
        assert!(campaign.level(0).is_none());
        assert!(campaign.level(6).is_none());
        for index in 1..=campaign.level_count() {
            let level = campaign.level(index).expect("level exists");
            assert_eq!(level.id, index);
            assert_eq!(level.validate(), Ok(()));
        }
    }

    #[test]
    fn first_level_matches_the_easy_table() {
        let level = Campaign::new().level(1).expect("level exists");
        assert_eq!(level.name, "Easy");
        assert_eq!(level.total_ghosts_to_defeat, 12);
        assert_eq!(level.spawn_interval_ms, 2_800);
        assert_eq!(level.allowed_ghosts, vec![GhostKind::Travesso]);
        assert_eq!(level.hp_multiplier, 1.0);
        assert_eq!(level.initial_energy, 50);
    }

    #[test]
    fn difficulty_grows_monotonically() {
        let campaign = Campaign::new();
        let levels: Vec<LevelConfig> = (1..=5).filter_map(|index| campaign.level(index)).collect();
        for pair in levels.windows(2) {
            let (easier, harder) = (&pair[0], &pair[1]);
            assert!(harder.total_ghosts_to_defeat > easier.total_ghosts_to_defeat);
            assert!(harder.spawn_interval_ms <= easier.spawn_interval_ms);
            assert!(harder.hp_multiplier > easier.hp_multiplier);
            assert!(harder.speed_multiplier > easier.speed_multiplier);
            assert!(harder.allowed_ghosts.len() >= easier.allowed_ghosts.len());
        }
        let nightmare = &levels[4];
        assert_eq!(nightmare.spawn_interval_ms, 1_600);
        assert_eq!(nightmare.allowed_ghosts, ROSTER.to_vec());
        assert_eq!(nightmare.total_ghosts_to_defeat, 28);
    }
}
