//! Star rewards and laboratory upgrades.

use ghostlane_core::{TowerKind, TowerLevel, UpgradeLevels};
use thiserror::Error;

const COMPLETION_STARS: u32 = 10;
const FLAWLESS_BONUS_STARS: u32 = 20;

/// Stars awarded for finishing a level with `final_lives` of `max_lives` left.
#[must_use]
pub fn completion_reward(final_lives: u32, max_lives: u32) -> u32 {
    if final_lives == max_lives {
        COMPLETION_STARS + FLAWLESS_BONUS_STARS
    } else {
        COMPLETION_STARS
    }
}

/// Star price of raising a tower kind to `next`, or `None` for the base level.
#[must_use]
pub fn upgrade_cost(next: TowerLevel) -> Option<u32> {
    match next.get() {
        2 => Some(20),
        3 => Some(45),
        _ => None,
    }
}

/// Reasons an upgrade purchase is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UpgradeError {
    /// The tower kind is already at the top tier.
    #[error("{kind:?} is already at the maximum level")]
    MaxLevel {
        /// Kind that cannot be upgraded further.
        kind: TowerKind,
    },
    /// The balance does not cover the price.
    #[error("upgrade costs {cost} stars but only {available} are available")]
    InsufficientStars {
        /// Price of the upgrade.
        cost: u32,
        /// Stars held by the player.
        available: u32,
    },
}

/// Raises `kind` by one tier, paying from `stars`.
///
/// On failure neither the levels nor the balance change.
pub fn purchase_upgrade(
    levels: &mut UpgradeLevels,
    kind: TowerKind,
    stars: &mut u32,
) -> Result<TowerLevel, UpgradeError> {
    let next = levels
        .level_for(kind)
        .next()
        .ok_or(UpgradeError::MaxLevel { kind })?;
    let cost = upgrade_cost(next).ok_or(UpgradeError::MaxLevel { kind })?;
    *stars = stars
        .checked_sub(cost)
        .ok_or(UpgradeError::InsufficientStars {
            cost,
            available: *stars,
        })?;
    levels.set(kind, next);
    Ok(next)
}
