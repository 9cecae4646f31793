//! Energy and lives bookkeeping for a running level.

use std::time::Duration;

use ghostlane_core::{ENERGY_CEILING, PASSIVE_ENERGY_AMOUNT, PASSIVE_ENERGY_INTERVAL};

/// Spendable energy, remaining lives and the passive regeneration timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    energy: u32,
    lives: u32,
    max_lives: u32,
    passive_timer: Duration,
}

impl Ledger {
    /// Creates a ledger holding `energy` and `lives`.
    #[must_use]
    pub fn new(energy: u32, lives: u32) -> Self {
        Self {
            energy: energy.min(ENERGY_CEILING),
            lives,
            max_lives: lives,
            passive_timer: Duration::ZERO,
        }
    }

    /// Spendable energy.
    #[must_use]
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    /// Lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Lives the ledger was created with.
    #[must_use]
    pub const fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Adds energy, saturating at [`ENERGY_CEILING`].
    ///
    /// Returns the amount that was actually credited.
    pub fn credit(&mut self, amount: u32) -> u32 {
        let before = self.energy;
        self.energy = self.energy.saturating_add(amount).min(ENERGY_CEILING);
        self.energy - before
    }

    /// Deducts `amount` when the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.energy.checked_sub(amount) {
            Some(remaining) => {
                self.energy = remaining;
                true
            }
            None => false,
        }
    }

    /// Removes a single life, flooring at zero.
    ///
    /// Returns `true` only for the call that brings the count to zero.
    pub fn lose_life(&mut self) -> bool {
        if self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        self.lives == 0
    }

    /// Accumulates `dt` toward passive regeneration.
    ///
    /// When the timer reaches the interval the passive amount is credited and
    /// the timer restarts from zero; excess time is dropped.
    pub fn accrue_passive(&mut self, dt: Duration) -> Option<u32> {
        self.passive_timer = self.passive_timer.saturating_add(dt);
        if self.passive_timer < PASSIVE_ENERGY_INTERVAL {
            return None;
        }
        self.passive_timer = Duration::ZERO;
        Some(self.credit(PASSIVE_ENERGY_AMOUNT))
    }

    pub(crate) fn clamp(&mut self) {
        self.energy = self.energy.min(ENERGY_CEILING);
        self.lives = self.lives.min(self.max_lives);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_guards_against_overdraft() {
        let mut ledger = Ledger::new(50, 3);
        assert!(ledger.spend(25));
        assert_eq!(ledger.energy(), 25);
        assert!(!ledger.spend(26));
        assert_eq!(ledger.energy(), 25);
        assert!(ledger.spend(25));
        assert_eq!(ledger.energy(), 0);
    }

    #[test]
    fn credit_saturates_at_ceiling() {
        let mut ledger = Ledger::new(ENERGY_CEILING - 3, 3);
        assert_eq!(ledger.credit(15), 3);
        assert_eq!(ledger.energy(), ENERGY_CEILING);
        assert_eq!(ledger.credit(u32::MAX), 0);
    }

    #[test]
    fn lose_life_reports_defeat_edge_once() {
        let mut ledger = Ledger::new(0, 2);
        assert!(!ledger.lose_life());
        assert!(ledger.lose_life());
        assert!(!ledger.lose_life());
        assert_eq!(ledger.lives(), 0);
        assert_eq!(ledger.max_lives(), 2);
    }

    #[test]
    fn passive_regeneration_drops_excess_time() {
        let mut ledger = Ledger::new(0, 3);
        assert_eq!(ledger.accrue_passive(Duration::from_millis(1_500)), None);
        assert_eq!(
            ledger.accrue_passive(Duration::from_millis(1_500)),
            Some(PASSIVE_ENERGY_AMOUNT)
        );
        assert_eq!(ledger.accrue_passive(Duration::from_millis(1_999)), None);
        assert_eq!(
            ledger.accrue_passive(Duration::from_millis(1)),
            Some(PASSIVE_ENERGY_AMOUNT)
        );
        assert_eq!(ledger.energy(), 2 * PASSIVE_ENERGY_AMOUNT);
    }
}
