//! Gold balance for the run.

use desktop_defender_core::Event;

use crate::ProgressionError;

/// Gold bonus paid when `wave` completes.
#[must_use]
pub fn wave_bonus(wave: u32) -> u64 {
    10 + 5 * u64::from(wave)
}

#[derive(Clone, Debug)]
pub(crate) struct Economy {
    gold: u64,
    total_earned: u64,
    multiplier: f64,
}

impl Economy {
    pub(crate) fn new(gold: u64, total_earned: u64) -> Self {
        Self {
            gold,
            total_earned,
            multiplier: 1.0,
        }
    }

    pub(crate) fn gold(&self) -> u64 {
        self.gold
    }

    pub(crate) fn total_earned(&self) -> u64 {
        self.total_earned
    }

    pub(crate) fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier.max(0.0);
    }

    /// Credits `amount` scaled by the gold multiplier and returns the payout.
    pub(crate) fn earn(&mut self, amount: u64, out_events: &mut Vec<Event>) -> u64 {
        let payout = (amount as f64 * self.multiplier).floor() as u64;
        self.deposit(payout, out_events);
        payout
    }

    /// Credits `amount` as is.
    pub(crate) fn deposit(&mut self, amount: u64, out_events: &mut Vec<Event>) {
        self.gold = self.gold.saturating_add(amount);
        self.total_earned = self.total_earned.saturating_add(amount);
        out_events.push(Event::GoldChanged { amount: self.gold });
    }

    pub(crate) fn spend(
        &mut self,
        cost: u64,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ProgressionError> {
        if self.gold < cost {
            return Err(ProgressionError::InsufficientGold {
                cost,
                available: self.gold,
            });
        }
        self.gold -= cost;
        out_events.push(Event::GoldChanged { amount: self.gold });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earnings_are_scaled_and_floored() {
        let mut economy = Economy::new(0, 0);
        economy.set_multiplier(1.25);
        let mut events = Vec::new();
        assert_eq!(economy.earn(7, &mut events), 8);
        assert_eq!(economy.gold(), 8);
        assert_eq!(economy.total_earned(), 8);
        assert_eq!(events, vec![Event::GoldChanged { amount: 8 }]);
    }

    #[test]
    fn spending_beyond_balance_fails_without_side_effects() {
        let mut economy = Economy::new(30, 30);
        let mut events = Vec::new();
        assert_eq!(
            economy.spend(31, &mut events),
            Err(ProgressionError::InsufficientGold {
                cost: 31,
                available: 30
            })
        );
        assert!(events.is_empty());
        assert_eq!(economy.spend(30, &mut events), Ok(()));
        assert_eq!(economy.gold(), 0);
        assert_eq!(economy.total_earned(), 30);
    }

    #[test]
    fn wave_bonus_grows_linearly() {
        assert_eq!(wave_bonus(1), 15);
        assert_eq!(wave_bonus(10), 60);
    }
}
