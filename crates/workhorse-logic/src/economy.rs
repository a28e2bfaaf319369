//! Currency ledger and cumulative player progress.

use serde::{Deserialize, Serialize};

/// Convert a productivity value to whole currency.
pub fn to_currency(productivity: f64) -> i64 {
    productivity.round() as i64
}

/// The player's currency balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balance: i64,
}

impl Ledger {
    pub fn new(balance: i64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Add `amount` and return the new balance.
    pub fn credit(&mut self, amount: i64) -> i64 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        cost >= 0 && self.balance >= cost
    }

    /// Deduct `cost` if affordable. The balance never goes negative.
    pub fn try_spend(&mut self, cost: i64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.balance -= cost;
        true
    }
}

/// Running totals for the current level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Sum of positive turn outputs, in income units.
    pub total_productivity: f64,
    /// Turns that produced a positive output.
    pub productive_turns: u32,
    /// Most non-ability synergies active in any single turn.
    pub max_synergies_in_one_turn: usize,
}

impl PlayerProgress {
    /// Record one turn's output. Non-positive amounts are ignored.
    pub fn add_productivity(&mut self, amount: f64) {
        if amount > 0.0 {
            self.total_productivity += amount;
            self.productive_turns += 1;
        }
    }

    pub fn note_active_synergies(&mut self, count: usize) {
        self.max_synergies_in_one_turn = self.max_synergies_in_one_turn.max(count);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_requires_funds() {
        let mut ledger = Ledger::new(50);
        assert!(ledger.try_spend(20));
        assert_eq!(ledger.balance(), 30);
        assert!(!ledger.try_spend(40));
        assert_eq!(ledger.balance(), 30);
        assert!(!ledger.can_afford(-1));
    }

    #[test]
    fn test_credit_returns_balance() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.credit(105), 105);
        assert_eq!(ledger.credit(to_currency(49.6)), 155);
    }

    #[test]
    fn test_progress_ignores_non_positive() {
        let mut progress = PlayerProgress::default();
        progress.add_productivity(0.0);
        progress.add_productivity(-20.0);
        assert_eq!(progress.productive_turns, 0);
        progress.add_productivity(200.0);
        progress.add_productivity(50.0);
        assert_eq!(progress.productive_turns, 2);
        assert!((progress.total_productivity - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_max_synergies_only_grows() {
        let mut progress = PlayerProgress::default();
        progress.note_active_synergies(3);
        progress.note_active_synergies(1);
        assert_eq!(progress.max_synergies_in_one_turn, 3);
        progress.reset();
        assert_eq!(progress.max_synergies_in_one_turn, 0);
    }
}
