//! Reward ledger hand-off
//!
//! The engine never stores currency. At the end of each completed session it
//! produces one final score, which the host forwards to whatever ledger owns
//! the player's balance.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Receiver for final session scores
pub trait RewardLedger {
    fn award(&mut self, final_score: u64);
}

/// One recorded award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub score: u64,
    pub coins: u64,
}

/// In-memory ledger paying one coin per `points_per_coin` points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinLedger {
    points_per_coin: u64,
    pub entries: Vec<AwardEntry>,
}

impl CoinLedger {
    pub fn new(points_per_coin: u64) -> Self {
        Self {
            points_per_coin: points_per_coin.max(1),
            entries: Vec::new(),
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.points_per_coin)
    }

    /// Coins a score is worth
    pub fn coins_for(&self, score: u64) -> u64 {
        score / self.points_per_coin
    }

    /// Total coins awarded so far
    pub fn balance(&self) -> u64 {
        self.entries.iter().map(|e| e.coins).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RewardLedger for CoinLedger {
    fn award(&mut self, final_score: u64) {
        let coins = self.coins_for(final_score);
        log::info!("Awarding {} coins for score {}", coins, final_score);
        self.entries.push(AwardEntry {
            score: final_score,
            coins,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coins_are_proportional() {
        let ledger = CoinLedger::new(10);
        assert_eq!(ledger.coins_for(0), 0);
        assert_eq!(ledger.coins_for(9), 0);
        assert_eq!(ledger.coins_for(120), 12);
    }

    #[test]
    fn test_awards_accumulate() {
        let mut ledger = CoinLedger::from_tuning(&Tuning::default());
        assert!(ledger.is_empty());
        ledger.award(50);
        ledger.award(30);
        assert_eq!(ledger.entries.len(), 2);
        assert_eq!(ledger.balance(), 8);
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let ledger = CoinLedger::new(0);
        assert_eq!(ledger.coins_for(7), 7);
    }
}
