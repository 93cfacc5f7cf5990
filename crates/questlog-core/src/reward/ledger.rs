//! Per-user cumulative reward ledger.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Cumulative gamification state for one user.
///
/// `points` only ever grows; `badges` and `unlocked_rewards` hold ids from the
/// reward pool, each at most once. A fresh default ledger is materialized the
/// first time a user is seen without a stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardLedger {
    pub points: u64,
    pub badges: BTreeSet<String>,
    pub unlocked_rewards: BTreeSet<String>,
}

impl RewardLedger {
    pub fn owns_badge(&self, id: &str) -> bool {
        self.badges.contains(id)
    }

    pub fn owns_unlockable(&self, id: &str) -> bool {
        self.unlocked_rewards.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_sets() {
        let mut ledger = RewardLedger::default();
        ledger.points = 42;
        ledger.badges.insert("first-win".into());
        ledger.unlocked_rewards.insert("theme-1".into());

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["points"], 42);
        assert_eq!(json["badges"][0], "first-win");
        assert_eq!(json["unlockedRewards"][0], "theme-1");
    }

    #[test]
    fn sets_deduplicate_ids() {
        let mut ledger = RewardLedger::default();
        ledger.badges.insert("first-win".into());
        ledger.badges.insert("first-win".into());
        assert_eq!(ledger.badges.len(), 1);
    }
}
