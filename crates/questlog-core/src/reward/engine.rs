//! Weighted-random reward generation.
//!
//! Sampling is split from award application: `draw_category` picks one of the
//! four reward categories from a fixed weight table, `RewardEngine::apply`
//! turns a category into a concrete reward and the updated ledger. Both take
//! the random source as a parameter, so tests drive them with a seeded
//! generator.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ledger::RewardLedger;
use super::pool::{Badge, RewardPool, Unlockable};

/// Category weights, in draw order. The boundary rule is `draw < cumulative`,
/// so a draw of exactly 40.0 lands on `Message`, not `Points`.
const WEIGHTS: [(RewardCategory, f64); 4] = [
    (RewardCategory::Points, 40.0),
    (RewardCategory::Message, 30.0),
    (RewardCategory::Badge, 20.0),
    (RewardCategory::Unlockable, 10.0),
];

/// Message shown when the reward pool or ledger cannot be consulted.
const FALLBACK_MESSAGE: &str = "🎉 Great job!";

/// One of the four outcomes of a weighted category draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardCategory {
    Points,
    Message,
    Badge,
    Unlockable,
}

/// The result of one reward draw, attached to the completed task.
///
/// Serializes with a `type` discriminant so the wire shape is
/// `{"type": "points", "value": 23, "message": "🎁 +23 points!"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reward {
    Points { value: u32, message: String },
    Message { message: String },
    Badge { badge: Badge, message: String },
    Unlockable { unlockable: Unlockable, message: String },
}

impl Reward {
    /// Display string for any reward variant.
    pub fn message(&self) -> &str {
        match self {
            Reward::Points { message, .. }
            | Reward::Message { message }
            | Reward::Badge { message, .. }
            | Reward::Unlockable { message, .. } => message,
        }
    }

    /// Safe default used when reward generation cannot run. A missing reward
    /// must never block a legitimate task completion.
    pub fn fallback() -> Self {
        Reward::Message {
            message: FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Draw a reward category with weights 40/30/20/10 from a uniform value
/// in [0, 100).
pub fn draw_category<R: Rng>(rng: &mut R) -> RewardCategory {
    let draw = rng.gen_range(0.0..100.0);
    let mut cumulative = 0.0;
    for (category, weight) in WEIGHTS {
        cumulative += weight;
        if draw < cumulative {
            return category;
        }
    }
    // The weights sum to 100 and the draw is strictly below it.
    unreachable!("draw {draw} exceeded cumulative weight");
}

/// Draws rewards against a catalog and applies them to a user's ledger.
#[derive(Debug, Clone, Default)]
pub struct RewardEngine {
    pool: RewardPool,
}

impl RewardEngine {
    pub fn new(pool: RewardPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &RewardPool {
        &self.pool
    }

    /// Draw one reward and return it with the updated ledger.
    ///
    /// The input ledger is never mutated; the caller persists the returned
    /// copy together with the completed task.
    pub fn generate<R: Rng>(&self, rng: &mut R, ledger: &RewardLedger) -> (Reward, RewardLedger) {
        let category = draw_category(rng);
        let mut updated = ledger.clone();
        let reward = self.apply(rng, category, &mut updated);
        (reward, updated)
    }

    /// Turn a drawn category into a concrete reward, mutating `ledger`.
    ///
    /// Badge and unlockable draws against an exhausted pool fall back to the
    /// points branch rather than erroring.
    pub fn apply<R: Rng>(
        &self,
        rng: &mut R,
        category: RewardCategory,
        ledger: &mut RewardLedger,
    ) -> Reward {
        match category {
            RewardCategory::Points => self.grant_points(rng, ledger),
            RewardCategory::Message => Reward::Message {
                message: self
                    .pool
                    .messages
                    .choose(rng)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            },
            RewardCategory::Badge => {
                let available: Vec<&Badge> = self
                    .pool
                    .badges
                    .iter()
                    .filter(|b| !ledger.owns_badge(&b.id))
                    .collect();
                match available.choose(rng) {
                    Some(&badge) => {
                        ledger.badges.insert(badge.id.clone());
                        Reward::Badge {
                            badge: badge.clone(),
                            message: format!("🏅 New badge unlocked: {}!", badge.name),
                        }
                    }
                    None => self.grant_points(rng, ledger),
                }
            }
            RewardCategory::Unlockable => {
                let available: Vec<&Unlockable> = self
                    .pool
                    .unlockables
                    .iter()
                    .filter(|u| !ledger.owns_unlockable(&u.id))
                    .collect();
                match available.choose(rng) {
                    Some(&unlockable) => {
                        ledger.unlocked_rewards.insert(unlockable.id.clone());
                        Reward::Unlockable {
                            unlockable: unlockable.clone(),
                            message: format!("🎊 Unlocked: {}!", unlockable.name),
                        }
                    }
                    None => self.grant_points(rng, ledger),
                }
            }
        }
    }

    fn grant_points<R: Rng>(&self, rng: &mut R, ledger: &mut RewardLedger) -> Reward {
        let value: u32 = rng.gen_range(10..60);
        ledger.points += u64::from(value);
        Reward::Points {
            value,
            message: format!("🎁 +{value} points!"),
        }
    }
}
