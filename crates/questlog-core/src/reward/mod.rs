//! Reward subsystem: static catalog, per-user ledger, weighted draw engine.

mod engine;
mod ledger;
mod pool;

pub use engine::{draw_category, Reward, RewardCategory, RewardEngine};
pub use ledger::RewardLedger;
pub use pool::{Badge, RewardPool, Unlockable, UnlockableKind};
