//! Static reward catalog: messages, badges, unlockables.
//!
//! Pure data, no logic. The default pool is the built-in catalog every user
//! draws from; the ledger records which badge/unlockable ids a user owns.

use serde::{Deserialize, Serialize};

/// A badge a user can earn exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// What an unlockable cosmetic changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockableKind {
    Theme,
    Avatar,
    Title,
}

/// An unlockable cosmetic a user can earn exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlockable {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: UnlockableKind,
}

/// The full catalog of rewards available to draw from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPool {
    pub messages: Vec<String>,
    pub badges: Vec<Badge>,
    pub unlockables: Vec<Unlockable>,
}

impl Default for RewardPool {
    fn default() -> Self {
        Self {
            messages: [
                "🎉 Awesome work! You're crushing it!",
                "💪 You're unstoppable today!",
                "🌟 Legend! Keep the momentum going!",
                "🚀 To the moon! Amazing progress!",
                "🔥 On fire! Nothing can stop you now!",
                "⚡ Electric performance! Keep it up!",
                "🎯 Bullseye! You nailed it!",
                "👑 Royalty! You deserve this win!",
                "🏆 Champion mindset activated!",
                "✨ Magic! You make it look easy!",
            ]
            .map(String::from)
            .to_vec(),
            badges: vec![
                badge("first-win", "First Victory", "🥇", "Complete your first task"),
                badge("streak-3", "3-Day Streak", "🔥", "Complete tasks for 3 days in a row"),
                badge("perfectionist", "Perfectionist", "💎", "Complete 10 tasks at 100%"),
                badge("early-bird", "Early Bird", "🌅", "Complete a task before 9 AM"),
                badge("night-owl", "Night Owl", "🦉", "Complete a task after 9 PM"),
                badge("speed-demon", "Speed Demon", "⚡", "Complete 5 tasks in one day"),
                badge("marathon", "Marathon Runner", "🏃", "Complete 50 tasks total"),
                badge("centurion", "Centurion", "💯", "Reach 100 total points"),
            ],
            unlockables: vec![
                unlockable("theme-1", "Dark Mode", "🌙", UnlockableKind::Theme),
                unlockable("theme-2", "Ocean Theme", "🌊", UnlockableKind::Theme),
                unlockable("theme-3", "Forest Theme", "🌲", UnlockableKind::Theme),
                unlockable("avatar-1", "Rocket Avatar", "🚀", UnlockableKind::Avatar),
                unlockable("avatar-2", "Star Avatar", "⭐", UnlockableKind::Avatar),
                unlockable("title-1", "Goal Crusher", "💪", UnlockableKind::Title),
            ],
        }
    }
}

fn badge(id: &str, name: &str, icon: &str, description: &str) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
    }
}

fn unlockable(id: &str, name: &str, icon: &str, kind: UnlockableKind) -> Unlockable {
    Unlockable {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        kind,
    }
}
