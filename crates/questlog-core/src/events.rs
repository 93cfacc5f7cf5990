use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reward::Reward;

/// Every timer state change produces an Event.
/// Frontends render these; the CLI prints them as the tick loop runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        task_id: String,
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        task_id: String,
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        task_id: String,
        at: DateTime<Utc>,
    },
    TimerTicked {
        task_id: String,
        elapsed_secs: u32,
        progress: u8,
        at: DateTime<Utc>,
    },
    /// Progress crossed the completion threshold; the reward was drawn once
    /// and is frozen on the task from here on.
    TaskCompleted {
        task_id: String,
        reward: Reward,
        at: DateTime<Utc>,
    },
}
