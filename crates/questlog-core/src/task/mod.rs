//! Task types: the quest record, its category, and the create/update inputs.

pub mod completion;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reward::Reward;

/// Default estimated time for a new quest, in minutes.
pub const DEFAULT_ESTIMATED_MINUTES: u32 = 25;

/// Category of quest for organizing work.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    #[default]
    General,
    Learning,
    Fitness,
    Creative,
    Work,
    Personal,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::General => "general",
            TaskCategory::Learning => "learning",
            TaskCategory::Fitness => "fitness",
            TaskCategory::Creative => "creative",
            TaskCategory::Work => "work",
            TaskCategory::Personal => "personal",
        }
    }
}

/// One user-created quest.
///
/// `completed` is terminal: once true, `progress` is pinned at 100,
/// `elapsed_time` is frozen, and `completed_at`/`reward` are set exactly once
/// and never regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub category: TaskCategory,
    /// Target duration in minutes.
    pub estimated_time: u32,
    /// Accumulated focus time in seconds.
    pub elapsed_time: u32,
    /// 0-100.
    pub progress: u8,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<Reward>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new quest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub estimated_time: Option<u32>,
}

impl TaskDraft {
    /// Validate the draft and build the initial task record.
    pub fn into_task(
        self,
        user_id: &str,
        id: String,
        now: DateTime<Utc>,
    ) -> Result<Task, CoreError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::Validation {
                field: "title".into(),
                message: "must not be empty".into(),
            });
        }
        let estimated_time = self.estimated_time.unwrap_or(DEFAULT_ESTIMATED_MINUTES);
        if estimated_time == 0 {
            return Err(CoreError::Validation {
                field: "estimatedTime".into(),
                message: "must be a positive number of minutes".into(),
            });
        }
        Ok(Task {
            id,
            user_id: user_id.to_string(),
            title,
            description: self.description,
            date: self.date,
            category: self.category,
            estimated_time,
            elapsed_time: 0,
            progress: 0,
            completed: false,
            completed_at: None,
            reward: None,
            created_at: now,
        })
    }
}

/// Partial update for a quest's mutable fields.
///
/// Deliberately has no `completed` field: completion is reachable only through
/// the progress threshold, so `completed_at` and `reward` cannot be forged by
/// a plain update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub elapsed_time: Option<u32>,
    #[serde(default)]
    pub progress: Option<i64>,
}

impl TaskPatch {
    /// A timer tick's view of the task: elapsed seconds plus derived progress.
    pub fn progress_update(elapsed_secs: u32, progress: u8) -> Self {
        Self {
            elapsed_time: Some(elapsed_secs),
            progress: Some(i64::from(progress)),
            ..Self::default()
        }
    }
}
