//! The quest service wires the timer engine, the completion state machine,
//! the reward engine, and the backing store together.
//!
//! Control flow: timer ticks produce progress updates; updates run through
//! the completion state machine; crossing the threshold draws a reward once
//! and persists ledger first, then task. If the two writes cannot happen
//! transactionally, a crash between them leaves an awarded-but-unattributed
//! reward -- the safe direction, since badges and unlockables must never be
//! granted twice.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::reward::{Reward, RewardEngine, RewardLedger, RewardPool};
use crate::storage::Store;
use crate::task::completion::{apply_patch, PatchOutcome};
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::timer::TimerEngine;

/// The full rewards view returned to frontends: the user's ledger plus the
/// catalog it draws from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsView {
    #[serde(flatten)]
    pub ledger: RewardLedger,
    pub reward_pool: RewardPool,
}

/// Coordinator for one user session's quests, timer, and rewards.
pub struct QuestService<S: Store> {
    store: S,
    timer: TimerEngine,
    rewards: RewardEngine,
    rng: StdRng,
}

impl<S: Store> QuestService<S> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Construct with an explicit RNG so tests are deterministic.
    pub fn with_rng(store: S, rng: StdRng) -> Self {
        Self {
            store,
            timer: TimerEngine::new(),
            rewards: RewardEngine::new(RewardPool::default()),
            rng,
        }
    }

    /// Read-only projection of the single-flight cell.
    pub fn active_task(&self) -> Option<&str> {
        self.timer.active_task()
    }

    // ── Task CRUD ────────────────────────────────────────────────────

    pub fn create_task(&mut self, user_id: &str, draft: TaskDraft) -> Result<Task> {
        let task = draft.into_task(user_id, Uuid::new_v4().to_string(), Utc::now())?;
        self.store.create_task(user_id, &task)?;
        Ok(task)
    }

    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        Ok(self.store.list_tasks(user_id)?)
    }

    pub fn list_tasks_by_date(&self, user_id: &str, date: chrono::NaiveDate) -> Result<Vec<Task>> {
        Ok(self.store.list_tasks_by_date(user_id, date)?)
    }

    pub fn get_task(&self, user_id: &str, id: &str) -> Result<Task> {
        self.store
            .get_task(user_id, id)?
            .ok_or_else(|| CoreError::TaskNotFound { id: id.to_string() })
    }

    /// Apply a partial update through the completion state machine.
    ///
    /// If the merge resolves an Active task's progress to exactly 100, the
    /// task transitions to Completed: `completed_at` is stamped, the reward
    /// is drawn exactly once, and ledger then task are persisted. Updates to
    /// an already-Completed task are plain merges -- `completed_at` and
    /// `reward` never change again.
    pub fn update_task(&mut self, user_id: &str, id: &str, patch: &TaskPatch) -> Result<Task> {
        let mut task = self.get_task(user_id, id)?;
        match apply_patch(&mut task, patch) {
            PatchOutcome::CrossedCompletion => {
                task.completed = true;
                task.completed_at = Some(Utc::now());
                task.reward = Some(self.draw_reward(user_id));
            }
            PatchOutcome::Merged => {}
        }
        self.store.put_task(user_id, id, &task)?;
        Ok(task)
    }

    /// Delete a task, force-pausing its timer first so no session outlives it.
    pub fn delete_task(&mut self, user_id: &str, id: &str) -> Result<()> {
        self.timer.remove(id);
        Ok(self.store.delete_task(user_id, id)?)
    }

    // ── Rewards ──────────────────────────────────────────────────────

    pub fn rewards(&self, user_id: &str) -> Result<RewardsView> {
        Ok(RewardsView {
            ledger: self.store.get_ledger(user_id)?,
            reward_pool: self.rewards.pool().clone(),
        })
    }

    /// Draw one reward and persist the updated ledger.
    ///
    /// Reward failures are absorbed here: if the ledger cannot be read or
    /// written, the completion still succeeds with the fallback reward and
    /// the ledger is left alone.
    fn draw_reward(&mut self, user_id: &str) -> Reward {
        let ledger = match self.store.get_ledger(user_id) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(user_id, error = %e, "ledger read failed, issuing fallback reward");
                return Reward::fallback();
            }
        };
        let (reward, updated) = self.rewards.generate(&mut self.rng, &ledger);
        if let Err(e) = self.store.put_ledger(user_id, &updated) {
            warn!(user_id, error = %e, "ledger write failed, issuing fallback reward");
            return Reward::fallback();
        }
        reward
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Start this task's timer. Rejected when the task is completed or when
    /// another task's timer is running.
    pub fn start_timer(&mut self, user_id: &str, id: &str) -> Result<Event> {
        let task = self.get_task(user_id, id)?;
        if task.completed {
            return Err(CoreError::InvalidState(format!(
                "task '{id}' is already completed"
            )));
        }
        self.timer.track(&task);
        let elapsed_secs = self.timer.start(id)?;
        Ok(Event::TimerStarted {
            task_id: id.to_string(),
            elapsed_secs,
            at: Utc::now(),
        })
    }

    /// Pause this task's timer. No-op if it isn't running.
    pub fn pause_timer(&mut self, user_id: &str, id: &str) -> Result<Event> {
        // Existence check so a bad id surfaces as NotFound, not a silent no-op.
        self.get_task(user_id, id)?;
        let elapsed_secs = self.timer.pause(id);
        Ok(Event::TimerPaused {
            task_id: id.to_string(),
            elapsed_secs,
            at: Utc::now(),
        })
    }

    /// Reset this task's timer and progress to zero. Rejected on a completed
    /// task -- reset must not unwind a completion.
    pub fn reset_timer(&mut self, user_id: &str, id: &str) -> Result<Event> {
        let task = self.get_task(user_id, id)?;
        if task.completed {
            return Err(CoreError::InvalidState(format!(
                "task '{id}' is completed; reset is not allowed"
            )));
        }
        self.timer.reset(id);
        self.update_task(user_id, id, &TaskPatch::progress_update(0, 0))?;
        Ok(Event::TimerReset {
            task_id: id.to_string(),
            at: Utc::now(),
        })
    }

    /// Advance the running timer by one second and flush the progress update
    /// through the completion state machine.
    ///
    /// The caller owns the one-second cadence. Returns `None` when no timer
    /// is running.
    pub fn tick(&mut self, user_id: &str) -> Result<Option<Event>> {
        let Some(update) = self.timer.tick() else {
            return Ok(None);
        };
        let patch = TaskPatch::progress_update(update.elapsed_secs, update.progress);
        let task = self.update_task(user_id, &update.task_id, &patch)?;
        let event = match task.reward {
            Some(reward) if update.finished => Event::TaskCompleted {
                task_id: update.task_id,
                reward,
                at: Utc::now(),
            },
            _ => Event::TimerTicked {
                task_id: update.task_id,
                elapsed_secs: update.elapsed_secs,
                progress: update.progress,
                at: Utc::now(),
            },
        };
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::storage::Database;
    use crate::task::TaskCategory;

    fn service() -> QuestService<Database> {
        QuestService::with_rng(Database::open_memory().unwrap(), StdRng::seed_from_u64(7))
    }

    fn draft(minutes: u32) -> TaskDraft {
        TaskDraft {
            title: "Focus block".into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            category: TaskCategory::Work,
            estimated_time: Some(minutes),
        }
    }

    #[test]
    fn update_unknown_task_is_not_found() {
        let mut svc = service();
        let err = svc
            .update_task("u", "missing", &TaskPatch::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::TaskNotFound { .. }));
    }

    #[test]
    fn manual_completion_draws_reward_once() {
        let mut svc = service();
        let task = svc.create_task("u", draft(25)).unwrap();

        let patch = TaskPatch {
            progress: Some(100),
            ..TaskPatch::default()
        };
        let done = svc.update_task("u", &task.id, &patch).unwrap();
        assert!(done.completed);
        assert_eq!(done.progress, 100);
        let first_reward = done.reward.clone().unwrap();
        let first_completed_at = done.completed_at.unwrap();

        // Second progress=100 update must change nothing.
        let again = svc.update_task("u", &task.id, &patch).unwrap();
        assert_eq!(again.reward.unwrap(), first_reward);
        assert_eq!(again.completed_at.unwrap(), first_completed_at);
    }

    #[test]
    fn start_completed_task_is_invalid_state() {
        let mut svc = service();
        let task = svc.create_task("u", draft(25)).unwrap();
        let patch = TaskPatch {
            progress: Some(100),
            ..TaskPatch::default()
        };
        svc.update_task("u", &task.id, &patch).unwrap();

        let err = svc.start_timer("u", &task.id).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        let err = svc.reset_timer("u", &task.id).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn tick_without_running_timer_is_none() {
        let mut svc = service();
        assert!(svc.tick("u").unwrap().is_none());
    }

    #[test]
    fn reset_flushes_zero_progress() {
        let mut svc = service();
        let task = svc.create_task("u", draft(1)).unwrap();
        svc.start_timer("u", &task.id).unwrap();
        for _ in 0..10 {
            svc.tick("u").unwrap();
        }
        assert_eq!(svc.get_task("u", &task.id).unwrap().elapsed_time, 10);

        svc.reset_timer("u", &task.id).unwrap();
        let loaded = svc.get_task("u", &task.id).unwrap();
        assert_eq!(loaded.progress, 0);
        assert_eq!(loaded.elapsed_time, 0);
        assert_eq!(svc.active_task(), None);
    }
}
