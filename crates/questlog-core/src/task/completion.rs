//! Task completion state machine.
//!
//! Two states per task, derived from the `completed` flag:
//!
//! ```text
//! Active ──(progress resolves to 100)──> Completed (terminal)
//! ```
//!
//! `apply_patch` merges a patch into a task and reports whether this merge
//! crossed the completion threshold. The caller (the service) performs the
//! transition side effects -- stamping `completed_at`, drawing the reward once,
//! persisting ledger then task -- so the merge itself stays pure and testable.

use super::{Task, TaskPatch};

/// What a patch merge did to the task's completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Fields merged; the task stays in its current state.
    Merged,
    /// The task was Active and its progress resolved to exactly 100.
    /// The transition side effects must run exactly once.
    CrossedCompletion,
}

/// Merge `patch` into `task`, clamping progress to [0, 100].
///
/// On a Completed task this is a plain metadata merge: progress and elapsed
/// time are frozen, `completed_at` and `reward` are untouchable, so repeated
/// `progress = 100` updates are idempotent by construction.
pub fn apply_patch(task: &mut Task, patch: &TaskPatch) -> PatchOutcome {
    if let Some(title) = &patch.title {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            task.title = trimmed.to_string();
        }
    }
    if let Some(description) = &patch.description {
        task.description = description.clone();
    }
    if let Some(date) = patch.date {
        task.date = date;
    }
    if let Some(category) = patch.category {
        task.category = category;
    }
    if let Some(estimated_time) = patch.estimated_time {
        // A zero estimate would make progress derivation meaningless.
        task.estimated_time = estimated_time.max(1);
    }

    if task.completed {
        return PatchOutcome::Merged;
    }

    if let Some(elapsed_time) = patch.elapsed_time {
        task.elapsed_time = elapsed_time;
    }
    if let Some(progress) = patch.progress {
        task.progress = progress.clamp(0, 100) as u8;
    }

    if task.progress == 100 {
        PatchOutcome::CrossedCompletion
    } else {
        PatchOutcome::Merged
    }
}
