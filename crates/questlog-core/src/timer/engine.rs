//! Timer engine implementation.
//!
//! The engine is caller-driven: it owns no threads and no interval handles.
//! The frontend calls `tick()` on a one-second cadence, and the engine
//! advances the single running session by one second per call. Because a
//! session only moves inside `tick()`, a paused, reset, or removed session
//! can never fire a late tick.
//!
//! One shared `active` cell records which task, if any, is running. Only the
//! engine writes it, and `start` check-and-sets it, so at most one timer runs
//! per engine regardless of how many sessions exist.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::task::Task;

/// Per-task timer state, mirroring the task's elapsed time while it is
/// being worked on. Not persisted as its own entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimerSession {
    /// Accumulated seconds, mirrors `Task::elapsed_time`.
    pub elapsed_secs: u32,
    pub is_running: bool,
    /// Target minutes, mirrors `Task::estimated_time`.
    pub estimated_minutes: u32,
}

impl TimerSession {
    fn from_task(task: &Task) -> Self {
        Self {
            elapsed_secs: task.elapsed_time,
            is_running: false,
            estimated_minutes: task.estimated_time.max(1),
        }
    }

    /// Progress derived from elapsed vs. estimated time, capped at 100.
    pub fn progress(&self) -> u8 {
        let total_secs = f64::from(self.estimated_minutes) * 60.0;
        let pct = (f64::from(self.elapsed_secs) / total_secs * 100.0).round();
        pct.min(100.0) as u8
    }
}

/// The result of one tick of the running session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickUpdate {
    pub task_id: String,
    pub elapsed_secs: u32,
    pub progress: u8,
    /// Progress reached 100 on this tick; the session stopped itself.
    pub finished: bool,
}

/// Per-session timer engine: sessions keyed by task id, at most one running.
#[derive(Debug, Default)]
pub struct TimerEngine {
    sessions: HashMap<String, TimerSession>,
    active: Option<String>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The task id whose timer is currently running, if any.
    /// Read-only projection for frontends; only the engine mutates it.
    pub fn active_task(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn session(&self, task_id: &str) -> Option<&TimerSession> {
        self.sessions.get(task_id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Make sure a session exists for this task, seeded from its stored
    /// elapsed time. A paused session keeps its in-memory elapsed value.
    pub fn track(&mut self, task: &Task) -> &TimerSession {
        self.sessions
            .entry(task.id.clone())
            .or_insert_with(|| TimerSession::from_task(task))
    }

    /// Start this task's timer. Fails if another task's session is running.
    /// Starting the already-running task is a no-op.
    pub fn start(&mut self, task_id: &str) -> Result<u32, CoreError> {
        if let Some(active) = &self.active {
            if active != task_id {
                return Err(CoreError::TimerBusy {
                    active: active.clone(),
                });
            }
        }
        let session = self
            .sessions
            .get_mut(task_id)
            .ok_or_else(|| CoreError::InvalidState(format!("task '{task_id}' is not tracked")))?;
        session.is_running = true;
        self.active = Some(task_id.to_string());
        Ok(session.elapsed_secs)
    }

    /// Stop advancing this task's timer. No-op if already paused.
    pub fn pause(&mut self, task_id: &str) -> u32 {
        let elapsed = match self.sessions.get_mut(task_id) {
            Some(session) => {
                session.is_running = false;
                session.elapsed_secs
            }
            None => 0,
        };
        if self.active.as_deref() == Some(task_id) {
            self.active = None;
        }
        elapsed
    }

    /// Stop the timer and zero its elapsed time.
    pub fn reset(&mut self, task_id: &str) {
        if let Some(session) = self.sessions.get_mut(task_id) {
            session.is_running = false;
            session.elapsed_secs = 0;
        }
        if self.active.as_deref() == Some(task_id) {
            self.active = None;
        }
    }

    /// Drop a task's session, force-pausing it first. Called on task
    /// deletion so no session outlives its task.
    pub fn remove(&mut self, task_id: &str) {
        self.pause(task_id);
        self.sessions.remove(task_id);
    }

    /// Advance the running session by one second.
    ///
    /// Returns the progress update to feed through the completion state
    /// machine, or `None` when nothing is running. When progress reaches 100
    /// the session stops itself -- the engine does not count past completion.
    pub fn tick(&mut self) -> Option<TickUpdate> {
        let task_id = self.active.clone()?;
        let session = self.sessions.get_mut(&task_id)?;
        if !session.is_running {
            return None;
        }
        session.elapsed_secs += 1;
        let progress = session.progress();
        let finished = progress >= 100;
        if finished {
            session.is_running = false;
            self.active = None;
        }
        Some(TickUpdate {
            task_id,
            elapsed_secs: session.elapsed_secs,
            progress,
            finished,
        })
    }
}
