//! End-to-end completion flow: timer ticks drive progress through the state
//! machine, which completes the task and draws a reward exactly once.

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use questlog_core::error::CoreError;
use questlog_core::events::Event;
use questlog_core::task::{TaskCategory, TaskDraft, TaskPatch};
use questlog_core::{Database, QuestService};

const USER: &str = "user-1";

fn service(seed: u64) -> QuestService<Database> {
    QuestService::with_rng(
        Database::open_memory().expect("in-memory db"),
        StdRng::seed_from_u64(seed),
    )
}

fn draft(title: &str, minutes: u32) -> TaskDraft {
    TaskDraft {
        title: title.into(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        category: TaskCategory::General,
        estimated_time: Some(minutes),
    }
}

#[test]
fn sixty_ticks_complete_a_one_minute_quest() {
    let mut svc = service(1);
    let task = svc.create_task(USER, draft("One minute of focus", 1)).unwrap();
    svc.start_timer(USER, &task.id).unwrap();

    let mut completion = None;
    for _ in 0..60 {
        if let Some(event) = svc.tick(USER).unwrap() {
            if matches!(event, Event::TaskCompleted { .. }) {
                completion = Some(event);
            }
        }
    }

    let Some(Event::TaskCompleted { task_id, .. }) = completion else {
        panic!("expected a TaskCompleted event within 60 ticks");
    };
    assert_eq!(task_id, task.id);

    let done = svc.get_task(USER, &task.id).unwrap();
    assert_eq!(done.elapsed_time, 60);
    assert_eq!(done.progress, 100);
    assert!(done.completed);
    assert!(done.completed_at.is_some());
    assert!(done.reward.is_some());

    // The session stopped itself; no tick fires past completion.
    assert_eq!(svc.active_task(), None);
    assert!(svc.tick(USER).unwrap().is_none());
    assert_eq!(svc.get_task(USER, &task.id).unwrap().elapsed_time, 60);
}

#[test]
fn repeated_completion_updates_are_idempotent() {
    let mut svc = service(2);
    let task = svc.create_task(USER, draft("Idempotent", 25)).unwrap();
    let patch = TaskPatch {
        progress: Some(100),
        ..TaskPatch::default()
    };

    let first = svc.update_task(USER, &task.id, &patch).unwrap();
    let second = svc.update_task(USER, &task.id, &patch).unwrap();

    assert_eq!(first.completed_at, second.completed_at);
    assert_eq!(first.reward, second.reward);

    // The ledger was touched by exactly one draw: points either grew once
    // (points reward) or not at all (message/badge/unlockable reward).
    let view = svc.rewards(USER).unwrap();
    match first.reward.as_ref().unwrap() {
        questlog_core::Reward::Points { value, .. } => {
            assert_eq!(view.ledger.points, u64::from(*value));
        }
        _ => assert_eq!(view.ledger.points, 0),
    }
}

#[test]
fn second_timer_start_is_rejected_until_first_pauses() {
    let mut svc = service(3);
    let a = svc.create_task(USER, draft("Quest A", 1)).unwrap();
    let b = svc.create_task(USER, draft("Quest B", 1)).unwrap();

    svc.start_timer(USER, &a.id).unwrap();
    let err = svc.start_timer(USER, &b.id).unwrap_err();
    assert!(matches!(err, CoreError::TimerBusy { active } if active == a.id));

    svc.pause_timer(USER, &a.id).unwrap();
    svc.start_timer(USER, &b.id).unwrap();
    assert_eq!(svc.active_task(), Some(b.id.as_str()));
}

#[test]
fn reset_after_completion_changes_nothing() {
    let mut svc = service(4);
    let task = svc.create_task(USER, draft("Done deal", 25)).unwrap();
    let patch = TaskPatch {
        progress: Some(100),
        elapsed_time: Some(90),
        ..TaskPatch::default()
    };
    svc.update_task(USER, &task.id, &patch).unwrap();

    let err = svc.reset_timer(USER, &task.id).unwrap_err();
    assert!(matches!(err, CoreError::InvalidState(_)));

    let loaded = svc.get_task(USER, &task.id).unwrap();
    assert_eq!(loaded.elapsed_time, 90);
    assert_eq!(loaded.progress, 100);
}

#[test]
fn deleting_a_running_task_frees_the_timer() {
    let mut svc = service(5);
    let a = svc.create_task(USER, draft("Doomed", 1)).unwrap();
    let b = svc.create_task(USER, draft("Survivor", 1)).unwrap();

    svc.start_timer(USER, &a.id).unwrap();
    svc.delete_task(USER, &a.id).unwrap();
    assert_eq!(svc.active_task(), None);
    assert!(svc.tick(USER).unwrap().is_none());

    svc.start_timer(USER, &b.id).unwrap();
    assert_eq!(svc.active_task(), Some(b.id.as_str()));
}

#[test]
fn pause_then_resume_preserves_elapsed() {
    let mut svc = service(6);
    let task = svc.create_task(USER, draft("Stop and go", 1)).unwrap();
    svc.start_timer(USER, &task.id).unwrap();
    for _ in 0..5 {
        svc.tick(USER).unwrap();
    }
    svc.pause_timer(USER, &task.id).unwrap();
    assert!(svc.tick(USER).unwrap().is_none());

    svc.start_timer(USER, &task.id).unwrap();
    svc.tick(USER).unwrap();
    assert_eq!(svc.get_task(USER, &task.id).unwrap().elapsed_time, 6);
}

proptest! {
    // Stored progress stays in [0, 100] no matter what the patch carries.
    #[test]
    fn stored_progress_is_always_clamped(raw_progress in -1000i64..1000, elapsed in 0u32..100_000) {
        let mut svc = service(8);
        let task = svc.create_task(USER, draft("Clamped", 25)).unwrap();
        let patch = TaskPatch {
            progress: Some(raw_progress),
            elapsed_time: Some(elapsed),
            ..TaskPatch::default()
        };
        let updated = svc.update_task(USER, &task.id, &patch).unwrap();
        prop_assert!(updated.progress <= 100);
        if updated.completed {
            prop_assert_eq!(updated.progress, 100);
            prop_assert!(updated.completed_at.is_some());
            prop_assert!(updated.reward.is_some());
        }
    }
}
