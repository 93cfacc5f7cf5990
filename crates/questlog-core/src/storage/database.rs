//! SQLite-backed implementation of the task and ledger stores.
//!
//! One `tasks` table keyed by (user_id, id) and one `ledgers` table keyed by
//! user_id. Reward snapshots and owned-id sets are stored as JSON columns.
//! All access goes through one connection, so writes to the same task are
//! serialized in-process.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, LedgerStore, TaskStore};
use crate::error::StoreError;
use crate::reward::{Reward, RewardLedger};
use crate::task::{Task, TaskCategory};

/// Parse task category from its database string.
fn parse_category(category_str: &str) -> TaskCategory {
    match category_str {
        "learning" => TaskCategory::Learning,
        "fitness" => TaskCategory::Fitness,
        "creative" => TaskCategory::Creative,
        "work" => TaskCategory::Work,
        "personal" => TaskCategory::Personal,
        _ => TaskCategory::General,
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| StoreError::Corrupt(format!("bad date '{date_str}': {e}")))
}

fn parse_datetime(dt_str: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp '{dt_str}': {e}")))
}

fn row_to_task(row: &Row) -> Result<Task, StoreError> {
    let date_str: String = row.get::<_, String>(4).map_err(StoreError::from)?;
    let category_str: String = row.get::<_, String>(5).map_err(StoreError::from)?;
    let completed_at: Option<String> = row.get(10).map_err(StoreError::from)?;
    let reward_json: Option<String> = row.get(11).map_err(StoreError::from)?;
    let created_at: String = row.get(12).map_err(StoreError::from)?;

    let reward: Option<Reward> = match reward_json {
        Some(json) => Some(
            serde_json::from_str(&json)
                .map_err(|e| StoreError::Corrupt(format!("bad reward snapshot: {e}")))?,
        ),
        None => None,
    };

    Ok(Task {
        id: row.get(0).map_err(StoreError::from)?,
        user_id: row.get(1).map_err(StoreError::from)?,
        title: row.get(2).map_err(StoreError::from)?,
        description: row.get(3).map_err(StoreError::from)?,
        date: parse_date(&date_str)?,
        category: parse_category(&category_str),
        estimated_time: row.get(6).map_err(StoreError::from)?,
        elapsed_time: row.get(7).map_err(StoreError::from)?,
        progress: row.get(8).map_err(StoreError::from)?,
        completed: row.get(9).map_err(StoreError::from)?,
        completed_at: completed_at.as_deref().map(parse_datetime).transpose()?,
        reward,
        created_at: parse_datetime(&created_at)?,
    })
}

fn ids_to_json(ids: &BTreeSet<String>) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

fn ids_from_json(json: &str) -> Result<BTreeSet<String>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Corrupt(format!("bad id set: {e}")))
}

const TASK_COLUMNS: &str = "id, user_id, title, description, date, category, estimated_time, \
     elapsed_time, progress, completed, completed_at, reward, created_at";

/// SQLite database implementing both store adapters.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/questlog/questlog.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Self::open_at(dir.join("questlog.db"))
    }

    /// Open the database at an explicit path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and throwaway runs).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id             TEXT NOT NULL,
                    user_id        TEXT NOT NULL,
                    title          TEXT NOT NULL,
                    description    TEXT NOT NULL DEFAULT '',
                    date           TEXT NOT NULL,
                    category       TEXT NOT NULL DEFAULT 'general',
                    estimated_time INTEGER NOT NULL,
                    elapsed_time   INTEGER NOT NULL DEFAULT 0,
                    progress       INTEGER NOT NULL DEFAULT 0,
                    completed      INTEGER NOT NULL DEFAULT 0,
                    completed_at   TEXT,
                    reward         TEXT,
                    created_at     TEXT NOT NULL,
                    PRIMARY KEY (user_id, id)
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_user_date ON tasks(user_id, date);

                CREATE TABLE IF NOT EXISTS ledgers (
                    user_id          TEXT PRIMARY KEY,
                    points           INTEGER NOT NULL DEFAULT 0,
                    badges           TEXT NOT NULL DEFAULT '[]',
                    unlocked_rewards TEXT NOT NULL DEFAULT '[]'
                );",
            )
            .map_err(StoreError::from)
    }

    fn write_task(&self, task: &Task, upsert: bool) -> Result<(), StoreError> {
        let verb = if upsert { "INSERT OR REPLACE" } else { "INSERT" };
        let reward_json = task
            .reward
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Corrupt(format!("unencodable reward: {e}")))?;
        self.conn
            .execute(
                &format!(
                    "{verb} INTO tasks ({TASK_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                params![
                    task.id,
                    task.user_id,
                    task.title,
                    task.description,
                    task.date.format("%Y-%m-%d").to_string(),
                    task.category.as_str(),
                    task.estimated_time,
                    task.elapsed_time,
                    task.progress,
                    task.completed,
                    task.completed_at.map(|dt| dt.to_rfc3339()),
                    reward_json,
                    task.created_at.to_rfc3339(),
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }
}

impl TaskStore for Database {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at"
            ))
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| Ok(row_to_task(row)))
            .map_err(StoreError::from)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(StoreError::from)??);
        }
        Ok(tasks)
    }

    fn list_tasks_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE user_id = ?1 AND date = ?2 ORDER BY created_at"
            ))
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map(
                params![user_id, date.format("%Y-%m-%d").to_string()],
                |row| Ok(row_to_task(row)),
            )
            .map_err(StoreError::from)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(StoreError::from)??);
        }
        Ok(tasks)
    }

    fn create_task(&self, _user_id: &str, task: &Task) -> Result<(), StoreError> {
        self.write_task(task, false)
    }

    fn get_task(&self, user_id: &str, id: &str) -> Result<Option<Task>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 AND id = ?2"
            ))
            .map_err(StoreError::from)?;
        let row = stmt
            .query_row(params![user_id, id], |row| Ok(row_to_task(row)))
            .optional()
            .map_err(StoreError::from)?;
        row.transpose()
    }

    fn put_task(&self, _user_id: &str, _id: &str, task: &Task) -> Result<(), StoreError> {
        self.write_task(task, true)
    }

    fn delete_task(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
                params![user_id, id],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }
}

impl LedgerStore for Database {
    fn get_ledger(&self, user_id: &str) -> Result<RewardLedger, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT points, badges, unlocked_rewards FROM ledgers WHERE user_id = ?1")
            .map_err(StoreError::from)?;
        let row = stmt
            .query_row(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .optional()
            .map_err(StoreError::from)?;

        match row {
            Some((points, badges, unlocked)) => Ok(RewardLedger {
                points: points.max(0) as u64,
                badges: ids_from_json(&badges)?,
                unlocked_rewards: ids_from_json(&unlocked)?,
            }),
            None => Ok(RewardLedger::default()),
        }
    }

    fn put_ledger(&self, user_id: &str, ledger: &RewardLedger) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO ledgers (user_id, points, badges, unlocked_rewards)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    user_id,
                    ledger.points as i64,
                    ids_to_json(&ledger.badges),
                    ids_to_json(&ledger.unlocked_rewards),
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::Reward;
    use crate::task::TaskDraft;

    fn sample_task(id: &str, user: &str, date: &str) -> Task {
        TaskDraft {
            title: format!("Task {id}"),
            description: "desc".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: TaskCategory::Learning,
            estimated_time: Some(30),
        }
        .into_task(user, id.into(), Utc::now())
        .unwrap()
    }

    #[test]
    fn create_get_roundtrip() {
        let db = Database::open_memory().unwrap();
        let task = sample_task("t-1", "user-1", "2025-06-01");
        db.create_task("user-1", &task).unwrap();

        let loaded = db.get_task("user-1", "t-1").unwrap().unwrap();
        assert_eq!(loaded.title, "Task t-1");
        assert_eq!(loaded.category, TaskCategory::Learning);
        assert_eq!(loaded.estimated_time, 30);
        assert!(loaded.reward.is_none());
    }

    #[test]
    fn tasks_are_scoped_by_user() {
        let db = Database::open_memory().unwrap();
        db.create_task("alice", &sample_task("t-1", "alice", "2025-06-01"))
            .unwrap();
        assert!(db.get_task("bob", "t-1").unwrap().is_none());
        assert!(db.list_tasks("bob").unwrap().is_empty());
    }

    #[test]
    fn list_by_date_filters() {
        let db = Database::open_memory().unwrap();
        db.create_task("u", &sample_task("t-1", "u", "2025-06-01"))
            .unwrap();
        db.create_task("u", &sample_task("t-2", "u", "2025-06-02"))
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tasks = db.list_tasks_by_date("u", date).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t-1");
    }

    #[test]
    fn put_persists_completion_fields() {
        let db = Database::open_memory().unwrap();
        let mut task = sample_task("t-1", "u", "2025-06-01");
        db.create_task("u", &task).unwrap();

        task.progress = 100;
        task.elapsed_time = 1800;
        task.completed = true;
        task.completed_at = Some(Utc::now());
        task.reward = Some(Reward::fallback());
        db.put_task("u", "t-1", &task).unwrap();

        let loaded = db.get_task("u", "t-1").unwrap().unwrap();
        assert!(loaded.completed);
        assert!(loaded.completed_at.is_some());
        assert_eq!(loaded.reward, Some(Reward::fallback()));
    }

    #[test]
    fn delete_is_idempotent() {
        let db = Database::open_memory().unwrap();
        db.create_task("u", &sample_task("t-1", "u", "2025-06-01"))
            .unwrap();
        db.delete_task("u", "t-1").unwrap();
        db.delete_task("u", "t-1").unwrap();
        assert!(db.get_task("u", "t-1").unwrap().is_none());
    }

    #[test]
    fn reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questlog.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.create_task("u", &sample_task("t-1", "u", "2025-06-01"))
                .unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert!(db.get_task("u", "t-1").unwrap().is_some());
    }

    #[test]
    fn ledger_defaults_then_roundtrips() {
        let db = Database::open_memory().unwrap();
        let ledger = db.get_ledger("u").unwrap();
        assert_eq!(ledger, RewardLedger::default());

        let mut updated = ledger;
        updated.points = 120;
        updated.badges.insert("first-win".into());
        db.put_ledger("u", &updated).unwrap();

        let loaded = db.get_ledger("u").unwrap();
        assert_eq!(loaded, updated);
    }
}
