//! Storage: adapter contracts, the SQLite implementation, and TOML config.

mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::reward::RewardLedger;
use crate::task::Task;

/// Task persistence contract, keyed by user and task id.
///
/// The store is the sole writer of durable task state; the timer engine and
/// completion machine only move the in-memory projection that gets flushed
/// through these methods. Implementations tolerate last-writer-wins across
/// devices -- no cross-device locking is assumed.
pub trait TaskStore {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, StoreError>;
    fn list_tasks_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Task>, StoreError>;
    fn create_task(&self, user_id: &str, task: &Task) -> Result<(), StoreError>;
    fn get_task(&self, user_id: &str, id: &str) -> Result<Option<Task>, StoreError>;
    fn put_task(&self, user_id: &str, id: &str, task: &Task) -> Result<(), StoreError>;
    fn delete_task(&self, user_id: &str, id: &str) -> Result<(), StoreError>;
}

/// Reward ledger persistence contract.
pub trait LedgerStore {
    /// Fetch the user's ledger, materializing a default one on first read.
    fn get_ledger(&self, user_id: &str) -> Result<RewardLedger, StoreError>;
    fn put_ledger(&self, user_id: &str, ledger: &RewardLedger) -> Result<(), StoreError>;
}

/// Everything the service needs from a backing store.
pub trait Store: TaskStore + LedgerStore {}

impl<S: TaskStore + LedgerStore> Store for S {}

/// Returns `~/.config/questlog[-dev]/` based on QUESTLOG_ENV.
///
/// Set QUESTLOG_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("QUESTLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("questlog-dev")
    } else {
        base_dir.join("questlog")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
