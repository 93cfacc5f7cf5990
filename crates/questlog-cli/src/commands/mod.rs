pub mod rewards;
pub mod task;
pub mod timer;

use questlog_core::{Config, Database, QuestService};

/// Open the quest service against the configured database.
pub fn open_service() -> Result<QuestService<Database>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open()?,
    };
    Ok(QuestService::new(db))
}
