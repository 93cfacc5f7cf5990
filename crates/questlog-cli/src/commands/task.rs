//! Quest management commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use questlog_core::task::{TaskCategory, TaskDraft, TaskPatch};

use super::open_service;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new quest
    Create {
        /// Quest title
        title: String,
        /// Quest description
        #[arg(long, default_value = "")]
        description: String,
        /// Quest date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Category: general, learning, fitness, creative, work, personal
        #[arg(long, default_value = "general")]
        category: String,
        /// Estimated time in minutes (default: 25)
        #[arg(long)]
        estimated_time: Option<u32>,
    },
    /// List quests
    List {
        /// Only quests for this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one quest
    Get {
        /// Quest id
        id: String,
    },
    /// Update a quest
    Update {
        /// Quest id
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New estimated time in minutes
        #[arg(long)]
        estimated_time: Option<u32>,
        /// New progress percentage (completes the quest at 100)
        #[arg(long)]
        progress: Option<i64>,
    },
    /// Delete a quest
    Delete {
        /// Quest id
        id: String,
    },
}

pub fn run(user: &str, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut svc = open_service()?;
    match action {
        TaskAction::Create {
            title,
            description,
            date,
            category,
            estimated_time,
        } => {
            let draft = TaskDraft {
                title,
                description,
                date: parse_date_or_today(date.as_deref())?,
                category: parse_category(&category)?,
                estimated_time,
            };
            let task = svc.create_task(user, draft)?;
            println!("Created quest '{}' ({})", task.title, task.id);
        }
        TaskAction::List { date, json } => {
            let tasks = match date {
                Some(date) => svc.list_tasks_by_date(user, parse_date(&date)?)?,
                None => svc.list_tasks(user)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No quests.");
            } else {
                for task in tasks {
                    let status = if task.completed { "done" } else { "active" };
                    println!(
                        "{}  [{}] {:>3}%  {}  ({})",
                        task.date,
                        status,
                        task.progress,
                        task.title,
                        task.id
                    );
                }
            }
        }
        TaskAction::Get { id } => {
            let task = svc.get_task(user, &id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            date,
            category,
            estimated_time,
            progress,
        } => {
            let patch = TaskPatch {
                title,
                description,
                date: date.as_deref().map(parse_date).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                estimated_time,
                elapsed_time: None,
                progress,
            };
            let task = svc.update_task(user, &id, &patch)?;
            if let Some(reward) = task.reward.as_ref().filter(|_| task.completed) {
                println!("Quest complete! {}", reward.message());
            } else {
                println!("Updated quest '{}' ({}%)", task.title, task.progress);
            }
        }
        TaskAction::Delete { id } => {
            svc.delete_task(user, &id)?;
            println!("Deleted quest {id}");
        }
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))?)
}

fn parse_date_or_today(s: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match s {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_category(s: &str) -> Result<TaskCategory, Box<dyn std::error::Error>> {
    match s {
        "general" => Ok(TaskCategory::General),
        "learning" => Ok(TaskCategory::Learning),
        "fitness" => Ok(TaskCategory::Fitness),
        "creative" => Ok(TaskCategory::Creative),
        "work" => Ok(TaskCategory::Work),
        "personal" => Ok(TaskCategory::Personal),
        other => Err(format!(
            "unknown category '{other}' (general, learning, fitness, creative, work, personal)"
        )
        .into()),
    }
}
