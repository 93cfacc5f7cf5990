//! Focus timer commands.
//!
//! The CLI owns the one-second tick cadence: `timer run` starts a quest's
//! timer and drives the core service until the quest completes, the optional
//! budget runs out, or the process is interrupted. Every tick is flushed to
//! the store, so a killed run loses at most one second.

use std::thread;
use std::time::Duration;

use clap::Subcommand;
use questlog_core::events::Event;

use super::open_service;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a quest's focus timer until it completes
    Run {
        /// Quest id
        id: String,
        /// Stop after this many seconds (default: run to completion)
        #[arg(long)]
        seconds: Option<u32>,
    },
    /// Reset a quest's timer and progress to zero
    Reset {
        /// Quest id
        id: String,
    },
}

pub fn run(user: &str, action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut svc = open_service()?;
    match action {
        TimerAction::Run { id, seconds } => {
            svc.start_timer(user, &id)?;
            let task = svc.get_task(user, &id)?;
            println!(
                "Timer running for '{}' (target {} min). Ctrl-C to stop.",
                task.title, task.estimated_time
            );

            let mut ticked = 0u32;
            loop {
                thread::sleep(Duration::from_secs(1));
                match svc.tick(user)? {
                    Some(Event::TaskCompleted { reward, .. }) => {
                        println!("Quest complete! {}", reward.message());
                        break;
                    }
                    Some(Event::TimerTicked {
                        elapsed_secs,
                        progress,
                        ..
                    }) => {
                        print!("\r{elapsed_secs:>5}s  {progress:>3}%");
                        use std::io::Write;
                        std::io::stdout().flush().ok();
                    }
                    _ => break,
                }
                ticked += 1;
                if let Some(budget) = seconds {
                    if ticked >= budget {
                        svc.pause_timer(user, &id)?;
                        println!("\nPaused after {ticked}s.");
                        break;
                    }
                }
            }
        }
        TimerAction::Reset { id } => {
            svc.reset_timer(user, &id)?;
            println!("Timer reset for quest {id}");
        }
    }
    Ok(())
}
