//! Reward ledger commands.

use clap::Subcommand;

use super::open_service;

#[derive(Subcommand)]
pub enum RewardsAction {
    /// Show the reward ledger
    Show {
        /// Emit JSON (ledger plus the full reward pool)
        #[arg(long)]
        json: bool,
    },
}

pub fn run(user: &str, action: RewardsAction) -> Result<(), Box<dyn std::error::Error>> {
    let svc = open_service()?;
    match action {
        RewardsAction::Show { json } => {
            let view = svc.rewards(user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            println!("Points: {}", view.ledger.points);

            println!(
                "Badges: {}/{}",
                view.ledger.badges.len(),
                view.reward_pool.badges.len()
            );
            for badge in &view.reward_pool.badges {
                if view.ledger.badges.contains(&badge.id) {
                    println!("  {} {} -- {}", badge.icon, badge.name, badge.description);
                }
            }

            println!(
                "Unlocked: {}/{}",
                view.ledger.unlocked_rewards.len(),
                view.reward_pool.unlockables.len()
            );
            for unlockable in &view.reward_pool.unlockables {
                if view.ledger.unlocked_rewards.contains(&unlockable.id) {
                    println!("  {} {}", unlockable.icon, unlockable.name);
                }
            }
        }
    }
    Ok(())
}
