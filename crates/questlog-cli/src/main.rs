use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "questlog", version, about = "Questlog CLI")]
struct Cli {
    /// Acting user id. Falls back to QUESTLOG_USER, then "local".
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quest management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Focus timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Reward ledger
    Rewards {
        #[command(subcommand)]
        action: commands::rewards::RewardsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let user = cli
        .user
        .or_else(|| std::env::var("QUESTLOG_USER").ok())
        .unwrap_or_else(|| "local".to_string());

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(&user, action),
        Commands::Timer { action } => commands::timer::run(&user, action),
        Commands::Rewards { action } => commands::rewards::run(&user, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
