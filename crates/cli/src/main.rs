//! Chorebot CLI, the main entry point.
//!
//! Commands:
//! - `serve`     Start the LINE webhook server
//! - `schedule`  Show (and on first view, generate) a month's schedule
//! - `status`    Show whose turn is next
//! - `set-next`  Make a roommate start the next month
//! - `reset`     Start the rotation over from the first roommate
//! - `weeks`     Show a month's qualifying weeks
//! - `preview`   Dry-run the next few months
//! - `onboard`   Write a starter config

use chorebot_rotation::MAX_PREVIEW_MONTHS;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chorebot",
    about = "Chorebot: weekly chore rotation for roommates",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the LINE webhook server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show a month's schedule, generating it on first view
    Schedule {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// Show whose turn is next
    Status,

    /// Make roommate INDEX (0-based) start the next ungenerated month
    SetNext {
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },

    /// Reset the rotation to the first roommate
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a month's qualifying weeks
    Weeks {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// Preview upcoming months without saving anything
    Preview {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Number of months to show
        #[arg(
            long,
            default_value_t = 3,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PREVIEW_MONTHS))
        )]
        months: u32,
    },

    /// Write a starter configuration
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Schedule { year, month } => commands::schedule::run(year, month).await?,
        Commands::Status => commands::status::run().await?,
        Commands::SetNext { index } => commands::set_next::run(index).await?,
        Commands::Reset { yes } => commands::reset::run(yes).await?,
        Commands::Weeks { year, month } => commands::weeks::run(year, month)?,
        Commands::Preview {
            year,
            month,
            months,
        } => commands::preview::run(year, month, months).await?,
        Commands::Onboard => commands::onboard::run()?,
    }

    Ok(())
}
