pub mod config;
pub mod dashboard;
pub mod report;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "tally", version, about = "Terminal dashboard for customer transactions.")]
pub struct Cli {
    /// Backend base URL (overrides settings), e.g. http://localhost:3001
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard (default).
    Dashboard,
    /// Fetch once and print the filtered customers and daily totals.
    Report {
        /// Case-insensitive customer name substring
        #[arg(long)]
        name: Option<String>,
        /// Minimum transaction amount
        #[arg(long = "min-amount", allow_negative_numbers = true)]
        min_amount: Option<String>,
        /// Print the view state as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print shell completions to stdout.
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings and where they are stored.
    Show,
    /// Update settings.
    Set {
        /// Backend base URL
        #[arg(long = "base-url")]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long = "timeout-secs")]
        timeout_secs: Option<u64>,
    },
}
