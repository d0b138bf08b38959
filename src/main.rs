mod cli;
mod client;
mod error;
mod filters;
mod fmt;
mod models;
mod settings;
mod state;
mod tui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};
use error::{Result, TallyError};
use settings::{load_settings, log_path, normalize_base_url, Settings};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "tally=info".into())
}

/// The dashboard owns the terminal, so it logs to a file; every other
/// command logs to stderr.
fn init_logging(to_file: bool) {
    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let path = log_path();
    let file = path
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
    match file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::sink)
            .init(),
    }
}

fn effective_settings(base_url: Option<&str>) -> Result<Settings> {
    let mut settings = load_settings();
    if let Some(url) = base_url {
        settings.base_url = normalize_base_url(url)?;
    }
    Ok(settings)
}

fn run(cli: Cli) -> Result<()> {
    let settings = effective_settings(cli.base_url.as_deref())?;
    match cli.command {
        None | Some(Commands::Dashboard) => cli::dashboard::run(&settings),
        Some(Commands::Report {
            name,
            min_amount,
            json,
        }) => cli::report::run(&settings, name, min_amount, json),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cli::config::show(&settings),
            ConfigCommands::Set {
                base_url,
                timeout_secs,
            } => cli::config::set(base_url, timeout_secs),
        },
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "tally", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, None | Some(Commands::Dashboard)));
    tracing::debug!("tally v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        match e {
            TallyError::Fetch(_) => eprintln!("{e}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
