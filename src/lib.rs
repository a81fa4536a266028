//! rTimeTracker library root.
//! Exposes the timer state machine, the storage adapter and its backends,
//! the CLI parser and the high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod storage;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::{AppError, AppResult};

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli, cfg),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Lists => commands::lists::handle(cfg).await,
        Commands::NewList => commands::new_list::handle(cfg).await,
        Commands::Add { .. } => commands::add::handle(&cli.command, cfg).await,
        Commands::Start { .. } => commands::start::handle(&cli.command, cfg).await,
        Commands::Stop => commands::stop::handle(cfg).await,
        Commands::Status => commands::status::handle(cfg).await,
        Commands::Del { .. } => commands::del::handle(&cli.command, cfg).await,
        Commands::List { .. } => commands::list::handle(&cli.command, cfg).await,
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg).await,
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Locale { .. } => commands::locale::handle(&cli.command),
    }
}

/// Configuration file values overridden by the global flags.
pub fn effective_config(cli: &Cli, mut cfg: Config) -> Config {
    if let Some(db) = &cli.db {
        cfg.database = db.clone();
    }
    if let Some(member) = &cli.member {
        cfg.member = member.clone();
    }
    if let Some(card) = &cli.card {
        cfg.card = Some(card.clone());
    }
    if let Some(dir) = &cli.host_dir {
        cfg.host_dir = Some(dir.clone());
    }
    cfg
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Test runs never read the user's configuration file.
    let file_cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };
    let cfg = effective_config(&cli, file_cfg);

    ui::logger::init(ui::logger::level_for(cfg.log_level_filter(), cli.verbose));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(AppError::from)?;
    runtime.block_on(dispatch(&cli, &cfg))
}
