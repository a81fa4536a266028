use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::audit;
use crate::errors::AppResult;

use super::open_audit;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cfg = Config::init_all(cfg, cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing rTimeTracker…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", cfg.database);

    let pool = open_audit(&cfg)?;
    println!("✅ Database initialized at {}", cfg.database);

    audit::record(
        &pool,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", cfg.database),
    );

    println!("🎉 rTimeTracker initialization completed!");
    Ok(())
}
