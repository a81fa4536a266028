use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit;
use crate::errors::AppResult;

use super::open_audit;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = open_audit(cfg)?;
        audit::print_log(&pool)?;
    }
    Ok(())
}
