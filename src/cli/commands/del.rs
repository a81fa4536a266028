use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit;
use crate::core::localize::NO_DATA;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

use super::open_session;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { list, timer, yes } = cmd {
        let session = open_session(cfg, !*yes)?;
        let tracker = &session.tracker;

        if !tracker.delete_timer(list, timer).await? {
            info("Operation cancelled.");
            return Ok(());
        }

        success(tracker.localize("Timer deleted.", NO_DATA));
        audit::record(&session.audit, "del", list, &format!("Timer {timer} deleted"));
    }
    Ok(())
}
