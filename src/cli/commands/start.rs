use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit;
use crate::errors::AppResult;
use crate::ui::messages::success;

use super::open_session;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start { list, timer } = cmd {
        let session = open_session(cfg, true)?;
        let tracker = &session.tracker;

        let track = tracker.start_timer(list, timer).await?;

        let title = tracker
            .timer_list(list, None)
            .await?
            .and_then(|l| l.timer(timer).map(|t| t.title.clone()))
            .unwrap_or_else(|| timer.clone());
        success(tracker.localize("Timer \"{title}\" started.", &[("title", title.as_str())]));

        audit::record(
            &session.audit,
            "start",
            list,
            &format!("Timer {timer} started (track {})", track.id),
        );
    }
    Ok(())
}
