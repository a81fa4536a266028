use crate::config::Config;
use crate::core::audit;
use crate::errors::AppResult;
use crate::ui::messages::success;

use super::open_session;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let session = open_session(cfg, true)?;
    let list = session.tracker.add_timer_list().await?;

    success(format!("Timer list {} created.", list.id));
    audit::record(&session.audit, "new-list", &list.id, "Timer list created");
    Ok(())
}
