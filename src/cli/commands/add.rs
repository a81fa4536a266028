use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit;
use crate::errors::AppResult;
use crate::ui::messages::success;

use super::open_session;

/// Handle the `add` command: create a timer and start it
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { list, title } = cmd {
        let session = open_session(cfg, true)?;
        let tracker = &session.tracker;

        let timer = tracker.add_timer(list, title).await?;

        success(tracker.localize("Timer \"{title}\" started.", &[("title", timer.title.as_str())]));
        println!("   list  : {list}");
        println!("   timer : {}", timer.id);

        audit::record(
            &session.audit,
            "add",
            list,
            &format!("Timer \"{}\" ({}) added and started", timer.title, timer.id),
        );
    }
    Ok(())
}
