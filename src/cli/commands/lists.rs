use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::{Table, format_duration};

use super::open_session;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let session = open_session(cfg, true)?;
    let tracker = &session.tracker;
    let now = tracker.now();

    let mut lists = tracker.timer_lists().await?;
    if lists.is_empty() {
        info("No timer lists on this card.");
        return Ok(());
    }
    lists.sort_by(|a, b| a.id.cmp(&b.id));

    let mut table = Table::new(&["list", "timers", "total"]);
    for list in &lists {
        let total: i64 = list.timers.iter().map(|t| t.total_ms(now)).sum();
        table.add_row(vec![
            list.id.clone(),
            list.timers.len().to_string(),
            format_duration(total),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
