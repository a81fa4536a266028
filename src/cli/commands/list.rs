use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::TimeTracker;
use crate::errors::{AppError, AppResult};
use crate::models::TimerList;
use crate::storage::StorageBackend;
use crate::ui::messages::{header, info};
use crate::utils::{Table, format_duration, format_local};

use super::open_session;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { list } = cmd {
        let session = open_session(cfg, true)?;
        let tracker = &session.tracker;

        let mut lists = match list {
            Some(id) => vec![
                tracker
                    .timer_list(id, None)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Timer list {id} not found.")))?,
            ],
            None => tracker.timer_lists().await?,
        };
        if lists.is_empty() {
            info("No timer lists on this card.");
            return Ok(());
        }
        lists.sort_by(|a, b| a.id.cmp(&b.id));

        for list in &lists {
            print_list(tracker, list);
        }
    }
    Ok(())
}

fn print_list<B: StorageBackend>(tracker: &TimeTracker<B>, list: &TimerList) {
    header(format!("Timer list {}", list.id));
    if list.timers.is_empty() {
        println!("(no timers)\n");
        return;
    }

    let now = tracker.now();
    let mut table = Table::new(&["", "timer", "title", "tracks", "last start", "total"]);
    for timer in &list.timers {
        let running = if tracker.if_current_user_timer(timer) { "▶" } else { "" };
        let last_start = timer
            .tracks
            .iter()
            .map(|t| t.start_time)
            .max()
            .map(format_local)
            .unwrap_or_default();
        table.add_row(vec![
            running.to_string(),
            timer.id.clone(),
            timer.title.clone(),
            timer.tracks.len().to_string(),
            last_start,
            format_duration(timer.total_ms(now)),
        ]);
    }
    println!("{}", table.render());
}
