use crate::config::Config;
use crate::core::PointerState;
use crate::core::localize::NO_DATA;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::{format_duration, format_local};

use super::open_session;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let session = open_session(cfg, true)?;
    let tracker = &session.tracker;

    match tracker.current_user_timer().await? {
        PointerState::Idle => info(tracker.localize("No timer is running.", NO_DATA)),
        PointerState::Dangling(pointer) => warning(format!(
            "The current timer {} of list {} no longer exists. Run `stop` to clear it.",
            pointer.timer_id, pointer.timer_list_id
        )),
        PointerState::Running(running) => {
            println!("⏱  {}", running.timer.title);
            println!("   card    : {}", running.pointer.card_id);
            println!("   list    : {}", running.pointer.timer_list_id);
            println!("   timer   : {}", running.timer.id);
            println!("   started : {}", format_local(running.track.start_time));
            println!(
                "   elapsed : {}",
                format_duration(running.track.duration_ms(tracker.now()))
            );
        }
    }
    Ok(())
}
