use crate::config::Config;
use crate::core::{StopOutcome, audit};
use crate::core::localize::NO_DATA;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::format_duration;

use super::open_session;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let session = open_session(cfg, true)?;
    let tracker = &session.tracker;

    match tracker.stop_current_user_timer().await? {
        StopOutcome::Idle => info(tracker.localize("No timer is running.", NO_DATA)),
        // The alert has already been shown.
        StopOutcome::Repaired(pointer) => audit::record(
            &session.audit,
            "stop",
            &pointer.timer_list_id,
            &format!("Stale current timer {} cleared", pointer.timer_id),
        ),
        StopOutcome::Stopped(track) => {
            let duration = format_duration(track.duration_ms(tracker.now()));
            success(tracker.localize("Timer stopped after {duration}.", &[("duration", duration.as_str())]));
            audit::record(
                &session.audit,
                "stop",
                &track.id,
                &format!("Track stopped after {duration}"),
            );
        }
    }
    Ok(())
}
