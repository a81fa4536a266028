//! Command handlers. Tracker commands share one [`Session`].

pub mod add;
pub mod config;
pub mod del;
pub mod export;
pub mod init;
pub mod list;
pub mod lists;
pub mod locale;
pub mod log;
pub mod new_list;
pub mod start;
pub mod status;
pub mod stop;

use crate::config::Config;
use crate::core::TimeTracker;
use crate::core::localize::Dictionary;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::storage::{AnyBackend, Storage};
use crate::ui::prompt::{AssumeYes, TerminalPrompt};
use std::fs;
use std::path::Path;

/// The tracker of the configured member and card, plus the audit database.
pub struct Session {
    pub tracker: TimeTracker<AnyBackend>,
    pub audit: DbPool,
}

/// Open (and migrate) the SQLite database holding the `log` table.
pub fn open_audit(cfg: &Config) -> AppResult<DbPool> {
    if let Some(parent) = Path::new(&cfg.database).parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// `confirm = false` answers every confirmation with yes.
pub fn open_session(cfg: &Config, confirm: bool) -> AppResult<Session> {
    let audit = open_audit(cfg)?;
    let storage = Storage::new(AnyBackend::select(cfg)?, cfg.context());
    let tracker = TimeTracker::new(storage).with_localizer(Dictionary::for_locale(&cfg.locale));
    let tracker = if confirm {
        tracker.with_prompt(TerminalPrompt)
    } else {
        tracker.with_prompt(AssumeYes)
    };
    Ok(Session { tracker, audit })
}
