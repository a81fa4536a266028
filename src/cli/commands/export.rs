use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::{collect_rows, write_rows};
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::fs::File;
use std::io::{self, BufWriter};

use super::open_session;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { format, output } = cmd {
        let session = open_session(cfg, true)?;
        let tracker = &session.tracker;

        let rows = collect_rows(&tracker.timer_lists().await?, tracker.now());

        match output {
            Some(path) => {
                write_rows(&rows, *format, BufWriter::new(File::create(path)?))?;
                success(format!(
                    "{} export completed: {path} ({} tracks)",
                    format.as_str().to_uppercase(),
                    rows.len()
                ));
            }
            None => write_rows(&rows, *format, io::stdout().lock())?,
        }
    }
    Ok(())
}
