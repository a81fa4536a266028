//! Audit trail of CLI operations in the SQLite `log` table.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{LogRow, load_log};
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const OP_TARGET_WIDTH: usize = 60;

/// Write an audit row. Failures are reported but never abort the command.
pub fn record(pool: &DbPool, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(&pool.conn, operation, target, message) {
        log::warn!("Failed to write internal log: {e}");
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "new-list" => Colour::Green,
        "start" => Colour::Cyan,
        "stop" => Colour::Yellow,
        "del" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// One printable line per row: `id: date | op (target) => message`, the
/// operation coloured and the `op (target)` column cut at 60 visible chars.
pub fn render_log(rows: &[LogRow]) -> AppResult<Vec<String>> {
    let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;
    let visible_len = |s: &str| ansi.replace_all(s, "").chars().count();

    let entries: Vec<(&LogRow, String, String)> = rows
        .iter()
        .map(|row| {
            let date = chrono::DateTime::parse_from_rfc3339(&row.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| row.date.clone());
            let op_target = if row.target.is_empty() {
                row.operation.clone()
            } else {
                format!("{} ({})", row.operation, row.target)
            };
            (row, date, op_target)
        })
        .collect();

    let op_w = entries
        .iter()
        .map(|(_, _, op_target)| op_target.chars().count())
        .max()
        .unwrap_or(10)
        .min(OP_TARGET_WIDTH);
    let id_w = entries
        .iter()
        .map(|(row, _, _)| row.id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = entries
        .iter()
        .map(|(_, date, _)| date.len())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(entries.len());
    for (row, date, op_target) in entries {
        let truncated = if op_target.chars().count() > OP_TARGET_WIDTH {
            let mut s: String = op_target.chars().take(OP_TARGET_WIDTH - 3).collect();
            s.push_str("...");
            s
        } else {
            op_target
        };

        // Only the operation word is coloured.
        let color = color_for_operation(&row.operation);
        let colored = match truncated.split_once(' ') {
            Some((op, rest)) => format!("{} {rest}", color.paint(op)),
            None => color.paint(truncated.as_str()).to_string(),
        };
        let padding = " ".repeat(op_w.saturating_sub(visible_len(&colored)));

        lines.push(format!(
            "{:>id_w$}: {:<date_w$} | {colored}{padding} => {}",
            row.id, date, row.message
        ));
    }
    Ok(lines)
}

pub fn print_log(pool: &DbPool) -> AppResult<()> {
    let rows = load_log(pool)?;
    println!("📜 Internal log:\n");
    for line in render_log(&rows)? {
        println!("{line}");
    }
    Ok(())
}
