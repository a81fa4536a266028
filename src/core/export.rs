//! Flat export of the time tracks of one card.

use crate::errors::AppResult;
use crate::models::{TimerList, Timestamp};
use crate::utils::time::{format_ts, whole_minutes};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// One time track with the names of the timer and list it belongs to.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TrackRow {
    pub list: String,
    pub timer: String,
    pub title: String,
    pub track: String,
    pub member: String,
    pub start: String,
    /// Empty while the track is running.
    pub end: String,
    /// Running tracks are measured up to `now`.
    pub duration_minutes: i64,
}

/// Rows ordered by list, then by position of timer and track.
pub fn collect_rows(lists: &[TimerList], now: Timestamp) -> Vec<TrackRow> {
    let mut sorted: Vec<&TimerList> = lists.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut rows = Vec::new();
    for list in sorted {
        for timer in &list.timers {
            for track in &timer.tracks {
                rows.push(TrackRow {
                    list: list.id.clone(),
                    timer: timer.id.clone(),
                    title: timer.title.clone(),
                    track: track.id.clone(),
                    member: track.owner().to_string(),
                    start: format_ts(track.start_time),
                    end: track.end_time.map(format_ts).unwrap_or_default(),
                    duration_minutes: whole_minutes(track.duration_ms(now)),
                });
            }
        }
    }
    rows
}

/// JSON pretty-printed.
pub fn write_json<W: Write>(rows: &[TrackRow], mut out: W) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    writeln!(out)?;
    Ok(())
}

/// CSV, header included through serde.
pub fn write_csv<W: Write>(rows: &[TrackRow], out: W) -> AppResult<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rows<W: Write>(rows: &[TrackRow], format: ExportFormat, out: W) -> AppResult<()> {
    match format {
        ExportFormat::Json => write_json(rows, out),
        ExportFormat::Csv => write_csv(rows, out),
    }
}
