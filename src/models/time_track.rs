use super::Timestamp;
use serde::{Deserialize, Serialize};

/// One continuous work interval. Open while `end_time` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrack {
    pub id: String,
    /// Owner of the interval. Records written before the field existed only
    /// carry the owner inside `id`, see [`TimeTrack::owner`].
    #[serde(default)]
    pub member_id: String,
    pub start_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TimeTrack {
    /// A running track started at `start_time`.
    pub fn open(id: String, member_id: &str, start_time: Timestamp) -> Self {
        Self {
            id,
            member_id: member_id.to_string(),
            start_time,
            end_time: None,
            note: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Close the track. The end never precedes the start, even with a clock
    /// that went backwards between start and stop.
    pub fn close(&mut self, at: Timestamp) {
        self.end_time = Some(at.max(self.start_time));
    }

    pub fn owner(&self) -> &str {
        if !self.member_id.is_empty() {
            return &self.member_id;
        }
        self.id.split_once('-').map(|(_, m)| m).unwrap_or_default()
    }

    pub fn is_owned_by(&self, member: &str) -> bool {
        self.owner() == member
    }

    /// Elapsed milliseconds; open tracks are measured up to `now`.
    pub fn duration_ms(&self, now: Timestamp) -> i64 {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).max(0)
    }
}
