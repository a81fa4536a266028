use super::{TimeTrack, Timestamp};
use serde::{Deserialize, Serialize};

/// A named activity made of one or more time tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tracks: Vec<TimeTrack>,
}

impl Timer {
    pub fn new(id: String, title: &str, first_track: TimeTrack) -> Self {
        Self {
            id,
            title: title.to_string(),
            tracks: vec![first_track],
        }
    }

    pub fn track(&self, track_id: &str) -> Option<&TimeTrack> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn track_mut(&mut self, track_id: &str) -> Option<&mut TimeTrack> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    /// Tracks are append-only; new intervals always go last.
    pub fn push_track(&mut self, track: TimeTrack) {
        self.tracks.push(track);
    }

    /// The open track owned by `member`, if any.
    pub fn open_track_of(&self, member: &str) -> Option<&TimeTrack> {
        self.tracks
            .iter()
            .find(|t| t.is_open() && t.is_owned_by(member))
    }

    pub fn total_ms(&self, now: Timestamp) -> i64 {
        self.tracks.iter().map(|t| t.duration_ms(now)).sum()
    }
}
