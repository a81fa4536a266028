use super::Timer;
use serde::{Deserialize, Serialize};

/// Storage keys of timer lists share this prefix.
pub const TIMER_LIST_KEY_PREFIX: &str = "timerlist-";

/// All timers of one list on a card; persisted as a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerList {
    pub id: String,
    #[serde(default)]
    pub timers: Vec<Timer>,
}

impl TimerList {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            timers: Vec::new(),
        }
    }

    pub fn storage_key(id: &str) -> String {
        format!("{TIMER_LIST_KEY_PREFIX}{id}")
    }

    pub fn is_storage_key(key: &str) -> bool {
        key.starts_with(TIMER_LIST_KEY_PREFIX)
    }

    pub fn timer(&self, timer_id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == timer_id)
    }

    pub fn timer_mut(&mut self, timer_id: &str) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id == timer_id)
    }

    /// Replace the timer with the same id, or append it. Returns `true` when
    /// an existing timer was replaced.
    pub fn upsert_timer(&mut self, timer: Timer) -> bool {
        match self.timer_mut(&timer.id) {
            Some(existing) => {
                *existing = timer;
                true
            }
            None => {
                self.timers.push(timer);
                false
            }
        }
    }

    pub fn remove_timer(&mut self, timer_id: &str) -> Option<Timer> {
        let idx = self.timers.iter().position(|t| t.id == timer_id)?;
        Some(self.timers.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeTrack;

    fn timer(id: &str, title: &str) -> Timer {
        Timer::new(id.into(), title, TimeTrack::open(id.into(), "m", 1))
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut list = TimerList::new("l1");
        assert!(!list.upsert_timer(timer("t1", "A")));
        assert!(!list.upsert_timer(timer("t2", "B")));
        assert!(list.upsert_timer(timer("t1", "A2")));

        let titles: Vec<_> = list.timers.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["A2", "B"]);
    }

    #[test]
    fn remove_missing_timer_is_none() {
        let mut list = TimerList::new("l1");
        list.upsert_timer(timer("t1", "A"));
        assert!(list.remove_timer("nope").is_none());
        assert_eq!(list.remove_timer("t1").unwrap().title, "A");
        assert!(list.timers.is_empty());
    }

    #[test]
    fn storage_key_uses_prefix() {
        assert_eq!(TimerList::storage_key("l1"), "timerlist-l1");
        assert!(TimerList::is_storage_key("timerlist-l1"));
        assert!(!TimerList::is_storage_key("current-timer"));
    }
}
