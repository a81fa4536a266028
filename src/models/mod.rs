pub mod current_timer;
pub mod time_track;
pub mod timer;
pub mod timer_list;

/// Datetime in milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub use current_timer::CurrentUserTimer;
pub use time_track::TimeTrack;
pub use timer::Timer;
pub use timer_list::TimerList;
