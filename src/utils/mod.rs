pub mod table;
pub mod time;

pub use table::Table;
pub use time::{format_duration, format_local, format_ts};
