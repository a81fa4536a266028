pub mod audit;
pub mod clock;
pub mod context;
pub mod export;
pub mod locale;
pub mod localize;
pub mod prompt;
pub mod tracker;

pub use tracker::{PointerState, RunningTimer, StopOutcome, TimeTracker};
