//! Diagnostics backend.
//!
//! The crate logs through the `log` macros; `tracing_subscriber` picks those
//! records up through its log bridge and writes them to stderr, so they never
//! mix with command output. `RUST_LOG` still overrides the computed level.

use log::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter as TraceLevel;

/// Same threshold expressed for the subscriber.
fn trace_level(level: LevelFilter) -> TraceLevel {
    match level {
        LevelFilter::Off => TraceLevel::OFF,
        LevelFilter::Error => TraceLevel::ERROR,
        LevelFilter::Warn => TraceLevel::WARN,
        LevelFilter::Info => TraceLevel::INFO,
        LevelFilter::Debug => TraceLevel::DEBUG,
        LevelFilter::Trace => TraceLevel::TRACE,
    }
}

fn filter_for(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(trace_level(level).into())
        .from_env_lossy()
}

/// Install the stderr subscriber. Only the first call takes effect.
pub fn init(level: LevelFilter) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        log::debug!("Logger already installed");
    }
}

/// Effective level: the configured one, raised by each `-v`.
pub fn level_for(configured: LevelFilter, verbose: u8) -> LevelFilter {
    LevelFilter::iter()
        .nth(configured as usize + verbose as usize)
        .unwrap_or(LevelFilter::Trace)
}
