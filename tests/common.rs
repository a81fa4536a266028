#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rtimetracker::core::TimeTracker;
use rtimetracker::core::clock::ManualClock;
use rtimetracker::core::context::Context;
use rtimetracker::core::prompt::{Alert, ConfirmRequest, Prompt};
use rtimetracker::storage::{HostBackend, MemoryHost, Storage, StorageBackend};
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

pub fn rtt() -> Command {
    cargo_bin_cmd!("rtimetracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimetracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Empty scratch directory inside the system temp dir
pub fn setup_test_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("{}_rtimetracker_dir", name));
    fs::remove_dir_all(&dir).ok();
    dir
}

/// `rtimetracker --db <db> --test --member m1 --card c1 <args>`
pub fn rtt_on(db_path: &str, args: &[&str]) -> Command {
    let mut cmd = rtt();
    cmd.args(["--db", db_path, "--test", "--member", "m1", "--card", "c1"])
        .args(args);
    cmd
}

/// Timer id from the `timer : <id>` line printed by `add`
pub fn added_timer_id(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .find_map(|l| l.trim().strip_prefix("timer :").map(|id| id.trim().to_string()))
        .unwrap_or_default()
}

/// Answers confirmations from a script and records every alert.
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    pub answer: bool,
    pub confirmations: Rc<RefCell<Vec<ConfirmRequest>>>,
    pub alerts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, request: &ConfirmRequest) -> bool {
        self.confirmations.borrow_mut().push(request.clone());
        self.answer
    }

    fn alert(&self, alert: &Alert) {
        self.alerts.borrow_mut().push(alert.message.clone());
    }
}

pub fn tracker_on<B: StorageBackend>(
    backend: B,
    member: &str,
    card: &str,
    clock: &ManualClock,
) -> TimeTracker<B> {
    TimeTracker::new(Storage::new(backend, Context::new(member).with_card(card)))
        .with_clock(clock.clone())
}

/// Tracker of `member` on card `c1` of a shared in-memory host
pub fn host_tracker(
    host: &MemoryHost,
    member: &str,
    clock: &ManualClock,
) -> TimeTracker<HostBackend<MemoryHost>> {
    tracker_on(HostBackend::new(host.clone()), member, "c1", clock)
}
