use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{added_timer_id, rtt, rtt_on, setup_test_db, setup_test_dir};

fn init(db_path: &str) {
    rtt()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));
}

fn add(db_path: &str, list: &str, title: &str) -> String {
    let out = rtt_on(db_path, &["add", list, title])
        .assert()
        .success()
        .stdout(contains(format!("Timer \"{title}\" started.")))
        .get_output()
        .stdout
        .clone();
    let id = added_timer_id(&out);
    assert!(id.ends_with("-m1"), "unexpected timer id {id:?}");
    id
}

#[test]
fn test_add_status_stop_cycle() {
    let db_path = setup_test_db("cli_cycle");
    init(&db_path);

    add(&db_path, "list1", "Design");

    rtt_on(&db_path, &["status"])
        .assert()
        .success()
        .stdout(contains("Design"))
        .stdout(contains("list1"));

    rtt_on(&db_path, &["stop"])
        .assert()
        .success()
        .stdout(contains("Timer stopped after"));

    rtt_on(&db_path, &["stop"])
        .assert()
        .success()
        .stdout(contains("No timer is running."));

    rtt_on(&db_path, &["status"])
        .assert()
        .success()
        .stdout(contains("No timer is running."));
}

#[test]
fn test_start_existing_timer_and_list() {
    let db_path = setup_test_db("cli_start");
    init(&db_path);

    let id = add(&db_path, "list1", "Design");
    rtt_on(&db_path, &["stop"]).assert().success();

    rtt_on(&db_path, &["start", "list1", &id])
        .assert()
        .success()
        .stdout(contains("Timer \"Design\" started."));

    rtt_on(&db_path, &["list", "list1"])
        .assert()
        .success()
        .stdout(contains("Timer list list1"))
        .stdout(contains(id.as_str()))
        .stdout(contains("▶"));

    rtt_on(&db_path, &["lists"])
        .assert()
        .success()
        .stdout(contains("list1"));
}

#[test]
fn test_start_unknown_timer_fails() {
    let db_path = setup_test_db("cli_start_unknown");
    init(&db_path);
    add(&db_path, "list1", "Design");

    rtt_on(&db_path, &["start", "list1", "nope"])
        .assert()
        .failure()
        .stderr(contains("Could not start timer. Timer not found."));

    rtt_on(&db_path, &["start", "missing", "nope"])
        .assert()
        .failure()
        .stderr(contains("TimerList not found"));
}

#[test]
fn test_add_without_card_fails() {
    let db_path = setup_test_db("cli_no_card");
    init(&db_path);

    rtt()
        .args(["--db", &db_path, "--test", "--member", "m1", "add", "list1", "X"])
        .assert()
        .failure()
        .stderr(contains("No card selected"));
}

#[test]
fn test_delete_asks_for_confirmation() {
    let db_path = setup_test_db("cli_delete");
    init(&db_path);
    let id = add(&db_path, "list1", "Design");

    rtt_on(&db_path, &["del", "list1", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Delete timer"))
        .stdout(contains("Operation cancelled."));

    rtt_on(&db_path, &["status"])
        .assert()
        .success()
        .stdout(contains("Design"));

    rtt_on(&db_path, &["del", "list1", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Timer deleted."));

    rtt_on(&db_path, &["status"])
        .assert()
        .success()
        .stdout(contains("No timer is running."));

    rtt_on(&db_path, &["list", "list1"])
        .assert()
        .success()
        .stdout(contains("(no timers)"));
}

#[test]
fn test_delete_with_yes_skips_prompt() {
    let db_path = setup_test_db("cli_delete_yes");
    init(&db_path);
    let id = add(&db_path, "list1", "Design");

    rtt_on(&db_path, &["del", "list1", &id, "--yes"])
        .assert()
        .success()
        .stdout(contains("Timer deleted.").and(contains("Delete timer").not()));

    rtt_on(&db_path, &["del", "list1", &id, "--yes"])
        .assert()
        .failure()
        .stderr(contains("Could not delete timer. Timer not found."));
}

#[test]
fn test_export_csv_and_json() {
    let db_path = setup_test_db("cli_export");
    init(&db_path);
    add(&db_path, "list1", "Design, review");
    rtt_on(&db_path, &["stop"]).assert().success();

    rtt_on(&db_path, &["export", "--format", "csv"])
        .assert()
        .success()
        .stdout(contains(
            "list,timer,title,track,member,start,end,duration_minutes",
        ))
        .stdout(contains("\"Design, review\""));

    let out_dir = setup_test_dir("cli_export_out");
    fs::create_dir_all(&out_dir).unwrap();
    let out_file = out_dir.join("tracks.json");
    let out_path = out_file.to_string_lossy().to_string();

    rtt_on(&db_path, &["export", "--format", "json", "--output", &out_path])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_file).unwrap()).unwrap();
    assert_eq!(parsed[0]["list"], "list1");
    assert_eq!(parsed[0]["member"], "m1");
    assert_ne!(parsed[0]["end"], "");
}

#[test]
fn test_host_dir_keeps_data_in_shared_document() {
    let db_path = setup_test_db("cli_host");
    let host_dir = setup_test_dir("cli_host");
    let host = host_dir.to_string_lossy().to_string();
    init(&db_path);

    rtt_on(&db_path, &["--host-dir", &host, "add", "list1", "Shared"])
        .assert()
        .success();

    let doc = fs::read_to_string(host_dir.join("plugindata.json")).unwrap();
    assert!(doc.contains("timerlist-list1"));
    assert!(doc.contains("current-timer"));

    // A second member sees the list but has no running timer.
    rtt()
        .args([
            "--db", &db_path, "--test", "--member", "m2", "--card", "c1", "--host-dir", &host,
            "status",
        ])
        .assert()
        .success()
        .stdout(contains("No timer is running."));

    // Without the host directory the local store is empty.
    rtt_on(&db_path, &["lists"])
        .assert()
        .success()
        .stdout(contains("No timer lists on this card."));
}

#[test]
fn test_log_print_shows_operations() {
    let db_path = setup_test_db("cli_log");
    init(&db_path);
    add(&db_path, "list1", "Design");

    rtt()
        .args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("Internal log"))
        .stdout(contains("migration_applied"))
        .stdout(contains("(list1)"));
}

#[test]
fn test_locale_prints_dictionary() {
    rtt()
        .args(["--test", "locale", "de"])
        .assert()
        .success()
        .stdout(contains("Timer löschen"));

    rtt()
        .args(["--test", "locale", "fr"])
        .assert()
        .success()
        .stdout(contains("\"Delete timer\": \"Delete timer\""));
}

#[test]
fn test_new_list_then_lists() {
    let db_path = setup_test_db("cli_new_list");
    init(&db_path);

    rtt_on(&db_path, &["new-list"])
        .assert()
        .success()
        .stdout(contains("Timer list").and(contains("-m1 created.")));

    rtt_on(&db_path, &["lists"])
        .assert()
        .success()
        .stdout(contains("-m1"))
        .stdout(contains("0s"));
}
