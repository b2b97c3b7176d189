mod common;

use std::process;

use common::{FakeTools, LISTING};
use predicates::prelude::*;

/// Valid as a PID but above any kernel pid_max.
const ABSENT_PID: &str = "2147483646";

#[test]
fn test_kill_missing_process() {
    let tools = FakeTools::with_listing(LISTING);
    tools
        .cmd()
        .args(["-k", ABSENT_PID, "-y"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("was not found"));
}

#[test]
fn test_kill_report_as_json() {
    let tools = FakeTools::with_listing(LISTING);
    let output = tools
        .cmd()
        .args(["-K", ABSENT_PID, "-y", "--json"])
        .assert()
        .code(3)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["outcome"], "not_found");
    assert!(value["message"].as_str().unwrap().contains(ABSENT_PID));
}

#[test]
fn test_kill_lists_affected_ports() {
    let tools = FakeTools::with_listing(LISTING);
    tools
        .cmd()
        .args(["-k", "100"])
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PID 100 holds ports: 80, 443"))
        .stderr(predicate::str::contains("Aborted."));
}

#[test]
fn test_kill_declined_on_empty_answer() {
    let tools = FakeTools::with_listing(LISTING);
    tools
        .cmd()
        .args(["-k", ABSENT_PID])
        .write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_kill_without_lsof_still_signals() {
    let tools = FakeTools::failing(9, "broken");
    tools
        .cmd()
        .args(["-k", ABSENT_PID, "-y"])
        .assert()
        .code(3);
}

#[test]
fn test_terminate_child_process() {
    let mut child = process::Command::new("sleep").arg("30").spawn().unwrap();
    let pid = child.id().to_string();

    let tools = FakeTools::with_listing(LISTING);
    tools
        .cmd()
        .args(["-k", &pid, "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Sent SIGTERM to process {}.", pid)));

    let status = child.wait().unwrap();
    assert!(!status.success());
}
