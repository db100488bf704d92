use assert_cmd::Command;
use chrono::{Days, Local};
use predicates::prelude::*;
use std::path::Path;

fn servicedue(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("servicedue").unwrap();
    cmd.env("SERVICEDUE_HOME", home)
        .env_remove("SERVICEDUE_SHARED_DIR")
        .env("NO_COLOR", "1");
    cmd
}

fn widget(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("servicedue-widget").unwrap();
    cmd.env("SERVICEDUE_HOME", home)
        .env_remove("SERVICEDUE_SHARED_DIR")
        .env("NO_COLOR", "1");
    cmd
}

fn in_days(days: u64) -> String {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

fn add_civic(home: &Path) {
    servicedue(home)
        .args(["car", "add", "Civic", "--odometer", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Car added: Civic"));
}

#[test]
fn test_car_add_and_list() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["car", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Civic"))
        .stdout(predicate::str::contains("10000 km"));
}

#[test]
fn test_add_and_list_reminders() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["add", "civic", "Insurance", "--type", "insurance", "--due"])
        .arg(in_days(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminder created: Insurance"));

    servicedue(temp_dir.path())
        .args(["add", "Civic", "Oil change", "-t", "oil-change", "--due-km", "9500"])
        .assert()
        .success();

    // Overdue by distance sorts after the dated reminder
    servicedue(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Civic"))
        .stdout(predicate::str::contains("in 30 days"))
        .stdout(predicate::str::contains("500 km over"));
}

#[test]
fn test_complete_recurring_creates_successor() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args([
            "add",
            "Civic",
            "Oil change",
            "--due-km",
            "15000",
            "--every-km",
            "5000",
        ])
        .assert()
        .success();

    servicedue(temp_dir.path())
        .args(["complete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: Oil change"))
        .stdout(predicate::str::contains("20000"));

    servicedue(temp_dir.path())
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in 10000 km"))
        .stdout(predicate::str::contains("done"));
}

#[test]
fn test_complete_unknown_index_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["complete", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active reminder at index 3"));
}

#[test]
fn test_fuel_crossing_threshold_warns() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["add", "Civic", "Oil change", "--due-km", "10500"])
        .assert()
        .success();

    servicedue(temp_dir.path())
        .args(["fuel", "Civic", "-o", "10600", "-l", "40", "-p", "1.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fuel recorded"))
        .stdout(predicate::str::contains("Now due: Oil change"));

    servicedue(temp_dir.path())
        .args(["car", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10600 km"));
}

#[test]
fn test_odometer_cannot_go_backwards() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["odometer", "Civic", "9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the current odometer"));
}

#[test]
fn test_alerts_follow_reminders() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["add", "Civic", "Registration", "--notify-days", "7", "--due"])
        .arg(in_days(60))
        .assert()
        .success();

    servicedue(temp_dir.path())
        .arg("alerts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registration"))
        .stdout(predicate::str::contains(in_days(53)));

    servicedue(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .success();

    servicedue(temp_dir.path())
        .arg("alerts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No alerts scheduled"));
}

#[test]
fn test_denied_notifications_notice_once() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["config", "notifications", "off"])
        .assert()
        .success();

    servicedue(temp_dir.path())
        .args(["add", "Civic", "Insurance", "--due"])
        .arg(in_days(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Notifications are disabled"));

    servicedue(temp_dir.path())
        .args(["add", "Civic", "Tires", "--due"])
        .arg(in_days(40))
        .assert()
        .success()
        .stdout(predicate::str::contains("Notifications are disabled").not());
}

#[test]
fn test_config_show_and_set() {
    let temp_dir = tempfile::tempdir().unwrap();

    servicedue(temp_dir.path())
        .args(["config", "alert-hour", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alert-hour set to 7"));

    servicedue(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("alert-hour = 7"))
        .stdout(predicate::str::contains("upcoming-limit = 5"));

    servicedue(temp_dir.path())
        .args(["config", "alert-hour", "31"])
        .assert()
        .failure();
}

#[test]
fn test_widget_placeholder_without_snapshot() {
    let temp_dir = tempfile::tempdir().unwrap();

    widget(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("sample data"))
        .stdout(predicate::str::contains("My Car"))
        .stdout(predicate::str::contains("Insurance renewal"));
}

#[test]
fn test_widget_placeholder_on_corrupt_snapshot() {
    let temp_dir = tempfile::tempdir().unwrap();
    let shared = temp_dir.path().join("shared");
    std::fs::create_dir_all(&shared).unwrap();
    std::fs::write(shared.join("widget-snapshot.json"), "{ not json").unwrap();

    widget(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("My Car"));
}

#[test]
fn test_widget_shows_published_snapshot() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());

    servicedue(temp_dir.path())
        .args(["add", "Civic", "Brake service", "--due"])
        .arg(in_days(10))
        .assert()
        .success();

    widget(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Brake service"))
        .stdout(predicate::str::contains("Civic"))
        .stdout(predicate::str::contains("sample data").not());

    widget(temp_dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"upcomingReminders\""))
        .stdout(predicate::str::contains("\"version\": 1"));
}

#[test]
fn test_sync_rebuilds_snapshot() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_civic(temp_dir.path());
    servicedue(temp_dir.path())
        .args(["add", "Civic", "Inspection", "--due"])
        .arg(in_days(20))
        .assert()
        .success();

    std::fs::remove_file(temp_dir.path().join("shared").join("widget-snapshot.json")).unwrap();

    servicedue(temp_dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 reminders"));

    widget(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspection"));
}
