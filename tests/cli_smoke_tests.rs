mod common;

use std::path::Path;

use assert_cmd::Command;
use common::temp_base;
use predicates::prelude::*;
use predicates::str::contains;

fn cli(home: &Path, today: &str) -> Command {
    let mut cmd = Command::cargo_bin("finance_splitter_cli").expect("binary exists");
    cmd.env("FINANCE_SPLITTER_HOME", home)
        .env("FINANCE_SPLITTER_TODAY", today)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .env_remove("FINANCE_SPLITTER_DATABASE");
    cmd
}

#[test]
fn list_generates_then_reads_local_cache() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Bills (generated schedule)"))
        .stdout(contains("Electricity"))
        .stdout(contains("in 2 days"));

    cli(&home, "2026-01-17")
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Bills (local cache)"));
}

#[test]
fn summary_splits_the_settlement_month() {
    let home = temp_base();
    cli(&home, "2026-01-01")
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("Settlement month: January"))
        .stdout(contains("Total: £1573.00 across 4 bills"))
        .stdout(contains("£786.50"));
}

#[test]
fn toggle_marks_and_reports_payment() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .args(["toggle", "bill-rent-2026-02-01", "ire"])
        .assert()
        .success()
        .stdout(contains("marked paid for Ire"));

    cli(&home, "2026-01-17")
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Ire paid 2026-01-17"));
}

#[test]
fn toggle_unknown_bill_fails() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .args(["toggle", "bill-missing", "ebe"])
        .assert()
        .failure()
        .stderr(contains("Bill not found"));
}

#[test]
fn malformed_edit_leaves_data_unchanged() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .args(["edit", "bill-water-2026-02-01", "--amount", "abc"])
        .assert()
        .success()
        .stdout(contains("No changes made"));

    cli(&home, "2026-01-17")
        .args(["edit", "bill-water-2026-02-01", "--amount", "38.40"])
        .assert()
        .success()
        .stdout(contains("£38.40"));
}

#[test]
fn add_pay_pot_and_delete() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .args(["add", "Broadband", "0", "2026-02-05"])
        .assert()
        .success()
        .stdout(contains("No changes made"));

    cli(&home, "2026-01-17")
        .args(["add", "Broadband", "29.99", "2026-02-05"])
        .assert()
        .success()
        .stdout(contains("Added Broadband"));

    cli(&home, "2026-01-17")
        .args(["pay-pot", "ebe", "250"])
        .assert()
        .success()
        .stdout(contains("Ebe has contributed £250.00 of £2700.00"));

    cli(&home, "2026-01-17")
        .args(["delete", "bill-council-tax-2026-03-01"])
        .assert()
        .success();

    cli(&home, "2026-01-17")
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Broadband"))
        .stdout(contains("bill-council-tax-2026-03-01").not());
}

#[test]
fn config_database_connects_store() {
    let home = temp_base();
    let db = home.join("bills.db");
    cli(&home, "2026-01-17")
        .args(["config", "set-database"])
        .arg(&db)
        .assert()
        .success();

    cli(&home, "2026-01-17")
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Status   : connected"));

    cli(&home, "2026-01-17")
        .args(["config", "clear-database"])
        .assert()
        .success();

    cli(&home, "2026-01-17")
        .arg("status")
        .assert()
        .success()
        .stdout(contains("not connected"));
}

#[test]
fn unknown_command_prints_usage() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .arg("frobnicate")
        .assert()
        .failure()
        .stdout(contains("Available commands"));
}

#[test]
fn version_prints_build_metadata() {
    let home = temp_base();
    cli(&home, "2026-01-17")
        .arg("version")
        .assert()
        .success()
        .stdout(contains("Finance Splitter"))
        .stdout(contains("Build hash"));
}
