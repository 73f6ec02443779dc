mod common;

use std::{fs, time::Duration};

use common::{date, gateway_at, temp_base};
use finance_splitter::{
    config::Config,
    core::services::BillService,
    domain::Person,
    storage::{
        BillSource, BillStore, DatabaseState, JsonBillCache, SqliteBillStore, StoreStatus,
        DEFAULT_CACHE_KEY,
    },
};

#[test]
fn local_only_generates_then_reads_cache() {
    let base = temp_base();
    let today = date(2026, 4, 2);
    let gateway = gateway_at(&base, &Config::default(), today);

    let first = gateway.list();
    assert_eq!(first.source, BillSource::Generated);
    assert_eq!(first.remote, StoreStatus::NotConnected);
    assert!(base.join("cache").join("finance-splitter-bills.json").exists());

    let reopened = gateway_at(&base, &Config::default(), today);
    let second = reopened.list();
    assert_eq!(second.source, BillSource::LocalCache);
    assert_eq!(second.bills, first.bills);
}

#[test]
fn database_is_seeded_and_mirrored_locally() {
    let base = temp_base();
    let config = Config {
        database_path: Some(base.join("db").join("bills.db")),
        ..Config::default()
    };
    let today = date(2026, 4, 2);
    let gateway = gateway_at(&base, &config, today);
    assert!(gateway.has_remote());

    let seeded = gateway.list();
    assert_eq!(seeded.source, BillSource::Generated);
    assert_eq!(seeded.remote, StoreStatus::Connected);

    let remote = SqliteBillStore::open(&base.join("db").join("bills.db"), Duration::from_secs(1))
        .unwrap();
    assert_eq!(remote.list().unwrap().len(), seeded.bills.len());
    let local = JsonBillCache::new(base.join("cache"), DEFAULT_CACHE_KEY).unwrap();
    assert_eq!(local.list().unwrap().len(), seeded.bills.len());

    let again = gateway.list();
    assert_eq!(again.source, BillSource::Remote);

    let report = gateway.status();
    assert_eq!(report.status, StoreStatus::Connected);
    assert_eq!(report.database, DatabaseState::Available);
    assert_eq!(report.bills_count, seeded.bills.len());
}

#[test]
fn unreadable_database_falls_back_to_local_cache() {
    let base = temp_base();
    let db_path = base.join("broken.db");
    fs::write(&db_path, "this is not a sqlite database, just some text padding it out").unwrap();
    let config = Config {
        database_path: Some(db_path),
        ..Config::default()
    };
    let today = date(2026, 4, 2);

    let gateway = gateway_at(&base, &config, today);
    assert!(!gateway.has_remote());
    let outcome = gateway.list();
    assert_eq!(outcome.source, BillSource::Generated);
    assert_eq!(outcome.remote, StoreStatus::NotConnected);

    let report = gateway.status();
    assert_eq!(report.status, StoreStatus::NotConnected);
    assert_eq!(report.database, DatabaseState::Unavailable);
    assert!(report.message.starts_with("Database unavailable"));
    assert_eq!(report.bills_count, outcome.bills.len());
}

#[test]
fn payments_survive_reload_through_both_stores() {
    let base = temp_base();
    let config = Config {
        database_path: Some(base.join("bills.db")),
        ..Config::default()
    };
    let today = date(2026, 4, 2);
    let gateway = gateway_at(&base, &config, today);
    gateway.list();

    let bill = BillService::toggle(&gateway, "bill-rent-2026-05-01", Person::Ire).unwrap();
    assert_eq!(bill.ire_paid_date, Some(today));

    let reopened = gateway_at(&base, &config, today);
    let stored = BillService::find(&reopened, "bill-rent-2026-05-01").unwrap();
    assert!(stored.ire_paid);

    let local_only = gateway_at(&base, &Config::default(), today);
    let cached = BillService::find(&local_only, "bill-rent-2026-05-01").unwrap();
    assert!(cached.ire_paid);
}

#[test]
fn reset_then_regenerate_restores_schedule() {
    let base = temp_base();
    let today = date(2026, 4, 2);
    let gateway = gateway_at(&base, &Config::default(), today);
    let initial = gateway.list().bills.len();

    gateway.delete("bill-water-2026-06-01").unwrap();
    assert_eq!(gateway.list().bills.len(), initial - 1);

    gateway.reset_local().unwrap();
    assert_eq!(gateway.regenerate().len(), initial);
    assert_eq!(gateway.list().source, BillSource::LocalCache);
}
