mod common;

use common::date;
use finance_splitter::{
    core::services::{BalanceService, BillService},
    domain::{Bill, Person, POT_BILL_ID},
};

#[test]
fn rent_and_council_tax_split_evenly() {
    let today = date(2026, 1, 1);
    let bills = vec![
        Bill::new("bill-rent-2026-01-01", "Rent", 1420.0, today, 0),
        Bill::new("bill-council-tax-2026-01-01", "Council Tax", 153.0, today, 1),
    ];
    let summary = BalanceService::summarize(&bills, today);
    assert_eq!(summary.total_amount, 1573.0);
    assert_eq!(summary.total_bills, 2);
    assert_eq!(summary.ire_outstanding, 786.5);
    assert_eq!(summary.ebe_outstanding, 786.5);
    assert_eq!(summary.ire_paid_total, 0.0);
    assert_eq!(summary.unpaid_bills, 2);
    assert_eq!(summary.overdue_bills, 0);
}

#[test]
fn due_soon_counts_as_unpaid_and_past_due_counts_as_overdue() {
    let today = date(2026, 2, 10);
    let soon = vec![Bill::new("a", "Rent", 100.0, date(2026, 2, 13), 0)];
    let summary = BalanceService::summarize(&soon, today);
    assert_eq!((summary.unpaid_bills, summary.overdue_bills), (1, 0));

    let late = vec![Bill::new("b", "Rent", 100.0, date(2026, 2, 9), 0)];
    let summary = BalanceService::summarize(&late, today);
    assert_eq!((summary.unpaid_bills, summary.overdue_bills), (1, 1));

    let later = vec![Bill::new("c", "Rent", 100.0, date(2026, 2, 14), 0)];
    let summary = BalanceService::summarize(&later, today);
    assert_eq!((summary.unpaid_bills, summary.overdue_bills), (0, 0));
}

#[test]
fn paying_moves_a_share_from_outstanding_to_paid() {
    let today = date(2026, 1, 1);
    let mut rent = Bill::new("r", "Rent", 1420.0, today, 0);
    BillService::toggle_payment(&mut rent, Person::Ebe, today);
    let summary = BalanceService::summarize(std::slice::from_ref(&rent), today);
    assert_eq!(summary.ebe_paid_total, 710.0);
    assert_eq!(summary.ebe_outstanding, 0.0);
    assert_eq!(summary.ire_outstanding, 710.0);
    assert_eq!(summary.unpaid_bills, 1);

    BillService::toggle_payment(&mut rent, Person::Ire, today);
    let summary = BalanceService::summarize(std::slice::from_ref(&rent), today);
    assert_eq!(summary.unpaid_bills, 0);
}

#[test]
fn pot_uses_cumulative_contributions() {
    let today = date(2026, 10, 1);
    let mut pot = Bill::new(POT_BILL_ID, "Credit Card Pot", 5400.0, date(2026, 10, 31), 0);
    BillService::record_pot_payment(&mut pot, Person::Ire, 1000.0).unwrap();
    BillService::record_pot_payment(&mut pot, Person::Ebe, 3000.0).unwrap();

    let summary = BalanceService::summarize(std::slice::from_ref(&pot), today);
    assert_eq!(summary.total_amount, 5400.0);
    assert_eq!(summary.ire_paid_total, 1000.0);
    assert_eq!(summary.ire_outstanding, 1700.0);
    assert_eq!(summary.ebe_paid_total, 3000.0);
    assert_eq!(summary.ebe_outstanding, 0.0);
}

#[test]
fn only_the_earliest_month_is_summarized() {
    let today = date(2026, 1, 1);
    let bills = vec![
        Bill::new("feb", "Rent", 1420.0, date(2026, 2, 1), 1),
        Bill::new("jan", "Water", 40.0, date(2026, 1, 1), 0),
    ];
    let summary = BalanceService::summarize(&bills, today);
    assert_eq!(summary.total_bills, 1);
    assert_eq!(summary.total_amount, 40.0);

    let months = BalanceService::month_names(&bills).unwrap();
    assert_eq!(months.current, "January");
    assert_eq!(months.next.as_deref(), Some("February"));
}
