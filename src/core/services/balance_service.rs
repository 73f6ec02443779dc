use chrono::{Datelike, NaiveDate};

use crate::domain::{Bill, BillSummary, Person, Urgency};

/// Names of the settlement month and the following month that has bills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNames {
    pub current: String,
    pub next: Option<String>,
}

pub struct BalanceService;

impl BalanceService {
    /// Bills due in the calendar month of the earliest due date.
    pub fn settlement_month_bills(bills: &[Bill]) -> Vec<&Bill> {
        let Some(earliest) = earliest_due(bills) else {
            return Vec::new();
        };
        bills
            .iter()
            .filter(|bill| same_month(bill.due_date, earliest))
            .collect()
    }

    /// Per-person paid and outstanding totals for the settlement month.
    pub fn summarize(bills: &[Bill], today: NaiveDate) -> BillSummary {
        let window = Self::settlement_month_bills(bills);
        let mut summary = BillSummary {
            total_bills: window.len(),
            ..BillSummary::default()
        };

        for bill in window {
            summary.total_amount += bill.total_amount;

            let urgency = Urgency::classify(bill.due_date, today);
            let settled = bill.is_fully_settled();
            if urgency.is_urgent() && !settled {
                summary.unpaid_bills += 1;
            }
            if urgency == Urgency::Overdue && !settled {
                summary.overdue_bills += 1;
            }

            for person in Person::BOTH {
                if bill.is_pot() {
                    let paid = bill.paid_amount(person);
                    summary.accrue_paid(person, paid);
                    summary.accrue_outstanding(person, (bill.share() - paid).max(0.0));
                } else if bill.paid(person) {
                    summary.accrue_paid(person, bill.share());
                } else {
                    summary.accrue_outstanding(person, bill.share());
                }
            }
        }

        summary
    }

    pub fn month_names(bills: &[Bill]) -> Option<MonthNames> {
        let earliest = earliest_due(bills)?;
        let current = earliest.format("%B").to_string();
        let next = bills
            .iter()
            .map(|bill| bill.due_date)
            .filter(|due| month_index(*due) > month_index(earliest))
            .min()
            .map(|due| due.format("%B").to_string());
        Some(MonthNames { current, next })
    }

    pub fn is_overdue(due_date: NaiveDate, today: NaiveDate) -> bool {
        due_date < today
    }
}

fn earliest_due(bills: &[Bill]) -> Option<NaiveDate> {
    bills.iter().map(|bill| bill.due_date).min()
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    month_index(a) == month_index(b)
}
