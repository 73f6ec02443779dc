use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::debug;

use crate::domain::{Bill, BillKind, Person};

/// Zero-based month index after which the schedule targets next year.
pub const ROLLOVER_MONTH_INDEX: u32 = 9;

const FLAT_BILL_LAST_MONTH: u32 = 10;
const ELECTRICITY_LAST_MONTH: u32 = 12;
const FLAT_BILL_DAY: u32 = 1;
const ELECTRICITY_DAY: u32 = 19;
const POT_DUE_MONTH: u32 = 10;
const POT_DUE_DAY: u32 = 31;

/// Monthly recurrence for one bill kind inside the target year.
#[derive(Debug, Clone, Copy)]
struct MonthlyPlan {
    kind: BillKind,
    day: u32,
    last_month: u32,
}

const MONTHLY_PLANS: [MonthlyPlan; 4] = [
    MonthlyPlan {
        kind: BillKind::Rent,
        day: FLAT_BILL_DAY,
        last_month: FLAT_BILL_LAST_MONTH,
    },
    MonthlyPlan {
        kind: BillKind::CouncilTax,
        day: FLAT_BILL_DAY,
        last_month: FLAT_BILL_LAST_MONTH,
    },
    MonthlyPlan {
        kind: BillKind::Water,
        day: FLAT_BILL_DAY,
        last_month: FLAT_BILL_LAST_MONTH,
    },
    MonthlyPlan {
        kind: BillKind::Electricity,
        day: ELECTRICITY_DAY,
        last_month: ELECTRICITY_LAST_MONTH,
    },
];

/// Year the schedule covers: November and December roll forward.
pub fn target_year(today: NaiveDate) -> i32 {
    if today.month0() > ROLLOVER_MONTH_INDEX {
        today.year() + 1
    } else {
        today.year()
    }
}

/// Produces the full bill schedule for the fiscal window containing `today`.
///
/// The result depends only on `today`: ids come from kind and due date, and
/// `created_at` counts up from the reference date's midnight so that two runs
/// on the same day yield identical records.
pub fn generate_schedule(today: NaiveDate) -> Vec<Bill> {
    let year = target_year(today);
    let mut emitter = Emitter::new(today);

    for plan in MONTHLY_PLANS {
        if plan.kind == BillKind::Electricity && year > today.year() && today.month() == 12 {
            // December of the current year is still in progress after rolling over.
            if let Some(due) = NaiveDate::from_ymd_opt(today.year(), 12, plan.day) {
                emitter.push(plan.kind, due);
            }
        }
        for month in 1..=plan.last_month {
            if let Some(due) = NaiveDate::from_ymd_opt(year, month, plan.day) {
                emitter.push(plan.kind, due);
            }
        }
    }

    if let Some(due) = NaiveDate::from_ymd_opt(year, POT_DUE_MONTH, POT_DUE_DAY) {
        emitter.push(BillKind::CreditCardPot, due);
    }

    debug!(
        target_year = year,
        bills = emitter.bills.len(),
        "generated bill schedule"
    );
    emitter.bills
}

/// Appends generated bills that are missing from `existing`, keyed by id.
/// Existing records win, so payment state survives regeneration.
pub fn merge_by_id(existing: &[Bill], generated: Vec<Bill>) -> Vec<Bill> {
    let mut merged = existing.to_vec();
    for bill in generated {
        if !merged.iter().any(|current| current.id == bill.id) {
            merged.push(bill);
        }
    }
    merged
}

struct Emitter {
    base_millis: i64,
    bills: Vec<Bill>,
}

impl Emitter {
    fn new(today: NaiveDate) -> Self {
        let base_millis = today
            .and_hms_opt(0, 0, 0)
            .map(|midnight| DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc))
            .map(|moment| moment.timestamp_millis())
            .unwrap_or_default();
        Self {
            base_millis,
            bills: Vec::new(),
        }
    }

    fn push(&mut self, kind: BillKind, due_date: NaiveDate) {
        let created_at = self.base_millis + self.bills.len() as i64;
        let mut bill = Bill::new(
            kind.bill_id(due_date),
            kind.label(),
            kind.default_amount(),
            due_date,
            created_at,
        );
        if kind.is_pot() {
            for person in Person::BOTH {
                bill.set_paid_amount(person, 0.0);
            }
        }
        self.bills.push(bill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due_dates(bills: &[Bill], kind: BillKind) -> Vec<NaiveDate> {
        bills
            .iter()
            .filter(|bill| bill.kind() == Some(kind))
            .map(|bill| bill.due_date)
            .collect()
    }

    #[test]
    fn october_does_not_roll_but_november_does() {
        assert_eq!(target_year(date(2026, 10, 31)), 2026);
        assert_eq!(target_year(date(2026, 11, 1)), 2027);
        assert_eq!(target_year(date(2026, 12, 31)), 2027);
        assert_eq!(target_year(date(2026, 1, 1)), 2026);
    }

    #[test]
    fn mid_year_schedule_has_expected_counts() {
        let bills = generate_schedule(date(2026, 5, 14));
        assert_eq!(due_dates(&bills, BillKind::Rent).len(), 10);
        assert_eq!(due_dates(&bills, BillKind::CouncilTax).len(), 10);
        assert_eq!(due_dates(&bills, BillKind::Water).len(), 10);
        assert_eq!(due_dates(&bills, BillKind::Electricity).len(), 12);
        assert_eq!(due_dates(&bills, BillKind::CreditCardPot), vec![date(2026, 10, 31)]);
        assert_eq!(bills.len(), 43);
    }

    #[test]
    fn december_emits_previous_december_electricity_first() {
        let bills = generate_schedule(date(2025, 12, 5));
        let electricity = due_dates(&bills, BillKind::Electricity);
        assert_eq!(electricity.len(), 13);
        assert_eq!(electricity[0], date(2025, 12, 19));
        assert_eq!(electricity[1], date(2026, 1, 19));
        assert_eq!(electricity[12], date(2026, 12, 19));
    }

    #[test]
    fn november_has_no_extra_electricity() {
        let bills = generate_schedule(date(2025, 11, 20));
        let electricity = due_dates(&bills, BillKind::Electricity);
        assert_eq!(electricity.len(), 12);
        assert!(electricity.iter().all(|due| due.year() == 2026));
    }

    #[test]
    fn created_at_is_strictly_increasing() {
        let bills = generate_schedule(date(2026, 3, 3));
        assert!(bills.windows(2).all(|pair| pair[0].created_at < pair[1].created_at));
    }

    #[test]
    fn merge_keeps_existing_records() {
        let today = date(2026, 2, 1);
        let mut existing = generate_schedule(today);
        existing[0].set_paid(Person::Ire, true, today);
        let merged = merge_by_id(&existing, generate_schedule(today));
        assert_eq!(merged.len(), existing.len());
        assert!(merged[0].ire_paid);
    }
}
