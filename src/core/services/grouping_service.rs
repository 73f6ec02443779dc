//! Groups bills by type and month for display, with urgency ordering.

use std::{cmp::Ordering, collections::BTreeMap, fmt};

use chrono::NaiveDate;

use crate::core::services::BalanceService;
use crate::domain::{Bill, BillKind, Person, DUE_SOON_WINDOW_DAYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementState {
    Paid,
    Partial,
    Unpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStatus {
    Overdue,
    Settled,
    DueSoon,
    Open,
}

/// Days remaining until the earliest bill of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Overdue,
    Today,
    InDays(i64),
}

impl Countdown {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => Countdown::Overdue,
            0 => Countdown::Today,
            d => Countdown::InDays(d),
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Overdue => f.write_str("overdue"),
            Countdown::Today => f.write_str("today"),
            Countdown::InDays(1) => f.write_str("in 1 day"),
            Countdown::InDays(days) => write!(f, "in {days} days"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonthGroup {
    /// `yyyy-MM`
    pub key: String,
    pub label: String,
    pub bills: Vec<Bill>,
    pub total: f64,
    pub share_per_person: f64,
    pub ire_state: SettlementState,
    pub ebe_state: SettlementState,
    pub status: MonthStatus,
}

impl MonthGroup {
    fn build(key: String, mut bills: Vec<Bill>, today: NaiveDate) -> Self {
        bills.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        let total: f64 = bills.iter().map(|bill| bill.total_amount).sum();
        let share_per_person = if total > 0.0 { total / 2.0 } else { 0.0 };
        let ire_state = settlement_state(&bills, Person::Ire);
        let ebe_state = settlement_state(&bills, Person::Ebe);
        let label = bills
            .first()
            .map(|bill| bill.due_date.format("%B %Y").to_string())
            .unwrap_or_else(|| key.clone());

        let all_settled =
            ire_state == SettlementState::Paid && ebe_state == SettlementState::Paid;
        let latest_due = bills.iter().map(|bill| bill.due_date).max();
        let status = match latest_due {
            Some(latest) if BalanceService::is_overdue(latest, today) && !all_settled => {
                MonthStatus::Overdue
            }
            _ if all_settled => MonthStatus::Settled,
            Some(latest) if within_due_soon((latest - today).num_days()) => MonthStatus::DueSoon,
            _ => MonthStatus::Open,
        };

        Self {
            key,
            label,
            bills,
            total,
            share_per_person,
            ire_state,
            ebe_state,
            status,
        }
    }

    pub fn state(&self, person: Person) -> SettlementState {
        match person {
            Person::Ire => self.ire_state,
            Person::Ebe => self.ebe_state,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BillGroup {
    pub name: String,
    pub kind: Option<BillKind>,
    pub months: Vec<MonthGroup>,
    /// Total of the earliest month only.
    pub next_total: f64,
    pub next_count: usize,
    pub countdown: Option<Countdown>,
    pub has_due_soon: bool,
    earliest_due: Option<NaiveDate>,
}

impl BillGroup {
    pub fn earliest_due(&self) -> Option<NaiveDate> {
        self.earliest_due
    }
}

pub struct GroupingService;

impl GroupingService {
    /// Groups bills by name then month. Known kinds come first, with groups that
    /// hold an unsettled bill due soon leading and the rest ordered by their
    /// earliest due date; custom names follow alphabetically.
    pub fn group(bills: &[Bill], today: NaiveDate) -> Vec<BillGroup> {
        let mut by_name: BTreeMap<String, BTreeMap<String, Vec<Bill>>> = BTreeMap::new();
        for bill in bills {
            by_name
                .entry(bill.name.clone())
                .or_default()
                .entry(bill.due_date.format("%Y-%m").to_string())
                .or_default()
                .push(bill.clone());
        }

        let mut known = Vec::new();
        for kind in BillKind::ALL {
            if let Some(months) = by_name.remove(kind.label()) {
                known.push(build_group(kind.label().to_string(), Some(kind), months, today));
            }
        }
        known.sort_by(compare_groups);

        let custom = by_name
            .into_iter()
            .map(|(name, months)| build_group(name, None, months, today));

        known.into_iter().chain(custom).collect()
    }
}

fn build_group(
    name: String,
    kind: Option<BillKind>,
    months: BTreeMap<String, Vec<Bill>>,
    today: NaiveDate,
) -> BillGroup {
    let months: Vec<MonthGroup> = months
        .into_iter()
        .map(|(key, bills)| MonthGroup::build(key, bills, today))
        .collect();

    let all_bills = months.iter().flat_map(|month| month.bills.iter());
    let earliest_due = all_bills.clone().map(|bill| bill.due_date).min();
    let has_due_soon = all_bills
        .clone()
        .any(|bill| within_due_soon(bill.days_until_due(today)) && !bill.is_fully_settled());

    let next = months.first();
    let next_total = next.map(|month| month.total).unwrap_or(0.0);
    let next_count = next.map(|month| month.bills.len()).unwrap_or(0);
    let countdown = match kind {
        Some(BillKind::Water) => None,
        _ => next
            .and_then(|month| month.bills.first())
            .map(|bill| Countdown::from_days(bill.days_until_due(today))),
    };

    BillGroup {
        name,
        kind,
        months,
        next_total,
        next_count,
        countdown,
        has_due_soon,
        earliest_due,
    }
}

fn compare_groups(a: &BillGroup, b: &BillGroup) -> Ordering {
    b.has_due_soon
        .cmp(&a.has_due_soon)
        .then_with(|| a.earliest_due.cmp(&b.earliest_due))
}

fn within_due_soon(days: i64) -> bool {
    (0..=DUE_SOON_WINDOW_DAYS).contains(&days)
}

fn settlement_state(bills: &[Bill], person: Person) -> SettlementState {
    let settled = bills.iter().filter(|bill| bill.settled_by(person)).count();
    match settled {
        0 => SettlementState::Unpaid,
        n if n == bills.len() => SettlementState::Paid,
        _ => SettlementState::Partial,
    }
}
