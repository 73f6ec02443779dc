//! Plain-text views of bills, groups, and balances.

use colored::Colorize;

use crate::{
    core::services::{BillGroup, MonthGroup, MonthNames, MonthStatus, SettlementState},
    domain::{Bill, BillSummary, Person, DUE_SOON_WINDOW_DAYS},
    storage::{BillSource, DatabaseState, StoreStatus, StoreStatusReport},
};

pub fn money(amount: f64) -> String {
    format!("£{amount:.2}")
}

pub fn source_label(source: BillSource) -> &'static str {
    match source {
        BillSource::Remote => "database",
        BillSource::LocalCache => "local cache",
        BillSource::Generated => "generated schedule",
    }
}

fn settlement_label(state: SettlementState) -> &'static str {
    match state {
        SettlementState::Paid => "paid",
        SettlementState::Partial => "partial",
        SettlementState::Unpaid => "unpaid",
    }
}

fn status_tag(status: MonthStatus) -> String {
    match status {
        MonthStatus::Overdue => "[overdue]".bright_red().to_string(),
        MonthStatus::Settled => "[settled]".bright_green().to_string(),
        MonthStatus::DueSoon => "[due soon]".bright_yellow().to_string(),
        MonthStatus::Open => "[open]".to_string(),
    }
}

fn payment_mark(bill: &Bill, person: Person) -> String {
    if bill.is_pot() {
        return format!(
            "{} {}/{}",
            person,
            money(bill.paid_amount(person)),
            money(bill.share())
        );
    }
    match bill.paid_date(person) {
        Some(date) => format!("{person} paid {date}"),
        None => format!("{person} unpaid"),
    }
}

pub fn bill_line(bill: &Bill) -> String {
    format!(
        "    {:<36} {}  {:>10}  {}  {}",
        bill.id,
        bill.due_date,
        money(bill.total_amount),
        payment_mark(bill, Person::Ire),
        payment_mark(bill, Person::Ebe),
    )
}

fn month_lines(month: &MonthGroup, lines: &mut Vec<String>) {
    lines.push(format!(
        "  {:<16} total {:>10}  each {:>10}  Ire {}  Ebe {}  {}",
        month.label,
        money(month.total),
        money(month.share_per_person),
        settlement_label(month.ire_state),
        settlement_label(month.ebe_state),
        status_tag(month.status),
    ));
    lines.extend(month.bills.iter().map(bill_line));
}

/// One block per bill type: a header with the next month's total and
/// countdown, then every month with its bills.
pub fn groups(groups: &[BillGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        let mut header = format!(
            "{}  next {} ({} bill{})",
            group.name.bold(),
            money(group.next_total),
            group.next_count,
            if group.next_count == 1 { "" } else { "s" }
        );
        if let Some(countdown) = group.countdown {
            header.push_str(&format!("  {countdown}"));
        }
        if group.has_due_soon {
            header.push_str(&format!("  {}", "[due soon]".bright_yellow()));
        }
        lines.push(header);
        for month in &group.months {
            month_lines(month, &mut lines);
        }
    }
    lines
}

pub fn summary(summary: &BillSummary, months: Option<&MonthNames>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(months) = months {
        lines.push(format!("Settlement month: {}", months.current));
    }
    lines.push(format!(
        "Total: {} across {} bill{}",
        money(summary.total_amount),
        summary.total_bills,
        if summary.total_bills == 1 { "" } else { "s" }
    ));
    lines.push(format!(
        "Unpaid (due within {DUE_SOON_WINDOW_DAYS} days or overdue): {}",
        summary.unpaid_bills
    ));
    lines.push(format!("Overdue: {}", summary.overdue_bills));
    for person in Person::BOTH {
        lines.push(format!(
            "{:<4} paid {:>10}  outstanding {:>10}",
            person.label(),
            money(summary.paid_total(person)),
            money(summary.outstanding(person)),
        ));
    }
    if let Some(next) = months.and_then(|months| months.next.as_deref()) {
        lines.push(format!("Next month: {next}"));
    }
    lines
}

pub fn store_status(report: &StoreStatusReport) -> Vec<String> {
    let status = match report.status {
        StoreStatus::Connected => "connected".bright_green().to_string(),
        StoreStatus::NotConnected => "not connected".bright_yellow().to_string(),
    };
    vec![
        format!("Status   : {status}"),
        format!(
            "Database : {}",
            match report.database {
                DatabaseState::Available => "available",
                DatabaseState::Unavailable => "unavailable",
            }
        ),
        format!("Bills    : {}", report.bills_count),
        format!("Message  : {}", report.message),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::BalanceService;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(money(786.5), "£786.50");
        assert_eq!(money(0.0), "£0.00");
    }

    #[test]
    fn summary_lists_each_person() {
        let today = date(2026, 1, 10);
        let bills = vec![
            Bill::new("r", "Rent", 1420.0, date(2026, 1, 1), 0),
            Bill::new("c", "Council Tax", 153.0, date(2026, 1, 1), 1),
        ];
        let totals = BalanceService::summarize(&bills, today);
        let months = BalanceService::month_names(&bills);
        let lines = summary(&totals, months.as_ref());
        assert_eq!(lines[0], "Settlement month: January");
        assert!(lines.iter().any(|line| line.contains("£1573.00 across 2 bills")));
        assert!(lines
            .iter()
            .any(|line| line.starts_with("Ire") && line.contains("£786.50")));
    }

    #[test]
    fn pot_bill_shows_contributions() {
        let mut pot = Bill::new(
            "bill-credit-card-pot",
            "Credit Card Pot",
            5400.0,
            date(2026, 10, 31),
            0,
        );
        pot.set_paid_amount(Person::Ire, 100.0);
        let line = bill_line(&pot);
        assert!(line.contains("Ire £100.00/£2700.00"));
        assert!(line.contains("Ebe £0.00/£2700.00"));
    }
}
