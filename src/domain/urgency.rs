use chrono::{Duration, NaiveDate};

/// Inclusive lookahead, in days, during which an unsettled bill is flagged.
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    DueSoon,
    Upcoming,
}

impl Urgency {
    pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Urgency {
        if due_date < today {
            return Urgency::Overdue;
        }
        let cutoff = today + Duration::days(DUE_SOON_WINDOW_DAYS);
        if due_date <= cutoff {
            Urgency::DueSoon
        } else {
            Urgency::Upcoming
        }
    }

    pub fn is_urgent(self) -> bool {
        matches!(self, Urgency::Overdue | Urgency::DueSoon)
    }
}
