use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::person::Person;
use crate::errors::{BillError, Result};

/// Fixed identifier of the singleton credit card pot.
pub const POT_BILL_ID: &str = "bill-credit-card-pot";

/// The fixed vocabulary of household bills the schedule knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BillKind {
    Rent,
    CouncilTax,
    Water,
    Electricity,
    CreditCardPot,
}

impl BillKind {
    /// Display order used by the grouped view.
    pub const ALL: [BillKind; 5] = [
        BillKind::Rent,
        BillKind::CouncilTax,
        BillKind::Water,
        BillKind::Electricity,
        BillKind::CreditCardPot,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BillKind::Rent => "Rent",
            BillKind::CouncilTax => "Council Tax",
            BillKind::Water => "Water",
            BillKind::Electricity => "Electricity",
            BillKind::CreditCardPot => "Credit Card Pot",
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            BillKind::Rent => "rent",
            BillKind::CouncilTax => "council-tax",
            BillKind::Water => "water",
            BillKind::Electricity => "electricity",
            BillKind::CreditCardPot => "credit-card-pot",
        }
    }

    /// Amount a freshly generated instance carries. Water and Electricity are
    /// entered by hand once the statement arrives.
    pub fn default_amount(self) -> f64 {
        match self {
            BillKind::Rent => 1420.00,
            BillKind::CouncilTax => 153.00,
            BillKind::Water | BillKind::Electricity => 0.00,
            BillKind::CreditCardPot => 5400.00,
        }
    }

    pub fn is_pot(self) -> bool {
        matches!(self, BillKind::CreditCardPot)
    }

    /// Resolves a kind from an exact bill label.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == name)
    }

    pub fn bill_id(self, due_date: NaiveDate) -> String {
        if self.is_pot() {
            POT_BILL_ID.to_string()
        } else {
            format!("bill-{}-{}", self.id_prefix(), due_date.format("%Y-%m-%d"))
        }
    }
}

/// A single billing obligation shared 50/50 between the two parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub total_amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub ire_paid: bool,
    #[serde(default)]
    pub ebe_paid: bool,
    #[serde(default)]
    pub ire_paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub ebe_paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ire_paid_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebe_paid_amount: Option<f64>,
    pub created_at: i64,
}

impl Bill {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        total_amount: f64,
        due_date: NaiveDate,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_amount,
            due_date,
            ire_paid: false,
            ebe_paid: false,
            ire_paid_date: None,
            ebe_paid_date: None,
            ire_paid_amount: None,
            ebe_paid_amount: None,
            created_at,
        }
    }

    pub fn kind(&self) -> Option<BillKind> {
        BillKind::from_name(&self.name)
    }

    pub fn is_pot(&self) -> bool {
        self.kind().map(BillKind::is_pot).unwrap_or(false)
    }

    /// Each party's half of the total.
    pub fn share(&self) -> f64 {
        self.total_amount / 2.0
    }

    pub fn paid(&self, person: Person) -> bool {
        match person {
            Person::Ire => self.ire_paid,
            Person::Ebe => self.ebe_paid,
        }
    }

    pub fn paid_date(&self, person: Person) -> Option<NaiveDate> {
        match person {
            Person::Ire => self.ire_paid_date,
            Person::Ebe => self.ebe_paid_date,
        }
    }

    /// Cumulative pot contribution; zero when nothing was recorded.
    pub fn paid_amount(&self, person: Person) -> f64 {
        match person {
            Person::Ire => self.ire_paid_amount,
            Person::Ebe => self.ebe_paid_amount,
        }
        .unwrap_or(0.0)
    }

    /// Sets the settlement flag, keeping the paid date in lockstep with it.
    pub fn set_paid(&mut self, person: Person, paid: bool, today: NaiveDate) {
        let date = paid.then_some(today);
        match person {
            Person::Ire => {
                self.ire_paid = paid;
                self.ire_paid_date = date;
            }
            Person::Ebe => {
                self.ebe_paid = paid;
                self.ebe_paid_date = date;
            }
        }
    }

    pub fn set_paid_amount(&mut self, person: Person, amount: f64) {
        let amount = Some(round_cents(amount));
        match person {
            Person::Ire => self.ire_paid_amount = amount,
            Person::Ebe => self.ebe_paid_amount = amount,
        }
    }

    /// Whether `person` has covered their half. Pot bills compare the cumulative
    /// contribution against the share instead of reading the flag.
    pub fn settled_by(&self, person: Person) -> bool {
        if self.is_pot() {
            self.paid_amount(person) >= round_cents(self.share())
        } else {
            self.paid(person)
        }
    }

    pub fn is_fully_settled(&self) -> bool {
        Person::BOTH.into_iter().all(|person| self.settled_by(person))
    }

    /// Whole days from `today` to the due date; negative once overdue.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Checks the record invariants enforced at the persistence boundary.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(BillError::InvalidRecord {
                id: self.id.clone(),
                reason: reason.to_string(),
            })
        };
        if self.id.trim().is_empty() {
            return invalid("empty id");
        }
        if self.name.trim().is_empty() {
            return invalid("empty name");
        }
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return invalid("total amount must be a non-negative number");
        }
        for person in Person::BOTH {
            if self.paid(person) != self.paid_date(person).is_some() {
                return invalid("paid date must be set exactly when the bill is paid");
            }
            let amount = self.paid_amount(person);
            if !amount.is_finite() || amount < 0.0 {
                return invalid("paid amount must be a non-negative number");
            }
        }
        Ok(())
    }
}

/// Rounds a monetary amount to whole pence.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
