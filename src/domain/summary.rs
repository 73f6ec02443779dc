use serde::{Deserialize, Serialize};

use crate::domain::person::Person;

/// Balance card totals for the settlement month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub total_bills: usize,
    pub total_amount: f64,
    pub unpaid_bills: usize,
    pub overdue_bills: usize,
    pub ire_outstanding: f64,
    pub ebe_outstanding: f64,
    pub ire_paid_total: f64,
    pub ebe_paid_total: f64,
}

impl BillSummary {
    pub fn paid_total(&self, person: Person) -> f64 {
        match person {
            Person::Ire => self.ire_paid_total,
            Person::Ebe => self.ebe_paid_total,
        }
    }

    pub fn outstanding(&self, person: Person) -> f64 {
        match person {
            Person::Ire => self.ire_outstanding,
            Person::Ebe => self.ebe_outstanding,
        }
    }

    pub(crate) fn accrue_paid(&mut self, person: Person, amount: f64) {
        match person {
            Person::Ire => self.ire_paid_total += amount,
            Person::Ebe => self.ebe_paid_total += amount,
        }
    }

    pub(crate) fn accrue_outstanding(&mut self, person: Person, amount: f64) {
        match person {
            Person::Ire => self.ire_outstanding += amount,
            Person::Ebe => self.ebe_outstanding += amount,
        }
    }
}
