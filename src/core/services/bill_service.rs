//! Payment toggles, edits, and creation of bills, plus the active-bill view.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Bill, BillKind, Person};
use crate::storage::{BillGateway, BillSource};

/// Fewer future bills than this, with a kind missing, means the stored
/// schedule is incomplete.
const MIN_COMPLETE_FUTURE_BILLS: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw edit form values; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct BillEdit {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub due_date: Option<String>,
}

impl BillEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none() && self.due_date.is_none()
    }
}

/// Raw form values for a new custom bill.
#[derive(Debug, Clone)]
pub struct BillDraft {
    pub name: String,
    pub amount: String,
    pub due_date: String,
}

#[derive(Debug, Clone)]
pub struct ActiveBills {
    pub bills: Vec<Bill>,
    pub source: BillSource,
    pub regenerated: bool,
}

/// Provides validated mutations over individual bills.
pub struct BillService;

impl BillService {
    /// Flips `person`'s paid flag, stamping or clearing the paid date.
    pub fn toggle_payment(bill: &mut Bill, person: Person, today: NaiveDate) {
        let paid = !bill.paid(person);
        bill.set_paid(person, paid, today);
    }

    /// Adds a contribution to the pot bill's cumulative paid amount.
    pub fn record_pot_payment(bill: &mut Bill, person: Person, amount: f64) -> ServiceResult<()> {
        if !bill.is_pot() {
            return Err(ServiceError::Invalid(format!(
                "{} is not a pot bill",
                bill.name
            )));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(ServiceError::Invalid(
                "Contribution must be a non-negative number".into(),
            ));
        }
        let total = bill.paid_amount(person) + amount;
        bill.set_paid_amount(person, total);
        Ok(())
    }

    /// Applies an edit form. Nothing changes unless every supplied field is valid.
    pub fn apply_edit(bill: &mut Bill, edit: &BillEdit) -> ServiceResult<()> {
        let name = edit.name.as_deref().map(parse_name).transpose()?;
        let amount = edit
            .amount
            .as_deref()
            .map(|raw| parse_amount(raw, false))
            .transpose()?;
        let due_date = edit.due_date.as_deref().map(parse_due_date).transpose()?;

        if let Some(name) = name {
            bill.name = name;
        }
        if let Some(amount) = amount {
            bill.total_amount = amount;
        }
        if let Some(due_date) = due_date {
            bill.due_date = due_date;
        }
        Ok(())
    }

    /// Builds a new unpaid custom bill from a draft.
    pub fn create(draft: &BillDraft, now: DateTime<Utc>) -> ServiceResult<Bill> {
        let name = parse_name(&draft.name)?;
        let amount = parse_amount(&draft.amount, true)?;
        let due_date = parse_due_date(&draft.due_date)?;
        Ok(Bill::new(
            Uuid::new_v4().to_string(),
            name,
            amount,
            due_date,
            now.timestamp_millis(),
        ))
    }

    pub fn find(gateway: &BillGateway, id: &str) -> ServiceResult<Bill> {
        gateway
            .list()
            .bills
            .into_iter()
            .find(|bill| bill.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    pub fn toggle(gateway: &BillGateway, id: &str, person: Person) -> ServiceResult<Bill> {
        let mut bill = Self::find(gateway, id)?;
        Self::toggle_payment(&mut bill, person, gateway.today());
        Ok(gateway.upsert(&bill)?)
    }

    pub fn contribute_to_pot(
        gateway: &BillGateway,
        person: Person,
        amount: f64,
    ) -> ServiceResult<Bill> {
        let mut bill = gateway
            .list()
            .bills
            .into_iter()
            .find(Bill::is_pot)
            .ok_or_else(|| ServiceError::NotFound(BillKind::CreditCardPot.label().into()))?;
        Self::record_pot_payment(&mut bill, person, amount)?;
        Ok(gateway.upsert(&bill)?)
    }

    pub fn edit(gateway: &BillGateway, id: &str, edit: &BillEdit) -> ServiceResult<Bill> {
        let mut bill = Self::find(gateway, id)?;
        Self::apply_edit(&mut bill, edit)?;
        Ok(gateway.upsert(&bill)?)
    }

    pub fn add(gateway: &BillGateway, draft: &BillDraft) -> ServiceResult<Bill> {
        let bill = Self::create(draft, gateway.clock().now())?;
        Ok(gateway.upsert(&bill)?)
    }

    pub fn remove(gateway: &BillGateway, id: &str) -> ServiceResult<()> {
        Ok(gateway.delete(id)?)
    }

    /// Bills the household still has to deal with.
    ///
    /// Keeps bills due today or later; the gateway seeds an empty store. A
    /// schedule with no future bills, or one missing a known kind with fewer
    /// than ten future bills, triggers regeneration; after regenerating, bills
    /// from the current year are shown as well.
    pub fn load_active(gateway: &BillGateway) -> ActiveBills {
        let today = gateway.today();
        let outcome = gateway.list();
        let future = due_from(&outcome.bills, today);

        let kinds: HashSet<&str> = future.iter().map(|bill| bill.name.as_str()).collect();
        let has_all_kinds = BillKind::ALL
            .iter()
            .all(|kind| kinds.contains(kind.label()));

        if future.is_empty() || (!has_all_kinds && future.len() < MIN_COMPLETE_FUTURE_BILLS) {
            info!(
                future = future.len(),
                has_all_kinds, "stored schedule incomplete, regenerating"
            );
            let bills = gateway
                .regenerate()
                .into_iter()
                .filter(|bill| bill.due_date >= today || bill.due_date.year() == today.year())
                .collect();
            return ActiveBills {
                bills,
                source: BillSource::Generated,
                regenerated: true,
            };
        }

        ActiveBills {
            bills: future,
            source: outcome.source,
            regenerated: false,
        }
    }
}

fn due_from(bills: &[Bill], today: NaiveDate) -> Vec<Bill> {
    bills
        .iter()
        .filter(|bill| bill.due_date >= today)
        .cloned()
        .collect()
}

fn parse_name(raw: &str) -> ServiceResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::Invalid("Name cannot be empty".into()));
    }
    Ok(name.to_string())
}

fn parse_amount(raw: &str, strictly_positive: bool) -> ServiceResult<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::Invalid(format!("`{}` is not a valid amount", raw.trim())))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ServiceError::Invalid(
            "Amount must be a non-negative number".into(),
        ));
    }
    if strictly_positive && amount == 0.0 {
        return Err(ServiceError::Invalid("Amount must be greater than zero".into()));
    }
    Ok(amount)
}

fn parse_due_date(raw: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        ServiceError::Invalid(format!("`{}` is not a date in YYYY-MM-DD form", raw.trim()))
    })
}
