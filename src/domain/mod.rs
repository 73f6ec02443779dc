//! Bill domain models, persistence-friendly types, and helpers.

pub mod bill;
pub mod person;
pub mod summary;
pub mod urgency;

pub use bill::{round_cents, Bill, BillKind, POT_BILL_ID};
pub use person::Person;
pub use summary::BillSummary;
pub use urgency::{Urgency, DUE_SOON_WINDOW_DAYS};
