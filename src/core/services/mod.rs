pub mod balance_service;
pub mod bill_service;
pub mod grouping_service;

pub use balance_service::{BalanceService, MonthNames};
pub use bill_service::{ActiveBills, BillDraft, BillEdit, BillService};
pub use grouping_service::{
    BillGroup, Countdown, GroupingService, MonthGroup, MonthStatus, SettlementState,
};

use crate::errors::BillError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] BillError),
    #[error("{0}")]
    Invalid(String),
    #[error("Bill not found: {0}")]
    NotFound(String),
}
