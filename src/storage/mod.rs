pub mod gateway;
pub mod json_backend;
pub mod memory;
pub mod sqlite_backend;

use tracing::warn;

use crate::{domain::Bill, errors::BillError};

pub type Result<T> = std::result::Result<T, BillError>;

/// Abstraction over persistence backends capable of storing bill records.
///
/// Writes are last-writer-wins upserts keyed by bill id; deleting an unknown id
/// is a no-op.
pub trait BillStore: Send + Sync {
    /// Short backend name used in logs.
    fn label(&self) -> &'static str;
    fn list(&self) -> Result<Vec<Bill>>;
    fn upsert(&self, bill: &Bill) -> Result<Bill>;
    fn delete(&self, id: &str) -> Result<()>;
    fn replace_all(&self, bills: &[Bill]) -> Result<()>;

    fn clear(&self) -> Result<()> {
        self.replace_all(&[])
    }
}

pub use gateway::{
    BillGateway, BillSource, DatabaseState, ListOutcome, StoreStatus, StoreStatusReport,
};
pub use json_backend::{JsonBillCache, DEFAULT_CACHE_KEY};
pub use memory::MemoryBillStore;
pub use sqlite_backend::SqliteBillStore;

/// Drops records that violate the bill invariants, logging each one.
pub(crate) fn validated(records: Vec<Bill>, source: &str) -> Vec<Bill> {
    records
        .into_iter()
        .filter(|bill| match bill.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(store = source, error = %err, "skipping invalid bill record");
                false
            }
        })
        .collect()
}

/// Replaces the record with the same id or appends a new one.
pub(crate) fn upsert_in_place(bills: &mut Vec<Bill>, bill: &Bill) {
    match bills.iter_mut().find(|existing| existing.id == bill.id) {
        Some(existing) => *existing = bill.clone(),
        None => bills.push(bill.clone()),
    }
}
