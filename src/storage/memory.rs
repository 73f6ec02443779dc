use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{domain::Bill, errors::BillError};

use super::{upsert_in_place, BillStore, Result};

/// In-process bill store. Constructed explicitly and handed to the gateway;
/// its contents live as long as the handle.
#[derive(Debug, Default)]
pub struct MemoryBillStore {
    bills: RwLock<Vec<Bill>>,
}

impl MemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: RwLock::new(bills),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Bill>>> {
        self.bills
            .read()
            .map_err(|_| BillError::StorageError("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Bill>>> {
        self.bills
            .write()
            .map_err(|_| BillError::StorageError("memory store lock poisoned".into()))
    }
}

impl BillStore for MemoryBillStore {
    fn label(&self) -> &'static str {
        "memory"
    }

    fn list(&self) -> Result<Vec<Bill>> {
        Ok(self.read()?.clone())
    }

    fn upsert(&self, bill: &Bill) -> Result<Bill> {
        upsert_in_place(&mut *self.write()?, bill);
        Ok(bill.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.write()?.retain(|bill| bill.id != id);
        Ok(())
    }

    fn replace_all(&self, bills: &[Bill]) -> Result<()> {
        *self.write()? = bills.to_vec();
        Ok(())
    }
}
