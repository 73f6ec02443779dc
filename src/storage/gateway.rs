//! Persistence gateway: remote store first, local cache second, generated
//! schedule last.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    core::{time::Clock, utils::PathResolver},
    domain::Bill,
    errors::BillError,
    schedule::{generate_schedule, merge_by_id},
};

use super::{BillStore, JsonBillCache, MemoryBillStore, Result, SqliteBillStore};

/// Where the bills returned by [`BillGateway::list`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BillSource {
    Remote,
    LocalCache,
    Generated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    Connected,
    NotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseState {
    Available,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct ListOutcome {
    pub bills: Vec<Bill>,
    pub source: BillSource,
    pub remote: StoreStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusReport {
    pub status: StoreStatus,
    pub database: DatabaseState,
    pub bills_count: usize,
    pub message: String,
}

pub struct BillGateway {
    remote: Option<Box<dyn BillStore>>,
    local: Box<dyn BillStore>,
    clock: Box<dyn Clock>,
    /// Why the configured remote store could not be opened, if it could not.
    remote_error: Option<String>,
}

impl BillGateway {
    pub fn new(
        remote: Option<Box<dyn BillStore>>,
        local: Box<dyn BillStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            remote,
            local,
            clock,
            remote_error: None,
        }
    }

    pub fn local_only(local: Box<dyn BillStore>, clock: Box<dyn Clock>) -> Self {
        Self::new(None, local, clock)
    }

    /// Builds the store chain described by `config` under the data directory `base`.
    ///
    /// A database that fails to open leaves the gateway local-only. A cache
    /// directory that cannot be created falls back to an in-process store.
    pub fn from_config(base: &Path, config: &Config, clock: Box<dyn Clock>) -> Self {
        let mut remote_error = None;
        let remote: Option<Box<dyn BillStore>> = match &config.database_path {
            Some(path) => match SqliteBillStore::open(path, config.remote_timeout()) {
                Ok(store) => Some(Box::new(store)),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "bill database unavailable");
                    remote_error = Some(err.to_string());
                    None
                }
            },
            None => None,
        };

        let local: Box<dyn BillStore> =
            match JsonBillCache::new(PathResolver::cache_dir_in(base), &config.cache_key) {
                Ok(cache) => Box::new(cache),
                Err(err) => {
                    warn!(error = %err, "local cache unavailable, keeping bills in memory");
                    Box::new(MemoryBillStore::new())
                }
            };

        Self {
            remote,
            local,
            clock,
            remote_error,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the current bill collection, never failing: store errors are
    /// logged and the next tier is tried.
    pub fn list(&self) -> ListOutcome {
        if let Some(remote) = &self.remote {
            match remote.list() {
                Ok(bills) if !bills.is_empty() => {
                    debug!(bills = bills.len(), "loaded bills from remote store");
                    self.mirror_local(&bills);
                    return ListOutcome {
                        bills,
                        source: BillSource::Remote,
                        remote: StoreStatus::Connected,
                    };
                }
                Ok(_) => {
                    let bills = generate_schedule(self.today());
                    info!(bills = bills.len(), "remote store empty, generated schedule");
                    for bill in &bills {
                        if let Err(err) = remote.upsert(bill) {
                            warn!(id = %bill.id, error = %err, "failed to save generated bill remotely");
                        }
                    }
                    self.mirror_local(&bills);
                    return ListOutcome {
                        bills,
                        source: BillSource::Generated,
                        remote: StoreStatus::Connected,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "remote store failed, falling back to local cache");
                }
            }
        }

        match self.local.list() {
            Ok(bills) if !bills.is_empty() => {
                info!(bills = bills.len(), "using local bill cache");
                return ListOutcome {
                    bills,
                    source: BillSource::LocalCache,
                    remote: StoreStatus::NotConnected,
                };
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "local cache unreadable"),
        }

        let bills = generate_schedule(self.today());
        info!(bills = bills.len(), "no stored bills, generated schedule");
        self.mirror_local(&bills);
        ListOutcome {
            bills,
            source: BillSource::Generated,
            remote: StoreStatus::NotConnected,
        }
    }

    /// Persists one record, local first. Fails only when no store accepted it.
    ///
    /// An empty store is seeded with the generated schedule before the first
    /// write, so a lone custom bill never stands in for the whole schedule.
    pub fn upsert(&self, bill: &Bill) -> Result<Bill> {
        bill.validate()?;
        if self.stored_bills().is_empty() {
            debug!(id = %bill.id, "seeding empty store before first write");
            self.list();
        }

        let mut stored = match self.local.upsert(bill) {
            Ok(saved) => Some(saved),
            Err(err) => {
                warn!(id = %bill.id, error = %err, "failed to save bill locally");
                None
            }
        };
        if let Some(remote) = &self.remote {
            match remote.upsert(bill) {
                Ok(saved) => stored = Some(saved),
                Err(err) => warn!(id = %bill.id, error = %err, "failed to save bill remotely"),
            }
        }

        stored.ok_or_else(|| {
            BillError::StoreUnavailable(format!("bill `{}` was not saved", bill.id))
        })
    }

    /// Removes a record from every store; unknown ids are ignored.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut removed = false;
        if let Some(remote) = &self.remote {
            match remote.delete(id) {
                Ok(()) => removed = true,
                Err(err) => warn!(id, error = %err, "failed to delete bill remotely"),
            }
        }
        match self.local.delete(id) {
            Ok(()) => removed = true,
            Err(err) => warn!(id, error = %err, "failed to delete bill locally"),
        }
        if removed {
            Ok(())
        } else {
            Err(BillError::StoreUnavailable(format!("bill `{id}` was not deleted")))
        }
    }

    /// Merges a freshly generated schedule into the stored bills. Stored
    /// records keep their payment state; only missing ids are added.
    pub fn regenerate(&self) -> Vec<Bill> {
        let current = self.stored_bills();
        let generated = generate_schedule(self.today());
        let merged = merge_by_id(&current, generated);
        let added = &merged[current.len()..];
        info!(added = added.len(), total = merged.len(), "regenerated bill schedule");

        self.mirror_local(&merged);
        if let Some(remote) = &self.remote {
            for bill in added {
                if let Err(err) = remote.upsert(bill) {
                    warn!(id = %bill.id, error = %err, "failed to save generated bill remotely");
                }
            }
        }
        merged
    }

    pub fn reset_local(&self) -> Result<()> {
        self.local.clear()?;
        info!("cleared local bill cache");
        Ok(())
    }

    pub fn status(&self) -> StoreStatusReport {
        let Some(remote) = &self.remote else {
            let message = match &self.remote_error {
                Some(reason) => format!("Database unavailable: {reason}"),
                None => "No database configured; using local cache".to_string(),
            };
            return StoreStatusReport {
                status: StoreStatus::NotConnected,
                database: DatabaseState::Unavailable,
                bills_count: self.local.list().map(|bills| bills.len()).unwrap_or(0),
                message,
            };
        };

        match remote.list() {
            Ok(bills) => StoreStatusReport {
                status: StoreStatus::Connected,
                database: DatabaseState::Available,
                bills_count: bills.len(),
                message: format!("Connected to {}", remote.label()),
            },
            Err(err) => StoreStatusReport {
                status: StoreStatus::NotConnected,
                database: DatabaseState::Unavailable,
                bills_count: self.local.list().map(|bills| bills.len()).unwrap_or(0),
                message: format!("Database unavailable: {err}"),
            },
        }
    }

    /// Bills currently stored, without generating: remote when reachable,
    /// otherwise the local cache.
    fn stored_bills(&self) -> Vec<Bill> {
        if let Some(remote) = &self.remote {
            match remote.list() {
                Ok(bills) => return bills,
                Err(err) => warn!(error = %err, "remote store failed, reading local cache"),
            }
        }
        self.local.list().unwrap_or_else(|err| {
            warn!(error = %err, "local cache unreadable");
            Vec::new()
        })
    }

    fn mirror_local(&self, bills: &[Bill]) {
        if let Err(err) = self.local.replace_all(bills) {
            warn!(error = %err, "failed to mirror bills to local cache");
        }
    }
}
