use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, warn};

use crate::{
    core::utils::ensure_dir,
    domain::Bill,
    errors::BillError,
};

use super::{validated, BillStore, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

const BILLS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS bills (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        total_amount REAL NOT NULL,
        due_date TEXT NOT NULL,
        ire_paid INTEGER NOT NULL DEFAULT 0,
        ebe_paid INTEGER NOT NULL DEFAULT 0,
        ire_paid_date TEXT,
        ebe_paid_date TEXT,
        ire_paid_amount REAL,
        ebe_paid_amount REAL,
        created_at INTEGER NOT NULL
    );
";

const SELECT_BILLS: &str = "
    SELECT id, name, total_amount, due_date, ire_paid, ebe_paid,
           ire_paid_date, ebe_paid_date, ire_paid_amount, ebe_paid_amount, created_at
    FROM bills
    ORDER BY due_date ASC, created_at ASC
";

const SELECT_BILL_BY_ID: &str = "
    SELECT id, name, total_amount, due_date, ire_paid, ebe_paid,
           ire_paid_date, ebe_paid_date, ire_paid_amount, ebe_paid_amount, created_at
    FROM bills
    WHERE id = ?1
";

const UPSERT_BILL: &str = "
    INSERT INTO bills (
        id, name, total_amount, due_date, ire_paid, ebe_paid,
        ire_paid_date, ebe_paid_date, ire_paid_amount, ebe_paid_amount, created_at
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT (id) DO UPDATE SET
        name = excluded.name,
        total_amount = excluded.total_amount,
        due_date = excluded.due_date,
        ire_paid = excluded.ire_paid,
        ebe_paid = excluded.ebe_paid,
        ire_paid_date = excluded.ire_paid_date,
        ebe_paid_date = excluded.ebe_paid_date,
        ire_paid_amount = excluded.ire_paid_amount,
        ebe_paid_amount = excluded.ebe_paid_amount
";

/// Relational bill store backed by SQLite.
pub struct SqliteBillStore {
    conn: Mutex<Connection>,
    location: Option<PathBuf>,
}

impl SqliteBillStore {
    /// Opens (or creates) the database at `path`. Lock contention longer than
    /// `timeout` surfaces as an error so callers can fall back.
    pub fn open(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn, timeout, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, Duration::from_millis(0), None)
    }

    fn from_connection(
        conn: Connection,
        timeout: Duration,
        location: Option<PathBuf>,
    ) -> Result<Self> {
        conn.busy_timeout(timeout)?;
        conn.execute_batch(BILLS_SCHEMA)?;
        debug!(
            location = ?location,
            timeout_ms = timeout.as_millis() as u64,
            "opened bill database"
        );
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| BillError::StorageError("database connection lock poisoned".into()))
    }
}

impl BillStore for SqliteBillStore {
    fn label(&self) -> &'static str {
        "database"
    }

    fn list(&self) -> Result<Vec<Bill>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(SELECT_BILLS)?;
        let rows: Vec<rusqlite::Result<BillRow>> = stmt.query_map([], read_row)?.collect();
        let bills = rows
            .into_iter()
            .filter_map(|row| match row.map_err(BillError::from).and_then(BillRow::into_bill) {
                Ok(bill) => Some(bill),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable bill row");
                    None
                }
            })
            .collect();
        Ok(validated(bills, self.label()))
    }

    /// Returns the row as stored; an existing row keeps its `created_at`.
    fn upsert(&self, bill: &Bill) -> Result<Bill> {
        let conn = self.connection()?;
        upsert_with(&conn, bill)?;
        conn.query_row(SELECT_BILL_BY_ID, params![bill.id], read_row)?
            .into_bill()
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM bills WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn replace_all(&self, bills: &[Bill]) -> Result<()> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM bills", [])?;
        for bill in bills {
            upsert_with(&tx, bill)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert_with(conn: &Connection, bill: &Bill) -> Result<()> {
    conn.execute(
        UPSERT_BILL,
        params![
            bill.id,
            bill.name,
            bill.total_amount,
            bill.due_date.format(DATE_FORMAT).to_string(),
            bill.ire_paid,
            bill.ebe_paid,
            bill.ire_paid_date.map(|d| d.format(DATE_FORMAT).to_string()),
            bill.ebe_paid_date.map(|d| d.format(DATE_FORMAT).to_string()),
            bill.ire_paid_amount,
            bill.ebe_paid_amount,
            bill.created_at,
        ],
    )?;
    Ok(())
}

/// Raw column values as stored; dates stay text until validated.
struct BillRow {
    id: String,
    name: String,
    total_amount: f64,
    due_date: String,
    ire_paid: bool,
    ebe_paid: bool,
    ire_paid_date: Option<String>,
    ebe_paid_date: Option<String>,
    ire_paid_amount: Option<f64>,
    ebe_paid_amount: Option<f64>,
    created_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<BillRow> {
    Ok(BillRow {
        id: row.get(0)?,
        name: row.get(1)?,
        total_amount: row.get(2)?,
        due_date: row.get(3)?,
        ire_paid: row.get(4)?,
        ebe_paid: row.get(5)?,
        ire_paid_date: row.get(6)?,
        ebe_paid_date: row.get(7)?,
        ire_paid_amount: row.get(8)?,
        ebe_paid_amount: row.get(9)?,
        created_at: row.get(10)?,
    })
}

impl BillRow {
    fn into_bill(self) -> Result<Bill> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|err| BillError::InvalidRecord {
                id: self.id.clone(),
                reason: format!("bad date `{raw}`: {err}"),
            })
        };
        let due_date = parse(&self.due_date)?;
        let ire_paid_date = self.ire_paid_date.as_deref().map(parse).transpose()?;
        let ebe_paid_date = self.ebe_paid_date.as_deref().map(parse).transpose()?;
        Ok(Bill {
            id: self.id.clone(),
            name: self.name.clone(),
            total_amount: self.total_amount,
            due_date,
            ire_paid: self.ire_paid,
            ebe_paid: self.ebe_paid,
            ire_paid_date,
            ebe_paid_date,
            ire_paid_amount: self.ire_paid_amount,
            ebe_paid_amount: self.ebe_paid_amount,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Person;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn upsert_roundtrips_every_column() {
        let store = SqliteBillStore::open_in_memory().unwrap();
        let mut bill = Bill::new("bill-rent-2026-01-01", "Rent", 1420.0, date(2026, 1, 1), 42);
        bill.set_paid(Person::Ire, true, date(2025, 12, 29));
        bill.set_paid_amount(Person::Ebe, 12.5);
        store.upsert(&bill).unwrap();

        let bills = store.list().unwrap();
        assert_eq!(bills, vec![bill]);
    }

    #[test]
    fn upsert_keeps_original_created_at() {
        let store = SqliteBillStore::open_in_memory().unwrap();
        let bill = Bill::new("a", "Water", 0.0, date(2026, 1, 1), 1);
        store.upsert(&bill).unwrap();
        let mut edited = bill.clone();
        edited.total_amount = 31.2;
        edited.created_at = 99;
        let stored = store.upsert(&edited).unwrap();
        assert_eq!(stored.created_at, 1);
        assert_eq!(stored.total_amount, 31.2);

        let bills = store.list().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].total_amount, 31.2);
        assert_eq!(bills[0].created_at, 1);
    }

    #[test]
    fn mistyped_row_is_skipped_not_fatal() {
        let store = SqliteBillStore::open_in_memory().unwrap();
        let mut rent = Bill::new("rent", "Rent", 1420.0, date(2026, 5, 1), 0);
        rent.set_paid(Person::Ire, true, date(2026, 4, 2));
        store.upsert(&rent).unwrap();
        store
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO bills (id, name, total_amount, due_date, created_at)
                 VALUES ('custom', 'Broadband', 'abc', '2026-02-05', 1)",
                [],
            )
            .unwrap();
        store
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO bills (id, name, total_amount, due_date, created_at)
                 VALUES ('baddate', 'Water', 3.0, 'soon', 2)",
                [],
            )
            .unwrap();

        assert_eq!(store.list().unwrap(), vec![rent]);
    }

    #[test]
    fn list_orders_by_due_date() {
        let store = SqliteBillStore::open_in_memory().unwrap();
        store
            .replace_all(&[
                Bill::new("late", "Rent", 1.0, date(2026, 3, 1), 0),
                Bill::new("early", "Rent", 1.0, date(2026, 1, 1), 0),
            ])
            .unwrap();
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["early", "late"]);

        store.delete("early").unwrap();
        store.delete("missing").unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
