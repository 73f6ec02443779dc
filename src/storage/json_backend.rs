use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{core::utils::ensure_dir, domain::Bill};

use super::{upsert_in_place, validated, BillStore, Result};

/// Fixed storage identifier of the local bill cache.
pub const DEFAULT_CACHE_KEY: &str = "finance-splitter-bills";

const CACHE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON cache holding the last known bill collection.
#[derive(Debug, Clone)]
pub struct JsonBillCache {
    path: PathBuf,
}

impl JsonBillCache {
    pub fn new(cache_dir: PathBuf, key: &str) -> Result<Self> {
        ensure_dir(&cache_dir)?;
        let path = cache_dir.join(format!("{}.{}", canonical_key(key), CACHE_EXTENSION));
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Bill>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let entries: Vec<Value> = serde_json::from_str(&data)?;
        let records = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Bill>(entry) {
                Ok(bill) => Some(bill),
                Err(err) => {
                    warn!(store = self.label(), error = %err, "skipping unreadable bill record");
                    None
                }
            })
            .collect();
        Ok(validated(records, self.label()))
    }

    fn write(&self, bills: &[Bill]) -> Result<()> {
        let json = serde_json::to_string_pretty(bills)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bills = bills.len(), "wrote local bill cache");
        Ok(())
    }
}

impl BillStore for JsonBillCache {
    fn label(&self) -> &'static str {
        "local-cache"
    }

    fn list(&self) -> Result<Vec<Bill>> {
        self.read()
    }

    fn upsert(&self, bill: &Bill) -> Result<Bill> {
        let mut bills = self.read()?;
        upsert_in_place(&mut bills, bill);
        self.write(&bills)?;
        Ok(bill.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut bills = self.read()?;
        let before = bills.len();
        bills.retain(|bill| bill.id != id);
        if bills.len() != before {
            self.write(&bills)?;
        }
        Ok(())
    }

    fn replace_all(&self, bills: &[Bill]) -> Result<()> {
        self.write(bills)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        DEFAULT_CACHE_KEY.into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
