//! # Sales Repository
//!
//! Reads and writes the `salesData` document.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       salesData operations                              │
//! │                                                                         │
//! │  load_all()      raw array ──► normalize ──► Vec<SaleRecord>            │
//! │                  (store untouched)                                      │
//! │                                                                         │
//! │  record(sale)    raw array + sale ──► store                             │
//! │                                                                         │
//! │  delete(id)      normalize ──► remove id ──► store normalized           │
//! │                                                                         │
//! │  import(doc)     Replace: doc ──► store (verbatim)                      │
//! │                  Merge:   normalize existing + new ids ──► store        │
//! │                                                                         │
//! │  export()        normalize ──► pretty JSON                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use duka_core::validation::validate_record_key;
use duka_core::{
    export_document, merge_sales, normalize_sales, normalize_sales_with_report, parse_import,
    CoreError, ImportMode, MigrationReport, SaleRecord, SALES_KEY,
};
use serde_json::Value;
use tracing::{debug, info};

use super::{read_array, write_json, ReadMode};
use crate::error::{DbError, DbResult};
use crate::storage::Storage;

/// What an import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub mode: ImportMode,
    /// Records in the imported document.
    pub received: usize,
    /// Records that made it into the store.
    pub added: usize,
    /// Records dropped because their id was already stored (merge only).
    pub skipped: usize,
    /// Size of the collection afterwards.
    pub total: usize,
}

/// Repository for the sales collection.
#[derive(Debug, Clone)]
pub struct SalesRepository<S> {
    storage: S,
}

impl<S: Storage> SalesRepository<S> {
    /// Creates a new SalesRepository.
    pub fn new(storage: S) -> Self {
        SalesRepository { storage }
    }

    /// Loads every sale in canonical shape.
    pub async fn load_all(&self) -> DbResult<Vec<SaleRecord>> {
        Ok(self.load_with_report().await?.0)
    }

    /// Loads every sale and reports how many needed repair.
    pub async fn load_with_report(&self) -> DbResult<(Vec<SaleRecord>, MigrationReport)> {
        let raw = read_array(&self.storage, SALES_KEY, ReadMode::Lenient).await?;
        let (records, report) = normalize_sales_with_report(raw, &Utc::now());

        debug!(
            total = report.total(),
            legacy = report.legacy,
            partial = report.partial,
            "Loaded sales"
        );
        Ok((records, report))
    }

    /// Replaces the collection with canonical records.
    pub async fn save_all(&self, records: &[SaleRecord]) -> DbResult<()> {
        debug!(count = records.len(), "Saving sales");
        write_json(&self.storage, SALES_KEY, records).await
    }

    /// Replaces the collection with raw values, exactly as given.
    pub async fn save_raw(&self, values: &[Value]) -> DbResult<()> {
        debug!(count = values.len(), "Saving raw sales");
        write_json(&self.storage, SALES_KEY, values).await
    }

    /// Appends one sale. Existing elements are left as stored.
    pub async fn record(&self, sale: &SaleRecord) -> DbResult<()> {
        let mut raw = read_array(&self.storage, SALES_KEY, ReadMode::Strict).await?;
        raw.push(serde_json::to_value(sale)?);
        self.save_raw(&raw).await?;

        info!(id = %sale.id, item = %sale.item_name, quantity = sale.quantity, "Recorded sale");
        Ok(())
    }

    /// Deletes the sale whose id matches `key` and returns it.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no stored sale has that id.
    pub async fn delete(&self, key: &str) -> DbResult<SaleRecord> {
        let key = validate_record_key(key).map_err(CoreError::from)?;

        let raw = read_array(&self.storage, SALES_KEY, ReadMode::Strict).await?;
        let mut records = normalize_sales(raw, &Utc::now());

        let position = records
            .iter()
            .position(|record| record.id.matches(key))
            .ok_or_else(|| DbError::not_found("Sale", key))?;
        let removed = records.remove(position);
        self.save_all(&records).await?;

        info!(id = %removed.id, item = %removed.item_name, "Deleted sale");
        Ok(removed)
    }

    /// Imports a JSON document.
    ///
    /// ## Errors
    /// `CoreError::InvalidImport` (wrapped) if the document is not a JSON
    /// array. The store is not touched in that case.
    pub async fn import(&self, text: &str, mode: ImportMode) -> DbResult<ImportOutcome> {
        let incoming = parse_import(text)?;
        let received = incoming.len();

        let outcome = match mode {
            ImportMode::Replace => {
                self.save_raw(&incoming).await?;
                ImportOutcome {
                    mode,
                    received,
                    added: received,
                    skipped: 0,
                    total: received,
                }
            }
            ImportMode::Merge => {
                let raw = read_array(&self.storage, SALES_KEY, ReadMode::Strict).await?;
                let now = Utc::now();
                let existing = normalize_sales(raw, &now);
                let merged = merge_sales(existing, incoming, &now);
                self.save_all(&merged.records).await?;
                ImportOutcome {
                    mode,
                    received,
                    added: merged.added,
                    skipped: merged.skipped,
                    total: merged.records.len(),
                }
            }
        };

        info!(
            mode = %mode,
            received = outcome.received,
            added = outcome.added,
            skipped = outcome.skipped,
            total = outcome.total,
            "Imported sales"
        );
        Ok(outcome)
    }

    /// The normalized collection as a pretty JSON document.
    pub async fn export(&self) -> DbResult<String> {
        let records = self.load_all().await?;
        let document = export_document(&records)?;
        info!(count = records.len(), "Exported sales");
        Ok(document)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
