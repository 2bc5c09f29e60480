//! # Import & Export
//!
//! Rules for moving the sales collection in and out as a JSON document.
//!
//! ## Import Modes
//! ```text
//! existing: [A, B, C]          incoming: [C', D, D]
//!
//! Replace ──► [C', D, D]       (incoming stored as-is)
//! Merge   ──► [A, B, C, D, D]  (incoming ids already present are dropped;
//!                               existing first, then new, both in order)
//! ```
//!
//! Duplicates WITHIN the incoming batch are not collapsed; only ids that
//! already exist in storage are filtered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::normalize::normalize_sales;
use crate::types::{RecordId, SaleRecord};

// =============================================================================
// Import Mode
// =============================================================================

/// What an import does with the records already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// The document becomes the whole collection.
    Replace,
    /// New ids are appended; known ids are skipped.
    Merge,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Replace => f.write_str("replace"),
            ImportMode::Merge => f.write_str("merge"),
        }
    }
}

impl FromStr for ImportMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            other => Err(ValidationError::InvalidFormat {
                field: "mode".to_string(),
                reason: format!("expected 'replace' or 'merge', got '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses an import document. The top level must be a JSON array.
///
/// ## Errors
/// `CoreError::InvalidImport` for malformed JSON or a non-array document.
pub fn parse_import(text: &str) -> CoreResult<Vec<Value>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::invalid_import(format!("not valid JSON ({})", e)))?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(CoreError::invalid_import(format!(
            "expected an array of sales, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Merge
// =============================================================================

/// Result of merging an import into the stored collection.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The new collection: existing records first, then the added ones.
    pub records: Vec<SaleRecord>,
    pub added: usize,
    pub skipped: usize,
}

/// Merges incoming raw records into `existing`.
///
/// Incoming elements are normalized first so that legacy `saleId` keys take
/// part in de-duplication.
pub fn merge_sales(
    existing: Vec<SaleRecord>,
    incoming: Vec<Value>,
    now: &DateTime<Utc>,
) -> MergeOutcome {
    let known: HashSet<RecordId> = existing.iter().map(|r| r.id.clone()).collect();
    let incoming = normalize_sales(incoming, now);
    let offered = incoming.len();

    let fresh: Vec<SaleRecord> = incoming
        .into_iter()
        .filter(|r| !known.contains(&r.id))
        .collect();
    let added = fresh.len();

    let mut records = existing;
    records.extend(fresh);

    MergeOutcome {
        records,
        added,
        skipped: offered - added,
    }
}

// =============================================================================
// Export
// =============================================================================

/// Serializes the collection as a pretty-printed JSON array.
pub fn export_document(records: &[SaleRecord]) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Suggested file name for an export made on `date`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use duka_core::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(export_file_name(date), "sales-backup-2024-03-09.json");
/// ```
pub fn export_file_name(date: NaiveDate) -> String {
    format!("sales-backup-{}.json", date.format("%Y-%m-%d"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
    }

    fn stored(ids: &[i64]) -> Vec<SaleRecord> {
        let raw = ids
            .iter()
            .map(|id| json!({"id": id, "itemName": "Soap", "quantity": 1}))
            .collect();
        normalize_sales(raw, &now())
    }

    #[test]
    fn test_parse_import_requires_array() {
        assert_eq!(parse_import("[]").unwrap().len(), 0);
        assert_eq!(parse_import(r#"[{"id": 1}, 2]"#).unwrap().len(), 2);

        let err = parse_import(r#"{"id": 1}"#).unwrap_err();
        assert!(err.to_string().contains("found an object"));

        let err = parse_import("not json").unwrap_err();
        assert!(matches!(err, CoreError::InvalidImport { .. }));
    }

    #[test]
    fn test_import_mode_parsing() {
        assert_eq!("Replace".parse::<ImportMode>().unwrap(), ImportMode::Replace);
        assert_eq!("merge".parse::<ImportMode>().unwrap(), ImportMode::Merge);
        assert!("append".parse::<ImportMode>().is_err());
    }

    #[test]
    fn test_merge_drops_known_ids() {
        // K = 3 existing, N = 4 incoming, M = 2 shared
        let existing = stored(&[1, 2, 3]);
        let incoming = vec![
            json!({"id": 2, "itemName": "Dup"}),
            json!({"id": 4, "itemName": "New"}),
            json!({"id": 3, "itemName": "Dup"}),
            json!({"id": 5, "itemName": "New"}),
        ];
        let outcome = merge_sales(existing, incoming, &now());

        assert_eq!(outcome.records.len(), 3 + (4 - 2));
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.skipped, 2);
        let ids: Vec<String> = outcome.records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(outcome.records[1].item_name, "Soap");
    }

    #[test]
    fn test_merge_keeps_duplicates_within_batch() {
        let outcome = merge_sales(
            stored(&[1]),
            vec![json!({"id": 7}), json!({"id": 7})],
            &now(),
        );
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.added, 2);
    }

    #[test]
    fn test_merge_matches_legacy_ids() {
        let outcome = merge_sales(stored(&[1]), vec![json!({"saleId": 1})], &now());
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_export_document_is_array() {
        let text = export_document(&stored(&[1, 2])).unwrap();
        let back = parse_import(&text).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0]["id"], json!(1));
    }
}
