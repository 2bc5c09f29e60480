//! # Record Normalization
//!
//! Repairs the stored `salesData` array into canonical [`SaleRecord`]s.
//!
//! ## Stored Generations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      StoredSale (one per element)                       │
//! │                                                                         │
//! │  Legacy      old key names present:                                     │
//! │              saleId, quantitySold, profit                               │
//! │                 │  rename (id → quantity → profitLoss), then fill       │
//! │                 ▼                                                       │
//! │  Partial     canonical names, but fields missing or mistyped            │
//! │                 │  fill defaults                                        │
//! │                 ▼                                                       │
//! │  Canonical   every field present and well-typed ─────► SaleRecord       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Defaults
//! | Field      | Default                           |
//! |------------|-----------------------------------|
//! | id         | synthesized UUID string           |
//! | itemName   | `"Unknown"`                       |
//! | quantity   | `0`                               |
//! | totalCost  | `0`                               |
//! | totalSale  | `0`                               |
//! | profitLoss | `0`                               |
//! | saleDate   | `now` as `YYYY-MM-DDTHH:MM:SS.sssZ` |
//!
//! Normalization never fails and never drops an element. Running it on its
//! own output returns the same records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::money::Money;
use crate::types::{RecordId, SaleRecord};

/// Item name used when a record has none.
pub const UNKNOWN_ITEM: &str = "Unknown";

/// Largest quantity read from a stored record.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// Legacy key → canonical key, in the order they are applied.
const LEGACY_ALIASES: [(&str, &str); 3] = [
    ("saleId", "id"),
    ("quantitySold", "quantity"),
    ("profit", "profitLoss"),
];

const CANONICAL_KEYS: [&str; 7] = [
    "id",
    "itemName",
    "quantity",
    "totalCost",
    "totalSale",
    "profitLoss",
    "saleDate",
];

// =============================================================================
// Stored Sale
// =============================================================================

/// One element of the stored array, classified by the shape it was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSale {
    /// Written by the first recording form (old key names).
    Legacy(Map<String, Value>),
    /// Canonical key names but incomplete or mistyped values.
    Partial(Map<String, Value>),
    /// Already canonical.
    Canonical(SaleRecord),
}

impl StoredSale {
    /// Classifies a stored value. Non-objects become an empty partial record.
    pub fn classify(value: Value) -> Self {
        let fields = match value {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        if uses_legacy_keys(&fields) {
            return StoredSale::Legacy(fields);
        }
        match canonical_record(&fields) {
            Some(record) => StoredSale::Canonical(record),
            None => StoredSale::Partial(fields),
        }
    }

    /// Migrates to the canonical shape.
    pub fn migrate(self, now: &DateTime<Utc>) -> SaleRecord {
        match self {
            StoredSale::Canonical(record) => record,
            StoredSale::Partial(fields) => fill_defaults(fields, now),
            StoredSale::Legacy(fields) => fill_defaults(rename_legacy_keys(fields), now),
        }
    }
}

/// How many elements of each generation a load encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationReport {
    pub legacy: usize,
    pub partial: usize,
    pub canonical: usize,
}

impl MigrationReport {
    /// Elements that were rewritten on the way in.
    pub fn repaired(&self) -> usize {
        self.legacy + self.partial
    }

    pub fn total(&self) -> usize {
        self.legacy + self.partial + self.canonical
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Normalizes a stored array.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use duka_core::normalize_sales;
/// use serde_json::json;
///
/// let records = normalize_sales(vec![json!({"saleId": 7, "quantitySold": 2})], &Utc::now());
/// assert_eq!(records[0].id.to_string(), "7");
/// assert_eq!(records[0].quantity, 2);
/// assert_eq!(records[0].item_name, "Unknown");
/// ```
pub fn normalize_sales(values: Vec<Value>, now: &DateTime<Utc>) -> Vec<SaleRecord> {
    normalize_sales_with_report(values, now).0
}

/// Normalizes a stored array and reports what was repaired.
pub fn normalize_sales_with_report(
    values: Vec<Value>,
    now: &DateTime<Utc>,
) -> (Vec<SaleRecord>, MigrationReport) {
    let mut report = MigrationReport::default();
    let records = values
        .into_iter()
        .map(|value| {
            let stored = StoredSale::classify(value);
            match &stored {
                StoredSale::Legacy(_) => report.legacy += 1,
                StoredSale::Partial(_) => report.partial += 1,
                StoredSale::Canonical(_) => report.canonical += 1,
            }
            stored.migrate(now)
        })
        .collect();
    (records, report)
}

// =============================================================================
// Migration Steps
// =============================================================================

/// An alias applies when the old key is present and the canonical one is not.
fn uses_legacy_keys(fields: &Map<String, Value>) -> bool {
    LEGACY_ALIASES
        .iter()
        .any(|(old, new)| fields.contains_key(*old) && !fields.contains_key(*new))
}

/// Moves old keys to their canonical names. The old key is removed.
fn rename_legacy_keys(mut fields: Map<String, Value>) -> Map<String, Value> {
    for (old, new) in LEGACY_ALIASES {
        if fields.contains_key(new) {
            continue;
        }
        if let Some(value) = fields.remove(old) {
            fields.insert(new.to_string(), value);
        }
    }
    fields
}

/// Strict read: succeeds only when every canonical field is present with
/// exactly the type the canonical shape writes.
fn canonical_record(fields: &Map<String, Value>) -> Option<SaleRecord> {
    let id = fields.get("id").and_then(RecordId::from_value)?;
    let item_name = fields.get("itemName")?.as_str()?.to_string();
    let quantity = fields
        .get("quantity")?
        .as_i64()
        .filter(|q| (0..=MAX_QUANTITY).contains(q))?;
    let total_cost = strict_money(fields.get("totalCost")?)?;
    let total_sale = strict_money(fields.get("totalSale")?)?;
    let profit_loss = strict_money(fields.get("profitLoss")?)?;
    let sale_date = fields.get("saleDate")?.as_str()?.to_string();

    Some(SaleRecord {
        id,
        item_name,
        quantity,
        total_cost,
        total_sale,
        profit_loss,
        sale_date,
        extra: extra_fields(fields),
    })
}

/// Lenient read: every field falls back to its default.
fn fill_defaults(fields: Map<String, Value>, now: &DateTime<Utc>) -> SaleRecord {
    let field = |key: &str| fields.get(key).filter(|v| !v.is_null());

    let id = field("id")
        .and_then(RecordId::from_value)
        .unwrap_or_else(RecordId::synthesize);
    let item_name = field("itemName")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_ITEM.to_string());
    let quantity = field("quantity").and_then(lenient_quantity).unwrap_or(0);
    let total_cost = field("totalCost").and_then(lenient_money).unwrap_or_default();
    let total_sale = field("totalSale").and_then(lenient_money).unwrap_or_default();
    let profit_loss = field("profitLoss").and_then(lenient_money).unwrap_or_default();
    let sale_date = match field("saleDate") {
        Some(value) => stored_date(value),
        None => now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    SaleRecord {
        id,
        item_name,
        quantity,
        total_cost,
        total_sale,
        profit_loss,
        sale_date,
        extra: extra_fields(&fields),
    }
}

/// A present `saleDate` as text. Numbers are epoch milliseconds. Anything
/// else keeps its JSON text, which never parses as a date.
fn stored_date(value: &Value) -> String {
    if let Value::String(text) = value {
        return text.clone();
    }
    value
        .as_f64()
        .filter(|ms| ms.is_finite())
        .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms.round() as i64))
        .map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| value.to_string())
}

fn extra_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !CANONICAL_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// =============================================================================
// Value Coercion
// =============================================================================

fn strict_money(value: &Value) -> Option<Money> {
    value.as_f64().and_then(Money::from_units)
}

/// Numbers, or strings holding a number (`"150"`).
fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

pub(crate) fn lenient_money(value: &Value) -> Option<Money> {
    lenient_number(value).and_then(Money::from_units)
}

/// Quantities are whole and within `0..=MAX_QUANTITY`; anything else is
/// treated as missing.
pub(crate) fn lenient_quantity(value: &Value) -> Option<i64> {
    let n = lenient_number(value)?.round();
    if n < 0.0 || n > MAX_QUANTITY as f64 {
        return None;
    }
    Some(n as i64)
}

/// Sums quantities, saturating at `i64::MAX`.
pub(crate) fn total_quantity(quantities: impl IntoIterator<Item = i64>) -> i64 {
    quantities.into_iter().fold(0, i64::saturating_add)
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
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_legacy_keys_are_renamed() {
        let stored = json!({
            "saleId": 1704103200000_i64,
            "itemName": "Sugar",
            "quantitySold": 3,
            "totalCost": 300,
            "totalSale": 360,
            "profit": 60,
            "saleDate": "2024-01-01T10:00:00.000Z"
        });
        let stored = StoredSale::classify(stored);
        assert!(matches!(stored, StoredSale::Legacy(_)));

        let record = stored.migrate(&now());
        assert_eq!(record.id, RecordId::from_millis(1704103200000));
        assert_eq!(record.quantity, 3);
        assert_eq!(record.profit_loss, Money::from_cents(6_000));
        // Old keys do not survive as extras
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let stored = json!({
            "id": "keep",
            "saleId": "drop",
            "quantity": 1,
            "itemName": "Tea",
            "totalCost": 1,
            "totalSale": 2,
            "profitLoss": 1,
            "saleDate": "2024-01-01T10:00:00Z"
        });
        let record = StoredSale::classify(stored).migrate(&now());
        assert_eq!(record.id, RecordId::Text("keep".to_string()));
        assert_eq!(record.extra.get("saleId"), Some(&json!("drop")));
    }

    #[test]
    fn test_missing_fields_default() {
        let records = normalize_sales(vec![json!({})], &now());
        let record = &records[0];
        assert!(matches!(record.id, RecordId::Text(_)));
        assert_eq!(record.item_name, UNKNOWN_ITEM);
        assert_eq!(record.quantity, 0);
        assert_eq!(record.total_cost, Money::zero());
        assert_eq!(record.total_sale, Money::zero());
        assert_eq!(record.profit_loss, Money::zero());
        assert_eq!(record.sale_date, "2024-02-01T09:30:00.000Z");
    }

    #[test]
    fn test_malformed_elements_are_never_dropped() {
        let input = vec![
            json!(null),
            json!(42),
            json!("text"),
            json!([1, 2]),
            json!({"quantity": -4, "totalSale": "abc", "itemName": 12}),
        ];
        let (records, report) = normalize_sales_with_report(input, &now());
        assert_eq!(records.len(), 5);
        assert_eq!(report.partial, 5);
        assert_eq!(records[4].quantity, 0);
        assert_eq!(records[4].total_sale, Money::zero());
        assert_eq!(records[4].item_name, UNKNOWN_ITEM);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let record = StoredSale::classify(json!({
            "quantity": "2",
            "totalCost": "100.5",
            "totalSale": " 150 ",
        }))
        .migrate(&now());
        assert_eq!(record.quantity, 2);
        assert_eq!(record.total_cost, Money::from_cents(10_050));
        assert_eq!(record.total_sale, Money::from_cents(15_000));
    }

    #[test]
    fn test_unparseable_dates_are_kept() {
        let record = StoredSale::classify(json!({"saleDate": "someday"})).migrate(&now());
        assert_eq!(record.sale_date, "someday");
    }

    #[test]
    fn test_non_string_dates() {
        let records = normalize_sales(
            vec![
                json!({"saleDate": 1704103200000_i64}),
                json!({"saleDate": true}),
                json!({"saleDate": {"day": 1}}),
                json!({"saleDate": null}),
            ],
            &now(),
        );
        assert_eq!(records[0].sale_date, "2024-01-01T10:00:00.000Z");
        assert_eq!(records[1].sale_date, "true");
        assert_eq!(records[2].sale_date, r#"{"day":1}"#);
        assert_eq!(records[3].sale_date, "2024-02-01T09:30:00.000Z");

        // Only the null date lands in today's window
        let today = crate::period::filter_by_period(
            &records,
            &crate::period::PeriodFilter::period(crate::period::Period::Day),
            &now(),
        );
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].sale_date, records[3].sale_date);

        // A second pass leaves them alone
        let again: Vec<Value> = records.iter().map(|r| serde_json::to_value(r).unwrap()).collect();
        let again = normalize_sales(again, &now());
        assert_eq!(again[0].sale_date, records[0].sale_date);
        assert_eq!(again[1].sale_date, "true");
    }

    #[test]
    fn test_out_of_range_numbers_default() {
        let records = normalize_sales(
            vec![
                json!({"id": 1, "itemName": "Soap", "quantity": 6e18, "totalCost": 6e16,
                       "totalSale": -92_233_720_368_547_758.08_f64, "profitLoss": 1,
                       "saleDate": "2024-01-01T10:00:00Z"}),
                json!({"quantity": "1000000000000", "totalCost": "10000000000000"}),
            ],
            &now(),
        );
        assert_eq!(records[0].quantity, 0);
        assert_eq!(records[0].total_cost, Money::zero());
        assert_eq!(records[0].total_sale, Money::zero());
        assert_eq!(records[1].quantity, MAX_QUANTITY);
        assert_eq!(records[1].total_cost, Money::from_cents(1_000_000_000_000_000));
    }

    #[test]
    fn test_extras_are_preserved() {
        let record = StoredSale::classify(json!({
            "id": 1,
            "itemName": "Soap",
            "quantity": 2,
            "totalCost": 100,
            "totalSale": 150,
            "profitLoss": 50,
            "saleDate": "2024-01-01T10:00:00Z",
            "buyPrice": 50,
            "salePrice": 75
        }));
        let StoredSale::Canonical(record) = record else {
            panic!("expected canonical record");
        };
        assert_eq!(record.extra.get("buyPrice"), Some(&json!(50)));
        assert_eq!(record.extra.get("salePrice"), Some(&json!(75)));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let input = vec![
            json!({"saleId": 5, "quantitySold": 1.6, "profit": "12.345"}),
            json!({"itemName": "Rice", "totalSale": 99.99}),
            json!(null),
            json!({
                "id": 9, "itemName": "Soap", "quantity": 2, "totalCost": 100,
                "totalSale": 150, "profitLoss": 50, "saleDate": "2024-01-01T10:00:00Z",
                "note": "x"
            }),
        ];
        let first = normalize_sales(input, &now());
        let stored: Vec<Value> = first
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();

        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let (second, report) = normalize_sales_with_report(stored.clone(), &later);

        assert_eq!(second, first);
        assert_eq!(report.canonical, 4);
        assert_eq!(report.repaired(), 0);
        let again: Vec<Value> = second
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        assert_eq!(
            serde_json::to_string(&again).unwrap(),
            serde_json::to_string(&stored).unwrap()
        );
    }

    #[test]
    fn test_completeness_for_any_length() {
        let input: Vec<Value> = (0..25).map(|i| json!({"quantity": i})).collect();
        let records = normalize_sales(input, &now());
        assert_eq!(records.len(), 25);
        assert!(records.iter().all(|r| !r.sale_date.is_empty()));
    }
}
