//! # Domain Types
//!
//! Canonical shapes of the documents kept in storage.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SaleRecord    │   │  InventoryItem  │   │   ViewState     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  period         │       │
//! │  │  itemName       │   │  name           │   │  startDate      │       │
//! │  │  quantity       │   │  buyPrice       │   │  endDate        │       │
//! │  │  totalCost      │   │  sellPrice      │   │  timestamp      │       │
//! │  │  totalSale      │   │  quantity       │   └─────────────────┘       │
//! │  │  profitLoss     │   │  description    │                             │
//! │  │  saleDate       │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │     "salesData"          "inventoryItems"      "analysisViewState"      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names on the wire are camelCase, exactly as the recording forms
//! wrote them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::Money;
use crate::period::{parse_sale_date, DateRange, Period, PeriodFilter};
use crate::summary::ProfitStatus;
use crate::DEFAULT_RANGE_DAYS;

// =============================================================================
// Record Identifier
// =============================================================================

/// Identifier of a sale or inventory item.
///
/// Recording forms used millisecond timestamps (`1704103200000`), some
/// imports carry strings. Both are kept exactly as stored so that exported
/// documents round-trip and merge de-duplication compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(Number),
    Text(String),
}

impl RecordId {
    /// Reads an id from a stored JSON value. Only numbers and strings qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RecordId::Number(n.clone())),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// Synthesizes an id for a record stored without one.
    pub fn synthesize() -> Self {
        RecordId::Text(Uuid::new_v4().to_string())
    }

    /// Creates a numeric id from a millisecond timestamp.
    pub fn from_millis(millis: i64) -> Self {
        RecordId::Number(Number::from(millis))
    }

    /// Checks whether a user-supplied key (e.g. from a delete command)
    /// designates this id.
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::RecordId;
    ///
    /// let id = RecordId::from_millis(1704103200000);
    /// assert!(id.matches("1704103200000"));
    /// assert!(!id.matches("1704103200001"));
    /// ```
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        match self {
            RecordId::Text(text) => text == key,
            RecordId::Number(n) => {
                if n.to_string() == key {
                    return true;
                }
                match (n.as_f64(), key.parse::<f64>()) {
                    (Some(a), Ok(b)) => a == b,
                    _ => false,
                }
            }
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// A sale in canonical (post-normalization) shape.
///
/// ## Invariants
/// - Every field is populated (see [`crate::normalize`] for defaults)
/// - `profit_loss` is NOT guaranteed to equal `total_sale - total_cost`;
///   legacy records were written with inconsistent figures and are kept
///   as they are
/// - `sale_date` is kept as the stored string, even if it does not parse;
///   filters exclude such records instead of rewriting them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: RecordId,
    pub item_name: String,
    pub quantity: i64,
    pub total_cost: Money,
    pub total_sale: Money,
    pub profit_loss: Money,
    /// ISO-8601 timestamp as stored.
    pub sale_date: String,
    /// Keys the canonical shape does not know (`buyPrice`, `salePrice`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SaleRecord {
    /// Parses `sale_date`, reading offset-less timestamps in `tz`.
    pub fn parsed_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        parse_sale_date(&self.sale_date, tz)
    }

    /// Classifies the stored profit figure.
    pub fn status(&self) -> ProfitStatus {
        ProfitStatus::classify(self.profit_loss)
    }
}

// =============================================================================
// View State
// =============================================================================

/// The saved report selection (`analysisViewState`).
///
/// Dates are `YYYY-MM-DD` strings; an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// When the view was saved (ISO-8601).
    #[serde(default)]
    pub timestamp: String,
}

impl ViewState {
    /// Captures a filter as a view state saved at `saved_at`.
    pub fn capture(filter: &PeriodFilter, saved_at: DateTime<Utc>) -> Self {
        let (start_date, end_date) = match filter.range {
            Some(range) => (range.start.to_string(), range.end.to_string()),
            None => (String::new(), String::new()),
        };
        ViewState {
            period: filter.period.to_string(),
            start_date,
            end_date,
            timestamp: saved_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }

    /// The selection used when nothing has been saved yet: daily grouping
    /// over the last 30 days.
    pub fn initial(today: NaiveDate) -> Self {
        let range = DateRange::last_days(today, DEFAULT_RANGE_DAYS);
        ViewState {
            period: Period::Day.to_string(),
            start_date: range.start.to_string(),
            end_date: range.end.to_string(),
            timestamp: String::new(),
        }
    }

    /// Converts the saved strings back into a filter.
    ///
    /// ## Errors
    /// `ValidationError::InvalidFormat` if a non-empty date does not parse.
    pub fn to_filter(&self) -> CoreResult<PeriodFilter> {
        let period = Period::parse(&self.period);
        let range = DateRange::parse(&self.start_date, &self.end_date)?;
        Ok(PeriodFilter { period, range })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_from_value() {
        assert_eq!(
            RecordId::from_value(&json!(42)),
            Some(RecordId::Number(Number::from(42)))
        );
        assert_eq!(
            RecordId::from_value(&json!("abc")),
            Some(RecordId::Text("abc".to_string()))
        );
        assert_eq!(RecordId::from_value(&json!(null)), None);
        assert_eq!(RecordId::from_value(&json!({"a": 1})), None);
    }

    #[test]
    fn test_record_id_matches_float_ids() {
        // Ids written as Date.now() + Math.random() are fractional
        let id = RecordId::from_value(&json!(1704103200000.25)).unwrap();
        assert!(id.matches("1704103200000.25"));
        assert!(!id.matches("1704103200000"));

        let text = RecordId::Text("abc".to_string());
        assert!(text.matches(" abc "));
        assert!(!text.matches("ABC"));
    }

    #[test]
    fn test_record_id_serializes_untagged() {
        let id = RecordId::from_millis(1704103200000);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1704103200000");
        let text: RecordId = serde_json::from_str("\"s-1\"").unwrap();
        assert_eq!(text, RecordId::Text("s-1".to_string()));
    }

    #[test]
    fn test_sale_record_wire_shape() {
        let record = SaleRecord {
            id: RecordId::from_millis(1),
            item_name: "Soap".to_string(),
            quantity: 2,
            total_cost: Money::from_cents(10_000),
            total_sale: Money::from_cents(15_000),
            profit_loss: Money::from_cents(5_000),
            sale_date: "2024-01-01T10:00:00.000Z".to_string(),
            extra: Map::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "itemName": "Soap",
                "quantity": 2,
                "totalCost": 100,
                "totalSale": 150,
                "profitLoss": 50,
                "saleDate": "2024-01-01T10:00:00.000Z"
            })
        );
        assert_eq!(record.status(), ProfitStatus::Profit);
    }

    #[test]
    fn test_view_state_initial_covers_last_30_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let view = ViewState::initial(today);
        assert_eq!(view.period, "day");
        assert_eq!(view.start_date, "2024-03-01");
        assert_eq!(view.end_date, "2024-03-31");

        let filter = view.to_filter().unwrap();
        assert_eq!(filter.period, Period::Day);
        assert!(filter.range.is_some());
    }

    #[test]
    fn test_view_state_capture_round_trip() {
        let filter = PeriodFilter::period(Period::Month);
        let saved_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let view = ViewState::capture(&filter, saved_at);
        assert_eq!(view.period, "month");
        assert_eq!(view.start_date, "");
        assert_eq!(view.timestamp, "2024-05-01T08:00:00.000Z");
        assert_eq!(view.to_filter().unwrap(), filter);
    }

    #[test]
    fn test_view_state_rejects_bad_dates() {
        let view = ViewState {
            period: "day".to_string(),
            start_date: "yesterday".to_string(),
            end_date: "2024-01-01".to_string(),
            timestamp: String::new(),
        };
        assert!(view.to_filter().is_err());
    }
}
