//! # Period Grouping
//!
//! Buckets sales into labelled periods and totals each bucket.
//!
//! ## Labels
//! ```text
//! Period::Day    "01/01/2024"             (locale date)
//! Period::Week   "Week of 31/12/2023"     (Sunday that starts the week)
//! Period::Month  "January 2024"           (locale month + year)
//! Period::All    "All Time"
//! unparseable    "Invalid Date"           (any granularity except All)
//! ```
//!
//! Groups come out in the order their label was first seen while walking
//! the input. No sorting happens here.

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;
use crate::period::{week_start, Period};
use crate::summary::ProfitStatus;
use crate::types::SaleRecord;

/// Label of the single group produced by [`Period::All`].
pub const ALL_TIME_LABEL: &str = "All Time";

/// Label of the group collecting records whose date does not parse.
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

const WEEK_PREFIX: &str = "Week of ";

// =============================================================================
// Date Locale
// =============================================================================

/// How period labels are rendered.
///
/// Formats use `chrono` strftime syntax. The default is the en-KE
/// convention: day first, full month names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLocale {
    /// Used for day and week labels.
    pub date_format: String,
    /// Used for month labels.
    pub month_format: String,
}

impl Default for DateLocale {
    fn default() -> Self {
        DateLocale {
            date_format: "%d/%m/%Y".to_string(),
            month_format: "%B %Y".to_string(),
        }
    }
}

impl DateLocale {
    pub fn new(date_format: impl Into<String>, month_format: impl Into<String>) -> Self {
        DateLocale {
            date_format: date_format.into(),
            month_format: month_format.into(),
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    pub fn format_month(&self, date: NaiveDate) -> String {
        date.format(&self.month_format).to_string()
    }
}

// =============================================================================
// Period Group
// =============================================================================

/// One bucket of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodGroup {
    pub period: String,
    /// Sum of quantities.
    pub items: i64,
    pub cost: Money,
    pub sales: Money,
    /// Sum of stored `profitLoss` values (not `sales - cost`).
    pub profit: Money,
    /// Member records, in input order.
    pub sales_data: Vec<SaleRecord>,
}

impl PeriodGroup {
    fn new(period: String) -> Self {
        PeriodGroup {
            period,
            items: 0,
            cost: Money::zero(),
            sales: Money::zero(),
            profit: Money::zero(),
            sales_data: Vec::new(),
        }
    }

    fn push(&mut self, record: &SaleRecord) {
        self.items = self.items.saturating_add(record.quantity);
        self.cost += record.total_cost;
        self.sales += record.total_sale;
        self.profit += record.profit_loss;
        self.sales_data.push(record.clone());
    }

    pub fn status(&self) -> ProfitStatus {
        ProfitStatus::classify(self.profit)
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// The label a record is grouped under.
pub fn period_label<Tz: TimeZone>(
    record: &SaleRecord,
    period: Period,
    tz: &Tz,
    locale: &DateLocale,
) -> String {
    if period == Period::All {
        return ALL_TIME_LABEL.to_string();
    }
    let Some(instant) = record.parsed_date(tz) else {
        return INVALID_DATE_LABEL.to_string();
    };
    let local = instant.with_timezone(tz).date_naive();

    match period {
        Period::Day => locale.format_date(local),
        Period::Week => format!("{}{}", WEEK_PREFIX, locale.format_date(week_start(local))),
        Period::Month => locale.format_month(local.with_day(1).unwrap_or(local)),
        Period::All => ALL_TIME_LABEL.to_string(),
    }
}

/// Groups records by period label, preserving first-seen order.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use duka_core::{group_by_period, DateLocale, Period};
///
/// let groups = group_by_period(&[], Period::All, &Utc, &DateLocale::default());
/// assert!(groups.is_empty());
/// ```
pub fn group_by_period<Tz: TimeZone>(
    records: &[SaleRecord],
    period: Period,
    tz: &Tz,
    locale: &DateLocale,
) -> Vec<PeriodGroup> {
    let mut groups: Vec<PeriodGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let label = period_label(record, period, tz, locale);
        let slot = match index.get(&label) {
            Some(&slot) => slot,
            None => {
                groups.push(PeriodGroup::new(label.clone()));
                index.insert(label, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].push(record);
    }

    groups
}

// =============================================================================
// Unit Tests
// =============================================================================
