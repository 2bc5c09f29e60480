//! # Period Filter
//!
//! Restricts sales to a calendar window.
//!
//! ## Window Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PeriodFilter → Window                             │
//! │                                                                         │
//! │  range = Some(start..=end) ──► [start 00:00:00.000, end 23:59:59.999]   │
//! │        (wins over period)                                               │
//! │                                                                         │
//! │  range = None:                                                          │
//! │    Period::Day   ──► [today 00:00,              ∞)                      │
//! │    Period::Week  ──► [last Sunday 00:00,        ∞)                      │
//! │    Period::Month ──► [1st of this month 00:00,  ∞)                      │
//! │    Period::All   ──► no filtering (invalid dates included)              │
//! │                                                                         │
//! │  All boundaries are LOCAL wall-clock times in the caller's zone.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A record whose date does not parse is excluded from every bounded window.

use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreResult, ValidationError};
use crate::types::SaleRecord;

// =============================================================================
// Period
// =============================================================================

/// Granularity used both to bound the window and to group rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Period {
    Day,
    Week,
    Month,
    #[default]
    All,
}

impl Period {
    /// Parses a period name. Anything unrecognized means [`Period::All`].
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::Period;
    ///
    /// assert_eq!(Period::parse("week"), Period::Week);
    /// assert_eq!(Period::parse("fortnight"), Period::All);
    /// ```
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Period::Day,
            "week" => Period::Week,
            "month" => Period::Month,
            _ => Period::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Period::parse(s))
    }
}

impl From<String> for Period {
    fn from(value: String) -> Self {
        Period::parse(&value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.as_str().to_string()
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The `days` days before `today`, through `today`.
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(today);
        DateRange { start, end: today }
    }

    /// Parses a pair of `YYYY-MM-DD` strings.
    ///
    /// A range only applies when BOTH ends are given; if either is empty
    /// the result is `Ok(None)`.
    ///
    /// ## Errors
    /// `ValidationError::InvalidFormat` if a non-empty end does not parse.
    pub fn parse(start: &str, end: &str) -> CoreResult<Option<Self>> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Ok(None);
        }
        let start = parse_calendar_date("startDate", start)?;
        let end = parse_calendar_date("endDate", end)?;
        Ok(Some(DateRange { start, end }))
    }
}

fn parse_calendar_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("expected YYYY-MM-DD, got '{}'", value),
    })
}

// =============================================================================
// Period Filter
// =============================================================================

/// What the report is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub period: Period,
    pub range: Option<DateRange>,
}

impl PeriodFilter {
    /// A filter with no explicit range.
    pub fn period(period: Period) -> Self {
        PeriodFilter {
            period,
            range: None,
        }
    }

    /// Sets the explicit range (which takes precedence over `period`).
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Resolves the window relative to `now`.
    ///
    /// Returns `None` when nothing should be filtered out. Otherwise the
    /// inclusive lower bound and an optional inclusive upper bound.
    pub fn window<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Option<(DateTime<Utc>, Option<DateTime<Utc>>)> {
        let tz = now.timezone();

        if let Some(range) = self.range {
            let lower = local_start_of_day(&tz, range.start);
            let upper = local_end_of_day(&tz, range.end);
            return Some((lower, Some(upper)));
        }

        let today = now.date_naive();
        let first_day = match self.period {
            Period::All => return None,
            Period::Day => today,
            Period::Week => week_start(today),
            Period::Month => today.with_day(1).unwrap_or(today),
        };
        Some((local_start_of_day(&tz, first_day), None))
    }
}

/// Keeps the records that fall inside the filter's window, in input order.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use duka_core::{filter_by_period, Period, PeriodFilter};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
/// let kept = filter_by_period(&[], &PeriodFilter::period(Period::Day), &now);
/// assert!(kept.is_empty());
/// ```
pub fn filter_by_period<Tz: TimeZone>(
    records: &[SaleRecord],
    filter: &PeriodFilter,
    now: &DateTime<Tz>,
) -> Vec<SaleRecord> {
    let Some((lower, upper)) = filter.window(now) else {
        return records.to_vec();
    };
    let tz = now.timezone();

    records
        .iter()
        .filter(|record| match record.parsed_date(&tz) {
            Some(date) => date >= lower && upper.map_or(true, |upper| date <= upper),
            None => false,
        })
        .cloned()
        .collect()
}

// =============================================================================
// Calendar Helpers
// =============================================================================

/// The Sunday on or before `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Local midnight of `date`, as an instant.
pub(crate) fn local_start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last millisecond of `date` in local time, as an instant.
pub(crate) fn local_end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    resolve_local(tz, date.and_time(last))
}

/// Maps a wall-clock time to an instant.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times
/// inside a DST gap are pushed forward by an hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    if let Some(local) = tz.from_local_datetime(&naive).earliest() {
        return local.with_timezone(&Utc);
    }
    let shifted = naive + chrono::Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

// =============================================================================
// Sale Date Parsing
// =============================================================================

/// Offset-less layouts accepted for stored timestamps, read as local time.
const LOCAL_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a stored `saleDate`.
///
/// ## Accepted Forms
/// ```text
/// 2024-01-01T10:00:00.000Z       RFC 3339 with offset   → as given
/// 2024-01-01T13:00:00+03:00      RFC 3339 with offset   → as given
/// 2024-01-01T10:00:00            no offset              → local time in `tz`
/// 2024-01-01                     date only              → UTC midnight
/// ```
///
/// Returns `None` for anything else (including the empty string).
pub fn parse_sale_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in LOCAL_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    // A bare date is an ISO date-only form, which is UTC
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

// =============================================================================
// Unit Tests
// =============================================================================
