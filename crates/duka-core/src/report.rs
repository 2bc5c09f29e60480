//! # Sales Report
//!
//! The whole reporting pipeline in one call.
//!
//! ```text
//! records ──► filter_by_period ──► group_by_period ──► ChartSeries
//!                    │
//!                    └──────────► SalesSummary
//! ```
//!
//! The report is rebuilt from scratch whenever anything changes; it holds
//! no state beyond its inputs.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::grouping::{group_by_period, DateLocale, PeriodGroup};
use crate::money::Money;
use crate::period::{filter_by_period, PeriodFilter};
use crate::summary::{ChartSeries, ProfitStatus, SalesSummary};
use crate::types::{RecordId, SaleRecord};

/// Everything a report screen needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub filter: PeriodFilter,
    /// Records inside the filter window, in stored order.
    pub filtered: Vec<SaleRecord>,
    /// Groups by `filter.period`, in first-seen order.
    pub groups: Vec<PeriodGroup>,
    pub summary: SalesSummary,
    pub series: ChartSeries,
}

impl SalesReport {
    /// Runs filter, grouping, summary and series for `records`.
    ///
    /// Rows are grouped by the filter's period even when an explicit range
    /// drives the window.
    pub fn build<Tz: TimeZone>(
        records: &[SaleRecord],
        filter: &PeriodFilter,
        now: &DateTime<Tz>,
        locale: &DateLocale,
    ) -> Self {
        let filtered = filter_by_period(records, filter, now);
        let groups = group_by_period(&filtered, filter.period, &now.timezone(), locale);
        let summary = SalesSummary::from_records(&filtered);
        let series = ChartSeries::from_groups(&groups);

        SalesReport {
            filter: *filter,
            filtered,
            groups,
            summary,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// The group at `index` (0-based, in report order).
    ///
    /// ## Errors
    /// `CoreError::PeriodIndexOutOfRange` if there is no such row.
    pub fn drill_down(&self, index: usize) -> CoreResult<&PeriodGroup> {
        self.groups
            .get(index)
            .ok_or(CoreError::PeriodIndexOutOfRange {
                index,
                len: self.groups.len(),
            })
    }

    /// Per-record rows of the group at `index`.
    pub fn drill_down_rows(&self, index: usize) -> CoreResult<Vec<DrillDownRow>> {
        let group = self.drill_down(index)?;
        Ok(group.sales_data.iter().map(DrillDownRow::from).collect())
    }
}

/// One record of a drill-down table.
///
/// `id` is what a delete action is keyed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownRow {
    pub id: RecordId,
    pub item_name: String,
    pub quantity: i64,
    pub total_cost: Money,
    pub total_sale: Money,
    pub profit_loss: Money,
    pub status: ProfitStatus,
}

impl From<&SaleRecord> for DrillDownRow {
    fn from(record: &SaleRecord) -> Self {
        DrillDownRow {
            id: record.id.clone(),
            item_name: record.item_name.clone(),
            quantity: record.quantity,
            total_cost: record.total_cost,
            total_sale: record.total_sale,
            profit_loss: record.profit_loss,
            status: record.status(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_sales;
    use crate::period::{DateRange, Period};
    use chrono::Utc;
    use serde_json::json;

    fn soap_records() -> Vec<SaleRecord> {
        let raw = vec![
            json!({"itemName": "Soap", "quantity": 2, "totalCost": 100, "totalSale": 150,
                   "profitLoss": 50, "saleDate": "2024-01-01T10:00:00Z"}),
            json!({"itemName": "Soap", "quantity": 1, "totalCost": 50, "totalSale": 80,
                   "profitLoss": 30, "saleDate": "2024-01-02T10:00:00Z"}),
        ];
        normalize_sales(raw, &Utc::now())
    }

    #[test]
    fn test_soap_scenario_grouped_by_day() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let filter = PeriodFilter::period(Period::Day)
            .with_range(DateRange::parse("2024-01-01", "2024-01-31").unwrap().unwrap());

        let report = SalesReport::build(&soap_records(), &filter, &now, &DateLocale::default());

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].period, "01/01/2024");
        assert_eq!(report.groups[0].items, 2);
        assert_eq!(report.groups[1].period, "02/01/2024");
        assert_eq!(report.groups[1].items, 1);

        assert_eq!(report.summary.total_items, 3);
        assert_eq!(report.summary.net_profit, Money::from_cents(8_000));
        assert_eq!(report.series.labels, vec!["01/01/2024", "02/01/2024"]);
        assert_eq!(
            report.series.values,
            vec![Money::from_cents(5_000), Money::from_cents(3_000)]
        );
    }

    #[test]
    fn test_partition_totality() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let records = soap_records();
        let report = SalesReport::build(
            &records,
            &PeriodFilter::period(Period::Week),
            &now,
            &DateLocale::default(),
        );
        // Both sales fall before this week's Sunday (2024-01-14)
        assert!(report.is_empty());

        let report = SalesReport::build(
            &records,
            &PeriodFilter::period(Period::All),
            &now,
            &DateLocale::default(),
        );
        let members: Vec<SaleRecord> = report
            .groups
            .iter()
            .flat_map(|g| g.sales_data.iter().cloned())
            .collect();
        assert_eq!(members, records);
    }

    #[test]
    fn test_drill_down_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let report = SalesReport::build(
            &soap_records(),
            &PeriodFilter::period(Period::All),
            &now,
            &DateLocale::default(),
        );

        let rows = report.drill_down_rows(0).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, ProfitStatus::Profit);

        let err = report.drill_down(1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PeriodIndexOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn test_empty_input_is_total() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let report = SalesReport::build(&[], &PeriodFilter::default(), &now, &DateLocale::default());
        assert!(report.groups.is_empty());
        assert!(report.series.is_empty());
        assert_eq!(report.summary, SalesSummary::default());
        assert!(report.drill_down(0).is_err());
    }
}
