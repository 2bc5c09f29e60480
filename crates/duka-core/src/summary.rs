//! # Summary & Chart Series
//!
//! Headline totals for the filtered set, the per-period chart series and
//! the profit classification shared by rows, groups and the summary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grouping::PeriodGroup;
use crate::money::Money;
use crate::normalize::total_quantity;
use crate::types::SaleRecord;

/// Up to this many points the chart is drawn as bars; beyond it, a line.
pub const BAR_CHART_MAX_POINTS: usize = 8;

// =============================================================================
// Profit Status
// =============================================================================

/// Sign of a profit figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitStatus {
    Profit,
    Loss,
    BreakEven,
}

impl ProfitStatus {
    pub fn classify(amount: Money) -> Self {
        if amount.is_positive() {
            ProfitStatus::Profit
        } else if amount.is_negative() {
            ProfitStatus::Loss
        } else {
            ProfitStatus::BreakEven
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfitStatus::Profit => "Profit",
            ProfitStatus::Loss => "Loss",
            ProfitStatus::BreakEven => "Break even",
        }
    }
}

impl fmt::Display for ProfitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Headline totals of a record set.
///
/// `net_profit` is recomputed as `total_sales - total_cost`; it is NOT the
/// sum of stored `profitLoss` values and may differ from the group profits
/// for legacy data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_cost: Money,
    pub total_sales: Money,
    pub total_items: i64,
    pub net_profit: Money,
}

impl SalesSummary {
    pub fn from_records(records: &[SaleRecord]) -> Self {
        let total_cost: Money = records.iter().map(|r| r.total_cost).sum();
        let total_sales: Money = records.iter().map(|r| r.total_sale).sum();
        let total_items = total_quantity(records.iter().map(|r| r.quantity));
        SalesSummary {
            total_cost,
            total_sales,
            total_items,
            net_profit: total_sales - total_cost,
        }
    }

    pub fn status(&self) -> ProfitStatus {
        ProfitStatus::classify(self.net_profit)
    }
}

// =============================================================================
// Chart Series
// =============================================================================

/// How the series should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

impl ChartKind {
    pub fn for_points(points: usize) -> Self {
        if points > BAR_CHART_MAX_POINTS {
            ChartKind::Line
        } else {
            ChartKind::Bar
        }
    }
}

/// Profit per period, aligned with the group order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Money>,
}

impl ChartSeries {
    pub fn from_groups(groups: &[PeriodGroup]) -> Self {
        ChartSeries {
            labels: groups.iter().map(|g| g.period.clone()).collect(),
            values: groups.iter().map(|g| g.profit).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn kind(&self) -> ChartKind {
        ChartKind::for_points(self.len())
    }

    /// `(label, value)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (&str, Money)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
