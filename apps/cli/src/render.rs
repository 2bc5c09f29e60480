//! # Console Rendering
//!
//! Turns reports into text. Everything returns a `String` so commands stay
//! free of formatting and tests can look at the output.
//!
//! ## Report Layout
//! ```text
//! Grouped by day, 2024-03-01 to 2024-03-31
//!
//! Total Sales   Ksh 1,500.00
//! Total Cost    Ksh 1,000.00
//! Net Profit    Ksh 500.00 (Profit)
//! Items Sold    12
//!
//! ╭───┬────────────┬───────┬──────────────┬──────────────┬────────────┬────────╮
//! │ # │ Period     │ Items │ Cost         │ Sales        │ Profit     │ Status │
//! ├───┼────────────┼───────┼──────────────┼──────────────┼────────────┼────────┤
//! │ 1 │ 01/03/2024 │ 5     │ Ksh 400.00   │ Ksh 600.00   │ Ksh 200.00 │ Profit │
//! ╰───┴────────────┴───────┴──────────────┴──────────────┴────────────┴────────╯
//!
//! Profit by period (bar chart)
//! 01/03/2024 │████████████████████ Ksh 200.00
//! ```

use duka_core::{
    ChartKind, ChartSeries, CurrencyFormat, DrillDownRow, InventoryItem, InventoryValuation,
    Money, PeriodFilter, PeriodGroup, SaleRecord, SalesReport, SalesSummary,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Shown instead of tables when the selection holds no sales.
pub const EMPTY_REPORT: &str = "No sales data for selected period";

/// Longest bar of the profit chart, in characters.
const CHART_WIDTH: u64 = 40;

// =============================================================================
// Table Rows
// =============================================================================

#[derive(Debug, Tabled)]
struct GroupRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Items")]
    items: i64,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Debug, Tabled)]
struct DrillRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Sale")]
    sale: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Debug, Tabled)]
struct SaleRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Sale")]
    sale: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

#[derive(Debug, Tabled)]
struct InventoryRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Buy")]
    buy: String,
    #[tabled(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Stock")]
    quantity: i64,
    #[tabled(rename = "Potential Profit")]
    potential_profit: String,
}

// =============================================================================
// Renderer
// =============================================================================

/// Formats domain values for the console.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    currency: CurrencyFormat,
}

impl Renderer {
    pub fn new(currency: CurrencyFormat) -> Self {
        Renderer { currency }
    }

    fn money(&self, amount: Money) -> String {
        self.currency.format(amount)
    }

    /// Caption, summary, period table and chart.
    pub fn report(&self, report: &SalesReport) -> String {
        let mut out = caption(&report.filter);
        out.push_str("\n\n");

        if report.is_empty() {
            out.push_str(EMPTY_REPORT);
            out.push('\n');
            return out;
        }

        out.push_str(&self.summary(&report.summary));
        out.push('\n');
        out.push_str(&self.groups(&report.groups));
        out.push_str("\n\n");
        out.push_str(&self.chart(&report.series));
        out
    }

    pub fn summary(&self, summary: &SalesSummary) -> String {
        format!(
            "Total Sales   {}\nTotal Cost    {}\nNet Profit    {} ({})\nItems Sold    {}\n",
            self.money(summary.total_sales),
            self.money(summary.total_cost),
            self.money(summary.net_profit),
            summary.status(),
            summary.total_items,
        )
    }

    /// One row per period, numbered from 1 for `duka drill`.
    pub fn groups(&self, groups: &[PeriodGroup]) -> String {
        let rows = groups.iter().enumerate().map(|(idx, group)| GroupRow {
            row: idx + 1,
            period: group.period.clone(),
            items: group.items,
            cost: self.money(group.cost),
            sales: self.money(group.sales),
            profit: self.money(group.profit),
            status: group.status().to_string(),
        });
        Table::new(rows).with(Style::rounded()).to_string()
    }

    /// Horizontal bars scaled to the largest absolute profit.
    /// Losses are drawn with a lighter shade.
    pub fn chart(&self, series: &ChartSeries) -> String {
        let kind = match series.kind() {
            ChartKind::Bar => "bar chart",
            ChartKind::Line => "line chart",
        };
        let mut out = format!("Profit by period ({})\n", kind);

        let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = series
            .values
            .iter()
            .map(Money::unsigned_cents)
            .max()
            .unwrap_or(0);

        for (label, value) in series.points() {
            let length = bar_length(value.unsigned_cents(), max);
            let glyph = if value.is_negative() { "░" } else { "█" };
            out.push_str(&format!(
                "{:<width$} │{} {}\n",
                label,
                glyph.repeat(length),
                self.money(value),
                width = label_width
            ));
        }
        out
    }

    /// The records of one period.
    pub fn drill_down(&self, period: &str, rows: &[DrillDownRow]) -> String {
        let table_rows = rows.iter().map(|row| DrillRow {
            id: row.id.to_string(),
            item: row.item_name.clone(),
            quantity: row.quantity,
            cost: self.money(row.total_cost),
            sale: self.money(row.total_sale),
            profit: self.money(row.profit_loss),
            status: row.status.to_string(),
        });
        format!(
            "{} ({} sales)\n{}\n",
            period,
            rows.len(),
            Table::new(table_rows).with(Style::rounded())
        )
    }

    pub fn sales(&self, records: &[SaleRecord]) -> String {
        if records.is_empty() {
            return "No sales recorded\n".to_string();
        }
        let rows = records.iter().map(|record| SaleRow {
            id: record.id.to_string(),
            date: record.sale_date.clone(),
            item: record.item_name.clone(),
            quantity: record.quantity,
            sale: self.money(record.total_sale),
            profit: self.money(record.profit_loss),
        });
        format!("{}\n", Table::new(rows).with(Style::rounded()))
    }

    /// Stock table followed by the valuation totals.
    pub fn inventory(&self, items: &[InventoryItem]) -> String {
        if items.is_empty() {
            return "No inventory items\n".to_string();
        }
        let rows = items.iter().map(|item| InventoryRow {
            id: item.id.to_string(),
            name: item.name.clone(),
            buy: self.money(item.buy_price),
            sell: self.money(item.sell_price),
            quantity: item.quantity,
            potential_profit: self.money(item.potential_profit()),
        });
        format!(
            "{}\n\n{}",
            Table::new(rows).with(Style::rounded()),
            self.valuation(&InventoryValuation::from_items(items))
        )
    }

    pub fn valuation(&self, valuation: &InventoryValuation) -> String {
        format!(
            "Items             {}\nUnits in Stock    {}\nInvestment        {}\nRetail Value      {}\nPotential Profit  {}\n",
            valuation.item_count,
            valuation.total_units,
            self.money(valuation.investment),
            self.money(valuation.retail_value),
            self.money(valuation.potential_profit),
        )
    }
}

/// One line describing the selection.
pub fn caption(filter: &PeriodFilter) -> String {
    match filter.range {
        Some(range) => format!("Grouped by {}, {} to {}", filter.period, range.start, range.end),
        None => format!("Grouped by {}", filter.period),
    }
}

fn bar_length(value: u64, max: u64) -> usize {
    if value == 0 || max == 0 {
        return 0;
    }
    // Every non-zero value gets at least one cell
    let scaled = (u128::from(value) * u128::from(CHART_WIDTH) + u128::from(max) / 2) / u128::from(max);
    scaled.max(1) as usize
}

// =============================================================================
// Unit Tests
// =============================================================================
