//! # duka-core: Pure Reporting Logic for Duka Ledger
//!
//! This crate turns the stored sales list of a small shop into reports. It
//! contains all domain logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Duka Ledger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       duka (CLI)                                │   │
//! │  │    report ─ drill ─ watch ─ sale ─ inventory ─ data ─ view      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ duka-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ normalize │─►│  period   │─►│ grouping  │─►│  summary  │  │   │
//! │  │   │ StoredSale│  │  filter   │  │PeriodGroup│  │  series   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   import · inventory · validation · money                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 duka-store (Storage Layer)                      │   │
//! │  │          key/value documents in SQLite, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`normalize`] - Repairs stored records into [`SaleRecord`]s
//! - [`period`] - Day/week/month/range filtering
//! - [`grouping`] - Period buckets with totals
//! - [`summary`] - Headline totals, chart series, profit status
//! - [`report`] - The whole pipeline plus drill-down
//! - [`import`] - Replace/merge import and export rules
//! - [`inventory`] - Stock valuation and sales from stock
//! - [`money`] - Integer cents with currency formatting
//! - [`validation`] - Rules for user input
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use duka_core::{normalize_sales, DateLocale, DateRange, Period, PeriodFilter, SalesReport};
//! use serde_json::json;
//!
//! let stored = vec![json!({
//!     "saleId": 1, "itemName": "Soap", "quantitySold": 2,
//!     "totalCost": 100, "totalSale": 150, "profit": 50,
//!     "saleDate": "2024-01-01T10:00:00Z"
//! })];
//! let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
//! let records = normalize_sales(stored, &now);
//!
//! let filter = PeriodFilter::period(Period::Day)
//!     .with_range(DateRange::last_days(now.date_naive(), 30));
//! let report = SalesReport::build(&records, &filter, &now, &DateLocale::default());
//! assert_eq!(report.groups[0].period, "01/01/2024");
//! assert_eq!(report.summary.net_profit.cents(), 5_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod grouping;
pub mod import;
pub mod inventory;
pub mod money;
pub mod normalize;
pub mod period;
pub mod report;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use grouping::{group_by_period, DateLocale, PeriodGroup, ALL_TIME_LABEL, INVALID_DATE_LABEL};
pub use import::{export_document, export_file_name, merge_sales, parse_import, ImportMode, MergeOutcome};
pub use inventory::{InventoryItem, InventoryValuation};
pub use money::{CurrencyFormat, Money};
pub use normalize::{normalize_sales, normalize_sales_with_report, MigrationReport, StoredSale};
pub use period::{filter_by_period, parse_sale_date, DateRange, Period, PeriodFilter};
pub use report::{DrillDownRow, SalesReport};
pub use summary::{ChartKind, ChartSeries, ProfitStatus, SalesSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the sales collection.
pub const SALES_KEY: &str = "salesData";

/// Storage key of the inventory collection.
pub const INVENTORY_KEY: &str = "inventoryItems";

/// Storage key of the saved report selection.
pub const VIEW_STATE_KEY: &str = "analysisViewState";

/// Length of the window shown when no view has been saved.
pub const DEFAULT_RANGE_DAYS: u64 = 30;
