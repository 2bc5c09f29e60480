//! Command line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use duka_core::{DateRange, ImportMode, Period, PeriodFilter, ViewState};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "duka", version)]
#[command(about = "Sales and inventory ledger with period reports")]
pub struct Cli {
    /// Config file (default: config.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config file and DUKA_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summary, period table and profit chart
    Report {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the sales behind one row of the report
    Drill {
        /// Row number as printed by `report` (starting at 1)
        row: usize,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the report and reprint it whenever the sales change
    Watch {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Manage recorded sales
    Sale {
        #[command(subcommand)]
        action: SaleCommand,
    },

    /// Manage stock items
    Inventory {
        #[command(subcommand)]
        action: InventoryCommand,
    },

    /// Back up and restore the sales collection
    Data {
        #[command(subcommand)]
        action: DataCommand,
    },

    /// Manage the saved report selection
    View {
        #[command(subcommand)]
        action: ViewCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SaleCommand {
    /// List all sales
    List {
        #[arg(long)]
        json: bool,
    },

    /// Record a sale from stock
    Record {
        /// Inventory item id
        #[arg(long)]
        item: String,

        /// Units sold
        #[arg(long)]
        quantity: i64,
    },

    /// Delete a sale by id
    Delete {
        /// Sale id (as shown by `drill` or `sale list`)
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
    /// List stock with potential profit
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a stock item
    Add {
        #[arg(long)]
        name: String,

        /// Buying price per unit
        #[arg(long)]
        buy: String,

        /// Selling price per unit
        #[arg(long)]
        sell: String,

        /// Units in stock
        #[arg(long)]
        quantity: i64,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a stock item by id
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommand {
    /// Write all sales to a JSON backup
    Export {
        /// Output file, `-` for stdout (default: sales-backup-YYYY-MM-DD.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Load sales from a JSON backup
    Import {
        file: PathBuf,

        /// replace: the file becomes the sales collection;
        /// merge: sales with new ids are appended
        #[arg(long)]
        mode: ImportMode,
    },
}

#[derive(Subcommand, Debug)]
pub enum ViewCommand {
    /// Save a selection for later reports
    Save {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Show the saved selection
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Forget the saved selection
    Clear,
}

// =============================================================================
// Report Selection
// =============================================================================

/// Which sales a report covers and how rows are grouped.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Grouping period: day, week, month or all
    #[arg(short, long)]
    pub period: Option<Period>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), inclusive
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

impl SelectionArgs {
    /// Whether anything was given on the command line.
    pub fn is_explicit(&self) -> bool {
        self.period.is_some() || self.range().is_some()
    }

    pub fn range(&self) -> Option<DateRange> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(DateRange::new(from, to)),
            _ => None,
        }
    }

    /// The filter given on the command line.
    ///
    /// A range without `--period` is reported as a single "All Time" row.
    pub fn to_filter(&self) -> PeriodFilter {
        let range = self.range();
        let period = self.period.unwrap_or(Period::All);
        PeriodFilter { period, range }
    }

    /// The command line selection, else the saved one, else the initial
    /// view (daily rows over the last 30 days).
    pub fn resolve(&self, saved: Option<ViewState>, today: NaiveDate) -> duka_core::CoreResult<PeriodFilter> {
        if self.is_explicit() {
            return Ok(self.to_filter());
        }
        saved
            .unwrap_or_else(|| ViewState::initial(today))
            .to_filter()
    }
}
