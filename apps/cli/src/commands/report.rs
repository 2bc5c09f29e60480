//! # Report Commands
//!
//! `report`, `drill` and `watch` all run the same pipeline over a fresh
//! load of the sales:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  selection (flags │ saved view │ initial view)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.sales().load_all()  ──►  SalesReport::build(records, filter, now)   │
//! │                                   │                                     │
//! │           ┌───────────────────────┼───────────────────────┐             │
//! │           ▼                       ▼                       ▼             │
//! │        report                   drill                   watch           │
//! │   summary + table +       rows of one period     report, then again     │
//! │        chart                                     on every sales change  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use duka_core::{SalesReport, SALES_KEY};
use duka_store::ChangeWatcher;
use std::io::Write;
use tracing::{debug, info, warn};

use super::{emit, emit_json, Context};
use crate::cli::SelectionArgs;
use crate::error::{AppError, AppResult};

/// Loads the sales and builds the report for `selection`.
pub async fn build_report(ctx: &Context, selection: &SelectionArgs) -> AppResult<SalesReport> {
    let filter = ctx.resolve_filter(selection).await?;
    let sales = ctx.db.sales().load_all().await?;
    let report = SalesReport::build(&sales, &filter, &ctx.now(), &ctx.locale());

    debug!(
        period = %filter.period,
        loaded = sales.len(),
        matched = report.filtered.len(),
        groups = report.groups.len(),
        "Built report"
    );
    Ok(report)
}

/// `duka report`
pub async fn report<W: Write>(
    ctx: &Context,
    selection: &SelectionArgs,
    json: bool,
    out: &mut W,
) -> AppResult<()> {
    let report = build_report(ctx, selection).await?;
    if json {
        emit_json(out, &report)
    } else {
        emit(out, &ctx.renderer().report(&report))
    }
}

/// `duka drill <ROW>`
///
/// `row` is the 1-based number printed in the report table.
pub async fn drill<W: Write>(
    ctx: &Context,
    row: usize,
    selection: &SelectionArgs,
    json: bool,
    out: &mut W,
) -> AppResult<()> {
    let index = row
        .checked_sub(1)
        .ok_or_else(|| AppError::validation("Row numbers start at 1"))?;

    let report = build_report(ctx, selection).await?;
    let group = report.drill_down(index).map_err(|e| {
        warn!(row, periods = report.groups.len(), "Drill-down row out of range");
        AppError::from(e)
    })?;
    let rows = report.drill_down_rows(index)?;

    if json {
        emit_json(out, &rows)
    } else {
        emit(out, &ctx.renderer().drill_down(&group.period, &rows))
    }
}

/// `duka watch`
///
/// Prints the report, then reprints it whenever `salesData` is written,
/// until Ctrl-C.
pub async fn watch<W: Write>(ctx: &Context, selection: &SelectionArgs, out: &mut W) -> AppResult<()> {
    let mut watcher =
        ChangeWatcher::new(ctx.db.storage(), SALES_KEY, ctx.config.poll_interval()).await?;

    report(ctx, selection, false, out).await?;
    info!(interval = ?ctx.config.poll_interval(), "Watching sales for changes (Ctrl-C to stop)");

    loop {
        tokio::select! {
            event = watcher.next_change() => {
                let event = event?;
                debug!(key = %event.key, revision = ?event.revision, "Sales changed, rebuilding report");
                emit(out, "\n")?;
                report(ctx, selection, false, out).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
