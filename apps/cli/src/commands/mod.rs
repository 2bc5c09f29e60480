//! # Commands
//!
//! One module per command group. Each handler takes the [`Context`] and
//! writes its output to the given writer, so tests can capture it.
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── Context + dispatch
//! ├── report.rs     ◄─── report, drill, watch
//! ├── sale.rs       ◄─── sale list / record / delete
//! ├── inventory.rs  ◄─── inventory list / add / delete
//! ├── data.rs       ◄─── data export / import
//! └── view.rs       ◄─── view save / show / clear
//! ```

use chrono::{DateTime, Local};
use duka_core::{DateLocale, PeriodFilter};
use duka_store::Database;
use std::io::Write;

use crate::cli::{Command, SelectionArgs};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render::Renderer;

pub mod data;
pub mod inventory;
pub mod report;
pub mod sale;
pub mod view;

/// Everything a command needs.
#[derive(Debug, Clone)]
pub struct Context {
    pub db: Database,
    pub config: AppConfig,
}

impl Context {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Context { db, config }
    }

    /// The current local time. Local calendar days drive every period.
    pub fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    pub fn locale(&self) -> DateLocale {
        self.config.locale()
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.config.currency())
    }

    /// The filter for a report: command line, else saved view, else the
    /// initial view.
    pub async fn resolve_filter(&self, selection: &SelectionArgs) -> AppResult<PeriodFilter> {
        let saved = if selection.is_explicit() {
            None
        } else {
            self.db.view_state().load().await?
        };
        Ok(selection.resolve(saved, self.now().date_naive())?)
    }
}

/// Runs one parsed command.
pub async fn dispatch<W: Write>(ctx: &Context, command: Command, out: &mut W) -> AppResult<()> {
    match command {
        Command::Report { selection, json } => report::report(ctx, &selection, json, out).await,
        Command::Drill {
            row,
            selection,
            json,
        } => report::drill(ctx, row, &selection, json, out).await,
        Command::Watch { selection } => report::watch(ctx, &selection, out).await,
        Command::Sale { action } => sale::run(ctx, action, out).await,
        Command::Inventory { action } => inventory::run(ctx, action, out).await,
        Command::Data { action } => data::run(ctx, action, out).await,
        Command::View { action } => view::run(ctx, action, out).await,
    }
}

/// Writes `text` to the command output.
pub(crate) fn emit<W: Write>(out: &mut W, text: &str) -> AppResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| AppError::new(crate::error::ErrorCode::Internal, format!("Failed to write output: {}", e)))
}

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn emit_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> AppResult<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    emit(out, &text)
}
