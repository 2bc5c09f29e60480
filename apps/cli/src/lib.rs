//! # Duka Ledger CLI
//!
//! The `duka` command line tool: period reports over recorded sales, plus
//! stock keeping and JSON backups.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          duka <command>                                 │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize tracing (stderr, RUST_LOG or -v)                         │
//! │  3. Load config: defaults → config.toml → DUKA_* env → validate         │
//! │  4. Resolve database path: --db → config → platform data dir            │
//! │  5. Open SQLite, run migrations                                         │
//! │  6. Dispatch command, write output to stdout                            │
//! │  7. Close the pool                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use duka_store::{Database, DbConfig};
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use cli::Cli;
use commands::Context;
use config::AppConfig;
use error::AppResult;

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so that stdout carries only command output.
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,duka=debug,sqlx=warn"
    } else {
        "warn,duka=info,sqlx=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs one invocation of the tool.
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let path = config.database_path(cli.db.as_deref())?;
    info!(?path, "Opening database");

    let db = Database::new(DbConfig::new(path)).await?;
    let ctx = Context::new(db.clone(), config);

    let mut stdout = io::stdout().lock();
    let result = commands::dispatch(&ctx, cli.command, &mut stdout).await;

    db.close().await;
    result
}
