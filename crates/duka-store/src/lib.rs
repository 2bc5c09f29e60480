//! # duka-store: Storage Layer for Duka Ledger
//!
//! Everything that reads or writes the persisted documents lives here.
//! The documents are JSON text kept in a SQLite key/value table, one row per
//! key, written with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka Ledger Data Flow                            │
//! │                                                                         │
//! │  duka report / sale / inventory / data / view                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   duka-store (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  Sales         │    │  (embedded)  │  │   │
//! │  │   │               │    │  Inventory     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  ViewState     │    │ 001_local_   │  │   │
//! │  │   │               │    │                │    │ storage.sql  │  │   │
//! │  │   └───────────────┘    └───────┬────────┘    └──────────────┘  │   │
//! │  │                                │ trait Storage                  │   │
//! │  │                      SqliteStorage · MemoryStorage              │   │
//! │  │                                                                 │   │
//! │  │   ChangeWatcher: polls a key's revision for `duka watch`        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite: local_storage(key, value, revision, updated_at)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`storage`] - The key/value `Storage` trait and its implementations
//! - [`repository`] - One repository per stored document
//! - [`watch`] - Change notification by revision polling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duka_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/duka.db")).await?;
//!
//! let sales = db.sales().load_all().await?;
//! let items = db.inventory().load_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;
pub mod watch;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use watch::{ChangeWatcher, StorageEvent, DEFAULT_POLL_INTERVAL};

// Repository re-exports for convenience
pub use repository::{ImportOutcome, InventoryRepository, SalesRepository, ViewStateRepository};
