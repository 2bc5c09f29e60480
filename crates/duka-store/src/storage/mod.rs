//! # Key/Value Storage
//!
//! The persistence seam every repository is written against.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          trait Storage                                  │
//! │       get_item · set_item · remove_item · revision                      │
//! │                                                                         │
//! │   ┌──────────────────────────┐      ┌──────────────────────────┐       │
//! │   │      SqliteStorage       │      │      MemoryStorage       │       │
//! │   │  local_storage table     │      │  HashMap behind RwLock   │       │
//! │   │  (the `duka` binary)     │      │  (tests, dry runs)       │       │
//! │   └──────────────────────────┘      └──────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings (JSON documents in practice). Every successful
//! `set_item` or `remove_item` bumps the key's revision so that watchers can
//! notice writes made by another process. A key's revision never goes back,
//! even across a remove and a later set.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// String-keyed document storage.
#[async_trait]
pub trait Storage: Send + Sync + Debug {
    /// Returns the value under `key`, or `None` if it was never set.
    async fn get_item(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`. Returns whether anything was removed.
    async fn remove_item(&self, key: &str) -> DbResult<bool>;

    /// Write counter of `key`; `None` while the key is absent.
    async fn revision(&self, key: &str) -> DbResult<Option<i64>>;
}
