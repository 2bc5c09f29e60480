//! # Repository Module
//!
//! One repository per stored document.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over Storage                            │
//! │                                                                         │
//! │  CLI command                                                            │
//! │       │  db.sales().load_all()                                          │
//! │       ▼                                                                 │
//! │  SalesRepository<S>        "salesData"          normalize on read       │
//! │  InventoryRepository<S>    "inventoryItems"     lenient on read         │
//! │  ViewStateRepository<S>    "analysisViewState"  corrupt → None          │
//! │       │                                                                 │
//! │       │  get_item / set_item                                            │
//! │       ▼                                                                 │
//! │  S: Storage  (SqliteStorage | MemoryStorage)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads never rewrite the store. Only explicit operations (record, delete,
//! import, save) write.

use serde_json::Value;
use tracing::warn;

use crate::error::{DbError, DbResult};
use crate::storage::Storage;

pub mod inventory;
pub mod sales;
pub mod view_state;

pub use inventory::InventoryRepository;
pub use sales::{ImportOutcome, SalesRepository};
pub use view_state::ViewStateRepository;

/// How a stored array document is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    /// For reports: anything unreadable counts as empty.
    Lenient,
    /// Before a write: refuse to overwrite something that isn't an array.
    Strict,
}

/// Reads the JSON array stored under `key`. A missing key is empty.
async fn read_array<S: Storage>(storage: &S, key: &str, mode: ReadMode) -> DbResult<Vec<Value>> {
    let Some(text) = storage.get_item(key).await? else {
        return Ok(Vec::new());
    };

    let reason = match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => return Ok(items),
        Ok(_) => "not a JSON array".to_string(),
        Err(e) => e.to_string(),
    };

    match mode {
        ReadMode::Lenient => {
            warn!(key, %reason, "Stored document unreadable, treating as empty");
            Ok(Vec::new())
        }
        ReadMode::Strict => Err(DbError::corrupt(key, reason)),
    }
}

/// Writes `value` as JSON under `key`.
async fn write_json<S, T>(storage: &S, key: &str, value: &T) -> DbResult<()>
where
    S: Storage,
    T: serde::Serialize + ?Sized,
{
    let text = serde_json::to_string(value)?;
    storage.set_item(key, &text).await
}
