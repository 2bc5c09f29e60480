//! # Change Watcher
//!
//! Notices when another process writes a stored key.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ChangeWatcher Flow                                 │
//! │                                                                         │
//! │  duka sale record ...          duka watch                               │
//! │       │                            │                                    │
//! │       │ set_item("salesData")      │ every poll interval:               │
//! │       ▼                            ▼                                    │
//! │  local_storage.revision += 1   revision("salesData")                    │
//! │                                    │                                    │
//! │                                    ├── same as last?  keep waiting      │
//! │                                    └── different?     StorageEvent      │
//! │                                                       → rebuild report  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write bumps the key's revision, so content-identical rewrites are
//! reported too. Deleting the key is reported as a change to `None`.
//! Revisions survive removal, so a remove followed by a re-create inside one
//! poll interval still reads as a change.

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::debug;

use crate::error::DbResult;
use crate::storage::Storage;

/// Default poll interval for `duka watch`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A stored key was written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// Revision after the change. `None` if the key was removed.
    pub revision: Option<i64>,
}

/// Polls one key's revision and yields an event whenever it changes.
#[derive(Debug)]
pub struct ChangeWatcher<S> {
    storage: S,
    key: String,
    last_revision: Option<i64>,
    ticker: Interval,
}

impl<S: Storage> ChangeWatcher<S> {
    /// Starts watching `key`. Changes made before this call are not reported.
    pub async fn new(storage: S, key: impl Into<String>, poll_interval: Duration) -> DbResult<Self> {
        let key = key.into();
        let last_revision = storage.revision(&key).await?;

        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(key = %key, revision = ?last_revision, "Watching key");
        Ok(ChangeWatcher {
            storage,
            key,
            last_revision,
            ticker,
        })
    }

    /// The key being watched.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Waits for the next change.
    ///
    /// Cancel-safe: dropping the future loses no change, the next call
    /// picks it up.
    pub async fn next_change(&mut self) -> DbResult<StorageEvent> {
        loop {
            self.ticker.tick().await;

            let revision = self.storage.revision(&self.key).await?;
            if revision != self.last_revision {
                debug!(key = %self.key, from = ?self.last_revision, to = ?revision, "Key changed");
                self.last_revision = revision;
                return Ok(StorageEvent {
                    key: self.key.clone(),
                    revision,
                });
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
