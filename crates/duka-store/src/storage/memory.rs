//! # In-Memory Storage
//!
//! [`Storage`] held in a map, for tests and for running the pipeline
//! without a database file. Clones share the same map.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::Storage;
use crate::error::DbResult;

/// `value` is `None` once removed; the revision keeps counting.
#[derive(Debug, Clone)]
struct Entry {
    value: Option<String>,
    revision: i64,
}

/// Storage kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with `key → value` pairs.
    pub async fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        {
            let mut entries = storage.entries.write().await;
            for (key, value) in items {
                entries.insert(
                    key.into(),
                    Entry {
                        value: Some(value.into()),
                        revision: 1,
                    },
                );
            }
        }
        storage
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).and_then(|entry| entry.value.clone()))
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        let mut entries = self.entries.write().await;
        let revision = entries.get(key).map_or(1, |entry| entry.revision + 1);
        entries.insert(
            key.to_string(),
            Entry {
                value: Some(value.to_string()),
                revision,
            },
        );
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> DbResult<bool> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if entry.value.is_some() => {
                entry.value = None;
                entry.revision += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revision(&self, key: &str) -> DbResult<Option<i64>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.value.is_some())
            .map(|entry| entry.revision))
    }
}
