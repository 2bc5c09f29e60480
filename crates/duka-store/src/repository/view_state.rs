//! # View State Repository
//!
//! The last report selection (`analysisViewState`). A missing or unreadable
//! document means "nothing saved", never an error.

use duka_core::{ViewState, VIEW_STATE_KEY};
use tracing::{debug, warn};

use super::write_json;
use crate::error::DbResult;
use crate::storage::Storage;

/// Repository for the saved report selection.
#[derive(Debug, Clone)]
pub struct ViewStateRepository<S> {
    storage: S,
}

impl<S: Storage> ViewStateRepository<S> {
    /// Creates a new ViewStateRepository.
    pub fn new(storage: S) -> Self {
        ViewStateRepository { storage }
    }

    /// Loads the saved selection, if any.
    pub async fn load(&self) -> DbResult<Option<ViewState>> {
        let Some(text) = self.storage.get_item(VIEW_STATE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<ViewState>(&text) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(error = %e, "Saved view state unreadable, ignoring");
                Ok(None)
            }
        }
    }

    /// Saves the selection, replacing any previous one.
    pub async fn save(&self, state: &ViewState) -> DbResult<()> {
        debug!(period = %state.period, start = %state.start_date, end = %state.end_date, "Saving view state");
        write_json(&self.storage, VIEW_STATE_KEY, state).await
    }

    /// Forgets the saved selection. Returns whether one existed.
    pub async fn clear(&self) -> DbResult<bool> {
        self.storage.remove_item(VIEW_STATE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use duka_core::Period;

    #[tokio::test]
    async fn test_save_load_clear() {
        let repo = ViewStateRepository::new(MemoryStorage::new());
        assert_eq!(repo.load().await.unwrap(), None);

        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let state = ViewState::initial(today);
        repo.save(&state).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, state);
        let filter = loaded.to_filter().unwrap();
        assert_eq!(filter.period, Period::Day);

        assert!(repo.clear().await.unwrap());
        assert!(!repo.clear().await.unwrap());
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_state_is_ignored() {
        let storage = MemoryStorage::with_items([(VIEW_STATE_KEY, "[not json")]).await;
        let repo = ViewStateRepository::new(storage);
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_state_fills_defaults() {
        let storage = MemoryStorage::with_items([(VIEW_STATE_KEY, r#"{"period": "month"}"#)]).await;
        let state = ViewStateRepository::new(storage).load().await.unwrap().unwrap();
        assert_eq!(state.period, "month");
        assert!(state.start_date.is_empty());
        assert_eq!(state.to_filter().unwrap().range, None);
    }
}
