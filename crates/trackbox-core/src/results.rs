use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use trackbox_store::KvStore;

use crate::models::{Container, SearchResultEntry};

/// Storage key shared with the original mobile app's blobs
const SEARCH_RESULTS_KEY: &str = "@container_app_search_results";

/// Previously fetched containers, annotated with when they were fetched.
///
/// At most one entry per container id: fetching a container again
/// replaces its old entry and moves it to the front. Each incoming
/// container is prepended in turn, so within one batch the relative
/// order ends up reversed at the front - screens rely on this
/// most-recent-search-first layout, so it stays. The list is uncapped;
/// unbounded growth is an accepted limitation.
pub struct SearchResultsRepo {
    store: Arc<dyn KvStore>,
}

impl SearchResultsRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Record a batch of fetched containers. No-op on empty input.
    pub async fn add_many(&self, containers: &[Container]) -> bool {
        if containers.is_empty() {
            return false;
        }

        let mut entries = self.read().await;
        let searched_at = Utc::now();

        for container in containers {
            entries.retain(|entry| entry.container.id != container.id);
            entries.insert(
                0,
                SearchResultEntry {
                    container: container.clone(),
                    searched_at,
                },
            );
        }

        self.write(&entries).await
    }

    /// Stored results, most recent first
    pub async fn list(&self) -> Vec<SearchResultEntry> {
        self.read().await
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut entries = self.read().await;
        entries.retain(|entry| entry.container.id != id);
        self.write(&entries).await
    }

    pub async fn clear(&self) -> bool {
        match self.store.remove(SEARCH_RESULTS_KEY).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to clear search results: {}", e);
                false
            }
        }
    }

    async fn read(&self) -> Vec<SearchResultEntry> {
        match self.store.get(SEARCH_RESULTS_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Corrupt search results blob, treating as empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read search results: {}", e);
                Vec::new()
            }
        }
    }

    async fn write(&self, entries: &[SearchResultEntry]) -> bool {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize search results: {}", e);
                return false;
            }
        };

        match self.store.set(SEARCH_RESULTS_KEY, &json).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write search results: {}", e);
                false
            }
        }
    }
}
