use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use trackbox_store::KvStore;

use crate::models::{HistoryEntry, SearchFilter};

/// Storage key shared with the original mobile app's blobs
const SEARCH_HISTORY_KEY: &str = "@container_app_search_history";

/// How many past searches we keep around
const MAX_SEARCH_HISTORY: usize = 10;

/// Past search queries, most recent first.
///
/// At most one entry per (query, filter) pair: searching the same thing
/// again moves it to the front instead of duplicating it. The list is
/// capped; the oldest entry falls off the end.
pub struct SearchHistoryRepo {
    store: Arc<dyn KvStore>,
}

impl SearchHistoryRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Record a search. The query is trimmed and uppercased first;
    /// a blank query records nothing.
    pub async fn add(&self, query: &str, filter: SearchFilter) -> bool {
        let normalized = query.trim().to_uppercase();
        if normalized.is_empty() {
            return false;
        }

        let mut entries = self.read().await;

        // Re-searching moves the entry to the front instead of duplicating
        entries.retain(|entry| !(entry.query == normalized && entry.filter == filter));

        entries.insert(
            0,
            HistoryEntry {
                // The original app used wall-clock millis here; v4 avoids
                // collisions when two searches land in the same millisecond
                id: uuid::Uuid::new_v4().to_string(),
                query: normalized,
                filter,
                timestamp: Utc::now(),
            },
        );

        entries.truncate(MAX_SEARCH_HISTORY);
        self.write(&entries).await
    }

    /// Stored searches, most recent first
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.read().await
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut entries = self.read().await;
        entries.retain(|entry| entry.id != id);
        self.write(&entries).await
    }

    pub async fn clear(&self) -> bool {
        match self.store.remove(SEARCH_HISTORY_KEY).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to clear search history: {}", e);
                false
            }
        }
    }

    async fn read(&self) -> Vec<HistoryEntry> {
        match self.store.get(SEARCH_HISTORY_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Corrupt search history blob, treating as empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read search history: {}", e);
                Vec::new()
            }
        }
    }

    async fn write(&self, entries: &[HistoryEntry]) -> bool {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize search history: {}", e);
                return false;
            }
        };

        match self.store.set(SEARCH_HISTORY_KEY, &json).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write search history: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackbox_store::MemoryStore;

    fn repo() -> SearchHistoryRepo {
        SearchHistoryRepo::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_normalizes_query() {
        let repo = repo();
        assert!(repo.add("  tcku7486791 ", SearchFilter::All).await);

        let entries = repo.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query, "TCKU7486791");
    }

    #[tokio::test]
    async fn test_blank_query_records_nothing() {
        let repo = repo();
        assert!(!repo.add("", SearchFilter::All).await);
        assert!(!repo.add("   ", SearchFilter::Import).await);
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_moves_to_front() {
        let repo = repo();
        repo.add("ABC", SearchFilter::Import).await;
        repo.add("XYZ", SearchFilter::All).await;
        repo.add("ABC", SearchFilter::Import).await;

        let entries = repo.list().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "ABC");
        assert_eq!(entries[0].filter, SearchFilter::Import);
        assert_eq!(entries[1].query, "XYZ");
    }

    #[tokio::test]
    async fn test_same_query_different_filter_is_distinct() {
        let repo = repo();
        repo.add("ABC", SearchFilter::Import).await;
        repo.add("ABC", SearchFilter::Export).await;
        assert_eq!(repo.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let repo = repo();
        for i in 0..11 {
            repo.add(&format!("QUERY{}", i), SearchFilter::All).await;
        }

        let entries = repo.list().await;
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].query, "QUERY10");
        // QUERY0 was the oldest and fell off
        assert!(!entries.iter().any(|e| e.query == "QUERY0"));
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let repo = repo();
        repo.add("ABC", SearchFilter::All).await;
        repo.add("XYZ", SearchFilter::All).await;

        let id = repo.list().await[0].id.clone();
        assert!(repo.remove(&id).await);

        let entries = repo.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query, "ABC");
    }

    #[tokio::test]
    async fn test_clear_then_list_is_empty() {
        let repo = repo();
        repo.add("ABC", SearchFilter::All).await;
        assert!(repo.clear().await);
        assert!(repo.list().await.is_empty());
    }
}
