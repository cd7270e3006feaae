use std::sync::Arc;

use tracing::warn;
use trackbox_store::KvStore;

use crate::models::Container;

/// Storage key shared with the original mobile app's blobs
const FAVORITES_KEY: &str = "@container_app_favorites";

/// Starred containers.
///
/// One JSON-array blob, read-modify-write per operation. Insertion
/// order is preserved (a favorite stays where the user starred it, no
/// most-recent-first shuffling). Storage failures degrade to an empty
/// list or a `false` return, never an error - losing a star is not
/// worth crashing over.
pub struct FavoritesRepo {
    store: Arc<dyn KvStore>,
}

impl FavoritesRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Stored favorites, empty if the blob is absent or unreadable
    pub async fn list(&self) -> Vec<Container> {
        self.read().await
    }

    /// Star a container. No-op when the id is already present.
    pub async fn add(&self, container: Container) -> bool {
        let mut favorites = self.read().await;

        if favorites.iter().any(|fav| fav.id == container.id) {
            return true; // Already starred
        }

        favorites.push(container);
        self.write(&favorites).await
    }

    /// Unstar by id. Succeeds even when the id was never there.
    pub async fn remove(&self, id: &str) -> bool {
        let mut favorites = self.read().await;
        favorites.retain(|fav| fav.id != id);
        self.write(&favorites).await
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.read().await.iter().any(|fav| fav.id == id)
    }

    async fn read(&self) -> Vec<Container> {
        match self.store.get(FAVORITES_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Corrupt favorites blob, treating as empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {}", e);
                Vec::new()
            }
        }
    }

    async fn write(&self, favorites: &[Container]) -> bool {
        let json = match serde_json::to_string(favorites) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize favorites: {}", e);
                return false;
            }
        };

        match self.store.set(FAVORITES_KEY, &json).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write favorites: {}", e);
                false
            }
        }
    }
}
