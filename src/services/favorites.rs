use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use crate::models::{RankedRestaurant, Restaurant};
use crate::services::store::{KeyValueStore, StoreError};

/// Default store key for the favorites set
pub const DEFAULT_FAVORITES_KEY: &str = "restaurant-finder-favorites";

/// Outcome of a favorite toggle
///
/// The in-memory change always applies. `persist_error` reports a failed store
/// write, which is not rolled back.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub favorites: BTreeSet<String>,
    pub is_favorite: bool,
    pub persist_error: Option<StoreError>,
}

impl ToggleOutcome {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Deduplicated set of favorite restaurant ids mirrored to a key-value store
///
/// The in-memory set answers every read; the store is written after each
/// toggle and only read by [`FavoritesSet::load`]. Toggles are serialized by
/// a writer lock so store writes land in the same order as the mutations.
pub struct FavoritesSet {
    store: Arc<dyn KeyValueStore>,
    key: String,
    ids: RwLock<BTreeSet<String>>,
    writer: tokio::sync::Mutex<()>,
}

impl FavoritesSet {
    /// Hydrate from the store
    ///
    /// A read failure or malformed content yields an empty set.
    pub async fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let ids = read_ids(store.as_ref(), &key).await;

        tracing::info!(
            "Loaded {} favorites from {} store (key: {})",
            ids.len(),
            store.backend(),
            key
        );

        Self {
            store,
            key,
            ids: RwLock::new(ids),
            writer: tokio::sync::Mutex::new(()),
        }
    }

    /// Flip membership of `id` and write the full set back to the store
    pub async fn toggle(&self, id: &str) -> ToggleOutcome {
        let _writer = self.writer.lock().await;

        let (favorites, is_favorite) = {
            let mut ids = self.ids.write();
            let is_favorite = if ids.remove(id) {
                false
            } else {
                ids.insert(id.to_string());
                true
            };
            (ids.clone(), is_favorite)
        };

        let persist_error = match self.persist(&favorites).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    "Favorite toggle for {} applied in memory but not persisted to {}: {}",
                    id,
                    self.store.backend(),
                    e
                );
                Some(e)
            }
        };

        tracing::debug!("Toggled favorite {} -> {} ({} total)", id, is_favorite, favorites.len());

        ToggleOutcome {
            favorites,
            is_favorite,
            persist_error,
        }
    }

    async fn persist(&self, ids: &BTreeSet<String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(ids)?;
        self.store.put(&self.key, &bytes).await
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.read().contains(id)
    }

    /// Keep only favorite restaurants, in their original order
    pub fn filter(&self, restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
        let ids = self.ids.read();
        restaurants
            .into_iter()
            .filter(|r| ids.contains(&r.id))
            .collect()
    }

    /// Same as [`FavoritesSet::filter`] for already-ranked results
    pub fn filter_ranked(&self, ranked: Vec<RankedRestaurant>) -> Vec<RankedRestaurant> {
        let ids = self.ids.read();
        ranked
            .into_iter()
            .filter(|r| ids.contains(&r.restaurant.id))
            .collect()
    }

    pub fn snapshot(&self) -> BTreeSet<String> {
        self.ids.read().clone()
    }

    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}

impl std::fmt::Debug for FavoritesSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesSet")
            .field("backend", &self.store.backend())
            .field("key", &self.key)
            .field("count", &self.len())
            .finish()
    }
}

async fn read_ids(store: &dyn KeyValueStore, key: &str) -> BTreeSet<String> {
    let bytes = match store.get(key).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            tracing::warn!("Failed to read favorites from {} store, starting empty: {}", store.backend(), e);
            return BTreeSet::new();
        }
    };

    match serde_json::from_slice::<Vec<String>>(&bytes) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!("Ignoring malformed favorites under {}: {}", key, e);
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::MemoryStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        async fn put(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_load_existing_favorites() {
        let store = MemoryStore::new().with_entry(DEFAULT_FAVORITES_KEY, r#"["b","a","a"]"#);
        let favorites = FavoritesSet::load(Arc::new(store), DEFAULT_FAVORITES_KEY).await;

        assert_eq!(favorites.len(), 2);
        assert!(favorites.contains("a"));
        assert!(favorites.contains("b"));
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let store = MemoryStore::new().with_entry(DEFAULT_FAVORITES_KEY, "{not json");
        let favorites = FavoritesSet::load(Arc::new(store), DEFAULT_FAVORITES_KEY).await;
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn test_load_store_failure_is_empty() {
        let favorites = FavoritesSet::load(Arc::new(BrokenStore), DEFAULT_FAVORITES_KEY).await;
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_persists_full_set() {
        let store = Arc::new(MemoryStore::new());
        let favorites = FavoritesSet::load(store.clone(), DEFAULT_FAVORITES_KEY).await;

        let outcome = favorites.toggle("r1").await;
        assert!(outcome.is_favorite);
        assert!(outcome.persisted());
        favorites.toggle("r2").await;

        let stored = store.get(DEFAULT_FAVORITES_KEY).await.unwrap().unwrap();
        let ids: Vec<String> = serde_json::from_slice(&stored).unwrap();
        assert_eq!(ids, vec!["r1", "r2"]);

        // A fresh session sees the mirrored state
        let reloaded = FavoritesSet::load(store, DEFAULT_FAVORITES_KEY).await;
        assert!(reloaded.contains("r1") && reloaded.contains("r2"));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_membership() {
        let favorites = FavoritesSet::load(Arc::new(MemoryStore::new()), DEFAULT_FAVORITES_KEY).await;
        let before = favorites.snapshot();

        favorites.toggle("r1").await;
        let outcome = favorites.toggle("r1").await;

        assert!(!outcome.is_favorite);
        assert_eq!(favorites.snapshot(), before);
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_toggle() {
        let favorites = FavoritesSet::load(Arc::new(BrokenStore), DEFAULT_FAVORITES_KEY).await;

        let outcome = favorites.toggle("r1").await;

        assert!(!outcome.persisted());
        assert!(outcome.is_favorite);
        assert!(favorites.contains("r1"));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_are_serialized() {
        let store = Arc::new(MemoryStore::new());
        let favorites = Arc::new(FavoritesSet::load(store.clone(), DEFAULT_FAVORITES_KEY).await);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let favorites = favorites.clone();
                tokio::spawn(async move { favorites.toggle(&format!("r{}", i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(favorites.len(), 16);
        let stored = store.get(DEFAULT_FAVORITES_KEY).await.unwrap().unwrap();
        let ids: BTreeSet<String> = serde_json::from_slice(&stored).unwrap();
        assert_eq!(ids, favorites.snapshot());
    }
}
