//! Mirrors dashboard lists into a [`KeyValueStore`] and rehydrates favorites.
//!
//! Two entries are kept: the favorite names and the last displayed cities.
//! The displayed list is written on every change but never read back at
//! startup; only favorites are restored.

use futures::future::join_all;
use skydeck_core::StorageError;
use skydeck_weather::{CityWeather, FavoriteKey, WeatherSource};

use crate::favorites::Favorites;
use crate::store::{KeyValueStore, StoreResult};

/// Store key for the JSON array of favorite names.
pub const FAVORITES_KEY: &str = "favoritesName";

/// Store key for the JSON array of displayed cities.
pub const DISPLAYED_KEY: &str = "cities";

#[derive(Debug)]
pub struct PersistenceBridge<K> {
    store: K,
}

impl<K: KeyValueStore> PersistenceBridge<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn into_store(self) -> K {
        self.store
    }

    /// Stored favorite names, in order. A missing key reads as empty.
    pub fn load_favorite_names(&self) -> StoreResult<Vec<String>> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            key: FAVORITES_KEY.to_string(),
            message: e.to_string(),
        })
    }

    pub fn save_favorite_names(&mut self, names: &[String]) -> StoreResult<()> {
        self.write_json(FAVORITES_KEY, names)
    }

    pub fn save_displayed(&mut self, cities: &[CityWeather]) -> StoreResult<()> {
        self.write_json(DISPLAYED_KEY, cities)
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(key, &json)
    }
}

/// Fetch every favorite concurrently and cache the ones that succeed.
///
/// All fetches are in flight at once. Every name stays a favorite; a failed
/// fetch only leaves its record empty. Names are trimmed, lowercased and
/// deduplicated first. Results keep the stored order regardless of
/// completion order.
pub async fn rehydrate<S>(source: &S, names: &[String]) -> Favorites
where
    S: WeatherSource + ?Sized,
{
    let mut favorites = Favorites::from_names(names);
    let keys: Vec<FavoriteKey> = favorites.keys().cloned().collect();

    let fetches = keys.iter().map(|key| async move {
        let result = source.fetch_city(key.as_str()).await;
        (key, result)
    });

    let mut restored = 0;
    for (key, result) in join_all(fetches).await {
        match result {
            Ok(city) => {
                favorites.attach(key, city);
                restored += 1;
            }
            Err(e) => {
                tracing::warn!("Could not restore favorite {}: {}", key, e);
            }
        }
    }

    tracing::info!("Restored {}/{} favorites", restored, keys.len());
    favorites
}
