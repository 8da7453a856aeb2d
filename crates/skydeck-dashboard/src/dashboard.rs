//! Dashboard state: the displayed search result, favorites and view mode.
//!
//! Every mutation happens synchronously on `&mut self`; the only awaits are
//! the search fetch and the startup rehydration fan-out.

use skydeck_core::{AppError, FetchState, StorageError};
use skydeck_weather::{CityWeather, FavoriteKey, WeatherSource};

use crate::favorites::Favorites;
use crate::persistence::{rehydrate, PersistenceBridge};
use crate::store::KeyValueStore;

#[derive(Debug)]
pub struct Dashboard<S, K> {
    source: S,
    persistence: PersistenceBridge<K>,
    /// Last search result (zero or one city)
    displayed: Vec<CityWeather>,
    favorites: Favorites,
    only_favorites: bool,
    dark: bool,
    fetch_state: FetchState,
    error_message: Option<String>,
}

impl<S: WeatherSource, K: KeyValueStore> Dashboard<S, K> {
    /// Empty dashboard. Nothing is read from `store`.
    pub fn new(source: S, store: K, dark: bool) -> Self {
        Self {
            source,
            persistence: PersistenceBridge::new(store),
            displayed: Vec::new(),
            favorites: Favorites::new(),
            only_favorites: false,
            dark,
            fetch_state: FetchState::Idle,
            error_message: None,
        }
    }

    /// Dashboard with favorites restored from `store`.
    pub async fn load(source: S, store: K, dark: bool) -> Self {
        let mut dashboard = Self::new(source, store, dark);
        dashboard.rehydrate().await;
        dashboard
    }

    /// Re-read stored favorite names and fetch their records.
    ///
    /// Individual fetch failures are logged and skipped. An unreadable
    /// favorites list is shown on the error line and treated as empty.
    pub async fn rehydrate(&mut self) {
        let names = match self.persistence.load_favorite_names() {
            Ok(names) => names,
            Err(e) => {
                self.report_storage_error("Ignoring stored favorites", e);
                return;
            }
        };
        if names.is_empty() {
            return;
        }

        self.fetch_state = FetchState::Rehydrating;
        self.favorites = rehydrate(&self.source, &names).await;
        self.fetch_state = FetchState::Idle;
    }

    /// Look up `query` and make it the only displayed city.
    ///
    /// A blank query is ignored. On failure the previous display is kept and
    /// the error's user message becomes the visible error.
    pub async fn search(&mut self, query: &str) -> Result<Option<&CityWeather>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.fetch_state = FetchState::Searching;
        self.error_message = None;

        let result = self.source.fetch_city(query).await;
        self.fetch_state = FetchState::Idle;

        match result {
            Ok(city) => {
                tracing::info!("Displaying {}", city.city);
                self.displayed = vec![city];
                self.persist_displayed();
                Ok(self.displayed.first())
            }
            Err(e) => {
                let err = AppError::from(e);
                tracing::info!("Search for {:?} failed: {}", query, err);
                self.error_message = Some(err.user_message().to_string());
                Err(err)
            }
        }
    }

    /// Flip favorite status of `city`. Returns true if it is now a favorite.
    pub fn toggle_favorite(&mut self, city: &CityWeather) -> bool {
        let now_favorite = self.favorites.toggle(city);
        tracing::debug!(
            "{} {} favorites",
            city.city,
            if now_favorite { "added to" } else { "removed from" }
        );
        self.persist_favorites();
        now_favorite
    }

    /// Drop `city` from the display and from favorites, favorited or not.
    pub fn remove_city(&mut self, city: &CityWeather) {
        let key = city.favorite_key();
        self.displayed.retain(|c| c.favorite_key() != key);
        self.favorites.remove(&key);
        self.persist_displayed();
        self.persist_favorites();
    }

    /// Show only favorites (`true`) or the search result (`false`).
    pub fn set_filter_mode(&mut self, only_favorites: bool) {
        self.only_favorites = only_favorites;
    }

    /// Cities for the current view mode.
    pub fn visible_cities(&self) -> Vec<&CityWeather> {
        if self.only_favorites {
            self.favorites.cities().collect()
        } else {
            self.displayed.iter().collect()
        }
    }

    /// First displayed or favorite city whose name matches `name` case-insensitively.
    pub fn find_city(&self, name: &str) -> Option<&CityWeather> {
        let key = FavoriteKey::new(name);
        self.displayed
            .iter()
            .find(|c| c.favorite_key() == key)
            .or_else(|| self.favorites.get(&key))
    }

    pub fn is_favorite(&self, city: &CityWeather) -> bool {
        self.favorites.contains(&city.favorite_key())
    }

    pub fn displayed(&self) -> &[CityWeather] {
        &self.displayed
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn favorite_names(&self) -> Vec<String> {
        self.favorites.names()
    }

    pub fn only_favorites(&self) -> bool {
        self.only_favorites
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_state.is_loading()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Cosmetic only.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark = !self.dark;
        self.dark
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn persistence(&self) -> &PersistenceBridge<K> {
        &self.persistence
    }

    pub fn into_store(self) -> K {
        self.persistence.into_store()
    }

    fn persist_displayed(&mut self) {
        if let Err(e) = self.persistence.save_displayed(&self.displayed) {
            self.report_storage_error("Failed to save displayed cities", e);
        }
    }

    fn persist_favorites(&mut self) {
        let names = self.favorites.names();
        if let Err(e) = self.persistence.save_favorite_names(&names) {
            self.report_storage_error("Failed to save favorites", e);
        }
    }

    /// Log a store failure and show it on the error line. In-memory state is kept.
    fn report_storage_error(&mut self, context: &str, e: StorageError) {
        let err = AppError::from(e);
        tracing::warn!("{}: {}", context, err);
        self.error_message = Some(err.user_message().to_string());
    }
}
