//! Favorite cities keyed by lowercase name.
//!
//! One ordered mapping `FavoriteKey -> Option<CityWeather>`. Membership alone
//! decides "is favorited"; the record is a display cache and is `None` when a
//! stored favorite could not be fetched at startup.

use skydeck_weather::{CityWeather, FavoriteKey};

#[derive(Debug, Clone, PartialEq)]
struct FavoriteEntry {
    key: FavoriteKey,
    city: Option<CityWeather>,
}

/// Insertion-ordered favorites. Never holds two entries with the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    entries: Vec<FavoriteEntry>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Favorites with no cached records, in the given order. Repeated names
    /// collapse onto the first occurrence.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut favorites = Self::new();
        for name in names {
            favorites.insert(FavoriteKey::new(name.as_ref()), None);
        }
        favorites
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &FavoriteKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &FavoriteKey) -> Option<&CityWeather> {
        self.position(key)
            .and_then(|i| self.entries[i].city.as_ref())
    }

    /// Add `key` at the end. Returns false (and changes nothing) if already present.
    pub fn insert(&mut self, key: FavoriteKey, city: Option<CityWeather>) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.entries.push(FavoriteEntry { key, city });
        true
    }

    /// Cache `city` for an existing favorite. Returns false if `key` is not a favorite.
    pub fn attach(&mut self, key: &FavoriteKey, city: CityWeather) -> bool {
        match self.position(key) {
            Some(i) => {
                self.entries[i].city = Some(city);
                true
            }
            None => false,
        }
    }

    /// Returns true if `key` was present.
    pub fn remove(&mut self, key: &FavoriteKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.key != key);
        self.entries.len() != before
    }

    /// Flip membership of `city`, deciding the direction from membership
    /// before any mutation. Returns the new membership.
    pub fn toggle(&mut self, city: &CityWeather) -> bool {
        let key = city.favorite_key();
        if self.contains(&key) {
            self.remove(&key);
            false
        } else {
            self.insert(key, Some(city.clone()));
            true
        }
    }

    /// Favorite names in order, as persisted.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.key.as_str().to_string())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FavoriteKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Cached records in favorite order, skipping favorites without one.
    pub fn cities(&self) -> impl Iterator<Item = &CityWeather> {
        self.entries.iter().filter_map(|e| e.city.as_ref())
    }

    fn position(&self, key: &FavoriteKey) -> Option<usize> {
        self.entries.iter().position(|e| &e.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CityWeather {
        CityWeather {
            id: name.len() as u64,
            city: name.to_string(),
            country: "XX".to_string(),
            temperature: 20,
            feels_like: 19,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            humidity: 40,
            wind_speed: 2.0,
            visibility: 10.0,
            pressure: 1015,
            icon: "01d".to_string(),
            forecast: vec![],
        }
    }

    #[test]
    fn test_from_names_dedups_and_keeps_order() {
        let favorites = Favorites::from_names(["Paris", "london", "PARIS", "Oslo"]);

        assert_eq!(favorites.names(), vec!["paris", "london", "oslo"]);
        assert_eq!(favorites.cities().count(), 0);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::new();
        let paris = city("Paris");

        assert!(favorites.toggle(&paris));
        assert!(favorites.contains(&FavoriteKey::new("paris")));
        assert_eq!(favorites.get(&FavoriteKey::new("paris")), Some(&paris));

        assert!(!favorites.toggle(&paris));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut favorites = Favorites::from_names(["oslo"]);
        favorites.attach(&FavoriteKey::new("oslo"), city("Oslo"));
        let original = favorites.clone();

        favorites.toggle(&city("Lima"));
        favorites.toggle(&city("Lima"));

        assert_eq!(favorites, original);
    }

    #[test]
    fn test_toggle_matches_case_insensitively() {
        let mut favorites = Favorites::from_names(["new york"]);

        // Favorited by name only (no cached record); toggling removes it
        assert!(!favorites.toggle(&city("New York")));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_insert_never_duplicates() {
        let mut favorites = Favorites::new();
        assert!(favorites.insert(FavoriteKey::new("Rome"), Some(city("Rome"))));
        assert!(!favorites.insert(FavoriteKey::new("ROME"), Some(city("ROME"))));

        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.cities().next().map(|c| c.city.as_str()), Some("Rome"));
    }

    #[test]
    fn test_attach_requires_membership() {
        let mut favorites = Favorites::from_names(["oslo"]);

        assert!(favorites.attach(&FavoriteKey::new("oslo"), city("Oslo")));
        assert!(!favorites.attach(&FavoriteKey::new("bergen"), city("Bergen")));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut favorites = Favorites::from_names(["oslo"]);
        assert!(!favorites.remove(&FavoriteKey::new("lima")));
        assert_eq!(favorites.names(), vec!["oslo"]);
    }
}
