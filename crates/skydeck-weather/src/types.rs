use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Condition triplet as reported by the provider (e.g. "Rain", "light rain", "10d")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Temperature block of a forecast sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleMain {
    pub temp: f64,
}

/// One 3-hourly entry of the provider's forecast list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp (seconds)
    pub dt: i64,
    pub main: SampleMain,
    #[serde(default)]
    pub weather: Vec<Conditions>,
}

impl ForecastSample {
    pub fn new(
        dt: i64,
        temp: f64,
        condition: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            dt,
            main: SampleMain { temp },
            weather: vec![Conditions {
                main: condition.into(),
                description: description.into(),
                icon: icon.into(),
            }],
        }
    }
}

/// Representative forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Rounded °C
    pub temp: i32,
    pub condition: String,
    pub description: String,
    pub icon: String,
}

/// Current conditions plus daily forecast for one city.
///
/// Replaced wholesale on every fetch; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
    pub id: u64,
    pub city: String,
    pub country: String,
    /// Rounded °C
    pub temperature: i32,
    /// Rounded °C
    pub feels_like: i32,
    pub condition: String,
    pub description: String,
    /// Percent
    pub humidity: u8,
    /// m/s
    pub wind_speed: f64,
    /// km
    pub visibility: f64,
    /// hPa
    pub pressure: u32,
    pub icon: String,
    pub forecast: Vec<ForecastDay>,
}

impl CityWeather {
    /// Key used for favorite membership
    pub fn favorite_key(&self) -> FavoriteKey {
        FavoriteKey::new(&self.city)
    }

    /// URL of the provider's icon image, if the record has an icon code
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else {
            Some(format!("{}/{}@2x.png", ICON_BASE_URL, self.icon))
        }
    }
}

/// Lowercase city name identifying a favorite.
///
/// Independent of `CityWeather::id`: two records for the same name share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteKey(String);

impl FavoriteKey {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_city(name: &str) -> CityWeather {
        CityWeather {
            id: 2643743,
            city: name.to_string(),
            country: "GB".to_string(),
            temperature: 12,
            feels_like: 10,
            condition: "Clouds".to_string(),
            description: "broken clouds".to_string(),
            humidity: 81,
            wind_speed: 4.1,
            visibility: 10.0,
            pressure: 1012,
            icon: "04d".to_string(),
            forecast: vec![],
        }
    }

    #[test]
    fn test_favorite_key_is_lowercase() {
        assert_eq!(sample_city("London").favorite_key().as_str(), "london");
        assert_eq!(FavoriteKey::new("  New York ").as_str(), "new york");
    }

    #[test]
    fn test_favorite_key_ignores_id() {
        let mut a = sample_city("Paris");
        let b = sample_city("PARIS");
        a.id = 1;
        assert_eq!(a.favorite_key(), b.favorite_key());
    }

    #[test]
    fn test_icon_url() {
        assert_eq!(
            sample_city("London").icon_url().as_deref(),
            Some("https://openweathermap.org/img/wn/04d@2x.png")
        );

        let mut city = sample_city("London");
        city.icon.clear();
        assert_eq!(city.icon_url(), None);
    }

    #[test]
    fn test_city_weather_uses_camel_case() {
        let json = serde_json::to_value(sample_city("London")).unwrap();
        assert!(json.get("feelsLike").is_some());
        assert!(json.get("windSpeed").is_some());
        assert!(json.get("feels_like").is_none());
    }

    #[test]
    fn test_forecast_day_date_has_no_time() {
        let day = ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            temp: 7,
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
            icon: "10d".to_string(),
        };
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2024-01-15");
    }
}
