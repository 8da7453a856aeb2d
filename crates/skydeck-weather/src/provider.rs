//! OpenWeatherMap client.
//!
//! Two lookups per city: `/weather` for current conditions and `/forecast`
//! for the 3-hourly list that feeds [`daily_forecast`]. No retries.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use reqwest::{Client, StatusCode};
use skydeck_core::WeatherConfig;
use tracing::instrument;
use url::Url;

use crate::api::{CurrentResponse, ForecastResponse};
use crate::error::WeatherError;
use crate::forecast::{daily_forecast, round_temp};
use crate::types::{CityWeather, ForecastSample};

const USER_AGENT: &str = concat!("SkyDeck/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce a [`CityWeather`] for a city name.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch current conditions and the daily forecast for `city`.
    ///
    /// Fails with [`WeatherError::NotFound`] when the provider has no match.
    async fn fetch_city(&self, city: &str) -> Result<CityWeather, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        })
    }

    fn endpoint(&self, path: &str, city: &str) -> Result<Url, WeatherError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("appid", &self.api_key)
            .append_pair("units", &self.units);

        Ok(url)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_current(&self, city: &str) -> Result<CurrentResponse, WeatherError> {
        let url = self.endpoint("weather", city)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                return Err(WeatherError::NotFound(city.to_string()));
            }
            StatusCode::UNAUTHORIZED => return Err(WeatherError::InvalidApiKey),
            s if !s.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(WeatherError::Api {
                    status: s.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("current conditions: {}", e)))
    }

    /// Forecast samples for `city`. A non-success status yields an empty list.
    #[instrument(skip(self), level = "debug")]
    async fn fetch_samples(&self, city: &str) -> Result<Vec<ForecastSample>, WeatherError> {
        let url = self.endpoint("forecast", city)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("Forecast for {} returned status {}", city, status);
            return Ok(Vec::new());
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("forecast: {}", e)))?;

        Ok(body.list.unwrap_or_default())
    }

    /// Build the display record, bucketing forecast days in `tz`.
    fn shape<Tz: TimeZone>(
        current: CurrentResponse,
        samples: &[ForecastSample],
        tz: &Tz,
    ) -> Result<CityWeather, WeatherError> {
        let conditions = current
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("current conditions: empty weather list".into()))?;

        Ok(CityWeather {
            id: current.id,
            city: current.name,
            country: current.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature: round_temp(current.main.temp),
            feels_like: round_temp(current.main.feels_like),
            condition: conditions.main,
            description: conditions.description,
            humidity: current.main.humidity,
            wind_speed: current.wind.map(|w| w.speed).unwrap_or_default(),
            visibility: current.visibility.map(|m| m / 1000.0).unwrap_or_default(),
            pressure: current.main.pressure,
            icon: conditions.icon,
            forecast: daily_forecast(samples, tz),
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    #[instrument(skip(self), level = "info")]
    async fn fetch_city(&self, city: &str) -> Result<CityWeather, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::NotFound(String::new()));
        }

        let current = self.fetch_current(city).await?;
        let samples = self.fetch_samples(city).await?;
        let weather = Self::shape(current, &samples, &Local)?;

        tracing::info!(
            "Fetched weather for {}, {} ({} forecast days)",
            weather.city,
            weather.country,
            weather.forecast.len()
        );
        Ok(weather)
    }
}
