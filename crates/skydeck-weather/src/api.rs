//! OpenWeatherMap response shapes (units=metric).

use serde::Deserialize;

use crate::types::{Conditions, ForecastSample};

/// `GET /weather` body
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sys: Option<CountryInfo>,
    pub main: CurrentMain,
    #[serde(default)]
    pub weather: Vec<Conditions>,
    #[serde(default)]
    pub wind: Option<Wind>,
    /// Metres; omitted by the provider for some stations
    #[serde(default)]
    pub visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryInfo {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Wind {
    pub speed: f64,
}

/// `GET /forecast` body. `list` is absent on error payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub list: Option<Vec<ForecastSample>>,
}
