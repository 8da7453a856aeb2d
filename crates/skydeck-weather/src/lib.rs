//! Weather data for SkyDeck
//!
//! Fetches current conditions and the 5-day forecast for a city from
//! OpenWeatherMap and shapes the 3-hourly series into one entry per day.

pub mod error;
pub mod forecast;
pub mod provider;
pub mod types;

mod api;

pub use error::WeatherError;
pub use forecast::{daily_forecast, MAX_FORECAST_DAYS};
pub use provider::{WeatherProvider, WeatherSource};
pub use types::*;
