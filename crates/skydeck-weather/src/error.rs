//! Weather-specific error types.

use skydeck_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    NotFound(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl WeatherError {
    /// User-facing message for the dashboard's error line.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "City not found".to_string(),
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.".to_string(),
            Self::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later.".to_string()
            }
            Self::Api { status, .. } => format!("Weather service error ({}).", status),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Parse(_) => "Received an unexpected response from the weather service.".to_string(),
            Self::InvalidUrl(_) => "Weather service URL is invalid. Check settings.".to_string(),
        }
    }

    /// The lookup succeeded but no city matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Network or parse failure; swallowed per city during rehydration.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_) | Self::Api { .. })
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        use skydeck_core::WeatherError as CoreWeatherError;

        match e {
            WeatherError::NotFound(city) => AppError::Weather(CoreWeatherError::CityNotFound(city)),
            WeatherError::InvalidApiKey => AppError::Weather(CoreWeatherError::InvalidApiKey),
            WeatherError::Api { status, .. } if status >= 500 => {
                AppError::Weather(CoreWeatherError::ServiceUnavailable)
            }
            WeatherError::Api { status, message } => {
                AppError::Weather(CoreWeatherError::ApiError(format!("{}: {}", status, message)))
            }
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            WeatherError::InvalidUrl(msg) => AppError::Config(ConfigError::Invalid(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_user_message() {
        let err = WeatherError::NotFound("atlantis".into());
        assert_eq!(err.user_message(), "City not found");
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(WeatherError::Parse("eof".into()).is_transient());
        assert!(WeatherError::Api {
            status: 502,
            message: "bad gateway".into()
        }
        .is_transient());
        assert!(!WeatherError::InvalidApiKey.is_transient());
    }

    #[test]
    fn test_server_error_message() {
        let err = WeatherError::Api {
            status: 503,
            message: "down".into(),
        };
        assert!(err.user_message().contains("unavailable"));
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = WeatherError::NotFound("atlantis".into()).into();
        assert_eq!(app.user_message(), "City not found");

        let app: AppError = WeatherError::Parse("missing field".into()).into();
        assert!(matches!(app, AppError::Network(NetworkError::InvalidResponse(_))));

        let app: AppError = WeatherError::Api {
            status: 500,
            message: "oops".into(),
        }
        .into();
        assert!(matches!(
            app,
            AppError::Weather(skydeck_core::WeatherError::ServiceUnavailable)
        ));
    }
}
