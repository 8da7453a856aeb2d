//! Integration tests for WeatherProvider using wiremock.
//!
//! Forecast timestamps are built in the machine's local time zone so the
//! noon rule is checked the same way the dashboard applies it.

use std::collections::HashSet;

use chrono::{Local, NaiveDate, TimeZone};
use skydeck_core::WeatherConfig;
use skydeck_weather::{WeatherError, WeatherProvider, WeatherSource, MAX_FORECAST_DAYS};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_ts(day: u32, hour: u32) -> i64 {
    Local
        .with_ymd_and_hms(2024, 2, day, hour, 0, 0)
        .earliest()
        .unwrap()
        .timestamp()
}

fn sample(day: u32, hour: u32, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "dt": local_ts(day, hour),
        "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 70},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "dt_txt": "ignored"
    })
}

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 8.49, "feels_like": 6.2, "temp_min": 7.0, "temp_max": 9.5, "pressure": 1008, "humidity": 87},
        "visibility": 10000,
        "wind": {"speed": 5.66, "deg": 230},
        "dt": 1710000000,
        "sys": {"country": "GB", "sunrise": 1709965000, "sunset": 1710006000},
        "id": 2643743,
        "name": name,
        "cod": 200
    })
}

/// Six days of 3-hourly samples starting at local midnight on the 10th.
fn full_forecast() -> serde_json::Value {
    let mut list = Vec::new();
    for day in 10..=15 {
        for hour in (0..24).step_by(3) {
            list.push(sample(day, hour, f64::from(day) + f64::from(hour) / 10.0));
        }
    }
    serde_json::json!({"cod": "200", "cnt": list.len(), "list": list})
}

fn provider_for(mock_server: &MockServer) -> WeatherProvider {
    let config = WeatherConfig {
        base_url: mock_server.uri(),
        api_key: "test_key".to_string(),
        timeout_secs: 5,
        ..WeatherConfig::default()
    };
    WeatherProvider::new(&config).unwrap()
}

async fn mount_city(mock_server: &MockServer, name: &str, forecast: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", name))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(name)))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", name))
        .respond_with(forecast)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_fetch_city_success() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200).set_body_json(full_forecast()),
    )
    .await;

    let provider = provider_for(&mock_server);
    let city = provider.fetch_city("London").await.unwrap();

    assert_eq!(city.id, 2643743);
    assert_eq!(city.city, "London");
    assert_eq!(city.country, "GB");
    assert_eq!(city.temperature, 8);
    assert_eq!(city.feels_like, 6);
    assert_eq!(city.condition, "Rain");
    assert_eq!(city.description, "light rain");
    assert_eq!(city.humidity, 87);
    assert_eq!(city.pressure, 1008);
    assert!((city.visibility - 10.0).abs() < f64::EPSILON);
    assert_eq!(city.icon, "10d");
}

#[tokio::test]
async fn test_forecast_has_at_most_five_distinct_days() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200).set_body_json(full_forecast()),
    )
    .await;

    let provider = provider_for(&mock_server);
    let city = provider.fetch_city("London").await.unwrap();

    assert_eq!(city.forecast.len(), MAX_FORECAST_DAYS);
    let dates: HashSet<NaiveDate> = city.forecast.iter().map(|d| d.date).collect();
    assert_eq!(dates.len(), city.forecast.len());

    // Each day is represented by its 12:00 sample: temp = day + 1.2
    assert_eq!(city.forecast[0].date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    assert_eq!(city.forecast[0].temp, 11);
    assert_eq!(city.forecast[4].date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
}

#[tokio::test]
async fn test_forecast_failure_yields_empty_forecast() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let provider = provider_for(&mock_server);
    let city = provider.fetch_city("London").await.unwrap();

    assert_eq!(city.city, "London");
    assert!(city.forecast.is_empty());
}

#[tokio::test]
async fn test_forecast_without_list_yields_empty_forecast() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"cod": "200"})),
    )
    .await;

    let provider = provider_for(&mock_server);
    let city = provider.fetch_city("London").await.unwrap();

    assert!(city.forecast.is_empty());
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_city("Nowhereville").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "City not found");
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_city("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Api { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_city("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = WeatherConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: "test_key".to_string(),
        timeout_secs: 2,
        ..WeatherConfig::default()
    };
    let provider = WeatherProvider::new(&config).unwrap();

    let err = provider.fetch_city("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
    assert!(err.is_transient());
}
